// Melody + bass extraction over onset clusters

use crate::notes::NoteEvent;

/// Onsets closer than this to a cluster's first note count as simultaneous
pub const ONSET_CLUSTER_WINDOW_SECS: f64 = 0.05;

/// Group notes (already sorted by onset) into clusters of near-simultaneous
/// onsets. Each cluster is anchored to its first member: a note joins while it
/// starts less than the window after that first note, regardless of how close
/// it is to the previous note.
fn onset_clusters(sorted: &[NoteEvent]) -> Vec<&[NoteEvent]> {
    let mut clusters = Vec::new();
    let mut first = 0;

    for (i, note) in sorted.iter().enumerate().skip(1) {
        if note.start - sorted[first].start >= ONSET_CLUSTER_WINDOW_SECS {
            clusters.push(&sorted[first..i]);
            first = i;
        }
    }
    if !sorted.is_empty() {
        clusters.push(&sorted[first..]);
    }

    clusters
}

/// Keep only the top line and the bass line.
///
/// A lone note is kept as-is. In a cluster of two or more, the highest note
/// (melody) is emitted first, then the lowest (bass) unless both share a
/// pitch. Ties go to the earliest note in onset order.
pub fn extract_melody_and_bass(notes: &[NoteEvent]) -> Vec<NoteEvent> {
    if notes.is_empty() {
        return Vec::new();
    }

    let mut sorted = notes.to_vec();
    sorted.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut result = Vec::new();
    for cluster in onset_clusters(&sorted) {
        if let [single] = cluster {
            result.push(*single);
            continue;
        }

        let mut melody = &cluster[0];
        let mut bass = &cluster[0];
        for note in &cluster[1..] {
            if note.pitch > melody.pitch {
                melody = note;
            }
            if note.pitch < bass.pitch {
                bass = note;
            }
        }

        result.push(*melody);
        if bass.pitch != melody.pitch {
            result.push(*bass);
        }
    }

    result
}
