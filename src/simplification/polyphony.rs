// Greedy voice-count limiting

use std::cmp::Ordering;
use crate::notes::NoteEvent;

/// Order notes by onset, and by pitch from high to low within an onset.
/// The sort is stable, so equal keys keep their incoming order.
fn onset_then_highest(a: &NoteEvent, b: &NoteEvent) -> Ordering {
    a.start.total_cmp(&b.start).then_with(|| b.pitch.cmp(&a.pitch))
}

/// Keep at most `max_voices` notes sounding at any onset.
///
/// Notes are visited by onset, higher pitches first, and accepted while
/// fewer than `max_voices` already accepted notes are still held at their
/// onset. This is a forward greedy scan, so the melody (top line) wins
/// whenever a chord is too thick. The result comes back in visiting order.
pub fn limit_polyphony(notes: &[NoteEvent], max_voices: usize) -> Vec<NoteEvent> {
    if notes.is_empty() {
        return Vec::new();
    }

    let mut sorted = notes.to_vec();
    sorted.sort_by(onset_then_highest);

    let mut accepted: Vec<NoteEvent> = Vec::with_capacity(sorted.len());
    for note in sorted {
        let active = accepted.iter()
            .filter(|held| held.is_sounding_at(note.start))
            .count();
        if active < max_voices {
            accepted.push(note);
        }
    }

    accepted
}
