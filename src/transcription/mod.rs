// Preprocessing applied to every freshly transcribed note stream
//
// Transcription engines report onsets and offsets as raw floating-point
// seconds. Before anything can be notated they are snapped to a sixteenth
// grid, and the collisions the snapping produces are collapsed.

pub mod quantize;
pub mod dedup;

pub use quantize::*;
pub use dedup::*;

use crate::notes::NoteCollection;

/// Quantize, then drop the duplicates quantization produced.
///
/// Safe to run again on already processed data: gridded times stay put and
/// a unique set stays unique.
pub fn preprocess(collection: &NoteCollection) -> NoteCollection {
    let result = remove_duplicates(&quantize_collection(collection));

    log::debug!(
        "Preprocessed {} notes -> {} (tempo {:.2} BPM)",
        collection.note_count(),
        result.note_count(),
        collection.tempo
    );

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::NoteEvent;

    #[test]
    fn identical_notes_collapse_to_one() {
        let c = NoteCollection::new(
            vec![NoteEvent::new(60, 0.0, 0.5), NoteEvent::new(60, 0.0, 0.5)],
            120.0,
        );
        assert_eq!(preprocess(&c).note_count(), 1);
    }

    #[test]
    fn notes_that_quantize_together_collapse() {
        let c = NoteCollection::new(
            vec![
                NoteEvent::new(60, 0.01, 0.49),
                NoteEvent::new(60, 0.02, 0.51),
                NoteEvent::new(64, 0.02, 0.51),
            ],
            120.0,
        );
        let p = preprocess(&c);
        assert_eq!(p.note_count(), 2);
        assert_eq!(p.notes[0].pitch, 60);
        assert_eq!(p.notes[1].pitch, 64);
    }

    #[test]
    fn rerunning_is_harmless() {
        let c = NoteCollection::new(
            vec![
                NoteEvent::new(60, 0.013, 0.26),
                NoteEvent::new(62, 0.5, 0.51),
                NoteEvent::new(62, 0.49, 0.52),
                NoteEvent::new(65, 1.3, 2.2),
            ],
            110.0,
        );
        let once = preprocess(&c);
        let twice = preprocess(&once);
        assert_eq!(once.note_count(), twice.note_count());
        for (a, b) in once.notes.iter().zip(&twice.notes) {
            assert_eq!(a.pitch, b.pitch);
            assert!((a.start - b.start).abs() < 1e-9);
            assert!((a.end - b.end).abs() < 1e-9);
        }
    }

    #[test]
    fn empty_in_empty_out() {
        let c = NoteCollection::default();
        let p = preprocess(&c);
        assert!(p.is_empty());
        assert_eq!(p.tempo, c.tempo);
    }
}
