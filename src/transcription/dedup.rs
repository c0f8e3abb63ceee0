// Removal of notes that quantization made identical

use std::collections::HashSet;
use crate::notes::{NoteCollection, NoteEvent};

/// Times are compared at microsecond precision to absorb float noise
const TIME_KEY_SCALE: f64 = 1_000_000.0;

fn time_key(seconds: f64) -> i64 {
    (seconds * TIME_KEY_SCALE).round() as i64
}

fn note_key(note: &NoteEvent) -> (u8, i64, i64) {
    (note.pitch, time_key(note.start), time_key(note.end))
}

/// Drop every note whose (pitch, start, end) was already seen.
/// The first occurrence wins and survivors keep their relative order.
pub fn remove_duplicates(collection: &NoteCollection) -> NoteCollection {
    let mut seen: HashSet<(u8, i64, i64)> = HashSet::with_capacity(collection.notes.len());

    let notes = collection.notes.iter()
        .filter(|note| seen.insert(note_key(note)))
        .copied()
        .collect();

    collection.with_notes(notes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_first_of_identical_notes() {
        let c = NoteCollection::new(
            vec![
                NoteEvent::with_velocity(60, 0.0, 0.5, 80),
                NoteEvent::with_velocity(60, 0.0, 0.5, 20),
            ],
            120.0,
        );
        let d = remove_duplicates(&c);
        assert_eq!(d.note_count(), 1);
        assert_eq!(d.notes[0].velocity, 80);
    }

    #[test]
    fn float_noise_below_a_microsecond_is_ignored() {
        let c = NoteCollection::new(
            vec![
                NoteEvent::new(60, 0.1 + 0.2, 0.5),
                NoteEvent::new(60, 0.3, 0.5000000001),
            ],
            120.0,
        );
        assert_eq!(remove_duplicates(&c).note_count(), 1);
    }

    #[test]
    fn different_pitch_or_time_survives() {
        let c = NoteCollection::new(
            vec![
                NoteEvent::new(60, 0.0, 0.5),
                NoteEvent::new(61, 0.0, 0.5),
                NoteEvent::new(60, 0.125, 0.5),
                NoteEvent::new(60, 0.0, 0.625),
            ],
            120.0,
        );
        assert_eq!(remove_duplicates(&c).note_count(), 4);
    }

    #[test]
    fn survivors_keep_original_order() {
        let c = NoteCollection::new(
            vec![
                NoteEvent::new(67, 1.0, 2.0),
                NoteEvent::new(60, 0.0, 1.0),
                NoteEvent::new(67, 1.0, 2.0),
                NoteEvent::new(64, 0.5, 1.0),
                NoteEvent::new(60, 0.0, 1.0),
            ],
            120.0,
        );
        let pitches: Vec<u8> = remove_duplicates(&c).notes.iter().map(|n| n.pitch).collect();
        assert_eq!(pitches, vec![67, 60, 64]);
    }

    #[test]
    fn second_pass_removes_nothing() {
        let c = NoteCollection::new(
            vec![
                NoteEvent::new(60, 0.0, 0.5),
                NoteEvent::new(60, 0.0, 0.5),
                NoteEvent::new(62, 0.25, 0.5),
            ],
            120.0,
        );
        let once = remove_duplicates(&c);
        let twice = remove_duplicates(&once);
        assert_eq!(once.note_count(), twice.note_count());
        assert_eq!(once, twice);
    }
}
