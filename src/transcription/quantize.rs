// Rhythmic quantization onto a sixteenth-note grid

use crate::notes::{NoteCollection, NoteEvent};

/// Length of a sixteenth note in seconds at `tempo` BPM
pub fn sixteenth_duration(tempo: f64) -> f64 {
    60.0 / tempo / 4.0
}

/// Snap `time` to the nearest sixteenth-note grid point, never below zero.
/// Halfway points round away from zero.
pub fn quantize_to_grid(time: f64, tempo: f64) -> f64 {
    let grid = sixteenth_duration(tempo);
    let quantized = (time / grid).round() * grid;
    quantized.max(0.0)
}

/// Quantize onset and offset of every note independently.
///
/// A note whose offset collapses onto (or before) its onset is stretched to
/// one sixteenth so it stays audible. Already-gridded input comes back with
/// the same timings.
pub fn quantize_collection(collection: &NoteCollection) -> NoteCollection {
    let grid = sixteenth_duration(collection.tempo);

    let notes = collection.notes.iter().map(|note| {
        let start = quantize_to_grid(note.start, collection.tempo);
        let mut end = quantize_to_grid(note.end, collection.tempo);
        if end <= start {
            end = start + grid;
        }
        NoteEvent { start, end, ..*note }
    }).collect();

    collection.with_notes(notes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn on_grid(time: f64, tempo: f64) -> bool {
        let steps = time / sixteenth_duration(tempo);
        (steps - steps.round()).abs() < 1e-6
    }

    #[test]
    fn sixteenth_at_120_bpm_is_an_eighth_of_a_second() {
        assert!((sixteenth_duration(120.0) - 0.125).abs() < EPS);
        assert!((sixteenth_duration(60.0) - 0.25).abs() < EPS);
    }

    #[test]
    fn rounds_to_nearest_grid_point() {
        assert!((quantize_to_grid(0.13, 120.0) - 0.125).abs() < EPS);
        assert!((quantize_to_grid(0.19, 120.0) - 0.25).abs() < EPS);
        assert!((quantize_to_grid(1.0, 120.0) - 1.0).abs() < EPS);
    }

    #[test]
    fn halfway_rounds_up() {
        assert!((quantize_to_grid(0.0625, 120.0) - 0.125).abs() < EPS);
    }

    #[test]
    fn never_negative() {
        assert_eq!(quantize_to_grid(-0.3, 120.0), 0.0);
        assert_eq!(quantize_to_grid(0.01, 120.0), 0.0);
    }

    #[test]
    fn collapsed_note_gets_one_sixteenth() {
        let c = NoteCollection::new(vec![NoteEvent::new(60, 0.13, 0.13)], 120.0);
        let q = quantize_collection(&c);
        let note = q.notes[0];
        assert!(note.end > note.start);
        assert!((note.start - 0.125).abs() < EPS);
        assert!((note.end - 0.25).abs() < EPS);
        assert!(on_grid(note.start, 120.0) && on_grid(note.end, 120.0));
    }

    #[test]
    fn inverted_note_is_repaired() {
        let c = NoteCollection::new(vec![NoteEvent::new(60, 1.0, 0.5)], 120.0);
        let q = quantize_collection(&c);
        assert!((q.notes[0].start - 1.0).abs() < EPS);
        assert!((q.notes[0].end - 1.125).abs() < EPS);
    }

    #[test]
    fn every_note_lasts_at_least_one_sixteenth() {
        let tempo = 97.0;
        let c = NoteCollection::new(
            (0..50)
                .map(|i| {
                    let start = i as f64 * 0.037;
                    NoteEvent::new(40 + (i % 40) as u8, start, start + (i % 7) as f64 * 0.011)
                })
                .collect(),
            tempo,
        );
        let q = quantize_collection(&c);
        let grid = sixteenth_duration(tempo);
        for note in &q.notes {
            assert!(note.duration() >= grid - EPS, "{:?}", note);
            assert!(on_grid(note.start, tempo));
            assert!(on_grid(note.end, tempo));
        }
    }

    #[test]
    fn quantizing_twice_changes_nothing() {
        let c = NoteCollection::new(
            vec![
                NoteEvent::new(60, 0.03, 0.41),
                NoteEvent::new(64, 0.33, 0.34),
                NoteEvent::new(67, 1.777, 2.901),
            ],
            133.0,
        );
        let once = quantize_collection(&c);
        let twice = quantize_collection(&once);
        for (a, b) in once.notes.iter().zip(&twice.notes) {
            assert!((a.start - b.start).abs() < EPS);
            assert!((a.end - b.end).abs() < EPS);
        }
    }

    #[test]
    fn keeps_pitch_velocity_and_timing_context() {
        let c = NoteCollection {
            notes: vec![NoteEvent::with_velocity(72, 0.1, 0.6, 17)],
            tempo: 120.0,
            time_signature_numerator: 6,
            time_signature_denominator: 8,
        };
        let q = quantize_collection(&c);
        assert_eq!(q.notes[0].pitch, 72);
        assert_eq!(q.notes[0].velocity, 17);
        assert_eq!(q.tempo, 120.0);
        assert_eq!((q.time_signature_numerator, q.time_signature_denominator), (6, 8));
    }
}
