// Difficulty-based simplification of a preprocessed note stream
//
// Each level is an independent pure transform. Advanced is the shared base:
// intermediate and beginner both start from its output and then branch, so
// beginner is NOT intermediate plus more.

pub mod polyphony;
pub mod melody;

pub use polyphony::*;
pub use melody::*;

use std::ops::RangeInclusive;
use crate::notes::{Difficulty, NoteCollection, NoteEvent};

/// Notes shorter than this fraction of a thirty-second are ornamental noise
pub const MICRO_NOTE_TOLERANCE: f64 = 0.9;

/// Velocity band after normalization
pub const VELOCITY_RANGE: RangeInclusive<u8> = 30..=110;

/// Playable range for intermediate (C2-C7)
pub const INTERMEDIATE_PITCH_RANGE: RangeInclusive<u8> = 36..=96;

/// Playable range for beginner (C3-C6)
pub const BEGINNER_PITCH_RANGE: RangeInclusive<u8> = 48..=84;

/// Simultaneous voices allowed at intermediate
pub const INTERMEDIATE_MAX_VOICES: usize = 4;

/// Length of a thirty-second note in seconds at `tempo` BPM
pub fn thirty_second_duration(tempo: f64) -> f64 {
    60.0 / tempo / 8.0
}

/// Simplify `collection` to the requested level.
pub fn simplify(collection: &NoteCollection, difficulty: Difficulty) -> NoteCollection {
    let result = match difficulty {
        Difficulty::Original => collection.clone(),
        Difficulty::Advanced => simplify_advanced(collection),
        Difficulty::Intermediate => simplify_intermediate(collection),
        Difficulty::Beginner => simplify_beginner(collection),
    };

    log::debug!(
        "Simplified ({}): {} -> {} notes",
        difficulty,
        collection.note_count(),
        result.note_count()
    );

    result
}

/// Drop micro-notes and squeeze velocities into the normalized band.
pub fn simplify_advanced(collection: &NoteCollection) -> NoteCollection {
    let min_duration = thirty_second_duration(collection.tempo) * MICRO_NOTE_TOLERANCE;

    let notes = collection.notes.iter()
        .filter(|note| note.duration() >= min_duration)
        .map(|note| NoteEvent {
            velocity: note.velocity.clamp(*VELOCITY_RANGE.start(), *VELOCITY_RANGE.end()),
            ..*note
        })
        .collect();

    collection.with_notes(notes)
}

/// Advanced, then restrict the range and cap the chord thickness at four.
pub fn simplify_intermediate(collection: &NoteCollection) -> NoteCollection {
    let base = simplify_advanced(collection);
    let in_range = retain_pitch_range(&base.notes, INTERMEDIATE_PITCH_RANGE);
    let notes = limit_polyphony(&in_range, INTERMEDIATE_MAX_VOICES);

    base.with_notes(notes)
}

/// Advanced, then a narrower range and only melody plus bass.
pub fn simplify_beginner(collection: &NoteCollection) -> NoteCollection {
    let base = simplify_advanced(collection);
    let in_range = retain_pitch_range(&base.notes, BEGINNER_PITCH_RANGE);
    let notes = extract_melody_and_bass(&in_range);

    base.with_notes(notes)
}

fn retain_pitch_range(notes: &[NoteEvent], range: RangeInclusive<u8>) -> Vec<NoteEvent> {
    notes.iter()
        .filter(|note| range.contains(&note.pitch))
        .copied()
        .collect()
}
