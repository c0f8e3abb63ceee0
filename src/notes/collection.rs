// Note collection: the value handed from stage to stage

use serde::{Deserialize, Serialize};
use super::event::NoteEvent;

pub const DEFAULT_TEMPO: f64 = 120.0;
pub const DEFAULT_TIME_SIGNATURE: (u8, u8) = (4, 4);

/// An in-memory note stream plus the timing context needed to read it.
///
/// Note order carries no meaning; stages that care re-sort. Every stage
/// returns a fresh collection and leaves tempo and time signature untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteCollection {
    pub notes: Vec<NoteEvent>,

    /// Beats per minute, always > 0
    #[serde(default = "default_tempo")]
    pub tempo: f64,

    #[serde(default = "default_numerator")]
    pub time_signature_numerator: u8,

    #[serde(default = "default_denominator")]
    pub time_signature_denominator: u8,
}

impl Default for NoteCollection {
    fn default() -> Self {
        Self {
            notes: Vec::new(),
            tempo: DEFAULT_TEMPO,
            time_signature_numerator: DEFAULT_TIME_SIGNATURE.0,
            time_signature_denominator: DEFAULT_TIME_SIGNATURE.1,
        }
    }
}

impl NoteCollection {
    pub fn new(notes: Vec<NoteEvent>, tempo: f64) -> Self {
        Self {
            notes,
            tempo,
            ..Self::default()
        }
    }

    /// Build a collection with the same tempo and time signature as `self`
    pub fn with_notes(&self, notes: Vec<NoteEvent>) -> Self {
        Self {
            notes,
            tempo: self.tempo,
            time_signature_numerator: self.time_signature_numerator,
            time_signature_denominator: self.time_signature_denominator,
        }
    }

    /// Latest note offset in seconds, 0.0 when empty
    pub fn duration(&self) -> f64 {
        self.notes.iter().map(|n| n.end).fold(0.0, f64::max)
    }

    pub fn note_count(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

fn default_tempo() -> f64 {
    DEFAULT_TEMPO
}

fn default_numerator() -> u8 {
    DEFAULT_TIME_SIGNATURE.0
}

fn default_denominator() -> u8 {
    DEFAULT_TIME_SIGNATURE.1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_collection_has_zero_duration() {
        let c = NoteCollection::default();
        assert_eq!(c.duration(), 0.0);
        assert_eq!(c.note_count(), 0);
        assert_eq!(c.tempo, 120.0);
        assert_eq!((c.time_signature_numerator, c.time_signature_denominator), (4, 4));
    }

    #[test]
    fn duration_is_latest_offset_not_last_note() {
        let c = NoteCollection::new(
            vec![
                NoteEvent::new(60, 0.0, 3.0),
                NoteEvent::new(62, 1.0, 1.5),
            ],
            100.0,
        );
        assert_eq!(c.duration(), 3.0);
        assert_eq!(c.note_count(), 2);
    }

    #[test]
    fn with_notes_keeps_timing_context() {
        let c = NoteCollection {
            notes: vec![NoteEvent::new(60, 0.0, 1.0)],
            tempo: 90.0,
            time_signature_numerator: 3,
            time_signature_denominator: 8,
        };
        let next = c.with_notes(Vec::new());
        assert!(next.is_empty());
        assert_eq!(next.tempo, 90.0);
        assert_eq!(next.time_signature_numerator, 3);
        assert_eq!(next.time_signature_denominator, 8);
    }
}
