// Single pitched note event

use serde::{Deserialize, Serialize};

/// Velocity given to notes built without an explicit one
pub const DEFAULT_VELOCITY: u8 = 100;

/// A single sounding note. Times are in seconds from the start of the piece.
///
/// `end >= start` is not enforced here; quantization guarantees it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    /// MIDI note number (0-127, 60 = middle C)
    pub pitch: u8,
    /// Onset in seconds
    pub start: f64,
    /// Offset in seconds
    pub end: f64,
    /// Loudness (0-127)
    #[serde(default = "default_velocity")]
    pub velocity: u8,
}

impl NoteEvent {
    pub fn new(pitch: u8, start: f64, end: f64) -> Self {
        Self {
            pitch,
            start,
            end,
            velocity: DEFAULT_VELOCITY,
        }
    }

    pub fn with_velocity(pitch: u8, start: f64, end: f64, velocity: u8) -> Self {
        Self { pitch, start, end, velocity }
    }

    /// Length of the note in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// True if the note is held at `time` (onset inclusive, offset exclusive)
    pub fn is_sounding_at(&self, time: f64) -> bool {
        self.start <= time && time < self.end
    }
}

/// Default velocity (for serde)
fn default_velocity() -> u8 {
    DEFAULT_VELOCITY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_is_end_minus_start() {
        let note = NoteEvent::new(60, 0.5, 1.25);
        assert_eq!(note.duration(), 0.75);
        assert_eq!(note.velocity, DEFAULT_VELOCITY);
    }

    #[test]
    fn sounding_window_is_half_open() {
        let note = NoteEvent::new(60, 1.0, 2.0);
        assert!(note.is_sounding_at(1.0));
        assert!(note.is_sounding_at(1.999));
        assert!(!note.is_sounding_at(2.0));
        assert!(!note.is_sounding_at(0.5));
    }

    #[test]
    fn velocity_defaults_when_missing_from_json() {
        let note: NoteEvent =
            serde_json::from_str(r#"{"pitch": 64, "start": 0.0, "end": 0.5}"#).unwrap();
        assert_eq!(note.velocity, 100);
        assert_eq!(note.pitch, 64);
    }
}
