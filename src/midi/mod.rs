// MIDI container codec
//
// Standard MIDI File bytes <-> note collections, plus the base64 form used
// when MIDI travels inside JSON payloads.

pub mod parser;
pub mod writer;
pub mod codec;

pub use parser::{parse_midi, parse_midi_bytes, tick_to_seconds, TempoEvent};
pub use writer::{write_midi_bytes, TICKS_PER_QUARTER};
pub use codec::MidiCodec;

/// Error type for MIDI operations
#[derive(Debug, thiserror::Error)]
pub enum MidiError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("MIDI parse error: {0}")]
    Parse(#[from] midly::Error),

    #[error("SMPTE timecode timing is not supported")]
    UnsupportedTiming,

    #[error("Invalid time signature {numerator}/{denominator}")]
    InvalidTimeSignature { numerator: u8, denominator: u8 },

    #[error("{what} out of range: {value}")]
    OutOfRange { what: &'static str, value: f64 },

    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
}
