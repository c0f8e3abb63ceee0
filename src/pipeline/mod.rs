// Pipeline orchestration: transcribe -> preprocess -> simplify -> render
//
// The heavy collaborators (transcription engine, notation renderer) sit
// behind the traits in `ports`; this module only sequences them.

pub mod ports;
pub mod jobs;

pub use ports::*;
pub use jobs::*;

use crate::midi::MidiError;

/// Error type for pipeline runs
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("Rendering failed: {0}")]
    Rendering(String),

    #[error("Invalid MIDI: {0}")]
    Midi(#[from] MidiError),
}

impl PipelineError {
    /// Stable code reported to clients alongside the message
    pub fn code(&self) -> &'static str {
        match self {
            PipelineError::Transcription(_) => "TRANSCRIPTION_ERROR",
            PipelineError::Rendering(_) => "RENDERING_ERROR",
            PipelineError::Midi(_) => "INVALID_MIDI",
        }
    }
}
