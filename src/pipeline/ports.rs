// Seams between the pipeline and its external collaborators

use std::path::Path;
use serde::{Deserialize, Serialize};

use super::PipelineError;
use crate::midi::MidiError;
use crate::notes::NoteCollection;

/// Audio recording -> raw note events + tempo (an ML engine in practice)
pub trait Transcriber {
    fn transcribe(&self, audio_path: &Path) -> Result<NoteCollection, PipelineError>;
}

/// Notation document and MIDI export, both produced from one collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedScore {
    /// MusicXML document
    pub musicxml: String,
    /// Standard MIDI File re-encoded from the same score
    pub midi: Vec<u8>,
}

/// Turns a simplified collection into notation.
///
/// Implementations must derive both outputs from the collection they are
/// given so the rendered notation and the exported MIDI agree.
pub trait ScoreRenderer {
    fn render(&self, collection: &NoteCollection) -> Result<RenderedScore, PipelineError>;
}

/// MIDI serialization used at the transport boundary
pub trait MidiProcessor {
    fn to_base64(&self, collection: &NoteCollection) -> Result<String, MidiError>;
    fn from_base64(&self, midi_base64: &str) -> Result<NoteCollection, MidiError>;
    fn detect_tempo(&self, collection: &NoteCollection) -> f64;
}

/// Pipeline stage reported in progress events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Transcription,
    Preprocessing,
    Simplification,
    Rendering,
    Complete,
}

/// Progress notification, forwarded to clients as-is
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub step: Step,
    pub progress_percent: u8,
    pub message: String,
}

impl ProgressEvent {
    pub fn new(step: Step, progress_percent: u8, message: impl Into<String>) -> Self {
        Self {
            step,
            progress_percent,
            message: message.into(),
        }
    }
}
