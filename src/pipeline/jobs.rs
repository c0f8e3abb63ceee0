// Transcribe and re-simplify jobs
//
// Both jobs run preprocess -> simplify -> render. They hold their
// collaborators by reference and keep no state between runs, so one job value
// can serve any number of requests.

use std::path::Path;
use base64::Engine;
use serde::{Deserialize, Serialize};

use super::ports::{MidiProcessor, ProgressEvent, ScoreRenderer, Step, Transcriber};
use super::PipelineError;
use crate::notes::{Difficulty, NoteCollection};
use crate::simplification::simplify;
use crate::transcription::preprocess;

/// Summary of the simplified score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionMetadata {
    pub duration_seconds: f64,
    pub note_count: usize,
    pub tempo: f64,
    pub difficulty: Difficulty,
}

impl TranscriptionMetadata {
    pub fn from_collection(collection: &NoteCollection, difficulty: Difficulty) -> Self {
        Self {
            duration_seconds: collection.duration(),
            note_count: collection.note_count(),
            tempo: collection.tempo,
            difficulty,
        }
    }
}

/// Final output handed back to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionResult {
    pub musicxml: String,
    pub midi_base64: String,
    pub metadata: TranscriptionMetadata,
}

/// Preprocess, simplify and render; shared tail of both jobs
fn simplify_and_render(
    renderer: &dyn ScoreRenderer,
    raw: &NoteCollection,
    difficulty: Difficulty,
    on_progress: &mut dyn FnMut(ProgressEvent),
) -> Result<TranscriptionResult, PipelineError> {
    on_progress(ProgressEvent::new(Step::Preprocessing, 60, "Quantizing notes"));
    let preprocessed = preprocess(raw);
    log::info!("Preprocessing done: {} -> {} notes", raw.note_count(), preprocessed.note_count());

    on_progress(ProgressEvent::new(Step::Simplification, 75, format!("Simplifying to {}", difficulty)));
    let simplified = simplify(&preprocessed, difficulty);
    log::info!(
        "Simplification done ({}): {} -> {} notes",
        difficulty,
        preprocessed.note_count(),
        simplified.note_count()
    );

    on_progress(ProgressEvent::new(Step::Rendering, 90, "Rendering score"));
    let rendered = renderer.render(&simplified)?;
    log::info!("Rendered score ({} bytes MusicXML, {} bytes MIDI)", rendered.musicxml.len(), rendered.midi.len());

    on_progress(ProgressEvent::new(Step::Complete, 100, "Done"));

    Ok(TranscriptionResult {
        musicxml: rendered.musicxml,
        midi_base64: base64::engine::general_purpose::STANDARD.encode(&rendered.midi),
        metadata: TranscriptionMetadata::from_collection(&simplified, difficulty),
    })
}

/// Audio file -> simplified score
pub struct TranscribeJob<'a> {
    transcriber: &'a dyn Transcriber,
    renderer: &'a dyn ScoreRenderer,
}

impl<'a> TranscribeJob<'a> {
    pub fn new(transcriber: &'a dyn Transcriber, renderer: &'a dyn ScoreRenderer) -> Self {
        Self { transcriber, renderer }
    }

    /// Run the full pipeline, reporting each stage to `on_progress`.
    pub fn run(
        &self,
        audio_path: &Path,
        difficulty: Difficulty,
        on_progress: &mut dyn FnMut(ProgressEvent),
    ) -> Result<TranscriptionResult, PipelineError> {
        let name = audio_path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        log::info!("Transcription started: {}", name);
        on_progress(ProgressEvent::new(Step::Transcription, 10, "Transcribing audio"));
        let raw = self.transcriber.transcribe(audio_path)?;
        log::info!("Transcription done: {} notes detected", raw.note_count());

        simplify_and_render(self.renderer, &raw, difficulty, on_progress)
    }
}

/// Previously exported MIDI -> the same score at another difficulty
pub struct SimplifyJob<'a> {
    midi: &'a dyn MidiProcessor,
    renderer: &'a dyn ScoreRenderer,
}

impl<'a> SimplifyJob<'a> {
    pub fn new(midi: &'a dyn MidiProcessor, renderer: &'a dyn ScoreRenderer) -> Self {
        Self { midi, renderer }
    }

    /// Decode, re-preprocess (a no-op on already gridded data) and simplify.
    pub fn run(&self, midi_base64: &str, difficulty: Difficulty) -> Result<TranscriptionResult, PipelineError> {
        let decoded = self.midi.from_base64(midi_base64)?;
        log::info!(
            "Decoded MIDI: {} notes at {:.2} BPM",
            decoded.note_count(),
            self.midi.detect_tempo(&decoded)
        );

        simplify_and_render(self.renderer, &decoded, difficulty, &mut |_| {})
    }
}
