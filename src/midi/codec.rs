// Base64 MIDI codec backing the pipeline's MidiProcessor port

use base64::Engine;

use super::{parse_midi_bytes, write_midi_bytes, MidiError};
use crate::notes::NoteCollection;
use crate::pipeline::MidiProcessor;

/// Converts note collections to and from base64-encoded MIDI files
#[derive(Debug, Clone, Copy, Default)]
pub struct MidiCodec;

impl MidiProcessor for MidiCodec {
    fn to_base64(&self, collection: &NoteCollection) -> Result<String, MidiError> {
        let bytes = write_midi_bytes(collection)?;
        Ok(base64::engine::general_purpose::STANDARD.encode(bytes))
    }

    fn from_base64(&self, midi_base64: &str) -> Result<NoteCollection, MidiError> {
        let bytes = base64::engine::general_purpose::STANDARD.decode(midi_base64.trim())?;
        parse_midi_bytes(&bytes)
    }

    fn detect_tempo(&self, collection: &NoteCollection) -> f64 {
        collection.tempo
    }
}
