// Standard MIDI File writer for note collections

use super::MidiError;
use crate::notes::NoteCollection;

/// MIDI timing: 480 ticks per quarter note
pub const TICKS_PER_QUARTER: u16 = 480;

/// General MIDI program 0, acoustic grand piano
const PIANO_PROGRAM: u8 = 0;
const TRACK_NAME: &[u8] = b"Piano";
const NOTE_OFF_VELOCITY: u8 = 64;

/// Largest value a 24-bit tempo field can hold
const MAX_MICROSECONDS_PER_BEAT: f64 = 0xFF_FFFF as f64;

/// Events sharing a tick are written in this order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum EventOrder {
    NoteOff,
    NoteOn,
}

/// Encode a collection as a format 0 SMF with a single piano track.
///
/// Times are converted to ticks at the collection's tempo. At equal ticks
/// note offs come before note ons so repeated keys re-strike cleanly, and
/// same-pitch note ons are ordered by their end so a reader that closes the
/// oldest open note first pairs every off with its own on.
pub fn write_midi_bytes(collection: &NoteCollection) -> Result<Vec<u8>, MidiError> {
    let tempo_us = (60_000_000.0 / collection.tempo).round();
    if !(1.0..=MAX_MICROSECONDS_PER_BEAT).contains(&tempo_us) {
        return Err(MidiError::OutOfRange { what: "tempo", value: collection.tempo });
    }

    let numerator = collection.time_signature_numerator;
    let denominator = collection.time_signature_denominator;
    if numerator == 0 || !denominator.is_power_of_two() {
        return Err(MidiError::InvalidTimeSignature { numerator, denominator });
    }

    let ticks_per_second = collection.tempo / 60.0 * TICKS_PER_QUARTER as f64;
    let to_tick = |seconds: f64| (seconds.max(0.0) * ticks_per_second).round() as u64;

    // (tick, order, tie-break, message)
    let mut events: Vec<(u64, EventOrder, u64, [u8; 3])> = Vec::with_capacity(collection.notes.len() * 2);
    for note in &collection.notes {
        if note.pitch > 127 {
            return Err(MidiError::OutOfRange { what: "pitch", value: note.pitch as f64 });
        }
        if note.velocity > 127 {
            return Err(MidiError::OutOfRange { what: "velocity", value: note.velocity as f64 });
        }

        let start_tick = to_tick(note.start);
        let end_tick = to_tick(note.end).max(start_tick + 1);
        events.push((start_tick, EventOrder::NoteOn, end_tick, [0x90, note.pitch, note.velocity]));
        events.push((end_tick, EventOrder::NoteOff, start_tick, [0x80, note.pitch, NOTE_OFF_VELOCITY]));
    }
    events.sort_by_key(|(tick, order, tie, data)| (*tick, *order, data[1], *tie));

    // Track data: name, tempo, time signature, program, notes, end of track
    let mut track: Vec<u8> = Vec::new();
    track.push(0x00);
    track.extend_from_slice(&[0xFF, 0x03, TRACK_NAME.len() as u8]);
    track.extend_from_slice(TRACK_NAME);

    let tempo_bytes = (tempo_us as u32).to_be_bytes();
    track.extend_from_slice(&[0x00, 0xFF, 0x51, 0x03]);
    track.extend_from_slice(&tempo_bytes[1..]);

    let denominator_power = denominator.trailing_zeros() as u8;
    track.extend_from_slice(&[0x00, 0xFF, 0x58, 0x04, numerator, denominator_power, 24, 8]);

    track.extend_from_slice(&[0x00, 0xC0, PIANO_PROGRAM]);

    let mut last_tick = 0u64;
    for (tick, _, _, data) in &events {
        let delta = tick - last_tick;
        last_tick = *tick;
        let delta = u32::try_from(delta)
            .map_err(|_| MidiError::OutOfRange { what: "note time", value: delta as f64 })?;
        track.extend_from_slice(&encode_variable_length(delta));
        track.extend_from_slice(data);
    }

    // End-of-track: delta=0, meta event FF 2F 00
    track.extend_from_slice(&[0x00, 0xFF, 0x2F, 0x00]);

    let mut bytes = Vec::with_capacity(22 + track.len());
    bytes.extend_from_slice(b"MThd");
    bytes.extend_from_slice(&[0, 0, 0, 6]); // Header length
    bytes.extend_from_slice(&[0, 0]);       // Format 0
    bytes.extend_from_slice(&[0, 1]);       // 1 track
    bytes.extend_from_slice(&TICKS_PER_QUARTER.to_be_bytes());
    bytes.extend_from_slice(b"MTrk");
    bytes.extend_from_slice(&(track.len() as u32).to_be_bytes());
    bytes.extend_from_slice(&track);

    log::debug!("Encoded {} notes into {} MIDI bytes", collection.note_count(), bytes.len());

    Ok(bytes)
}

/// Encode a value as MIDI variable-length quantity.
fn encode_variable_length(mut value: u32) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(4);
    bytes.push((value & 0x7F) as u8);
    value >>= 7;
    while value > 0 {
        bytes.push(((value & 0x7F) | 0x80) as u8);
        value >>= 7;
    }
    bytes.reverse();
    bytes
}
