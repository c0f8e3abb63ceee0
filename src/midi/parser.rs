// MIDI file parser with sustain pedal support

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;

use super::MidiError;
use crate::notes::{NoteCollection, NoteEvent, DEFAULT_TEMPO, DEFAULT_TIME_SIGNATURE};

/// Default tempo when a file carries no tempo event (120 BPM)
const DEFAULT_MICROSECONDS_PER_BEAT: u32 = 500_000;

/// Controller number of the damper pedal
const SUSTAIN_CONTROLLER: u8 = 64;

/// Pedal values at or above this count as down
const SUSTAIN_THRESHOLD: u8 = 32;

#[derive(Debug, Clone)]
struct TickNote {
    pitch: u8,
    velocity: u8,
    start_tick: u64,
    end_tick: u64,
}

#[derive(Debug, Clone)]
pub struct TempoEvent {
    pub tick: u64,
    pub microseconds_per_beat: u32,
}

/// A note whose key is down, or up but still ringing under the pedal
#[derive(Debug, Clone, Copy)]
struct OpenNote {
    velocity: u8,
    start_tick: u64,
}

/// Note state of one track.
///
/// Each key keeps its open notes oldest first, so a second note-on for a key
/// that is already down opens another note and each note-off closes the
/// oldest one. A writer that emits same-pitch notes in onset order therefore
/// reads back with every start and end in place.
#[derive(Debug, Default)]
struct TrackNotes {
    /// (channel, pitch) -> keys down, oldest first
    held: HashMap<(u8, u8), VecDeque<OpenNote>>,
    /// (channel, pitch) -> released while the pedal was down
    ringing: HashMap<(u8, u8), Vec<OpenNote>>,
    pedal_down: HashSet<u8>,
    closed: Vec<TickNote>,
}

impl TrackNotes {
    fn close(&mut self, pitch: u8, note: OpenNote, end_tick: u64) {
        self.closed.push(TickNote {
            pitch,
            velocity: note.velocity,
            start_tick: note.start_tick,
            end_tick: end_tick.max(note.start_tick),
        });
    }

    fn note_on(&mut self, channel: u8, pitch: u8, velocity: u8, tick: u64) {
        // Striking the key again damps whatever still rings from earlier strikes
        if let Some(ringing) = self.ringing.remove(&(channel, pitch)) {
            for note in ringing {
                self.close(pitch, note, tick);
            }
        }
        self.held
            .entry((channel, pitch))
            .or_default()
            .push_back(OpenNote { velocity, start_tick: tick });
    }

    fn note_off(&mut self, channel: u8, pitch: u8, tick: u64) {
        let Some(note) = self.held.get_mut(&(channel, pitch)).and_then(|q| q.pop_front()) else {
            return;
        };
        if self.pedal_down.contains(&channel) {
            self.ringing.entry((channel, pitch)).or_default().push(note);
        } else {
            self.close(pitch, note, tick);
        }
    }

    fn pedal(&mut self, channel: u8, down: bool, tick: u64) {
        if down {
            self.pedal_down.insert(channel);
            return;
        }
        if !self.pedal_down.remove(&channel) {
            return;
        }
        let released: Vec<(u8, u8)> = self.ringing.keys()
            .filter(|(ch, _)| *ch == channel)
            .copied()
            .collect();
        for key in released {
            if let Some(notes) = self.ringing.remove(&key) {
                for note in notes {
                    self.close(key.1, note, tick);
                }
            }
        }
    }

    /// Close everything still open at the track's last tick.
    fn finish(mut self, tick: u64) -> Vec<TickNote> {
        let held: Vec<((u8, u8), VecDeque<OpenNote>)> = self.held.drain().collect();
        let ringing: Vec<((u8, u8), Vec<OpenNote>)> = self.ringing.drain().collect();
        for ((_, pitch), notes) in held {
            for note in notes {
                self.close(pitch, note, tick);
            }
        }
        for ((_, pitch), notes) in ringing {
            for note in notes {
                self.close(pitch, note, tick);
            }
        }
        self.closed
    }
}

/// Convert a tick position to seconds using the tempo map.
pub fn tick_to_seconds(tick: u64, ticks_per_beat: u16, tempo_map: &[TempoEvent]) -> f64 {
    let tpb = ticks_per_beat as f64;
    let mut seconds = 0.0;
    let mut last_tick = 0u64;
    let mut usec_per_beat = DEFAULT_MICROSECONDS_PER_BEAT as f64;

    for te in tempo_map {
        if te.tick >= tick {
            break;
        }
        let delta_ticks = te.tick - last_tick;
        seconds += (delta_ticks as f64 / tpb) * (usec_per_beat / 1_000_000.0);
        last_tick = te.tick;
        usec_per_beat = te.microseconds_per_beat as f64;
    }

    let delta_ticks = tick - last_tick;
    seconds += (delta_ticks as f64 / tpb) * (usec_per_beat / 1_000_000.0);
    seconds
}

/// Parse a MIDI file from disk into a note collection.
pub fn parse_midi(path: &Path) -> Result<NoteCollection, MidiError> {
    let data = std::fs::read(path)?;
    parse_midi_bytes(&data)
}

/// Parse Standard MIDI File bytes into a note collection.
///
/// All tracks and channels are merged. The collection's tempo is the first
/// tempo event (120 BPM if there is none) while note times follow the full
/// tempo map.
pub fn parse_midi_bytes(data: &[u8]) -> Result<NoteCollection, MidiError> {
    use midly::{MetaMessage, MidiMessage, TrackEventKind};

    let smf = midly::Smf::parse(data)?;

    let ticks_per_beat = match smf.header.timing {
        midly::Timing::Metrical(tpb) => tpb.as_int().max(1),
        midly::Timing::Timecode(..) => return Err(MidiError::UnsupportedTiming),
    };

    let mut notes: Vec<TickNote> = Vec::new();
    let mut tempo_map: Vec<TempoEvent> = Vec::new();
    let mut time_signature: Option<(u64, u8, u8)> = None;

    for track in &smf.tracks {
        let mut tick: u64 = 0;
        let mut state = TrackNotes::default();

        for event in track {
            tick += event.delta.as_int() as u64;

            match event.kind {
                TrackEventKind::Meta(MetaMessage::Tempo(t)) => {
                    tempo_map.push(TempoEvent { tick, microseconds_per_beat: t.as_int() });
                }
                TrackEventKind::Meta(MetaMessage::TimeSignature(num, den_pow, _, _)) => {
                    let earliest = time_signature.map_or(true, |(at, _, _)| tick < at);
                    if earliest && num > 0 {
                        let denominator = 1u8.checked_shl(den_pow as u32).unwrap_or(DEFAULT_TIME_SIGNATURE.1);
                        time_signature = Some((tick, num, denominator));
                    }
                }
                TrackEventKind::Midi { channel, message } => {
                    let channel = channel.as_int();
                    match message {
                        MidiMessage::NoteOn { key, vel } if vel.as_int() > 0 => {
                            state.note_on(channel, key.as_int(), vel.as_int(), tick);
                        }
                        MidiMessage::NoteOn { key, .. } | MidiMessage::NoteOff { key, .. } => {
                            state.note_off(channel, key.as_int(), tick);
                        }
                        MidiMessage::Controller { controller, value }
                            if controller.as_int() == SUSTAIN_CONTROLLER =>
                        {
                            state.pedal(channel, value.as_int() >= SUSTAIN_THRESHOLD, tick);
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        notes.extend(state.finish(tick));
    }

    // Map iteration order is arbitrary; sort on the full note
    notes.sort_by_key(|n| (n.start_tick, n.pitch, n.end_tick, n.velocity));

    tempo_map.sort_by_key(|t| t.tick);
    tempo_map.dedup_by_key(|t| t.tick);

    let tempo = tempo_map.first()
        .filter(|t| t.microseconds_per_beat > 0)
        .map(|t| 60_000_000.0 / t.microseconds_per_beat as f64)
        .unwrap_or(DEFAULT_TEMPO);

    let (numerator, denominator) = time_signature
        .map(|(_, num, den)| (num, den))
        .unwrap_or(DEFAULT_TIME_SIGNATURE);

    let events = notes.iter().map(|n| NoteEvent {
        pitch: n.pitch,
        start: tick_to_seconds(n.start_tick, ticks_per_beat, &tempo_map),
        end: tick_to_seconds(n.end_tick, ticks_per_beat, &tempo_map),
        velocity: n.velocity,
    }).collect();

    log::debug!(
        "Parsed MIDI: {} tracks, {} notes, {} tempo events, {:.2} BPM, {}/{}",
        smf.tracks.len(),
        notes.len(),
        tempo_map.len(),
        tempo,
        numerator,
        denominator
    );

    Ok(NoteCollection {
        notes: events,
        tempo,
        time_signature_numerator: numerator,
        time_signature_denominator: denominator,
    })
}
