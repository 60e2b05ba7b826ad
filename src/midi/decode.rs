//! Standard MIDI File decoding — note-on/off pairing into absolute-time note events.

use std::collections::HashMap;

use midly::{MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};

use super::MidiError;

/// Tempo assumed until the first tempo meta event (500 000 µs per quarter).
pub const DEFAULT_BPM: f64 = 120.0;

const MICROS_PER_MINUTE: f64 = 60_000_000.0;

/// One sounded note, in absolute ticks from the start of the file.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteEvent {
    pub midi_note_number: u8,
    pub start_ticks: u64,
    pub duration_ticks: u64,
    /// Tempo in effect when the note starts.
    pub tempo_bpm: f64,
}

/// A decoded file: only tracks that contain notes are kept.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedMidi {
    /// Declared pulses per quarter note, or `None` for SMPTE timing.
    pub ticks_per_quarter: Option<u16>,
    pub tracks: Vec<Vec<NoteEvent>>,
}

/// Parse an in-memory Standard MIDI File.
pub fn decode(bytes: &[u8]) -> Result<DecodedMidi, MidiError> {
    let smf = Smf::parse(bytes)?;
    let ticks_per_quarter = match smf.header.timing {
        Timing::Metrical(tpq) => Some(tpq.as_int()),
        Timing::Timecode(..) => None,
    };
    let tempo_map = TempoMap::from_smf(&smf);

    let tracks = smf
        .tracks
        .iter()
        .map(|track| pair_notes(track, &tempo_map))
        .filter(|events| !events.is_empty())
        .collect();

    Ok(DecodedMidi {
        ticks_per_quarter,
        tracks,
    })
}

/// Tempo changes from every track, sorted by absolute tick.
struct TempoMap {
    changes: Vec<(u64, f64)>,
}

impl TempoMap {
    fn from_smf(smf: &Smf<'_>) -> Self {
        let mut changes = Vec::new();
        for track in &smf.tracks {
            let mut tick = 0u64;
            for event in track {
                tick += u64::from(event.delta.as_int());
                if let TrackEventKind::Meta(MetaMessage::Tempo(us)) = event.kind {
                    let us = us.as_int();
                    if us > 0 {
                        changes.push((tick, MICROS_PER_MINUTE / f64::from(us)));
                    }
                }
            }
        }
        changes.sort_by_key(|&(tick, _)| tick);
        Self { changes }
    }

    fn bpm_at(&self, tick: u64) -> f64 {
        self.changes
            .iter()
            .take_while(|&&(t, _)| t <= tick)
            .last()
            .map_or(DEFAULT_BPM, |&(_, bpm)| bpm)
    }
}

/// Pair note-on/note-off messages of one track into ordered note events.
fn pair_notes(track: &[midly::TrackEvent<'_>], tempo_map: &TempoMap) -> Vec<NoteEvent> {
    let mut sounding: HashMap<(u8, u8), u64> = HashMap::new();
    let mut events = Vec::new();
    let mut tick = 0u64;

    let close = |key: u8, start: u64, end: u64, events: &mut Vec<NoteEvent>| {
        events.push(NoteEvent {
            midi_note_number: key,
            start_ticks: start,
            duration_ticks: end.saturating_sub(start),
            tempo_bpm: tempo_map.bpm_at(start),
        });
    };

    for event in track {
        tick += u64::from(event.delta.as_int());
        let TrackEventKind::Midi { channel, message } = event.kind else {
            continue;
        };
        let channel = channel.as_int();
        match message {
            MidiMessage::NoteOn { key, vel } if vel.as_int() > 0 => {
                let key = key.as_int();
                // A retrigger ends the note already sounding on this key.
                if let Some(start) = sounding.insert((channel, key), tick) {
                    close(key, start, tick, &mut events);
                }
            }
            MidiMessage::NoteOn { key, .. } | MidiMessage::NoteOff { key, .. } => {
                let key = key.as_int();
                if let Some(start) = sounding.remove(&(channel, key)) {
                    close(key, start, tick, &mut events);
                }
            }
            _ => {}
        }
    }

    for ((_, key), start) in sounding.drain() {
        close(key, start, tick, &mut events);
    }

    events.sort_by_key(|e| (e.start_ticks, e.midi_note_number));
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use midly::num::{u15, u24, u28, u4, u7};
    use midly::{Format, Header, Track, TrackEvent};

    fn ev(delta: u32, kind: TrackEventKind<'static>) -> TrackEvent<'static> {
        TrackEvent {
            delta: u28::new(delta),
            kind,
        }
    }

    fn on(delta: u32, key: u8, vel: u8) -> TrackEvent<'static> {
        ev(
            delta,
            TrackEventKind::Midi {
                channel: u4::new(0),
                message: MidiMessage::NoteOn {
                    key: u7::new(key),
                    vel: u7::new(vel),
                },
            },
        )
    }

    fn off(delta: u32, key: u8) -> TrackEvent<'static> {
        ev(
            delta,
            TrackEventKind::Midi {
                channel: u4::new(0),
                message: MidiMessage::NoteOff {
                    key: u7::new(key),
                    vel: u7::new(0),
                },
            },
        )
    }

    fn tempo(delta: u32, us: u32) -> TrackEvent<'static> {
        ev(delta, TrackEventKind::Meta(MetaMessage::Tempo(u24::new(us))))
    }

    fn end(delta: u32) -> TrackEvent<'static> {
        ev(delta, TrackEventKind::Meta(MetaMessage::EndOfTrack))
    }

    fn encode(format: Format, tracks: Vec<Track<'static>>) -> Vec<u8> {
        let mut smf = Smf::new(Header::new(format, Timing::Metrical(u15::new(96))));
        smf.tracks = tracks;
        let mut buf = Vec::new();
        smf.write(&mut buf).unwrap();
        buf
    }

    #[test]
    fn pairs_note_on_and_off() {
        let bytes = encode(
            Format::SingleTrack,
            vec![vec![tempo(0, 500_000), on(0, 69, 100), off(8, 69), end(0)]],
        );
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.ticks_per_quarter, Some(96));
        assert_eq!(decoded.tracks.len(), 1);
        assert_eq!(
            decoded.tracks[0],
            vec![NoteEvent {
                midi_note_number: 69,
                start_ticks: 0,
                duration_ticks: 8,
                tempo_bpm: 120.0,
            }]
        );
    }

    #[test]
    fn zero_velocity_note_on_is_note_off() {
        let bytes = encode(
            Format::SingleTrack,
            vec![vec![on(4, 60, 90), on(16, 60, 0), on(8, 62, 90), off(8, 62), end(0)]],
        );
        let decoded = decode(&bytes).unwrap();
        let events = &decoded.tracks[0];
        assert_eq!(events.len(), 2);
        assert_eq!((events[0].start_ticks, events[0].duration_ticks), (4, 16));
        assert_eq!((events[1].start_ticks, events[1].duration_ticks), (28, 8));
    }

    #[test]
    fn default_tempo_without_meta_event() {
        let bytes = encode(Format::SingleTrack, vec![vec![on(0, 60, 90), off(8, 60), end(0)]]);
        assert_eq!(decode(&bytes).unwrap().tracks[0][0].tempo_bpm, DEFAULT_BPM);
    }

    #[test]
    fn conductor_track_tempo_applies_to_melody() {
        let conductor = vec![tempo(0, 1_000_000), end(0)];
        let melody = vec![on(0, 60, 90), off(8, 60), end(0)];
        let decoded = decode(&encode(Format::Parallel, vec![conductor, melody])).unwrap();
        assert_eq!(decoded.tracks.len(), 1);
        assert_eq!(decoded.tracks[0][0].tempo_bpm, 60.0);
    }

    #[test]
    fn tempo_change_mid_track() {
        let track = vec![
            on(0, 60, 90),
            off(8, 60),
            tempo(0, 250_000),
            on(0, 62, 90),
            off(8, 62),
            end(0),
        ];
        let decoded = decode(&encode(Format::SingleTrack, vec![track])).unwrap();
        let events = &decoded.tracks[0];
        assert_eq!(events[0].tempo_bpm, 120.0);
        assert_eq!(events[1].tempo_bpm, 240.0);
    }

    #[test]
    fn unterminated_note_ends_at_track_end() {
        let track = vec![on(8, 64, 90), end(24)];
        let decoded = decode(&encode(Format::SingleTrack, vec![track])).unwrap();
        let events = &decoded.tracks[0];
        assert_eq!(events[0].start_ticks, 8);
        assert_eq!(events[0].duration_ticks, 24);
    }

    #[test]
    fn keeps_every_note_track() {
        let a = vec![on(0, 60, 90), off(8, 60), end(0)];
        let b = vec![on(0, 64, 90), off(8, 64), end(0)];
        let decoded = decode(&encode(Format::Parallel, vec![a, b])).unwrap();
        assert_eq!(decoded.tracks.len(), 2);
    }

    #[test]
    fn garbage_is_decode_error() {
        assert!(matches!(
            decode(b"not a midi file"),
            Err(MidiError::Decode(_))
        ));
    }
}
