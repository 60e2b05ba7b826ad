//! Track mapping — decoded note events to a rest-filled [`Motif`].

use crate::error::ConvertError;
use crate::motif::{insert_rests, Motif, MotifNote, Note, Quantizer, Tempo, TimeSignature};
use crate::pitch::{PitchError, PitchTable};

use super::decode::NoteEvent;
use super::MidiError;

/// Maps one decoded track onto the pitch table's beat grid.
#[derive(Debug, Clone, Copy)]
pub struct TrackMapper<'a> {
    table: &'a PitchTable,
    quantizer: Quantizer,
    pitch_offset: i32,
    time_signature: TimeSignature,
}

impl<'a> TrackMapper<'a> {
    pub fn new(
        table: &'a PitchTable,
        quantizer: Quantizer,
        pitch_offset: i32,
        time_signature: TimeSignature,
    ) -> Self {
        Self {
            table,
            quantizer,
            pitch_offset,
            time_signature,
        }
    }

    /// Pitch table value for a MIDI note number.
    pub fn pitch_value(&self, midi_note_number: u8) -> i32 {
        i32::from(midi_note_number) + self.pitch_offset
    }

    /// Build a motif from a time-ordered track.
    ///
    /// The first event's tempo applies to the whole motif.
    pub fn map_track(&self, events: &[NoteEvent]) -> Result<Motif, ConvertError> {
        let first = events.first().ok_or(MidiError::EmptyTrack)?;
        let tempo = Tempo::bpm(first.tempo_bpm as i32);

        let notes = events
            .iter()
            .map(|event| self.map_event(event))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Motif {
            tempo,
            time_signature: self.time_signature,
            notes: insert_rests(notes),
            ..Motif::default()
        })
    }

    fn map_event(&self, event: &NoteEvent) -> Result<MotifNote, PitchError> {
        log::debug!("MIDI event: {event:?}");
        let value = self.pitch_value(event.midi_note_number);
        // Negative values denote rests, so a sounded note must land inside the table.
        if value < 1 {
            return Err(PitchError::OutOfRange {
                value,
                max: self.table.pitches().len(),
            });
        }
        let duration = self.quantizer.ticks_to_beats(event.duration_ticks);
        let note = Note::new(value, duration, self.table)?;
        Ok(MotifNote::new(
            note,
            self.quantizer.starting_beat(event.start_ticks),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MotivicConfig;

    fn table() -> PitchTable {
        PitchTable::build(&MotivicConfig::equal_temperament(440.0, 9)).unwrap()
    }

    fn event(key: u8, start: u64, duration: u64) -> NoteEvent {
        NoteEvent {
            midi_note_number: key,
            start_ticks: start,
            duration_ticks: duration,
            tempo_bpm: 120.0,
        }
    }

    fn mapper(table: &PitchTable) -> TrackMapper<'_> {
        TrackMapper::new(
            table,
            Quantizer::new(8).unwrap(),
            -11,
            TimeSignature::default(),
        )
    }

    #[test]
    fn empty_track_fails() {
        let t = table();
        assert!(matches!(
            mapper(&t).map_track(&[]),
            Err(ConvertError::Midi(MidiError::EmptyTrack))
        ));
    }

    #[test]
    fn a4_maps_to_value_58() {
        let t = table();
        let motif = mapper(&t).map_track(&[event(69, 0, 8)]).unwrap();
        assert_eq!(motif.notes.len(), 1);
        let n = &motif.notes[0];
        assert_eq!(n.note.value, 58);
        assert_eq!(n.note.pitch, "A4");
        assert_eq!(n.starting_beat, 1);
        assert_eq!(n.note.duration, 1);
        assert_eq!(motif.tempo, Tempo::bpm(120));
        assert_eq!(motif.time_signature, TimeSignature { beat: 4, unit: 4 });
    }

    #[test]
    fn gap_between_notes_becomes_rest() {
        let t = table();
        let motif = mapper(&t)
            .map_track(&[event(60, 0, 16), event(62, 40, 8)])
            .unwrap();
        assert_eq!(motif.notes.len(), 3);
        assert!(motif.notes[1].note.is_rest());
        assert_eq!(motif.notes[1].starting_beat, 3);
        assert_eq!(motif.notes[1].note.duration, 3);
        assert_eq!(motif.notes[2].starting_beat, 6);
    }

    #[test]
    fn tempo_taken_from_first_event() {
        let t = table();
        let mut second = event(62, 8, 8);
        second.tempo_bpm = 60.0;
        let mut first = event(60, 0, 8);
        first.tempo_bpm = 97.9;
        let motif = mapper(&t).map_track(&[first, second]).unwrap();
        assert_eq!(motif.tempo.units, 97);
    }

    #[test]
    fn notes_below_table_are_out_of_range() {
        let t = table();
        assert!(matches!(
            mapper(&t).map_track(&[event(10, 0, 8)]),
            Err(ConvertError::Pitch(PitchError::OutOfRange { value: -1, .. }))
        ));
    }

    #[test]
    fn notes_above_table_are_out_of_range() {
        let t = table();
        assert!(matches!(
            mapper(&t).map_track(&[event(127, 0, 8)]),
            Err(ConvertError::Pitch(PitchError::OutOfRange { value: 116, .. }))
        ));
    }
}
