//! Rest insertion — MIDI has no rest events, so gaps between notes become explicit rests.

use super::types::MotifNote;

/// Fill every gap in `notes` with a rest so the timeline runs contiguously from beat 1.
///
/// `notes` must be ordered by `starting_beat`. A note that starts before its
/// predecessor ends cuts the predecessor short, keeping the line monophonic.
pub fn insert_rests(notes: Vec<MotifNote>) -> Vec<MotifNote> {
    let mut filled: Vec<MotifNote> = Vec::with_capacity(notes.len() * 2);
    let mut expected_beat = 1;

    for note in notes {
        if note.starting_beat > expected_beat {
            filled.push(MotifNote::rest(
                expected_beat,
                note.starting_beat - expected_beat,
            ));
        } else if note.starting_beat < expected_beat {
            if let Some(prev) = filled.last_mut() {
                log::debug!(
                    "note at beat {} overlaps previous note, clipping it",
                    note.starting_beat
                );
                prev.note.duration = note.starting_beat.saturating_sub(prev.starting_beat);
            }
        }
        expected_beat = note.end_beat();
        filled.push(note);
    }

    filled
}
