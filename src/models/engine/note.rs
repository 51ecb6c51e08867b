//! Runtime note state for one play session.

use crate::models::chart::Note;

/// Index of a note in chart order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoteId(pub usize);

/// Lifecycle of a note during play.
///
/// `Pending -> Active -> {Hit | Expired}`; the last two are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteState {
    /// Not yet visible.
    Pending,
    /// Visible and hittable.
    Active,
    /// Judged by an input.
    Hit,
    /// Passed its hit window without being judged.
    Expired,
}

impl NoteState {
    pub fn is_terminal(self) -> bool {
        matches!(self, NoteState::Hit | NoteState::Expired)
    }
}

/// A chart note paired with its resolved time and mutable play state.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayableNote {
    pub id: NoteId,
    pub note: Note,
    /// When the note should be hit (seconds).
    pub time_seconds: f64,
    /// When a hold ends; equal to `time_seconds` for taps.
    pub end_seconds: f64,
    pub state: NoteState,
}

impl PlayableNote {
    pub fn new(id: NoteId, note: Note, time_seconds: f64, end_seconds: f64) -> Self {
        Self {
            id,
            note,
            time_seconds,
            end_seconds,
            state: NoteState::Pending,
        }
    }

    pub fn lane(&self) -> u8 {
        self.note.lane
    }

    pub fn is_long(&self) -> bool {
        self.note.is_long()
    }

    pub fn is_hit(&self) -> bool {
        self.state == NoteState::Hit
    }

    pub fn is_active(&self) -> bool {
        self.state == NoteState::Active
    }

    /// Puts the note back to `Pending` for a new session.
    pub fn reset(&mut self) {
        self.state = NoteState::Pending;
    }
}
