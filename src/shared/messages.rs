//! Events emitted by a play session for the presentation layer.

use crate::models::engine::NoteId;
use crate::models::stats::Judgement;
use crate::state::game::PlaybackState;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Note entered its lookahead window and should be shown.
    NoteActivated {
        note: NoteId,
        lane: u8,
        is_long: bool,
        tail_lane: u8,
        time_seconds: f64,
    },
    /// Note judged by an input.
    NoteHit {
        note: NoteId,
        lane: u8,
        judgement: Judgement,
        /// Signed, positive when the press was late.
        offset_seconds: f64,
        points: u32,
    },
    /// Note passed its hit window without input.
    LateMiss { note: NoteId, lane: u8 },
    /// Press on a lane with no note in range.
    EmptyPress { lane: u8 },
    /// Feedback for every accepted press, hit or not.
    LanePressed { lane: u8 },
    /// Active note hidden because playback stopped.
    NoteCleared { note: NoteId, lane: u8 },
    StateChanged(PlaybackState),
}
