//! Session state.
//!
//! `GameSession` owns one chart's playback: transport control, note
//! scheduling and judging.

pub mod game;

pub use game::{GameSession, JudgmentEngine, JudgmentResult, NoteScheduler, PlaybackState};
