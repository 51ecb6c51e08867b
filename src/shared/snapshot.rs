//! Render snapshots for inter-thread communication.
//!
//! Snapshots are immutable captures of session state sent from the logic
//! thread to whatever draws the grid.

use crate::models::engine::NoteId;
use crate::models::stats::{HitStats, Judgement};
use crate::state::game::PlaybackState;

/// A note currently shown on the grid.
#[derive(Clone, Debug, PartialEq)]
pub struct LiveNote {
    pub id: NoteId,
    pub lane: u8,
    pub tail_lane: u8,
    pub is_long: bool,
    pub time_seconds: f64,
    /// 0 when first shown, 1 when due.
    pub progress: f64,
}

#[derive(Clone, Debug)]
pub struct GameplaySnapshot {
    pub state: PlaybackState,
    /// Transport position in seconds.
    pub song_time: f64,
    /// `m:ss` display of `song_time`.
    pub time_label: String,
    pub bpm: f64,

    pub score: u64,
    pub accuracy: f64,
    pub hit_stats: HitStats,
    pub last_judgement: Option<Judgement>,
    pub last_offset_seconds: Option<f64>,

    pub live_notes: Vec<LiveNote>,
    pub judged: usize,
    pub total: usize,
    pub remaining: usize,
    /// No audio loaded.
    pub degraded: bool,
}

/// Formats seconds as `m:ss`, truncating fractions. Negative times show as `0:00`.
pub fn format_clock(seconds: f64) -> String {
    let whole = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    format!("{}:{:02}", whole / 60, whole % 60)
}
