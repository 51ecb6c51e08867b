//! Snapshot creation for GameSession.

use super::GameSession;
use crate::logic::transport::Transport;
use crate::shared::snapshot::{GameplaySnapshot, LiveNote, format_clock};

impl<T: Transport> GameSession<T> {
    /// Captures the current session state for display.
    pub fn snapshot(&self) -> GameplaySnapshot {
        let live_notes = self
            .scheduler
            .active()
            .map(|n| LiveNote {
                id: n.id,
                lane: n.lane(),
                tail_lane: n.note.tail_lane,
                is_long: n.is_long(),
                time_seconds: n.time_seconds,
                progress: self.scheduler.progress(n.id, self.song_time).unwrap_or(0.0),
            })
            .collect();

        let judged = self.scheduler.judged_count();
        let total = self.scheduler.len();
        let hit_stats = self.judge.hit_stats().clone();

        GameplaySnapshot {
            state: self.state,
            song_time: self.song_time,
            time_label: format_clock(self.song_time),
            bpm: self.chart.tempo.bpm_at_seconds(self.song_time),
            score: self.judge.score(),
            accuracy: hit_stats.calculate_accuracy(),
            hit_stats,
            last_judgement: self.judge.last_judgement(),
            last_offset_seconds: self.judge.last_offset_seconds(),
            live_notes,
            judged,
            total,
            remaining: total - judged,
            degraded: self.is_degraded(),
        }
    }
}
