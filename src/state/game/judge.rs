//! Judgment of inputs against live notes, and score keeping.

use super::notes::NoteScheduler;
use crate::models::engine::{HitWindow, NoteId};
use crate::models::stats::{HitStats, Judgement};

/// Outcome of one press.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JudgmentResult {
    /// A note was consumed.
    Hit {
        note: NoteId,
        lane: u8,
        judgement: Judgement,
        /// Signed input offset, positive when late.
        offset_seconds: f64,
        points: u32,
    },
    /// No active note on this lane was in range.
    Miss { lane: u8 },
}

/// Classifies presses into tiers and accumulates the session score.
pub struct JudgmentEngine {
    hit_window: HitWindow,
    score: u64,
    hit_stats: HitStats,
    last_judgement: Option<Judgement>,
    last_offset_seconds: Option<f64>,
}

impl JudgmentEngine {
    pub fn new(hit_window: HitWindow) -> Self {
        Self {
            hit_window,
            score: 0,
            hit_stats: HitStats::new(),
            last_judgement: None,
            last_offset_seconds: None,
        }
    }

    /// Judges a press on `lane` at time `t`. At most one note is consumed.
    pub fn judge(&mut self, notes: &mut NoteScheduler, lane: u8, t: f64) -> JudgmentResult {
        let candidate = notes
            .find_hittable(lane, t, self.hit_window.window_seconds)
            .and_then(|id| notes.get(id).map(|n| (id, t - n.time_seconds)));

        let Some((id, offset)) = candidate else {
            self.hit_stats.empty_press += 1;
            return JudgmentResult::Miss { lane };
        };
        let Some(judgement) = self.hit_window.judge(offset) else {
            self.hit_stats.empty_press += 1;
            return JudgmentResult::Miss { lane };
        };
        if !notes.mark_hit(id) {
            self.hit_stats.empty_press += 1;
            return JudgmentResult::Miss { lane };
        }

        let points = self.apply_judgement(judgement);
        self.last_offset_seconds = Some(offset);
        JudgmentResult::Hit {
            note: id,
            lane,
            judgement,
            offset_seconds: offset,
            points,
        }
    }

    /// Records auto-misses for notes the scheduler expired.
    pub fn record_expired(&mut self, expired: &[NoteId]) {
        for _ in expired {
            self.apply_judgement(Judgement::Miss);
        }
        if !expired.is_empty() {
            self.last_offset_seconds = None;
        }
    }

    fn apply_judgement(&mut self, judgement: Judgement) -> u32 {
        let points = judgement.points();
        self.hit_stats.record(judgement);
        self.score += u64::from(points);
        self.last_judgement = Some(judgement);
        points
    }

    /// Clears score and statistics for a new session.
    pub fn reset(&mut self) {
        self.score = 0;
        self.hit_stats = HitStats::new();
        self.last_judgement = None;
        self.last_offset_seconds = None;
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn hit_stats(&self) -> &HitStats {
        &self.hit_stats
    }

    pub fn hit_window(&self) -> HitWindow {
        self.hit_window
    }

    pub fn last_judgement(&self) -> Option<Judgement> {
        self.last_judgement
    }

    pub fn last_offset_seconds(&self) -> Option<f64> {
        self.last_offset_seconds
    }
}
