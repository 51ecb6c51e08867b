//! Hit window thresholds and tier classification.

use super::constants::{DEFAULT_HIT_WINDOW_SECONDS, DEFAULT_PERFECT_SECONDS};
use crate::models::stats::Judgement;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitWindow {
    /// Deltas strictly below this are Perfect.
    pub perfect_seconds: f64,
    /// Largest delta that still judges a note (inclusive).
    pub window_seconds: f64,
}

impl HitWindow {
    /// Defaults: Perfect under 50ms, Great up to 100ms.
    pub fn new() -> Self {
        Self {
            perfect_seconds: DEFAULT_PERFECT_SECONDS,
            window_seconds: DEFAULT_HIT_WINDOW_SECONDS,
        }
    }

    pub fn from_custom(perfect_seconds: f64, window_seconds: f64) -> Self {
        Self {
            perfect_seconds,
            window_seconds,
        }
    }

    /// Whether an absolute timing delta is inside the window.
    #[inline]
    pub fn contains(&self, delta_seconds: f64) -> bool {
        delta_seconds.abs() <= self.window_seconds
    }

    /// Classifies a timing delta. `None` means the delta is outside the window.
    pub fn judge(&self, delta_seconds: f64) -> Option<Judgement> {
        let abs_delta = delta_seconds.abs();
        if abs_delta > self.window_seconds {
            return None;
        }
        if abs_delta < self.perfect_seconds {
            Some(Judgement::Perfect)
        } else {
            Some(Judgement::Great)
        }
    }
}

impl Default for HitWindow {
    fn default() -> Self {
        Self::new()
    }
}
