//! Judgement tiers and per-session hit statistics.

/// Judgement tiers from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum Judgement {
    Perfect,
    Great,
    /// Note passed its hit window untouched.
    Miss,
}

impl Judgement {
    /// Score awarded for this tier.
    pub fn points(self) -> u32 {
        match self {
            Judgement::Perfect => 300,
            Judgement::Great => 200,
            Judgement::Miss => 0,
        }
    }
}

impl std::fmt::Display for Judgement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Judgement::Perfect => write!(f, "PERFECT"),
            Judgement::Great => write!(f, "GREAT"),
            Judgement::Miss => write!(f, "MISS"),
        }
    }
}

/// Accumulated hit statistics for a play session.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct HitStats {
    pub perfect: u32,
    pub great: u32,
    pub miss: u32,
    /// Presses that found no note in range. Not counted against accuracy.
    pub empty_press: u32,
}

impl HitStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, judgement: Judgement) {
        match judgement {
            Judgement::Perfect => self.perfect += 1,
            Judgement::Great => self.great += 1,
            Judgement::Miss => self.miss += 1,
        }
    }

    /// Number of notes that received a judgement.
    pub fn judged(&self) -> u32 {
        self.perfect + self.great + self.miss
    }

    /// Accuracy percentage (0-100), weighting each tier by its points.
    pub fn calculate_accuracy(&self) -> f64 {
        let total = self.judged() as f64;
        if total == 0.0 {
            return 0.0;
        }
        let earned = self.perfect as f64 * 300.0 + self.great as f64 * 200.0;
        (earned / (total * 300.0)) * 100.0
    }
}
