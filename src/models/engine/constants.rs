/// Number of grid cells (4x4) a note can occupy.
pub const LANE_COUNT: usize = 16;

/// Number of valid long note tail positions.
pub const TAIL_POSITIONS: usize = 6;

/// Default seconds a note is visible before its hit time.
pub const DEFAULT_LOOKAHEAD_SECONDS: f64 = 1.0;

/// Default tolerance around a note's time during which input can judge it.
pub const DEFAULT_HIT_WINDOW_SECONDS: f64 = 0.1;

/// Default upper bound (exclusive) of the Perfect tier.
pub const DEFAULT_PERFECT_SECONDS: f64 = 0.05;

/// Default chart resolution in ticks per beat.
pub const DEFAULT_RESOLUTION: u32 = 240;

/// Default tempo when a song declares none.
pub const DEFAULT_BPM: f64 = 120.0;
