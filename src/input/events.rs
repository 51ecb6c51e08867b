//! Commands accepted by a play session.

/// Discrete commands processed by the playback state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameAction {
    /// Press on a grid cell at a transport timestamp (seconds).
    Hit { lane: u8, time: f64 },
    Start,
    Pause,
    Resume,
    TogglePause,
    /// Start when idle, otherwise toggle pause.
    PlayPause,
    Stop,
    Restart,
}

/// Key press captured by the front end, timestamped on the song clock.
#[derive(Debug, Clone, PartialEq)]
pub struct RawKeyEvent {
    /// Key name as used in the keymap, e.g. `KeyQ`.
    pub key: String,
    /// Seconds on the song clock.
    pub time: f64,
}
