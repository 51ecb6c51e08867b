//! Audio transport abstraction.
//!
//! The engine never decodes audio itself. It drives a [`Transport`] (start,
//! stop, seek, pause) and reads its position once per tick.

/// Playback clock and controls for the song's audio asset.
pub trait Transport {
    /// Whether an audio asset is loaded and playback can begin.
    fn is_loaded(&self) -> bool;
    fn play(&mut self);
    fn pause(&mut self);
    /// Halts playback. Position is left where it is; callers seek to rewind.
    fn stop(&mut self);
    fn seek(&mut self, position_seconds: f64);
    fn position_seconds(&self) -> f64;
    fn is_playing(&self) -> bool;

    /// Called once per logic tick with the elapsed wall time. Transports
    /// backed by an audio device read their own clock and ignore this.
    fn advance(&mut self, _dt_seconds: f64) {}
}

/// Software clock standing in for an audio device.
///
/// Position only moves while playing, by the `dt` handed to
/// [`Transport::advance`].
#[derive(Debug, Clone)]
pub struct VirtualTransport {
    loaded: bool,
    playing: bool,
    position_seconds: f64,
}

impl VirtualTransport {
    /// A loaded transport ready to play.
    pub fn new() -> Self {
        Self {
            loaded: true,
            playing: false,
            position_seconds: 0.0,
        }
    }

    /// A transport whose audio failed to load. Every command is ignored.
    pub fn unavailable() -> Self {
        Self {
            loaded: false,
            ..Self::new()
        }
    }
}

impl Default for VirtualTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for VirtualTransport {
    fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn play(&mut self) {
        if self.loaded {
            self.playing = true;
        }
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn stop(&mut self) {
        self.playing = false;
    }

    fn seek(&mut self, position_seconds: f64) {
        if self.loaded {
            self.position_seconds = position_seconds;
        }
    }

    fn position_seconds(&self) -> f64 {
        self.position_seconds
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn advance(&mut self, dt_seconds: f64) {
        if self.playing {
            self.position_seconds += dt_seconds;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_moves_only_while_playing() {
        let mut t = VirtualTransport::new();
        t.advance(1.0);
        assert_eq!(t.position_seconds(), 0.0);

        t.play();
        t.advance(0.25);
        t.pause();
        t.advance(5.0);
        assert_eq!(t.position_seconds(), 0.25);

        t.seek(0.0);
        assert_eq!(t.position_seconds(), 0.0);
    }

    #[test]
    fn unavailable_transport_ignores_commands() {
        let mut t = VirtualTransport::unavailable();
        t.play();
        t.advance(1.0);
        t.seek(3.0);
        assert!(!t.is_loaded());
        assert!(!t.is_playing());
        assert_eq!(t.position_seconds(), 0.0);
    }
}
