//! Action dispatch for GameSession.

use super::GameSession;
use crate::input::events::GameAction;
use crate::logic::transport::Transport;

impl<T: Transport> GameSession<T> {
    /// Applies one action from the input channel.
    pub fn handle_action(&mut self, action: GameAction) {
        match action {
            GameAction::Hit { lane, time } => {
                self.hit(lane, time);
            }
            GameAction::Start => self.start_or_log(),
            GameAction::Pause => self.pause(),
            GameAction::Resume => self.resume(),
            GameAction::TogglePause => self.toggle_pause(),
            GameAction::PlayPause => match self.state() {
                super::PlaybackState::Idle | super::PlaybackState::Stopped => self.start_or_log(),
                _ => self.toggle_pause(),
            },
            GameAction::Stop => self.stop(),
            GameAction::Restart => {
                if let Err(e) = self.restart() {
                    log::debug!("ENGINE: Restart refused: {}", e);
                }
            }
        }
    }

    fn start_or_log(&mut self) {
        if let Err(e) = self.start() {
            log::debug!("ENGINE: Start refused: {}", e);
        }
    }
}
