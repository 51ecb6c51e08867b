//! Input thread bootstrapping and key routing.

pub mod autoplay;
pub mod events;
pub mod keymap;

use crate::input::events::{GameAction, RawKeyEvent};
use crate::input::keymap::KeyMap;
use crossbeam_channel::{Receiver, Sender};
use std::io;
use std::thread::{self, JoinHandle};

/// Spawns the thread that turns raw key presses into session actions.
///
/// Exits when the raw input channel closes or the logic side hangs up.
pub fn start_thread(
    raw_input_rx: Receiver<RawKeyEvent>,
    action_tx: Sender<GameAction>,
    keymap: KeyMap,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("Input Thread".to_string())
        .spawn(move || {
            log::info!("INPUT: Thread started");

            // Blocking loop keeps CPU usage at zero when idle.
            while let Ok(raw) = raw_input_rx.recv() {
                let Some(action) = keymap.action_for(&raw.key, raw.time) else {
                    log::debug!("INPUT: Unbound key {}", raw.key);
                    continue;
                };
                if let Err(e) = action_tx.send(action) {
                    log::error!("INPUT: Failed to send action (Logic thread died?): {}", e);
                    break;
                }
            }
            log::info!("INPUT: Thread stopped");
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::settings::EngineSettings;
    use crate::system::bus::SystemBus;
    use std::time::Duration;

    #[test]
    fn routes_bound_keys_only() {
        let bus = SystemBus::new();
        let keymap = KeyMap::from_settings(&EngineSettings::default());
        let handle =
            start_thread(bus.raw_input_rx.clone(), bus.action_tx.clone(), keymap).unwrap();

        for key in ["KeyP", "KeyS", "Space"] {
            bus.raw_input_tx
                .send(RawKeyEvent {
                    key: key.to_string(),
                    time: 1.25,
                })
                .unwrap();
        }

        let timeout = Duration::from_secs(1);
        assert_eq!(
            bus.action_rx.recv_timeout(timeout).unwrap(),
            GameAction::Hit {
                lane: 5,
                time: 1.25
            }
        );
        assert_eq!(
            bus.action_rx.recv_timeout(timeout).unwrap(),
            GameAction::PlayPause
        );

        drop(bus);
        handle.join().unwrap();
    }
}
