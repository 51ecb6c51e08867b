//! Key name to action resolution.

use super::events::GameAction;
use crate::models::settings::EngineSettings;
use std::collections::HashMap;

/// What a key is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Lane(u8),
    PlayPause,
    Restart,
    Stop,
    None,
}

#[derive(Debug, Clone)]
pub struct KeyMap {
    lane_binds: HashMap<String, u8>,
    control_binds: HashMap<String, KeyAction>,
}

impl KeyMap {
    pub fn from_settings(settings: &EngineSettings) -> Self {
        let lane_binds = settings
            .keymap
            .iter()
            .map(|(key, lane)| (key.clone(), *lane))
            .collect();
        Self {
            lane_binds,
            control_binds: Self::default_control_binds(),
        }
    }

    fn default_control_binds() -> HashMap<String, KeyAction> {
        let mut map = HashMap::new();
        map.insert("Space".to_string(), KeyAction::PlayPause);
        map.insert("F5".to_string(), KeyAction::Restart);
        map.insert("Escape".to_string(), KeyAction::Stop);
        map
    }

    /// Lane bindings win over control bindings.
    pub fn resolve(&self, key: &str) -> KeyAction {
        if let Some(lane) = self.lane_binds.get(key) {
            KeyAction::Lane(*lane)
        } else if let Some(action) = self.control_binds.get(key) {
            *action
        } else {
            KeyAction::None
        }
    }

    /// Turns a key press at transport time `time` into a session command.
    pub fn action_for(&self, key: &str, time: f64) -> Option<GameAction> {
        match self.resolve(key) {
            KeyAction::Lane(lane) => Some(GameAction::Hit { lane, time }),
            KeyAction::PlayPause => Some(GameAction::PlayPause),
            KeyAction::Restart => Some(GameAction::Restart),
            KeyAction::Stop => Some(GameAction::Stop),
            KeyAction::None => None,
        }
    }
}
