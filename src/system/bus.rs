//! Shared channel infrastructure between system threads.
//!
//! The `SystemBus` connects the input side, the logic thread and the
//! presentation side with crossbeam channels.

use crate::input::events::{GameAction, RawKeyEvent};
use crate::shared::messages::EngineEvent;
use crate::shared::snapshot::GameplaySnapshot;
use crossbeam_channel::{Receiver, Sender, bounded, unbounded};

/// System-level events broadcast to the logic thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemEvent {
    /// Shutdown requested.
    Quit,
}

#[derive(Clone)]
pub struct SystemBus {
    /// Front end -> Input: timestamped key presses.
    pub raw_input_tx: Sender<RawKeyEvent>,
    pub raw_input_rx: Receiver<RawKeyEvent>,

    /// Input -> Logic: gameplay and transport actions.
    pub action_tx: Sender<GameAction>,
    pub action_rx: Receiver<GameAction>,

    /// Logic -> Presentation: discrete session events.
    pub event_tx: Sender<EngineEvent>,
    pub event_rx: Receiver<EngineEvent>,

    /// Logic -> Presentation: state snapshots.
    pub render_tx: Sender<GameplaySnapshot>,
    pub render_rx: Receiver<GameplaySnapshot>,

    /// Main -> Logic: system events.
    pub sys_tx: Sender<SystemEvent>,
    pub sys_rx: Receiver<SystemEvent>,
}

impl SystemBus {
    pub fn new() -> Self {
        let (raw_input_tx, raw_input_rx) = unbounded();
        let (action_tx, action_rx) = unbounded();
        let (event_tx, event_rx) = unbounded();

        // Bounded render channel: max 2 snapshots queued to limit latency
        let (render_tx, render_rx) = bounded(2);

        let (sys_tx, sys_rx) = unbounded();

        Self {
            raw_input_tx,
            raw_input_rx,
            action_tx,
            action_rx,
            event_tx,
            event_rx,
            render_tx,
            render_rx,
            sys_tx,
            sys_rx,
        }
    }
}

impl Default for SystemBus {
    fn default() -> Self {
        Self::new()
    }
}
