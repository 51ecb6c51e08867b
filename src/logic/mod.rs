//! Logic thread running a play session.
//!
//! The thread runs a fixed-timestep loop that:
//! 1. Applies queued actions from the input side
//! 2. Handles system events (quit)
//! 3. Advances the session at a fixed rate
//! 4. Forwards engine events and sends snapshots to the presentation side

pub mod transport;

use crate::models::stats::HitStats;
use crate::state::game::GameSession;
use crate::system::bus::{SystemBus, SystemEvent};
use std::io;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use transport::Transport;

/// Default ticks per second for the logic thread.
pub const TPS: u64 = 200;

/// Maximum fixed updates run per loop iteration before yielding.
const MAX_CATCH_UP: u32 = 10;

/// Final result of a session, returned when the logic thread exits.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SessionSummary {
    pub score: u64,
    pub hit_stats: HitStats,
    pub accuracy: f64,
    /// Whether the chart was played through to the end.
    pub completed: bool,
}

impl SessionSummary {
    fn from_session<T: Transport>(session: &GameSession<T>, completed: bool) -> Self {
        let hit_stats = session.hit_stats().clone();
        Self {
            score: session.score(),
            accuracy: hit_stats.calculate_accuracy(),
            hit_stats,
            completed,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Spawns the logic thread that owns `session` until the chart finishes or
/// a quit is received.
pub fn start_thread<T>(
    bus: SystemBus,
    mut session: GameSession<T>,
    tps: u64,
) -> io::Result<JoinHandle<SessionSummary>>
where
    T: Transport + Send + 'static,
{
    let tps = tps.max(1);

    thread::Builder::new()
        .name("Logic Thread".to_string())
        .spawn(move || {
            log::info!("LOGIC: Thread started ({} TPS)", tps);

            let mut accumulator = Duration::ZERO;
            let mut last_time = Instant::now();
            let target_dt = Duration::from_secs_f64(1.0 / tps as f64);

            loop {
                // 1. Input actions are applied before this tick's update
                while let Ok(action) = bus.action_rx.try_recv() {
                    session.handle_action(action);
                }

                // 2. System events
                while let Ok(sys_evt) = bus.sys_rx.try_recv() {
                    match sys_evt {
                        SystemEvent::Quit => {
                            log::info!("LOGIC: Quit received");
                            session.stop();
                            forward_events(&bus, &mut session);
                            return SessionSummary::from_session(&session, false);
                        }
                    }
                }

                // 3. Fixed-timestep update loop
                let current_time = Instant::now();
                accumulator += current_time - last_time;
                last_time = current_time;

                let mut loops = 0;
                while accumulator >= target_dt && loops < MAX_CATCH_UP {
                    session.update(target_dt.as_secs_f64());
                    accumulator -= target_dt;
                    loops += 1;
                }

                // 4. Publish
                forward_events(&bus, &mut session);
                if loops > 0 {
                    let _ = bus.render_tx.try_send(session.snapshot());
                }

                if session.is_finished() {
                    let summary = SessionSummary::from_session(&session, true);
                    log::info!(
                        "LOGIC: Chart finished, score {} ({:.2}%)",
                        summary.score,
                        summary.accuracy
                    );
                    session.stop();
                    forward_events(&bus, &mut session);
                    return summary;
                }

                if loops == 0 {
                    thread::sleep(Duration::from_millis(1));
                }
            }
        })
}

fn forward_events<T: Transport>(bus: &SystemBus, session: &mut GameSession<T>) {
    for event in session.drain_events() {
        if bus.event_tx.send(event).is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::events::GameAction;
    use crate::models::chart::{Chart, Note, TempoTimeline};
    use crate::models::settings::EngineSettings;
    use crate::models::stats::Judgement;
    use crate::shared::messages::EngineEvent;
    use crate::state::game::PlaybackState;
    use crate::logic::transport::VirtualTransport;
    use std::sync::Arc;

    fn session(notes: Vec<Note>) -> GameSession<VirtualTransport> {
        let tempo = TempoTimeline::constant(120.0, 0.0, 240).unwrap();
        let chart = Chart::new(1.0, 240, tempo, notes).unwrap();
        let settings = EngineSettings {
            finish_grace_seconds: 0.1,
            ..EngineSettings::default()
        };
        GameSession::new(Arc::new(chart), &settings, VirtualTransport::new())
    }

    #[test]
    fn quit_stops_the_thread() {
        let bus = SystemBus::new();
        let handle = start_thread(bus.clone(), session(vec![Note::tap(0, 2400.0)]), TPS).unwrap();
        bus.action_tx.send(GameAction::Start).unwrap();
        bus.sys_tx.send(SystemEvent::Quit).unwrap();

        let summary = handle.join().unwrap();
        assert!(!summary.completed);
        assert_eq!(summary.score, 0);
    }

    #[test]
    fn summary_serializes_with_judgement_counts() {
        let mut hit_stats = HitStats::new();
        hit_stats.record(Judgement::Perfect);
        hit_stats.record(Judgement::Miss);
        let summary = SessionSummary {
            score: 300,
            accuracy: hit_stats.calculate_accuracy(),
            hit_stats,
            completed: true,
        };

        let value: serde_json::Value = serde_json::from_str(&summary.to_json().unwrap()).unwrap();
        assert_eq!(value["score"], 300);
        assert_eq!(value["completed"], true);
        assert_eq!(value["hit_stats"]["perfect"], 1);
        assert_eq!(value["hit_stats"]["miss"], 1);
        assert_eq!(value["accuracy"], 50.0);
    }

    #[test]
    fn unplayed_chart_finishes_with_misses() {
        let bus = SystemBus::new();
        let handle = start_thread(bus.clone(), session(vec![Note::tap(0, 48.0)]), TPS).unwrap();
        bus.action_tx.send(GameAction::Start).unwrap();

        let summary = handle.join().unwrap();
        assert!(summary.completed);
        assert_eq!(summary.hit_stats.miss, 1);

        let events: Vec<EngineEvent> = bus.event_rx.try_iter().collect();
        assert!(events.contains(&EngineEvent::StateChanged(PlaybackState::Playing)));
        assert!(events.iter().any(|e| matches!(e, EngineEvent::LateMiss { lane: 0, .. })));
        assert_eq!(
            events.last(),
            Some(&EngineEvent::StateChanged(PlaybackState::Stopped))
        );
    }
}
