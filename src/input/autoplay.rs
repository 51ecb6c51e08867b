//! Scripted input that presses every note exactly on time.

use crate::input::events::GameAction;
use crate::models::chart::Chart;
use crate::models::engine::resolve_note_times;
use crossbeam_channel::Sender;
use ordered_float::OrderedFloat;
use std::io;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Press schedule for a chart: `(time_seconds, lane)` in time order.
pub fn press_schedule(chart: &Chart) -> Vec<(f64, u8)> {
    let mut presses: Vec<(f64, u8)> = chart
        .notes()
        .iter()
        .zip(resolve_note_times(chart))
        .map(|(note, timing)| (timing.start_seconds, note.lane))
        .collect();
    presses.sort_by_key(|&(time, lane)| (OrderedFloat(time), lane));
    presses
}

/// Spawns a thread that sends a `Hit` for each scheduled press once
/// `origin + time` is reached on the wall clock.
///
/// Stops early when the action channel closes.
pub fn start_thread(
    presses: Vec<(f64, u8)>,
    origin: Instant,
    action_tx: Sender<GameAction>,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("Autoplay Thread".to_string())
        .spawn(move || {
            log::info!("AUTOPLAY: {} presses scheduled", presses.len());
            for (time, lane) in presses {
                let due = origin + Duration::from_secs_f64(time.max(0.0));
                let now = Instant::now();
                if due > now {
                    thread::sleep(due - now);
                }
                if action_tx.send(GameAction::Hit { lane, time }).is_err() {
                    log::debug!("AUTOPLAY: Session closed, stopping");
                    return;
                }
            }
        })
}
