//! Playback state machine for one chart.
//!
//! The `GameSession` coordinates:
//! - the external audio transport (start/stop/seek/pause)
//! - the note scheduler, advanced once per tick from the transport clock
//! - the judgment engine, fed by discrete press commands
//!
//! All changes visible to the presentation layer are queued as
//! [`EngineEvent`]s and collected with [`GameSession::drain_events`].

mod input;
mod judge;
mod notes;
mod snapshot;

pub use judge::{JudgmentEngine, JudgmentResult};
pub use notes::{Advance, NoteScheduler, SchedulerConfig};

use crate::error::TransportUnavailableError;
use crate::logic::transport::Transport;
use crate::models::chart::Chart;
use crate::models::engine::{LANE_COUNT, NoteId};
use crate::models::settings::EngineSettings;
use crate::models::stats::HitStats;
use crate::shared::messages::EngineEvent;
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Playing,
    Paused,
    Stopped,
}

impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaybackState::Idle => write!(f, "IDLE"),
            PlaybackState::Playing => write!(f, "PLAYING"),
            PlaybackState::Paused => write!(f, "PAUSED"),
            PlaybackState::Stopped => write!(f, "STOPPED"),
        }
    }
}

pub struct GameSession<T: Transport> {
    chart: Arc<Chart>,
    scheduler: NoteScheduler,
    judge: JudgmentEngine,
    transport: T,
    state: PlaybackState,
    /// Transport time of the last tick, in seconds.
    song_time: f64,
    /// Wall clock at the last Start.
    session_started_at: Option<Instant>,
    /// Song time after which the session counts as finished.
    finish_at_seconds: f64,
    events: Vec<EngineEvent>,
}

impl<T: Transport> GameSession<T> {
    pub fn new(chart: Arc<Chart>, settings: &EngineSettings, transport: T) -> Self {
        let config = SchedulerConfig {
            lookahead_seconds: settings.lookahead_seconds,
            hit_window_seconds: settings.hit_window_seconds,
        };
        let scheduler = NoteScheduler::new(&chart, config);
        let finish_at_seconds = chart.duration_seconds() + settings.finish_grace_seconds;
        if !transport.is_loaded() {
            log::warn!("ENGINE: No audio loaded, session runs in degraded mode");
        }
        log::info!(
            "ENGINE: Session ready ({} notes, level {})",
            chart.note_count(),
            chart.level
        );

        Self {
            chart,
            scheduler,
            judge: JudgmentEngine::new(settings.hit_window()),
            transport,
            state: PlaybackState::Idle,
            song_time: 0.0,
            session_started_at: None,
            finish_at_seconds,
            events: Vec::new(),
        }
    }

    /// Begins playback from the top of the song.
    ///
    /// Does nothing (and reports why) when no audio is loaded, or when a
    /// session is already running.
    pub fn start(&mut self) -> Result<(), TransportUnavailableError> {
        if !self.transport.is_loaded() {
            log::warn!("ENGINE: Start ignored, audio transport unavailable");
            return Err(TransportUnavailableError::new("no audio asset loaded"));
        }
        match self.state {
            PlaybackState::Playing | PlaybackState::Paused => {
                log::debug!("ENGINE: Start ignored while {}", self.state);
                return Ok(());
            }
            PlaybackState::Stopped => self.set_state(PlaybackState::Idle),
            PlaybackState::Idle => {}
        }

        self.transport.seek(0.0);
        self.transport.play();
        self.clear_active_notes();
        self.judge.reset();
        self.song_time = 0.0;
        self.session_started_at = Some(Instant::now());
        self.set_state(PlaybackState::Playing);
        // Notes due within the lookahead are hittable before the first update.
        self.tick();
        Ok(())
    }

    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.transport.pause();
            self.set_state(PlaybackState::Paused);
        }
    }

    pub fn resume(&mut self) {
        if self.state == PlaybackState::Paused {
            self.transport.play();
            self.set_state(PlaybackState::Playing);
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.state {
            PlaybackState::Playing => self.pause(),
            PlaybackState::Paused => self.resume(),
            _ => {}
        }
    }

    /// Halts playback, rewinds the transport and hides every active note.
    /// The final score stays readable until the next Start.
    pub fn stop(&mut self) {
        if matches!(self.state, PlaybackState::Idle | PlaybackState::Stopped) {
            return;
        }
        self.transport.stop();
        self.transport.seek(0.0);
        self.clear_active_notes();
        self.song_time = 0.0;
        self.set_state(PlaybackState::Stopped);
    }

    pub fn restart(&mut self) -> Result<(), TransportUnavailableError> {
        self.stop();
        self.start()
    }

    /// Advances the transport by `dt` and processes one tick.
    pub fn update(&mut self, dt_seconds: f64) {
        if self.state != PlaybackState::Playing {
            return;
        }
        self.transport.advance(dt_seconds);
        self.tick();
    }

    /// Reads the transport clock and moves notes through their states.
    pub fn tick(&mut self) {
        if self.state != PlaybackState::Playing {
            return;
        }
        let now = self.transport.position_seconds();
        let diff = self.scheduler.advance(now);

        for id in &diff.newly_activated {
            if let Some(note) = self.scheduler.get(*id) {
                self.events.push(EngineEvent::NoteActivated {
                    note: *id,
                    lane: note.lane(),
                    is_long: note.is_long(),
                    tail_lane: note.note.tail_lane,
                    time_seconds: note.time_seconds,
                });
            }
        }

        self.judge.record_expired(&diff.newly_expired);
        for id in &diff.newly_expired {
            if let Some(note) = self.scheduler.get(*id) {
                self.events.push(EngineEvent::LateMiss {
                    note: *id,
                    lane: note.lane(),
                });
            }
        }

        if now >= self.song_time {
            self.song_time = now;
        }
    }

    /// Judges a press on `lane` at transport time `time`.
    ///
    /// Returns `None` when not playing or when the lane does not exist.
    pub fn hit(&mut self, lane: u8, time: f64) -> Option<JudgmentResult> {
        if self.state != PlaybackState::Playing {
            return None;
        }
        if lane as usize >= LANE_COUNT {
            log::warn!("ENGINE: Ignoring press on unknown lane {}", lane);
            return None;
        }

        let result = self.judge.judge(&mut self.scheduler, lane, time);
        match result {
            JudgmentResult::Hit {
                note,
                lane,
                judgement,
                offset_seconds,
                points,
            } => self.events.push(EngineEvent::NoteHit {
                note,
                lane,
                judgement,
                offset_seconds,
                points,
            }),
            JudgmentResult::Miss { lane } => self.events.push(EngineEvent::EmptyPress { lane }),
        }
        self.events.push(EngineEvent::LanePressed { lane });
        Some(result)
    }

    fn clear_active_notes(&mut self) {
        for id in self.scheduler.reset() {
            if let Some(note) = self.scheduler.get(id) {
                self.events.push(EngineEvent::NoteCleared {
                    note: id,
                    lane: note.lane(),
                });
            }
        }
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state == state {
            return;
        }
        log::info!("ENGINE: {} -> {}", self.state, state);
        self.state = state;
        self.events.push(EngineEvent::StateChanged(state));
    }

    /// Takes every event queued since the last call.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    /// `true` once playback is past the last note plus the grace period.
    pub fn is_finished(&self) -> bool {
        self.state == PlaybackState::Playing && self.song_time > self.finish_at_seconds
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Audio-less mode: Start is refused.
    pub fn is_degraded(&self) -> bool {
        !self.transport.is_loaded()
    }

    pub fn score(&self) -> u64 {
        self.judge.score()
    }

    pub fn hit_stats(&self) -> &HitStats {
        self.judge.hit_stats()
    }

    pub fn song_time(&self) -> f64 {
        self.song_time
    }

    /// Wall time since the last Start.
    pub fn session_elapsed(&self) -> Option<std::time::Duration> {
        self.session_started_at.map(|t| t.elapsed())
    }

    pub fn chart(&self) -> &Chart {
        &self.chart
    }

    pub fn scheduler(&self) -> &NoteScheduler {
        &self.scheduler
    }

    /// Approach progress of an active note at the current song time.
    pub fn progress(&self, id: NoteId) -> Option<f64> {
        self.scheduler.progress(id, self.song_time)
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}
