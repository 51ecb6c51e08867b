//! Note scheduling: activation, expiry and approach progress.

use crate::models::chart::Chart;
use crate::models::engine::{NoteId, NoteState, PlayableNote, resolve_note_times};
use ordered_float::OrderedFloat;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchedulerConfig {
    pub lookahead_seconds: f64,
    pub hit_window_seconds: f64,
}

/// Notes whose state changed during one [`NoteScheduler::advance`] call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Advance {
    pub newly_activated: Vec<NoteId>,
    pub newly_expired: Vec<NoteId>,
}

impl Advance {
    pub fn is_empty(&self) -> bool {
        self.newly_activated.is_empty() && self.newly_expired.is_empty()
    }
}

/// Owns the playable notes of a session and moves them through their states
/// as the clock advances.
pub struct NoteScheduler {
    /// Sorted by time, ties in chart order.
    notes: Vec<PlayableNote>,
    /// `NoteId` -> index into `notes`.
    positions: Vec<usize>,
    config: SchedulerConfig,
    /// First note not yet activated.
    next_pending: usize,
    /// First note not in a terminal state.
    head_index: usize,
    last_time: Option<f64>,
}

impl NoteScheduler {
    pub fn new(chart: &Chart, config: SchedulerConfig) -> Self {
        let mut notes: Vec<PlayableNote> = chart
            .notes()
            .iter()
            .zip(resolve_note_times(chart))
            .enumerate()
            .map(|(i, (note, timing))| {
                PlayableNote::new(NoteId(i), *note, timing.start_seconds, timing.end_seconds)
            })
            .collect();
        notes.sort_by_key(|n| (OrderedFloat(n.time_seconds), n.id));

        let mut positions = vec![0; notes.len()];
        for (pos, note) in notes.iter().enumerate() {
            positions[note.id.0] = pos;
        }

        Self {
            notes,
            positions,
            config,
            next_pending: 0,
            head_index: 0,
            last_time: None,
        }
    }

    pub fn config(&self) -> SchedulerConfig {
        self.config
    }

    /// Moves the clock to `t` and reports notes that changed state.
    ///
    /// Time must not go backwards within a session; an earlier `t` is ignored
    /// until [`reset`](Self::reset).
    pub fn advance(&mut self, t: f64) -> Advance {
        let mut diff = Advance::default();
        if let Some(last) = self.last_time
            && t < last
        {
            log::warn!("ENGINE: Ignoring backwards tick {:.4}s < {:.4}s", t, last);
            return diff;
        }
        self.last_time = Some(t);

        let SchedulerConfig {
            lookahead_seconds,
            hit_window_seconds,
        } = self.config;

        while self.next_pending < self.notes.len() {
            let note = &mut self.notes[self.next_pending];
            if t < note.time_seconds - lookahead_seconds {
                break;
            }
            if note.state == NoteState::Pending {
                note.state = NoteState::Active;
                diff.newly_activated.push(note.id);
            }
            self.next_pending += 1;
        }

        for note in &mut self.notes[self.head_index..self.next_pending] {
            if note.state == NoteState::Active && t > note.time_seconds + hit_window_seconds {
                note.state = NoteState::Expired;
                diff.newly_expired.push(note.id);
            }
        }

        while self.head_index < self.next_pending && self.notes[self.head_index].state.is_terminal()
        {
            self.head_index += 1;
        }

        diff
    }

    /// Returns every note to `Pending`. Returns the notes that were active.
    pub fn reset(&mut self) -> Vec<NoteId> {
        let was_active = self.active().map(|n| n.id).collect();
        for note in &mut self.notes {
            note.reset();
        }
        self.next_pending = 0;
        self.head_index = 0;
        self.last_time = None;
        was_active
    }

    /// Active note on `lane` closest to being due, if one is within
    /// `window_seconds` of `t`. Ties go to the lowest chart index.
    pub fn find_hittable(&self, lane: u8, t: f64, window_seconds: f64) -> Option<NoteId> {
        self.active()
            .filter(|n| n.lane() == lane && (t - n.time_seconds).abs() <= window_seconds)
            .min_by_key(|n| (OrderedFloat(n.time_seconds), n.id))
            .map(|n| n.id)
    }

    /// Marks an active note as hit. Returns `false` if the note was not active.
    pub fn mark_hit(&mut self, id: NoteId) -> bool {
        let Some(note) = self.get_mut(id) else {
            return false;
        };
        if note.state != NoteState::Active {
            return false;
        }
        note.state = NoteState::Hit;
        while self.head_index < self.next_pending && self.notes[self.head_index].state.is_terminal()
        {
            self.head_index += 1;
        }
        true
    }

    /// Approach fraction of an active note at `t`, from 0 (just shown) to 1 (due).
    pub fn progress(&self, id: NoteId, t: f64) -> Option<f64> {
        let note = self.get(id).filter(|n| n.is_active())?;
        let lookahead = self.config.lookahead_seconds;
        let shown_at = note.time_seconds - lookahead;
        Some(((t - shown_at) / lookahead).clamp(0.0, 1.0))
    }

    pub fn get(&self, id: NoteId) -> Option<&PlayableNote> {
        self.positions.get(id.0).map(|&pos| &self.notes[pos])
    }

    fn get_mut(&mut self, id: NoteId) -> Option<&mut PlayableNote> {
        let pos = *self.positions.get(id.0)?;
        Some(&mut self.notes[pos])
    }

    /// Notes currently visible and hittable, in time order.
    pub fn active(&self) -> impl Iterator<Item = &PlayableNote> {
        self.notes[self.head_index..self.next_pending]
            .iter()
            .filter(|n| n.is_active())
    }

    /// All notes in time order.
    pub fn notes(&self) -> &[PlayableNote] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Notes in a terminal state.
    pub fn judged_count(&self) -> usize {
        self.notes.iter().filter(|n| n.state.is_terminal()).count()
    }

    /// Last time passed to [`advance`](Self::advance) since the last reset.
    pub fn last_time(&self) -> Option<f64> {
        self.last_time
    }
}
