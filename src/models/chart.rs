//! Immutable chart data: tempo timeline and notes.
//!
//! A [`Chart`] is built once per song/difficulty selection and is read-only
//! afterwards. Construction validates the tempo timeline so that time
//! conversion never has to fall back to a default BPM.

use crate::error::ChartTimingError;

/// A region of constant tempo starting at `start_beat` (absolute beats).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempoSegment {
    pub start_beat: f64,
    pub bpm: f64,
}

impl TempoSegment {
    pub fn new(start_beat: f64, bpm: f64) -> Self {
        Self { start_beat, bpm }
    }

    /// Seconds needed to cover `beats` at this segment's tempo.
    #[inline]
    fn seconds_for(&self, beats: f64) -> f64 {
        beats * 60.0 / self.bpm
    }
}

/// Validated, ascending sequence of tempo segments.
#[derive(Debug, Clone, PartialEq)]
pub struct TempoTimeline {
    segments: Vec<TempoSegment>,
    offset_seconds: f64,
    resolution: u32,
}

impl TempoTimeline {
    /// Builds a timeline from segments already sorted by `start_beat`.
    ///
    /// Fails when there is no segment at beat 0, when beats are not strictly
    /// increasing, or when any tempo is not positive.
    pub fn new(
        segments: Vec<TempoSegment>,
        offset_seconds: f64,
        resolution: u32,
    ) -> Result<Self, ChartTimingError> {
        if !offset_seconds.is_finite() {
            return Err(ChartTimingError::NonFiniteValue("offset"));
        }
        if resolution == 0 {
            return Err(ChartTimingError::ZeroResolution);
        }
        let first = segments.first().ok_or(ChartTimingError::Empty)?;
        if first.start_beat != 0.0 {
            return Err(ChartTimingError::MissingZeroSegment(first.start_beat));
        }

        for (i, segment) in segments.iter().enumerate() {
            if !segment.start_beat.is_finite() {
                return Err(ChartTimingError::NonFiniteValue("beat"));
            }
            if !segment.bpm.is_finite() {
                return Err(ChartTimingError::NonFiniteValue("bpm"));
            }
            if segment.bpm <= 0.0 {
                return Err(ChartTimingError::NonPositiveBpm {
                    beat: segment.start_beat,
                    bpm: segment.bpm,
                });
            }
            if i > 0 && segment.start_beat <= segments[i - 1].start_beat {
                return Err(ChartTimingError::NonIncreasing {
                    previous: segments[i - 1].start_beat,
                    current: segment.start_beat,
                });
            }
        }

        Ok(Self {
            segments,
            offset_seconds,
            resolution,
        })
    }

    /// Single-tempo timeline.
    pub fn constant(bpm: f64, offset_seconds: f64, resolution: u32) -> Result<Self, ChartTimingError> {
        Self::new(vec![TempoSegment::new(0.0, bpm)], offset_seconds, resolution)
    }

    pub fn segments(&self) -> &[TempoSegment] {
        &self.segments
    }

    /// Time of beat 0 in seconds.
    pub fn offset_seconds(&self) -> f64 {
        self.offset_seconds
    }

    /// Ticks per beat declared by the timing block this timeline came from.
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Converts an absolute beat position to seconds.
    ///
    /// Walks the segments in order, accumulating the time spent in every
    /// segment that starts at or before `beat`, then adds the remainder at
    /// the last active tempo.
    pub fn seconds_at_beat(&self, beat: f64) -> f64 {
        let mut seconds = self.offset_seconds;
        let mut current_beat = 0.0;
        let mut active = &self.segments[0];

        for segment in &self.segments[1..] {
            if segment.start_beat > beat {
                break;
            }
            seconds += active.seconds_for(segment.start_beat - current_beat);
            current_beat = segment.start_beat;
            active = segment;
        }

        seconds + active.seconds_for(beat - current_beat)
    }

    /// Tempo in effect at an absolute beat position.
    pub fn bpm_at_beat(&self, beat: f64) -> f64 {
        let idx = self
            .segments
            .partition_point(|s| s.start_beat <= beat)
            .saturating_sub(1);
        self.segments[idx].bpm
    }

    /// Tempo in effect at a playback time in seconds.
    pub fn bpm_at_seconds(&self, seconds: f64) -> f64 {
        let mut bpm = self.segments[0].bpm;
        for segment in &self.segments[1..] {
            if self.seconds_at_beat(segment.start_beat) > seconds {
                break;
            }
            bpm = segment.bpm;
        }
        bpm
    }
}

/// One note of a chart, positioned in ticks of the chart resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    /// Grid cell, 0..16 (row-major 4x4).
    pub lane: u8,
    pub beat_ticks: f64,
    /// Hold length in ticks; zero for a tap.
    pub hold_ticks: f64,
    /// Long note tail position, 0..6.
    pub tail_lane: u8,
}

impl Note {
    pub fn tap(lane: u8, beat_ticks: f64) -> Self {
        Self {
            lane,
            beat_ticks,
            hold_ticks: 0.0,
            tail_lane: 0,
        }
    }

    pub fn long(lane: u8, beat_ticks: f64, hold_ticks: f64, tail_lane: u8) -> Self {
        Self {
            lane,
            beat_ticks,
            hold_ticks,
            tail_lane,
        }
    }

    pub fn is_long(&self) -> bool {
        self.hold_ticks > 0.0
    }
}

/// A single playable difficulty with its fully-resolved tempo timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub level: f64,
    pub resolution: u32,
    pub tempo: TempoTimeline,
    notes: Vec<Note>,
}

impl Chart {
    /// Builds a chart, ordering notes by beat position (stable for ties).
    pub fn new(
        level: f64,
        resolution: u32,
        tempo: TempoTimeline,
        mut notes: Vec<Note>,
    ) -> Result<Self, ChartTimingError> {
        if resolution == 0 {
            return Err(ChartTimingError::ZeroResolution);
        }
        notes.sort_by(|a, b| a.beat_ticks.total_cmp(&b.beat_ticks));
        Ok(Self {
            level,
            resolution,
            tempo,
            notes,
        })
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn note_count(&self) -> usize {
        self.notes.len()
    }

    /// Converts a tick position of this chart to seconds.
    pub fn beat_to_seconds(&self, beat_ticks: f64) -> f64 {
        self.tempo
            .seconds_at_beat(beat_ticks / self.resolution as f64)
    }

    /// End time of the last note (hold tails included), or 0 for an empty chart.
    pub fn duration_seconds(&self) -> f64 {
        self.notes
            .iter()
            .map(|n| self.beat_to_seconds(n.beat_ticks + n.hold_ticks))
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timeline(segments: &[(f64, f64)]) -> Result<TempoTimeline, ChartTimingError> {
        let segments = segments
            .iter()
            .map(|&(beat, bpm)| TempoSegment::new(beat, bpm))
            .collect();
        TempoTimeline::new(segments, 0.0, 240)
    }

    #[test]
    fn rejects_timeline_without_zero_segment() {
        assert_eq!(
            timeline(&[(1.0, 120.0)]),
            Err(ChartTimingError::MissingZeroSegment(1.0))
        );
        assert_eq!(timeline(&[]), Err(ChartTimingError::Empty));
    }

    #[test]
    fn rejects_non_increasing_segments() {
        let err = timeline(&[(0.0, 120.0), (4.0, 150.0), (4.0, 180.0)]).unwrap_err();
        assert_eq!(
            err,
            ChartTimingError::NonIncreasing {
                previous: 4.0,
                current: 4.0
            }
        );
    }

    #[test]
    fn rejects_non_positive_bpm() {
        assert!(matches!(
            timeline(&[(0.0, 120.0), (2.0, 0.0)]),
            Err(ChartTimingError::NonPositiveBpm { .. })
        ));
        assert!(matches!(
            timeline(&[(0.0, -60.0)]),
            Err(ChartTimingError::NonPositiveBpm { .. })
        ));
    }

    #[test]
    fn rejects_nan_values() {
        assert_eq!(
            timeline(&[(0.0, f64::NAN)]),
            Err(ChartTimingError::NonFiniteValue("bpm"))
        );
        assert_eq!(
            TempoTimeline::constant(120.0, f64::INFINITY, 240),
            Err(ChartTimingError::NonFiniteValue("offset"))
        );
    }

    #[test]
    fn bpm_lookup_follows_segments() {
        let tl = timeline(&[(0.0, 120.0), (4.0, 240.0)]).unwrap();
        assert_eq!(tl.bpm_at_beat(0.0), 120.0);
        assert_eq!(tl.bpm_at_beat(3.99), 120.0);
        assert_eq!(tl.bpm_at_beat(4.0), 240.0);
        assert_eq!(tl.bpm_at_seconds(1.9), 120.0);
        assert_eq!(tl.bpm_at_seconds(2.0), 240.0);
    }

    #[test]
    fn chart_sorts_notes_and_reports_duration() {
        let tempo = TempoTimeline::constant(120.0, 0.0, 240).unwrap();
        let notes = vec![
            Note::long(1, 480.0, 240.0, 2),
            Note::tap(0, 240.0),
            Note::tap(5, 240.0),
        ];
        let chart = Chart::new(8.0, 240, tempo, notes).unwrap();

        let lanes: Vec<u8> = chart.notes().iter().map(|n| n.lane).collect();
        assert_eq!(lanes, vec![0, 5, 1]);
        // Hold ends at tick 720 = 3 beats = 1.5s.
        assert!((chart.duration_seconds() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn zero_resolution_is_rejected() {
        let tempo = TempoTimeline::constant(120.0, 0.0, 240).unwrap();
        assert_eq!(
            Chart::new(1.0, 0, tempo, Vec::new()),
            Err(ChartTimingError::ZeroResolution)
        );
    }
}
