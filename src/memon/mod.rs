//! Memon chart documents.
//!
//! A memon file describes one song: metadata, a default timing block and a
//! map of difficulties. Parsing keeps the raw document; [`MemonFile::chart`]
//! resolves one difficulty into a validated [`Chart`].
//!
//! Both the current layout (`timing` block, `title`/`audio`/`jacket` keys) and
//! the legacy layout (`BPM`/`offset` inside `metadata`, `song title`,
//! `music path`, `album cover path`) are accepted.

mod values;

use crate::error::{ChartDataError, ChartTimingError, FieldError};
use crate::models::chart::{Chart, Note, TempoSegment, TempoTimeline};
use crate::models::engine::{DEFAULT_BPM, DEFAULT_RESOLUTION, LANE_COUNT, TAIL_POSITIONS};
use ordered_float::OrderedFloat;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub use values::{beat_time, decimal};

#[derive(Debug, Clone, PartialEq)]
pub struct MemonFile {
    pub version: String,
    pub metadata: SongMetadata,
    /// Song-wide timing. A malformed block only fails the charts that inherit it.
    pub timing: Result<MemonTiming, FieldError>,
    /// Difficulties by name. A malformed chart does not affect its siblings.
    pub charts: BTreeMap<String, Result<MemonChart, FieldError>>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SongMetadata {
    pub title: String,
    pub artist: String,
    pub audio: Option<String>,
    pub jacket: Option<String>,
    pub preview: Preview,
}

/// Song preview: either a time range of the main audio or a separate file.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub start: f64,
    pub duration: f64,
    pub file: Option<String>,
}

impl Default for Preview {
    fn default() -> Self {
        Self {
            start: 0.0,
            duration: 10.0,
            file: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BpmEvent {
    /// Absolute beats, never scaled by resolution.
    pub beat: f64,
    pub bpm: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemonTiming {
    pub offset: f64,
    pub resolution: u32,
    pub bpms: Vec<BpmEvent>,
    /// Clap timing beats.
    pub hakus: Vec<f64>,
}

impl Default for MemonTiming {
    fn default() -> Self {
        Self {
            offset: 0.0,
            resolution: DEFAULT_RESOLUTION,
            bpms: vec![BpmEvent {
                beat: 0.0,
                bpm: DEFAULT_BPM,
            }],
            hakus: Vec::new(),
        }
    }
}

impl MemonTiming {
    /// Sorts the BPM events and validates them into a timeline.
    pub fn to_timeline(&self) -> Result<TempoTimeline, ChartTimingError> {
        let mut segments: Vec<TempoSegment> = self
            .bpms
            .iter()
            .map(|e| TempoSegment::new(e.beat, e.bpm))
            .collect();
        if segments.iter().any(|s| s.start_beat.is_nan()) {
            return Err(ChartTimingError::NonFiniteValue("beat"));
        }
        segments.sort_by_key(|s| OrderedFloat(s.start_beat));
        TempoTimeline::new(segments, self.offset, self.resolution)
    }
}

/// One difficulty as written in the file.
#[derive(Debug, Clone, PartialEq)]
pub struct MemonChart {
    pub level: f64,
    pub resolution: u32,
    /// Chart-specific timing; `None` inherits the song timing.
    pub timing: Option<MemonTiming>,
    pub notes: Vec<Note>,
}

impl MemonFile {
    /// Reads and parses a memon file from disk.
    pub fn load(path: &Path) -> Result<Self, ChartDataError> {
        let text = fs::read_to_string(path).map_err(|source| ChartDataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        parse_memon(&text)
    }

    /// Difficulty names in this song.
    pub fn chart_ids(&self) -> impl Iterator<Item = &str> {
        self.charts.keys().map(String::as_str)
    }

    /// Resolves one difficulty into a playable chart.
    pub fn chart(&self, id: &str) -> Result<Chart, ChartDataError> {
        let source = self
            .charts
            .get(id)
            .ok_or_else(|| ChartDataError::UnknownChart(id.to_string()))?
            .as_ref()
            .map_err(|e| e.clone())?;
        let timing = match &source.timing {
            Some(timing) => timing,
            None => self.timing.as_ref().map_err(|e| e.clone())?,
        };
        let tempo = timing.to_timeline().inspect_err(|e| {
            log::error!("CHART: Invalid timing for `{}` in {:?}: {}", id, self.metadata.title, e);
        })?;
        Ok(Chart::new(
            source.level,
            source.resolution,
            tempo,
            source.notes.clone(),
        )?)
    }
}

/// Parses a memon document.
pub fn parse_memon(text: &str) -> Result<MemonFile, ChartDataError> {
    let root: Value = serde_json::from_str(text)?;
    if !root.is_object() {
        return Err(ChartDataError::InvalidField {
            field: "root",
            reason: "expected a JSON object".to_string(),
        });
    }

    let version = values::string_field(&root, "version").unwrap_or_else(|| "1.0.0".to_string());

    let metadata = match root.get("metadata") {
        Some(node) => parse_metadata(node),
        None => SongMetadata::default(),
    };

    let timing = match root.get("timing") {
        Some(node) => parse_timing(node),
        None => legacy_timing(root.get("metadata")),
    };
    if let Err(e) = &timing {
        log::warn!("CHART: Song timing of {:?} is unusable: {}", metadata.title, e);
    }

    let charts = match root.get("data") {
        Some(node) => parse_charts(node)?,
        None => {
            log::warn!("CHART: {:?} has no `data` block", metadata.title);
            BTreeMap::new()
        }
    };

    Ok(MemonFile {
        version,
        metadata,
        timing,
        charts,
    })
}

fn parse_metadata(node: &Value) -> SongMetadata {
    let first = |keys: &[&str]| keys.iter().find_map(|k| values::string_field(node, k));

    SongMetadata {
        title: first(&["title", "song title"]).unwrap_or_default(),
        artist: first(&["artist"]).unwrap_or_default(),
        audio: first(&["audio", "music path"]).filter(|s| !s.is_empty()),
        jacket: first(&["jacket", "album cover path"]).filter(|s| !s.is_empty()),
        preview: node.get("preview").map(parse_preview).unwrap_or_default(),
    }
}

fn parse_preview(node: &Value) -> Preview {
    let mut preview = Preview::default();
    match node {
        Value::String(file) => preview.file = Some(file.clone()),
        Value::Object(_) => {
            if let Some(start) = node.get("start").and_then(decimal) {
                preview.start = start;
            }
            if let Some(duration) = node.get("duration").and_then(decimal) {
                preview.duration = duration;
            }
        }
        _ => log::warn!("CHART: Ignoring preview of unexpected type"),
    }
    preview
}

fn invalid(field: &'static str, reason: impl Into<String>) -> FieldError {
    FieldError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn parse_timing(node: &Value) -> Result<MemonTiming, FieldError> {
    let mut timing = MemonTiming::default();

    if let Some(offset) = node.get("offset") {
        timing.offset = decimal(offset).ok_or_else(|| invalid("offset", offset.to_string()))?;
    }
    if let Some(resolution) = node.get("resolution") {
        timing.resolution =
            values::unsigned(resolution).ok_or_else(|| invalid("resolution", resolution.to_string()))?;
    }
    if let Some(bpms) = node.get("bpms") {
        let list = bpms
            .as_array()
            .ok_or_else(|| invalid("bpms", "expected an array"))?;
        timing.bpms = list
            .iter()
            .map(parse_bpm_event)
            .collect::<Result<Vec<_>, _>>()?;
    }
    if let Some(hakus) = node.get("hakus") {
        let list = hakus
            .as_array()
            .ok_or_else(|| invalid("hakus", "expected an array"))?;
        timing.hakus = list
            .iter()
            .map(|h| beat_time(h).ok_or_else(|| invalid("hakus", h.to_string())))
            .collect::<Result<Vec<_>, _>>()?;
    }

    Ok(timing)
}

fn parse_bpm_event(node: &Value) -> Result<BpmEvent, FieldError> {
    let beat = match node.get("beat") {
        Some(v) => beat_time(v).ok_or_else(|| invalid("beat", v.to_string()))?,
        None => return Err(FieldError::Missing("beat")),
    };
    let bpm = match node.get("bpm") {
        Some(v) => decimal(v).ok_or_else(|| invalid("bpm", v.to_string()))?,
        None => return Err(FieldError::Missing("bpm")),
    };
    Ok(BpmEvent { beat, bpm })
}

/// Legacy files keep a single `BPM` and `offset` inside `metadata`.
fn legacy_timing(metadata: Option<&Value>) -> Result<MemonTiming, FieldError> {
    let mut timing = MemonTiming::default();
    let Some(metadata) = metadata else {
        return Ok(timing);
    };
    if let Some(bpm) = metadata.get("BPM") {
        let bpm = decimal(bpm).ok_or_else(|| invalid("BPM", bpm.to_string()))?;
        timing.bpms = vec![BpmEvent { beat: 0.0, bpm }];
    }
    if let Some(offset) = metadata.get("offset") {
        timing.offset = decimal(offset).ok_or_else(|| invalid("offset", offset.to_string()))?;
    }
    Ok(timing)
}

type ChartMap = BTreeMap<String, Result<MemonChart, FieldError>>;

fn parse_charts(node: &Value) -> Result<ChartMap, ChartDataError> {
    let object = node
        .as_object()
        .ok_or_else(|| invalid("data", "expected an object of charts"))?;
    let mut charts = BTreeMap::new();
    for (id, chart) in object {
        let parsed = parse_chart(id, chart);
        if let Err(e) = &parsed {
            log::warn!("CHART: Chart `{}` is unusable: {}", id, e);
        }
        charts.insert(id.clone(), parsed);
    }
    Ok(charts)
}

fn parse_chart(id: &str, node: &Value) -> Result<MemonChart, FieldError> {
    let level = match node.get("level") {
        Some(v) => decimal(v).ok_or_else(|| invalid("level", v.to_string()))?,
        None => 1.0,
    };
    let resolution = match node.get("resolution") {
        Some(v) => values::unsigned(v).ok_or_else(|| invalid("resolution", v.to_string()))?,
        None => DEFAULT_RESOLUTION,
    };
    let timing = node.get("timing").map(parse_timing).transpose()?;

    let mut notes = Vec::new();
    if let Some(list) = node.get("notes") {
        let list = list
            .as_array()
            .ok_or_else(|| invalid("notes", "expected an array"))?;
        for (i, raw) in list.iter().enumerate() {
            match parse_note(raw) {
                Ok(note) => notes.push(note),
                Err(reason) => {
                    log::warn!("CHART: Dropping note #{} of `{}`: {}", i, id, reason);
                }
            }
        }
    }

    Ok(MemonChart {
        level,
        resolution,
        timing,
        notes,
    })
}

fn parse_note(node: &Value) -> Result<Note, String> {
    let lane = node
        .get("n")
        .ok_or("missing `n`")?
        .as_u64()
        .filter(|&n| (n as usize) < LANE_COUNT)
        .ok_or("`n` must be a grid cell in 0..16")? as u8;

    let beat_ticks = beat_time(node.get("t").ok_or("missing `t`")?)
        .filter(|t| t.is_finite() && *t >= 0.0)
        .ok_or("`t` must be a non-negative beat-time")?;

    let hold_ticks = match node.get("l") {
        Some(v) => beat_time(v)
            .filter(|l| l.is_finite() && *l >= 0.0)
            .ok_or("`l` must be a non-negative beat-time")?,
        None => 0.0,
    };

    let tail_lane = match node.get("p") {
        Some(v) => v
            .as_u64()
            .filter(|&p| (p as usize) < TAIL_POSITIONS)
            .ok_or("`p` must be a tail position in 0..6")? as u8,
        None => 0,
    };

    Ok(Note {
        lane,
        beat_ticks,
        hold_ticks,
        tail_lane,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SONG: &str = r#"{
        "version": "1.0.0",
        "metadata": {
            "title": "Evans",
            "artist": "TOMOSUKE",
            "audio": "evans.ogg",
            "jacket": "jacket.png",
            "preview": {"start": 12.5, "duration": 8}
        },
        "timing": {
            "offset": -0.25,
            "resolution": 240,
            "bpms": [{"beat": 4, "bpm": 240}, {"beat": 0, "bpm": 120}],
            "hakus": [0, [1, 1, 2]]
        },
        "data": {
            "BSC": {
                "level": 3,
                "notes": [
                    {"n": 3, "t": 240},
                    {"n": 0, "t": [0, 1, 2]},
                    {"n": 5, "t": 480, "l": 240, "p": 2}
                ]
            },
            "EXT": {
                "level": "10.5",
                "resolution": 480,
                "timing": {"offset": 0, "bpms": [{"beat": 0, "bpm": 200}]},
                "notes": [{"n": 15, "t": 480}]
            }
        }
    }"#;

    #[test]
    fn parses_metadata_and_song_timing() {
        let song = parse_memon(SONG).unwrap();
        assert_eq!(song.metadata.title, "Evans");
        assert_eq!(song.metadata.audio.as_deref(), Some("evans.ogg"));
        assert_eq!(song.metadata.preview.start, 12.5);
        assert_eq!(song.metadata.preview.duration, 8.0);
        let timing = song.timing.as_ref().unwrap();
        assert_eq!(timing.offset, -0.25);
        assert_eq!(timing.hakus, vec![0.0, 1.5]);
        assert_eq!(song.chart_ids().collect::<Vec<_>>(), vec!["BSC", "EXT"]);
    }

    #[test]
    fn chart_inherits_song_timing_with_sorted_bpms() {
        let song = parse_memon(SONG).unwrap();
        let chart = song.chart("BSC").unwrap();
        assert_eq!(chart.level, 3.0);
        assert_eq!(chart.tempo.segments()[0], TempoSegment::new(0.0, 120.0));
        assert_eq!(chart.tempo.offset_seconds(), -0.25);
        // Fractional tick value is kept as-is; notes come out ordered.
        assert_eq!(chart.notes()[0].beat_ticks, 0.5);
        assert_eq!(chart.notes()[1].lane, 3);
        assert!((chart.beat_to_seconds(240.0) - 0.25).abs() < 1e-12);
        assert!(chart.notes()[2].is_long());
        assert_eq!(chart.notes()[2].tail_lane, 2);
    }

    #[test]
    fn chart_specific_timing_overrides_song_timing() {
        let song = parse_memon(SONG).unwrap();
        let chart = song.chart("EXT").unwrap();
        assert_eq!(chart.level, 10.5);
        assert_eq!(chart.resolution, 480);
        // 1 beat at 200 BPM.
        assert!((chart.beat_to_seconds(480.0) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn unknown_chart_is_an_error() {
        let song = parse_memon(SONG).unwrap();
        assert!(matches!(
            song.chart("ADV"),
            Err(ChartDataError::UnknownChart(id)) if id == "ADV"
        ));
    }

    #[test]
    fn malformed_notes_are_dropped() {
        let text = r#"{
            "data": {"BSC": {"notes": [
                {"n": 16, "t": 0},
                {"t": 240},
                {"n": 1},
                {"n": 2, "t": -1},
                {"n": 3, "t": [1, 1, 0]},
                {"n": 4, "t": 0, "p": 6},
                {"n": 7, "t": 960, "l": "long"},
                {"n": 8, "t": 240}
            ]}}
        }"#;
        let song = parse_memon(text).unwrap();
        let chart = song.chart("BSC").unwrap();
        assert_eq!(chart.note_count(), 1);
        assert_eq!(chart.notes()[0].lane, 8);
    }

    #[test]
    fn invalid_tempo_fails_chart_resolution() {
        let text = r#"{
            "timing": {"bpms": [{"beat": 0, "bpm": 150}, {"beat": 8, "bpm": 0}]},
            "data": {"BSC": {"notes": [{"n": 0, "t": 0}]}}
        }"#;
        let song = parse_memon(text).unwrap();
        assert!(matches!(
            song.chart("BSC"),
            Err(ChartDataError::Timing(ChartTimingError::NonPositiveBpm { .. }))
        ));

        let text = r#"{
            "timing": {"bpms": [{"beat": 1, "bpm": 150}]},
            "data": {"BSC": {}}
        }"#;
        assert!(matches!(
            parse_memon(text).unwrap().chart("BSC"),
            Err(ChartDataError::Timing(ChartTimingError::MissingZeroSegment(_)))
        ));
    }

    #[test]
    fn bad_chart_timing_only_fails_that_chart() {
        let text = r#"{
            "timing": {"bpms": [{"beat": 0, "bpm": 150}]},
            "data": {
                "BSC": {"notes": [{"n": 0, "t": 0}]},
                "EXT": {
                    "timing": {"bpms": [{"beat": 0, "bpm": "fast"}]},
                    "notes": [{"n": 1, "t": 0}]
                },
                "HRD": {"level": "hard", "notes": []}
            }
        }"#;
        let song = parse_memon(text).unwrap();
        assert_eq!(song.chart("BSC").unwrap().note_count(), 1);
        assert!(matches!(
            song.chart("EXT"),
            Err(ChartDataError::InvalidField { field: "bpm", .. })
        ));
        assert!(matches!(
            song.chart("HRD"),
            Err(ChartDataError::InvalidField { field: "level", .. })
        ));
    }

    #[test]
    fn bad_song_timing_spares_charts_with_their_own() {
        let text = r#"{
            "timing": {"bpms": [{"bpm": 150}]},
            "data": {
                "BSC": {"notes": [{"n": 0, "t": 0}]},
                "EXT": {"timing": {"bpms": [{"beat": 0, "bpm": 180}]}, "notes": []}
            }
        }"#;
        let song = parse_memon(text).unwrap();
        assert_eq!(song.timing, Err(FieldError::Missing("beat")));
        assert!(matches!(
            song.chart("BSC"),
            Err(ChartDataError::MissingField("beat"))
        ));
        assert_eq!(song.chart("EXT").unwrap().tempo.bpm_at_beat(0.0), 180.0);
    }

    #[test]
    fn legacy_layout_reads_metadata_timing() {
        let text = r#"{
            "version": "0.2.0",
            "metadata": {
                "song title": "Old Song",
                "artist": "Someone",
                "music path": "old.mp3",
                "album cover path": "old.jpg",
                "BPM": "150",
                "offset": 0.5,
                "preview": "preview.ogg"
            },
            "data": {"ADV": {"resolution": 240, "notes": [{"n": 9, "t": 240}]}}
        }"#;
        let song = parse_memon(text).unwrap();
        assert_eq!(song.metadata.title, "Old Song");
        assert_eq!(song.metadata.audio.as_deref(), Some("old.mp3"));
        assert_eq!(song.metadata.jacket.as_deref(), Some("old.jpg"));
        assert_eq!(song.metadata.preview.file.as_deref(), Some("preview.ogg"));

        let chart = song.chart("ADV").unwrap();
        assert!((chart.beat_to_seconds(240.0) - 0.9).abs() < 1e-12);
    }

    #[test]
    fn missing_timing_defaults_to_120_bpm() {
        let song = parse_memon(r#"{"data": {"BSC": {"notes": []}}}"#).unwrap();
        let chart = song.chart("BSC").unwrap();
        assert_eq!(chart.tempo.segments(), &[TempoSegment::new(0.0, 120.0)]);
        assert_eq!(chart.resolution, DEFAULT_RESOLUTION);
    }

    #[test]
    fn rejects_non_json_and_non_object_roots() {
        assert!(matches!(parse_memon("{"), Err(ChartDataError::Json(_))));
        assert!(matches!(
            parse_memon("[1, 2]"),
            Err(ChartDataError::InvalidField { field: "root", .. })
        ));
    }
}
