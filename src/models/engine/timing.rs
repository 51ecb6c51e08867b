//! Beat to seconds conversion.
//!
//! Pure functions over an immutable [`Chart`]; safe to call from any thread.

use crate::models::chart::Chart;

/// Converts a tick position in `chart`'s resolution to absolute seconds.
pub fn beat_to_seconds(beat_ticks: f64, chart: &Chart) -> f64 {
    chart.beat_to_seconds(beat_ticks)
}

/// Resolved start and end times (seconds) of a note.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteTiming {
    pub start_seconds: f64,
    pub end_seconds: f64,
}

/// Batch-resolves every note of `chart`, in chart order.
pub fn resolve_note_times(chart: &Chart) -> Vec<NoteTiming> {
    chart
        .notes()
        .iter()
        .map(|note| {
            let start_seconds = beat_to_seconds(note.beat_ticks, chart);
            let end_seconds = if note.is_long() {
                beat_to_seconds(note.beat_ticks + note.hold_ticks, chart)
            } else {
                start_seconds
            };
            NoteTiming {
                start_seconds,
                end_seconds,
            }
        })
        .collect()
}
