//! End-to-end play sessions over a parsed memon chart.

use rjbt::models::engine::resolve_note_times;
use rjbt::{
    EngineEvent, EngineSettings, GameSession, Judgement, JudgmentResult, PlaybackState, Transport,
    VirtualTransport, parse_memon,
};
use std::sync::Arc;

const DT: f64 = 0.01;

/// 120 BPM for four beats, then 60 BPM.
const SONG: &str = r#"{
    "version": "1.0.0",
    "metadata": { "title": "Tempo Drop", "artist": "Test", "audio": "song.ogg" },
    "timing": {
        "offset": 0,
        "resolution": 240,
        "bpms": [ { "beat": 0, "bpm": 120 }, { "beat": 4, "bpm": 60 } ]
    },
    "data": {
        "EXT": {
            "level": 9.4,
            "notes": [
                { "n": 7, "t": 1200 },
                { "n": 3, "t": 240 },
                { "n": 0, "t": 480, "l": 240, "p": 2 }
            ]
        }
    }
}"#;

fn session(transport: VirtualTransport) -> GameSession<VirtualTransport> {
    let song = parse_memon(SONG).unwrap();
    let chart = song.chart("EXT").unwrap();
    GameSession::new(Arc::new(chart), &EngineSettings::default(), transport)
}

fn run_until(s: &mut GameSession<VirtualTransport>, t: f64) {
    while s.transport().position_seconds() + DT / 2.0 < t {
        s.update(DT);
    }
}

#[test]
fn note_times_follow_tempo_changes() {
    let song = parse_memon(SONG).unwrap();
    let chart = song.chart("EXT").unwrap();
    let times = resolve_note_times(&chart);

    assert!((times[0].start_seconds - 0.5).abs() < 1e-9);
    assert!((times[1].start_seconds - 1.0).abs() < 1e-9);
    assert!((times[1].end_seconds - 1.5).abs() < 1e-9);
    assert!((times[2].start_seconds - 3.0).abs() < 1e-9);
    assert!((chart.duration_seconds() - 3.0).abs() < 1e-9);
}

#[test]
fn full_session_scores_hits_and_misses() {
    let mut s = session(VirtualTransport::new());
    s.start().unwrap();

    run_until(&mut s, 0.52);
    assert!(matches!(
        s.hit(3, 0.52),
        Some(JudgmentResult::Hit {
            judgement: Judgement::Perfect,
            points: 300,
            ..
        })
    ));

    run_until(&mut s, 1.07);
    assert!(matches!(
        s.hit(0, 1.07),
        Some(JudgmentResult::Hit {
            judgement: Judgement::Great,
            points: 200,
            ..
        })
    ));

    run_until(&mut s, 2.5);
    assert_eq!(s.snapshot().bpm, 60.0);

    // Lane 7 is never pressed.
    run_until(&mut s, 3.2);
    assert_eq!(s.hit_stats().miss, 1);
    assert_eq!(s.score(), 500);
    assert!(!s.is_finished());

    run_until(&mut s, 5.1);
    assert!(s.is_finished());

    let snap = s.snapshot();
    assert_eq!(snap.judged, 3);
    assert_eq!(snap.remaining, 0);
    assert!(snap.live_notes.is_empty());
    assert_eq!(snap.time_label, "0:05");

    let events = s.drain_events();
    let late_misses: Vec<&EngineEvent> = events
        .iter()
        .filter(|e| matches!(e, EngineEvent::LateMiss { .. }))
        .collect();
    assert_eq!(late_misses.len(), 1);
    assert!(matches!(late_misses[0], EngineEvent::LateMiss { lane: 7, .. }));
}

#[test]
fn edge_of_window_is_still_a_hit() {
    let mut s = session(VirtualTransport::new());
    s.start().unwrap();
    run_until(&mut s, 0.4);

    assert!(matches!(
        s.hit(3, 0.4),
        Some(JudgmentResult::Hit {
            judgement: Judgement::Great,
            ..
        })
    ));
    // Second press on the same note finds nothing.
    assert_eq!(s.hit(3, 0.4), Some(JudgmentResult::Miss { lane: 3 }));
    assert_eq!(s.hit_stats().empty_press, 1);
}

#[test]
fn session_without_audio_never_starts() {
    let mut s = session(VirtualTransport::unavailable());
    assert!(s.start().is_err());
    assert_eq!(s.state(), PlaybackState::Idle);

    s.update(1.0);
    assert_eq!(s.hit(3, 0.5), None);
    assert!(s.snapshot().degraded);
    assert!(s.drain_events().is_empty());
}

#[test]
fn restart_after_finish_plays_again() {
    let mut s = session(VirtualTransport::new());
    s.start().unwrap();
    run_until(&mut s, 5.1);
    assert_eq!(s.hit_stats().miss, 3);

    s.stop();
    assert_eq!(s.state(), PlaybackState::Stopped);
    assert_eq!(s.score(), 0);
    assert_eq!(s.hit_stats().miss, 3);

    s.start().unwrap();
    assert_eq!(s.hit_stats().miss, 0);
    assert_eq!(s.scheduler().judged_count(), 0);
    run_until(&mut s, 0.5);
    assert!(matches!(s.hit(3, 0.5), Some(JudgmentResult::Hit { .. })));
}
