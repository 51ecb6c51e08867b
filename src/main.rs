//! Command line front end: library listing and terminal play sessions.

use clap::{Parser, Subcommand, crate_version};
use crossbeam_channel::RecvTimeoutError;
use rjbt::input::autoplay;
use rjbt::input::events::{GameAction, RawKeyEvent};
use rjbt::input::keymap::KeyMap;
use rjbt::library::{load_song, scan_library};
use rjbt::logic::{self, SessionSummary};
use rjbt::shared::messages::EngineEvent;
use rjbt::system::bus::{SystemBus, SystemEvent};
use rjbt::{EngineSettings, GameSession, VirtualTransport};
use std::error::Error;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

#[derive(Parser)]
#[clap(version = crate_version!(), about = "A 4x4 grid rhythm chart player.")]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lists every memon song found under the given directory.
    Songs {
        /// The songs directory.
        path: PathBuf,
    },
    /// Plays one chart of a memon file in the terminal.
    Play {
        /// The memon file.
        file: PathBuf,
        /// Chart id, e.g. BSC, ADV or EXT. Defaults to the first chart.
        #[arg(short, long)]
        chart: Option<String>,
        /// Settings file.
        #[arg(long, default_value = "settings.toml")]
        config: PathBuf,
        /// Press every note on time instead of reading keys from stdin.
        #[arg(short, long)]
        autoplay: bool,
        /// Print the final summary as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Prints the default settings as TOML.
    Defaults {},
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Songs { path } => list_songs(&path),
        Commands::Play {
            file,
            chart,
            config,
            autoplay,
            json,
        } => play(&file, chart.as_deref(), &config, autoplay, json),
        Commands::Defaults {} => {
            print!("{}", EngineSettings::default().to_toml_string()?);
            Ok(())
        }
    }
}

fn list_songs(path: &Path) -> Result<(), Box<dyn Error>> {
    let songs = scan_library(path);
    if songs.is_empty() {
        println!("No songs found in {}", path.display());
        return Ok(());
    }

    for entry in songs {
        let levels: Vec<String> = entry
            .song
            .charts
            .iter()
            .map(|(id, chart)| match chart {
                Ok(chart) => format!("{} {}", id, chart.level),
                Err(_) => format!("{} (invalid)", id),
            })
            .collect();
        println!(
            "{} - {} [{}]{}",
            entry.song.metadata.artist,
            entry.title(),
            levels.join(", "),
            if entry.audio_path.is_some() {
                ""
            } else {
                " (no audio)"
            }
        );
        println!("    {} {}", entry.hash, entry.memon_path.display());
    }
    Ok(())
}

fn play(
    file: &Path,
    chart_id: Option<&str>,
    config: &Path,
    use_autoplay: bool,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let settings = EngineSettings::load(config)?;
    let entry = load_song(file)?;
    let chart_id = match chart_id {
        Some(id) => id.to_string(),
        None => entry
            .song
            .chart_ids()
            .next()
            .map(str::to_string)
            .ok_or("memon file has no charts")?,
    };
    let chart = Arc::new(entry.song.chart(&chart_id)?);

    let transport = match &entry.audio_path {
        Some(path) if path.is_file() => VirtualTransport::new(),
        _ => {
            log::warn!("MAIN: Audio asset missing for {}", entry.title());
            VirtualTransport::unavailable()
        }
    };

    let session = GameSession::new(chart.clone(), &settings, transport);
    if session.is_degraded() {
        println!("{}: audio unavailable, playback cannot start", entry.title());
        return Ok(());
    }

    println!(
        "{} [{}] - {} notes, {:.1}s",
        entry.title(),
        chart_id,
        chart.note_count(),
        chart.duration_seconds()
    );

    let bus = SystemBus::new();
    let handle = logic::start_thread(bus.clone(), session, settings.ticks_per_second)?;
    bus.action_tx.send(GameAction::Start)?;
    let origin = Instant::now();

    if use_autoplay {
        autoplay::start_thread(autoplay::press_schedule(&chart), origin, bus.action_tx.clone())?;
    } else {
        println!("Type key names (e.g. KeyQ Digit4) and press enter. Escape stops.");
        rjbt::input::start_thread(
            bus.raw_input_rx.clone(),
            bus.action_tx.clone(),
            KeyMap::from_settings(&settings),
        )?;
        spawn_stdin_reader(bus.clone(), origin)?;
    }

    loop {
        match bus.event_rx.recv_timeout(Duration::from_millis(100)) {
            Ok(event) => print_event(&event),
            Err(RecvTimeoutError::Timeout) if handle.is_finished() => break,
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
        while let Ok(snapshot) = bus.render_rx.try_recv() {
            log::trace!(
                "MAIN: {} {:.0} BPM, {} live",
                snapshot.time_label,
                snapshot.bpm,
                snapshot.live_notes.len()
            );
        }
    }

    let summary = handle
        .join()
        .map_err(|_| "logic thread panicked")?;
    for event in bus.event_rx.try_iter() {
        print_event(&event);
    }
    if json {
        println!("{}", summary.to_json()?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

/// Lines of whitespace-separated key names, timestamped on arrival.
fn spawn_stdin_reader(bus: SystemBus, origin: Instant) -> std::io::Result<()> {
    thread::Builder::new()
        .name("Stdin Thread".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                let time = origin.elapsed().as_secs_f64();
                for key in line.split_whitespace() {
                    if key.eq_ignore_ascii_case("quit") {
                        let _ = bus.sys_tx.send(SystemEvent::Quit);
                        return;
                    }
                    let raw = RawKeyEvent {
                        key: key.to_string(),
                        time,
                    };
                    if bus.raw_input_tx.send(raw).is_err() {
                        return;
                    }
                }
            }
        })?;
    Ok(())
}

fn print_event(event: &EngineEvent) {
    match event {
        EngineEvent::NoteHit {
            lane,
            judgement,
            offset_seconds,
            points,
            ..
        } => println!(
            "  lane {:>2}  {:<7} {:+.3}s  +{}",
            lane, judgement, offset_seconds, points
        ),
        EngineEvent::LateMiss { lane, .. } => println!("  lane {:>2}  MISS", lane),
        EngineEvent::EmptyPress { lane } => println!("  lane {:>2}  (empty)", lane),
        EngineEvent::StateChanged(state) => println!("[{}]", state),
        other => log::debug!("MAIN: {:?}", other),
    }
}

fn print_summary(summary: &SessionSummary) {
    let stats = &summary.hit_stats;
    println!(
        "Score {}  Accuracy {:.2}%  (Perfect {}, Great {}, Miss {}, Empty {}){}",
        summary.score,
        summary.accuracy,
        stats.perfect,
        stats.great,
        stats.miss,
        stats.empty_press,
        if summary.completed { "" } else { "  [aborted]" }
    );
}
