//! Chart timeline and judgment engine for 4x4 grid rhythm charts.

pub mod error;
pub mod input;
pub mod library;
pub mod logic;
pub mod memon;
pub mod models;
pub mod shared;
pub mod state;
pub mod system;

pub use error::{ChartDataError, ChartTimingError, ConfigError, TransportUnavailableError};
pub use logic::transport::{Transport, VirtualTransport};
pub use memon::{MemonFile, parse_memon};
pub use models::{Chart, EngineSettings, HitStats, Judgement, Note, TempoTimeline};
pub use shared::messages::EngineEvent;
pub use shared::snapshot::GameplaySnapshot;
pub use state::{GameSession, JudgmentResult, PlaybackState};
