//! Data models shared by the parser, the engine and the presentation layer.

pub mod chart;
pub mod engine;
pub mod settings;
pub mod stats;

pub use chart::{Chart, Note, TempoSegment, TempoTimeline};
pub use settings::EngineSettings;
pub use stats::{HitStats, Judgement};
