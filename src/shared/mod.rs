//! Types passed between the logic thread and its consumers.

pub mod messages;
pub mod snapshot;
