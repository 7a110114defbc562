//! Replay driving and statistics over preemption runs

/// Sequence replay through a preemption grid
pub mod replay;
/// Per-iteration statistics and run summaries
pub mod statistics;
