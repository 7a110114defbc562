//! Preemption grid for iterative superpixel clustering
//!
//! Tracks how much the pixel labeling changes between clustering iterations,
//! per stride-sized cell, and turns that signal into two masks: cells whose
//! pixels the next labeling pass must revisit (active) and clusters that may
//! move their centers (updatable). Converged regions drop out of the work.

#![deny(unsafe_code)]

/// Replay driving and activity statistics
pub mod analysis;
/// Cell layout, masks, clusters and the preemption grid itself
pub mod grid;
/// Input/output operations, configuration and error handling
pub mod io;
/// Label arrays, snapshots and frame sources
pub mod labels;

pub use grid::{Cluster, PreemptionConfig, PreemptionGrid};
pub use io::error::{GridError, Result};
