//! Spatial bookkeeping over the coarse cell grid
//!
//! This module contains:
//! - Cell layout arithmetic and clipped neighborhoods
//! - Per-cell boolean masks
//! - The preemption grid deciding activity and updatability

/// Cluster centers and their home cells
pub mod cluster;
/// Cell partition arithmetic
pub mod layout;
/// Fixed-size per-cell flags
pub mod mask;
/// Change accounting and activity gating
pub mod preemption;

pub use cluster::Cluster;
pub use layout::CellLayout;
pub use mask::CellMask;
pub use preemption::{PreemptionConfig, PreemptionGrid};
