//! Grid constants and runtime configuration defaults

/// Side length in pixels of the square region owned by one cluster
pub const DEFAULT_STRIDE: usize = 16;

/// Fraction of a cell's `S²` pixels a neighborhood must exceed to stay updatable
pub const DEFAULT_PREEMPTION_THRESHOLD: f32 = 0.05;

/// Largest neighborhood a cell can have (a full 3x3 block)
pub const MAX_NEIGHBORHOOD_CELLS: usize = 9;

/// Largest image side whose pixel coordinates fit a cluster's `u16` position
pub const MAX_IMAGE_SIDE: usize = u16::MAX as usize + 1;

// Synthetic replay defaults
/// Width of generated label frames
pub const DEFAULT_SYNTHETIC_WIDTH: usize = 256;
/// Height of generated label frames
pub const DEFAULT_SYNTHETIC_HEIGHT: usize = 256;
/// Number of clustering iterations to replay
pub const DEFAULT_ITERATIONS: usize = 10;
/// Fixed seed for reproducible synthetic sequences
pub const DEFAULT_SEED: u64 = 42;
/// Extra label entries appended to each generated row
pub const SYNTHETIC_ROW_PADDING: usize = 8;
/// Share of boundary pixels jittered in the first synthetic iteration
pub const SYNTHETIC_INITIAL_JITTER: f64 = 0.5;
/// Per-iteration decay of the synthetic jitter rate
pub const SYNTHETIC_JITTER_DECAY: f64 = 0.5;
/// Distance from a cell edge, in pixels, that counts as boundary
pub const SYNTHETIC_BOUNDARY_WIDTH: usize = 2;

// Output settings
/// Directory used when no output directory is given
pub const DEFAULT_OUTPUT_DIR: &str = "pregrid_output";
/// File name of the exported activity animation
pub const ACTIVITY_GIF_NAME: &str = "activity.gif";
/// File name of the exported final mask overlay
pub const FINAL_MASK_NAME: &str = "final_mask.png";
/// Delay between GIF animation frames
pub const GIF_FRAME_DELAY_MS: u32 = 250;
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;
/// Log specification used when none is given
pub const DEFAULT_LOG_LEVEL: &str = "info";
