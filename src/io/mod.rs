/// Command-line parsing and replay orchestration
pub mod cli;
/// Constants and defaults
pub mod configuration;
/// Error types
pub mod error;
/// Label map PNG loading and mask export
pub mod image;
/// Logger setup
pub mod logging;
/// Progress display
pub mod progress;
/// Activity animation capture
pub mod visualization;
