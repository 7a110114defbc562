/// Label views and snapshots over strided buffers
pub mod assignment;
/// Owned frames and the label source trait
pub mod source;
/// Seeded converging label sequences
pub mod synthetic;
