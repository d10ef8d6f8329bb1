// Re-export glam for convenience
pub use glam::*;

// Splat math types
mod activation;
mod coordinates;

pub use activation::{inverse_sigmoid, sigmoid, SH_C0};
pub use coordinates::{CoordinateConverter, CoordinateSystem};
