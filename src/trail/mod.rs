//! Trail model: points, the bounded store, distance sampling and per-frame decay
//!
//! The constants here are fixed for every trail; nothing in the crate
//! reconfigures them at runtime.

pub mod decay;
pub mod point;
pub mod sampler;
pub mod store;

pub use decay::{decay_point, FrameDecision};
pub use point::{size_multiplier, PointId, TrailPoint};
pub use sampler::{distance, MotionSampler};
pub use store::TrailStore;

/// Edge length of a fresh trail pixel, also the sampling distance threshold
pub const PIXEL_SIZE: f64 = 12.0;

/// Maximum number of live trail points
pub const TRAIL_LENGTH: usize = 40;

/// Opacity lost per decay tick
pub const FADE_SPEED: f64 = 0.04;

/// Lower bound of the size multiplier; pixels never shrink past this
pub const MIN_SIZE_MULTIPLIER: f64 = 0.3;

/// Element id of the container the trail pixels are attached to
pub const MOUNT_ID: &str = "pixel-trail-container";
