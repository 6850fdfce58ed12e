//! Pixel Trail - a decaying trail of square pixels that follows the pointer.
//!
//! The trail itself lives in [`session::TrailSession`]: pointer moves are
//! sampled into points, points are kept in a bounded store, and every frame
//! fades and shrinks them until they are retired. Drawing happens through a
//! [`surface::RenderSurface`], and [`runtime`] provides the cooperative host
//! loop that delivers pointer moves, frames and lifecycle signals.

pub mod replay;
pub mod runtime;
pub mod session;
pub mod surface;
pub mod trail;

pub use runtime::{HostEvent, RuntimeConfig, TrailHandle};
pub use session::{SessionState, TrailSession, TrailStats};
pub use surface::{JsonLinesSurface, MemorySurface, RenderSurface};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging
///
/// Logs go to stderr so stdout stays free for render operations and reports.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pixel_trail=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
