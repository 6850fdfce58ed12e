//! Host loop configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default frame period, roughly one 60 Hz display refresh
pub const DEFAULT_FRAME_PERIOD_MS: u64 = 16;

/// Where decay ticks come from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FrameSource {
    /// The loop arms its own frame timer with this period
    #[serde(rename_all = "camelCase")]
    Interval { period_ms: u64 },
    /// The host delivers `frame` events, one per display refresh
    External,
}

impl Default for FrameSource {
    fn default() -> Self {
        FrameSource::Interval {
            period_ms: DEFAULT_FRAME_PERIOD_MS,
        }
    }
}

impl FrameSource {
    /// Frame period for timer driven sources
    pub fn period(&self) -> Option<Duration> {
        match self {
            // A zero period would make the timer panic
            FrameSource::Interval { period_ms } => Some(Duration::from_millis((*period_ms).max(1))),
            FrameSource::External => None,
        }
    }
}

/// Configuration of the host loop
///
/// This only controls how the trail is driven. The trail constants themselves
/// are fixed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuntimeConfig {
    /// The host document is already interactive when the loop starts.
    /// When false the trail waits for a `ready` event.
    pub document_ready: bool,
    pub frame_source: FrameSource,
}
