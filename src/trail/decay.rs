//! Per-frame aging of trail points

use crate::trail::point::TrailPoint;
use crate::trail::FADE_SPEED;

/// Whether the frame loop should arm another decay tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameDecision {
    /// Request the next display frame
    Continue,
    /// The session has been torn down; do not re-arm
    Stop,
}

/// Age a point by one frame
///
/// Fades opacity by [`FADE_SPEED`] and advances the age counter. The rendered
/// size follows from the age (see [`TrailPoint::size`]).
pub fn decay_point(point: &mut TrailPoint) {
    point.opacity -= FADE_SPEED;
    point.age += 1;
}
