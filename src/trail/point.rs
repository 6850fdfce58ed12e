//! A single trail point and its rendered geometry

use crate::surface::{ElementId, PixelStyle};
use crate::trail::{MIN_SIZE_MULTIPLIER, PIXEL_SIZE};
use serde::Serialize;
use std::fmt;

/// Monotonic identity of a trail point within one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PointId(pub u64);

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pixel-{}", self.0)
    }
}

/// Size multiplier for a point of the given age
///
/// Shrinks linearly by 1% per frame and floors at [`MIN_SIZE_MULTIPLIER`].
pub fn size_multiplier(age: u32) -> f64 {
    (1.0 - f64::from(age) / 100.0).max(MIN_SIZE_MULTIPLIER)
}

/// One sampled trail element
///
/// The render handle is owned by the point. It is not `Clone` so that
/// exactly one owner releases the element when the point leaves the store.
#[derive(Debug, PartialEq)]
pub struct TrailPoint {
    id: PointId,
    x: f64,
    y: f64,
    pub(crate) opacity: f64,
    pub(crate) age: u32,
    element: ElementId,
}

impl TrailPoint {
    pub fn new(id: PointId, x: f64, y: f64, element: ElementId) -> Self {
        Self {
            id,
            x,
            y,
            opacity: 1.0,
            age: 0,
            element,
        }
    }

    pub fn id(&self) -> PointId {
        self.id
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    /// Current rendered edge length in pixels
    pub fn size(&self) -> f64 {
        PIXEL_SIZE * size_multiplier(self.age)
    }

    pub fn is_expired(&self) -> bool {
        self.opacity <= 0.0
    }

    /// Style for the point's element, centered on `(x, y)`
    pub fn style(&self) -> PixelStyle {
        PixelStyle::centered(self.x, self.y, self.size(), self.opacity)
    }
}
