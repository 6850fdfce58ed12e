//! Distance-throttled pointer sampling
//!
//! A pointer move only becomes a trail point once it is more than one pixel
//! edge away from the last accepted sample. Slow movement therefore does not
//! flood the store with near-duplicate points.

use crate::trail::PIXEL_SIZE;

/// Euclidean distance between two viewport positions
pub fn distance(from: (f64, f64), to: (f64, f64)) -> f64 {
    let dx = to.0 - from.0;
    let dy = to.1 - from.1;
    (dx * dx + dy * dy).sqrt()
}

/// Tracks the last accepted sample position
#[derive(Debug, Clone)]
pub struct MotionSampler {
    last_accepted: (f64, f64),
    threshold: f64,
}

impl Default for MotionSampler {
    /// Starts at the viewport origin, so the first move is measured against `(0, 0)`
    fn default() -> Self {
        Self {
            last_accepted: (0.0, 0.0),
            threshold: PIXEL_SIZE,
        }
    }
}

impl MotionSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether a move to `(x, y)` produces a trail point
    ///
    /// Accepting moves the reference position to `(x, y)`; a rejected move
    /// leaves the sampler untouched.
    pub fn sample(&mut self, x: f64, y: f64) -> bool {
        let accepted = self.accepts(x, y);
        if accepted {
            self.accept(x, y);
        }
        accepted
    }

    /// Whether a move to `(x, y)` is far enough from the last accepted sample
    pub fn accepts(&self, x: f64, y: f64) -> bool {
        distance(self.last_accepted, (x, y)) > self.threshold
    }

    /// Make `(x, y)` the reference position for later moves
    pub fn accept(&mut self, x: f64, y: f64) {
        self.last_accepted = (x, y);
    }

    pub fn last_accepted(&self) -> (f64, f64) {
        self.last_accepted
    }
}
