//! Bounded, insertion-ordered store of live trail points

use crate::trail::point::TrailPoint;
use crate::trail::TRAIL_LENGTH;
use std::collections::VecDeque;

/// Ordered collection of trail points, oldest first
///
/// Holds at most `capacity` points. Removal never releases render handles
/// itself: removed points are handed back to the caller, who owns disposal.
#[derive(Debug)]
pub struct TrailStore {
    points: VecDeque<TrailPoint>,
    capacity: usize,
}

impl Default for TrailStore {
    fn default() -> Self {
        Self::with_capacity(TRAIL_LENGTH)
    }
}

impl TrailStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Push a point at the tail
    ///
    /// Returns the evicted head when the push took the store over capacity.
    pub fn append(&mut self, point: TrailPoint) -> Option<TrailPoint> {
        self.points.push_back(point);
        if self.points.len() > self.capacity {
            self.points.pop_front()
        } else {
            None
        }
    }

    /// Keep only the points matching `keep`, passing every other point to `removed`
    ///
    /// Survivors keep their relative order. Returns how many points were removed.
    pub fn retain<K, R>(&mut self, mut keep: K, mut removed: R) -> usize
    where
        K: FnMut(&TrailPoint) -> bool,
        R: FnMut(TrailPoint),
    {
        let before = self.points.len();
        let mut kept = VecDeque::with_capacity(self.capacity + 1);
        for point in self.points.drain(..) {
            if keep(&point) {
                kept.push_back(point);
            } else {
                removed(point);
            }
        }
        self.points = kept;
        before - self.points.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrailPoint> {
        self.points.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut TrailPoint> {
        self.points.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn oldest(&self) -> Option<&TrailPoint> {
        self.points.front()
    }

    pub fn newest(&self) -> Option<&TrailPoint> {
        self.points.back()
    }
}
