//! Fixed-length chart history.
//!
//! The buffer starts full of zeros so the chart scrolls in from the right
//! edge instead of stretching while it fills.

use heapless::Deque;

use crate::config::MAX_CHART_HISTORY;

/// FIFO of chart points. Every push evicts the oldest value once the
/// configured depth is reached.
#[derive(Clone, Debug)]
pub struct ChartBuffer {
    points: Deque<f32, MAX_CHART_HISTORY>,
    depth: usize,
}

impl ChartBuffer {
    /// Create a buffer of `depth` zeros. Depth is clamped to `1..=128`.
    pub fn new(depth: usize) -> Self {
        let depth = depth.clamp(1, MAX_CHART_HISTORY);
        let mut points = Deque::new();
        for _ in 0..depth {
            points.push_back(0.0).ok();
        }
        Self { points, depth }
    }

    /// Append a point, evicting the oldest.
    pub fn push(
        &mut self,
        value: f32,
    ) {
        if self.points.len() >= self.depth {
            self.points.pop_front();
        }
        self.points.push_back(value).ok();
    }

    /// Refill with zeros.
    pub fn clear(&mut self) { *self = Self::new(self.depth); }

    #[inline]
    pub const fn depth(&self) -> usize { self.depth }

    #[inline]
    pub fn len(&self) -> usize { self.points.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.points.is_empty() }

    /// Most recent point.
    #[inline]
    pub fn latest(&self) -> Option<f32> { self.points.back().copied() }

    /// Points oldest first.
    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ { self.points.iter().copied() }

    /// (min, max) over the buffer, for auto-scaling.
    pub fn min_max(&self) -> (f32, f32) {
        self.points
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
