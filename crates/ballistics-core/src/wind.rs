//! Piecewise-constant wind vs. downrange distance (spec §3, §4.3).

use crate::vec3::Vec3;

/// One wind segment: constant wind applying for
/// `x ∈ [previous.until_distance_ft, until_distance_ft)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindSegment {
    /// Wind speed, fps.
    pub velocity_fps: f64,
    /// Direction the wind is blowing *from*, radians (clock convention as
    /// used by the rest of the shot geometry).
    pub direction_from_rad: f64,
    /// Downrange distance (feet) at which this segment ends.
    pub until_distance_ft: f64,
}

impl WindSegment {
    fn vector(self) -> Vec3 {
        Vec3::new(self.velocity_fps * self.direction_from_rad.cos(), 0.0, self.velocity_fps * self.direction_from_rad.sin())
    }
}

/// Ordered sequence of wind segments with a cached "current segment" pointer.
///
/// Beyond the last segment, wind is the zero vector.
#[derive(Clone, Debug)]
pub struct WindField {
    segments: Vec<WindSegment>,
    index: usize,
    cached: Vec3,
}

impl WindField {
    /// Build a wind field from segments already sorted by `until_distance_ft`.
    pub fn new(segments: Vec<WindSegment>) -> Self {
        let cached = segments.first().map(|s| s.vector()).unwrap_or(Vec3::ZERO);
        Self { segments, index: 0, cached }
    }

    /// A wind field with no segments at all: always zero.
    pub fn calm() -> Self {
        Self::new(Vec::new())
    }

    /// The cached wind vector for the currently active segment.
    pub fn current_vector(&self) -> Vec3 {
        self.cached
    }

    /// Advance the segment pointer while `x >= segment_end`, recomputing the
    /// cached vector on each advance, then return it.
    pub fn vector_for(&mut self, x_ft: f64) -> Vec3 {
        while self.index < self.segments.len() && x_ft >= self.segments[self.index].until_distance_ft {
            self.index += 1;
            self.cached = self.segments.get(self.index).map(|s| s.vector()).unwrap_or(Vec3::ZERO);
        }
        self.cached
    }

    /// Rewind the cached segment pointer to the start, as required at the
    /// beginning of every fresh integration run.
    pub fn reset(&mut self) {
        self.index = 0;
        self.cached = self.segments.first().map(|s| s.vector()).unwrap_or(Vec3::ZERO);
    }
}
