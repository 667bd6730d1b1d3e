//! Three-component double vector (spec §3).
//!
//! `x` = downrange, `y` = vertical (positive up), `z` = cross-range
//! (positive right of flight). Gravity is `(0, g, 0)` with `g < 0`.

use core::ops::{Add, AddAssign, Mul, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A double-precision 3-component vector.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    /// The zero vector.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };

    /// Build a vector from its three components.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Dot product.
    pub fn dot(self, rhs: Self) -> f64 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    /// Euclidean magnitude.
    pub fn magnitude(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Scale by a scalar. Equivalent to `self * k`, kept for call-sites that
    /// read better as a method (the teacher's `Wind`/`Vec3` both offer this).
    pub fn scale(self, k: f64) -> Self {
        self * k
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;
    fn mul(self, k: f64) -> Self {
        Self::new(self.x * k, self.y * k, self.z * k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn magnitude_of_unit_axes() {
        assert_relative_eq!(Vec3::new(1.0, 0.0, 0.0).magnitude(), 1.0);
        assert_relative_eq!(Vec3::new(3.0, 4.0, 0.0).magnitude(), 5.0);
    }

    #[test]
    fn add_sub_roundtrip() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(0.5, -1.0, 2.0);
        assert_relative_eq!((a + b - b).x, a.x);
        assert_relative_eq!((a + b - b).y, a.y);
        assert_relative_eq!((a + b - b).z, a.z);
    }

    #[test]
    fn scale_matches_mul() {
        let a = Vec3::new(1.0, -2.0, 3.0);
        assert_eq!(a.scale(2.0), a * 2.0);
    }
}
