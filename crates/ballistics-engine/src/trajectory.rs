//! Dense trajectory buffer and PCHIP interpolation by key (spec §3, §4.7).

use ballistics_core::{BallisticsError, Vec3};

/// One dense ODE output point: no derived quantities.
///
/// `mach` is the local speed of sound (fps) at this sample's altitude, not
/// a dimensionless ratio — `velocity.magnitude() / mach` is the Mach number.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BaseTrajSample {
    pub time_s: f64,
    pub position: Vec3,
    pub velocity: Vec3,
    pub mach: f64,
}

/// An interpolation key (spec §9: replaces dynamic attribute access with an
/// explicit enumerated selector — a pure function, not name reflection).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InterpKey {
    Time,
    Mach,
    PosX,
    PosY,
    PosZ,
    VelX,
    VelY,
    VelZ,
    /// `y*cos(look_angle) - x*sin(look_angle)`.
    SlantHeight,
}

impl InterpKey {
    /// Extract this key's scalar value from a sample.
    pub fn extract(self, s: &BaseTrajSample, look_angle_rad: f64) -> f64 {
        match self {
            InterpKey::Time => s.time_s,
            InterpKey::Mach => s.mach,
            InterpKey::PosX => s.position.x,
            InterpKey::PosY => s.position.y,
            InterpKey::PosZ => s.position.z,
            InterpKey::VelX => s.velocity.x,
            InterpKey::VelY => s.velocity.y,
            InterpKey::VelZ => s.velocity.z,
            InterpKey::SlantHeight => s.position.y * look_angle_rad.cos() - s.position.x * look_angle_rad.sin(),
        }
    }

    /// Whether this key is expected to vary monotonically along a normal
    /// trajectory, letting the center-index search use plain bisection.
    /// Time and downrange position always do; everything else (velocity
    /// components, slant height past apex) may not, so those fall back to
    /// a linear scan.
    fn is_monotone(self) -> bool {
        matches!(self, InterpKey::Time | InterpKey::PosX)
    }
}

/// A growable, contiguous buffer of [`BaseTrajSample`], append-only during
/// integration and read-only during interpolation/filtering.
#[derive(Clone, Debug, Default)]
pub struct TrajectorySeq {
    samples: Vec<BaseTrajSample>,
}

impl TrajectorySeq {
    pub fn new() -> Self {
        Self { samples: Vec::new() }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self { samples: Vec::with_capacity(cap) }
    }

    pub fn push(&mut self, sample: BaseTrajSample) {
        self.samples.push(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn as_slice(&self) -> &[BaseTrajSample] {
        &self.samples
    }

    /// Index supporting negative indices (`-1` = last sample), Python-style.
    pub fn get(&self, index: isize) -> Option<&BaseTrajSample> {
        let n = self.samples.len() as isize;
        let i = if index < 0 { n + index } else { index };
        if i < 0 || i >= n {
            None
        } else {
            Some(&self.samples[i as usize])
        }
    }

    /// Interpolate a full sample at the point where `key` attains `target`.
    pub fn interpolate(
        &self,
        key: InterpKey,
        target: f64,
        look_angle_rad: f64,
    ) -> Result<BaseTrajSample, BallisticsError> {
        let center = self.find_center_index(key, target, look_angle_rad)?;
        let idx = [center - 1, center, center + 1];
        let keys: Vec<f64> = idx.iter().map(|&i| key.extract(&self.samples[i], look_angle_rad)).collect();
        let keys = [keys[0], keys[1], keys[2]];

        let time_s = pchip3(keys, idx.map(|i| self.samples[i].time_s), target)?;
        let mach = pchip3(keys, idx.map(|i| self.samples[i].mach), target)?;
        let px = pchip3(keys, idx.map(|i| self.samples[i].position.x), target)?;
        let py = pchip3(keys, idx.map(|i| self.samples[i].position.y), target)?;
        let pz = pchip3(keys, idx.map(|i| self.samples[i].position.z), target)?;
        let vx = pchip3(keys, idx.map(|i| self.samples[i].velocity.x), target)?;
        let vy = pchip3(keys, idx.map(|i| self.samples[i].velocity.y), target)?;
        let vz = pchip3(keys, idx.map(|i| self.samples[i].velocity.z), target)?;

        Ok(BaseTrajSample {
            time_s,
            position: Vec3::new(px, py, pz),
            velocity: Vec3::new(vx, vy, vz),
            mach,
        })
    }

    /// Resolve the index `i` (with `1 <= i <= len-2`) whose key value
    /// brackets `target`, so `(i-1, i, i+1)` is a valid PCHIP triple.
    fn find_center_index(&self, key: InterpKey, target: f64, look_angle_rad: f64) -> Result<usize, BallisticsError> {
        let n = self.samples.len();
        if n < 3 {
            return Err(BallisticsError::Unreachable);
        }
        let k = |i: usize| key.extract(&self.samples[i], look_angle_rad);

        let center = if key.is_monotone() {
            // Bisection on an ascending key.
            if target < k(0) || target > k(n - 1) {
                return Err(BallisticsError::Unreachable);
            }
            let mut lo = 0usize;
            let mut hi = n - 1;
            while hi - lo > 1 {
                let mid = (lo + hi) / 2;
                if k(mid) < target {
                    lo = mid;
                } else {
                    hi = mid;
                }
            }
            lo
        } else {
            // Linear scan from the end: the key may be non-monotone (e.g.
            // slant height past apex), so we look for the last bracketing
            // pair walking backwards.
            let mut found = None;
            for i in (0..n - 1).rev() {
                let a = k(i);
                let b = k(i + 1);
                if (a <= target && target <= b) || (b <= target && target <= a) {
                    found = Some(i);
                    break;
                }
            }
            match found {
                Some(i) => i,
                None => return Err(BallisticsError::Unreachable),
            }
        };

        Ok(center.clamp(1, n - 2))
    }
}

/// Evaluate a monotone cubic Hermite (PCHIP) triple at `target`, interpolating
/// `vals` against `keys` as the x-axis (spec §4.7).
fn pchip3(keys: [f64; 3], vals: [f64; 3], target: f64) -> Result<f64, BallisticsError> {
    let [x0, x1, x2] = keys;
    let [y0, y1, y2] = vals;
    let h0 = x1 - x0;
    let h1 = x2 - x1;
    if h0 == 0.0 || h1 == 0.0 {
        return Err(BallisticsError::DuplicateKey);
    }
    let d0 = (y1 - y0) / h0;
    let d1 = (y2 - y1) / h1;

    let m1 = if d0 * d1 <= 0.0 {
        0.0
    } else {
        let w0 = 2.0 * h1 + h0;
        let w1 = h1 + 2.0 * h0;
        (w0 + w1) / (w0 / d0 + w1 / d1)
    };

    let m0 = endpoint_slope(h0, h1, d0, d1);
    let m2 = endpoint_slope(h1, h0, d1, d0);

    if target <= x1 {
        Ok(hermite(x0, y0, m0, x1, y1, m1, target))
    } else {
        Ok(hermite(x1, y1, m1, x2, y2, m2, target))
    }
}

/// Sign of `x`: `-1`, `0`, or `1`. Unlike [`f64::signum`], zero maps to zero
/// rather than to `+1`/`-1`, which is what the "sign disagrees" checks below need.
fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Non-centered three-point endpoint slope, clamped per spec §4.7.
fn endpoint_slope(h_near: f64, h_far: f64, d_near: f64, d_far: f64) -> f64 {
    let d = ((2.0 * h_near + h_far) * d_near - h_near * d_far) / (h_near + h_far);
    if sign(d) != sign(d_near) {
        0.0
    } else if sign(d_near) != sign(d_far) && d.abs() > 3.0 * d_near.abs() {
        3.0 * d_near
    } else {
        d
    }
}

#[allow(clippy::too_many_arguments)]
fn hermite(xa: f64, ya: f64, ma: f64, xb: f64, yb: f64, mb: f64, t: f64) -> f64 {
    let h = xb - xa;
    let u = (t - xa) / h;
    let u2 = u * u;
    let u3 = u2 * u;
    let h00 = 2.0 * u3 - 3.0 * u2 + 1.0;
    let h10 = u3 - 2.0 * u2 + u;
    let h01 = -2.0 * u3 + 3.0 * u2;
    let h11 = u3 - u2;
    h00 * ya + h10 * h * ma + h01 * yb + h11 * h * mb
}
