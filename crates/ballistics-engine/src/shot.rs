//! Aggregated, pre-computed shot state (spec §3).

use ballistics_core::{Atmosphere, BallisticsError, Config, DragCurve, WindField};

/// Everything one query needs to integrate a trajectory.
///
/// Owned exclusively by the query that created it; the solver layer is
/// the only thing allowed to mutate `barrel_elevation_rad` between
/// integrations, and it never rebuilds `drag_curve` when it does.
#[derive(Clone, Debug)]
pub struct ShotProps {
    // geometry
    pub barrel_elevation_rad: f64,
    pub barrel_azimuth_rad: f64,
    pub sight_height_ft: f64,
    pub cant_cos: f64,
    pub cant_sin: f64,
    pub look_angle_rad: f64,

    // projectile
    pub bc: f64,
    pub diameter_in: f64,
    pub length_in: f64,
    pub weight_gr: f64,
    pub twist_in: f64,

    // state
    pub muzzle_velocity_fps: f64,
    pub alt0_ft: f64,
    pub calc_step_ft: f64,
    pub stability_coef: f64,

    // computed contents
    pub drag_curve: DragCurve,
    pub atmosphere: Atmosphere,
    pub wind: WindField,
}

impl ShotProps {
    /// Validate invariants and compute the Miller stability coefficient.
    ///
    /// `calc_step_ft` must be positive; after this call,
    /// `stability_coef >= 0`, and it is identically zero whenever
    /// `twist_in == 0`.
    pub fn finish(mut self) -> Result<Self, BallisticsError> {
        if !(self.calc_step_ft > 0.0) {
            return Err(BallisticsError::input("calc_step_ft must be positive"));
        }
        self.stability_coef = self.compute_stability_coef()?;
        Ok(self)
    }

    /// Miller stability coefficient (spec §4.4).
    ///
    /// Zero whenever `twist`, `length`, `diameter`, or the atmosphere's
    /// reference pressure is zero. Fails only on an actual division by
    /// zero that a zero-guard above didn't already catch.
    fn compute_stability_coef(&self) -> Result<f64, BallisticsError> {
        if self.twist_in == 0.0
            || self.length_in == 0.0
            || self.diameter_in == 0.0
            || self.atmosphere.p0_hpa == 0.0
        {
            return Ok(0.0);
        }

        let tr = self.twist_in.abs() / self.diameter_in;
        let l = self.length_in / self.diameter_in;
        let denom = tr * tr * self.diameter_in.powi(3) * l * (1.0 + l * l);
        if denom == 0.0 {
            return Err(BallisticsError::ComputationError(
                "stability denominator is zero".into(),
            ));
        }
        let sd = 30.0 * self.weight_gr / denom;

        let fv = (self.muzzle_velocity_fps / 2800.0).powf(1.0 / 3.0);

        let ft = self.atmosphere.t0_c * 9.0 / 5.0 + 32.0;
        let pt = self.atmosphere.p0_hpa / 33.8639;
        if pt == 0.0 {
            return Err(BallisticsError::ComputationError("pt is zero".into()));
        }
        let ftp = ((ft + 460.0) / (59.0 + 460.0)) * (29.92 / pt);

        Ok(sd * fv * ftp)
    }

    /// Spin-drift windage correction at time `t` (spec §4.5, Litz).
    ///
    /// Identically zero when `twist_in == 0` or `stability_coef == 0`.
    /// Applied as a windage correction, not as an integrated force.
    pub fn spin_drift_ft(&self, t_s: f64) -> f64 {
        if self.twist_in == 0.0 || self.stability_coef == 0.0 {
            return 0.0;
        }
        self.twist_in.signum() * 1.25 * (self.stability_coef + 1.2) * t_s.powf(1.83) / 12.0
    }

    /// Slant-plane height at `(x, y)`: `y*cos(look_angle) - x*sin(look_angle)`.
    pub fn slant_height(&self, x_ft: f64, y_ft: f64) -> f64 {
        y_ft * self.look_angle_rad.cos() - x_ft * self.look_angle_rad.sin()
    }

    /// Reset the wind field's cached segment pointer to the start before a
    /// fresh integration run. Does not touch `drag_curve`, `atmosphere`, or
    /// any projectile/geometry fields.
    pub fn reset_for_integration(&mut self) {
        self.wind.reset();
    }
}
