//! Process-wide-by-value configuration (spec §3, §9).
//!
//! A plain record captured by the engine at construction and re-bound at
//! the start of every query. Solvers that need to temporarily widen a
//! bound (e.g. `zero_angle`'s relaxed drop/altitude limits) clone it,
//! mutate the clone, run, and restore the original — config is never
//! mutated behind the caller's back.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Engine-wide numeric defaults, constant during a single query.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Maximum iterations any solver loop will perform before failing.
    pub max_iterations: u32,
    /// Zero-finding accuracy, feet.
    pub zero_finding_accuracy_ft: f64,
    /// Minimum velocity before the integrator stops, fps.
    pub minimum_velocity_fps: f64,
    /// Maximum (negative) drop before the integrator stops, feet.
    pub maximum_drop_ft: f64,
    /// Minimum absolute altitude before the integrator stops, feet.
    pub minimum_altitude_ft: f64,
    /// Gravity, fps² (negative: points down).
    pub gravity_fps2: f64,
    /// Multiplier applied to the shot's base calc step.
    pub step_multiplier: f64,
    /// Lowest admissible atmosphere temperature clamp, °C.
    pub lowest_temperature_c: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_iterations: 60,
            zero_finding_accuracy_ft: 1e-3,
            minimum_velocity_fps: 50.0,
            maximum_drop_ft: -15_000.0,
            minimum_altitude_ft: -1_500.0,
            gravity_fps2: -32.174_49,
            step_multiplier: 1.0,
            lowest_temperature_c: -130.0,
        }
    }
}

/// Allowed slant-plane range error when accepting a zero solution (spec §4.9.1).
pub const ALLOWED_ZERO_ERROR_FEET: f64 = 0.5;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sane_signs() {
        let c = Config::default();
        assert!(c.gravity_fps2 < 0.0);
        assert!(c.maximum_drop_ft < 0.0);
        assert!(c.minimum_velocity_fps > 0.0);
        assert!(c.max_iterations > 0);
    }
}
