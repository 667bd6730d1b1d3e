//! Physical constants and engine-internal flag bits.
//!
//! Values here are part of the contract: test vectors depend on them
//! bit-exact. Do not "clean up" a literal without checking callers.

/// Speed-of-sound coefficient used with `sqrt(kelvin)` to get m/s (metric ICAO form).
pub const SPEED_OF_SOUND_METRIC: f64 = 20.0467;
/// Meters to feet.
pub const M_TO_FEET: f64 = 3.28084;
/// 0°C in kelvin.
pub const DEGREES_C_TO_K: f64 = 273.15;
/// Standard lapse rate, K per foot of altitude (negative: cools with altitude).
pub const LAPSE_RATE_K_PER_FOOT: f64 = -0.0019_812;
/// Barometric pressure exponent for the standard-atmosphere pressure formula.
pub const PRESSURE_EXPONENT: f64 = 5.2559;
/// Composite drag constant folding standard air density, cross-section area
/// scaling, and pounds-to-feet unit conversion into one coefficient. See
/// spec §4.1: `drag_accel_coeff = density_ratio * Cd(...) * K / bc`.
pub const DRAG_CONSTANT_K: f64 = 2.08551e-04;
/// Default fixed time step for the RK4 integrator, seconds.
pub const RK4_DEFAULT_TIME_STEP: f64 = 0.0025;
/// Altitude above which the troposphere lapse-rate model is no longer valid;
/// atmosphere lookups above this altitude emit a warning but keep computing.
pub const TROPOPAUSE_ALTITUDE_FT: f64 = 36_089.0;
/// Barrel elevations within this many radians of vertical are treated as
/// near-vertical shots by the zero-finding solvers (spec §4.9.1): close
/// enough to 90° that the Newton sensitivity term becomes unreliable, so
/// the solver short-circuits to apex-based reasoning instead of iterating.
/// 89.9° expressed in radians, matching the lofted-bracket upper limit of §4.9.2.
pub const APEX_IS_MAX_RANGE_RADIANS: f64 = 89.9 * std::f64::consts::PI / 180.0;

/// Engine-internal flag bits (spec §6.3). Persist unchanged across languages.
pub mod flags {
    /// No flags set.
    pub const NONE: u8 = 0;
    /// Trajectory has crossed above the look line (rising through it).
    pub const ZERO_UP: u8 = 1;
    /// Trajectory has crossed back below the look line after `ZERO_UP`.
    pub const ZERO_DOWN: u8 = 2;
    /// Sample crossed from supersonic to subsonic.
    pub const MACH: u8 = 4;
    /// Sample emitted at a fixed downrange interval.
    pub const RANGE: u8 = 8;
    /// Sample emitted at the trajectory's apex (`velocity.y == 0`).
    pub const APEX: u8 = 16;
    /// Union of every flag.
    pub const ALL: u8 = RANGE | ZERO_UP | ZERO_DOWN | MACH | APEX;
}
