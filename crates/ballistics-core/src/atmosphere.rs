//! Standard-atmosphere altitude lookup (spec §4.2).

use crate::constants::{
    DEGREES_C_TO_K, LAPSE_RATE_K_PER_FOOT, M_TO_FEET, PRESSURE_EXPONENT, SPEED_OF_SOUND_METRIC,
    TROPOPAUSE_ALTITUDE_FT,
};

/// Reference atmosphere state plus a low-temperature clamp.
///
/// Constructed once per shot from user input; read-only during integration.
#[derive(Clone, Copy, Debug)]
pub struct Atmosphere {
    /// Reference altitude, feet.
    pub a0_ft: f64,
    /// Reference temperature, °C.
    pub t0_c: f64,
    /// Reference pressure, hPa.
    pub p0_hpa: f64,
    /// Reference speed of sound at `a0`, fps.
    pub mach_speed_at_a0_fps: f64,
    /// Reference density ratio at `a0` (dimensionless, 1.0 = sea-level standard).
    pub density_ratio_at_a0: f64,
    /// Lowest admissible temperature, °C; celsius is clamped above this floor.
    pub lowest_temp_c: f64,
}

/// Density ratio and local speed of sound at a given altitude.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AtmoSample {
    /// Air density relative to the reference density.
    pub density_ratio: f64,
    /// Local speed of sound, fps.
    pub mach_speed_fps: f64,
}

impl Atmosphere {
    /// Absolute zero, in Celsius, used as the lower clamp bound.
    const ABSOLUTE_ZERO_C: f64 = -273.15;
    /// Within this band of `a0`, the reference values are returned verbatim.
    const NEAR_REFERENCE_FT: f64 = 30.0;

    /// Evaluate `(density_ratio, mach_speed_fps)` at altitude `h` (feet).
    ///
    /// Emits a `tracing::warn!` (not an error) when `h` is above the
    /// troposphere, where the lapse-rate model is no longer physically valid.
    pub fn at_altitude(&self, h_ft: f64) -> AtmoSample {
        if (h_ft - self.a0_ft).abs() < Self::NEAR_REFERENCE_FT {
            return AtmoSample {
                density_ratio: self.density_ratio_at_a0,
                mach_speed_fps: self.mach_speed_at_a0_fps,
            };
        }

        if h_ft > TROPOPAUSE_ALTITUDE_FT {
            tracing::warn!(altitude_ft = h_ft, "altitude above troposphere; lapse-rate model is an extrapolation");
        }

        let raw_celsius = (h_ft - self.a0_ft) * LAPSE_RATE_K_PER_FOOT + self.t0_c;
        let celsius = raw_celsius.max(self.lowest_temp_c).max(Self::ABSOLUTE_ZERO_C);
        if celsius != raw_celsius {
            tracing::debug!(raw_celsius, celsius, "atmosphere temperature clamped to its floor");
        }
        let kelvin = celsius + DEGREES_C_TO_K;

        let t0_k = self.t0_c + DEGREES_C_TO_K;
        let pressure = self.p0_hpa
            * (1.0 + LAPSE_RATE_K_PER_FOOT * (h_ft - self.a0_ft) / t0_k).powf(PRESSURE_EXPONENT);
        let density_ratio = self.density_ratio_at_a0 * t0_k * pressure / (self.p0_hpa * kelvin);
        let mach_speed_fps = kelvin.sqrt() * SPEED_OF_SOUND_METRIC * M_TO_FEET;

        AtmoSample { density_ratio, mach_speed_fps }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn icao() -> Atmosphere {
        Atmosphere {
            a0_ft: 0.0,
            t0_c: 15.0,
            p0_hpa: 1013.25,
            mach_speed_at_a0_fps: 1116.45,
            density_ratio_at_a0: 1.0,
            lowest_temp_c: -130.0,
        }
    }

    #[test]
    fn at_reference_altitude_returns_reference_values_exactly() {
        let atmo = icao();
        let sample = atmo.at_altitude(0.0);
        assert_eq!(sample.density_ratio, atmo.density_ratio_at_a0);
        assert_eq!(sample.mach_speed_fps, atmo.mach_speed_at_a0_fps);
    }

    #[test]
    fn within_near_reference_band_returns_reference_values() {
        let atmo = icao();
        let sample = atmo.at_altitude(15.0);
        assert_eq!(sample.density_ratio, atmo.density_ratio_at_a0);
    }

    #[test]
    fn density_decreases_with_altitude() {
        let atmo = icao();
        let low = atmo.at_altitude(1000.0);
        let high = atmo.at_altitude(10_000.0);
        assert!(high.density_ratio < low.density_ratio);
    }

    #[test]
    fn mach_speed_decreases_with_altitude_in_troposphere() {
        let atmo = icao();
        let low = atmo.at_altitude(1000.0);
        let high = atmo.at_altitude(20_000.0);
        assert!(high.mach_speed_fps < low.mach_speed_fps);
    }

    #[test]
    fn above_tropopause_still_computes_a_finite_value() {
        let atmo = icao();
        let sample = atmo.at_altitude(50_000.0);
        assert!(sample.density_ratio.is_finite() && sample.density_ratio > 0.0);
        assert!(sample.mach_speed_fps.is_finite() && sample.mach_speed_fps > 0.0);
    }

    #[test]
    fn temperature_clamp_keeps_density_finite_at_extreme_altitude() {
        let atmo = icao();
        let sample = atmo.at_altitude(200_000.0);
        assert!(sample.density_ratio.is_finite());
    }

    #[test]
    fn reference_roundtrip_matches_within_tolerance() {
        let atmo = icao();
        let sample = atmo.at_altitude(0.001);
        assert_relative_eq!(sample.density_ratio, 1.0, epsilon = 1e-9);
    }
}
