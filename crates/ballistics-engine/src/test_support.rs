//! Shared fixtures for this crate's unit tests.

use ballistics_core::{Atmosphere, DragCurve, WindField, WindSegment};

use crate::shot::ShotProps;

/// A flat-fired, zero-wind, sea-level shot with no cant or spin drift.
/// Good enough ground truth for filter/integrator unit tests that only
/// care about the geometry of samples, not the physics of a real bullet.
pub fn flat_shot() -> ShotProps {
    ShotProps {
        barrel_elevation_rad: 0.0,
        barrel_azimuth_rad: 0.0,
        sight_height_ft: 2.0 / 12.0,
        cant_cos: 1.0,
        cant_sin: 0.0,
        look_angle_rad: 0.0,
        bc: 0.305,
        diameter_in: 0.308,
        length_in: 1.2,
        weight_gr: 175.0,
        twist_in: 10.0,
        muzzle_velocity_fps: 2700.0,
        alt0_ft: 0.0,
        calc_step_ft: 0.5,
        stability_coef: 0.0,
        drag_curve: DragCurve::new(&[0.0, 0.8, 1.0, 1.2, 5.0], &[0.2, 0.22, 0.30, 0.27, 0.15]).unwrap(),
        atmosphere: Atmosphere {
            a0_ft: 0.0,
            t0_c: 15.0,
            p0_hpa: 1013.25,
            mach_speed_at_a0_fps: 1116.45,
            density_ratio_at_a0: 1.0,
            lowest_temp_c: -130.0,
        },
        wind: WindField::new(vec![WindSegment { velocity_fps: 0.0, direction_from_rad: 0.0, until_distance_ft: f64::INFINITY }]),
    }
    .finish()
    .unwrap()
}
