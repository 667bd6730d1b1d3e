//! End-to-end scenarios exercising the public API surface.

use ballistics_engine::{
    constants::flags, Atmosphere, BallisticsError, Config, DragCurve, Engine, ShotProps,
    TerminationReason, WindField, WindSegment,
};

/// Installs a `tracing_subscriber` fmt writer only when the caller asked
/// for logs via `RUST_LOG`; never runs unconditionally.
fn init_tracing() {
    if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt::try_init();
    }
}

fn rifle_shot() -> ShotProps {
    ShotProps {
        barrel_elevation_rad: 0.0,
        barrel_azimuth_rad: 0.0,
        sight_height_ft: 1.5 / 12.0,
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
        wind: WindField::calm(),
    }
    .finish()
    .unwrap()
}

#[test]
fn flat_zero_lands_on_the_line_of_sight() {
    let engine = Engine::new(Config::default());
    let mut shot = rifle_shot();
    let elevation = engine.zero_angle(&mut shot, 300.0 * 3.0).unwrap();
    shot.barrel_elevation_rad = elevation;

    let hit = engine.integrate(&mut shot, 1000.0, 0.0, 0.0, flags::ZERO_DOWN, false).unwrap();
    assert_eq!(hit.rows.len(), 1);
    assert!(hit.rows[0].drop_ft.abs() < 1.0);
}

#[test]
fn lofted_zero_at_long_range_still_converges() -> anyhow::Result<()> {
    init_tracing();
    let engine = Engine::new(Config::default());
    let mut shot = rifle_shot();
    let (max_range_ft, _) = engine.find_max_range(&mut rifle_shot())?;
    let distance = max_range_ft * 0.7;

    let flat = engine.find_zero_angle(&mut shot, distance, false)?;
    let lofted = engine.find_zero_angle(&mut shot, distance, true)?;

    assert!(flat > 0.0 && flat < std::f64::consts::FRAC_PI_2);
    assert!(lofted > flat);
    assert!(lofted < std::f64::consts::FRAC_PI_2);
    Ok(())
}

#[test]
fn find_zero_angle_past_max_range_reports_out_of_range() {
    let engine = Engine::new(Config::default());
    let mut shot = rifle_shot();
    let (max_range_ft, _) = engine.find_max_range(&mut rifle_shot()).unwrap();
    let err = engine.find_zero_angle(&mut shot, max_range_ft * 1.5, false);
    assert!(matches!(err, Err(BallisticsError::OutOfRange { .. })));
}

#[test]
fn apex_of_a_lofted_shot_sits_above_the_muzzle_before_impact() {
    let engine = Engine::new(Config::default());
    let mut shot = rifle_shot();
    shot.barrel_elevation_rad = 25.0_f64.to_radians();
    let (apex_time_s, apex_height_ft) = engine.find_apex(&mut shot).unwrap();
    assert!(apex_time_s > 0.0);
    assert!(apex_height_ft > 0.0);
}

#[test]
fn mach_flag_fires_once_as_the_bullet_goes_subsonic() {
    let engine = Engine::new(Config::default());
    let mut shot = rifle_shot();
    let hit = engine.integrate(&mut shot, 3000.0, 0.0, 0.0, flags::MACH, false).unwrap();
    assert_eq!(hit.rows.len(), 1);
    assert_eq!(hit.rows[0].flags, flags::MACH);
}

#[test]
fn wind_segment_boundary_changes_windage_sign() {
    let engine = Engine::new(Config::default());
    let mut calm = rifle_shot();
    let mut windy = rifle_shot();
    windy.wind = WindField::new(vec![WindSegment {
        velocity_fps: 20.0,
        direction_from_rad: std::f64::consts::FRAC_PI_2,
        until_distance_ft: f64::INFINITY,
    }]);

    let calm_hit = engine.integrate(&mut calm, 600.0, 200.0, 0.0, flags::RANGE, false).unwrap();
    let windy_hit = engine.integrate(&mut windy, 600.0, 200.0, 0.0, flags::RANGE, false).unwrap();

    let last_calm = calm_hit.rows.last().unwrap();
    let last_windy = windy_hit.rows.last().unwrap();
    assert!((last_windy.windage_ft - last_calm.windage_ft).abs() > 0.1);
}

#[test]
fn requesting_a_range_past_the_shots_reach_reports_termination() {
    let mut config = Config::default();
    config.minimum_velocity_fps = 2600.0; // forces a near-immediate MinVelocity stop
    let engine = Engine::new(config);
    let mut shot = rifle_shot();
    let err = engine.integrate(&mut shot, 10_000.0, 0.0, 0.0, flags::RANGE, false);
    assert!(matches!(err, Err(BallisticsError::RangeError { reason: TerminationReason::MinVelocity })));
}
