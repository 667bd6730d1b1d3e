//! Fixed-step integrators over the point-mass ODE (spec §4.6).

use ballistics_core::{Config, TerminationReason, Vec3};

use crate::filter::{DataFilter, TrajectoryRow};
use crate::shot::ShotProps;
use crate::trajectory::{BaseTrajSample, TrajectorySeq};

/// Default fixed time step for the RK4 integrator, seconds (spec §6.4).
pub const RK4_DEFAULT_TIME_STEP: f64 = ballistics_core::constants::RK4_DEFAULT_TIME_STEP;

/// Which fixed-step scheme to run. Both are single-threaded, synchronous,
/// and never suspend mid-step (spec §5).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Euler,
    Rk4,
}

/// Everything one integration run produces.
pub struct IntegrationOutcome {
    pub seq: TrajectorySeq,
    pub rows: Vec<TrajectoryRow>,
    pub termination: Option<TerminationReason>,
}

/// Minimum number of samples that must exist before a termination check is
/// allowed to end the run (spec §4.6: "always emit at least three samples").
const MIN_SAMPLES_BEFORE_TERMINATION: usize = 3;

fn initial_velocity(shot: &ShotProps) -> Vec3 {
    let vx = shot.muzzle_velocity_fps * shot.barrel_elevation_rad.cos() * shot.barrel_azimuth_rad.cos();
    let vy_raw = shot.muzzle_velocity_fps * shot.barrel_elevation_rad.sin();
    let vz_raw = shot.muzzle_velocity_fps * shot.barrel_elevation_rad.cos() * shot.barrel_azimuth_rad.sin();
    // Barrel cant rotates the shot plane about the bore axis.
    let vy = vy_raw * shot.cant_cos - vz_raw * shot.cant_sin;
    let vz = vy_raw * shot.cant_sin + vz_raw * shot.cant_cos;
    Vec3::new(vx, vy, vz)
}

fn check_termination(
    pos: Vec3,
    vel: Vec3,
    alt0_ft: f64,
    range_limit_ft: f64,
    config: &Config,
    step_count: usize,
) -> Option<TerminationReason> {
    let speed = vel.magnitude();
    if speed < config.minimum_velocity_fps {
        return Some(TerminationReason::MinVelocity);
    }
    if vel.y <= 0.0 && pos.y < config.maximum_drop_ft {
        return Some(TerminationReason::MaxDrop);
    }
    if vel.y <= 0.0 && alt0_ft + pos.y < config.minimum_altitude_ft {
        return Some(TerminationReason::MinAltitude);
    }
    if pos.x > range_limit_ft && step_count >= MIN_SAMPLES_BEFORE_TERMINATION {
        return Some(TerminationReason::TargetRangeReached);
    }
    None
}

/// Drag acceleration coefficient `density_ratio * Cd(mach_ratio) * K / bc` (spec §4.1).
fn drag_coeff(shot: &ShotProps, density_ratio: f64, speed_rel: f64, local_sound_fps: f64) -> f64 {
    let mach_ratio = speed_rel / local_sound_fps;
    density_ratio * shot.drag_curve.cd(mach_ratio) * ballistics_core::constants::DRAG_CONSTANT_K / shot.bc
}

/// Run a fixed-step integration from the muzzle out to `range_limit_ft`
/// (or until an early termination condition fires). Feeds every sample
/// through `filter` (if given) as it is produced.
pub fn integrate(
    method: Method,
    shot: &mut ShotProps,
    config: &Config,
    range_limit_ft: f64,
    rk4_time_step_s: f64,
    mut filter: Option<&mut DataFilter>,
) -> IntegrationOutcome {
    shot.reset_for_integration();

    let gravity = Vec3::new(0.0, config.gravity_fps2, 0.0);
    let mut seq = TrajectorySeq::with_capacity(256);
    let mut rows = Vec::new();

    let mut t = 0.0_f64;
    let mut pos = Vec3::ZERO;
    let mut vel = initial_velocity(shot);
    let mut termination = None;

    loop {
        let wind = shot.wind.vector_for(pos.x);
        let atmo = shot.atmosphere.at_altitude(shot.alt0_ft + pos.y);
        let sample = BaseTrajSample { time_s: t, position: pos, velocity: vel, mach: atmo.mach_speed_fps };
        seq.push(sample);
        if let Some(f) = filter.as_deref_mut() {
            rows.extend(f.push(sample, shot));
        }

        termination = check_termination(pos, vel, shot.alt0_ft, range_limit_ft, config, seq.len());
        if termination.is_some() {
            break;
        }

        match method {
            Method::Euler => {
                let v_rel = vel - wind;
                let s_rel = v_rel.magnitude();
                let dt = shot.calc_step_ft * config.step_multiplier / vel.magnitude().max(1.0);
                let km = drag_coeff(shot, atmo.density_ratio, s_rel, atmo.mach_speed_fps);
                let accel = v_rel * (-km * s_rel) + gravity;
                vel += accel * dt;
                pos += vel * dt;
                t += dt;
            }
            Method::Rk4 => {
                let dt = if rk4_time_step_s > 0.0 { rk4_time_step_s } else { RK4_DEFAULT_TIME_STEP };
                let v_rel = vel - wind;
                let km = drag_coeff(shot, atmo.density_ratio, v_rel.magnitude(), atmo.mach_speed_fps);
                let deriv = |u: Vec3| -> Vec3 { gravity - u * (km * u.magnitude()) };

                let u1 = v_rel;
                let k1 = deriv(u1);
                let u2 = v_rel + k1 * (0.5 * dt);
                let k2 = deriv(u2);
                let u3 = v_rel + k2 * (0.5 * dt);
                let k3 = deriv(u3);
                let u4 = v_rel + k3 * dt;
                let k4 = deriv(u4);

                let p1 = vel;
                let p2 = vel + k1 * (0.5 * dt);
                let p3 = vel + k2 * (0.5 * dt);
                let p4 = vel + k3 * dt;

                vel += (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (dt / 6.0);
                pos += (p1 + p2 * 2.0 + p3 * 2.0 + p4) * (dt / 6.0);
                t += dt;
            }
        }
    }

    if let Some(f) = filter.as_deref_mut() {
        if let Some(row) = f.finish(*seq.get(-1).expect("at least one sample"), shot) {
            rows.push(row);
        }
    }

    IntegrationOutcome { seq, rows, termination }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::flat_shot;
    use ballistics_core::constants::flags;

    #[test]
    fn produces_at_least_three_samples_and_starts_at_origin() {
        let mut shot = flat_shot();
        let config = Config::default();
        let out = integrate(Method::Rk4, &mut shot, &config, 300.0, 0.0, None);
        assert!(out.seq.len() >= 3);
        let first = out.seq.get(0).unwrap();
        assert_eq!(first.time_s, 0.0);
        assert_eq!(first.position.x, 0.0);
    }

    #[test]
    fn sample_times_strictly_increase() {
        let mut shot = flat_shot();
        let config = Config::default();
        let out = integrate(Method::Rk4, &mut shot, &config, 300.0, 0.0, None);
        for w in out.seq.as_slice().windows(2) {
            assert!(w[1].time_s > w[0].time_s);
        }
    }

    #[test]
    fn min_velocity_termination_reports_low_speed_last_sample() {
        let mut shot = flat_shot();
        shot.barrel_elevation_rad = 5.0_f64.to_radians();
        shot.muzzle_velocity_fps = 800.0;
        let mut config = Config::default();
        config.minimum_velocity_fps = 400.0;
        let out = integrate(Method::Rk4, &mut shot, &config, 1_000_000.0, 0.0, None);
        assert_eq!(out.termination, Some(TerminationReason::MinVelocity));
        assert!(out.seq.get(-1).unwrap().velocity.magnitude() <= 400.0 + 1.0);
    }

    #[test]
    fn euler_and_rk4_both_reach_target_range() {
        let config = Config::default();
        for method in [Method::Euler, Method::Rk4] {
            let mut shot = flat_shot();
            let out = integrate(method, &mut shot, &config, 300.0, 0.0, None);
            assert_eq!(out.termination, Some(TerminationReason::TargetRangeReached));
        }
    }

    #[test]
    fn feeding_a_range_filter_produces_rows() {
        let mut shot = flat_shot();
        let config = Config::default();
        let mut filter = DataFilter::new(flags::RANGE, 50.0, 0.0, shot.look_angle_rad);
        let out = integrate(Method::Rk4, &mut shot, &config, 300.0, 0.0, Some(&mut filter));
        assert!(!out.rows.is_empty());
    }
}
