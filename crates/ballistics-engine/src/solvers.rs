//! Zeroing and range-envelope solvers built on top of the integrator (spec §4.9).

use ballistics_core::constants::APEX_IS_MAX_RANGE_RADIANS;
use ballistics_core::{BallisticsError, Config, ALLOWED_ZERO_ERROR_FEET};

use crate::integrator::{self, Method};
use crate::shot::ShotProps;
use crate::trajectory::InterpKey;

/// Golden ratio conjugate, used by [`find_max_range`]'s section search.
const GOLDEN: f64 = 0.618_033_988_749_895;

/// Mutates `shot.barrel_elevation_rad`, integrates to `distance_ft`, and
/// returns the slant-plane height error there (positive: trajectory is
/// still above the line of sight; zero is the target).
fn height_error_at(
    shot: &mut ShotProps,
    elevation_rad: f64,
    distance_ft: f64,
    config: &Config,
) -> Result<f64, BallisticsError> {
    shot.barrel_elevation_rad = elevation_rad;
    let range_limit = distance_ft * 1.1 + 50.0;
    let out = integrator::integrate(Method::Rk4, shot, config, range_limit, 0.0, None);
    if out.seq.len() < 3 {
        return Err(BallisticsError::Unreachable);
    }
    let sample = out.seq.interpolate(InterpKey::PosX, distance_ft, shot.look_angle_rad)?;
    Ok(shot.slant_height(sample.position.x, sample.position.y))
}

/// Damped Newton search for the barrel elevation that zeroes the shot at
/// `zero_distance_ft` (spec §4.9.1).
///
/// Tracks both the slant-plane height error `h` at `x = tx` and the
/// slant-plane range error `ρ` at that same sample, and steps with the
/// analytic sensitivity `S = tan(barrel − α)·tan(traj_angle − α)` rather
/// than a finite-difference slope. If a step makes `h` worse than the
/// previous iteration, the step is reverted and retried with a damping
/// factor (× 0.7, floor 0.3).
///
/// `cMaximumDrop`/`cMinimumAltitude` are widened on a local config clone
/// for the duration of the search and never touch the caller's `config`.
pub fn zero_angle(shot: &mut ShotProps, zero_distance_ft: f64, config: &Config) -> Result<f64, BallisticsError> {
    let look_angle = shot.look_angle_rad;
    let short_circuit_ft = 2.0 * shot.sight_height_ft.abs().max(config.step_multiplier);
    if zero_distance_ft.abs() < short_circuit_ft {
        return Ok(look_angle);
    }

    let mut widened = *config;
    widened.maximum_drop_ft = f64::NEG_INFINITY;
    widened.minimum_altitude_ft = f64::NEG_INFINITY;

    let tx = zero_distance_ft * look_angle.cos();
    let ty = zero_distance_ft * look_angle.sin();

    // A dead-level starting guess makes the first sensitivity term degenerate
    // for some drag tables; the geometric angle is a safe, nonzero initializer.
    let mut elevation = if look_angle.abs() > 1e-9 { look_angle } else { 0.01 };
    let mut prev_elevation = elevation;
    let mut prev_abs_h = f64::INFINITY;
    let mut prev_abs_rho = f64::INFINITY;
    let mut damping = 1.0_f64;
    let mut last_error = f64::INFINITY;

    for iter in 0..config.max_iterations {
        if elevation.abs() >= APEX_IS_MAX_RANGE_RADIANS {
            return Err(BallisticsError::ZeroFindingError {
                last_error_ft: last_error,
                iterations: iter,
                last_elevation_rad: elevation,
            });
        }

        shot.barrel_elevation_rad = elevation;
        let range_limit = tx.abs() * 1.1 + 50.0;
        let out = integrator::integrate(Method::Rk4, shot, &widened, range_limit, 0.0, None);
        if out.seq.len() < 3 {
            return Err(BallisticsError::Unreachable);
        }
        let sample = out.seq.interpolate(InterpKey::PosX, tx, look_angle)?;
        let (x, y) = (sample.position.x, sample.position.y);
        let traj_angle = sample.velocity.y.atan2(sample.velocity.x);

        let h = y * look_angle.cos() - x * look_angle.sin();
        let rho = x * look_angle.cos() + y * look_angle.sin() - zero_distance_ft;
        last_error = h.abs();
        tracing::debug!(iter, elevation_rad = elevation, h, rho, damping, "zero_angle Newton step");

        if h.abs() <= config.zero_finding_accuracy_ft && rho.abs() <= ALLOWED_ZERO_ERROR_FEET {
            return Ok(elevation);
        }

        if rho.abs() > ALLOWED_ZERO_ERROR_FEET && rho.abs() >= prev_abs_rho {
            return Err(BallisticsError::ZeroFindingError {
                last_error_ft: last_error,
                iterations: iter,
                last_elevation_rad: elevation,
            });
        }

        let mut from_elevation = elevation;
        if h.abs() > prev_abs_h {
            damping = (damping * 0.7).max(0.3);
            from_elevation = prev_elevation;
        }

        let sensitivity = (elevation - look_angle).tan() * (traj_angle - look_angle).tan();
        let denominator = if sensitivity < -0.5 { zero_distance_ft } else { zero_distance_ft * (1.0 + sensitivity) };
        if denominator.abs() < 1e-9 {
            return Err(BallisticsError::BadDenominator(denominator));
        }
        let correction = damping * (-h / denominator);

        prev_elevation = elevation;
        prev_abs_h = h.abs();
        prev_abs_rho = rho.abs();
        elevation = from_elevation + correction;
    }

    Err(BallisticsError::ZeroFindingError {
        last_error_ft: last_error,
        iterations: config.max_iterations,
        last_elevation_rad: elevation,
    })
}

/// `f(θ)` scoring function used by [`find_zero_angle`]'s Ridder bracket
/// (spec §4.9.2): the slant-plane height error at `x = tx`, penalized by
/// how far short of `tx` the trajectory fell if it never reached it.
fn range_deficit_error(
    shot: &mut ShotProps,
    elevation_rad: f64,
    slant_range_ft: f64,
    config: &Config,
) -> Result<f64, BallisticsError> {
    shot.barrel_elevation_rad = elevation_rad;
    let look_angle = shot.look_angle_rad;
    let tx = slant_range_ft * look_angle.cos();
    let ty = slant_range_ft * look_angle.sin();
    let range_limit = slant_range_ft * 1.2 + 100.0;
    let out = integrator::integrate(Method::Rk4, shot, config, range_limit, 0.0, None);
    let seq = out.seq.as_slice();
    let last = seq.last().ok_or(BallisticsError::Unreachable)?;

    if last.position.x >= tx {
        let sample = out.seq.interpolate(InterpKey::PosX, tx, look_angle)?;
        Ok(sample.position.y - ty)
    } else {
        Ok((last.position.y - ty) - (tx - last.position.x))
    }
}

/// Ridder's-method zero solve for the barrel elevation that zeroes the
/// shot at `slant_range_ft` (spec §4.9.2).
///
/// Establishes the shot's reachable envelope via [`find_max_range`] first
/// and fails [`BallisticsError::OutOfRange`] if `slant_range_ft` exceeds
/// it. `lofted = false` brackets `[look_angle, angle_at_max_range]` (the
/// low, flat path); `lofted = true` brackets
/// `[angle_at_max_range, 89.9°]` (the high, lofted path). `cMinimumVelocity`
/// is zeroed on a local config clone for the duration of the search.
pub fn find_zero_angle(
    shot: &mut ShotProps,
    slant_range_ft: f64,
    config: &Config,
    lofted: bool,
) -> Result<f64, BallisticsError> {
    let (max_range_ft, angle_at_max_rad) = find_max_range(shot, config)?;
    if slant_range_ft > max_range_ft {
        return Err(BallisticsError::OutOfRange { requested_ft: slant_range_ft, max_ft: max_range_ft });
    }
    if (max_range_ft - slant_range_ft).abs() <= ALLOWED_ZERO_ERROR_FEET {
        return Ok(angle_at_max_rad);
    }

    let mut widened = *config;
    widened.minimum_velocity_fps = 0.0;

    let (mut a, mut b) = if lofted {
        (angle_at_max_rad, APEX_IS_MAX_RANGE_RADIANS)
    } else {
        (shot.look_angle_rad, angle_at_max_rad)
    };

    let mut fa = range_deficit_error(shot, a, slant_range_ft, &widened)?;
    let mut fb = range_deficit_error(shot, b, slant_range_ft, &widened)?;

    if fa.abs() <= ALLOWED_ZERO_ERROR_FEET {
        return Ok(a);
    }
    if fb.abs() <= ALLOWED_ZERO_ERROR_FEET {
        return Ok(b);
    }
    if fa.signum() == fb.signum() {
        return Err(BallisticsError::NoZeroBracket);
    }

    let mut last_x = 0.5 * (a + b);
    for _ in 0..config.max_iterations {
        let mid = 0.5 * (a + b);
        let fm = range_deficit_error(shot, mid, slant_range_ft, &widened)?;
        let s = (fm * fm - fa * fb).sqrt();
        if s == 0.0 {
            return Err(BallisticsError::BadDenominator(s));
        }
        let sign = if fa > fb { 1.0 } else { -1.0 };
        let x_new = mid + (mid - a) * sign * fm / s;
        let fx = range_deficit_error(shot, x_new, slant_range_ft, &widened)?;
        last_x = x_new;

        if fx.abs() <= ALLOWED_ZERO_ERROR_FEET {
            return Ok(x_new);
        }

        if fm.signum() != fx.signum() {
            a = mid;
            fa = fm;
            b = x_new;
            fb = fx;
        } else if fa.signum() != fx.signum() {
            b = x_new;
            fb = fx;
        } else {
            a = x_new;
            fa = fx;
        }

        if (x_new - mid).abs() < config.zero_finding_accuracy_ft || (b - a).abs() < config.zero_finding_accuracy_ft {
            return Ok(x_new);
        }
    }

    Err(BallisticsError::ZeroFindingError {
        last_error_ft: range_deficit_error(shot, last_x, slant_range_ft, &widened)?.abs(),
        iterations: config.max_iterations,
        last_elevation_rad: last_x,
    })
}

/// Slant-plane downrange distance at which a trajectory fired at `elevation_rad`
/// last crosses back below the line of sight (the `ZERO_DOWN` transition).
/// Scans backwards from the end of the dense sequence, since that crossing
/// is what a golden-section range search wants to maximize.
///
/// Runs against a local config clone with `maximum_drop_ft`/`minimum_velocity_fps`
/// both zeroed (spec §4.9.3), so the trajectory is never cut short by the
/// caller's ordinary termination limits before it can cross back down.
fn zero_down_distance(shot: &mut ShotProps, elevation_rad: f64, config: &Config) -> Result<f64, BallisticsError> {
    shot.barrel_elevation_rad = elevation_rad;
    let mut widened = *config;
    widened.maximum_drop_ft = 0.0;
    widened.minimum_velocity_fps = 0.0;
    let out = integrator::integrate(Method::Rk4, shot, &widened, 1.0e7, 0.0, None);
    let seq = out.seq.as_slice();
    for i in (1..seq.len()).rev() {
        let prev = shot.slant_height(seq[i - 1].position.x, seq[i - 1].position.y);
        let cur = shot.slant_height(seq[i].position.x, seq[i].position.y);
        if prev >= 0.0 && cur < 0.0 {
            let u = prev / (prev - cur);
            return Ok(seq[i - 1].position.x + u * (seq[i].position.x - seq[i - 1].position.x));
        }
    }
    Err(BallisticsError::Unreachable)
}

/// Maximum slant-plane range this shot can reach, found by a golden-section
/// search over barrel elevation in `(0, APEX_IS_MAX_RANGE_RADIANS)` (spec §4.9.3).
///
/// Returns `(max_range_ft, elevation_rad)`.
pub fn find_max_range(shot: &mut ShotProps, config: &Config) -> Result<(f64, f64), BallisticsError> {
    let mut lo = 1.0e-4_f64;
    let mut hi = APEX_IS_MAX_RANGE_RADIANS;

    let mut x1 = hi - GOLDEN * (hi - lo);
    let mut x2 = lo + GOLDEN * (hi - lo);
    let mut f1 = zero_down_distance(shot, x1, config)?;
    let mut f2 = zero_down_distance(shot, x2, config)?;

    for _ in 0..config.max_iterations {
        if (hi - lo).abs() < 1e-6 {
            break;
        }
        if f1 < f2 {
            lo = x1;
            x1 = x2;
            f1 = f2;
            x2 = lo + GOLDEN * (hi - lo);
            f2 = zero_down_distance(shot, x2, config)?;
        } else {
            hi = x2;
            x2 = x1;
            f2 = f1;
            x1 = hi - GOLDEN * (hi - lo);
            f1 = zero_down_distance(shot, x1, config)?;
        }
    }

    if f1 > f2 {
        Ok((f1, x1))
    } else {
        Ok((f2, x2))
    }
}

/// Time and height of the apex of the trajectory fired at `shot`'s current
/// `barrel_elevation_rad` (spec §4.9.4): the point where `velocity.y == 0`.
pub fn find_apex(shot: &mut ShotProps, config: &Config) -> Result<(f64, f64), BallisticsError> {
    let out = integrator::integrate(Method::Rk4, shot, config, 1.0e7, 0.0, None);
    let sample = out.seq.interpolate(InterpKey::VelY, 0.0, shot.look_angle_rad)?;
    Ok((sample.time_s, sample.position.y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::flat_shot;

    #[test]
    fn zero_angle_tiny_distance_is_trivially_zero() {
        let mut shot = flat_shot();
        let config = Config::default();
        let elevation = zero_angle(&mut shot, 0.01, &config).unwrap();
        assert_eq!(elevation, 0.0);
    }

    #[test]
    fn zero_angle_converges_for_a_modest_zero_distance() {
        let mut shot = flat_shot();
        let config = Config::default();
        let elevation = zero_angle(&mut shot, 300.0 * 3.0, &config).unwrap();
        let err = height_error_at(&mut shot, elevation, 900.0, &config).unwrap();
        assert!(err.abs() <= ALLOWED_ZERO_ERROR_FEET + 1e-6);
    }

    #[test]
    fn find_zero_angle_matches_newton_result() {
        let mut shot_a = flat_shot();
        let mut shot_b = flat_shot();
        let config = Config::default();
        let newton = zero_angle(&mut shot_a, 900.0, &config).unwrap();
        let ridder = find_zero_angle(&mut shot_b, 900.0, &config, false).unwrap();
        assert!((newton - ridder).abs() < 1e-2);
    }

    #[test]
    fn find_zero_angle_lofted_picks_a_steeper_angle_than_flat() {
        let mut shot_flat = flat_shot();
        let mut shot_lofted = flat_shot();
        let config = Config::default();
        let (max_range_ft, _) = find_max_range(&mut flat_shot(), &config).unwrap();
        let distance = max_range_ft * 0.6;

        let flat = find_zero_angle(&mut shot_flat, distance, &config, false).unwrap();
        let lofted = find_zero_angle(&mut shot_lofted, distance, &config, true).unwrap();
        assert!(lofted > flat);
    }

    #[test]
    fn find_zero_angle_rejects_distance_past_max_range() {
        let mut shot = flat_shot();
        let config = Config::default();
        let (max_range_ft, _) = find_max_range(&mut flat_shot(), &config).unwrap();
        let err = find_zero_angle(&mut shot, max_range_ft * 2.0, &config, false);
        assert!(matches!(err, Err(BallisticsError::OutOfRange { .. })));
    }

    #[test]
    fn find_max_range_returns_a_positive_elevation_and_range() {
        let mut shot = flat_shot();
        let config = Config::default();
        let (range, elevation) = find_max_range(&mut shot, &config).unwrap();
        assert!(range > 0.0);
        assert!(elevation > 0.0 && elevation < APEX_IS_MAX_RANGE_RADIANS);
    }

    #[test]
    fn find_apex_of_a_lofted_shot_is_above_the_muzzle() {
        let mut shot = flat_shot();
        shot.barrel_elevation_rad = 20.0_f64.to_radians();
        let config = Config::default();
        let (time_s, height_ft) = find_apex(&mut shot, &config).unwrap();
        assert!(time_s > 0.0);
        assert!(height_ft > 0.0);
    }
}
