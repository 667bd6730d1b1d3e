//! Public façade tying the integrator, filter, and solvers together (spec §4.10).

use ballistics_core::{BallisticsError, Config, TerminationReason};

use crate::filter::{DataFilter, TrajectoryRow};
use crate::integrator::{self, Method};
use crate::shot::ShotProps;
use crate::solvers;
use crate::trajectory::TrajectorySeq;

/// Everything one `Engine::integrate` call produces (spec §6.1).
#[derive(Clone, Debug)]
pub struct HitResult {
    /// Flagged rows the caller asked for, in emission order.
    pub rows: Vec<TrajectoryRow>,
    /// The raw dense sample buffer, kept only when the caller asked for it.
    pub dense: Option<TrajectorySeq>,
    /// `Some` if the run ended before reaching the requested range.
    pub termination: Option<TerminationReason>,
}

/// The engine's only state is the `Config` it was built with; every query
/// runs against a caller-owned [`ShotProps`] and never outlives its call.
#[derive(Clone, Copy, Debug)]
pub struct Engine {
    config: Config,
}

impl Engine {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Integrate `shot` out to `range_limit_ft`, collecting rows selected by
    /// `filter_flags` (see `ballistics_core::constants::flags`) at `range_step_ft`
    /// /`time_step_s` intervals. Keeps the dense sample buffer only if `dense`
    /// is set — most callers only want the filtered rows.
    pub fn integrate(
        &self,
        shot: &mut ShotProps,
        range_limit_ft: f64,
        range_step_ft: f64,
        time_step_s: f64,
        filter_flags: u8,
        dense: bool,
    ) -> Result<HitResult, BallisticsError> {
        tracing::debug!(range_limit_ft, range_step_ft, time_step_s, filter_flags, "starting integration");
        let mut filter = DataFilter::new(filter_flags, range_step_ft, time_step_s, shot.look_angle_rad);
        let outcome = integrator::integrate(Method::Rk4, shot, &self.config, range_limit_ft, 0.0, Some(&mut filter));

        if let Some(reason) = outcome.termination {
            if reason != TerminationReason::TargetRangeReached {
                tracing::warn!(?reason, samples = outcome.seq.len(), "integration terminated early");
                return Err(BallisticsError::RangeError { reason });
            }
        }

        Ok(HitResult {
            rows: outcome.rows,
            dense: if dense { Some(outcome.seq) } else { None },
            termination: outcome.termination,
        })
    }

    /// Damped-Newton zero solve (spec §4.9.1). Mutates `shot.barrel_elevation_rad`
    /// as a side effect of the search; the returned value is the final accepted one.
    pub fn zero_angle(&self, shot: &mut ShotProps, zero_distance_ft: f64) -> Result<f64, BallisticsError> {
        solvers::zero_angle(shot, zero_distance_ft, &self.config)
    }

    /// Ridder's-method zero solve (spec §4.9.2). `lofted = false` searches the
    /// low, flat-path bracket; `lofted = true` searches the high, lofted-path
    /// bracket above the angle of maximum range.
    pub fn find_zero_angle(
        &self,
        shot: &mut ShotProps,
        zero_distance_ft: f64,
        lofted: bool,
    ) -> Result<f64, BallisticsError> {
        solvers::find_zero_angle(shot, zero_distance_ft, &self.config, lofted)
    }

    /// Golden-section search for this shot's maximum slant range (spec §4.9.3).
    pub fn find_max_range(&self, shot: &mut ShotProps) -> Result<(f64, f64), BallisticsError> {
        solvers::find_max_range(shot, &self.config)
    }

    /// Apex time and height at `shot`'s current elevation (spec §4.9.4).
    pub fn find_apex(&self, shot: &mut ShotProps) -> Result<(f64, f64), BallisticsError> {
        solvers::find_apex(shot, &self.config)
    }
}
