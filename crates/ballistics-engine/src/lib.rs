//! ballistics-engine
//!
//! Point-mass trajectory solver core: fixed-step integration (Euler/RK4)
//! over a piecewise drag curve and standard atmosphere, a stateful filter
//! turning dense samples into flagged rows, and the zero/range/apex
//! solvers built on top of both.
//!
//! Everything here operates on a caller-owned [`ShotProps`] for the
//! duration of one call; the engine itself holds nothing but a [`Config`].

pub mod engine;
pub mod filter;
pub mod integrator;
pub mod shot;
pub mod solvers;
pub mod trajectory;

#[cfg(test)]
mod test_support;

pub use engine::{Engine, HitResult};
pub use filter::{DataFilter, TrajectoryRow};
pub use integrator::{IntegrationOutcome, Method};
pub use shot::ShotProps;
pub use trajectory::{BaseTrajSample, InterpKey, TrajectorySeq};

pub use ballistics_core::{
    constants, AtmoSample, Atmosphere, BallisticsError, Config, DragCurve, TerminationReason, Vec3,
    WindField, WindSegment, ALLOWED_ZERO_ERROR_FEET,
};
