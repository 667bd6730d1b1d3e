//! Error taxonomy for the ballistics engine (spec §7).
//!
//! Every fallible public entry point returns `Result<T, BallisticsError>`.
//! Warnings (above-troposphere lookups, clamped temperature) are not part
//! of this enum — they are side-channel diagnostics emitted via `tracing`.

use thiserror::Error;

/// Why an integration run stopped before reaching its nominal target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// Speed fell below `Config::minimum_velocity_fps`.
    MinVelocity,
    /// Vertical velocity went non-positive and altitude dropped below `Config::maximum_drop_ft`.
    MaxDrop,
    /// Vertical velocity went non-positive and absolute altitude fell below `Config::minimum_altitude_ft`.
    MinAltitude,
    /// Reached the caller's requested range; not an error condition.
    TargetRangeReached,
}

/// The full error taxonomy produced by the engine (spec §7).
#[derive(Debug, Error)]
pub enum BallisticsError {
    /// Malformed shot or config: drag table too short, non-positive step, etc.
    #[error("invalid input: {0}")]
    InputError(String),

    /// Integrator terminated early. Carries the termination reason; the
    /// partial trajectory travels alongside this error inside `HitResult`,
    /// not inside the error value itself, so this variant stays `Clone`.
    #[error("integration terminated early: {reason:?}")]
    RangeError {
        /// Why the integrator stopped.
        reason: TerminationReason,
    },

    /// Requested slant distance exceeds the shot's maximum range.
    #[error("requested distance {requested_ft} ft exceeds max range {max_ft} ft")]
    OutOfRange {
        /// The distance the caller asked for.
        requested_ft: f64,
        /// The maximum slant range this shot can reach.
        max_ft: f64,
    },

    /// Zero-finding iteration diverged or exhausted its iteration budget.
    #[error("zero-finding did not converge after {iterations} iterations (error={last_error_ft} ft, last elevation={last_elevation_rad} rad)")]
    ZeroFindingError {
        /// Magnitude of the last height/range error observed.
        last_error_ft: f64,
        /// Number of iterations performed.
        iterations: u32,
        /// The last barrel elevation tried, useful for a caller that wants to retry.
        last_elevation_rad: f64,
    },

    /// No sign change between bracket endpoints; Ridder's method cannot proceed.
    #[error("no zero bracket: f(a) and f(b) have the same sign")]
    NoZeroBracket,

    /// PCHIP interpolation target lies outside the span the trajectory ever attained.
    #[error("interpolation target was never attained by the trajectory")]
    Unreachable,

    /// Two of the three points used for a PCHIP triple share the same key value.
    #[error("duplicate key value among interpolation points")]
    DuplicateKey,

    /// Newton step denominator too small to divide by safely.
    #[error("zero-finding denominator too small: {0}")]
    BadDenominator(f64),

    /// A degenerate numeric condition, e.g. division by zero computing stability.
    #[error("computation error: {0}")]
    ComputationError(String),
}

impl BallisticsError {
    /// Build an [`BallisticsError::InputError`] from any displayable message.
    pub fn input(msg: impl Into<String>) -> Self {
        Self::InputError(msg.into())
    }
}
