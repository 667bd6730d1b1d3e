//! Shared primitives for the ballistics trajectory solver core.
//!
//! This crate holds the pieces [`ballistics-engine`] builds on top of:
//! vector math, the piecewise drag curve, the standard-atmosphere model,
//! piecewise-constant wind, the engine-wide `Config`, and the error
//! taxonomy. Unit conversion, dimensioned-quantity formatting, drag-table
//! catalogs (G1/G7), and config construction from user input are external
//! collaborators and live outside this crate.

pub mod atmosphere;
pub mod config;
pub mod constants;
pub mod drag_curve;
pub mod error;
pub mod vec3;
pub mod wind;

pub use atmosphere::{AtmoSample, Atmosphere};
pub use config::{Config, ALLOWED_ZERO_ERROR_FEET};
pub use drag_curve::DragCurve;
pub use error::{BallisticsError, TerminationReason};
pub use vec3::Vec3;
pub use wind::{WindField, WindSegment};
