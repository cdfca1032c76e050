//! # Contracts
//!
//! Frozen interface contracts (ICD), defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Time Model
//! - Samples carry the producer's timestamp (seconds, f64) for diagnostics
//! - Stream pairing is positional, NOT timestamp-based (see `fusion_engine`)

mod blueprint;
mod classifier;
mod contact;
mod error;
mod feature;
mod frame;
mod sample;
mod sink;
mod source;

pub use blueprint::*;
pub use classifier::ContactClassifier;
pub use contact::*;
pub use error::*;
pub use feature::*;
pub use frame::*;
pub use sample::*;
pub use sink::*;
pub use source::{SampleCallback, SampleSource};

/// Rows held by the sliding window (matrix height H).
pub const WINDOW_HEIGHT: usize = 75;

/// Values per fused feature row (matrix width W).
pub const FEATURE_WIDTH: usize = 54;

/// Joint-space values per leg vector (12 = 4 legs x 3 joints).
pub const LEG_DOF: usize = 12;

/// Axes per inertial vector.
pub const IMU_AXES: usize = 3;

/// Legs on the robot.
pub const LEG_COUNT: usize = 4;

/// Distinct contact states (2^LEG_COUNT).
pub const CONTACT_CLASSES: usize = 16;
