//! # Inference
//!
//! Classification stage of the pipeline.
//!
//! Responsible for:
//! - Consuming `FusionOutput` in production order
//! - Driving the `ContactClassifier` engine
//! - Decomposing class indices into per-leg contact flags
//! - Forwarding `ContactReport`s to the publisher
//! - Optional first-frame debug dump
//!
//! A classifier fault is fatal for this stage: the engine is a cold,
//! one-time-initialized resource with no defined mid-stream recovery, so
//! the task terminates with a diagnostic instead of retrying.

mod classifiers;
mod dump;
mod error;
mod task;

pub use classifiers::{build_classifier, MockClassifier, ThresholdClassifier};
pub use dump::FrameDump;
pub use error::InferenceError;
pub use task::{InferenceStats, InferenceTask};

pub use contracts::{ContactClassifier, ContactReport, FusionOutput};
