//! ContactClassifier trait - classification engine boundary
//!
//! The pretrained scoring engine is an external, cold-initialized resource.
//! This trait is the only surface the pipeline sees.

use crate::{ContractError, NormalizedFrame};

/// Contact classification engine
///
/// `infer` receives one normalized H x W window (row-major) and returns a
/// class index in `[0, CONTACT_CLASSES)`. Engines that signal faults with a
/// sentinel (e.g. -1) must map it to `Err(ContractError::Inference)`.
///
/// An `Err` from `infer` is FATAL for the calling task: the engine has no
/// defined recovery path mid-stream, so the pipeline terminates with a
/// diagnostic instead of retrying.
pub trait ContactClassifier: Send {
    /// Engine name (used for logging/diagnostics)
    fn name(&self) -> &str;

    /// Classify one normalized window
    fn infer(&mut self, frame: &NormalizedFrame) -> Result<u8, ContractError>;
}
