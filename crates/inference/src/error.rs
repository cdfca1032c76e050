//! Inference error types

use contracts::ContractError;
use thiserror::Error;

/// Inference-stage errors; all of these terminate the pipeline
#[derive(Debug, Error)]
pub enum InferenceError {
    /// The classifier signalled an internal fault
    #[error("classifier '{name}' fault at frame {seq}: {message}")]
    ClassifierFault {
        name: String,
        seq: u64,
        message: String,
    },

    /// The classifier returned a class outside [0, 16)
    #[error("classifier '{name}' returned out-of-range class {class_index} at frame {seq}")]
    ClassOutOfRange {
        name: String,
        seq: u64,
        class_index: u8,
    },

    /// Contract-level error
    #[error(transparent)]
    Contract(#[from] ContractError),
}
