//! ContactSink trait - publisher output interface
//!
//! Defines the abstract interface for result sinks.

use crate::{ContactReport, ContractError};

/// Result output trait
///
/// All sink implementations must implement this trait.
#[trait_variant::make(ContactSink: Send)]
pub trait LocalContactSink {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Write one contact report
    ///
    /// # Errors
    /// Returns write error (should include context)
    async fn write(&mut self, report: &ContactReport) -> Result<(), ContractError>;

    /// Flush buffer (if any)
    async fn flush(&mut self) -> Result<(), ContractError>;

    /// Close sink
    async fn close(&mut self) -> Result<(), ContractError>;
}
