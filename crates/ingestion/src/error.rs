//! Ingestion error types

use contracts::Channel;
use thiserror::Error;

/// Ingestion errors
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Channel already has a registered source
    #[error("channel {channel} already has a registered source")]
    AlreadyRegistered {
        /// Input channel
        channel: Channel,
    },

    /// Downstream channel closed
    #[error("downstream channel closed for {channel}")]
    ChannelClosed {
        /// Input channel
        channel: Channel,
    },

    /// Source is not listening
    #[error("source for {channel} is not listening")]
    NotListening {
        /// Input channel
        channel: Channel,
    },
}

/// Ingestion Result type alias
pub type Result<T> = std::result::Result<T, IngestionError>;
