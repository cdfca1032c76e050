//! Sample adapter trait

use std::sync::Arc;

use async_channel::Sender;
use contracts::{Channel, SamplePacket};

use crate::config::IngestionMetrics;

/// Sample adapter trait
///
/// One adapter per input channel, responsible for:
/// 1. Registering the source callback
/// 2. Wrapping samples as `SamplePacket`
/// 3. Sending to the shared channel (handling backpressure)
pub trait SampleAdapter: Send + Sync {
    /// Channel this adapter feeds
    fn channel(&self) -> Channel;

    /// Start sample delivery
    ///
    /// # Arguments
    /// * `tx` - Packet send channel
    /// * `metrics` - Shared ingestion metrics
    fn start(&self, tx: Sender<SamplePacket>, metrics: Arc<IngestionMetrics>);

    /// Stop sample delivery
    fn stop(&self);

    /// Check if the adapter is listening
    fn is_listening(&self) -> bool;
}
