//! SampleSource trait - sample delivery abstraction
//!
//! Defines a unified interface for the two input channels, decoupling the
//! pipeline from the concrete transport. Real deployments implement this
//! over their pub/sub transport; tests and self-contained runs use the
//! mock sources in `ingestion`.

use std::sync::Arc;

use crate::{Channel, SamplePacket};

/// Sample delivery callback type
///
/// Invoked by the source whenever a new sample is available. Uses `Arc` to
/// allow callback sharing across contexts.
pub type SampleCallback = Arc<dyn Fn(SamplePacket) + Send + Sync>;

/// Sample source trait
///
/// One instance per input channel. There is no flow control at this
/// boundary: if the pipeline is slow, packets accumulate in the bounded
/// ingestion queue and are dropped by policy there.
///
/// # Example
///
/// ```ignore
/// let source: Box<dyn SampleSource> = transport.leg_source();
/// source.listen(Arc::new(|packet| {
///     println!("sample on {}", packet.channel);
/// }));
/// // ... run ...
/// source.stop();
/// ```
pub trait SampleSource: Send + Sync {
    /// Channel this source feeds
    fn channel(&self) -> Channel;

    /// Register the delivery callback
    ///
    /// Repeated calls while already listening must be idempotent (no
    /// duplicate callback registration).
    fn listen(&self, callback: SampleCallback);

    /// Stop delivering samples
    fn stop(&self);

    /// Check if currently listening
    fn is_listening(&self) -> bool;
}
