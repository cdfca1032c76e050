//! Generic sample adapter
//!
//! Unified adapter over the `SampleSource` trait. Allows the
//! IngestionPipeline to treat mock and real transports the same way.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_channel::{Sender, TrySendError};
use contracts::{Channel, DropPolicy, SampleCallback, SamplePacket, SampleSource};
use tracing::{debug, trace, warn};

use crate::adapter::SampleAdapter;
use crate::config::{BackpressureConfig, IngestionMetrics};

/// Generic sample adapter
///
/// Bridges a `SampleSource` callback into the shared ingestion channel,
/// applying the configured drop policy when the channel is full.
pub struct GenericSampleAdapter {
    channel: Channel,
    source: Box<dyn SampleSource>,
    config: BackpressureConfig,
    listening: Arc<AtomicBool>,
}

impl GenericSampleAdapter {
    /// Create a new generic adapter
    pub fn new(source: Box<dyn SampleSource>, config: BackpressureConfig) -> Self {
        Self {
            channel: source.channel(),
            source,
            config,
            listening: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl SampleAdapter for GenericSampleAdapter {
    fn channel(&self) -> Channel {
        self.channel
    }

    fn start(&self, tx: Sender<SamplePacket>, metrics: Arc<IngestionMetrics>) {
        if self.listening.swap(true, Ordering::SeqCst) {
            return;
        }

        let channel = self.channel;
        let drop_policy = self.config.drop_policy;
        let listening = self.listening.clone();

        debug!(channel = %channel, "starting sample adapter");

        let callback: SampleCallback = Arc::new(move |packet| {
            if !listening.load(Ordering::Relaxed) {
                return;
            }

            metrics.record_received();
            trace!(channel = %channel, "adapter received sample");
            send_packet(&tx, packet, &metrics, channel, drop_policy);
        });

        self.source.listen(callback);
    }

    fn stop(&self) {
        if self.listening.swap(false, Ordering::SeqCst) {
            debug!(channel = %self.channel, "stopping sample adapter");
            self.source.stop();
        }
    }

    fn is_listening(&self) -> bool {
        self.listening.load(Ordering::Relaxed)
    }
}

/// Send packet, handling backpressure policy
#[inline]
fn send_packet(
    tx: &Sender<SamplePacket>,
    packet: SamplePacket,
    metrics: &Arc<IngestionMetrics>,
    channel: Channel,
    drop_policy: DropPolicy,
) {
    match tx.try_send(packet) {
        Ok(_) => {
            trace!(channel = %channel, "sample sent");
        }
        Err(TrySendError::Full(_)) => {
            metrics.record_dropped();
            match drop_policy {
                DropPolicy::DropNewest => {
                    trace!(channel = %channel, "sample dropped (newest)");
                }
                DropPolicy::DropOldest => {
                    // async-channel has no pop; oldest-drop happens in the
                    // fusion engine's own bounded queues, newest here.
                    trace!(channel = %channel, "sample dropped (oldest fallback)");
                }
            }
        }
        Err(TrySendError::Closed(_)) => {
            warn!(channel = %channel, "ingestion channel closed");
        }
    }
}
