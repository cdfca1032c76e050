//! Ingestion Pipeline main entry

use std::collections::HashMap;
use std::sync::Arc;

use async_channel::{bounded, Receiver, Sender};
use contracts::{Channel, SamplePacket, SampleSource};
use tracing::{debug, info, instrument};

use crate::adapter::SampleAdapter;
use crate::config::{BackpressureConfig, IngestionMetrics};
use crate::error::{IngestionError, Result};
use crate::generic_adapter::GenericSampleAdapter;

/// Ingestion Pipeline
///
/// Manages the per-channel adapters and fans all samples into one bounded
/// channel consumed by the fusion task.
pub struct IngestionPipeline {
    /// Registered adapters, one per channel
    adapters: HashMap<Channel, Box<dyn SampleAdapter>>,

    /// Shared metrics
    metrics: Arc<IngestionMetrics>,

    /// Packet sender (shared by all adapters)
    tx: Sender<SamplePacket>,

    /// Packet receiver
    rx: Option<Receiver<SamplePacket>>,

    /// Default backpressure configuration
    default_config: BackpressureConfig,
}

impl IngestionPipeline {
    /// Create new Ingestion Pipeline
    ///
    /// # Arguments
    /// * `channel_capacity` - Shared channel capacity
    pub fn new(channel_capacity: usize) -> Self {
        let (tx, rx) = bounded(channel_capacity);

        Self {
            adapters: HashMap::new(),
            metrics: Arc::new(IngestionMetrics::new()),
            tx,
            rx: Some(rx),
            default_config: BackpressureConfig {
                channel_capacity,
                ..Default::default()
            },
        }
    }

    /// Register a sample source for its channel
    ///
    /// Each channel accepts exactly one source per pipeline session.
    #[instrument(
        name = "ingestion_register_source",
        skip(self, source, config),
        fields(channel = %source.channel())
    )]
    pub fn register_source(
        &mut self,
        source: Box<dyn SampleSource>,
        config: Option<BackpressureConfig>,
    ) -> Result<()> {
        let channel = source.channel();
        if self.adapters.contains_key(&channel) {
            return Err(IngestionError::AlreadyRegistered { channel });
        }

        let adapter = GenericSampleAdapter::new(
            source,
            config.unwrap_or_else(|| self.default_config.clone()),
        );
        debug!(channel = %channel, "registered sample source");
        self.adapters.insert(channel, Box::new(adapter));
        Ok(())
    }

    /// Start all registered sources
    #[instrument(name = "ingestion_start_all", skip(self))]
    pub fn start_all(&self) {
        info!(count = self.adapters.len(), "starting all sample adapters");
        for (channel, adapter) in &self.adapters {
            self.start_adapter(*channel, adapter.as_ref());
        }
    }

    /// Stop all sources
    #[instrument(name = "ingestion_stop_all", skip(self))]
    pub fn stop_all(&self) {
        info!(count = self.adapters.len(), "stopping all sample adapters");
        for (channel, adapter) in &self.adapters {
            self.stop_adapter(*channel, adapter.as_ref());
        }
    }

    fn start_adapter(&self, channel: Channel, adapter: &dyn SampleAdapter) {
        if !adapter.is_listening() {
            debug!(channel = %channel, "starting adapter");
            adapter.start(self.tx.clone(), self.metrics.clone());
        }
    }

    fn stop_adapter(&self, channel: Channel, adapter: &dyn SampleAdapter) {
        if adapter.is_listening() {
            debug!(channel = %channel, "stopping adapter");
            adapter.stop();
        }
    }

    /// Get the packet receiver
    ///
    /// Note: Can only be called once, subsequent calls return None
    pub fn take_receiver(&mut self) -> Option<Receiver<SamplePacket>> {
        self.rx.take()
    }

    /// Get metrics reference
    pub fn metrics(&self) -> Arc<IngestionMetrics> {
        self.metrics.clone()
    }

    /// Get registered source count
    pub fn source_count(&self) -> usize {
        self.adapters.len()
    }

    /// Check if the given channel is listening
    pub fn is_channel_listening(&self, channel: Channel) -> bool {
        self.adapters
            .get(&channel)
            .map(|a| a.is_listening())
            .unwrap_or(false)
    }
}

impl Drop for IngestionPipeline {
    fn drop(&mut self) {
        self.stop_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockSampleSource;

    #[test]
    fn test_pipeline_creation() {
        let pipeline = IngestionPipeline::new(100);
        assert_eq!(pipeline.source_count(), 0);
    }

    #[test]
    fn test_take_receiver_once() {
        let mut pipeline = IngestionPipeline::new(100);
        assert!(pipeline.take_receiver().is_some());
        assert!(pipeline.take_receiver().is_none());
    }

    #[test]
    fn test_duplicate_channel_rejected() {
        let mut pipeline = IngestionPipeline::new(100);
        pipeline
            .register_source(Box::new(MockSampleSource::leg(500.0)), None)
            .unwrap();

        let result = pipeline.register_source(Box::new(MockSampleSource::leg(500.0)), None);
        assert!(matches!(
            result,
            Err(IngestionError::AlreadyRegistered {
                channel: Channel::Leg
            })
        ));
    }

    #[test]
    fn test_both_channels_flow() {
        let mut pipeline = IngestionPipeline::new(256);
        pipeline
            .register_source(Box::new(MockSampleSource::leg(1000.0)), None)
            .unwrap();
        pipeline
            .register_source(Box::new(MockSampleSource::imu(1000.0)), None)
            .unwrap();

        let rx = pipeline.take_receiver().unwrap();
        pipeline.start_all();
        assert!(pipeline.is_channel_listening(Channel::Leg));
        assert!(pipeline.is_channel_listening(Channel::Imu));

        std::thread::sleep(std::time::Duration::from_millis(50));
        pipeline.stop_all();

        let mut saw_leg = false;
        let mut saw_imu = false;
        while let Ok(packet) = rx.try_recv() {
            match packet.channel {
                Channel::Leg => saw_leg = true,
                Channel::Imu => saw_imu = true,
            }
        }
        assert!(saw_leg && saw_imu);
    }
}
