//! Publisher - main loop for fan-out to sinks

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

use contracts::{ContactReport, SinkConfig, SinkType};

use crate::error::PublisherError;
use crate::handle::SinkHandle;
use crate::handle::SinkMetricsSnapshot;
use crate::sinks::{CsvSink, LogSink, NetworkSink};

/// Publisher configuration
#[derive(Debug, Clone)]
pub struct PublisherConfig {
    /// Sink configurations
    pub sinks: Vec<SinkConfig>,
}

/// Builder for creating a Publisher
pub struct PublisherBuilder {
    config: PublisherConfig,
    input_rx: mpsc::Receiver<ContactReport>,
}

impl PublisherBuilder {
    /// Create a new PublisherBuilder
    pub fn new(config: PublisherConfig, input_rx: mpsc::Receiver<ContactReport>) -> Self {
        Self { config, input_rx }
    }

    /// Build and start the publisher
    #[instrument(name = "publisher_builder_build", skip(self))]
    pub async fn build(self) -> Result<Publisher, PublisherError> {
        let handles = Self::initialize_handles(&self.config).await?;

        Ok(Publisher {
            handles,
            input_rx: self.input_rx,
        })
    }

    #[instrument(
        name = "publisher_initialize_handles",
        skip(config),
        fields(sink_count = config.sinks.len())
    )]
    async fn initialize_handles(
        config: &PublisherConfig,
    ) -> Result<Vec<SinkHandle>, PublisherError> {
        let mut handles = Vec::with_capacity(config.sinks.len());
        for sink_config in &config.sinks {
            handles.push(create_sink_handle(sink_config).await?);
        }
        Ok(handles)
    }
}

/// Create a SinkHandle from configuration
#[instrument(
    name = "publisher_create_sink_handle",
    skip(config),
    fields(sink = %config.name, sink_type = ?config.sink_type)
)]
async fn create_sink_handle(config: &SinkConfig) -> Result<SinkHandle, PublisherError> {
    match config.sink_type {
        SinkType::Log => {
            let sink = LogSink::new(&config.name);
            Ok(SinkHandle::spawn(sink, config.queue_capacity))
        }
        SinkType::Csv => {
            let sink = CsvSink::from_params(&config.name, &config.params)
                .map_err(|e| PublisherError::sink_creation(&config.name, e.to_string()))?;
            Ok(SinkHandle::spawn(sink, config.queue_capacity))
        }
        SinkType::Network => {
            let sink = NetworkSink::from_params(&config.name, &config.params)
                .await
                .map_err(|e| PublisherError::sink_creation(&config.name, e.to_string()))?;
            Ok(SinkHandle::spawn(sink, config.queue_capacity))
        }
    }
}

/// The main Publisher that fans out reports to sinks
pub struct Publisher {
    handles: Vec<SinkHandle>,
    input_rx: mpsc::Receiver<ContactReport>,
}

impl Publisher {
    /// Create a publisher with custom sink handles (for testing)
    pub fn with_handles(
        handles: Vec<SinkHandle>,
        input_rx: mpsc::Receiver<ContactReport>,
    ) -> Self {
        Self { handles, input_rx }
    }

    /// Get metrics for all sinks
    pub fn metrics(&self) -> Vec<(String, SinkMetricsSnapshot)> {
        self.handles
            .iter()
            .map(|h| (h.name().to_string(), h.metrics().snapshot()))
            .collect()
    }

    /// Run the publisher main loop
    ///
    /// Consumes reports from input and fans out to all sinks.
    /// Returns when the input channel is closed.
    #[instrument(name = "publisher_run", skip(self))]
    pub async fn run(mut self) {
        info!(sinks = self.handles.len(), "Publisher started");

        let mut report_count: u64 = 0;

        while let Some(report) = self.input_rx.recv().await {
            report_count += 1;
            self.dispatch_report(&report);

            if report_count.is_multiple_of(100) {
                debug!(reports = report_count, "Publisher progress");
            }
        }

        info!(
            reports = report_count,
            "Publisher input closed, shutting down"
        );

        Self::shutdown_handles(self.handles).await;

        info!("Publisher shutdown complete");
    }

    /// Spawn the publisher as a background task
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    fn dispatch_report(&self, report: &ContactReport) {
        for handle in &self.handles {
            handle.try_send(report.clone());
        }
    }

    async fn shutdown_handles(handles: Vec<SinkHandle>) {
        for handle in handles {
            handle.shutdown().await;
        }
    }
}

/// Convenience function to create a publisher from sink configs
#[instrument(name = "publisher_create", skip(sink_configs, input_rx))]
pub async fn create_publisher(
    sink_configs: Vec<SinkConfig>,
    input_rx: mpsc::Receiver<ContactReport>,
) -> Result<Publisher, PublisherError> {
    let config = PublisherConfig {
        sinks: sink_configs,
    };
    PublisherBuilder::new(config, input_rx).build().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{ContactResult, FeatureRow};
    use std::collections::HashMap;

    fn report(seq: u64) -> ContactReport {
        ContactReport {
            seq,
            timestamp: seq as f64,
            class_index: 5,
            contacts: ContactResult::from_class_index(5),
            row: FeatureRow::default(),
        }
    }

    #[tokio::test]
    async fn test_publisher_fanout() {
        let (input_tx, input_rx) = mpsc::channel(10);

        // Create log sinks for testing
        let sink1 = LogSink::new("sink1");
        let sink2 = LogSink::new("sink2");

        let handles = vec![SinkHandle::spawn(sink1, 10), SinkHandle::spawn(sink2, 10)];

        let publisher = Publisher::with_handles(handles, input_rx);
        let handle = publisher.spawn();

        // Send some reports
        for seq in 0..5 {
            input_tx.send(report(seq)).await.unwrap();
        }

        // Close input channel
        drop(input_tx);

        // Wait for publisher to finish
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_create_publisher_from_config() {
        let (input_tx, input_rx) = mpsc::channel(10);

        let configs = vec![SinkConfig {
            name: "test_log".to_string(),
            sink_type: SinkType::Log,
            queue_capacity: 50,
            params: HashMap::new(),
        }];

        let publisher = create_publisher(configs, input_rx).await.unwrap();
        let handle = publisher.spawn();

        input_tx.send(report(1)).await.unwrap();

        drop(input_tx);
        handle.await.unwrap();
    }
}
