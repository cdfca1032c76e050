//! Pipeline orchestrator - coordinates all components.
//!
//! Wires ingestion -> fusion task -> inference task -> publisher. The
//! sample transport is an external collaborator; self-contained runs
//! synthesize samples with the mock sources at the configured channel
//! rates.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use contracts::PipelineBlueprint;
use fusion_engine::FusionEngine;
use inference::{build_classifier, FrameDump, InferenceTask};
use ingestion::{BackpressureConfig, IngestionPipeline, MockSampleSource};
use observability::{
    record_contact_report, record_fusion_metrics, record_sample_received,
    ContactMetricsAggregator,
};
use publisher::create_publisher;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use super::PipelineStats;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// The pipeline blueprint configuration
    pub blueprint: PipelineBlueprint,

    /// Maximum number of reports to produce (None = unlimited)
    pub max_reports: Option<u64>,

    /// Pipeline timeout (None = no timeout)
    pub timeout: Option<Duration>,

    /// Channel buffer size
    pub buffer_size: usize,

    /// Metrics server port (None = disabled)
    pub metrics_port: Option<u16>,
}

/// Main pipeline orchestrator
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a new pipeline with the given configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run the pipeline to completion
    pub async fn run(self) -> Result<PipelineStats> {
        let start_time = Instant::now();
        let blueprint = &self.config.blueprint;

        // Initialize Metrics (optional)
        if let Some(port) = self.config.metrics_port {
            observability::init_metrics_only(port)?;
            info!("Metrics endpoint available on port {}", port);
        }

        // Classifier session first: an init failure is fatal before any
        // pipeline task starts.
        let classifier =
            build_classifier(&blueprint.classifier).context("Failed to initialize classifier")?;
        info!(classifier = classifier.name(), "Classifier session ready");

        // Setup Ingestion
        info!("Setting up ingestion pipeline...");
        let mut ingestion = IngestionPipeline::new(self.config.buffer_size);
        let backpressure =
            BackpressureConfig::new(self.config.buffer_size, blueprint.engine.drop_policy);

        ingestion
            .register_source(
                Box::new(MockSampleSource::leg(blueprint.channels.leg.frequency_hz)),
                Some(backpressure.clone()),
            )
            .context("Failed to register leg source")?;
        ingestion
            .register_source(
                Box::new(MockSampleSource::imu(blueprint.channels.imu.frequency_hz)),
                Some(backpressure),
            )
            .context("Failed to register imu source")?;

        let active_channels = ingestion.source_count();
        info!(active_channels, "Ingestion pipeline configured");

        // Hand-off channels and the cooperative stop signal
        let (fusion_tx, fusion_rx) = mpsc::channel(blueprint.engine.handoff_capacity);
        let (report_tx, mut report_rx) = mpsc::channel(self.config.buffer_size);
        let (publish_tx, publish_rx) = mpsc::channel(self.config.buffer_size);
        let (stop_tx, stop_rx) = watch::channel(false);

        // Setup Publisher
        info!("Setting up publisher...");
        if blueprint.sinks.is_empty() {
            warn!("No sinks configured - contact reports will be dropped");
        }

        let publisher = create_publisher(blueprint.sinks.clone(), publish_rx)
            .await
            .context("Failed to create publisher")?;

        let active_sinks = blueprint.sinks.len();
        let publisher_handle = publisher.spawn();
        info!(active_sinks, "Publisher started");

        // Inference task (pipeline task 2)
        let dump = blueprint.debug.dump_first_frame.clone().map(FrameDump::new);
        let inference_handle =
            InferenceTask::new(fusion_rx, report_tx, classifier, dump, stop_rx.clone()).spawn();

        // Report relay: records metrics and aggregates between the
        // inference task and the publisher.
        let aggregator = Arc::new(Mutex::new(ContactMetricsAggregator::new()));
        let relay_aggregator = aggregator.clone();
        let relay_handle = tokio::spawn(async move {
            let mut published = 0u64;
            while let Some(report) = report_rx.recv().await {
                record_contact_report(&report);
                relay_aggregator
                    .lock()
                    .expect("aggregator lock")
                    .update_report(&report);
                if publish_tx.send(report).await.is_err() {
                    warn!("Publisher channel closed");
                    break;
                }
                published += 1;
            }
            published
        });

        // Start ingestion and the fusion task (pipeline task 1)
        info!("Starting sample ingestion...");
        ingestion.start_all();
        let ingestion_rx = ingestion
            .take_receiver()
            .context("Failed to get ingestion receiver")?;

        let max_reports = self.config.max_reports;
        info!(max_reports = ?max_reports, "Pipeline running");

        let engine_config = blueprint.engine.clone();
        let fusion_aggregator = aggregator.clone();
        let mut fusion_stop = stop_rx;
        let mut fusion_handle = tokio::spawn(async move {
            let mut engine = FusionEngine::new(&engine_config);
            let mut samples_received = 0u64;
            let mut frames_fused = 0u64;

            loop {
                let packet = tokio::select! {
                    changed = fusion_stop.changed() => {
                        if changed.is_err() || *fusion_stop.borrow() {
                            info!("Stop signal observed, fusion task exiting");
                            break;
                        }
                        continue;
                    }
                    maybe = ingestion_rx.recv() => match maybe {
                        Ok(packet) => packet,
                        Err(_) => {
                            info!("Ingestion channel closed, fusion task exiting");
                            break;
                        }
                    },
                };

                samples_received += 1;
                record_sample_received(packet.channel.as_str());

                if let Some(output) = engine.push(packet) {
                    frames_fused += 1;
                    record_fusion_metrics(&output.meta, output.frame.seq);
                    fusion_aggregator
                        .lock()
                        .expect("aggregator lock")
                        .update_fusion(&output.meta);

                    debug!(
                        seq = output.frame.seq,
                        leg_depth = output.meta.leg_depth,
                        imu_depth = output.meta.imu_depth,
                        "Normalized frame produced"
                    );

                    if fusion_tx.send(output).await.is_err() {
                        warn!("Inference channel closed");
                        break;
                    }

                    // Check max reports limit
                    if let Some(max) = max_reports {
                        if frames_fused >= max {
                            info!(frames = frames_fused, "Reached max reports limit");
                            break;
                        }
                    }
                }
            }

            (samples_received, frames_fused, engine.pairs_built())
        });

        // Run with optional timeout; a timeout fires the cooperative stop
        // observed at every receive point.
        let (samples_received, frames_fused, rows_fused) = match self.config.timeout {
            Some(timeout) => match tokio::time::timeout(timeout, &mut fusion_handle).await {
                Ok(result) => result.context("Fusion task panicked")?,
                Err(_) => {
                    warn!(timeout_secs = timeout.as_secs(), "Pipeline timed out");
                    let _ = stop_tx.send(true);
                    fusion_handle.await.context("Fusion task panicked")?
                }
            },
            None => fusion_handle.await.context("Fusion task panicked")?,
        };

        // Shutdown: stop the sources, then let channel closure drain the
        // downstream stages in order.
        info!("Shutting down pipeline...");
        ingestion.stop_all();

        let inference_result = inference_handle.await.context("Inference task panicked")?;
        let inference_stats = match inference_result {
            Ok(stats) => stats,
            Err(e) => {
                // Fatal engine fault: drain the publisher, then surface the
                // diagnostic.
                let _ = tokio::time::timeout(Duration::from_secs(5), publisher_handle).await;
                return Err(anyhow::Error::new(e).context("Inference stage failed"));
            }
        };

        let reports_published = relay_handle.await.context("Relay task panicked")?;

        // Wait for publisher to flush
        let _ = tokio::time::timeout(Duration::from_secs(5), publisher_handle).await;

        let contact_metrics = aggregator.lock().expect("aggregator lock").clone();

        let stats = PipelineStats {
            samples_received,
            rows_fused,
            frames_fused,
            reports_classified: inference_stats.frames_classified,
            reports_published,
            duration: start_time.elapsed(),
            active_channels,
            active_sinks,
            contact_metrics,
        };

        info!(
            duration_secs = stats.duration.as_secs_f64(),
            fps = format!("{:.2}", stats.fps()),
            "Pipeline shutdown complete"
        );

        Ok(stats)
    }
}
