//! Pipeline statistics and metrics.

use std::time::Duration;

use observability::ContactMetricsAggregator;

/// Statistics from a pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    /// Total samples received from both channels
    pub samples_received: u64,

    /// Feature rows fused (including the window fill phase)
    pub rows_fused: u64,

    /// Normalized frames produced
    pub frames_fused: u64,

    /// Frames classified by the engine
    pub reports_classified: u64,

    /// Reports handed to the publisher
    pub reports_published: u64,

    /// Total duration of the pipeline run
    pub duration: Duration,

    /// Number of input channels that were active
    pub active_channels: usize,

    /// Number of sinks that received data
    pub active_sinks: usize,

    /// Aggregated contact metrics
    pub contact_metrics: ContactMetricsAggregator,
}

impl PipelineStats {
    /// Calculate frames per second throughput
    pub fn fps(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.frames_fused as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n=== Pipeline Statistics ===\n");

        println!("Overview");
        println!("  duration: {:.2}s", self.duration.as_secs_f64());
        println!("  samples received: {}", self.samples_received);
        println!("  rows fused: {}", self.rows_fused);
        println!("  frames normalized: {}", self.frames_fused);
        println!("  reports classified: {}", self.reports_classified);
        println!("  reports published: {}", self.reports_published);
        println!("  frames/s: {:.2}", self.fps());
        println!("  active channels: {}", self.active_channels);
        println!("  active sinks: {}", self.active_sinks);

        println!();
        print!("{}", self.contact_metrics.summary());
        println!();
    }
}
