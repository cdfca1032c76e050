//! Pipeline metric collection
//!
//! Records fusion and classification metrics, and aggregates them in
//! memory for the end-of-run summary.

use contracts::{ContactReport, FusionMeta, CONTACT_CLASSES, LEG_COUNT};
use metrics::{counter, gauge, histogram};

/// Record metrics for one produced fusion output
///
/// Call once per `FusionOutput`.
///
/// # Example
///
/// ```ignore
/// use observability::record_fusion_metrics;
///
/// if let Some(output) = fusion_engine.push(packet) {
///     record_fusion_metrics(&output.meta, output.frame.seq);
///     // ...
/// }
/// ```
pub fn record_fusion_metrics(meta: &FusionMeta, seq: u64) {
    // Frame counter
    counter!("contact_estimator_fusion_frames_total").increment(1);

    // Frame sequence (for detecting gaps)
    gauge!("contact_estimator_last_frame_seq").set(seq as f64);

    // Window fill level
    gauge!("contact_estimator_window_fill").set(meta.window_fill as f64);

    // Input queue depths
    gauge!("contact_estimator_queue_depth", "channel" => "leg").set(meta.leg_depth as f64);
    gauge!("contact_estimator_queue_depth", "channel" => "imu").set(meta.imu_depth as f64);
    histogram!("contact_estimator_queue_depth_hist", "channel" => "leg")
        .record(meta.leg_depth as f64);
    histogram!("contact_estimator_queue_depth_hist", "channel" => "imu")
        .record(meta.imu_depth as f64);

    // Overflow drops
    gauge!("contact_estimator_samples_dropped", "channel" => "leg").set(meta.leg_dropped as f64);
    gauge!("contact_estimator_samples_dropped", "channel" => "imu").set(meta.imu_dropped as f64);
}

/// Record metrics for one classified report
pub fn record_contact_report(report: &ContactReport) {
    counter!(
        "contact_estimator_reports_total",
        "class" => report.class_index.to_string()
    )
    .increment(1);

    gauge!("contact_estimator_legs_in_contact").set(report.contacts.contact_count() as f64);

    for (leg, in_contact) in report.contacts.legs.iter().enumerate() {
        gauge!(
            "contact_estimator_leg_contact",
            "leg" => leg.to_string()
        )
        .set(*in_contact as u8 as f64);
    }
}

/// Record one received sample
pub fn record_sample_received(channel: &str) {
    counter!(
        "contact_estimator_samples_received_total",
        "channel" => channel.to_string()
    )
    .increment(1);
}

/// Record a published report
pub fn record_report_published(sink_name: &str, success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "contact_estimator_reports_published_total",
        "sink" => sink_name.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Contact metrics aggregator
///
/// Aggregates metrics in memory for summary output.
#[derive(Debug, Clone, Default)]
pub struct ContactMetricsAggregator {
    /// Total frames produced by fusion
    pub total_frames: u64,

    /// Total reports classified
    pub total_reports: u64,

    /// Reports per class index
    pub class_counts: [u64; CONTACT_CLASSES],

    /// Frames where each leg was in contact
    pub leg_contact_counts: [u64; LEG_COUNT],

    /// Total input-queue overflow drops (leg, imu), last observed
    pub leg_dropped: u64,
    pub imu_dropped: u64,

    /// Leg queue depth statistics
    pub leg_depth_stats: RunningStats,

    /// Imu queue depth statistics
    pub imu_depth_stats: RunningStats,

    /// Legs-in-contact statistics
    pub contact_count_stats: RunningStats,
}

impl ContactMetricsAggregator {
    /// Create a new aggregator
    pub fn new() -> Self {
        Self::default()
    }

    /// Update with one fusion output's diagnostics
    pub fn update_fusion(&mut self, meta: &FusionMeta) {
        self.total_frames += 1;
        self.leg_dropped = meta.leg_dropped;
        self.imu_dropped = meta.imu_dropped;
        self.leg_depth_stats.push(meta.leg_depth as f64);
        self.imu_depth_stats.push(meta.imu_depth as f64);
    }

    /// Update with one classified report
    pub fn update_report(&mut self, report: &ContactReport) {
        self.total_reports += 1;
        self.class_counts[report.class_index as usize] += 1;
        for (leg, in_contact) in report.contacts.legs.iter().enumerate() {
            if *in_contact {
                self.leg_contact_counts[leg] += 1;
            }
        }
        self.contact_count_stats
            .push(report.contacts.contact_count() as f64);
    }

    /// Generate a summary report
    pub fn summary(&self) -> MetricsSummary {
        let dominant_class = self
            .class_counts
            .iter()
            .enumerate()
            .max_by_key(|(_, count)| **count)
            .map(|(class, _)| class as u8)
            .unwrap_or(0);

        MetricsSummary {
            total_frames: self.total_frames,
            total_reports: self.total_reports,
            dominant_class,
            leg_contact_counts: self.leg_contact_counts,
            samples_dropped: self.leg_dropped + self.imu_dropped,
            leg_queue_depth: StatsSummary::from(&self.leg_depth_stats),
            imu_queue_depth: StatsSummary::from(&self.imu_depth_stats),
            legs_in_contact: StatsSummary::from(&self.contact_count_stats),
        }
    }

    /// Reset statistics
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Metrics summary
#[derive(Debug, Clone, Default)]
pub struct MetricsSummary {
    pub total_frames: u64,
    pub total_reports: u64,
    pub dominant_class: u8,
    pub leg_contact_counts: [u64; LEG_COUNT],
    pub samples_dropped: u64,
    pub leg_queue_depth: StatsSummary,
    pub imu_queue_depth: StatsSummary,
    pub legs_in_contact: StatsSummary,
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Contact Metrics Summary ===")?;
        writeln!(f, "Fusion frames: {}", self.total_frames)?;
        writeln!(f, "Classified reports: {}", self.total_reports)?;
        writeln!(f, "Dominant class: {:#06b}", self.dominant_class)?;
        writeln!(f, "Samples dropped at input queues: {}", self.samples_dropped)?;
        writeln!(f, "Legs in contact: {}", self.legs_in_contact)?;
        writeln!(f, "Leg queue depth: {}", self.leg_queue_depth)?;
        writeln!(f, "Imu queue depth: {}", self.imu_queue_depth)?;

        if self.total_reports > 0 {
            writeln!(f, "Per-leg contact ratio:")?;
            for (leg, count) in self.leg_contact_counts.iter().enumerate() {
                writeln!(
                    f,
                    "  leg{}: {:.1}%",
                    leg,
                    *count as f64 / self.total_reports as f64 * 100.0
                )?;
            }
        }

        Ok(())
    }
}

/// Statistics summary
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count(),
            min: stats.min(),
            max: stats.max(),
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics calculator (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// Add a new value
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    /// Sample count
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Mean
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// Standard deviation
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Minimum
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Maximum
    pub fn max(&self) -> f64 {
        self.max
    }
}
