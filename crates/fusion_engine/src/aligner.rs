//! Stream aligner - positional pairing of the two input channels.

use contracts::{DropPolicy, FeatureRow, ImuSample, LegSample};
use tracing::instrument;

use crate::buffer::SampleQueue;

/// Pairs the two sample streams into feature rows
///
/// The Nth leg sample is always paired with the Nth inertial sample; there
/// is no timestamp matching. A rate mismatch between the channels therefore
/// drifts row position against true sample time silently. This mirrors the
/// reference behavior and is a documented limitation, not a bug: the
/// sample timestamps are carried through for diagnostics only.
pub struct Aligner {
    leg: SampleQueue<(f64, LegSample)>,
    imu: SampleQueue<(f64, ImuSample)>,
    pairs_built: u64,
}

impl Aligner {
    /// Create an aligner with the given per-channel queue capacity
    pub fn new(queue_capacity: usize, drop_policy: DropPolicy) -> Self {
        Self {
            leg: SampleQueue::new(queue_capacity, drop_policy),
            imu: SampleQueue::new(queue_capacity, drop_policy),
            pairs_built: 0,
        }
    }

    /// Buffer one leg sample
    pub fn push_leg(&mut self, timestamp: f64, sample: LegSample) {
        self.leg.push((timestamp, sample));
    }

    /// Buffer one inertial sample
    pub fn push_imu(&mut self, timestamp: f64, sample: ImuSample) {
        self.imu.push((timestamp, sample));
    }

    /// Consume the head of both queues when both are non-empty
    ///
    /// Produces exactly one feature row per matched pair, in the fixed
    /// column order, together with the newer of the two sample timestamps.
    /// When either queue is empty this is a no-op; the caller simply waits
    /// for more input.
    #[instrument(name = "aligner_try_pair", level = "trace", skip(self))]
    pub fn try_pair(&mut self) -> Option<(FeatureRow, f64)> {
        if self.leg.is_empty() || self.imu.is_empty() {
            return None;
        }

        // Both heads exist; draining them together keeps the pair atomic.
        let (leg_ts, leg) = self.leg.pop_front()?;
        let (imu_ts, imu) = self.imu.pop_front()?;

        self.pairs_built += 1;
        Some((FeatureRow::from_parts(&leg, &imu), leg_ts.max(imu_ts)))
    }

    /// Pairs produced so far
    pub fn pairs_built(&self) -> u64 {
        self.pairs_built
    }

    /// Samples waiting in each queue (leg, imu)
    pub fn depths(&self) -> (usize, usize) {
        (self.leg.len(), self.imu.len())
    }

    /// Samples lost to overflow in each queue (leg, imu)
    pub fn dropped(&self) -> (u64, u64) {
        (self.leg.dropped_count(), self.imu.dropped_count())
    }
}
