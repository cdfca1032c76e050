//! Main fusion engine implementation.

use contracts::{
    EngineConfig, FusionMeta, FusionOutput, NormalizedFrame, SamplePacket, SamplePayload,
};
use tracing::{debug, instrument};

use crate::aligner::Aligner;
use crate::normalizer::Normalizer;
use crate::window::{AppendOutcome, WindowBuffer};

/// Streaming window-builder and normalizer
///
/// Exclusively owned by the fusion task; everything in here is single
/// threaded by construction, so no locking is needed around the window or
/// the running statistics.
pub struct FusionEngine {
    /// Positional pairing of the two channels
    aligner: Aligner,

    /// Sliding window of fused rows
    window: WindowBuffer,

    /// Per-column running statistics
    normalizer: Normalizer,

    /// Frames produced so far; also the next frame's sequence number base
    frame_counter: u64,
}

impl FusionEngine {
    /// Create a new fusion engine with the given queue configuration
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            aligner: Aligner::new(config.input_queue_capacity, config.drop_policy),
            window: WindowBuffer::new(),
            normalizer: Normalizer::new(),
            frame_counter: 0,
        }
    }

    /// Push a sample packet
    ///
    /// Returns `Some(FusionOutput)` when this packet completed a pair AND
    /// the window is at full height: one normalized frame per matched pair
    /// from then on. During the fill phase pairs accumulate silently.
    #[instrument(
        name = "fusion_engine_push",
        level = "trace",
        skip(self, packet),
        fields(channel = %packet.channel, timestamp = packet.timestamp)
    )]
    pub fn push(&mut self, packet: SamplePacket) -> Option<FusionOutput> {
        match packet.payload {
            SamplePayload::Leg(sample) => self.aligner.push_leg(packet.timestamp, sample),
            SamplePayload::Imu(sample) => self.aligner.push_imu(packet.timestamp, sample),
        }

        // At most one pair can complete per pushed sample.
        let (row, timestamp) = self.aligner.try_pair()?;
        metrics::counter!("fusion_rows_total").increment(1);

        let values = match self.window.append(row) {
            AppendOutcome::Filling => {
                metrics::gauge!("fusion_window_fill").set(self.window.len() as f64);
                return None;
            }
            AppendOutcome::BecameFull => {
                debug!("window filled, running one-time full statistics pass");
                self.normalizer.seed(&self.window)
            }
            AppendOutcome::Slid(_) => self.normalizer.slide(&self.window, &row),
        };

        self.frame_counter += 1;
        metrics::counter!("fusion_frames_total").increment(1);
        metrics::gauge!("fusion_window_fill").set(self.window.len() as f64);

        Some(FusionOutput {
            frame: NormalizedFrame::new(self.frame_counter, values),
            row,
            timestamp,
            meta: self.meta(),
        })
    }

    /// Current fusion diagnostics
    pub fn meta(&self) -> FusionMeta {
        let (leg_depth, imu_depth) = self.aligner.depths();
        let (leg_dropped, imu_dropped) = self.aligner.dropped();
        FusionMeta {
            window_fill: self.window.len(),
            leg_depth,
            imu_depth,
            leg_dropped,
            imu_dropped,
        }
    }

    /// Frames produced so far
    pub fn frame_count(&self) -> u64 {
        self.frame_counter
    }

    /// Pairs fused so far (including the fill phase)
    pub fn pairs_built(&self) -> u64 {
        self.aligner.pairs_built()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{
        ImuSample, LegSample, FEATURE_WIDTH, IMU_AXES, LEG_DOF, WINDOW_HEIGHT,
    };

    fn leg_packet(n: u64) -> SamplePacket {
        let fill = n as f32;
        SamplePacket::leg(
            n as f64 * 0.002,
            Some(n),
            LegSample {
                position: std::array::from_fn(|i| fill + i as f32 * 0.01),
                velocity: std::array::from_fn(|i| fill * 0.5 + i as f32 * 0.02),
                foot_position: [fill * 0.1; LEG_DOF],
                foot_velocity: [fill * 0.2; LEG_DOF],
            },
        )
    }

    fn imu_packet(n: u64) -> SamplePacket {
        let fill = n as f32;
        SamplePacket::imu(
            n as f64 * 0.002,
            Some(n),
            ImuSample {
                acceleration: [fill, fill + 0.1, 9.81 + fill * 0.01],
                angular_rate: [fill * 0.3; IMU_AXES],
            },
        )
    }

    #[test]
    fn test_no_output_while_one_queue_starved() {
        let mut engine = FusionEngine::new(&EngineConfig::default());

        // Two leg samples arrive before any inertial sample
        assert!(engine.push(leg_packet(1)).is_none());
        assert!(engine.push(leg_packet(2)).is_none());
        assert_eq!(engine.pairs_built(), 0);
        assert_eq!(engine.meta().leg_depth, 2);

        // First imu sample produces exactly one row from the oldest leg
        assert!(engine.push(imu_packet(1)).is_none()); // window still filling
        assert_eq!(engine.pairs_built(), 1);
        let meta = engine.meta();
        assert_eq!(meta.window_fill, 1);
        assert_eq!(meta.leg_depth, 1);
        assert_eq!(meta.imu_depth, 0);
    }

    #[test]
    fn test_first_frame_on_window_fill() {
        let mut engine = FusionEngine::new(&EngineConfig::default());

        for n in 1..WINDOW_HEIGHT as u64 {
            assert!(engine.push(leg_packet(n)).is_none());
            assert!(engine.push(imu_packet(n)).is_none());
        }

        // The 75th pair fills the window and yields the first frame
        let n = WINDOW_HEIGHT as u64;
        assert!(engine.push(leg_packet(n)).is_none());
        let output = engine.push(imu_packet(n)).expect("first frame");

        assert_eq!(output.frame.seq, 1);
        assert_eq!(output.frame.as_slice().len(), WINDOW_HEIGHT * FEATURE_WIDTH);
        assert_eq!(output.meta.window_fill, WINDOW_HEIGHT);
        assert_eq!(engine.frame_count(), 1);
    }

    #[test]
    fn test_one_frame_per_pair_when_steady() {
        let mut engine = FusionEngine::new(&EngineConfig::default());

        for n in 1..=WINDOW_HEIGHT as u64 {
            engine.push(leg_packet(n));
            engine.push(imu_packet(n));
        }
        assert_eq!(engine.frame_count(), 1);

        for n in 1..=10u64 {
            let m = WINDOW_HEIGHT as u64 + n;
            assert!(engine.push(leg_packet(m)).is_none());
            let output = engine.push(imu_packet(m)).expect("steady frame");
            assert_eq!(output.frame.seq, 1 + n);
            assert_eq!(output.timestamp, m as f64 * 0.002);
        }
        assert_eq!(engine.frame_count(), 11);
    }

    #[test]
    fn test_meta_tracks_queue_drops() {
        let config = EngineConfig {
            input_queue_capacity: 4,
            ..Default::default()
        };
        let mut engine = FusionEngine::new(&config);

        // Flood the leg queue without any imu samples
        for n in 1..=10u64 {
            engine.push(leg_packet(n));
        }

        let meta = engine.meta();
        assert_eq!(meta.leg_depth, 4);
        assert_eq!(meta.leg_dropped, 6);
        assert_eq!(meta.imu_dropped, 0);
    }
}
