//! Mock sample sources
//!
//! Deterministic synthetic gait/IMU signals for tests and self-contained
//! runs without a transport.

use std::f64::consts::TAU;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use contracts::{
    Channel, ImuSample, LegSample, SampleCallback, SamplePacket, SampleSource, IMU_AXES, LEG_DOF,
};
use tracing::{debug, trace};

/// Mock signal configuration
#[derive(Debug, Clone)]
pub struct MockSignalConfig {
    /// Delivery rate (Hz)
    pub frequency_hz: f64,

    /// Simulated gait cycle rate (Hz)
    pub gait_hz: f64,

    /// Joint swing amplitude (rad)
    pub amplitude: f64,
}

impl Default for MockSignalConfig {
    fn default() -> Self {
        Self {
            frequency_hz: 500.0,
            gait_hz: 2.0,
            amplitude: 0.3,
        }
    }
}

/// Mock sample source
///
/// Generates a smooth trotting-gait waveform: every column of the fused
/// feature row varies over time, so normalization statistics stay finite.
pub struct MockSampleSource {
    channel: Channel,
    config: MockSignalConfig,
    running: Arc<AtomicBool>,
}

impl MockSampleSource {
    /// Create a mock source for the given channel
    pub fn new(channel: Channel, config: MockSignalConfig) -> Self {
        Self {
            channel,
            config,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Mock leg-kinematics source
    pub fn leg(frequency_hz: f64) -> Self {
        Self::new(
            Channel::Leg,
            MockSignalConfig {
                frequency_hz,
                ..Default::default()
            },
        )
    }

    /// Mock inertial source
    pub fn imu(frequency_hz: f64) -> Self {
        Self::new(
            Channel::Imu,
            MockSignalConfig {
                frequency_hz,
                ..Default::default()
            },
        )
    }

    /// Synthetic leg sample at time `t` (seconds)
    pub fn leg_sample(config: &MockSignalConfig, t: f64) -> LegSample {
        let phase = TAU * config.gait_hz * t;
        let omega = TAU * config.gait_hz;
        let amp = config.amplitude;

        let mut sample = LegSample {
            position: [0.0; LEG_DOF],
            velocity: [0.0; LEG_DOF],
            foot_position: [0.0; LEG_DOF],
            foot_velocity: [0.0; LEG_DOF],
        };

        for i in 0..LEG_DOF {
            // Diagonal leg pairs move in anti-phase, joints lag each other
            let leg_phase = phase + (i % 4) as f64 * std::f64::consts::PI / 2.0 + i as f64 * 0.1;
            sample.position[i] = (amp * leg_phase.sin()) as f32;
            sample.velocity[i] = (amp * omega * leg_phase.cos()) as f32;
            sample.foot_position[i] = (0.05 * (leg_phase + 0.3).sin() - 0.25) as f32;
            sample.foot_velocity[i] = (0.05 * omega * (leg_phase + 0.3).cos()) as f32;
        }

        sample
    }

    /// Synthetic inertial sample at time `t` (seconds)
    pub fn imu_sample(config: &MockSignalConfig, t: f64) -> ImuSample {
        let phase = TAU * config.gait_hz * t;

        let mut sample = ImuSample {
            acceleration: [0.0; IMU_AXES],
            angular_rate: [0.0; IMU_AXES],
        };

        sample.acceleration[0] = (0.4 * phase.sin()) as f32;
        sample.acceleration[1] = (0.3 * (phase + 0.7).cos()) as f32;
        sample.acceleration[2] = (9.81 + 0.8 * (2.0 * phase).sin()) as f32;
        sample.angular_rate[0] = (0.1 * (phase + 1.1).sin()) as f32;
        sample.angular_rate[1] = (0.15 * phase.cos()) as f32;
        sample.angular_rate[2] = (0.05 * (phase + 2.3).sin()) as f32;

        sample
    }
}

impl SampleSource for MockSampleSource {
    fn channel(&self) -> Channel {
        self.channel
    }

    fn listen(&self, callback: SampleCallback) {
        if self.running.swap(true, Ordering::SeqCst) {
            return;
        }

        let channel = self.channel;
        let config = self.config.clone();
        let running = self.running.clone();

        debug!(
            channel = %channel,
            frequency_hz = config.frequency_hz,
            "mock sample source started"
        );

        std::thread::spawn(move || {
            let interval = Duration::from_secs_f64(1.0 / config.frequency_hz);
            let mut seq = 0u64;

            while running.load(Ordering::Relaxed) {
                seq += 1;
                let t = seq as f64 / config.frequency_hz;

                let packet = match channel {
                    Channel::Leg => {
                        SamplePacket::leg(t, Some(seq), Self::leg_sample(&config, t))
                    }
                    Channel::Imu => {
                        SamplePacket::imu(t, Some(seq), Self::imu_sample(&config, t))
                    }
                };

                callback(packet);
                trace!(channel = %channel, seq, "mock sample emitted");

                std::thread::sleep(interval);
            }

            debug!(channel = %channel, "mock sample source stopped");
        });
    }

    fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    fn is_listening(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_leg_signal_varies_per_column() {
        let config = MockSignalConfig::default();
        let a = MockSampleSource::leg_sample(&config, 0.010);
        let b = MockSampleSource::leg_sample(&config, 0.020);

        for i in 0..LEG_DOF {
            assert_ne!(a.position[i], b.position[i], "column {i} is constant");
            assert_ne!(a.velocity[i], b.velocity[i]);
            assert_ne!(a.foot_velocity[i], b.foot_velocity[i]);
        }
    }

    #[test]
    fn test_imu_signal_near_gravity() {
        let config = MockSignalConfig::default();
        let sample = MockSampleSource::imu_sample(&config, 0.1);
        assert!((sample.acceleration[2] - 9.81).abs() < 1.0);
    }

    #[test]
    fn test_mock_source_delivers() {
        let source = MockSampleSource::imu(1000.0);
        let received: Arc<Mutex<Vec<SamplePacket>>> = Arc::new(Mutex::new(Vec::new()));

        let sink = received.clone();
        source.listen(Arc::new(move |packet| {
            sink.lock().unwrap().push(packet);
        }));
        assert!(source.is_listening());

        std::thread::sleep(Duration::from_millis(50));
        source.stop();

        let packets = received.lock().unwrap();
        assert!(!packets.is_empty());
        assert_eq!(packets[0].channel, Channel::Imu);
        assert_eq!(packets[0].seq, Some(1));
    }
}
