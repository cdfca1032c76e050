//! SamplePacket - Ingestion output
//!
//! Raw sensor samples as delivered by the two input channels.

use serde::{Deserialize, Serialize};

use crate::{IMU_AXES, LEG_DOF};

/// Input channel identity
///
/// The pipeline consumes exactly two independent channels; everything
/// downstream is keyed on this enum rather than free-form ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Leg kinematics (joint + foot state)
    Leg,
    /// Inertial measurement unit
    Imu,
}

impl Channel {
    /// Stable name for logging/metrics labels
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Leg => "leg",
            Channel::Imu => "imu",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One leg-kinematics sample (48 values)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegSample {
    /// Joint positions (rad)
    pub position: [f32; LEG_DOF],

    /// Joint velocities (rad/s)
    pub velocity: [f32; LEG_DOF],

    /// Foot positions in body frame (m)
    pub foot_position: [f32; LEG_DOF],

    /// Foot velocities in body frame (m/s)
    pub foot_velocity: [f32; LEG_DOF],
}

/// One inertial sample (6 values)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImuSample {
    /// Linear acceleration (m/s^2)
    pub acceleration: [f32; IMU_AXES],

    /// Angular rate (rad/s)
    pub angular_rate: [f32; IMU_AXES],
}

/// Sample payload, one variant per channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SamplePayload {
    /// Leg kinematics tuple
    Leg(LegSample),

    /// Inertial tuple
    Imu(ImuSample),
}

impl SamplePayload {
    /// Channel this payload belongs to
    pub fn channel(&self) -> Channel {
        match self {
            SamplePayload::Leg(_) => Channel::Leg,
            SamplePayload::Imu(_) => Channel::Imu,
        }
    }
}

/// Timestamped sample envelope
///
/// Received from a `SampleSource` callback. The timestamp is diagnostic
/// only: pairing between the two channels is positional (Nth with Nth).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplePacket {
    /// Producer channel
    pub channel: Channel,

    /// Producer timestamp (seconds, f64)
    pub timestamp: f64,

    /// Optional producer sequence number (for ordering diagnostics)
    pub seq: Option<u64>,

    /// Sample values
    pub payload: SamplePayload,
}

impl SamplePacket {
    /// Wrap a leg sample into a packet
    pub fn leg(timestamp: f64, seq: Option<u64>, sample: LegSample) -> Self {
        Self {
            channel: Channel::Leg,
            timestamp,
            seq,
            payload: SamplePayload::Leg(sample),
        }
    }

    /// Wrap an inertial sample into a packet
    pub fn imu(timestamp: f64, seq: Option<u64>, sample: ImuSample) -> Self {
        Self {
            channel: Channel::Imu,
            timestamp,
            seq,
            payload: SamplePayload::Imu(sample),
        }
    }
}
