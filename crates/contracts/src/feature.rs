//! FeatureRow - fused sample of both channels
//!
//! One row of the classifier input matrix, built from exactly one
//! (LegSample, ImuSample) pair. The column layout is fixed and must match
//! the layout the contact classifier was trained on.

use std::ops::{Index, Range};

use serde::de::{SeqAccess, Visitor};
use serde::ser::SerializeTuple;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{ImuSample, LegSample, FEATURE_WIDTH, IMU_AXES, LEG_DOF};

/// Columns holding joint positions
pub const COLS_POSITION: Range<usize> = 0..LEG_DOF;
/// Columns holding joint velocities
pub const COLS_VELOCITY: Range<usize> = LEG_DOF..2 * LEG_DOF;
/// Columns holding linear acceleration
pub const COLS_ACCELERATION: Range<usize> = 2 * LEG_DOF..2 * LEG_DOF + IMU_AXES;
/// Columns holding angular rate
pub const COLS_ANGULAR_RATE: Range<usize> = 2 * LEG_DOF + IMU_AXES..2 * LEG_DOF + 2 * IMU_AXES;
/// Columns holding foot positions
pub const COLS_FOOT_POSITION: Range<usize> =
    2 * LEG_DOF + 2 * IMU_AXES..3 * LEG_DOF + 2 * IMU_AXES;
/// Columns holding foot velocities
pub const COLS_FOOT_VELOCITY: Range<usize> =
    3 * LEG_DOF + 2 * IMU_AXES..4 * LEG_DOF + 2 * IMU_AXES;

/// One fused feature row (W=54 values)
///
/// Column order: position, velocity, acceleration, angular rate,
/// foot position, foot velocity. Immutable after creation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureRow([f32; FEATURE_WIDTH]);

impl FeatureRow {
    /// Build a row from one matched pair, in the fixed column order
    pub fn from_parts(leg: &LegSample, imu: &ImuSample) -> Self {
        let mut values = [0.0f32; FEATURE_WIDTH];
        values[COLS_POSITION].copy_from_slice(&leg.position);
        values[COLS_VELOCITY].copy_from_slice(&leg.velocity);
        values[COLS_ACCELERATION].copy_from_slice(&imu.acceleration);
        values[COLS_ANGULAR_RATE].copy_from_slice(&imu.angular_rate);
        values[COLS_FOOT_POSITION].copy_from_slice(&leg.foot_position);
        values[COLS_FOOT_VELOCITY].copy_from_slice(&leg.foot_velocity);
        Self(values)
    }

    /// Row backed by raw values (tests, replay)
    pub fn from_values(values: [f32; FEATURE_WIDTH]) -> Self {
        Self(values)
    }

    /// All values in column order
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Foot-position columns (12 values, auditing)
    pub fn foot_position(&self) -> &[f32] {
        &self.0[COLS_FOOT_POSITION]
    }

    /// Foot-velocity columns (12 values)
    pub fn foot_velocity(&self) -> &[f32] {
        &self.0[COLS_FOOT_VELOCITY]
    }
}

impl Default for FeatureRow {
    fn default() -> Self {
        Self([0.0; FEATURE_WIDTH])
    }
}

impl Index<usize> for FeatureRow {
    type Output = f32;

    #[inline]
    fn index(&self, column: usize) -> &f32 {
        &self.0[column]
    }
}

// serde does not derive for arrays wider than 32; serialize as a fixed
// tuple so the wire shape stays `[f32; 54]`.
impl Serialize for FeatureRow {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut tup = serializer.serialize_tuple(FEATURE_WIDTH)?;
        for value in &self.0 {
            tup.serialize_element(value)?;
        }
        tup.end()
    }
}

impl<'de> Deserialize<'de> for FeatureRow {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RowVisitor;

        impl<'de> Visitor<'de> for RowVisitor {
            type Value = FeatureRow;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "a sequence of {FEATURE_WIDTH} floats")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<FeatureRow, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut values = [0.0f32; FEATURE_WIDTH];
                for (i, slot) in values.iter_mut().enumerate() {
                    *slot = seq
                        .next_element()?
                        .ok_or_else(|| serde::de::Error::invalid_length(i, &self))?;
                }
                Ok(FeatureRow(values))
            }
        }

        deserializer.deserialize_tuple(FEATURE_WIDTH, RowVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leg_sample() -> LegSample {
        LegSample {
            position: [1.0; LEG_DOF],
            velocity: [2.0; LEG_DOF],
            foot_position: [5.0; LEG_DOF],
            foot_velocity: [6.0; LEG_DOF],
        }
    }

    fn imu_sample() -> ImuSample {
        ImuSample {
            acceleration: [3.0; IMU_AXES],
            angular_rate: [4.0; IMU_AXES],
        }
    }

    #[test]
    fn test_column_order() {
        let row = FeatureRow::from_parts(&leg_sample(), &imu_sample());

        assert_eq!(row[0], 1.0); // position
        assert_eq!(row[12], 2.0); // velocity
        assert_eq!(row[24], 3.0); // acceleration
        assert_eq!(row[27], 4.0); // angular rate
        assert_eq!(row[30], 5.0); // foot position
        assert_eq!(row[42], 6.0); // foot velocity
        assert_eq!(row[53], 6.0);
    }

    #[test]
    fn test_ranges_cover_row_exactly() {
        assert_eq!(COLS_POSITION.start, 0);
        assert_eq!(COLS_POSITION.end, COLS_VELOCITY.start);
        assert_eq!(COLS_VELOCITY.end, COLS_ACCELERATION.start);
        assert_eq!(COLS_ACCELERATION.end, COLS_ANGULAR_RATE.start);
        assert_eq!(COLS_ANGULAR_RATE.end, COLS_FOOT_POSITION.start);
        assert_eq!(COLS_FOOT_POSITION.end, COLS_FOOT_VELOCITY.start);
        assert_eq!(COLS_FOOT_VELOCITY.end, FEATURE_WIDTH);
    }

    #[test]
    fn test_serde_round_trip() {
        let row = FeatureRow::from_parts(&leg_sample(), &imu_sample());
        let json = serde_json::to_string(&row).unwrap();
        let back: FeatureRow = serde_json::from_str(&json).unwrap();
        assert_eq!(row, back);
    }
}
