//! NormalizedFrame - fusion engine output
//!
//! The z-scored window handed to the classifier, plus the hand-off
//! envelope shared between the two pipeline tasks.

use bytes::{BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};

use crate::{FeatureRow, FEATURE_WIDTH, WINDOW_HEIGHT};

/// One z-scored H x W window, row-major
///
/// Transient: produced by the fusion engine, consumed once by the
/// classifier, then discarded. Values may be non-finite when a column had
/// zero variance across the window; that is defined behavior, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedFrame {
    /// Monotonically increasing frame sequence number
    pub seq: u64,

    /// H * W values, row-major
    values: Vec<f32>,
}

impl NormalizedFrame {
    /// Wrap a row-major buffer of exactly H * W values
    ///
    /// # Panics
    /// Panics when the buffer length does not match the fixed window shape;
    /// any other shape is a contract violation.
    pub fn new(seq: u64, values: Vec<f32>) -> Self {
        assert_eq!(
            values.len(),
            WINDOW_HEIGHT * FEATURE_WIDTH,
            "normalized frame must be exactly H x W"
        );
        Self { seq, values }
    }

    /// All values, row-major
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    /// One row of the window
    #[inline]
    pub fn row(&self, i: usize) -> &[f32] {
        &self.values[i * FEATURE_WIDTH..(i + 1) * FEATURE_WIDTH]
    }

    /// Single value at (row, column)
    #[inline]
    pub fn get(&self, row: usize, column: usize) -> f32 {
        self.values[row * FEATURE_WIDTH + column]
    }

    /// Flat little-endian byte image (H * W * 4 bytes)
    ///
    /// Layout matches the offline-verification blob format: row-major
    /// 4-byte floats.
    pub fn to_le_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.values.len() * 4);
        for value in &self.values {
            buf.put_f32_le(*value);
        }
        buf.freeze()
    }
}

/// Per-frame fusion diagnostics
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FusionMeta {
    /// Rows currently held by the window (== H once steady)
    pub window_fill: usize,

    /// Leg samples waiting to be paired
    pub leg_depth: usize,

    /// Inertial samples waiting to be paired
    pub imu_depth: usize,

    /// Leg samples dropped by the bounded input queue so far
    pub leg_dropped: u64,

    /// Inertial samples dropped by the bounded input queue so far
    pub imu_dropped: u64,
}

/// Hand-off between the fusion task and the inference task
///
/// Carries the normalized frame together with the raw row that completed
/// it, so downstream bookkeeping never has to re-pair two queues. Owned by
/// exactly one channel slot at a time; ownership transfers on receive.
#[derive(Debug, Clone)]
pub struct FusionOutput {
    /// Normalized window for the classifier
    pub frame: NormalizedFrame,

    /// Raw feature row that produced this frame (auditing)
    pub row: FeatureRow,

    /// Timestamp of the newest sample in the pair that completed the
    /// window (seconds, producer clock)
    pub timestamp: f64,

    /// Fusion diagnostics at production time
    pub meta: FusionMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_access() {
        let mut values = vec![0.0f32; WINDOW_HEIGHT * FEATURE_WIDTH];
        values[FEATURE_WIDTH] = 7.0; // row 1, column 0
        let frame = NormalizedFrame::new(3, values);

        assert_eq!(frame.seq, 3);
        assert_eq!(frame.row(1)[0], 7.0);
        assert_eq!(frame.get(1, 0), 7.0);
        assert_eq!(frame.get(0, 0), 0.0);
    }

    #[test]
    fn test_le_bytes_layout() {
        let mut values = vec![0.0f32; WINDOW_HEIGHT * FEATURE_WIDTH];
        values[0] = 1.5;
        let frame = NormalizedFrame::new(0, values);

        let bytes = frame.to_le_bytes();
        assert_eq!(bytes.len(), WINDOW_HEIGHT * FEATURE_WIDTH * 4);
        assert_eq!(&bytes[0..4], &1.5f32.to_le_bytes());
    }

    #[test]
    #[should_panic(expected = "exactly H x W")]
    fn test_wrong_shape_rejected() {
        let _ = NormalizedFrame::new(0, vec![0.0; 10]);
    }
}
