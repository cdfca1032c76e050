//! Incremental per-column window normalization.
//!
//! Maintains running per-column sums over the current window so that,
//! after the one-time full pass, each new row costs O(W) for statistics
//! instead of O(H*W). The z-scored output is always a fresh full pass over
//! current window contents; only the statistics are incremental.

use contracts::{FeatureRow, FEATURE_WIDTH, WINDOW_HEIGHT};
use tracing::instrument;

use crate::window::WindowBuffer;

/// Per-column running statistics and z-scoring
///
/// Standard deviation is the sample (Bessel-corrected) deviation,
/// `sqrt(sum((x - mean)^2) / (H - 1))`. A column that is constant across
/// the whole window has std = 0 and its z-scores come out non-finite; that
/// propagates into the frame by contract instead of being clamped.
#[derive(Debug)]
pub struct Normalizer {
    /// Per-column sum over the current window
    sum: [f64; FEATURE_WIDTH],

    /// Per-column sum of squares over the current window
    sum_sq: [f64; FEATURE_WIDTH],

    /// Per-column mean
    mean: [f64; FEATURE_WIDTH],

    /// Per-column sample standard deviation
    std: [f64; FEATURE_WIDTH],

    /// The row most recently removed from (or about to leave) the front
    /// of the window; the `old` term of the next sliding update
    evicted_row: [f32; FEATURE_WIDTH],
}

impl Normalizer {
    /// Create a normalizer with zeroed statistics
    pub fn new() -> Self {
        Self {
            sum: [0.0; FEATURE_WIDTH],
            sum_sq: [0.0; FEATURE_WIDTH],
            mean: [0.0; FEATURE_WIDTH],
            std: [0.0; FEATURE_WIDTH],
            evicted_row: [0.0; FEATURE_WIDTH],
        }
    }

    /// Full O(H*W) statistics pass; runs exactly once, on the append that
    /// fills the window
    ///
    /// Resets the accumulators from scratch, so calling it again on an
    /// unmodified window reproduces identical output.
    #[instrument(name = "normalizer_seed", level = "debug", skip_all)]
    pub fn seed(&mut self, window: &WindowBuffer) -> Vec<f32> {
        debug_assert_eq!(window.len(), WINDOW_HEIGHT);
        let h = WINDOW_HEIGHT as f64;

        for j in 0..FEATURE_WIDTH {
            let mut sum = 0.0f64;
            let mut sum_sq = 0.0f64;
            for i in 0..WINDOW_HEIGHT {
                let x = window.row(i)[j] as f64;
                sum += x;
                sum_sq += x * x;
            }
            self.sum[j] = sum;
            self.sum_sq[j] = sum_sq;
            self.mean[j] = sum / h;

            let mut deviation_sq = 0.0f64;
            for i in 0..WINDOW_HEIGHT {
                let d = window.row(i)[j] as f64 - self.mean[j];
                deviation_sq += d * d;
            }
            self.std[j] = (deviation_sq / (h - 1.0)).sqrt();
        }

        let normalized = self.normalize(window);
        self.record_next_eviction(window);
        normalized
    }

    /// O(W) sliding statistics update for one steady-state append
    ///
    /// Must be called after the window has already evicted its oldest row
    /// and appended `new_row`. `old` is the row recorded on the previous
    /// pass; the sum of squared deviations is recovered algebraically as
    /// `sum_sq - 2*mean*sum + H*mean^2`.
    #[instrument(name = "normalizer_slide", level = "trace", skip_all)]
    pub fn slide(&mut self, window: &WindowBuffer, new_row: &FeatureRow) -> Vec<f32> {
        debug_assert_eq!(window.len(), WINDOW_HEIGHT);
        let h = WINDOW_HEIGHT as f64;

        for j in 0..FEATURE_WIDTH {
            let old = self.evicted_row[j] as f64;
            let new = new_row[j] as f64;

            self.sum[j] = self.sum[j] - old + new;
            self.sum_sq[j] = self.sum_sq[j] - old * old + new * new;
            self.mean[j] = self.sum[j] / h;

            let deviation_sq =
                self.sum_sq[j] - 2.0 * self.mean[j] * self.sum[j] + h * self.mean[j] * self.mean[j];
            self.std[j] = (deviation_sq / (h - 1.0)).sqrt();
        }

        let normalized = self.normalize(window);
        self.record_next_eviction(window);
        normalized
    }

    /// Z-score every value of the current window, row-major
    fn normalize(&self, window: &WindowBuffer) -> Vec<f32> {
        let mut out = vec![0.0f32; WINDOW_HEIGHT * FEATURE_WIDTH];
        for (i, row) in window.rows().enumerate() {
            for j in 0..FEATURE_WIDTH {
                out[i * FEATURE_WIDTH + j] =
                    ((row[j] as f64 - self.mean[j]) / self.std[j]) as f32;
            }
        }
        out
    }

    /// Remember the current oldest row; it is the one evicted on the next
    /// append
    fn record_next_eviction(&mut self, window: &WindowBuffer) {
        self.evicted_row
            .copy_from_slice(window.row(0).as_slice());
    }

    /// Per-column means over the current window
    pub fn mean(&self) -> &[f64; FEATURE_WIDTH] {
        &self.mean
    }

    /// Per-column sample standard deviations over the current window
    pub fn std(&self) -> &[f64; FEATURE_WIDTH] {
        &self.std
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}
