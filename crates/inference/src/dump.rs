//! Debug-only first-frame dump.
//!
//! Writes the first normalized window as a flat blob of H * W
//! little-endian 4-byte floats for offline verification against the
//! training pipeline. Strictly a side channel: failures are logged and
//! never affect pipeline correctness.

use std::path::PathBuf;

use contracts::NormalizedFrame;
use tracing::{info, warn};

/// One-shot frame dump
pub struct FrameDump {
    path: PathBuf,
    written: bool,
}

impl FrameDump {
    /// Create a dump targeting `path`
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            written: false,
        }
    }

    /// Write the frame if nothing has been written yet
    pub fn record(&mut self, frame: &NormalizedFrame) {
        if self.written {
            return;
        }
        self.written = true;

        match std::fs::write(&self.path, frame.to_le_bytes()) {
            Ok(()) => {
                info!(
                    path = %self.path.display(),
                    seq = frame.seq,
                    "first normalized frame dumped"
                );
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "frame dump failed; continuing without it"
                );
            }
        }
    }

    /// Whether the one-shot write already happened
    pub fn written(&self) -> bool {
        self.written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{FEATURE_WIDTH, WINDOW_HEIGHT};

    fn frame(seq: u64, fill: f32) -> NormalizedFrame {
        NormalizedFrame::new(seq, vec![fill; WINDOW_HEIGHT * FEATURE_WIDTH])
    }

    #[test]
    fn test_writes_first_frame_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("first_frame.bin");
        let mut dump = FrameDump::new(path.clone());

        dump.record(&frame(1, 1.5));
        dump.record(&frame(2, 9.9));
        assert!(dump.written());

        let blob = std::fs::read(&path).unwrap();
        assert_eq!(blob.len(), WINDOW_HEIGHT * FEATURE_WIDTH * 4);
        // Still the first frame's contents
        assert_eq!(&blob[0..4], &1.5f32.to_le_bytes());
    }

    #[test]
    fn test_write_failure_is_non_fatal() {
        let mut dump = FrameDump::new(PathBuf::from("/nonexistent-dir/frame.bin"));
        dump.record(&frame(1, 0.0));
        assert!(dump.written());
    }
}
