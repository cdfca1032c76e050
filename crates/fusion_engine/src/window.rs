//! Fixed-height sliding window over fused feature rows.

use std::collections::VecDeque;

use contracts::{FeatureRow, WINDOW_HEIGHT};

/// Window lifecycle state
///
/// `Filling` -> `Steady` happens exactly once per pipeline session, on the
/// append that brings the window to full height. There is no transition
/// back: once steady, every append evicts the oldest row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    /// Still collecting the first H rows
    Filling,
    /// Full; every append is paired with an eviction
    Steady,
}

/// What a single append did
#[derive(Debug, Clone, PartialEq)]
pub enum AppendOutcome {
    /// Appended; window still below full height
    Filling,
    /// This append brought the window to exactly H rows
    BecameFull,
    /// Window was already full; the oldest row was evicted
    Slid(FeatureRow),
}

/// FIFO window of the most recent H feature rows
///
/// Rows are never mutated in place; they are replaced wholesale on
/// eviction.
#[derive(Debug)]
pub struct WindowBuffer {
    rows: VecDeque<FeatureRow>,
    state: WindowState,
}

impl WindowBuffer {
    /// Create an empty window
    pub fn new() -> Self {
        Self {
            rows: VecDeque::with_capacity(WINDOW_HEIGHT),
            state: WindowState::Filling,
        }
    }

    /// Append a row, evicting the oldest once at full height
    pub fn append(&mut self, row: FeatureRow) -> AppendOutcome {
        match self.state {
            WindowState::Filling => {
                self.rows.push_back(row);
                if self.rows.len() == WINDOW_HEIGHT {
                    self.state = WindowState::Steady;
                    AppendOutcome::BecameFull
                } else {
                    AppendOutcome::Filling
                }
            }
            WindowState::Steady => {
                let evicted = self
                    .rows
                    .pop_front()
                    .expect("steady window cannot be empty");
                self.rows.push_back(row);
                AppendOutcome::Slid(evicted)
            }
        }
    }

    /// Current row count (<= H always; == H once steady)
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the window holds no rows yet
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Current lifecycle state
    pub fn state(&self) -> WindowState {
        self.state
    }

    /// Row by index, 0 = oldest
    pub fn row(&self, i: usize) -> &FeatureRow {
        &self.rows[i]
    }

    /// All rows, oldest first (full recomputation path)
    pub fn rows(&self) -> impl Iterator<Item = &FeatureRow> {
        self.rows.iter()
    }
}

impl Default for WindowBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::FEATURE_WIDTH;

    fn row(tag: f32) -> FeatureRow {
        let mut values = [0.0f32; FEATURE_WIDTH];
        values[0] = tag;
        FeatureRow::from_values(values)
    }

    #[test]
    fn test_fill_then_steady() {
        let mut window = WindowBuffer::new();

        for i in 0..WINDOW_HEIGHT - 1 {
            assert_eq!(window.append(row(i as f32)), AppendOutcome::Filling);
            assert_eq!(window.state(), WindowState::Filling);
        }

        assert_eq!(
            window.append(row((WINDOW_HEIGHT - 1) as f32)),
            AppendOutcome::BecameFull
        );
        assert_eq!(window.state(), WindowState::Steady);
        assert_eq!(window.len(), WINDOW_HEIGHT);
    }

    #[test]
    fn test_steady_evicts_oldest() {
        let mut window = WindowBuffer::new();
        for i in 0..WINDOW_HEIGHT {
            window.append(row(i as f32));
        }

        match window.append(row(1000.0)) {
            AppendOutcome::Slid(evicted) => assert_eq!(evicted[0], 0.0),
            other => panic!("expected Slid, got {other:?}"),
        }
        assert_eq!(window.len(), WINDOW_HEIGHT);
        assert_eq!(window.row(0)[0], 1.0);
        assert_eq!(window.row(WINDOW_HEIGHT - 1)[0], 1000.0);
    }

    #[test]
    fn test_length_never_exceeds_height() {
        let mut window = WindowBuffer::new();
        let total = WINDOW_HEIGHT * 3;

        for i in 0..total {
            window.append(row(i as f32));
            assert!(window.len() <= WINDOW_HEIGHT);
            if i >= WINDOW_HEIGHT {
                assert_eq!(window.len(), WINDOW_HEIGHT);
                assert_eq!(window.state(), WindowState::Steady);
            }
        }
    }

    #[test]
    fn test_window_holds_last_h_rows_in_order() {
        let mut window = WindowBuffer::new();
        let total = WINDOW_HEIGHT + 40;

        for i in 0..total {
            window.append(row(i as f32));
        }

        let first = total - WINDOW_HEIGHT;
        for (offset, r) in window.rows().enumerate() {
            assert_eq!(r[0], (first + offset) as f32);
        }
    }
}
