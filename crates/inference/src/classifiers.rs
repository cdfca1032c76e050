//! Shipped classifier implementations.
//!
//! The production engine lives behind `ContactClassifier` and is provided
//! by the deployment; these implementations cover tests and self-contained
//! runs.

use contracts::{
    ClassifierConfig, ClassifierKind, ContactClassifier, ContractError, NormalizedFrame,
    CONTACT_CLASSES, COLS_FOOT_VELOCITY, LEG_COUNT, WINDOW_HEIGHT,
};
use tracing::debug;

/// Build a classifier from blueprint configuration
pub fn build_classifier(
    config: &ClassifierConfig,
) -> Result<Box<dyn ContactClassifier>, ContractError> {
    match config.kind {
        ClassifierKind::Mock => {
            let class = match config.params.get("class") {
                Some(raw) => raw.parse::<u8>().map_err(|e| {
                    ContractError::engine_init(format!("invalid mock class '{raw}': {e}"))
                })?,
                None => 0b1111,
            };
            Ok(Box::new(MockClassifier::new(class)?))
        }
        ClassifierKind::Threshold => {
            let threshold = match config.params.get("threshold") {
                Some(raw) => raw.parse::<f32>().map_err(|e| {
                    ContractError::engine_init(format!("invalid threshold '{raw}': {e}"))
                })?,
                None => 0.5,
            };
            Ok(Box::new(ThresholdClassifier::new(threshold)))
        }
    }
}

/// Fixed-class classifier for tests and dry runs
pub struct MockClassifier {
    class: u8,
    calls: u64,
}

impl MockClassifier {
    /// Create a mock that always returns `class`
    pub fn new(class: u8) -> Result<Self, ContractError> {
        if class as usize >= CONTACT_CLASSES {
            return Err(ContractError::engine_init(format!(
                "mock class {class} out of range"
            )));
        }
        Ok(Self { class, calls: 0 })
    }

    /// Frames classified so far
    pub fn calls(&self) -> u64 {
        self.calls
    }
}

impl ContactClassifier for MockClassifier {
    fn name(&self) -> &str {
        "mock"
    }

    fn infer(&mut self, _frame: &NormalizedFrame) -> Result<u8, ContractError> {
        self.calls += 1;
        Ok(self.class)
    }
}

/// Stand-in heuristic classifier
///
/// Flags a leg as in contact when the z-scored magnitude of its foot
/// velocity in the newest window row stays below the threshold, i.e. the
/// foot is slow relative to the window's own statistics. Non-finite
/// z-scores (zero-variance columns) leave the flag clear. This is NOT the
/// pretrained engine; it exists so the pipeline runs end to end without
/// one.
pub struct ThresholdClassifier {
    threshold: f32,
}

impl ThresholdClassifier {
    /// Create a threshold classifier
    pub fn new(threshold: f32) -> Self {
        debug!(threshold, "threshold classifier ready");
        Self { threshold }
    }
}

impl ContactClassifier for ThresholdClassifier {
    fn name(&self) -> &str {
        "threshold"
    }

    fn infer(&mut self, frame: &NormalizedFrame) -> Result<u8, ContractError> {
        let newest = frame.row(WINDOW_HEIGHT - 1);
        let axes = COLS_FOOT_VELOCITY.len() / LEG_COUNT;

        let mut class = 0u8;
        for leg in 0..LEG_COUNT {
            let start = COLS_FOOT_VELOCITY.start + leg * axes;
            let magnitude_sq: f32 = newest[start..start + axes]
                .iter()
                .map(|z| z * z)
                .sum();

            // NaN comparisons are false, so zero-variance columns never
            // assert contact.
            if magnitude_sq.sqrt() < self.threshold {
                class |= 1 << (LEG_COUNT - 1 - leg);
            }
        }

        Ok(class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{FEATURE_WIDTH, WINDOW_HEIGHT};

    fn frame_with_newest_row(newest: [f32; FEATURE_WIDTH]) -> NormalizedFrame {
        let mut values = vec![0.1f32; WINDOW_HEIGHT * FEATURE_WIDTH];
        values[(WINDOW_HEIGHT - 1) * FEATURE_WIDTH..].copy_from_slice(&newest);
        NormalizedFrame::new(1, values)
    }

    #[test]
    fn test_mock_returns_fixed_class() {
        let mut classifier = MockClassifier::new(0b1010).unwrap();
        let frame = frame_with_newest_row([0.0; FEATURE_WIDTH]);

        assert_eq!(classifier.infer(&frame).unwrap(), 0b1010);
        assert_eq!(classifier.infer(&frame).unwrap(), 0b1010);
        assert_eq!(classifier.calls(), 2);
    }

    #[test]
    fn test_mock_rejects_out_of_range() {
        assert!(MockClassifier::new(16).is_err());
    }

    #[test]
    fn test_threshold_slow_feet_in_contact() {
        let mut classifier = ThresholdClassifier::new(0.5);
        // All foot-velocity z-scores ~0: every leg in contact
        let frame = frame_with_newest_row([0.0; FEATURE_WIDTH]);
        assert_eq!(classifier.infer(&frame).unwrap(), 0b1111);
    }

    #[test]
    fn test_threshold_fast_foot_swings() {
        let mut classifier = ThresholdClassifier::new(0.5);

        // Leg 0's foot velocity far from the window mean: leg 0 swings
        let mut newest = [0.0f32; FEATURE_WIDTH];
        newest[COLS_FOOT_VELOCITY.start] = 3.0;
        let frame = frame_with_newest_row(newest);

        assert_eq!(classifier.infer(&frame).unwrap(), 0b0111);
    }

    #[test]
    fn test_threshold_non_finite_clears_flag() {
        let mut classifier = ThresholdClassifier::new(0.5);

        let mut newest = [0.0f32; FEATURE_WIDTH];
        for z in &mut newest[COLS_FOOT_VELOCITY] {
            *z = f32::NAN;
        }
        let frame = frame_with_newest_row(newest);

        assert_eq!(classifier.infer(&frame).unwrap(), 0);
    }

    #[test]
    fn test_factory_builds_from_config() {
        let config = ClassifierConfig {
            kind: ClassifierKind::Mock,
            params: [("class".to_string(), "5".to_string())].into(),
        };
        let mut classifier = build_classifier(&config).unwrap();
        let frame = frame_with_newest_row([0.0; FEATURE_WIDTH]);
        assert_eq!(classifier.infer(&frame).unwrap(), 5);
        assert_eq!(classifier.name(), "mock");
    }

    #[test]
    fn test_factory_rejects_bad_params() {
        let config = ClassifierConfig {
            kind: ClassifierKind::Threshold,
            params: [("threshold".to_string(), "abc".to_string())].into(),
        };
        assert!(build_classifier(&config).is_err());
    }
}
