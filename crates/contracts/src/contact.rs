//! ContactResult - per-leg ground-contact flags
//!
//! Derived from the classifier's class index by binary decomposition.

use serde::{Deserialize, Serialize};

use crate::{FeatureRow, CONTACT_CLASSES, LEG_COUNT};

/// Per-leg contact flags
///
/// Leg order follows the class-index encoding: `legs[0]` is the most
/// significant bit of the class index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContactResult {
    /// Contact flag per leg, MSB-first
    pub legs: [bool; LEG_COUNT],
}

impl ContactResult {
    /// Decompose a class index into per-leg flags, MSB first
    ///
    /// # Panics
    /// Panics when `class_index >= CONTACT_CLASSES`; callers must treat an
    /// out-of-range class as a contract violation before reaching here.
    pub fn from_class_index(class_index: u8) -> Self {
        assert!(
            (class_index as usize) < CONTACT_CLASSES,
            "class index {class_index} out of range"
        );
        let mut legs = [false; LEG_COUNT];
        for (i, leg) in legs.iter_mut().enumerate() {
            *leg = class_index & (1 << (LEG_COUNT - 1 - i)) != 0;
        }
        Self { legs }
    }

    /// Recompose the class index: b0*8 + b1*4 + b2*2 + b3
    pub fn to_class_index(&self) -> u8 {
        self.legs
            .iter()
            .fold(0u8, |acc, &leg| (acc << 1) | leg as u8)
    }

    /// Number of legs currently in contact
    pub fn contact_count(&self) -> usize {
        self.legs.iter().filter(|&&leg| leg).count()
    }
}

impl std::fmt::Display for ContactResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for leg in self.legs {
            write!(f, "{}", leg as u8)?;
        }
        Ok(())
    }
}

/// Classified result delivered to publisher sinks
///
/// Carries the raw feature row alongside the contact flags so sinks can
/// audit the inputs that produced a decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactReport {
    /// Frame sequence number (matches the normalized frame)
    pub seq: u64,

    /// Timestamp of the newest sample in the window (seconds)
    pub timestamp: f64,

    /// Raw classifier output in [0, 16)
    pub class_index: u8,

    /// Decomposed per-leg flags
    pub contacts: ContactResult,

    /// The feature row that completed the window
    pub row: FeatureRow,
}
