//! # Fusion Engine
//!
//! Streaming window-builder and incremental normalizer.
//!
//! Responsible for:
//! - Positional pairing of the two input streams into feature rows
//! - Fixed-height sliding window over fused rows
//! - O(W) incremental per-column mean/std with full-window z-scoring
//! - Producing `FusionOutput` for the inference task
//!
//! ## Usage Example
//!
//! ```ignore
//! use fusion_engine::FusionEngine;
//! use contracts::EngineConfig;
//!
//! let mut engine = FusionEngine::new(&EngineConfig::default());
//!
//! // Push packets as they arrive
//! if let Some(output) = engine.push(packet) {
//!     // Hand the normalized window to the classifier task
//! }
//! ```

mod aligner;
mod buffer;
mod engine;
mod normalizer;
mod window;

// Re-exports
pub use aligner::Aligner;
pub use buffer::SampleQueue;
pub use engine::FusionEngine;
pub use normalizer::Normalizer;
pub use window::{AppendOutcome, WindowBuffer, WindowState};

// Re-export contracts types
pub use contracts::{EngineConfig, FusionMeta, FusionOutput, NormalizedFrame, SamplePacket};
