//! # Ingestion Pipeline
//!
//! Sample ingestion module.
//!
//! Responsibilities:
//! - Register sample sources (real transport or mock)
//! - Wrap delivered samples into `SamplePacket`
//! - Backpressure management and drop policy
//! - Send to downstream via async-channel
//!
//! ## Usage Example
//!
//! ```ignore
//! use ingestion::IngestionPipeline;
//! use contracts::{Channel, SampleSource};
//!
//! let mut pipeline = IngestionPipeline::new(256);
//!
//! let leg_source: Box<dyn SampleSource> = transport.source(Channel::Leg);
//! pipeline.register_source(leg_source, None);
//!
//! pipeline.start_all();
//! let rx = pipeline.take_receiver().unwrap();
//! while let Ok(packet) = rx.recv().await {
//!     // Process sample packet
//! }
//! ```
//!
//! ## Mock Testing
//!
//! ```ignore
//! use ingestion::MockSampleSource;
//!
//! let source = MockSampleSource::leg(500.0);
//! ```

mod adapter;
mod config;
mod error;
mod generic_adapter;
mod mock;
mod pipeline;

// Re-exports
pub use adapter::SampleAdapter;
pub use config::{BackpressureConfig, IngestionMetrics, MetricsSnapshot};
pub use contracts::{DropPolicy, SamplePacket};
pub use error::{IngestionError, Result};
pub use generic_adapter::GenericSampleAdapter;
pub use mock::{MockSampleSource, MockSignalConfig};
pub use pipeline::IngestionPipeline;
