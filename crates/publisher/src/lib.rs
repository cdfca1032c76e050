//! # Publisher
//!
//! Result fan-out module.
//!
//! Responsible for:
//! - Consuming `ContactReport`
//! - Fan-out to multiple sinks
//! - Isolating slow sinks so they never stall the pipeline

pub mod error;
pub mod handle;
pub mod publisher;
pub mod sinks;

pub use contracts::{ContactReport, ContactSink};
pub use error::PublisherError;
pub use handle::{SinkHandle, SinkMetrics, SinkMetricsSnapshot};
pub use publisher::{create_publisher, Publisher, PublisherBuilder, PublisherConfig};
pub use sinks::{CsvSink, LogSink, NetworkSink};
