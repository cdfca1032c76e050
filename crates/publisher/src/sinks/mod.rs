//! Shipped sink implementations

mod csv;
mod log;
mod network;

pub use csv::{CsvSink, CsvSinkConfig};
pub use log::LogSink;
pub use network::{NetworkFormat, NetworkSink, NetworkSinkConfig};
