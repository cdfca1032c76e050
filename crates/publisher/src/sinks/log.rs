//! LogSink - logs report summary via tracing

use contracts::{ContactReport, ContactSink, ContractError};
use tracing::{info, instrument};

/// Sink that logs report summaries for debugging
pub struct LogSink {
    name: String,
}

impl LogSink {
    /// Create a new LogSink with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    fn log_report_summary(&self, report: &ContactReport) {
        info!(
            sink = %self.name,
            seq = report.seq,
            timestamp = report.timestamp,
            class = report.class_index,
            contacts = %report.contacts,
            legs_down = report.contacts.contact_count(),
            "ContactReport received"
        );
    }
}

impl ContactSink for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "log_sink_write",
        skip(self, report),
        fields(sink = %self.name, seq = report.seq)
    )]
    async fn write(&mut self, report: &ContactReport) -> Result<(), ContractError> {
        self.log_report_summary(report);
        Ok(())
    }

    #[instrument(name = "log_sink_flush", skip(self))]
    async fn flush(&mut self) -> Result<(), ContractError> {
        // Nothing to flush for log sink
        Ok(())
    }

    #[instrument(name = "log_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), ContractError> {
        info!(sink = %self.name, "LogSink closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{ContactResult, FeatureRow};

    #[tokio::test]
    async fn test_log_sink_write() {
        let mut sink = LogSink::new("test_log");
        let report = ContactReport {
            seq: 1,
            timestamp: 1.0,
            class_index: 0b1010,
            contacts: ContactResult::from_class_index(0b1010),
            row: FeatureRow::default(),
        };

        let result = sink.write(&report).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_log_sink_name() {
        let sink = LogSink::new("my_logger");
        assert_eq!(sink.name(), "my_logger");
    }
}
