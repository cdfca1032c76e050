//! CsvSink - appends an audit trail of contact decisions
//!
//! One line per report: wall-clock time, frame sequence, sample timestamp,
//! class index, per-leg flags, and optionally the raw foot positions that
//! went into the decision.

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use chrono::Utc;
use contracts::{ContactReport, ContactSink, ContractError};
use tracing::{debug, instrument};

/// Configuration for CsvSink
#[derive(Debug, Clone)]
pub struct CsvSinkConfig {
    /// Output file path (created or appended to)
    pub path: PathBuf,

    /// Also record the raw foot-position columns per report
    pub foot_positions: bool,
}

impl CsvSinkConfig {
    /// Create config from params map
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, String> {
        let path = params
            .get("path")
            .map(PathBuf::from)
            .ok_or_else(|| "missing 'path' parameter".to_string())?;

        let foot_positions = params
            .get("foot_positions")
            .map(|v| v == "true")
            .unwrap_or(false);

        Ok(Self {
            path,
            foot_positions,
        })
    }
}

/// Sink that appends contact decisions to a CSV file
pub struct CsvSink {
    name: String,
    config: CsvSinkConfig,
    writer: BufWriter<File>,
}

impl CsvSink {
    /// Create a new CsvSink, writing the header for fresh files
    pub fn new(name: impl Into<String>, config: CsvSinkConfig) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.path)?;
        let fresh = file.metadata()?.len() == 0;
        let mut writer = BufWriter::new(file);

        if fresh {
            write!(writer, "wall_time,seq,timestamp,class,leg0,leg1,leg2,leg3")?;
            if config.foot_positions {
                for i in 0..12 {
                    write!(writer, ",p{i}")?;
                }
            }
            writeln!(writer)?;
        }

        Ok(Self {
            name: name.into(),
            config,
            writer,
        })
    }

    /// Create from params map (for factory)
    pub fn from_params(
        name: impl Into<String>,
        params: &HashMap<String, String>,
    ) -> std::io::Result<Self> {
        let config = CsvSinkConfig::from_params(params)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
        Self::new(name, config)
    }

    fn append_line(&mut self, report: &ContactReport) -> std::io::Result<()> {
        write!(
            self.writer,
            "{},{},{:.6},{}",
            Utc::now().to_rfc3339(),
            report.seq,
            report.timestamp,
            report.class_index
        )?;
        for leg in report.contacts.legs {
            write!(self.writer, ",{}", leg as u8)?;
        }
        if self.config.foot_positions {
            for p in report.row.foot_position() {
                write!(self.writer, ",{p}")?;
            }
        }
        writeln!(self.writer)?;
        Ok(())
    }
}

impl ContactSink for CsvSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "csv_sink_write",
        skip(self, report),
        fields(sink = %self.name, seq = report.seq)
    )]
    async fn write(&mut self, report: &ContactReport) -> Result<(), ContractError> {
        self.append_line(report)
            .map_err(|e| ContractError::sink_write(&self.name, e.to_string()))
    }

    #[instrument(name = "csv_sink_flush", skip(self))]
    async fn flush(&mut self) -> Result<(), ContractError> {
        self.writer
            .flush()
            .map_err(|e| ContractError::sink_write(&self.name, e.to_string()))
    }

    #[instrument(name = "csv_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), ContractError> {
        self.writer
            .flush()
            .map_err(|e| ContractError::sink_write(&self.name, e.to_string()))?;
        debug!(sink = %self.name, "CsvSink closed");
        Ok(())
    }
}
