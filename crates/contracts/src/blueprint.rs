//! PipelineBlueprint - Config Loader output
//!
//! Describes a complete pipeline run: input channels, engine queues,
//! classifier selection, debug taps, and output routing.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete pipeline configuration blueprint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineBlueprint {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Input channel settings
    pub channels: ChannelsConfig,

    /// Fusion engine queue settings
    #[serde(default)]
    pub engine: EngineConfig,

    /// Classifier selection
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Debug-only taps
    #[serde(default)]
    pub debug: DebugConfig,

    /// Output routing
    pub sinks: Vec<SinkConfig>,
}

/// Settings for the two input channels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelsConfig {
    /// Leg kinematics channel
    pub leg: ChannelConfig,

    /// Inertial channel
    pub imu: ChannelConfig,
}

/// Per-channel settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Sample rate (Hz); drives the mock source in self-contained runs.
    /// The two channels may run at different rates; pairing stays
    /// positional regardless.
    pub frequency_hz: f64,
}

/// Fusion engine queue settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Capacity of each bounded input sample queue
    #[serde(default = "default_input_queue_capacity")]
    pub input_queue_capacity: usize,

    /// Capacity of the fusion -> inference hand-off channel
    #[serde(default = "default_handoff_capacity")]
    pub handoff_capacity: usize,

    /// Drop policy when an input queue is full
    #[serde(default)]
    pub drop_policy: DropPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            input_queue_capacity: default_input_queue_capacity(),
            handoff_capacity: default_handoff_capacity(),
            drop_policy: DropPolicy::default(),
        }
    }
}

fn default_input_queue_capacity() -> usize {
    256
}

fn default_handoff_capacity() -> usize {
    8
}

/// Drop policy when a bounded queue is full
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropPolicy {
    /// Drop the oldest queued sample
    #[default]
    DropOldest,
    /// Drop the incoming sample
    DropNewest,
}

/// Classifier selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Classifier kind
    #[serde(default)]
    pub kind: ClassifierKind,

    /// Kind-specific parameters
    #[serde(default)]
    pub params: HashMap<String, String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            kind: ClassifierKind::Threshold,
            params: HashMap::new(),
        }
    }
}

/// Available classifier kinds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierKind {
    /// Stand-in heuristic over the normalized window
    #[default]
    Threshold,
    /// Fixed-class mock (tests, dry runs)
    Mock,
}

/// Debug-only taps; must not affect pipeline correctness when disabled
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Write the first normalized frame to this path as a flat blob of
    /// H * W little-endian 4-byte floats (offline verification)
    #[serde(default)]
    pub dump_first_frame: Option<PathBuf>,
}

/// Sink output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Sink name
    pub name: String,

    /// Sink type
    pub sink_type: SinkType,

    /// Queue capacity
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Type-specific parameters
    #[serde(default)]
    pub params: HashMap<String, String>,
}

fn default_queue_capacity() -> usize {
    100
}

/// Sink type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkType {
    /// Log report summaries via tracing
    Log,
    /// Append an audit trail CSV
    Csv,
    /// Stream reports over UDP
    Network,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_defaults() {
        let engine = EngineConfig::default();
        assert_eq!(engine.input_queue_capacity, 256);
        assert_eq!(engine.handoff_capacity, 8);
        assert_eq!(engine.drop_policy, DropPolicy::DropOldest);
    }

    #[test]
    fn test_sink_type_serde_names() {
        assert_eq!(serde_json::to_string(&SinkType::Csv).unwrap(), "\"csv\"");
        let kind: ClassifierKind = serde_json::from_str("\"threshold\"").unwrap();
        assert_eq!(kind, ClassifierKind::Threshold);
    }

    #[test]
    fn test_blueprint_minimal_json() {
        let content = r#"{
            "channels": {
                "leg": { "frequency_hz": 500.0 },
                "imu": { "frequency_hz": 500.0 }
            },
            "sinks": [{ "name": "log", "sink_type": "log" }]
        }"#;
        let bp: PipelineBlueprint = serde_json::from_str(content).unwrap();
        assert_eq!(bp.channels.leg.frequency_hz, 500.0);
        assert_eq!(bp.sinks[0].queue_capacity, 100);
        assert!(bp.debug.dump_first_frame.is_none());
    }
}
