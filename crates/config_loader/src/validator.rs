//! Configuration validation
//!
//! Rules:
//! - channel frequencies > 0
//! - engine queue capacities > 0
//! - sink names non-empty and unique
//! - sink queue capacities > 0
//! - per-sink required params present (csv: path, network: addr)
//!
//! Returns the first error encountered, or Ok(()).

use std::collections::HashSet;

use contracts::{ContractError, PipelineBlueprint, SinkType};

/// Validate a PipelineBlueprint
pub fn validate(blueprint: &PipelineBlueprint) -> Result<(), ContractError> {
    validate_channels(blueprint)?;
    validate_engine(blueprint)?;
    validate_sinks(blueprint)?;
    Ok(())
}

/// Validate channel sample rates
fn validate_channels(blueprint: &PipelineBlueprint) -> Result<(), ContractError> {
    for (name, channel) in [
        ("leg", &blueprint.channels.leg),
        ("imu", &blueprint.channels.imu),
    ] {
        if channel.frequency_hz <= 0.0 {
            return Err(ContractError::config_validation(
                format!("channels.{name}.frequency_hz"),
                format!("frequency_hz must be > 0, got {}", channel.frequency_hz),
            ));
        }
    }
    Ok(())
}

/// Validate engine queue settings
fn validate_engine(blueprint: &PipelineBlueprint) -> Result<(), ContractError> {
    let engine = &blueprint.engine;

    if engine.input_queue_capacity == 0 {
        return Err(ContractError::config_validation(
            "engine.input_queue_capacity",
            "input_queue_capacity must be > 0",
        ));
    }

    if engine.handoff_capacity == 0 {
        return Err(ContractError::config_validation(
            "engine.handoff_capacity",
            "handoff_capacity must be > 0",
        ));
    }

    Ok(())
}

/// Validate sink configuration
fn validate_sinks(blueprint: &PipelineBlueprint) -> Result<(), ContractError> {
    let mut seen = HashSet::new();

    for (idx, sink) in blueprint.sinks.iter().enumerate() {
        if sink.name.is_empty() {
            return Err(ContractError::config_validation(
                format!("sinks[{idx}].name"),
                "sink name cannot be empty",
            ));
        }

        if !seen.insert(&sink.name) {
            return Err(ContractError::config_validation(
                format!("sinks[{idx}].name"),
                format!("duplicate sink name '{}'", sink.name),
            ));
        }

        if sink.queue_capacity == 0 {
            return Err(ContractError::config_validation(
                format!("sinks[{}].queue_capacity", sink.name),
                "queue_capacity must be > 0",
            ));
        }

        let required_param = match sink.sink_type {
            SinkType::Csv => Some("path"),
            SinkType::Network => Some("addr"),
            SinkType::Log => None,
        };

        if let Some(param) = required_param {
            if !sink.params.contains_key(param) {
                return Err(ContractError::config_validation(
                    format!("sinks[{}].params.{param}", sink.name),
                    format!("{:?} sink requires the '{param}' parameter", sink.sink_type),
                ));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{
        ChannelConfig, ChannelsConfig, ClassifierConfig, ConfigVersion, DebugConfig, EngineConfig,
        SinkConfig,
    };
    use std::collections::HashMap;

    fn minimal_blueprint() -> PipelineBlueprint {
        PipelineBlueprint {
            version: ConfigVersion::V1,
            channels: ChannelsConfig {
                leg: ChannelConfig {
                    frequency_hz: 500.0,
                },
                imu: ChannelConfig {
                    frequency_hz: 500.0,
                },
            },
            engine: EngineConfig::default(),
            classifier: ClassifierConfig::default(),
            debug: DebugConfig::default(),
            sinks: vec![SinkConfig {
                name: "log".into(),
                sink_type: SinkType::Log,
                queue_capacity: 100,
                params: Default::default(),
            }],
        }
    }

    #[test]
    fn test_valid_config() {
        let bp = minimal_blueprint();
        assert!(validate(&bp).is_ok());
    }

    #[test]
    fn test_invalid_frequency() {
        let mut bp = minimal_blueprint();
        bp.channels.imu.frequency_hz = -5.0;
        let result = validate(&bp);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("frequency_hz must be > 0"), "got: {err}");
    }

    #[test]
    fn test_zero_queue_capacity() {
        let mut bp = minimal_blueprint();
        bp.engine.input_queue_capacity = 0;
        let result = validate(&bp);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("input_queue_capacity"), "got: {err}");
    }

    #[test]
    fn test_empty_sink_name() {
        let mut bp = minimal_blueprint();
        bp.sinks[0].name = String::new();
        let result = validate(&bp);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("cannot be empty"), "got: {err}");
    }

    #[test]
    fn test_duplicate_sink_name() {
        let mut bp = minimal_blueprint();
        bp.sinks.push(bp.sinks[0].clone());
        let result = validate(&bp);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("duplicate sink name"), "got: {err}");
    }

    #[test]
    fn test_network_sink_requires_addr() {
        let mut bp = minimal_blueprint();
        bp.sinks.push(SinkConfig {
            name: "net".into(),
            sink_type: SinkType::Network,
            queue_capacity: 10,
            params: HashMap::new(),
        });
        let result = validate(&bp);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("'addr'"), "got: {err}");
    }

    #[test]
    fn test_csv_sink_requires_path() {
        let mut bp = minimal_blueprint();
        bp.sinks.push(SinkConfig {
            name: "audit".into(),
            sink_type: SinkType::Csv,
            queue_capacity: 10,
            params: HashMap::new(),
        });
        let result = validate(&bp);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("'path'"), "got: {err}");
    }
}
