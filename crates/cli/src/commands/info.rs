//! `info` command implementation.

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::InfoArgs;

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if args.json {
        let json = config_loader::ConfigLoader::to_json(&blueprint)
            .context("Failed to serialize configuration")?;
        println!("{json}");
        return Ok(());
    }

    println!("\n=== Contact Estimator Configuration ===\n");

    println!("Channels:");
    println!("  leg: {} Hz", blueprint.channels.leg.frequency_hz);
    println!("  imu: {} Hz", blueprint.channels.imu.frequency_hz);

    println!("\nEngine:");
    println!(
        "  input queue capacity: {}",
        blueprint.engine.input_queue_capacity
    );
    println!("  hand-off capacity: {}", blueprint.engine.handoff_capacity);
    println!("  drop policy: {:?}", blueprint.engine.drop_policy);

    println!("\nClassifier:");
    println!("  kind: {:?}", blueprint.classifier.kind);
    for (key, value) in &blueprint.classifier.params {
        println!("  {key}: {value}");
    }

    match blueprint.debug.dump_first_frame {
        Some(ref path) => println!("\nDebug: first-frame dump -> {}", path.display()),
        None => println!("\nDebug: disabled"),
    }

    if args.sinks || !blueprint.sinks.is_empty() {
        println!("\nSinks ({}):", blueprint.sinks.len());
        for sink in &blueprint.sinks {
            println!(
                "  - {} ({:?}, queue {})",
                sink.name, sink.sink_type, sink.queue_capacity
            );
            if args.sinks {
                for (key, value) in &sink.params {
                    println!("      {key} = {value}");
                }
            }
        }
    }

    println!();
    Ok(())
}
