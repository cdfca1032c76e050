//! `validate` command implementation.

use anyhow::Result;
use tracing::info;

use crate::cli::ValidateArgs;

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    if !args.config.exists() {
        if args.json {
            print_json_result(false, Some("configuration file not found"));
        }
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(blueprint) => {
            if args.json {
                print_json_result(true, None);
            } else {
                println!("Configuration is valid");
                println!("  channels: leg {} Hz, imu {} Hz",
                    blueprint.channels.leg.frequency_hz,
                    blueprint.channels.imu.frequency_hz
                );
                println!("  sinks: {}", blueprint.sinks.len());
            }
            Ok(())
        }
        Err(e) => {
            if args.json {
                print_json_result(false, Some(&e.to_string()));
                Ok(())
            } else {
                Err(anyhow::anyhow!(e).context("Configuration is invalid"))
            }
        }
    }
}

fn print_json_result(valid: bool, error: Option<&str>) {
    let result = serde_json::json!({
        "valid": valid,
        "error": error,
    });
    println!("{}", serde_json::to_string_pretty(&result).unwrap());
}
