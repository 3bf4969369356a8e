//! Single-point serviceability check.

use std::path::PathBuf;

use clap::Args;
use geozone::service::{ServiceConfig, ServiceStack};
use geozone::telemetry::ServiceMetrics;

use super::common::{describe, zone_repository};
use crate::error::CliError;
use crate::runner::CliRunner;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Latitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    /// Longitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lon: f64,

    /// Zone file to load instead of the configured source
    #[arg(long)]
    pub zones: Option<PathBuf>,

    /// Print the answer as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: CheckArgs, debug: bool) -> Result<(), CliError> {
    let runner = CliRunner::with_debug(debug)?;
    runner.log_startup("check");

    let repository = zone_repository(runner.config(), args.zones.as_deref())?;
    let config = ServiceConfig::from_config_file(runner.config());
    let runtime = runner.create_runtime()?;

    let stack = ServiceStack::new(repository, &config, ServiceMetrics::global());
    runtime.block_on(stack.load())?;

    let answer = stack.service().check_serviceability(args.lat, args.lon)?;

    if args.json {
        let json = serde_json::to_string(&answer)
            .map_err(|e| CliError::Config(format!("cannot encode answer: {}", e)))?;
        println!("{}", json);
    } else {
        println!("{}, {}: {}", args.lat, args.lon, describe(&answer));
    }

    Ok(())
}
