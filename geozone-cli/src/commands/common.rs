//! Common types and utilities shared across CLI commands.

use std::path::Path;

use geozone::config::ConfigFile;
use geozone::repository::{ConfiguredRepository, FileZoneRepository};
use geozone::service::Serviceability;

use crate::error::CliError;

/// Pick the zone source: an explicit `--zones` file, or the `[source]` config.
pub fn zone_repository(
    config: &ConfigFile,
    zones: Option<&Path>,
) -> Result<ConfiguredRepository, CliError> {
    match zones {
        Some(path) => Ok(ConfiguredRepository::File(FileZoneRepository::new(path))),
        None => Ok(ConfiguredRepository::from_settings(&config.source)?),
    }
}

/// Parse a `lat,lon` input line.
///
/// Returns `None` for blank lines and `#` comments.
pub fn parse_coordinate_line(line: &str) -> Option<Result<(f64, f64), String>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let mut parts = line.split(',').map(str::trim);
    let parsed = match (parts.next(), parts.next(), parts.next()) {
        (Some(lat), Some(lon), None) => match (lat.parse::<f64>(), lon.parse::<f64>()) {
            (Ok(lat), Ok(lon)) => Ok((lat, lon)),
            _ => Err(format!("not a number pair: '{}'", line)),
        },
        _ => Err(format!("expected 'lat,lon': '{}'", line)),
    };
    Some(parsed)
}

/// One-line human-readable verdict.
pub fn describe(answer: &Serviceability) -> String {
    match &answer.zone_id {
        Some(zone) => format!("serviceable (zone {})", zone),
        None => "not serviceable".to_string(),
    }
}
