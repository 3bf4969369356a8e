//! Zone file validation.
//!
//! Parses a zone file the same way the service does and reports what would
//! be loaded and what would be skipped.

use std::path::Path;

use geozone::repository::parse_zones;

use crate::error::CliError;

pub fn run(file: &Path) -> Result<(), CliError> {
    let bytes = std::fs::read(file).map_err(|error| CliError::FileRead {
        path: file.to_path_buf(),
        error,
    })?;
    let parsed = parse_zones(&bytes)?;

    println!("Zone file: {}", file.display());
    println!();
    println!(
        "{:<20} {:>8} {:>7} {:>6}  Bounding box (lat, lon)",
        "Zone", "Priority", "Active", "Rings"
    );
    for zone in parsed.zones.zones() {
        let bbox = zone.bbox();
        println!(
            "{:<20} {:>8} {:>7} {:>6}  ({:.4}, {:.4}) .. ({:.4}, {:.4})",
            zone.id(),
            zone.priority(),
            if zone.is_active() { "yes" } else { "no" },
            zone.rings().len(),
            bbox.min_lat,
            bbox.min_lon,
            bbox.max_lat,
            bbox.max_lon
        );
    }

    if !parsed.skipped.is_empty() {
        println!();
        println!("Skipped records:");
        for skipped in &parsed.skipped {
            println!(
                "  #{} {}: {}",
                skipped.index,
                skipped.id.as_deref().unwrap_or("<no id>"),
                skipped.reason
            );
        }
    }

    println!();
    println!(
        "{} zones accepted ({} active), {} skipped, version {}",
        parsed.zones.len(),
        parsed.zones.active_count(),
        parsed.skipped.len(),
        parsed.zones.version()
    );

    Ok(())
}
