//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::path::Path;

use super::defaults::MAX_BUCKET_PRECISION;
use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let url = config.source.url.as_deref().unwrap_or("");
    let api_key = config.source.api_key.as_deref().unwrap_or("");

    format!(
        r#"[source]
; Where zone definitions come from:
;   file - JSON file of zone records (see path)
;   http - REST endpoint returning the same JSON records (see url)
type = {}
; Zone file (used when type = file)
path = {}
; Endpoint URL (required when type = http)
url = {}
; API key, sent as both 'apikey' and 'Authorization: Bearer' headers
api_key = {}
; Per-request timeout in seconds (default: 10)
timeout_secs = {}

[index]
; Grid cell edge in degrees, 0.01 to 10 (default: 0.5)
; Smaller cells mean fewer candidates per query but more memory
cell_size_deg = {}

[cache]
; Maximum number of cached location buckets (default: 10000, 0 disables)
capacity = {}
; Seconds before a cached answer expires (default: 300)
ttl_secs = {}
; Decimal places kept when bucketing coordinates, 0 to {} (default: 3, ~110 m)
bucket_precision = {}

[refresh]
; Seconds between scheduled zone reloads (default: 600)
interval_secs = {}
; Upper bound for retry backoff after a failed reload (default: 300)
max_backoff_secs = {}
; Deadline in seconds for a single zone load (default: 30)
load_timeout_secs = {}

[logging]
; Log file location
file = {}
"#,
        config.source.source_type,
        path_to_string(&config.source.path),
        url,
        api_key,
        config.source.timeout_secs,
        config.index.cell_size_deg,
        config.cache.capacity,
        config.cache.ttl_secs,
        MAX_BUCKET_PRECISION,
        config.cache.bucket_precision,
        config.refresh.interval_secs,
        config.refresh.max_backoff_secs,
        config.refresh.load_timeout_secs,
        path_to_string(&config.logging.file),
    )
}

/// Convert a path to a string, replacing home directory with ~.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_has_all_sections() {
        let output = to_config_string(&ConfigFile::default());
        for section in ["[source]", "[index]", "[cache]", "[refresh]", "[logging]"] {
            assert!(output.contains(section), "missing {}", section);
        }
        assert!(output.contains("type = file"));
        assert!(output.contains("capacity = 10000"));
    }

    #[test]
    fn test_home_paths_use_tilde() {
        if dirs::home_dir().is_some() {
            let output = to_config_string(&ConfigFile::default());
            assert!(output.contains("path = ~/.geozone/zones.json"));
        }
    }
}
