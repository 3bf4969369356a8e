//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;
use std::str::FromStr;

use super::defaults::{clamp_cell_size, MAX_BUCKET_PRECISION};
use super::file::ConfigFileError;
use super::settings::{ConfigFile, SourceType};

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [source] section
    if let Some(section) = ini.section(Some("source")) {
        if let Some(v) = section.get("type") {
            config.source.source_type =
                SourceType::from_str(v).map_err(|_| ConfigFileError::InvalidValue {
                    section: "source".to_string(),
                    key: "type".to_string(),
                    value: v.to_string(),
                    reason: "must be 'file' or 'http'".to_string(),
                })?;
        }
        if let Some(v) = section.get("path") {
            let v = v.trim();
            if !v.is_empty() {
                config.source.path = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("url") {
            let v = v.trim();
            if !v.is_empty() {
                if !(v.starts_with("http://") || v.starts_with("https://")) {
                    return Err(ConfigFileError::InvalidValue {
                        section: "source".to_string(),
                        key: "url".to_string(),
                        value: v.to_string(),
                        reason: "must start with http:// or https://".to_string(),
                    });
                }
                config.source.url = Some(v.to_string());
            }
        }
        if let Some(v) = section.get("api_key") {
            let v = v.trim();
            if !v.is_empty() {
                config.source.api_key = Some(v.to_string());
            }
        }
        if let Some(v) = section.get("timeout_secs") {
            config.source.timeout_secs = parse_positive(v, "source", "timeout_secs")?;
        }
    }

    if config.source.source_type == SourceType::Http && config.source.url.is_none() {
        return Err(ConfigFileError::InvalidValue {
            section: "source".to_string(),
            key: "url".to_string(),
            value: String::new(),
            reason: "required when type = http".to_string(),
        });
    }

    // [index] section
    if let Some(section) = ini.section(Some("index")) {
        if let Some(v) = section.get("cell_size_deg") {
            let size: f64 = v
                .trim()
                .parse()
                .ok()
                .filter(|s: &f64| s.is_finite() && *s > 0.0)
                .ok_or_else(|| ConfigFileError::InvalidValue {
                    section: "index".to_string(),
                    key: "cell_size_deg".to_string(),
                    value: v.to_string(),
                    reason: "must be a positive number of degrees".to_string(),
                })?;
            config.index.cell_size_deg = clamp_cell_size(size);
        }
    }

    // [cache] section
    if let Some(section) = ini.section(Some("cache")) {
        if let Some(v) = section.get("capacity") {
            config.cache.capacity = v.trim().parse().map_err(|_| ConfigFileError::InvalidValue {
                section: "cache".to_string(),
                key: "capacity".to_string(),
                value: v.to_string(),
                reason: "must be a non-negative integer (0 disables the cache)".to_string(),
            })?;
        }
        if let Some(v) = section.get("ttl_secs") {
            config.cache.ttl_secs = parse_positive(v, "cache", "ttl_secs")?;
        }
        if let Some(v) = section.get("bucket_precision") {
            config.cache.bucket_precision = v
                .trim()
                .parse()
                .ok()
                .filter(|p| *p <= MAX_BUCKET_PRECISION)
                .ok_or_else(|| ConfigFileError::InvalidValue {
                    section: "cache".to_string(),
                    key: "bucket_precision".to_string(),
                    value: v.to_string(),
                    reason: format!("must be an integer from 0 to {}", MAX_BUCKET_PRECISION),
                })?;
        }
    }

    // [refresh] section
    if let Some(section) = ini.section(Some("refresh")) {
        if let Some(v) = section.get("interval_secs") {
            config.refresh.interval_secs = parse_positive(v, "refresh", "interval_secs")?;
        }
        if let Some(v) = section.get("max_backoff_secs") {
            config.refresh.max_backoff_secs = parse_positive(v, "refresh", "max_backoff_secs")?;
        }
        if let Some(v) = section.get("load_timeout_secs") {
            config.refresh.load_timeout_secs = parse_positive(v, "refresh", "load_timeout_secs")?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

/// Parse a strictly positive integer, naming the key on failure.
fn parse_positive(value: &str, section: &str, key: &str) -> Result<u64, ConfigFileError> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| ConfigFileError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: "must be a positive integer (seconds)".to_string(),
        })
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::*;
    use crate::config::settings::ConfigFile;
    use tempfile::TempDir;

    fn load(content: &str) -> Result<ConfigFile, ConfigFileError> {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");
        std::fs::write(&config_path, content).unwrap();
        ConfigFile::load_from(&config_path)
    }

    #[test]
    fn test_invalid_source_type() {
        let err = load(
            r#"
[source]
type = ftp
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("source.type"));
        assert!(err.to_string().contains("'file' or 'http'"));
    }

    #[test]
    fn test_http_source_requires_url() {
        let err = load(
            r#"
[source]
type = http
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("required when type = http"));
    }

    #[test]
    fn test_http_source() {
        let config = load(
            r#"
[source]
type = http
url = https://zones.example.com/rest/v1/zones
api_key = secret
timeout_secs = 4
"#,
        )
        .unwrap();
        assert_eq!(config.source.source_type, SourceType::Http);
        assert_eq!(
            config.source.url.as_deref(),
            Some("https://zones.example.com/rest/v1/zones")
        );
        assert_eq!(config.source.api_key.as_deref(), Some("secret"));
        assert_eq!(config.source.timeout_secs, 4);
    }

    #[test]
    fn test_url_scheme_validated() {
        let err = load(
            r#"
[source]
url = zones.example.com
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("source.url"));
    }

    #[test]
    fn test_empty_api_key_is_none() {
        let config = load(
            r#"
[source]
api_key =
"#,
        )
        .unwrap();
        assert!(config.source.api_key.is_none());
    }

    #[test]
    fn test_cache_section() {
        let config = load(
            r#"
[cache]
capacity = 0
ttl_secs = 60
bucket_precision = 4
"#,
        )
        .unwrap();
        assert_eq!(config.cache.capacity, 0);
        assert_eq!(config.cache.ttl_secs, 60);
        assert_eq!(config.cache.bucket_precision, 4);
    }

    #[test]
    fn test_bucket_precision_out_of_range() {
        let err = load(
            r#"
[cache]
bucket_precision = 9
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("bucket_precision"));
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let err = load(
            r#"
[cache]
ttl_secs = 0
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("cache.ttl_secs"));
    }

    #[test]
    fn test_cell_size_clamped() {
        let config = load(
            r#"
[index]
cell_size_deg = 25
"#,
        )
        .unwrap();
        assert_eq!(config.index.cell_size_deg, 10.0);
    }

    #[test]
    fn test_negative_cell_size_rejected() {
        let err = load(
            r#"
[index]
cell_size_deg = -1
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("index.cell_size_deg"));
    }

    #[test]
    fn test_expand_tilde() {
        let path = expand_tilde("~/test/path");
        if let Some(home) = dirs::home_dir() {
            assert_eq!(path, home.join("test/path"));
        }

        // Non-tilde paths should be unchanged
        let path = expand_tilde("/absolute/path");
        assert_eq!(path, PathBuf::from("/absolute/path"));
    }

    #[test]
    fn test_partial_config() {
        let config = load(
            r#"
[refresh]
interval_secs = 120
"#,
        )
        .unwrap();
        assert_eq!(config.refresh.interval_secs, 120);
        assert_eq!(config.refresh.max_backoff_secs, DEFAULT_MAX_BACKOFF_SECS);
        assert_eq!(config.cache.capacity, DEFAULT_CACHE_CAPACITY);
        assert_eq!(config.index.cell_size_deg, DEFAULT_CELL_SIZE_DEG);
        assert_eq!(config.source.source_type, SourceType::File);
    }

    #[test]
    fn test_logging_file() {
        let config = load(
            r#"
[logging]
file = /var/log/geozone.log
"#,
        )
        .unwrap();
        assert_eq!(config.logging.file, PathBuf::from("/var/log/geozone.log"));
    }
}
