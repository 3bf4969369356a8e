//! Service configuration types.

use crate::cache::CacheConfig;
use crate::config::ConfigFile;
use crate::geo_index::IndexConfig;

use super::refresh::RefreshConfig;

/// Configuration for a serviceability stack.
///
/// Combines the index, cache and refresh settings needed to build a
/// [`ServiceStack`](super::ServiceStack).
///
/// # Example
///
/// ```
/// use geozone::cache::CacheConfig;
/// use geozone::service::ServiceConfig;
///
/// let config = ServiceConfig::builder()
///     .cache(CacheConfig::disabled())
///     .cell_size_deg(1.0)
///     .build();
///
/// assert!(!config.cache().is_enabled());
/// assert_eq!(config.index().cell_size_deg, 1.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceConfig {
    index: IndexConfig,
    cache: CacheConfig,
    refresh: RefreshConfig,
}

impl ServiceConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder::default()
    }

    /// Build from the loaded config file.
    pub fn from_config_file(config: &ConfigFile) -> Self {
        Self {
            index: IndexConfig::new(config.index.cell_size_deg),
            cache: CacheConfig::from(&config.cache),
            refresh: RefreshConfig::from(&config.refresh),
        }
    }

    /// Get the spatial index configuration.
    pub fn index(&self) -> &IndexConfig {
        &self.index
    }

    /// Get the cache configuration.
    pub fn cache(&self) -> &CacheConfig {
        &self.cache
    }

    /// Get the refresh configuration.
    pub fn refresh(&self) -> &RefreshConfig {
        &self.refresh
    }
}

/// Builder for [`ServiceConfig`].
#[derive(Debug, Default)]
pub struct ServiceConfigBuilder {
    index: Option<IndexConfig>,
    cache: Option<CacheConfig>,
    refresh: Option<RefreshConfig>,
}

impl ServiceConfigBuilder {
    pub fn index(mut self, config: IndexConfig) -> Self {
        self.index = Some(config);
        self
    }

    /// Shorthand for an index config with the given cell size.
    pub fn cell_size_deg(mut self, cell_size_deg: f64) -> Self {
        self.index = Some(IndexConfig::new(cell_size_deg));
        self
    }

    pub fn cache(mut self, config: CacheConfig) -> Self {
        self.cache = Some(config);
        self
    }

    pub fn refresh(mut self, config: RefreshConfig) -> Self {
        self.refresh = Some(config);
        self
    }

    pub fn build(self) -> ServiceConfig {
        ServiceConfig {
            index: self.index.unwrap_or_default(),
            cache: self.cache.unwrap_or_default(),
            refresh: self.refresh.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_builder_defaults() {
        let config = ServiceConfig::builder().build();
        assert_eq!(config, ServiceConfig::default());
        assert!(config.cache().is_enabled());
    }

    #[test]
    fn test_builder_overrides() {
        let config = ServiceConfig::builder()
            .cache(CacheConfig::default().with_capacity(5))
            .refresh(RefreshConfig::new(Duration::from_secs(30)))
            .build();
        assert_eq!(config.cache().capacity, 5);
        assert_eq!(config.refresh().interval, Duration::from_secs(30));
    }

    #[test]
    fn test_from_config_file() {
        let mut file = ConfigFile::default();
        file.index.cell_size_deg = 2.0;
        file.cache.capacity = 42;
        file.cache.ttl_secs = 9;
        file.refresh.interval_secs = 15;

        let config = ServiceConfig::from_config_file(&file);
        assert_eq!(config.index().cell_size_deg, 2.0);
        assert_eq!(config.cache().capacity, 42);
        assert_eq!(config.cache().ttl, Duration::from_secs(9));
        assert_eq!(config.refresh().interval, Duration::from_secs(15));
    }
}
