//! Resource manager configuration
//!
//! ```toml
//! cache_capacity = 3
//!
//! [theme]
//! fallback_theme_id = 125829872
//! async_load = ["icon", "shadow", "blur_style_common"]
//! ```

use std::num::NonZeroUsize;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::theme::{ThemeConfig, ThemeLoadPolicy};

/// Default number of secondary adapters kept in the LRU cache
pub const DEFAULT_CACHE_CAPACITY: usize = 3;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ResourceManagerConfig {
    /// LRU capacity for on-demand adapters; 0 is treated as 1
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
    #[serde(default)]
    pub theme: ThemeConfig,
}

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

impl Default for ResourceManagerConfig {
    fn default() -> Self {
        Self {
            cache_capacity: default_cache_capacity(),
            theme: ThemeConfig::default(),
        }
    }
}

impl ResourceManagerConfig {
    pub fn from_toml_str(src: &str) -> Result<Self> {
        Ok(toml::from_str(src)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let src = std::fs::read_to_string(path)?;
        Self::from_toml_str(&src)
    }

    pub fn capacity(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.cache_capacity).unwrap_or(NonZeroUsize::MIN)
    }

    pub fn theme_policy(&self) -> ThemeLoadPolicy {
        ThemeLoadPolicy::from(&self.theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_config_uses_defaults() {
        let config = ResourceManagerConfig::from_toml_str("").unwrap();
        assert_eq!(config, ResourceManagerConfig::default());
        assert_eq!(config.capacity().get(), 3);
        assert_eq!(config.theme.fallback_theme_id, 125829872);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let config = ResourceManagerConfig::from_toml_str("cache_capacity = 0").unwrap();
        assert_eq!(config.capacity().get(), 1);
    }

    #[test]
    fn theme_table_overrides() {
        let config = ResourceManagerConfig::from_toml_str(
            "cache_capacity = 5\n[theme]\nfallback_theme_id = 7\nasync_load = []\n",
        )
        .unwrap();
        assert_eq!(config.cache_capacity, 5);
        assert_eq!(config.theme_policy().fallback_theme_id(), 7);
        assert!(config.theme_policy().async_load().is_empty());
    }

    #[test]
    fn malformed_config_is_an_error() {
        assert!(ResourceManagerConfig::from_toml_str("cache_capacity = \"many\"").is_err());
    }
}
