//! arkui.toml handling

use anyhow::{Context, Result};
use arkui_resource::ResourceManagerConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level tool configuration (arkui.toml)
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ArkuiConfig {
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub manager: ResourceManagerConfig,
}

/// Application identity and resource location
#[derive(Debug, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default = "default_bundle")]
    pub bundle: String,
    #[serde(default = "default_module")]
    pub module: String,
    /// Resource index, relative to the config file
    #[serde(default)]
    pub index: Option<PathBuf>,
}

fn default_bundle() -> String {
    "com.example.app".to_string()
}

fn default_module() -> String {
    "entry".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bundle: default_bundle(),
            module: default_module(),
            index: None,
        }
    }
}

impl ArkuiConfig {
    /// Load from a file, or from `arkui.toml` inside a directory
    pub fn load(path: &Path) -> Result<Self> {
        let config_path = if path.is_dir() {
            path.join("arkui.toml")
        } else {
            path.to_path_buf()
        };

        if !config_path.exists() {
            anyhow::bail!("No arkui.toml found at {}", config_path.display());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let mut config = Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        if let (Some(index), Some(dir)) = (config.app.index.as_mut(), config_path.parent()) {
            if index.is_relative() {
                *index = dir.join(&*index);
            }
        }
        Ok(config)
    }

    pub fn from_toml_str(src: &str) -> Result<Self> {
        Ok(toml::from_str(src)?)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_tables_use_defaults() {
        let config = ArkuiConfig::from_toml_str("").unwrap();
        assert_eq!(config.app.bundle, "com.example.app");
        assert_eq!(config.app.module, "entry");
        assert_eq!(config.manager, ResourceManagerConfig::default());
    }

    #[test]
    fn manager_table_is_read() {
        let config = ArkuiConfig::from_toml_str(
            r#"
            [app]
            bundle = "com.demo"
            index = "resources.toml"

            [manager]
            cache_capacity = 8

            [manager.theme]
            async_load = []
            "#,
        )
        .unwrap();
        assert_eq!(config.app.bundle, "com.demo");
        assert_eq!(config.app.index, Some(PathBuf::from("resources.toml")));
        assert_eq!(config.manager.cache_capacity, 8);
        assert!(config.manager.theme.async_load.is_empty());
    }
}
