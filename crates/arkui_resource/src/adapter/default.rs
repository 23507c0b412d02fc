use std::sync::Arc;

use parking_lot::Mutex;

use super::{AdapterKind, ResourceAdapter};
use crate::config::{ColorMode, ConfigurationChange, ResConfig, ResourceConfiguration};

/// Adapter with no resource bundle behind it
///
/// Used as the last-resort default when no platform adapter can be built. Lookups
/// return typed defaults; configuration is still tracked so the color mode reads back.
#[derive(Debug, Default)]
pub struct DefaultResourceAdapter {
    config: Mutex<ResConfig>,
}

impl DefaultResourceAdapter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResourceAdapter for DefaultResourceAdapter {
    fn kind(&self) -> AdapterKind {
        AdapterKind::Default
    }

    fn update_config(&self, config: &ResourceConfiguration, _theme_flag: bool) {
        *self.config.lock() = ResConfig::from(config);
    }

    fn update_color_mode(&self, color_mode: ColorMode) {
        self.config.lock().color_mode = color_mode;
    }

    fn resource_color_mode(&self) -> ColorMode {
        let config = self.config.lock();
        if config.color_mode.is_dark() && !config.app_color_mode {
            ColorMode::Light
        } else {
            config.color_mode
        }
    }

    fn override_adapter(
        &self,
        config: &ResourceConfiguration,
        change: &ConfigurationChange,
    ) -> Arc<dyn ResourceAdapter> {
        let mut snapshot = self.config.lock().clone();
        snapshot.apply_change(&ResConfig::from(config), change);
        Arc::new(Self {
            config: Mutex::new(snapshot),
        })
    }
}
