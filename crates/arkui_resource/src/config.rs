//! Configuration model
//!
//! [`ResourceConfiguration`] is the engine-side view of the environment (locale, color
//! mode, density, ...). [`ResConfig`] is the snapshot handed to the platform resource
//! manager to select resource variants. Pushing a new `ResConfig` to the platform is
//! expensive, so adapters diff against the previous snapshot with
//! [`ResConfig::needs_update`] first.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Light/dark color mode
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Light,
    Dark,
    Undefined,
}

impl ColorMode {
    pub fn is_dark(&self) -> bool {
        matches!(self, Self::Dark)
    }
}

/// Device class used for resource qualifiers
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    #[default]
    Phone,
    Tablet,
    Tv,
    Car,
    Wearable,
    TwoInOne,
    Unknown,
}

/// Screen orientation qualifier
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Vertical,
    Horizontal,
}

/// Primary input device class
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputDevice {
    #[default]
    None,
    Pointer,
}

/// Density bucket the platform selects resources by
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenDensity {
    Sdpi,
    #[default]
    Mdpi,
    Ldpi,
    Xldpi,
    Xxldpi,
    Xxxldpi,
}

impl ScreenDensity {
    /// Bucket a density scale factor (1.0 == 160 dpi)
    pub fn from_density(density: f64) -> Self {
        let dpi = density * 160.0;
        if dpi <= 120.0 {
            Self::Sdpi
        } else if dpi <= 160.0 {
            Self::Mdpi
        } else if dpi <= 240.0 {
            Self::Ldpi
        } else if dpi <= 320.0 {
            Self::Xldpi
        } else if dpi <= 480.0 {
            Self::Xxldpi
        } else {
            Self::Xxxldpi
        }
    }
}

/// Normalize locale identifiers for lookup.
///
/// - Converts `_` to `-` (some platforms report `en_US`).
/// - Trims whitespace.
pub fn normalize_locale(s: &str) -> String {
    s.trim().replace('_', "-")
}

/// A parsed `language[-Script][-REGION]` locale
#[derive(Clone, Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct Locale {
    pub language: String,
    #[serde(default)]
    pub script: String,
    #[serde(default)]
    pub region: String,
}

impl Locale {
    pub fn new(language: &str, script: &str, region: &str) -> Self {
        Self {
            language: language.to_ascii_lowercase(),
            script: script.to_string(),
            region: region.to_ascii_uppercase(),
        }
    }

    /// Parse a tag such as `zh-Hans-CN`, `en_US` or `fr`.
    ///
    /// Unrecognized subtags (variants, extensions) are ignored.
    pub fn parse(tag: &str) -> Self {
        let tag = normalize_locale(tag);
        let mut parts = tag.split('-').filter(|p| !p.is_empty());
        let mut locale = Locale {
            language: parts.next().unwrap_or_default().to_ascii_lowercase(),
            ..Default::default()
        };
        for part in parts {
            let alpha = part.chars().all(|c| c.is_ascii_alphabetic());
            let digits = part.chars().all(|c| c.is_ascii_digit());
            if part.len() == 4 && alpha && locale.script.is_empty() && locale.region.is_empty() {
                let mut chars = part.chars();
                if let Some(first) = chars.next() {
                    locale.script = first.to_ascii_uppercase().to_string()
                        + &chars.as_str().to_ascii_lowercase();
                }
            } else if ((part.len() == 2 && alpha) || (part.len() == 3 && digits))
                && locale.region.is_empty()
            {
                locale.region = part.to_ascii_uppercase();
            }
        }
        locale
    }

    pub fn is_empty(&self) -> bool {
        self.language.is_empty()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.language)?;
        if !self.script.is_empty() {
            write!(f, "-{}", self.script)?;
        }
        if !self.region.is_empty() {
            write!(f, "-{}", self.region)?;
        }
        Ok(())
    }
}

/// Engine-side environment description
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfiguration {
    pub locale: Locale,
    pub preferred_locale: Option<Locale>,
    pub device_type: DeviceType,
    pub direction: Direction,
    /// Density scale factor (1.0 == 160 dpi)
    pub density: f64,
    pub color_mode: ColorMode,
    pub input_device: InputDevice,
    pub font_ratio: f64,
    /// Whether the application set its color mode explicitly
    pub app_color_mode: bool,
}

impl Default for ResourceConfiguration {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            preferred_locale: None,
            device_type: DeviceType::default(),
            direction: Direction::default(),
            density: 1.0,
            color_mode: ColorMode::Light,
            input_device: InputDevice::default(),
            font_ratio: 1.0,
            app_color_mode: false,
        }
    }
}

impl ResourceConfiguration {
    pub fn with_locale(mut self, tag: &str) -> Self {
        self.locale = Locale::parse(tag);
        self
    }

    pub fn with_color_mode(mut self, color_mode: ColorMode) -> Self {
        self.color_mode = color_mode;
        self
    }

    pub fn with_density(mut self, density: f64) -> Self {
        self.density = density;
        self
    }
}

/// Which aspects of a configuration changed
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ConfigurationChange {
    pub color_mode_update: bool,
    pub language_update: bool,
    pub dpi_update: bool,
    pub direction_update: bool,
    pub font_update: bool,
    pub input_device_update: bool,
    pub device_type_update: bool,
}

impl ConfigurationChange {
    /// Compare two configurations field by field
    pub fn between(old: &ResourceConfiguration, new: &ResourceConfiguration) -> Self {
        Self {
            color_mode_update: old.color_mode != new.color_mode,
            language_update: old.locale != new.locale
                || old.preferred_locale != new.preferred_locale,
            dpi_update: old.density != new.density,
            direction_update: old.direction != new.direction,
            font_update: old.font_ratio != new.font_ratio,
            input_device_update: old.input_device != new.input_device,
            device_type_update: old.device_type != new.device_type,
        }
    }

    pub fn color_mode() -> Self {
        Self {
            color_mode_update: true,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// The platform's resource-selection snapshot
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResConfig {
    pub locale: Locale,
    pub preferred_locale: Option<Locale>,
    pub device_type: DeviceType,
    pub direction: Direction,
    pub screen_density: ScreenDensity,
    pub color_mode: ColorMode,
    pub input_device: InputDevice,
    pub app_color_mode: bool,
}

impl From<&ResourceConfiguration> for ResConfig {
    fn from(config: &ResourceConfiguration) -> Self {
        Self {
            locale: config.locale.clone(),
            preferred_locale: config.preferred_locale.clone(),
            device_type: config.device_type,
            direction: config.direction,
            screen_density: ScreenDensity::from_density(config.density),
            color_mode: config.color_mode,
            input_device: config.input_device,
            app_color_mode: config.app_color_mode,
        }
    }
}

impl ResConfig {
    /// Whether pushing `new` to the platform would change resource selection.
    ///
    /// No previous snapshot always needs an update.
    pub fn needs_update(old: Option<&ResConfig>, new: &ResConfig) -> bool {
        let Some(old) = old else {
            return true;
        };
        let locale_changed = old.locale.language != new.locale.language
            || old.locale.script != new.locale.script
            || old.locale.region != new.locale.region;
        let preferred_changed = match (&old.preferred_locale, &new.preferred_locale) {
            (None, None) => false,
            (Some(a), Some(b)) => a.language != b.language || a.region != b.region || a.script != b.script,
            _ => true,
        };
        locale_changed
            || preferred_changed
            || old.device_type != new.device_type
            || old.direction != new.direction
            || old.screen_density != new.screen_density
            || old.color_mode != new.color_mode
            || old.input_device != new.input_device
            || old.app_color_mode != new.app_color_mode
    }

    /// Copy only the aspects flagged in `change` from `other`
    pub fn apply_change(&mut self, other: &ResConfig, change: &ConfigurationChange) {
        if change.color_mode_update {
            self.color_mode = other.color_mode;
        }
        if change.language_update {
            self.locale = other.locale.clone();
            self.preferred_locale = other.preferred_locale.clone();
        }
        if change.dpi_update {
            self.screen_density = other.screen_density;
        }
        if change.direction_update {
            self.direction = other.direction;
        }
        if change.input_device_update {
            self.input_device = other.input_device;
        }
        if change.device_type_update {
            self.device_type = other.device_type;
        }
    }
}
