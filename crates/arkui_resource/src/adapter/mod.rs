//! Resource adapters
//!
//! A [`ResourceAdapter`] resolves requests for one bundle/module. Resolution never fails:
//! a miss logs, records a diagnostic and yields the typed default (black, `0vp`, empty
//! string, `false`, empty vector). The provided method bodies are those defaults, so the
//! [`DefaultResourceAdapter`] only tracks configuration state.
//!
//! The variant set is closed and exposed through [`AdapterKind`] rather than by
//! downcasting.

mod default;
mod platform;

pub use default::DefaultResourceAdapter;
pub use platform::PlatformResourceAdapter;

use std::sync::Arc;

use arkui_core::{Color, Dimension};

use crate::config::{ColorMode, ConfigurationChange, ResourceConfiguration};
use crate::object::{ResourceParam, ResourceType};
use crate::theme::ThemeStyle;

/// Adapter variant tag
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AdapterKind {
    /// No platform bundle; every lookup yields the typed default
    Default,
    /// Backed by a platform resource manager
    Platform,
}

/// Resolution interface for one bundle/module
#[allow(unused_variables)]
pub trait ResourceAdapter: Send + Sync {
    fn kind(&self) -> AdapterKind;

    /// Apply an environment change; skips the platform call when nothing material
    /// changed, unless `theme_flag` forces it
    fn update_config(&self, config: &ResourceConfiguration, theme_flag: bool);

    /// Switch the color mode unconditionally
    fn update_color_mode(&self, color_mode: ColorMode);

    /// Effective color mode. Dark is only reported when the app set its color mode
    /// explicitly or ships dark resources.
    fn resource_color_mode(&self) -> ColorMode;

    fn set_app_has_dark_res(&self, has_dark_res: bool) {}

    fn app_has_dark_res(&self) -> bool {
        false
    }

    /// Whether resource `id` has a dark variant
    fn exist_dark_res_by_id(&self, id: u32) -> bool {
        false
    }

    fn exist_dark_res_by_name(&self, name: &str, res_type: ResourceType) -> bool {
        false
    }

    /// A new, independent adapter with the flagged parts of `config` applied
    fn override_adapter(
        &self,
        config: &ResourceConfiguration,
        change: &ConfigurationChange,
    ) -> Arc<dyn ResourceAdapter>;

    /// Resolve a theme; negative ids select the fallback theme
    fn theme(&self, theme_id: i64) -> Option<Arc<ThemeStyle>> {
        None
    }

    fn pattern_by_name(&self, name: &str) -> Option<Arc<ThemeStyle>> {
        None
    }

    fn color(&self, id: u32) -> Color {
        Color::default()
    }

    fn color_by_name(&self, name: &str) -> Color {
        Color::default()
    }

    fn dimension(&self, id: u32) -> Dimension {
        Dimension::default()
    }

    fn dimension_by_name(&self, name: &str) -> Dimension {
        Dimension::default()
    }

    fn double(&self, id: u32) -> f64 {
        0.0
    }

    fn double_by_name(&self, name: &str) -> f64 {
        0.0
    }

    fn string(&self, id: u32) -> String {
        String::new()
    }

    fn string_by_name(&self, name: &str) -> String {
        String::new()
    }

    /// Plural form for `quantity` with `quantity` and then `args` substituted
    fn plural_string(&self, id: u32, quantity: i64, args: &[ResourceParam]) -> String {
        String::new()
    }

    fn plural_string_by_name(&self, name: &str, quantity: i64, args: &[ResourceParam]) -> String {
        String::new()
    }

    fn string_array(&self, id: u32) -> Vec<String> {
        Vec::new()
    }

    fn string_array_by_name(&self, name: &str) -> Vec<String> {
        Vec::new()
    }

    fn integer(&self, id: u32) -> i32 {
        0
    }

    fn integer_by_name(&self, name: &str) -> i32 {
        0
    }

    fn int_array(&self, id: u32) -> Vec<i32> {
        Vec::new()
    }

    fn int_array_by_name(&self, name: &str) -> Vec<i32> {
        Vec::new()
    }

    fn boolean(&self, id: u32) -> bool {
        false
    }

    fn boolean_by_name(&self, name: &str) -> bool {
        false
    }

    fn symbol(&self, id: u32) -> u32 {
        0
    }

    fn symbol_by_name(&self, name: &str) -> u32 {
        0
    }

    fn media_path(&self, id: u32) -> String {
        String::new()
    }

    fn media_path_by_name(&self, name: &str) -> String {
        String::new()
    }

    fn media_data(&self, id: u32) -> Vec<u8> {
        Vec::new()
    }

    fn media_data_by_name(&self, name: &str) -> Vec<u8> {
        Vec::new()
    }

    fn raw_file_path(&self, name: &str) -> String {
        String::new()
    }

    fn raw_file_data(&self, name: &str) -> Vec<u8> {
        Vec::new()
    }

    /// Numeric id of a named resource, 0 when unknown
    fn identifier_by_name(&self, name: &str, res_type: ResourceType) -> u32 {
        0
    }
}
