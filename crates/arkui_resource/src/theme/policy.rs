//! Theme load policy
//!
//! Patterns found in theme data fall into three groups: loaded synchronously and
//! attached by name, excluded from eager loading, and everything else, which is
//! expanded in place. A short list is preloaded in the background after the theme is
//! built.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Id of the built-in `ohos_theme`
pub const DEFAULT_FALLBACK_THEME_ID: u32 = 125829872;

/// Serialized theme policy (`[manager.theme]` in `arkui.toml`)
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ThemeConfig {
    #[serde(default = "default_fallback_theme_id")]
    pub fallback_theme_id: u32,
    #[serde(default = "default_sync_load")]
    pub sync_load: Vec<String>,
    #[serde(default = "default_not_sync_load")]
    pub not_sync_load: Vec<String>,
    #[serde(default = "default_async_load")]
    pub async_load: Vec<String>,
}

fn default_fallback_theme_id() -> u32 {
    DEFAULT_FALLBACK_THEME_ID
}

fn strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn default_sync_load() -> Vec<String> {
    strings(&[
        "app",
        "button",
        "checkbox",
        "list_item",
        "picker",
        "progress",
        "radio",
        "search",
        "select",
        "slider",
        "switch",
        "text",
        "textfield",
        "text_overlay",
        "toggle",
        "rating",
        "badge",
        "divider",
        "loading_progress",
        "container_modal",
    ])
}

fn default_not_sync_load() -> Vec<String> {
    strings(&[
        "shadow",
        "dialog",
        "scroll_bar",
        "sheet",
        "menu",
        "popup",
        "toast",
        "bubble",
        "blur_style_common",
        "icon",
        "navigation_bar",
        "tab",
        "video",
    ])
}

fn default_async_load() -> Vec<String> {
    strings(&["icon", "shadow", "blur_style_common"])
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            fallback_theme_id: default_fallback_theme_id(),
            sync_load: default_sync_load(),
            not_sync_load: default_not_sync_load(),
            async_load: default_async_load(),
        }
    }
}

/// How a pattern entry in theme data is handled
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PatternLoad {
    /// Fetch now and attach as a named group
    Sync,
    /// Fetch children and expand them into the theme
    Expand,
    /// Leave for on-demand lookup
    Skip,
}

/// Lookup-ready form of [`ThemeConfig`]
#[derive(Clone, Debug)]
pub struct ThemeLoadPolicy {
    fallback_theme_id: u32,
    sync_load: FxHashSet<String>,
    not_sync_load: FxHashSet<String>,
    async_load: Vec<String>,
}

impl ThemeLoadPolicy {
    pub fn fallback_theme_id(&self) -> u32 {
        self.fallback_theme_id
    }

    pub fn classify(&self, tag: &str) -> PatternLoad {
        if self.sync_load.contains(tag) {
            PatternLoad::Sync
        } else if !self.not_sync_load.contains(tag) {
            PatternLoad::Expand
        } else {
            PatternLoad::Skip
        }
    }

    pub fn async_load(&self) -> &[String] {
        &self.async_load
    }
}

impl From<&ThemeConfig> for ThemeLoadPolicy {
    fn from(config: &ThemeConfig) -> Self {
        Self {
            fallback_theme_id: config.fallback_theme_id,
            sync_load: config.sync_load.iter().cloned().collect(),
            not_sync_load: config.not_sync_load.iter().cloned().collect(),
            async_load: config.async_load.clone(),
        }
    }
}

impl Default for ThemeLoadPolicy {
    fn default() -> Self {
        Self::from(&ThemeConfig::default())
    }
}
