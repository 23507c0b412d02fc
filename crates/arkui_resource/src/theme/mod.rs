//! Theme styles
//!
//! A [`ThemeStyle`] is the parsed result of a theme lookup: typed attributes keyed by
//! tag, where an attribute may itself be a nested pattern. Patterns preloaded in the
//! background are attached after construction, so attributes live behind a lock and
//! [`ThemeStyle::check_loaded`] lets a caller wait for the preload to land.

mod policy;
mod resolve;

pub use policy::{PatternLoad, ThemeConfig, ThemeLoadPolicy, DEFAULT_FALLBACK_THEME_ID};
pub(crate) use resolve::{build_theme, preload_patterns};

use std::sync::Arc;
use std::time::{Duration, Instant};

use arkui_core::{Color, Dimension};
use parking_lot::{Condvar, Mutex, RwLock};
use rustc_hash::FxHashMap;

use crate::object::ResourceType;
use crate::platform::{PatternData, ResValue};

/// A single typed theme attribute
#[derive(Clone, Debug, PartialEq)]
pub enum ThemeAttr {
    Color(Color),
    Dimension(Dimension),
    Double(f64),
    Int(i64),
    Str(String),
    Symbol(u32),
    Pattern(Arc<ThemeStyle>),
}

impl ThemeAttr {
    /// Parse a raw theme value according to its declared type.
    ///
    /// Values that do not parse as their declared type are kept as strings.
    pub fn parse(value: &ResValue) -> Self {
        let raw = value.value.trim();
        let parsed = match value.res_type {
            ResourceType::Color => raw.parse::<Color>().ok().map(Self::Color),
            ResourceType::Float => {
                if raw.parse::<f64>().is_ok() {
                    raw.parse().ok().map(Self::Double)
                } else {
                    raw.parse::<Dimension>().ok().map(Self::Dimension)
                }
            }
            ResourceType::Integer => raw.parse().ok().map(Self::Int),
            ResourceType::Symbol => parse_u32(raw).map(Self::Symbol),
            _ => None,
        };
        parsed.unwrap_or_else(|| Self::Str(value.value.clone()))
    }
}

fn parse_u32(raw: &str) -> Option<u32> {
    match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => raw.parse().ok(),
    }
}

/// Resolved theme or pattern
#[derive(Debug, Default)]
pub struct ThemeStyle {
    name: String,
    attrs: RwLock<FxHashMap<String, ThemeAttr>>,
    preload_pending: Mutex<bool>,
    preload_done: Condvar,
}

impl PartialEq for ThemeStyle {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && *self.attrs.read() == *other.attrs.read()
    }
}

impl ThemeStyle {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Build a style from a flat pattern map
    pub fn from_pattern(name: impl Into<String>, data: &PatternData) -> Self {
        let style = Self::new(name);
        {
            let mut attrs = style.attrs.write();
            for (tag, value) in data {
                attrs.insert(tag.clone(), ThemeAttr::parse(value));
            }
        }
        style
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_attr(&self, tag: impl Into<String>, attr: ThemeAttr) {
        self.attrs.write().insert(tag.into(), attr);
    }

    pub fn attr(&self, tag: &str) -> Option<ThemeAttr> {
        self.attrs.read().get(tag).cloned()
    }

    pub fn color(&self, tag: &str) -> Option<Color> {
        match self.attrs.read().get(tag) {
            Some(ThemeAttr::Color(c)) => Some(*c),
            _ => None,
        }
    }

    pub fn dimension(&self, tag: &str) -> Option<Dimension> {
        match self.attrs.read().get(tag) {
            Some(ThemeAttr::Dimension(d)) => Some(*d),
            Some(ThemeAttr::Double(v)) => Some(Dimension::vp(*v)),
            _ => None,
        }
    }

    pub fn double(&self, tag: &str) -> Option<f64> {
        match self.attrs.read().get(tag) {
            Some(ThemeAttr::Double(v)) => Some(*v),
            Some(ThemeAttr::Int(v)) => Some(*v as f64),
            Some(ThemeAttr::Dimension(d)) => Some(d.value),
            _ => None,
        }
    }

    pub fn int(&self, tag: &str) -> Option<i64> {
        match self.attrs.read().get(tag) {
            Some(ThemeAttr::Int(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn string(&self, tag: &str) -> Option<String> {
        match self.attrs.read().get(tag) {
            Some(ThemeAttr::Str(s)) => Some(s.clone()),
            _ => None,
        }
    }

    pub fn symbol(&self, tag: &str) -> Option<u32> {
        match self.attrs.read().get(tag) {
            Some(ThemeAttr::Symbol(v)) => Some(*v),
            _ => None,
        }
    }

    /// Nested pattern attached under `tag`
    pub fn pattern(&self, tag: &str) -> Option<Arc<ThemeStyle>> {
        match self.attrs.read().get(tag) {
            Some(ThemeAttr::Pattern(p)) => Some(p.clone()),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.attrs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.read().is_empty()
    }

    /// Attribute tags in sorted order
    pub fn tags(&self) -> Vec<String> {
        let mut tags: Vec<_> = self.attrs.read().keys().cloned().collect();
        tags.sort();
        tags
    }

    pub(crate) fn begin_preload(&self) {
        *self.preload_pending.lock() = true;
    }

    pub(crate) fn finish_preload(&self) {
        *self.preload_pending.lock() = false;
        self.preload_done.notify_all();
    }

    /// Wait up to `timeout` for the background preload to finish.
    ///
    /// Returns true if nothing is pending by the time it returns.
    pub fn check_loaded(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut pending = self.preload_pending.lock();
        while *pending {
            if self.preload_done.wait_until(&mut pending, deadline).timed_out() {
                return !*pending;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arkui_core::DimensionUnit;
    use pretty_assertions::assert_eq;

    fn value(res_type: ResourceType, value: &str) -> ResValue {
        ResValue::new(res_type, value)
    }

    #[test]
    fn attributes_parse_by_declared_type() {
        assert_eq!(
            ThemeAttr::parse(&value(ResourceType::Color, "#FF007DFF")),
            ThemeAttr::Color(Color::from_argb(0xFF007DFF))
        );
        assert_eq!(
            ThemeAttr::parse(&value(ResourceType::Float, "16vp")),
            ThemeAttr::Dimension(Dimension::new(16.0, DimensionUnit::Vp))
        );
        assert_eq!(ThemeAttr::parse(&value(ResourceType::Float, "0.6")), ThemeAttr::Double(0.6));
        assert_eq!(ThemeAttr::parse(&value(ResourceType::Integer, "3")), ThemeAttr::Int(3));
        assert_eq!(
            ThemeAttr::parse(&value(ResourceType::Symbol, "0xF0001")),
            ThemeAttr::Symbol(0xF0001)
        );
        assert_eq!(
            ThemeAttr::parse(&value(ResourceType::Color, "not-a-color")),
            ThemeAttr::Str("not-a-color".to_string())
        );
    }

    #[test]
    fn typed_accessors() {
        let mut data = PatternData::default();
        data.insert("fg".into(), value(ResourceType::Color, "#FF000000"));
        data.insert("radius".into(), value(ResourceType::Float, "8px"));
        data.insert("label".into(), value(ResourceType::String, "OK"));
        let style = ThemeStyle::from_pattern("button", &data);

        assert_eq!(style.color("fg"), Some(Color::BLACK));
        assert_eq!(style.dimension("radius"), Some(Dimension::px(8.0)));
        assert_eq!(style.string("label").as_deref(), Some("OK"));
        assert_eq!(style.color("label"), None);
        assert_eq!(style.tags(), vec!["fg", "label", "radius"]);
    }

    #[test]
    fn check_loaded_without_preload_returns_immediately() {
        let style = ThemeStyle::new("t");
        assert!(style.check_loaded(Duration::from_millis(0)));
    }

    #[test]
    fn check_loaded_waits_for_preload() {
        let style = Arc::new(ThemeStyle::new("t"));
        style.begin_preload();
        assert!(!style.check_loaded(Duration::from_millis(5)));

        let worker = style.clone();
        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(10));
            worker.finish_preload();
        });
        assert!(style.check_loaded(Duration::from_secs(5)));
        handle.join().unwrap();
    }
}
