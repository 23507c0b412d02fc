//! In-memory resource index
//!
//! A [`ResourceIndex`] is a pre-loaded table of resources, themes and patterns, read
//! from TOML. [`IndexedResourceManager`] serves it through the
//! [`PlatformResourceManager`] contract, selecting the best qualified variant for the
//! current [`ResConfig`]. It backs the default adapter, headless tools and tests.
//!
//! ```toml
//! [[resource]]
//! id = 16777216
//! name = "background"
//! type = "color"
//! value = "#FFFFFFFF"
//! variants = [{ color_mode = "dark", value = "#FF000000" }]
//!
//! [[resource]]
//! id = 16777217
//! name = "apples"
//! type = "plural"
//! plural = { one = "%d apple", other = "%d apples" }
//!
//! [[theme]]
//! id = 125829872
//! name = "ohos_theme"
//! attrs = { text_color = { type = "color", value = "$color:background" } }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use arkui_core::Color;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::config::{ColorMode, DeviceType, ResConfig};
use crate::error::{ResourceError, Result};
use crate::object::ResourceType;
use crate::platform::{
    PatternData, PlatformResourceManager, PlatformResult, PlatformStatus, ResValue,
};

const MAX_REFERENCE_DEPTH: u8 = 8;

/// Languages without a singular plural form
const NO_SINGULAR_LANGUAGES: &[&str] = &["zh", "ja", "ko", "th", "vi"];

/// Values carried by a resource or one of its variants
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plural: Option<BTreeMap<String, String>>,
}

impl ValueSet {
    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.values.is_none() && self.plural.is_none()
    }
}

/// Conditions under which a variant applies; unset fields match anything
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Qualifiers {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_mode: Option<ColorMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_type: Option<DeviceType>,
}

impl Qualifiers {
    /// Match score against `config`, or `None` if any set qualifier disagrees.
    ///
    /// Language outranks region, region outranks device, device outranks color mode.
    fn score(&self, config: &ResConfig) -> Option<u32> {
        let mut score = 0;
        if let Some(language) = &self.language {
            if !language.eq_ignore_ascii_case(&config.locale.language) {
                return None;
            }
            score += 8;
        }
        if let Some(region) = &self.region {
            if !region.eq_ignore_ascii_case(&config.locale.region) {
                return None;
            }
            score += 4;
        }
        if let Some(device) = self.device_type {
            if device != config.device_type {
                return None;
            }
            score += 2;
        }
        if let Some(mode) = self.color_mode {
            let wanted = if config.color_mode.is_dark() {
                ColorMode::Dark
            } else {
                ColorMode::Light
            };
            if mode != wanted {
                return None;
            }
            score += 1;
        }
        Some(score)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariantEntry {
    #[serde(flatten)]
    pub qualifiers: Qualifiers,
    #[serde(flatten)]
    pub values: ValueSet,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResourceEntry {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub res_type: ResourceType,
    #[serde(flatten)]
    pub values: ValueSet,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<VariantEntry>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttrEntry {
    #[serde(rename = "type")]
    pub res_type: ResourceType,
    pub value: String,
}

/// A theme or pattern: a named bag of typed attributes
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatternEntry {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub attrs: BTreeMap<String, AttrEntry>,
}

/// On-disk layout of a resource index
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexDocument {
    #[serde(default, rename = "resource")]
    pub resources: Vec<ResourceEntry>,
    #[serde(default, rename = "theme")]
    pub themes: Vec<PatternEntry>,
    #[serde(default, rename = "pattern")]
    pub patterns: Vec<PatternEntry>,
}

/// A validated, lookup-ready resource index
#[derive(Debug, Default)]
pub struct ResourceIndex {
    doc: IndexDocument,
    base_dir: Option<PathBuf>,
    by_id: FxHashMap<u32, usize>,
    by_name: FxHashMap<(ResourceType, String), usize>,
    themes_by_id: FxHashMap<u32, usize>,
    patterns_by_id: FxHashMap<u32, usize>,
    patterns_by_name: FxHashMap<String, usize>,
}

impl ResourceIndex {
    /// Parse and validate TOML index content
    pub fn from_toml_str(src: &str) -> Result<Self> {
        let doc: IndexDocument = toml::from_str(src)?;
        Self::from_document(doc)
    }

    /// Load an index file; media and raw files resolve relative to its directory
    pub fn from_path(path: &Path) -> Result<Self> {
        let src = std::fs::read_to_string(path)?;
        let mut index = Self::from_toml_str(&src)?;
        index.base_dir = path.parent().map(Path::to_path_buf);
        Ok(index)
    }

    pub fn from_document(doc: IndexDocument) -> Result<Self> {
        let mut index = ResourceIndex::default();

        for (i, entry) in doc.resources.iter().enumerate() {
            if entry.values.is_empty() && entry.variants.is_empty() {
                return Err(ResourceError::InvalidIndex(format!(
                    "resource `{}` ({}) has no value",
                    entry.name, entry.id
                )));
            }
            if index.by_id.insert(entry.id, i).is_some() {
                return Err(ResourceError::InvalidIndex(format!(
                    "duplicate resource id {}",
                    entry.id
                )));
            }
            if index
                .by_name
                .insert((entry.res_type, entry.name.clone()), i)
                .is_some()
            {
                return Err(ResourceError::InvalidIndex(format!(
                    "duplicate {} resource `{}`",
                    entry.res_type, entry.name
                )));
            }
        }
        for (i, theme) in doc.themes.iter().enumerate() {
            if index.themes_by_id.insert(theme.id, i).is_some() {
                return Err(ResourceError::InvalidIndex(format!(
                    "duplicate theme id {}",
                    theme.id
                )));
            }
        }
        for (i, pattern) in doc.patterns.iter().enumerate() {
            if index.patterns_by_id.insert(pattern.id, i).is_some() {
                return Err(ResourceError::InvalidIndex(format!(
                    "duplicate pattern id {}",
                    pattern.id
                )));
            }
            index.patterns_by_name.insert(pattern.name.clone(), i);
        }

        index.doc = doc;
        Ok(index)
    }

    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    pub fn resource_count(&self) -> usize {
        self.doc.resources.len()
    }

    pub fn document(&self) -> &IndexDocument {
        &self.doc
    }

    fn entry_by_id(&self, id: u32) -> PlatformResult<&ResourceEntry> {
        self.by_id
            .get(&id)
            .map(|&i| &self.doc.resources[i])
            .ok_or(PlatformStatus::NotFoundById)
    }

    fn entry_by_name(&self, name: &str, res_type: ResourceType) -> PlatformResult<&ResourceEntry> {
        if name.is_empty() {
            return Err(PlatformStatus::InvalidName);
        }
        self.by_name
            .get(&(res_type, name.to_string()))
            .map(|&i| &self.doc.resources[i])
            .ok_or(PlatformStatus::NotFoundByName)
    }

    fn resolve_path(&self, relative: &str) -> PathBuf {
        match &self.base_dir {
            Some(dir) => dir.join(relative),
            None => PathBuf::from(relative),
        }
    }
}

/// Best matching value set for `config`, with the variant's qualifiers
fn select<'a>(entry: &'a ResourceEntry, config: &ResConfig) -> Option<(&'a ValueSet, Option<&'a Qualifiers>)> {
    let mut best: Option<(u32, &ValueSet, Option<&Qualifiers>)> = None;
    if !entry.values.is_empty() {
        best = Some((0, &entry.values, None));
    }
    for variant in &entry.variants {
        let Some(score) = variant.qualifiers.score(config) else {
            continue;
        };
        if best.map_or(true, |(s, _, _)| score > s) {
            best = Some((score, &variant.values, Some(&variant.qualifiers)));
        }
    }
    best.map(|(_, values, qualifiers)| (values, qualifiers))
}

/// Pick the plural form for `quantity`
pub fn plural_category(language: &str, quantity: i64, forms: &BTreeMap<String, String>) -> &'static str {
    if quantity == 0 && forms.contains_key("zero") {
        return "zero";
    }
    let has_singular = !NO_SINGULAR_LANGUAGES
        .iter()
        .any(|l| l.eq_ignore_ascii_case(language));
    if quantity == 1 && has_singular && forms.contains_key("one") {
        return "one";
    }
    "other"
}

fn parse_number_prefix(value: &str) -> Option<(f32, String)> {
    let value = value.trim();
    let split = value
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
        .unwrap_or(value.len());
    let (number, unit) = value.split_at(split);
    number.parse().ok().map(|n| (n, unit.trim().to_string()))
}

fn parse_symbol(value: &str) -> Option<u32> {
    let value = value.trim();
    match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => value.parse().ok(),
    }
}

/// Platform resource manager over a [`ResourceIndex`]
pub struct IndexedResourceManager {
    index: Arc<ResourceIndex>,
    config: RwLock<ResConfig>,
    updates: AtomicUsize,
}

impl IndexedResourceManager {
    pub fn new(index: Arc<ResourceIndex>) -> Self {
        Self::with_config(index, ResConfig::default())
    }

    pub fn with_config(index: Arc<ResourceIndex>, config: ResConfig) -> Self {
        Self {
            index,
            config: RwLock::new(config),
            updates: AtomicUsize::new(0),
        }
    }

    pub fn index(&self) -> &Arc<ResourceIndex> {
        &self.index
    }

    /// Number of accepted `update_res_config` calls
    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    fn selected<'a>(&self, entry: &'a ResourceEntry) -> PlatformResult<&'a ValueSet> {
        let config = self.config.read();
        select(entry, &config)
            .map(|(values, _)| values)
            .ok_or(PlatformStatus::NotFoundById)
    }

    /// Single value of `entry`, following `$type:name` references
    fn single_value(&self, entry: &ResourceEntry, depth: u8) -> PlatformResult<String> {
        let value = self
            .selected(entry)?
            .value
            .clone()
            .ok_or(PlatformStatus::NotFoundById)?;
        self.follow_reference(value, depth)
    }

    fn follow_reference(&self, value: String, depth: u8) -> PlatformResult<String> {
        let Some(reference) = value.strip_prefix('$') else {
            return Ok(value);
        };
        let Some((type_name, name)) = reference.split_once(':') else {
            return Ok(value);
        };
        let Some(res_type) = ResourceType::from_name(type_name) else {
            return Ok(value);
        };
        // Pattern references are resolved by the theme layer.
        if res_type == ResourceType::Pattern {
            return Ok(value);
        }
        if depth >= MAX_REFERENCE_DEPTH {
            return Err(PlatformStatus::RefTooDeep);
        }
        let target = self.index.entry_by_name(name, res_type)?;
        self.single_value(target, depth + 1)
    }

    fn typed_by_id(&self, id: u32, res_type: ResourceType) -> PlatformResult<&ResourceEntry> {
        let entry = self.index.entry_by_id(id)?;
        if entry.res_type != res_type {
            return Err(PlatformStatus::NotFoundById);
        }
        Ok(entry)
    }

    fn color_of(&self, entry: &ResourceEntry) -> PlatformResult<u32> {
        let value = self.single_value(entry, 0)?;
        value
            .parse::<Color>()
            .map(|c| c.to_argb())
            .map_err(|_| PlatformStatus::FormatFailed)
    }

    fn float_of(&self, entry: &ResourceEntry) -> PlatformResult<(f32, String)> {
        parse_number_prefix(&self.single_value(entry, 0)?).ok_or(PlatformStatus::FormatFailed)
    }

    fn array_of(&self, entry: &ResourceEntry) -> PlatformResult<Vec<String>> {
        self.selected(entry)?
            .values
            .clone()
            .ok_or(PlatformStatus::NotFoundById)
    }

    fn int_array_of(&self, entry: &ResourceEntry) -> PlatformResult<Vec<i32>> {
        self.array_of(entry)?
            .iter()
            .map(|v| v.trim().parse().map_err(|_| PlatformStatus::FormatFailed))
            .collect()
    }

    fn plural_of(&self, entry: &ResourceEntry, quantity: i64) -> PlatformResult<String> {
        let forms = self
            .selected(entry)?
            .plural
            .as_ref()
            .ok_or(PlatformStatus::NotFoundById)?;
        let language = self.config.read().locale.language.clone();
        let category = plural_category(&language, quantity, forms);
        forms
            .get(category)
            .or_else(|| forms.get("other"))
            .cloned()
            .ok_or(PlatformStatus::NotFoundById)
    }

    fn media_path_of(&self, entry: &ResourceEntry) -> PlatformResult<String> {
        let value = self.single_value(entry, 0)?;
        Ok(self.index.resolve_path(&value).to_string_lossy().into_owned())
    }

    fn read_file(path: &str) -> PlatformResult<Vec<u8>> {
        std::fs::read(path).map_err(|e| {
            tracing::debug!("failed to read resource file {}: {}", path, e);
            PlatformStatus::InvalidPath
        })
    }

    fn config_for(&self, entry: &ResourceEntry) -> PlatformResult<ResConfig> {
        let mut resolved = self.config.read().clone();
        let (_, qualifiers) = select(entry, &resolved).ok_or(PlatformStatus::NotFoundById)?;
        resolved.color_mode = qualifiers
            .and_then(|q| q.color_mode)
            .unwrap_or(ColorMode::Undefined);
        Ok(resolved)
    }

    fn pattern_data(&self, entry: &PatternEntry) -> PlatformResult<PatternData> {
        let mut data = PatternData::default();
        for (tag, attr) in &entry.attrs {
            let value = if attr.res_type == ResourceType::Pattern {
                attr.value.clone()
            } else {
                self.follow_reference(attr.value.clone(), 0)?
            };
            data.insert(tag.clone(), ResValue::new(attr.res_type, value));
        }
        Ok(data)
    }
}

impl PlatformResourceManager for IndexedResourceManager {
    fn color_by_id(&self, id: u32) -> PlatformResult<u32> {
        self.color_of(self.typed_by_id(id, ResourceType::Color)?)
    }

    fn color_by_name(&self, name: &str) -> PlatformResult<u32> {
        self.color_of(self.index.entry_by_name(name, ResourceType::Color)?)
    }

    fn float_by_id(&self, id: u32) -> PlatformResult<(f32, String)> {
        self.float_of(self.typed_by_id(id, ResourceType::Float)?)
    }

    fn float_by_name(&self, name: &str) -> PlatformResult<(f32, String)> {
        self.float_of(self.index.entry_by_name(name, ResourceType::Float)?)
    }

    fn string_by_id(&self, id: u32) -> PlatformResult<String> {
        self.single_value(self.typed_by_id(id, ResourceType::String)?, 0)
    }

    fn string_by_name(&self, name: &str) -> PlatformResult<String> {
        self.single_value(self.index.entry_by_name(name, ResourceType::String)?, 0)
    }

    fn string_array_by_id(&self, id: u32) -> PlatformResult<Vec<String>> {
        self.array_of(self.typed_by_id(id, ResourceType::StrArray)?)
    }

    fn string_array_by_name(&self, name: &str) -> PlatformResult<Vec<String>> {
        self.array_of(self.index.entry_by_name(name, ResourceType::StrArray)?)
    }

    fn plural_by_id(&self, id: u32, quantity: i64) -> PlatformResult<String> {
        self.plural_of(self.typed_by_id(id, ResourceType::Plural)?, quantity)
    }

    fn plural_by_name(&self, name: &str, quantity: i64) -> PlatformResult<String> {
        self.plural_of(self.index.entry_by_name(name, ResourceType::Plural)?, quantity)
    }

    fn integer_by_id(&self, id: u32) -> PlatformResult<i32> {
        let value = self.single_value(self.typed_by_id(id, ResourceType::Integer)?, 0)?;
        value.trim().parse().map_err(|_| PlatformStatus::FormatFailed)
    }

    fn integer_by_name(&self, name: &str) -> PlatformResult<i32> {
        let entry = self.index.entry_by_name(name, ResourceType::Integer)?;
        let value = self.single_value(entry, 0)?;
        value.trim().parse().map_err(|_| PlatformStatus::FormatFailed)
    }

    fn int_array_by_id(&self, id: u32) -> PlatformResult<Vec<i32>> {
        self.int_array_of(self.typed_by_id(id, ResourceType::IntArray)?)
    }

    fn int_array_by_name(&self, name: &str) -> PlatformResult<Vec<i32>> {
        self.int_array_of(self.index.entry_by_name(name, ResourceType::IntArray)?)
    }

    fn boolean_by_id(&self, id: u32) -> PlatformResult<bool> {
        let value = self.single_value(self.typed_by_id(id, ResourceType::Boolean)?, 0)?;
        value.trim().parse().map_err(|_| PlatformStatus::FormatFailed)
    }

    fn boolean_by_name(&self, name: &str) -> PlatformResult<bool> {
        let entry = self.index.entry_by_name(name, ResourceType::Boolean)?;
        let value = self.single_value(entry, 0)?;
        value.trim().parse().map_err(|_| PlatformStatus::FormatFailed)
    }

    fn symbol_by_id(&self, id: u32) -> PlatformResult<u32> {
        let value = self.single_value(self.typed_by_id(id, ResourceType::Symbol)?, 0)?;
        parse_symbol(&value).ok_or(PlatformStatus::FormatFailed)
    }

    fn symbol_by_name(&self, name: &str) -> PlatformResult<u32> {
        let entry = self.index.entry_by_name(name, ResourceType::Symbol)?;
        parse_symbol(&self.single_value(entry, 0)?).ok_or(PlatformStatus::FormatFailed)
    }

    fn media_path_by_id(&self, id: u32) -> PlatformResult<String> {
        self.media_path_of(self.typed_by_id(id, ResourceType::Media)?)
    }

    fn media_path_by_name(&self, name: &str) -> PlatformResult<String> {
        self.media_path_of(self.index.entry_by_name(name, ResourceType::Media)?)
    }

    fn media_data_by_id(&self, id: u32) -> PlatformResult<Vec<u8>> {
        Self::read_file(&self.media_path_by_id(id)?)
    }

    fn media_data_by_name(&self, name: &str) -> PlatformResult<Vec<u8>> {
        Self::read_file(&self.media_path_by_name(name)?)
    }

    fn raw_file_path(&self, name: &str) -> PlatformResult<String> {
        if name.is_empty() || name.split('/').any(|part| part == "..") {
            return Err(PlatformStatus::InvalidPath);
        }
        let path = self.index.resolve_path(&format!("rawfile/{name}"));
        Ok(path.to_string_lossy().into_owned())
    }

    fn raw_file_data(&self, name: &str) -> PlatformResult<Vec<u8>> {
        Self::read_file(&self.raw_file_path(name)?)
    }

    fn identifier_by_name(&self, name: &str, res_type: ResourceType) -> PlatformResult<u32> {
        Ok(self.index.entry_by_name(name, res_type)?.id)
    }

    fn theme_data_by_id(&self, id: u32) -> PlatformResult<PatternData> {
        let &i = self
            .index
            .themes_by_id
            .get(&id)
            .ok_or(PlatformStatus::NotFoundById)?;
        self.pattern_data(&self.index.doc.themes[i])
    }

    fn pattern_by_id(&self, id: u32) -> PlatformResult<PatternData> {
        let &i = self
            .index
            .patterns_by_id
            .get(&id)
            .ok_or(PlatformStatus::NotFoundById)?;
        self.pattern_data(&self.index.doc.patterns[i])
    }

    fn pattern_by_name(&self, name: &str) -> PlatformResult<PatternData> {
        let &i = self
            .index
            .patterns_by_name
            .get(name)
            .ok_or(PlatformStatus::NotFoundByName)?;
        self.pattern_data(&self.index.doc.patterns[i])
    }

    fn res_config(&self) -> ResConfig {
        self.config.read().clone()
    }

    fn update_res_config(&self, config: &ResConfig, is_update_theme: bool) -> PlatformResult<()> {
        tracing::trace!(
            "indexed manager config -> {} {:?} (theme: {})",
            config.locale,
            config.color_mode,
            is_update_theme
        );
        *self.config.write() = config.clone();
        self.updates.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn res_config_by_id(&self, id: u32) -> PlatformResult<ResConfig> {
        self.config_for(self.index.entry_by_id(id)?)
    }

    fn res_config_by_name(&self, name: &str, res_type: ResourceType) -> PlatformResult<ResConfig> {
        self.config_for(self.index.entry_by_name(name, res_type)?)
    }

    fn override_manager(&self, config: &ResConfig) -> PlatformResult<Arc<dyn PlatformResourceManager>> {
        Ok(Arc::new(Self::with_config(self.index.clone(), config.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Locale, ResourceConfiguration};
    use pretty_assertions::assert_eq;

    const INDEX: &str = r##"
[[resource]]
id = 1
name = "background"
type = "color"
value = "#FFFFFFFF"
variants = [{ color_mode = "dark", value = "#FF000000" }]

[[resource]]
id = 2
name = "title"
type = "string"
value = "Hello"
variants = [
    { language = "zh", value = "你好" },
    { language = "zh", region = "TW", value = "您好" },
]

[[resource]]
id = 3
name = "apples"
type = "plural"
plural = { one = "%d apple", other = "%d apples" }

[[resource]]
id = 4
name = "accent"
type = "color"
value = "$color:background"

[[resource]]
id = 5
name = "padding"
type = "float"
value = "12.5fp"

[[resource]]
id = 6
name = "loop_a"
type = "string"
value = "$string:loop_b"

[[resource]]
id = 7
name = "loop_b"
type = "string"
value = "$string:loop_a"

[[resource]]
id = 8
name = "weekdays"
type = "strarray"
values = ["Mon", "Tue"]

[[resource]]
id = 9
name = "icon_home"
type = "symbol"
value = "0xF0001"
"##;

    fn manager() -> IndexedResourceManager {
        IndexedResourceManager::new(Arc::new(ResourceIndex::from_toml_str(INDEX).unwrap()))
    }

    fn config(locale: &str, mode: ColorMode) -> ResConfig {
        ResConfig::from(&ResourceConfiguration::default().with_locale(locale).with_color_mode(mode))
    }

    #[test]
    fn dark_variant_follows_color_mode() {
        let m = manager();
        assert_eq!(m.color_by_id(1), Ok(0xFFFFFFFF));
        m.update_res_config(&config("en", ColorMode::Dark), false).unwrap();
        assert_eq!(m.color_by_name("background"), Ok(0xFF000000));
        assert_eq!(m.res_config_by_id(1).unwrap().color_mode, ColorMode::Dark);
        assert_eq!(m.update_count(), 1);
    }

    #[test]
    fn most_specific_locale_wins() {
        let m = manager();
        assert_eq!(m.string_by_id(2).unwrap(), "Hello");
        m.update_res_config(&config("zh-CN", ColorMode::Light), false).unwrap();
        assert_eq!(m.string_by_id(2).unwrap(), "你好");
        m.update_res_config(&config("zh-TW", ColorMode::Light), false).unwrap();
        assert_eq!(m.string_by_id(2).unwrap(), "您好");
        assert_eq!(m.res_config().locale, Locale::parse("zh-TW"));
    }

    #[test]
    fn plural_forms_depend_on_language() {
        let m = manager();
        assert_eq!(m.plural_by_id(3, 1).unwrap(), "%d apple");
        assert_eq!(m.plural_by_id(3, 5).unwrap(), "%d apples");
        m.update_res_config(&config("ja", ColorMode::Light), false).unwrap();
        assert_eq!(m.plural_by_name("apples", 1).unwrap(), "%d apples");
    }

    #[test]
    fn references_resolve_and_cycles_fail() {
        let m = manager();
        assert_eq!(m.color_by_id(4), Ok(0xFFFFFFFF));
        assert_eq!(m.string_by_id(6), Err(PlatformStatus::RefTooDeep));
    }

    #[test]
    fn typed_values() {
        let m = manager();
        assert_eq!(m.float_by_id(5).unwrap(), (12.5, "fp".to_string()));
        assert_eq!(m.string_array_by_name("weekdays").unwrap(), vec!["Mon", "Tue"]);
        assert_eq!(m.symbol_by_name("icon_home"), Ok(0xF0001));
        assert_eq!(m.identifier_by_name("padding", ResourceType::Float), Ok(5));
    }

    #[test]
    fn misses_report_platform_codes() {
        let m = manager();
        assert_eq!(m.color_by_id(999), Err(PlatformStatus::NotFoundById));
        assert_eq!(m.color_by_id(2), Err(PlatformStatus::NotFoundById));
        assert_eq!(m.color_by_name("nope"), Err(PlatformStatus::NotFoundByName));
        assert_eq!(m.color_by_name(""), Err(PlatformStatus::InvalidName));
        assert_eq!(m.raw_file_path("../secret"), Err(PlatformStatus::InvalidPath));
    }

    #[test]
    fn unqualified_resources_report_undefined_color_mode() {
        let m = manager();
        assert_eq!(m.res_config_by_id(2).unwrap().color_mode, ColorMode::Undefined);
    }

    #[test]
    fn override_manager_is_independent() {
        let m = manager();
        let dark = m.override_manager(&config("en", ColorMode::Dark)).unwrap();
        assert_eq!(dark.color_by_id(1), Ok(0xFF000000));
        assert_eq!(m.color_by_id(1), Ok(0xFFFFFFFF));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let src = r#"
[[resource]]
id = 1
name = "a"
type = "string"
value = "x"

[[resource]]
id = 1
name = "b"
type = "string"
value = "y"
"#;
        let err = ResourceIndex::from_toml_str(src).unwrap_err();
        assert!(matches!(err, ResourceError::InvalidIndex(_)));
    }
}
