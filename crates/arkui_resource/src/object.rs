//! Resource requests
//!
//! A [`ResourceObject`] is what a call site hands to the resource layer: a numeric id
//! (or [`UNKNOWN_RESOURCE_ID`] to resolve by name), the expected type, string/number
//! parameters, and an optional bundle/module scope.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

/// Sentinel id meaning "resolve by the name in the first parameter"
pub const UNKNOWN_RESOURCE_ID: i64 = -1;

/// Declared type of a resource, with the platform's numeric tags
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Color,
    Float,
    String,
    Plural,
    Boolean,
    #[serde(rename = "intarray")]
    IntArray,
    Integer,
    Pattern,
    #[serde(rename = "strarray")]
    StrArray,
    Media,
    #[serde(rename = "rawfile")]
    RawFile,
    Symbol,
    Theme,
}

impl ResourceType {
    pub fn code(&self) -> i32 {
        match self {
            Self::Color => 10001,
            Self::Float => 10002,
            Self::String => 10003,
            Self::Plural => 10004,
            Self::Boolean => 10005,
            Self::IntArray => 10006,
            Self::Integer => 10007,
            Self::Pattern => 10008,
            Self::StrArray => 10009,
            Self::Media => 20000,
            Self::RawFile => 30000,
            Self::Symbol => 40000,
            Self::Theme => 10010,
        }
    }

    /// Short name used in diagnostics and `app.<type>.<name>` references
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Float => "float",
            Self::String => "string",
            Self::Plural => "plural",
            Self::Boolean => "boolean",
            Self::IntArray => "intarray",
            Self::Integer => "integer",
            Self::Pattern => "pattern",
            Self::StrArray => "strarray",
            Self::Media => "media",
            Self::RawFile => "rawfile",
            Self::Symbol => "symbol",
            Self::Theme => "theme",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "color" => Self::Color,
            "float" => Self::Float,
            "string" => Self::String,
            "plural" => Self::Plural,
            "boolean" => Self::Boolean,
            "intarray" => Self::IntArray,
            "integer" => Self::Integer,
            "pattern" => Self::Pattern,
            "strarray" => Self::StrArray,
            "media" => Self::Media,
            "rawfile" => Self::RawFile,
            "symbol" => Self::Symbol,
            "theme" => Self::Theme,
            _ => return None,
        })
    }
}

impl TryFrom<i32> for ResourceType {
    type Error = i32;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Ok(match code {
            10001 => Self::Color,
            10002 => Self::Float,
            10003 => Self::String,
            10004 => Self::Plural,
            10005 => Self::Boolean,
            10006 => Self::IntArray,
            10007 => Self::Integer,
            10008 => Self::Pattern,
            10009 => Self::StrArray,
            10010 => Self::Theme,
            20000 => Self::Media,
            30000 => Self::RawFile,
            40000 => Self::Symbol,
            other => return Err(other),
        })
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resource parameter: a name or a format argument
#[derive(Clone, Debug, PartialEq)]
pub enum ResourceParam {
    Str(String),
    Int(i64),
    Float(f64),
}

impl ResourceParam {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Float(f) => Some(*f as i64),
            Self::Str(s) => s.trim().parse().ok(),
        }
    }
}

impl From<String> for ResourceParam {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&str> for ResourceParam {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<i64> for ResourceParam {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for ResourceParam {
    fn from(v: i32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<f64> for ResourceParam {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

/// Build the registry key for a bundle/module pair.
///
/// Empty when both parts are empty (the default adapter), `bundle.module` otherwise.
pub fn make_cache_key(bundle_name: &str, module_name: &str) -> String {
    if bundle_name.is_empty() && module_name.is_empty() {
        return String::new();
    }
    format!("{bundle_name}.{module_name}")
}

/// Strip an `app.color.` / `sys.float.` style prefix down to the bare resource name
pub fn actual_resource_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

/// Parameters of a request; rarely more than a name and one argument
pub type ResourceParams = SmallVec<[ResourceParam; 2]>;

/// A single resource request
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceObject {
    id: i64,
    res_type: ResourceType,
    params: ResourceParams,
    bundle_name: String,
    module_name: String,
}

impl ResourceObject {
    pub fn new(id: i64, res_type: ResourceType, params: Vec<ResourceParam>) -> Self {
        Self {
            id,
            res_type,
            params: SmallVec::from_vec(params),
            bundle_name: String::new(),
            module_name: String::new(),
        }
    }

    /// Request by numeric id
    pub fn by_id(id: u32, res_type: ResourceType) -> Self {
        Self::new(id as i64, res_type, Vec::new())
    }

    /// Request by name (`background` or `app.color.background`)
    pub fn by_name(name: impl Into<String>, res_type: ResourceType) -> Self {
        Self {
            id: UNKNOWN_RESOURCE_ID,
            res_type,
            params: smallvec![ResourceParam::Str(name.into())],
            bundle_name: String::new(),
            module_name: String::new(),
        }
    }

    /// Scope the request to a bundle/module
    pub fn with_module(mut self, bundle_name: impl Into<String>, module_name: impl Into<String>) -> Self {
        self.bundle_name = bundle_name.into();
        self.module_name = module_name.into();
        self
    }

    /// Append a parameter (format argument, plural count)
    pub fn with_param(mut self, param: impl Into<ResourceParam>) -> Self {
        self.params.push(param.into());
        self
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    /// The id as the platform's unsigned form, or `None` for by-name requests
    pub fn resource_id(&self) -> Option<u32> {
        u32::try_from(self.id).ok()
    }

    pub fn is_by_name(&self) -> bool {
        self.id == UNKNOWN_RESOURCE_ID
    }

    pub fn res_type(&self) -> ResourceType {
        self.res_type
    }

    pub fn params(&self) -> &[ResourceParam] {
        &self.params
    }

    /// Name for by-name requests (first string parameter)
    pub fn name(&self) -> Option<&str> {
        if !self.is_by_name() {
            return None;
        }
        self.params.first().and_then(ResourceParam::as_str)
    }

    /// Parameters that act as format arguments (everything after the name, if any)
    pub fn format_args(&self) -> &[ResourceParam] {
        if self.is_by_name() && !self.params.is_empty() {
            &self.params[1..]
        } else {
            &self.params
        }
    }

    pub fn bundle_name(&self) -> &str {
        &self.bundle_name
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    pub fn cache_key(&self) -> String {
        make_cache_key(&self.bundle_name, &self.module_name)
    }

    /// Text used to identify this request in logs and diagnostics
    pub fn request_key(&self) -> String {
        match self.name() {
            Some(name) => name.to_string(),
            None => self.id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn cache_key_is_empty_only_for_default_pair() {
        assert_eq!(make_cache_key("", ""), "");
        assert_eq!(make_cache_key("com.example.app", "entry"), "com.example.app.entry");
        assert_eq!(make_cache_key("com.example.app", ""), "com.example.app.");
        assert_eq!(make_cache_key("", "entry"), ".entry");
        assert_eq!(
            make_cache_key("com.example.app", "entry"),
            make_cache_key("com.example.app", "entry")
        );
    }

    #[test]
    fn type_codes_round_trip() {
        for ty in [
            ResourceType::Color,
            ResourceType::Float,
            ResourceType::String,
            ResourceType::Plural,
            ResourceType::Media,
            ResourceType::RawFile,
            ResourceType::Symbol,
        ] {
            assert_eq!(ResourceType::try_from(ty.code()), Ok(ty));
            assert_eq!(ResourceType::from_name(ty.as_str()), Some(ty));
        }
        assert_eq!(ResourceType::try_from(1), Err(1));
    }

    #[test]
    fn by_name_request_splits_name_from_args() {
        let obj = ResourceObject::by_name("app.string.greeting", ResourceType::String)
            .with_param("Chris")
            .with_param(3);
        assert!(obj.is_by_name());
        assert_eq!(obj.resource_id(), None);
        assert_eq!(obj.name(), Some("app.string.greeting"));
        assert_eq!(obj.format_args().len(), 2);
        assert_eq!(actual_resource_name(obj.name().unwrap()), "greeting");
    }

    #[test]
    fn by_id_request_uses_all_params_as_args() {
        let obj = ResourceObject::by_id(16777216, ResourceType::String)
            .with_module("com.example.app", "entry")
            .with_param("x");
        assert_eq!(obj.name(), None);
        assert_eq!(obj.format_args(), &[ResourceParam::from("x")]);
        assert_eq!(obj.cache_key(), "com.example.app.entry");
        assert_eq!(obj.request_key(), "16777216");
    }
}
