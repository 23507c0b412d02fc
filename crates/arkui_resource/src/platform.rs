//! Platform resource-manager contract
//!
//! The platform owns the compiled resource bundle of each module. The adapter layer
//! talks to it only through [`PlatformResourceManager`]; every call returns a
//! [`PlatformStatus`] on failure, which the adapter turns into a logged diagnostic plus
//! a typed default.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::config::ResConfig;
use crate::object::ResourceType;

/// Failure status reported by the platform resource manager
#[derive(Error, Debug, Clone, Copy, Eq, PartialEq)]
pub enum PlatformStatus {
    #[error("invalid resource id (code 9001001)")]
    InvalidId,

    #[error("resource not found by id (code 9001002)")]
    NotFoundById,

    #[error("invalid resource name (code 9001003)")]
    InvalidName,

    #[error("resource not found by name (code 9001004)")]
    NotFoundByName,

    #[error("invalid resource path (code 9001005)")]
    InvalidPath,

    #[error("resource reference depth exceeded (code 9001006)")]
    RefTooDeep,

    #[error("resource formatting failed (code 9001007)")]
    FormatFailed,

    #[error("resource manager unavailable (code 9001009)")]
    ManagerUnavailable,

    #[error("platform error (code {0})")]
    Other(u32),
}

impl PlatformStatus {
    /// Numeric platform error code
    pub fn code(&self) -> u32 {
        match self {
            Self::InvalidId => 9001001,
            Self::NotFoundById => 9001002,
            Self::InvalidName => 9001003,
            Self::NotFoundByName => 9001004,
            Self::InvalidPath => 9001005,
            Self::RefTooDeep => 9001006,
            Self::FormatFailed => 9001007,
            Self::ManagerUnavailable => 9001009,
            Self::Other(code) => *code,
        }
    }
}

/// Result of a platform call
pub type PlatformResult<T> = std::result::Result<T, PlatformStatus>;

/// A typed raw value from theme or pattern data
#[derive(Clone, Debug, PartialEq)]
pub struct ResValue {
    pub res_type: ResourceType,
    pub value: String,
}

impl ResValue {
    pub fn new(res_type: ResourceType, value: impl Into<String>) -> Self {
        Self {
            res_type,
            value: value.into(),
        }
    }
}

/// Flat tag -> value map describing a theme or pattern
pub type PatternData = FxHashMap<String, ResValue>;

/// Capability set of a platform resource bundle handle
///
/// Implementations must be safe to call from the UI thread and background threads
/// concurrently.
pub trait PlatformResourceManager: Send + Sync {
    fn color_by_id(&self, id: u32) -> PlatformResult<u32>;
    fn color_by_name(&self, name: &str) -> PlatformResult<u32>;

    /// Float value plus its unit suffix (`vp`, `px`, ...; empty when unit-less)
    fn float_by_id(&self, id: u32) -> PlatformResult<(f32, String)>;
    fn float_by_name(&self, name: &str) -> PlatformResult<(f32, String)>;

    fn string_by_id(&self, id: u32) -> PlatformResult<String>;
    fn string_by_name(&self, name: &str) -> PlatformResult<String>;

    fn string_array_by_id(&self, id: u32) -> PlatformResult<Vec<String>>;
    fn string_array_by_name(&self, name: &str) -> PlatformResult<Vec<String>>;

    /// Unformatted plural template for `quantity`
    fn plural_by_id(&self, id: u32, quantity: i64) -> PlatformResult<String>;
    fn plural_by_name(&self, name: &str, quantity: i64) -> PlatformResult<String>;

    fn integer_by_id(&self, id: u32) -> PlatformResult<i32>;
    fn integer_by_name(&self, name: &str) -> PlatformResult<i32>;

    fn int_array_by_id(&self, id: u32) -> PlatformResult<Vec<i32>>;
    fn int_array_by_name(&self, name: &str) -> PlatformResult<Vec<i32>>;

    fn boolean_by_id(&self, id: u32) -> PlatformResult<bool>;
    fn boolean_by_name(&self, name: &str) -> PlatformResult<bool>;

    fn symbol_by_id(&self, id: u32) -> PlatformResult<u32>;
    fn symbol_by_name(&self, name: &str) -> PlatformResult<u32>;

    fn media_path_by_id(&self, id: u32) -> PlatformResult<String>;
    fn media_path_by_name(&self, name: &str) -> PlatformResult<String>;
    fn media_data_by_id(&self, id: u32) -> PlatformResult<Vec<u8>>;
    fn media_data_by_name(&self, name: &str) -> PlatformResult<Vec<u8>>;

    /// Path of a file under the module's `rawfile` directory
    fn raw_file_path(&self, name: &str) -> PlatformResult<String>;
    fn raw_file_data(&self, name: &str) -> PlatformResult<Vec<u8>>;

    /// Numeric id of a named resource of the given type
    fn identifier_by_name(&self, name: &str, res_type: ResourceType) -> PlatformResult<u32>;

    /// Flat attribute map of a theme
    fn theme_data_by_id(&self, id: u32) -> PlatformResult<PatternData>;
    fn pattern_by_id(&self, id: u32) -> PlatformResult<PatternData>;
    fn pattern_by_name(&self, name: &str) -> PlatformResult<PatternData>;

    /// Current selection snapshot
    fn res_config(&self) -> ResConfig;

    /// Replace the selection snapshot. `is_update_theme` forces theme data to reload.
    fn update_res_config(&self, config: &ResConfig, is_update_theme: bool) -> PlatformResult<()>;

    /// Qualifiers of the variant that would be selected for a resource
    fn res_config_by_id(&self, id: u32) -> PlatformResult<ResConfig>;
    fn res_config_by_name(&self, name: &str, res_type: ResourceType) -> PlatformResult<ResConfig>;

    /// A new, independent manager over the same bundle with `config` applied
    fn override_manager(&self, config: &ResConfig) -> PlatformResult<Arc<dyn PlatformResourceManager>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_are_stable() {
        assert_eq!(PlatformStatus::NotFoundById.code(), 9001002);
        assert_eq!(PlatformStatus::NotFoundByName.code(), 9001004);
        assert_eq!(PlatformStatus::Other(42).code(), 42);
        assert!(PlatformStatus::InvalidId.to_string().contains("9001001"));
    }
}
