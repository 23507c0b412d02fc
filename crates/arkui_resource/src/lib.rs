//! ArkUI Resource Subsystem
//!
//! Resolves colors, dimensions, strings, media and themes for UI components, scoped by
//! bundle and module, and keeps every module's resources in step with the environment
//! (locale, color mode, density).
//!
//! - [`ResourceManager`]: registry of per-module adapters with a bounded LRU cache and
//!   synchronous configuration broadcast
//! - [`ResourceAdapter`]: resolution interface; [`PlatformResourceAdapter`] delegates to a
//!   [`PlatformResourceManager`], [`DefaultResourceAdapter`] yields typed defaults
//! - [`ThemeStyle`]: parsed theme with synchronously loaded and background-preloaded
//!   patterns
//! - [`IndexedResourceManager`]: platform manager over an in-memory [`ResourceIndex`]
//! - [`ResourceErrorRecorder`]: sink for failed lookups
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use arkui_resource::{
//!     resolve_color, IndexedResourceManager, PlatformAdapterFactory, ResourceErrorRecorder,
//!     ResourceIndex, ResourceManager, ResourceObject, ResourceType, StaticResourceContext,
//! };
//!
//! let index = ResourceIndex::from_toml_str(r##"
//!     [[resource]]
//!     id = 16777216
//!     name = "brand"
//!     type = "color"
//!     value = "#FF0A59F7"
//! "##).unwrap();
//!
//! let context = Arc::new(StaticResourceContext::new("com.example.app", "entry"));
//! context.insert_module(
//!     "com.example.app",
//!     "entry",
//!     Arc::new(IndexedResourceManager::new(Arc::new(index))),
//! );
//! let factory = PlatformAdapterFactory::new(context, Arc::new(ResourceErrorRecorder::new()));
//! let manager = ResourceManager::new(Arc::new(factory));
//!
//! let request = ResourceObject::by_name("app.color.brand", ResourceType::Color)
//!     .with_module("com.example.app", "entry");
//! let adapter = manager.get_or_create_resource_adapter(&request);
//! assert_eq!(resolve_color(adapter.as_ref(), &request).to_argb(), 0xFF0A59F7);
//! ```

pub mod adapter;
pub mod config;
pub mod context;
pub mod diagnostics;
pub mod error;
pub mod index;
pub mod manager;
pub mod object;
pub mod parse;
pub mod placeholder;
pub mod platform;
pub mod settings;
pub mod theme;

pub use adapter::{AdapterKind, DefaultResourceAdapter, PlatformResourceAdapter, ResourceAdapter};
pub use config::{
    ColorMode, ConfigurationChange, DeviceType, Direction, InputDevice, Locale, ResConfig,
    ResourceConfiguration, ScreenDensity,
};
pub use context::{AdapterFactory, PlatformAdapterFactory, ResourceContext, StaticResourceContext};
pub use diagnostics::{with_current_node, ResourceErrorRecord, ResourceErrorRecorder};
pub use error::{ResourceError, Result};
pub use index::{IndexedResourceManager, ResourceIndex};
pub use manager::ResourceManager;
pub use object::{
    actual_resource_name, make_cache_key, ResourceObject, ResourceParam, ResourceType,
    UNKNOWN_RESOURCE_ID,
};
pub use parse::{
    resolve_color, resolve_dimension, resolve_media_path, resolve_plural, resolve_string,
    resolve_symbol,
};
pub use placeholder::apply_placeholders;
pub use platform::{PatternData, PlatformResourceManager, PlatformResult, PlatformStatus, ResValue};
pub use settings::ResourceManagerConfig;
pub use theme::{ThemeAttr, ThemeConfig, ThemeLoadPolicy, ThemeStyle};
