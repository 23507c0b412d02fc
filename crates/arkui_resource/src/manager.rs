//! Adapter registry
//!
//! The [`ResourceManager`] owns two stores of adapters keyed by
//! [`make_cache_key`]: an unbounded map of *main* adapters registered for loaded modules,
//! and a small LRU cache of adapters built on demand. A key lives in at most one store.
//! Every operation runs under one manager-wide lock, and configuration broadcasts are
//! applied to every adapter before they return.
//!
//! The manager is an ordinary value: build it once at startup and share it.

use std::collections::HashMap;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::RwLock;

use crate::adapter::{DefaultResourceAdapter, ResourceAdapter};
use crate::config::{ColorMode, ResourceConfiguration};
use crate::context::AdapterFactory;
use crate::object::{make_cache_key, ResourceObject};
use crate::settings::ResourceManagerConfig;

type AdapterRef = Arc<dyn ResourceAdapter>;

struct Stores {
    main: HashMap<String, AdapterRef>,
    cache: LruCache<String, AdapterRef>,
    /// Last broadcast configuration, replayed onto adapters built later
    last_config: Option<(ResourceConfiguration, bool)>,
    last_color_mode: Option<ColorMode>,
}

impl Stores {
    fn contains(&self, key: &str) -> bool {
        self.main.contains_key(key) || self.cache.contains(key)
    }

    /// Main lookup, then cache lookup (which promotes the entry)
    fn lookup(&mut self, key: &str) -> Option<AdapterRef> {
        if let Some(adapter) = self.main.get(key) {
            return Some(adapter.clone());
        }
        self.cache.get(key).cloned()
    }

    fn insert_main(&mut self, key: String, adapter: AdapterRef) {
        if self.cache.pop(&key).is_some() {
            tracing::trace!("`{}` moved from cache to main", key);
        }
        self.main.insert(key, adapter);
    }

    fn insert_cache(&mut self, key: String, adapter: AdapterRef) {
        if let Some((evicted, _)) = self.cache.push(key.clone(), adapter) {
            if evicted != key {
                tracing::debug!("evicted resource adapter `{}`", evicted);
            }
        }
    }

    fn adapters(&self) -> impl Iterator<Item = &AdapterRef> {
        self.main.values().chain(self.cache.iter().map(|(_, adapter)| adapter))
    }

    fn replay_broadcasts(&self, adapter: &AdapterRef) {
        if let Some((config, theme_flag)) = &self.last_config {
            adapter.update_config(config, *theme_flag);
        }
        if let Some(color_mode) = self.last_color_mode {
            adapter.update_color_mode(color_mode);
        }
    }
}

/// Registry and cache of [`ResourceAdapter`]s
pub struct ResourceManager {
    stores: RwLock<Stores>,
    factory: Arc<dyn AdapterFactory>,
    config: ResourceManagerConfig,
}

impl ResourceManager {
    pub fn new(factory: Arc<dyn AdapterFactory>) -> Self {
        Self::with_config(factory, ResourceManagerConfig::default())
    }

    pub fn with_config(factory: Arc<dyn AdapterFactory>, config: ResourceManagerConfig) -> Self {
        Self {
            stores: RwLock::new(Stores {
                main: HashMap::new(),
                cache: LruCache::new(config.capacity()),
                last_config: None,
                last_color_mode: None,
            }),
            factory,
            config,
        }
    }

    pub fn config(&self) -> &ResourceManagerConfig {
        &self.config
    }

    /// Adapter for the request's module, building and caching one if needed.
    ///
    /// Falls back to the default adapter when the factory cannot build one; never fails.
    pub fn get_or_create_resource_adapter(&self, object: &ResourceObject) -> AdapterRef {
        let key = object.cache_key();
        if let Some(adapter) = self.stores.write().lookup(&key) {
            tracing::trace!("resource adapter hit for `{}`", key);
            return adapter;
        }

        // The factory may call back into the manager.
        let created = self.factory.create(object);

        let mut stores = self.stores.write();
        if let Some(adapter) = stores.lookup(&key) {
            return adapter;
        }
        match created {
            Some(adapter) => {
                tracing::debug!("created resource adapter for `{}`", key);
                stores.replay_broadcasts(&adapter);
                stores.insert_cache(key, adapter.clone());
                adapter
            }
            None => {
                tracing::warn!("failed to create resource adapter for `{}`, using default", key);
                match stores.main.get("") {
                    Some(adapter) => adapter.clone(),
                    None => Arc::new(DefaultResourceAdapter::new()),
                }
            }
        }
    }

    /// Register a durable adapter for a module
    pub fn register_main_resource_adapter(&self, bundle_name: &str, module_name: &str, adapter: AdapterRef) {
        let key = make_cache_key(bundle_name, module_name);
        tracing::debug!("registered main resource adapter `{}`", key);
        self.stores.write().insert_main(key, adapter);
    }

    /// Install an adapter. Both names empty installs the process default.
    ///
    /// With `replace` the old cache entry is dropped before reinsertion.
    pub fn add_resource_adapter(&self, bundle_name: &str, module_name: &str, adapter: AdapterRef, replace: bool) {
        let key = make_cache_key(bundle_name, module_name);
        let mut stores = self.stores.write();
        if key.is_empty() || stores.main.contains_key(&key) {
            stores.insert_main(key, adapter);
            return;
        }
        if replace {
            stores.cache.pop(&key);
        }
        stores.insert_cache(key, adapter);
    }

    /// Registered or cached adapter for a module.
    ///
    /// The default key always yields an adapter, synthesizing one if none is installed.
    pub fn get_resource_adapter(&self, bundle_name: &str, module_name: &str) -> Option<AdapterRef> {
        let key = make_cache_key(bundle_name, module_name);
        if let Some(adapter) = self.stores.write().lookup(&key) {
            return Some(adapter);
        }
        if key.is_empty() {
            tracing::warn!("no default resource adapter installed, creating one");
            return Some(Arc::new(DefaultResourceAdapter::new()));
        }
        None
    }

    /// Whether either store holds the module. Does not affect LRU order.
    pub fn is_resource_adapter_record(&self, bundle_name: &str, module_name: &str) -> bool {
        self.stores
            .read()
            .contains(&make_cache_key(bundle_name, module_name))
    }

    /// Drop a module's adapter. The default key is never removed from the cache here.
    pub fn remove_resource_adapter(&self, bundle_name: &str, module_name: &str) {
        let key = make_cache_key(bundle_name, module_name);
        let mut stores = self.stores.write();
        stores.main.remove(&key);
        if !bundle_name.is_empty() && !module_name.is_empty() {
            stores.cache.pop(&key);
        }
    }

    /// Push a configuration to every adapter
    pub fn update_resource_config(&self, config: &ResourceConfiguration, theme_flag: bool) {
        let mut stores = self.stores.write();
        for adapter in stores.adapters() {
            adapter.update_config(config, theme_flag);
        }
        tracing::debug!(
            "resource config broadcast to {} adapters",
            stores.main.len() + stores.cache.len()
        );
        stores.last_config = Some((config.clone(), theme_flag));
        if let Some(mode) = stores.last_color_mode.as_mut() {
            *mode = config.color_mode;
        }
    }

    /// Push a color mode to every adapter
    pub fn update_color_mode(&self, color_mode: ColorMode) {
        let mut stores = self.stores.write();
        for adapter in stores.adapters() {
            adapter.update_color_mode(color_mode);
        }
        stores.last_color_mode = Some(color_mode);
    }

    /// Clear the cache; main adapters survive
    pub fn reset(&self) {
        self.stores.write().cache.clear();
    }

    pub fn cache_len(&self) -> usize {
        self.stores.read().cache.len()
    }

    pub fn main_len(&self) -> usize {
        self.stores.read().main.len()
    }

    /// Cached keys, most recently used first
    pub fn cached_keys(&self) -> Vec<String> {
        self.stores.read().cache.iter().map(|(key, _)| key.clone()).collect()
    }
}
