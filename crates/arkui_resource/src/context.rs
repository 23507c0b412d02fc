//! Adapter construction from ambient context
//!
//! The [`ResourceManager`](crate::ResourceManager) builds adapters on demand through an
//! [`AdapterFactory`]. [`PlatformAdapterFactory`] is the standard one: it asks a
//! [`ResourceContext`] (the container) for the module's platform resource manager.

use std::sync::Arc;

use arkui_core::TaskExecutor;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::adapter::{PlatformResourceAdapter, ResourceAdapter};
use crate::diagnostics::ResourceErrorRecorder;
use crate::object::{make_cache_key, ResourceObject};
use crate::platform::PlatformResourceManager;
use crate::theme::ThemeLoadPolicy;

/// Builds an adapter for a request whose module has none yet
pub trait AdapterFactory: Send + Sync {
    /// `None` when no resources are available for the request's module
    fn create(&self, object: &ResourceObject) -> Option<Arc<dyn ResourceAdapter>>;
}

/// Ambient container state consulted when building adapters
pub trait ResourceContext: Send + Sync {
    /// Bundle used when a request does not name one
    fn bundle_name(&self) -> String;

    /// Module used when a request does not name one
    fn module_name(&self) -> String;

    fn resource_manager(&self, bundle_name: &str, module_name: &str)
        -> Option<Arc<dyn PlatformResourceManager>>;

    fn app_has_dark_res(&self) -> bool {
        false
    }

    fn is_form(&self) -> bool {
        false
    }
}

/// Builds [`PlatformResourceAdapter`]s from a [`ResourceContext`]
pub struct PlatformAdapterFactory {
    context: Arc<dyn ResourceContext>,
    recorder: Arc<ResourceErrorRecorder>,
    executor: Option<Arc<dyn TaskExecutor>>,
    policy: Arc<ThemeLoadPolicy>,
}

impl PlatformAdapterFactory {
    pub fn new(context: Arc<dyn ResourceContext>, recorder: Arc<ResourceErrorRecorder>) -> Self {
        Self {
            context,
            recorder,
            executor: None,
            policy: Arc::new(ThemeLoadPolicy::default()),
        }
    }

    pub fn with_executor(mut self, executor: Arc<dyn TaskExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    pub fn with_theme_policy(mut self, policy: ThemeLoadPolicy) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    pub fn recorder(&self) -> &Arc<ResourceErrorRecorder> {
        &self.recorder
    }
}

impl AdapterFactory for PlatformAdapterFactory {
    fn create(&self, object: &ResourceObject) -> Option<Arc<dyn ResourceAdapter>> {
        let (bundle_name, module_name) =
            if object.bundle_name().is_empty() && object.module_name().is_empty() {
                (self.context.bundle_name(), self.context.module_name())
            } else {
                (object.bundle_name().to_string(), object.module_name().to_string())
            };

        let Some(platform) = self.context.resource_manager(&bundle_name, &module_name) else {
            tracing::debug!(
                "no resource manager for `{}`",
                make_cache_key(&bundle_name, &module_name)
            );
            return None;
        };

        let mut adapter = PlatformResourceAdapter::new(platform)
            .with_module(bundle_name, module_name)
            .with_recorder(self.recorder.clone())
            .with_dark_res(self.context.app_has_dark_res())
            .with_form(self.context.is_form())
            .with_theme_policy(self.policy.clone());
        if let Some(executor) = &self.executor {
            adapter = adapter.with_executor(executor.clone());
        }
        Some(Arc::new(adapter))
    }
}

/// A [`ResourceContext`] over a fixed table of module resource managers
#[derive(Default)]
pub struct StaticResourceContext {
    bundle_name: String,
    module_name: String,
    managers: RwLock<FxHashMap<String, Arc<dyn PlatformResourceManager>>>,
    app_has_dark_res: bool,
    is_form: bool,
}

impl StaticResourceContext {
    pub fn new(bundle_name: impl Into<String>, module_name: impl Into<String>) -> Self {
        Self {
            bundle_name: bundle_name.into(),
            module_name: module_name.into(),
            ..Default::default()
        }
    }

    pub fn with_dark_res(mut self, has_dark_res: bool) -> Self {
        self.app_has_dark_res = has_dark_res;
        self
    }

    pub fn with_form(mut self, is_form: bool) -> Self {
        self.is_form = is_form;
        self
    }

    pub fn insert_module(
        &self,
        bundle_name: &str,
        module_name: &str,
        manager: Arc<dyn PlatformResourceManager>,
    ) {
        self.managers
            .write()
            .insert(make_cache_key(bundle_name, module_name), manager);
    }

    pub fn remove_module(&self, bundle_name: &str, module_name: &str) {
        self.managers
            .write()
            .remove(&make_cache_key(bundle_name, module_name));
    }
}

impl ResourceContext for StaticResourceContext {
    fn bundle_name(&self) -> String {
        self.bundle_name.clone()
    }

    fn module_name(&self) -> String {
        self.module_name.clone()
    }

    fn resource_manager(&self, bundle_name: &str, module_name: &str)
        -> Option<Arc<dyn PlatformResourceManager>> {
        self.managers
            .read()
            .get(&make_cache_key(bundle_name, module_name))
            .cloned()
    }

    fn app_has_dark_res(&self) -> bool {
        self.app_has_dark_res
    }

    fn is_form(&self) -> bool {
        self.is_form
    }
}
