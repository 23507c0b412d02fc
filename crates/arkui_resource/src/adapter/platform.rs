use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use arkui_core::{Color, Dimension, TaskExecutor, TaskType};
use parking_lot::RwLock;

use super::{AdapterKind, DefaultResourceAdapter, ResourceAdapter};
use crate::config::{ColorMode, ConfigurationChange, ResConfig, ResourceConfiguration};
use crate::diagnostics::ResourceErrorRecorder;
use crate::object::{actual_resource_name, make_cache_key, ResourceParam, ResourceType};
use crate::placeholder::apply_placeholders;
use crate::platform::{PlatformResourceManager, PlatformResult};
use crate::theme::{build_theme, preload_patterns, ThemeLoadPolicy, ThemeStyle};

/// Last snapshot pushed to the platform.
///
/// Lookups hold it for reading; anything that changes the platform configuration, including
/// the dark-resource probe, holds it for writing.
type SharedConfig = Arc<RwLock<Option<ResConfig>>>;

/// Adapter backed by a platform resource manager
pub struct PlatformResourceAdapter {
    platform: Arc<dyn PlatformResourceManager>,
    bundle_name: String,
    module_name: String,
    config: SharedConfig,
    app_has_dark_res: AtomicBool,
    is_form: bool,
    recorder: Arc<ResourceErrorRecorder>,
    executor: Option<Arc<dyn TaskExecutor>>,
    policy: Arc<ThemeLoadPolicy>,
}

impl PlatformResourceAdapter {
    pub fn new(platform: Arc<dyn PlatformResourceManager>) -> Self {
        Self {
            platform,
            bundle_name: String::new(),
            module_name: String::new(),
            config: Arc::new(RwLock::new(None)),
            app_has_dark_res: AtomicBool::new(false),
            is_form: false,
            recorder: Arc::new(ResourceErrorRecorder::new()),
            executor: None,
            policy: Arc::new(ThemeLoadPolicy::default()),
        }
    }

    pub fn with_module(mut self, bundle_name: impl Into<String>, module_name: impl Into<String>) -> Self {
        self.bundle_name = bundle_name.into();
        self.module_name = module_name.into();
        self
    }

    /// Diagnostic sink for failed lookups
    pub fn with_recorder(mut self, recorder: Arc<ResourceErrorRecorder>) -> Self {
        self.recorder = recorder;
        self
    }

    pub fn with_dark_res(self, has_dark_res: bool) -> Self {
        self.app_has_dark_res.store(has_dark_res, Ordering::SeqCst);
        self
    }

    /// Mark as belonging to a form render; disables background theme preloading
    pub fn with_form(mut self, is_form: bool) -> Self {
        self.is_form = is_form;
        self
    }

    /// Executor for background theme preloading. Without one the preload runs inline.
    pub fn with_executor(mut self, executor: Arc<dyn TaskExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    pub fn with_theme_policy(mut self, policy: Arc<ThemeLoadPolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn bundle_name(&self) -> &str {
        &self.bundle_name
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    pub fn is_form(&self) -> bool {
        self.is_form
    }

    pub fn platform(&self) -> &Arc<dyn PlatformResourceManager> {
        &self.platform
    }

    /// Sibling adapter over another platform handle, sharing everything else
    fn derive(&self, platform: Arc<dyn PlatformResourceManager>, config: ResConfig) -> Self {
        Self {
            platform,
            bundle_name: self.bundle_name.clone(),
            module_name: self.module_name.clone(),
            config: Arc::new(RwLock::new(Some(config))),
            app_has_dark_res: AtomicBool::new(self.app_has_dark_res()),
            is_form: self.is_form,
            recorder: self.recorder.clone(),
            executor: self.executor.clone(),
            policy: self.policy.clone(),
        }
    }

    /// Query the platform with the configuration held steady
    fn lookup<T>(&self, query: impl FnOnce(&dyn PlatformResourceManager) -> T) -> T {
        let _config = self.config.read();
        query(&*self.platform)
    }

    /// Unwrap a platform result, logging and recording a diagnostic on failure
    fn resolve<T: Default>(&self, kind: &'static str, key: impl Display, result: PlatformResult<T>) -> T {
        match result {
            Ok(value) => value,
            Err(status) => {
                let key = key.to_string();
                tracing::warn!(
                    "failed to get {} resource `{}` from module `{}`: {}",
                    kind,
                    key,
                    make_cache_key(&self.bundle_name, &self.module_name),
                    status
                );
                self.recorder.record(&key, kind, status.code());
                T::default()
            }
        }
    }

    fn dark_probe(&self, probe: impl FnOnce(&dyn PlatformResourceManager) -> PlatformResult<ResConfig>) -> bool {
        let mut cached = self.config.write();
        let current = match cached.as_ref() {
            Some(config) => config.clone(),
            None => self.platform.res_config(),
        };

        let flipped = !current.color_mode.is_dark();
        if flipped {
            let mut dark = current.clone();
            dark.color_mode = ColorMode::Dark;
            if let Err(status) = self.platform.update_res_config(&dark, false) {
                tracing::warn!("dark resource probe could not switch color mode: {}", status);
                return false;
            }
        }

        let probed = probe(&*self.platform);

        if flipped {
            if let Err(status) = self.platform.update_res_config(&current, false) {
                tracing::error!("dark resource probe could not restore color mode: {}", status);
            }
            *cached = Some(current);
        }

        matches!(probed, Ok(config) if config.color_mode.is_dark())
    }

    fn plural(&self, template: String, quantity: i64, args: &[ResourceParam]) -> String {
        let mut all = Vec::with_capacity(args.len() + 1);
        all.push(ResourceParam::Int(quantity));
        all.extend_from_slice(args);
        apply_placeholders(&template, &all)
    }

    fn schedule_preload(&self, style: &Arc<ThemeStyle>) {
        if self.is_form || self.policy.async_load().is_empty() {
            return;
        }
        style.begin_preload();
        let platform = self.platform.clone();
        let config = self.config.clone();
        let weak = Arc::downgrade(style);
        let names = self.policy.async_load().to_vec();
        let task = Box::new(move || {
            let _config = config.read();
            preload_patterns(&*platform, &weak, &names);
        });
        match &self.executor {
            Some(executor) => executor.post(TaskType::Background, "ArkUILoadThemePatterns", task),
            None => task(),
        }
    }
}

impl ResourceAdapter for PlatformResourceAdapter {
    fn kind(&self) -> AdapterKind {
        AdapterKind::Platform
    }

    fn update_config(&self, config: &ResourceConfiguration, theme_flag: bool) {
        let next = ResConfig::from(config);
        let mut cached = self.config.write();
        if !theme_flag && !ResConfig::needs_update(cached.as_ref(), &next) {
            tracing::trace!("resource config unchanged for `{}`", self.module_name);
            return;
        }
        match self.platform.update_res_config(&next, theme_flag) {
            Ok(()) => {
                tracing::debug!(
                    "resource config for `{}` -> {} {:?}",
                    self.module_name,
                    next.locale,
                    next.color_mode
                );
                *cached = Some(next);
            }
            Err(status) => tracing::warn!("failed to update resource config: {}", status),
        }
    }

    fn update_color_mode(&self, color_mode: ColorMode) {
        let mut cached = self.config.write();
        let mut next = match cached.as_ref() {
            Some(config) => config.clone(),
            None => self.platform.res_config(),
        };
        next.color_mode = color_mode;
        match self.platform.update_res_config(&next, false) {
            Ok(()) => *cached = Some(next),
            Err(status) => tracing::warn!("failed to update color mode: {}", status),
        }
    }

    fn resource_color_mode(&self) -> ColorMode {
        let config = self.lookup(|platform| platform.res_config());
        if config.color_mode.is_dark() && !config.app_color_mode && !self.app_has_dark_res() {
            return ColorMode::Light;
        }
        config.color_mode
    }

    fn set_app_has_dark_res(&self, has_dark_res: bool) {
        self.app_has_dark_res.store(has_dark_res, Ordering::SeqCst);
    }

    fn app_has_dark_res(&self) -> bool {
        self.app_has_dark_res.load(Ordering::SeqCst)
    }

    fn exist_dark_res_by_id(&self, id: u32) -> bool {
        self.dark_probe(|platform| platform.res_config_by_id(id))
    }

    fn exist_dark_res_by_name(&self, name: &str, res_type: ResourceType) -> bool {
        let name = actual_resource_name(name);
        self.dark_probe(|platform| platform.res_config_by_name(name, res_type))
    }

    fn override_adapter(
        &self,
        config: &ResourceConfiguration,
        change: &ConfigurationChange,
    ) -> Arc<dyn ResourceAdapter> {
        let overridden = {
            let cached = self.config.read();
            let mut snapshot = match cached.as_ref() {
                Some(cached) => cached.clone(),
                None => self.platform.res_config(),
            };
            snapshot.apply_change(&ResConfig::from(config), change);
            self.platform
                .override_manager(&snapshot)
                .map(|platform| (platform, snapshot))
        };
        match overridden {
            Ok((platform, snapshot)) => Arc::new(self.derive(platform, snapshot)),
            Err(status) => {
                tracing::warn!("failed to create override resource manager: {}", status);
                Arc::new(DefaultResourceAdapter::new())
            }
        }
    }

    fn theme(&self, theme_id: i64) -> Option<Arc<ThemeStyle>> {
        let style = self.lookup(|platform| build_theme(platform, theme_id, &self.policy))?;
        let style = Arc::new(style);
        self.schedule_preload(&style);
        Some(style)
    }

    fn pattern_by_name(&self, name: &str) -> Option<Arc<ThemeStyle>> {
        let pattern = actual_resource_name(name);
        match self.lookup(|platform| platform.pattern_by_name(pattern)) {
            Ok(data) => Some(Arc::new(ThemeStyle::from_pattern(pattern, &data))),
            Err(status) => {
                tracing::warn!("failed to get pattern `{}`: {}", name, status);
                self.recorder.record(name, "pattern", status.code());
                None
            }
        }
    }

    fn color(&self, id: u32) -> Color {
        let argb = self.lookup(|platform| platform.color_by_id(id));
        self.resolve("color", id, argb.map(Color::from_argb))
    }

    fn color_by_name(&self, name: &str) -> Color {
        let argb = self.lookup(|platform| platform.color_by_name(actual_resource_name(name)));
        self.resolve("color", name, argb.map(Color::from_argb))
    }

    fn dimension(&self, id: u32) -> Dimension {
        let value = self
            .lookup(|platform| platform.float_by_id(id))
            .map(|(value, unit)| Dimension::from_value_and_unit(value as f64, &unit));
        self.resolve("float", id, value)
    }

    fn dimension_by_name(&self, name: &str) -> Dimension {
        let value = self
            .lookup(|platform| platform.float_by_name(actual_resource_name(name)))
            .map(|(value, unit)| Dimension::from_value_and_unit(value as f64, &unit));
        self.resolve("float", name, value)
    }

    fn double(&self, id: u32) -> f64 {
        let value = self
            .lookup(|platform| platform.float_by_id(id))
            .map(|(value, _)| value as f64);
        self.resolve("float", id, value)
    }

    fn double_by_name(&self, name: &str) -> f64 {
        let value = self
            .lookup(|platform| platform.float_by_name(actual_resource_name(name)))
            .map(|(value, _)| value as f64);
        self.resolve("float", name, value)
    }

    fn string(&self, id: u32) -> String {
        let value = self.lookup(|platform| platform.string_by_id(id));
        self.resolve("string", id, value)
    }

    fn string_by_name(&self, name: &str) -> String {
        let value = self.lookup(|platform| platform.string_by_name(actual_resource_name(name)));
        self.resolve("string", name, value)
    }

    fn plural_string(&self, id: u32, quantity: i64, args: &[ResourceParam]) -> String {
        let template = self.lookup(|platform| platform.plural_by_id(id, quantity));
        let template = self.resolve("plural", id, template);
        self.plural(template, quantity, args)
    }

    fn plural_string_by_name(&self, name: &str, quantity: i64, args: &[ResourceParam]) -> String {
        let template =
            self.lookup(|platform| platform.plural_by_name(actual_resource_name(name), quantity));
        let template = self.resolve("plural", name, template);
        self.plural(template, quantity, args)
    }

    fn string_array(&self, id: u32) -> Vec<String> {
        let value = self.lookup(|platform| platform.string_array_by_id(id));
        self.resolve("strarray", id, value)
    }

    fn string_array_by_name(&self, name: &str) -> Vec<String> {
        let value = self.lookup(|platform| platform.string_array_by_name(actual_resource_name(name)));
        self.resolve("strarray", name, value)
    }

    fn integer(&self, id: u32) -> i32 {
        let value = self.lookup(|platform| platform.integer_by_id(id));
        self.resolve("integer", id, value)
    }

    fn integer_by_name(&self, name: &str) -> i32 {
        let value = self.lookup(|platform| platform.integer_by_name(actual_resource_name(name)));
        self.resolve("integer", name, value)
    }

    fn int_array(&self, id: u32) -> Vec<i32> {
        let value = self.lookup(|platform| platform.int_array_by_id(id));
        self.resolve("intarray", id, value)
    }

    fn int_array_by_name(&self, name: &str) -> Vec<i32> {
        let value = self.lookup(|platform| platform.int_array_by_name(actual_resource_name(name)));
        self.resolve("intarray", name, value)
    }

    fn boolean(&self, id: u32) -> bool {
        let value = self.lookup(|platform| platform.boolean_by_id(id));
        self.resolve("boolean", id, value)
    }

    fn boolean_by_name(&self, name: &str) -> bool {
        let value = self.lookup(|platform| platform.boolean_by_name(actual_resource_name(name)));
        self.resolve("boolean", name, value)
    }

    fn symbol(&self, id: u32) -> u32 {
        let value = self.lookup(|platform| platform.symbol_by_id(id));
        self.resolve("symbol", id, value)
    }

    fn symbol_by_name(&self, name: &str) -> u32 {
        let value = self.lookup(|platform| platform.symbol_by_name(actual_resource_name(name)));
        self.resolve("symbol", name, value)
    }

    fn media_path(&self, id: u32) -> String {
        let value = self.lookup(|platform| platform.media_path_by_id(id));
        self.resolve("media", id, value)
    }

    fn media_path_by_name(&self, name: &str) -> String {
        let value = self.lookup(|platform| platform.media_path_by_name(actual_resource_name(name)));
        self.resolve("media", name, value)
    }

    fn media_data(&self, id: u32) -> Vec<u8> {
        let value = self.lookup(|platform| platform.media_data_by_id(id));
        self.resolve("media", id, value)
    }

    fn media_data_by_name(&self, name: &str) -> Vec<u8> {
        let value = self.lookup(|platform| platform.media_data_by_name(actual_resource_name(name)));
        self.resolve("media", name, value)
    }

    fn raw_file_path(&self, name: &str) -> String {
        let value = self.lookup(|platform| platform.raw_file_path(name));
        self.resolve("rawfile", name, value)
    }

    fn raw_file_data(&self, name: &str) -> Vec<u8> {
        let value = self.lookup(|platform| platform.raw_file_data(name));
        self.resolve("rawfile", name, value)
    }

    fn identifier_by_name(&self, name: &str, res_type: ResourceType) -> u32 {
        let id = self.lookup(|platform| platform.identifier_by_name(actual_resource_name(name), res_type));
        self.resolve(res_type.as_str(), name, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{IndexedResourceManager, ResourceIndex};
    use arkui_core::{DimensionUnit, ManualTaskExecutor};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

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
value = "Hello %s"

[[resource]]
id = 3
name = "apples"
type = "plural"
plural = { one = "%d apple for %s", other = "%d apples for %s" }

[[resource]]
id = 4
name = "gap"
type = "float"
value = "12lpx"

[[theme]]
id = 125829872
name = "ohos_theme"
attrs = { brand = { type = "color", value = "$color:background" }, button = { type = "pattern", value = "button" } }

[[pattern]]
id = 100
name = "button"
attrs = { radius = { type = "float", value = "8vp" } }

[[pattern]]
id = 101
name = "icon"
attrs = { size = { type = "float", value = "24vp" } }
"##;

    fn platform() -> Arc<IndexedResourceManager> {
        Arc::new(IndexedResourceManager::new(Arc::new(
            ResourceIndex::from_toml_str(INDEX).unwrap(),
        )))
    }

    fn adapter(platform: Arc<IndexedResourceManager>) -> PlatformResourceAdapter {
        PlatformResourceAdapter::new(platform).with_module("com.example.app", "entry")
    }

    #[test]
    fn resolves_typed_values() {
        let adapter = adapter(platform());
        assert_eq!(adapter.color(1), Color::WHITE);
        assert_eq!(adapter.color_by_name("app.color.background"), Color::WHITE);
        assert_eq!(adapter.dimension(4), Dimension::new(12.0, DimensionUnit::Lpx));
        assert_eq!(adapter.string_by_name("title"), "Hello %s");
        assert_eq!(
            adapter.plural_string(3, 2, &["Bob".into()]),
            "2 apples for Bob"
        );
        assert_eq!(adapter.identifier_by_name("app.string.title", ResourceType::String), 2);
    }

    #[test]
    fn misses_default_and_record() {
        let recorder = Arc::new(ResourceErrorRecorder::new());
        let adapter = adapter(platform()).with_recorder(recorder.clone());
        assert_eq!(adapter.color(999), Color::BLACK);
        assert_eq!(adapter.string_by_name("missing"), "");
        let records = recorder.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].requested, "999");
        assert_eq!(records[0].kind, "color");
        assert_eq!(records[0].error_code, 9001002);
        assert_eq!(records[1].error_code, 9001004);
    }

    #[test]
    fn unchanged_config_skips_platform_update() {
        let platform = platform();
        let adapter = adapter(platform.clone());
        let config = ResourceConfiguration::default().with_locale("en-US");
        adapter.update_config(&config, false);
        adapter.update_config(&config, false);
        assert_eq!(platform.update_count(), 1);

        adapter.update_config(&config.clone().with_color_mode(ColorMode::Dark), false);
        assert_eq!(platform.update_count(), 2);

        adapter.update_config(&config.with_color_mode(ColorMode::Dark), true);
        assert_eq!(platform.update_count(), 3);
    }

    #[test]
    fn dark_probe_restores_light() {
        let platform = platform();
        let adapter = adapter(platform.clone());
        adapter.update_config(&ResourceConfiguration::default(), false);

        assert!(adapter.exist_dark_res_by_id(1));
        assert!(!adapter.exist_dark_res_by_id(2));
        assert!(adapter.exist_dark_res_by_name("app.color.background", ResourceType::Color));
        assert_eq!(platform.res_config().color_mode, ColorMode::Light);
        assert_eq!(adapter.color(1), Color::WHITE);
    }

    #[test]
    fn dark_mode_is_gated_on_app_opt_in() {
        let platform = platform();
        let adapter = adapter(platform.clone());
        adapter.update_color_mode(ColorMode::Dark);
        assert_eq!(adapter.resource_color_mode(), ColorMode::Light);

        adapter.set_app_has_dark_res(true);
        assert_eq!(adapter.resource_color_mode(), ColorMode::Dark);
    }

    #[test]
    fn override_adapter_is_independent() {
        let platform = platform();
        let adapter = adapter(platform.clone());
        let dark = ResourceConfiguration::default().with_color_mode(ColorMode::Dark);
        let overridden = adapter.override_adapter(&dark, &ConfigurationChange::color_mode());
        assert_eq!(overridden.kind(), AdapterKind::Platform);
        assert_eq!(overridden.color(1), Color::BLACK);
        assert_eq!(adapter.color(1), Color::WHITE);
    }

    #[test]
    fn theme_uses_fallback_and_preloads_in_background() {
        let executor = Arc::new(ManualTaskExecutor::new());
        let adapter = adapter(platform()).with_executor(executor.clone());

        let theme = adapter.theme(-1).unwrap();
        assert_eq!(theme.color("brand"), Some(Color::WHITE));
        assert_eq!(
            theme.pattern("button").and_then(|p| p.dimension("radius")),
            Some(Dimension::vp(8.0))
        );
        assert!(theme.pattern("icon").is_none());
        assert!(!theme.check_loaded(Duration::from_millis(1)));

        executor.run_pending();
        assert!(theme.check_loaded(Duration::from_millis(1)));
        assert_eq!(
            theme.pattern("icon").and_then(|p| p.dimension("size")),
            Some(Dimension::vp(24.0))
        );
    }

    #[test]
    fn form_adapters_skip_preload() {
        let executor = Arc::new(ManualTaskExecutor::new());
        let adapter = adapter(platform())
            .with_executor(executor.clone())
            .with_form(true);
        let theme = adapter.theme(7).unwrap();
        assert_eq!(executor.pending(), 0);
        assert!(theme.check_loaded(Duration::ZERO));
        assert!(theme.pattern("icon").is_none());
    }

    #[test]
    fn dropped_theme_makes_preload_a_no_op() {
        let executor = Arc::new(ManualTaskExecutor::new());
        let adapter = adapter(platform()).with_executor(executor.clone());
        drop(adapter.theme(-1));
        assert_eq!(executor.pending(), 1);
        executor.run_pending();
    }

    #[test]
    fn lookups_never_observe_the_dark_probe() {
        let adapter = Arc::new(adapter(platform()));
        adapter.update_config(&ResourceConfiguration::default(), false);

        let prober = {
            let adapter = adapter.clone();
            std::thread::spawn(move || {
                for _ in 0..2_000 {
                    assert!(adapter.exist_dark_res_by_id(1));
                }
            })
        };
        let mut dark_reads = 0;
        for _ in 0..20_000 {
            if adapter.color(1) != Color::WHITE {
                dark_reads += 1;
            }
        }
        prober.join().unwrap();
        assert_eq!(dark_reads, 0);
        assert_eq!(adapter.resource_color_mode(), ColorMode::Light);
    }
}
