use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use arkui_core::Color;
use arkui_resource::{
    make_cache_key, AdapterFactory, AdapterKind, ColorMode, DefaultResourceAdapter,
    IndexedResourceManager, PlatformAdapterFactory, PlatformResourceAdapter, PlatformResourceManager,
    ResourceAdapter, ResourceConfiguration, ResourceErrorRecorder, ResourceIndex, ResourceManager,
    ResourceManagerConfig, ResourceObject, ResourceType, StaticResourceContext,
};
use pretty_assertions::assert_eq;

const BUNDLE: &str = "com.example.app";

const INDEX: &str = r##"
[[resource]]
id = 16777216
name = "background"
type = "color"
value = "#FFFFFFFF"
variants = [{ color_mode = "dark", value = "#FF000000" }]

[[theme]]
id = 125829872
name = "ohos_theme"

[[theme]]
id = 5
name = "empty"
"##;

fn indexed() -> Arc<IndexedResourceManager> {
    Arc::new(IndexedResourceManager::new(Arc::new(
        ResourceIndex::from_toml_str(INDEX).unwrap(),
    )))
}

/// Factory that counts calls and builds default adapters
#[derive(Default)]
struct CountingFactory {
    calls: AtomicUsize,
}

impl CountingFactory {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl AdapterFactory for CountingFactory {
    fn create(&self, _object: &ResourceObject) -> Option<Arc<dyn ResourceAdapter>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Some(Arc::new(DefaultResourceAdapter::new()))
    }
}

fn request(module: &str) -> ResourceObject {
    ResourceObject::by_id(16777216, ResourceType::Color).with_module(BUNDLE, module)
}

fn store_count(manager: &ResourceManager, adapter: &Arc<dyn ResourceAdapter>, module: &str) -> usize {
    let found = manager.get_resource_adapter(BUNDLE, module);
    match found {
        Some(found) if Arc::ptr_eq(&found, adapter) => 1,
        Some(_) => panic!("key {} resolves to a different adapter", make_cache_key(BUNDLE, module)),
        None => 0,
    }
}

#[test]
fn cache_key_is_deterministic() {
    for (bundle, module, expected) in [
        ("", "", ""),
        (BUNDLE, "entry", "com.example.app.entry"),
        ("a", "", "a."),
        ("", "b", ".b"),
    ] {
        assert_eq!(make_cache_key(bundle, module), expected);
        assert_eq!(make_cache_key(bundle, module), make_cache_key(bundle, module));
    }
}

#[test]
fn a_key_resolves_to_at_most_one_adapter() {
    let manager = ResourceManager::new(Arc::new(CountingFactory::default()));
    let cached: Arc<dyn ResourceAdapter> = Arc::new(DefaultResourceAdapter::new());
    let main: Arc<dyn ResourceAdapter> = Arc::new(DefaultResourceAdapter::new());

    manager.add_resource_adapter(BUNDLE, "entry", cached.clone(), false);
    assert_eq!(store_count(&manager, &cached, "entry"), 1);
    assert_eq!((manager.main_len(), manager.cache_len()), (0, 1));

    manager.register_main_resource_adapter(BUNDLE, "entry", main.clone());
    assert_eq!(store_count(&manager, &main, "entry"), 1);
    assert_eq!((manager.main_len(), manager.cache_len()), (1, 0));

    // Adding again updates the main entry rather than shadowing it from the cache.
    manager.add_resource_adapter(BUNDLE, "entry", cached.clone(), true);
    assert_eq!(store_count(&manager, &cached, "entry"), 1);
    assert_eq!((manager.main_len(), manager.cache_len()), (1, 0));

    manager.remove_resource_adapter(BUNDLE, "entry");
    assert!(manager.get_resource_adapter(BUNDLE, "entry").is_none());
    assert_eq!((manager.main_len(), manager.cache_len()), (0, 0));
}

#[test]
fn lru_evicts_least_recently_used() {
    let factory = Arc::new(CountingFactory::default());
    let manager = ResourceManager::new(factory.clone());

    for module in ["a", "b", "c"] {
        manager.get_or_create_resource_adapter(&request(module));
    }
    // Touch "a" so "b" becomes the oldest.
    manager.get_or_create_resource_adapter(&request("a"));
    manager.get_or_create_resource_adapter(&request("d"));
    manager.get_or_create_resource_adapter(&request("e"));

    assert_eq!(manager.cache_len(), 3);
    assert_eq!(
        manager.cached_keys(),
        vec!["com.example.app.e", "com.example.app.d", "com.example.app.a"]
    );
    assert_eq!(factory.calls(), 5);
}

#[test]
fn configured_capacity_is_respected() {
    let config = ResourceManagerConfig::from_toml_str("cache_capacity = 1").unwrap();
    let manager = ResourceManager::with_config(Arc::new(CountingFactory::default()), config);
    manager.get_or_create_resource_adapter(&request("a"));
    manager.get_or_create_resource_adapter(&request("b"));
    assert_eq!(manager.cached_keys(), vec!["com.example.app.b"]);
}

#[test]
fn default_adapter_survives_reset() {
    let manager = ResourceManager::new(Arc::new(CountingFactory::default()));
    let default: Arc<dyn ResourceAdapter> = Arc::new(DefaultResourceAdapter::new());
    manager.add_resource_adapter("", "", default.clone(), false);
    manager.get_or_create_resource_adapter(&request("a"));

    let found = manager.get_resource_adapter("", "").unwrap();
    assert!(Arc::ptr_eq(&found, &default));

    manager.reset();
    assert_eq!(manager.cache_len(), 0);
    let found = manager.get_resource_adapter("", "").unwrap();
    assert!(Arc::ptr_eq(&found, &default));
}

#[test]
fn identical_config_updates_reach_the_platform_once() {
    let platform = indexed();
    let adapter = PlatformResourceAdapter::new(platform.clone());
    let config = ResourceConfiguration::default().with_locale("en-US");

    adapter.update_config(&config, false);
    adapter.update_config(&config, false);
    assert_eq!(platform.update_count(), 1);

    adapter.update_config(&config.clone().with_color_mode(ColorMode::Dark), false);
    assert_eq!(platform.update_count(), 2);
}

#[test]
fn broadcast_applies_to_every_adapter_before_returning() {
    let manager = ResourceManager::new(Arc::new(CountingFactory::default()));
    let platforms: Vec<_> = (0..3).map(|_| indexed()).collect();
    for (i, platform) in platforms.iter().enumerate() {
        let adapter: Arc<dyn ResourceAdapter> = Arc::new(PlatformResourceAdapter::new(platform.clone()));
        if i == 0 {
            manager.register_main_resource_adapter(BUNDLE, "entry", adapter);
        } else {
            manager.add_resource_adapter(BUNDLE, &format!("feature{i}"), adapter, false);
        }
    }

    let config = ResourceConfiguration::default().with_locale("en-US");
    manager.update_resource_config(&config, false);
    manager.update_resource_config(&config, false);
    manager.update_color_mode(ColorMode::Dark);

    for platform in &platforms {
        assert_eq!(platform.update_count(), 2);
        assert_eq!(platform.res_config().color_mode, ColorMode::Dark);
    }
}

#[test]
fn dark_mode_requires_opt_in() {
    let platform = indexed();
    let adapter = PlatformResourceAdapter::new(platform.clone());
    adapter.update_color_mode(ColorMode::Dark);
    assert_eq!(adapter.resource_color_mode(), ColorMode::Light);

    let mut opted_in = ResourceConfiguration::default().with_color_mode(ColorMode::Dark);
    opted_in.app_color_mode = true;
    adapter.update_config(&opted_in, false);
    assert_eq!(adapter.resource_color_mode(), ColorMode::Dark);

    let with_dark_res = PlatformResourceAdapter::new(indexed()).with_dark_res(true);
    with_dark_res.update_color_mode(ColorMode::Dark);
    assert_eq!(with_dark_res.resource_color_mode(), ColorMode::Dark);
}

#[test]
fn registered_adapter_is_reused_without_construction() {
    let factory = Arc::new(CountingFactory::default());
    let manager = ResourceManager::new(factory.clone());
    let registered: Arc<dyn ResourceAdapter> = Arc::new(PlatformResourceAdapter::new(indexed()));
    manager.register_main_resource_adapter(BUNDLE, "entry", registered.clone());

    let adapter = manager.get_or_create_resource_adapter(&request("entry"));
    assert!(Arc::ptr_eq(&adapter, &registered));
    assert_eq!(factory.calls(), 0);
    assert_eq!(adapter.color(16777216), Color::WHITE);

    manager.remove_resource_adapter(BUNDLE, "entry");
    assert!(!manager.is_resource_adapter_record(BUNDLE, "entry"));
}

#[test]
fn empty_themes_resolve_to_none() {
    let adapter = PlatformResourceAdapter::new(indexed());
    assert!(adapter.theme(5).is_none());
    assert!(adapter.theme(-1).is_none());
    assert!(adapter.theme(404).is_none());
}

#[test]
fn platform_factory_builds_adapters_from_context() {
    let context = Arc::new(StaticResourceContext::new(BUNDLE, "entry"));
    context.insert_module(BUNDLE, "entry", indexed());
    let recorder = Arc::new(ResourceErrorRecorder::new());
    let factory = PlatformAdapterFactory::new(context, recorder.clone());
    let manager = ResourceManager::new(Arc::new(factory));

    let adapter = manager.get_or_create_resource_adapter(&request("entry"));
    assert_eq!(adapter.kind(), AdapterKind::Platform);
    assert_eq!(adapter.color_by_name("missing"), Color::BLACK);
    assert_eq!(recorder.len(), 1);

    // Unknown modules fall back to the synthesized default adapter.
    let fallback = manager.get_or_create_resource_adapter(&request("feature"));
    assert_eq!(fallback.kind(), AdapterKind::Default);
    assert!(!manager.is_resource_adapter_record(BUNDLE, "feature"));
}
