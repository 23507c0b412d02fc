//! ArkUI resource CLI
//!
//! Loads a resource index, wires it into a [`ResourceManager`] the same way an
//! application container does, and resolves single resources or whole themes.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use arkui_core::TokioTaskExecutor;
use arkui_resource::{
    resolve_color, resolve_dimension, resolve_plural, resolve_string, ColorMode,
    IndexedResourceManager, PlatformAdapterFactory, ResourceAdapter, ResourceConfiguration,
    ResourceErrorRecorder, ResourceIndex, ResourceManager, ResourceManagerConfig, ResourceObject,
    ResourceParam, ResourceType, StaticResourceContext, ThemeAttr, ThemeStyle,
};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod config;

use config::ArkuiConfig;

#[derive(Debug, Parser)]
#[command(name = "arkui-res", version, about = "Resolve ArkUI resources from a resource index")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve a color
    Color(Lookup),
    /// Resolve a string, with optional format arguments
    #[command(name = "string")]
    Text(Lookup),
    /// Resolve a dimension
    Dimension(Lookup),
    /// Resolve a plural string for a quantity
    Plural {
        #[command(flatten)]
        lookup: Lookup,
        /// Quantity that selects the plural form
        #[arg(short, long)]
        quantity: i64,
    },
    /// Print the attributes of a theme
    Theme {
        #[command(flatten)]
        env: Environment,
        /// Theme id; negative or omitted uses the fallback theme
        #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
        id: i64,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate an arkui.toml and print the effective configuration
    Config {
        /// File or directory containing arkui.toml
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

/// Where to load resources from and under which configuration
#[derive(Debug, Args)]
struct Environment {
    /// Resource index (TOML)
    index: PathBuf,
    /// Resolve with the dark color mode
    #[arg(long)]
    dark: bool,
    /// Locale tag, e.g. `zh-Hans-CN`
    #[arg(long)]
    locale: Option<String>,
    /// arkui.toml with bundle/module names and manager settings
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct Lookup {
    #[command(flatten)]
    env: Environment,
    /// Resource name, e.g. `app.color.brand` or `brand`
    #[arg(long, conflicts_with = "id", required_unless_present = "id")]
    name: Option<String>,
    /// Numeric resource id
    #[arg(long)]
    id: Option<u32>,
    /// Format argument; repeat for more
    #[arg(long = "arg")]
    args: Vec<String>,
}

/// A manager wired to one index, plus the sink for failed lookups
struct Session {
    manager: ResourceManager,
    recorder: Arc<ResourceErrorRecorder>,
    bundle: String,
    module: String,
}

impl Session {
    fn open(env: &Environment) -> Result<Self> {
        let config = match &env.config {
            Some(path) => ArkuiConfig::load(path)?,
            None => ArkuiConfig::default(),
        };
        let index = ResourceIndex::from_path(&env.index)
            .with_context(|| format!("Failed to load resource index {}", env.index.display()))?;
        tracing::debug!("loaded {} resources from {}", index.resource_count(), env.index.display());

        let ArkuiConfig { app, manager } = config;
        let context = Arc::new(StaticResourceContext::new(&app.bundle, &app.module));
        context.insert_module(
            &app.bundle,
            &app.module,
            Arc::new(IndexedResourceManager::new(Arc::new(index))),
        );
        let recorder = Arc::new(ResourceErrorRecorder::new());
        let executor = TokioTaskExecutor::new().context("Failed to start background executor")?;
        let factory = PlatformAdapterFactory::new(context, recorder.clone())
            .with_executor(Arc::new(executor))
            .with_theme_policy(manager.theme_policy());
        let manager = ResourceManager::with_config(Arc::new(factory), manager);

        let mut configuration = ResourceConfiguration::default();
        if let Some(locale) = &env.locale {
            configuration = configuration.with_locale(locale);
        }
        if env.dark {
            configuration = configuration.with_color_mode(ColorMode::Dark);
            configuration.app_color_mode = true;
        }
        manager.update_resource_config(&configuration, false);

        Ok(Self {
            manager,
            recorder,
            bundle: app.bundle,
            module: app.module,
        })
    }

    fn adapter(&self, object: &ResourceObject) -> Arc<dyn ResourceAdapter> {
        self.manager.get_or_create_resource_adapter(object)
    }

    fn request(&self, lookup: &Lookup, res_type: ResourceType, leading: Option<ResourceParam>) -> ResourceObject {
        let object = match (&lookup.name, lookup.id) {
            (Some(name), _) => ResourceObject::by_name(name.as_str(), res_type),
            (None, Some(id)) => ResourceObject::by_id(id, res_type),
            (None, None) => ResourceObject::by_name("", res_type),
        };
        let mut object = object.with_module(self.bundle.as_str(), self.module.as_str());
        if let Some(param) = leading {
            object = object.with_param(param);
        }
        lookup
            .args
            .iter()
            .fold(object, |object, arg| object.with_param(arg.as_str()))
    }

    /// Fail if any lookup was recorded as unresolved
    fn finish(&self) -> Result<()> {
        let failures = self.recorder.drain();
        for record in &failures {
            eprintln!(
                "unresolved {} `{}` (platform code {})",
                record.kind, record.requested, record.error_code
            );
        }
        if !failures.is_empty() {
            anyhow::bail!("{} lookup(s) failed", failures.len());
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Color(lookup) => {
            let session = Session::open(&lookup.env)?;
            let object = session.request(&lookup, ResourceType::Color, None);
            let color = resolve_color(session.adapter(&object).as_ref(), &object);
            session.finish()?;
            println!("{}", color);
        }
        Command::Text(lookup) => {
            let session = Session::open(&lookup.env)?;
            let object = session.request(&lookup, ResourceType::String, None);
            let text = resolve_string(session.adapter(&object).as_ref(), &object);
            session.finish()?;
            println!("{}", text);
        }
        Command::Dimension(lookup) => {
            let session = Session::open(&lookup.env)?;
            let object = session.request(&lookup, ResourceType::Float, None);
            let dimension = resolve_dimension(session.adapter(&object).as_ref(), &object);
            session.finish()?;
            println!("{}", dimension);
        }
        Command::Plural { lookup, quantity } => {
            let session = Session::open(&lookup.env)?;
            let object = session.request(&lookup, ResourceType::Plural, Some(quantity.into()));
            let text = resolve_plural(session.adapter(&object).as_ref(), &object);
            session.finish()?;
            println!("{}", text);
        }
        Command::Theme { env, id, json } => {
            let session = Session::open(&env)?;
            let object = ResourceObject::by_id(0, ResourceType::Pattern)
                .with_module(session.bundle.as_str(), session.module.as_str());
            let Some(theme) = session.adapter(&object).theme(id) else {
                anyhow::bail!("theme {} not found or empty", id);
            };
            if !theme.check_loaded(Duration::from_secs(2)) {
                tracing::warn!("background theme patterns still loading");
            }
            if json {
                let value = theme_to_json(&theme);
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                print_theme(&theme, 0);
            }
        }
        Command::Config { path } => {
            let config = ArkuiConfig::load(&path)?;
            check_config(&config.manager)?;
            print!("{}", config.to_toml()?);
        }
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn check_config(manager: &ResourceManagerConfig) -> Result<()> {
    if manager.cache_capacity == 0 {
        tracing::warn!("cache_capacity = 0 is treated as 1");
    }
    let policy = manager.theme_policy();
    for name in &manager.theme.sync_load {
        if manager.theme.not_sync_load.contains(name) {
            anyhow::bail!("pattern `{}` is both sync-loaded and excluded", name);
        }
    }
    tracing::debug!("fallback theme {}", policy.fallback_theme_id());
    Ok(())
}

fn attr_text(attr: &ThemeAttr) -> String {
    match attr {
        ThemeAttr::Color(color) => color.to_string(),
        ThemeAttr::Dimension(dimension) => dimension.to_string(),
        ThemeAttr::Double(value) => value.to_string(),
        ThemeAttr::Int(value) => value.to_string(),
        ThemeAttr::Str(value) => value.clone(),
        ThemeAttr::Symbol(value) => format!("{:#x}", value),
        ThemeAttr::Pattern(pattern) => format!("<pattern {}>", pattern.name()),
    }
}

fn print_theme(theme: &ThemeStyle, depth: usize) {
    let indent = "  ".repeat(depth);
    for tag in theme.tags() {
        match theme.attr(&tag) {
            Some(ThemeAttr::Pattern(pattern)) => {
                println!("{}{}:", indent, tag);
                print_theme(&pattern, depth + 1);
            }
            Some(attr) => println!("{}{} = {}", indent, tag, attr_text(&attr)),
            None => {}
        }
    }
}

fn theme_to_json(theme: &ThemeStyle) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    for tag in theme.tags() {
        let value = match theme.attr(&tag) {
            Some(ThemeAttr::Pattern(pattern)) => theme_to_json(&pattern),
            Some(ThemeAttr::Double(value)) => serde_json::json!(value),
            Some(ThemeAttr::Int(value)) => serde_json::json!(value),
            Some(attr) => serde_json::Value::String(attr_text(&attr)),
            None => continue,
        };
        map.insert(tag, value);
    }
    serde_json::Value::Object(map)
}
