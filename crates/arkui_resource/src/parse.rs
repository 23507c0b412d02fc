//! Typed resolution of [`ResourceObject`]s
//!
//! These helpers dispatch a request to the right adapter call: by id, or by name when
//! the id is [`UNKNOWN_RESOURCE_ID`](crate::UNKNOWN_RESOURCE_ID). Format arguments
//! after the name are substituted into string and plural results.

use arkui_core::{Color, Dimension};

use crate::adapter::ResourceAdapter;
use crate::object::{ResourceObject, ResourceType};
use crate::placeholder::apply_placeholders;

enum Target<'a> {
    Id(u32),
    Name(&'a str),
}

fn target(object: &ResourceObject) -> Option<Target<'_>> {
    if object.is_by_name() {
        return object.name().filter(|n| !n.is_empty()).map(Target::Name);
    }
    object.resource_id().map(Target::Id)
}

fn unresolvable(object: &ResourceObject, wanted: &str) {
    tracing::warn!(
        "cannot resolve {} from {} resource `{}`",
        wanted,
        object.res_type(),
        object.request_key()
    );
}

pub fn resolve_color(adapter: &dyn ResourceAdapter, object: &ResourceObject) -> Color {
    match (object.res_type(), target(object)) {
        (ResourceType::Color, Some(Target::Id(id))) => adapter.color(id),
        (ResourceType::Color, Some(Target::Name(name))) => adapter.color_by_name(name),
        (ResourceType::String, Some(_)) => {
            let text = resolve_string(adapter, object);
            text.parse().unwrap_or_else(|_| {
                tracing::warn!("string resource `{}` is not a color: {}", object.request_key(), text);
                Color::default()
            })
        }
        _ => {
            unresolvable(object, "color");
            Color::default()
        }
    }
}

pub fn resolve_dimension(adapter: &dyn ResourceAdapter, object: &ResourceObject) -> Dimension {
    match (object.res_type(), target(object)) {
        (ResourceType::Float, Some(Target::Id(id))) => adapter.dimension(id),
        (ResourceType::Float, Some(Target::Name(name))) => adapter.dimension_by_name(name),
        (ResourceType::Integer, Some(Target::Id(id))) => Dimension::vp(adapter.integer(id) as f64),
        (ResourceType::Integer, Some(Target::Name(name))) => {
            Dimension::vp(adapter.integer_by_name(name) as f64)
        }
        (ResourceType::String, Some(_)) => {
            let text = resolve_string(adapter, object);
            text.parse().unwrap_or_else(|_| {
                tracing::warn!("string resource `{}` is not a dimension: {}", object.request_key(), text);
                Dimension::default()
            })
        }
        _ => {
            unresolvable(object, "dimension");
            Dimension::default()
        }
    }
}

/// String or plural text with format arguments applied
pub fn resolve_string(adapter: &dyn ResourceAdapter, object: &ResourceObject) -> String {
    match (object.res_type(), target(object)) {
        (ResourceType::String, Some(target)) => {
            let template = match target {
                Target::Id(id) => adapter.string(id),
                Target::Name(name) => adapter.string_by_name(name),
            };
            apply_placeholders(&template, object.format_args())
        }
        (ResourceType::Plural, Some(_)) => resolve_plural(adapter, object),
        _ => {
            unresolvable(object, "string");
            String::new()
        }
    }
}

/// Plural text; the first format argument is the quantity
pub fn resolve_plural(adapter: &dyn ResourceAdapter, object: &ResourceObject) -> String {
    let args = object.format_args();
    let quantity = args.first().and_then(|p| p.as_int()).unwrap_or(0);
    let rest = args.get(1..).unwrap_or_default();
    match (object.res_type(), target(object)) {
        (ResourceType::Plural, Some(Target::Id(id))) => adapter.plural_string(id, quantity, rest),
        (ResourceType::Plural, Some(Target::Name(name))) => {
            adapter.plural_string_by_name(name, quantity, rest)
        }
        _ => {
            unresolvable(object, "plural");
            String::new()
        }
    }
}

/// Media path, or raw file path for `rawfile` requests
pub fn resolve_media_path(adapter: &dyn ResourceAdapter, object: &ResourceObject) -> String {
    match (object.res_type(), target(object)) {
        (ResourceType::Media, Some(Target::Id(id))) => adapter.media_path(id),
        (ResourceType::Media, Some(Target::Name(name))) => adapter.media_path_by_name(name),
        (ResourceType::RawFile, _) => match object.params().first().and_then(|p| p.as_str()) {
            Some(name) => adapter.raw_file_path(name),
            None => {
                unresolvable(object, "raw file");
                String::new()
            }
        },
        _ => {
            unresolvable(object, "media");
            String::new()
        }
    }
}

pub fn resolve_symbol(adapter: &dyn ResourceAdapter, object: &ResourceObject) -> u32 {
    match (object.res_type(), target(object)) {
        (ResourceType::Symbol, Some(Target::Id(id))) => adapter.symbol(id),
        (ResourceType::Symbol, Some(Target::Name(name))) => adapter.symbol_by_name(name),
        _ => {
            unresolvable(object, "symbol");
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::PlatformResourceAdapter;
    use crate::index::{IndexedResourceManager, ResourceIndex};
    use crate::object::{ResourceParam, UNKNOWN_RESOURCE_ID};
    use arkui_core::DimensionUnit;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    const INDEX: &str = r##"
[[resource]]
id = 1
name = "greeting"
type = "string"
value = "Hi %s, you have %d new messages"

[[resource]]
id = 2
name = "files"
type = "plural"
plural = { one = "%d file in %s", other = "%d files in %s" }

[[resource]]
id = 3
name = "accent_text"
type = "string"
value = "#FF0A59F7"

[[resource]]
id = 4
name = "gap"
type = "float"
value = "50%"

[[resource]]
id = 5
name = "check"
type = "symbol"
value = "983041"
"##;

    fn adapter() -> PlatformResourceAdapter {
        let index = ResourceIndex::from_toml_str(INDEX).unwrap();
        PlatformResourceAdapter::new(Arc::new(IndexedResourceManager::new(Arc::new(index))))
    }

    #[test]
    fn string_with_format_args() {
        let object = ResourceObject::by_name("app.string.greeting", ResourceType::String)
            .with_param("Ann")
            .with_param(4);
        assert_eq!(resolve_string(&adapter(), &object), "Hi Ann, you have 4 new messages");
    }

    #[test]
    fn plural_takes_quantity_then_args() {
        let object = ResourceObject::new(
            2,
            ResourceType::Plural,
            vec![ResourceParam::Int(1), "Inbox".into()],
        );
        assert_eq!(resolve_plural(&adapter(), &object), "1 file in Inbox");
        assert_eq!(resolve_string(&adapter(), &object), "1 file in Inbox");
    }

    #[test]
    fn color_from_string_resource() {
        let object = ResourceObject::by_id(3, ResourceType::String);
        assert_eq!(resolve_color(&adapter(), &object).to_argb(), 0xFF0A59F7);
    }

    #[test]
    fn percent_dimension() {
        let object = ResourceObject::by_name("gap", ResourceType::Float);
        assert_eq!(
            resolve_dimension(&adapter(), &object),
            Dimension::new(50.0, DimensionUnit::Percent)
        );
    }

    #[test]
    fn symbol_and_mismatches() {
        assert_eq!(resolve_symbol(&adapter(), &ResourceObject::by_id(5, ResourceType::Symbol)), 0xF0001);
        let nameless = ResourceObject::new(UNKNOWN_RESOURCE_ID, ResourceType::Color, Vec::new());
        assert_eq!(resolve_color(&adapter(), &nameless), Color::BLACK);
        assert_eq!(resolve_symbol(&adapter(), &ResourceObject::by_id(5, ResourceType::Media)), 0);
    }
}
