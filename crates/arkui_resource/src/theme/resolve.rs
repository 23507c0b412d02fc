use std::collections::VecDeque;
use std::sync::{Arc, Weak};

use rustc_hash::{FxHashMap, FxHashSet};

use super::policy::{PatternLoad, ThemeLoadPolicy};
use super::{ThemeAttr, ThemeStyle};
use crate::object::ResourceType;
use crate::platform::{PatternData, PlatformResourceManager, PlatformResult, ResValue};

/// Children of a nested pattern entry: by numeric id, then `$pattern:name`, then by tag
fn nested_pattern(
    platform: &dyn PlatformResourceManager,
    tag: &str,
    value: &ResValue,
) -> PlatformResult<PatternData> {
    let raw = value.value.trim();
    if let Ok(id) = raw.parse::<u32>() {
        if let Ok(data) = platform.pattern_by_id(id) {
            return Ok(data);
        }
    }
    let name = raw.strip_prefix("$pattern:").unwrap_or(tag);
    platform.pattern_by_name(name)
}

fn theme_data(
    platform: &dyn PlatformResourceManager,
    theme_id: i64,
    policy: &ThemeLoadPolicy,
) -> Option<(u32, PatternData)> {
    let fallback = policy.fallback_theme_id();
    let requested = u32::try_from(theme_id).unwrap_or(fallback);
    match platform.theme_data_by_id(requested) {
        Ok(data) => return Some((requested, data)),
        Err(status) if requested == fallback => {
            tracing::warn!("theme {} unavailable: {}", requested, status);
            return None;
        }
        Err(status) => {
            tracing::debug!("theme {} unavailable ({}), using fallback {}", requested, status, fallback);
        }
    }
    match platform.theme_data_by_id(fallback) {
        Ok(data) => Some((fallback, data)),
        Err(status) => {
            tracing::warn!("fallback theme {} unavailable: {}", fallback, status);
            None
        }
    }
}

/// Resolve a theme into a [`ThemeStyle`].
///
/// Returns `None` when neither the requested nor the fallback theme resolves, or when
/// the resolved theme carries no attributes.
pub(crate) fn build_theme(
    platform: &dyn PlatformResourceManager,
    theme_id: i64,
    policy: &ThemeLoadPolicy,
) -> Option<ThemeStyle> {
    let (resolved_id, data) = theme_data(platform, theme_id, policy)?;

    let mut queue: VecDeque<(String, ResValue)> = data.into_iter().collect();
    let mut raw = PatternData::default();
    let mut groups: FxHashMap<String, PatternData> = FxHashMap::default();
    let mut expanded: FxHashSet<String> = FxHashSet::default();

    while let Some((tag, value)) = queue.pop_front() {
        if value.res_type != ResourceType::Pattern {
            raw.insert(tag, value);
            continue;
        }
        match policy.classify(&tag) {
            PatternLoad::Sync => match platform.pattern_by_name(&tag) {
                Ok(group) => {
                    groups.insert(tag, group);
                }
                Err(status) => tracing::debug!("pattern {} unavailable: {}", tag, status),
            },
            PatternLoad::Expand => {
                if !expanded.insert(tag.clone()) {
                    continue;
                }
                match nested_pattern(platform, &tag, &value) {
                    Ok(children) => queue.extend(children),
                    Err(status) => tracing::debug!("nested pattern {} unavailable: {}", tag, status),
                }
            }
            PatternLoad::Skip => tracing::trace!("pattern {} deferred", tag),
        }
    }

    if raw.is_empty() && groups.is_empty() {
        tracing::debug!("theme {} has no attributes", resolved_id);
        return None;
    }

    let style = ThemeStyle::from_pattern(resolved_id.to_string(), &raw);
    for (tag, group) in groups {
        let pattern = ThemeStyle::from_pattern(tag.clone(), &group);
        style.set_attr(tag, ThemeAttr::Pattern(Arc::new(pattern)));
    }
    Some(style)
}

/// Attach `names` to the style once fetched. No-op if the style was dropped meanwhile.
pub(crate) fn preload_patterns(
    platform: &dyn PlatformResourceManager,
    style: &Weak<ThemeStyle>,
    names: &[String],
) {
    for name in names {
        let Some(target) = style.upgrade() else {
            tracing::trace!("theme dropped before preload finished");
            return;
        };
        match platform.pattern_by_name(name) {
            Ok(data) => {
                let pattern = ThemeStyle::from_pattern(name.clone(), &data);
                target.set_attr(name.clone(), ThemeAttr::Pattern(Arc::new(pattern)));
            }
            Err(status) => tracing::debug!("preload of pattern {} failed: {}", name, status),
        }
    }
    if let Some(target) = style.upgrade() {
        target.finish_preload();
    }
}
