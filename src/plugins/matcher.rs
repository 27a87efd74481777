use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;

use super::{lookup_au_plugin, scan_vst3_plugins, PluginCategory};
use crate::model::PluginInstance;

/// Most replacements suggested per source plugin.
pub const MAX_SUGGESTIONS: usize = 5;

/// A source plugin paired with installed plugins of the same category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginMatch {
    pub source_name: String,
    pub preset_name: String,
    pub category: PluginCategory,
    pub character: String,
    pub suggestions: Vec<String>,
}

/// Identify each plugin instance and suggest installed VST3 plugins of the
/// same category. Unknown codes are reported, not dropped. Without a VST3
/// folder there are no suggestions.
pub fn match_plugins(plugins: &[PluginInstance], vst3_dir: Option<&Path>) -> Vec<PluginMatch> {
    let mut by_category: HashMap<PluginCategory, Vec<String>> = HashMap::new();
    let installed_plugins = vst3_dir.map(scan_vst3_plugins).unwrap_or_default();
    for installed in installed_plugins {
        by_category
            .entry(installed.category)
            .or_default()
            .push(installed.name);
    }

    plugins
        .iter()
        .map(|plugin| {
            let (source_name, category, character) =
                match lookup_au_plugin(&plugin.au_manufacturer, &plugin.au_subtype) {
                    Some(info) => (info.name.to_string(), info.category, info.character.to_string()),
                    None => (
                        format!("Unknown ({}/{})", plugin.au_manufacturer, plugin.au_subtype),
                        PluginCategory::Unknown,
                        String::new(),
                    ),
                };
            let suggestions = by_category
                .get(&category)
                .map(|names| names.iter().take(MAX_SUGGESTIONS).cloned().collect())
                .unwrap_or_default();
            PluginMatch {
                source_name,
                preset_name: plugin.name.clone(),
                category,
                character,
                suggestions,
            }
        })
        .collect()
}
