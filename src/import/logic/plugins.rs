use std::io::Cursor;

use plist::{Integer, Value};

use super::constants::{plugin_key, EMBEDDED_PLIST_END, EMBEDDED_PLIST_START};
use crate::model::PluginInstance;

/// Pull plugin instances out of the property lists embedded in a
/// `ProjectData` blob.
///
/// Each `<?xml version` is paired with the next `</plist>`. Spans that fail
/// to decode, are not dictionaries, or lack a `name` key are skipped.
pub fn extract_plugins(project_data: &[u8]) -> Vec<PluginInstance> {
    let mut plugins = Vec::new();
    let mut search_from = 0;

    while let Some(start) = find_bytes(project_data, EMBEDDED_PLIST_START, search_from) {
        search_from = start + EMBEDDED_PLIST_START.len();
        let Some(end_marker) = find_bytes(project_data, EMBEDDED_PLIST_END, start) else {
            continue;
        };
        let end = end_marker + EMBEDDED_PLIST_END.len();
        let Some(span) = project_data.get(start..end) else {
            continue;
        };

        let dict = match Value::from_reader(Cursor::new(span)) {
            Ok(Value::Dictionary(dict)) => dict,
            Ok(_) => continue,
            Err(e) => {
                log::debug!("skipping undecodable embedded plist at byte {start}: {e}");
                continue;
            }
        };
        let Some(name) = dict.get(plugin_key::NAME) else {
            continue;
        };

        plugins.push(PluginInstance {
            name: stringify(name),
            au_type: code_field(dict.get(plugin_key::TYPE)),
            au_subtype: code_field(dict.get(plugin_key::SUBTYPE)),
            au_manufacturer: code_field(dict.get(plugin_key::MANUFACTURER)),
            is_waves: dict.contains_key(plugin_key::WAVES_PRESET),
            raw: dict,
        });
    }

    log::debug!("found {} embedded plugin plists", plugins.len());
    plugins
}

/// Render an integer as a four-character code: its big-endian bytes, with
/// non-ASCII bytes replaced by U+FFFD. Values outside `u32` are rendered as
/// decimal.
pub fn int_to_fourcc(n: i64) -> String {
    match u32::try_from(n) {
        Ok(v) => v
            .to_be_bytes()
            .iter()
            .map(|&b| if b.is_ascii() { char::from(b) } else { char::REPLACEMENT_CHARACTER })
            .collect(),
        Err(_) => n.to_string(),
    }
}

/// A missing code field counts as 0; non-integer values are stringified.
fn code_field(value: Option<&Value>) -> String {
    match value {
        None => int_to_fourcc(0),
        Some(Value::Integer(i)) => match i.as_signed() {
            Some(n) => int_to_fourcc(n),
            None => integer_text(*i),
        },
        Some(other) => stringify(other),
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Integer(i) => integer_text(*i),
        Value::Real(r) => r.to_string(),
        Value::Boolean(b) => b.to_string(),
        other => format!("{other:?}"),
    }
}

fn integer_text(i: Integer) -> String {
    match (i.as_signed(), i.as_unsigned()) {
        (Some(n), _) => n.to_string(),
        (None, Some(n)) => n.to_string(),
        (None, None) => String::new(),
    }
}

fn find_bytes(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    haystack
        .get(from..)?
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|pos| pos + from)
}
