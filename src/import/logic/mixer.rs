use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde_json::Value;

use crate::model::{ProjectModel, TrackMixerState};
use crate::util::{read_json, write_json, JsonFileError};

/// Load per-track mixer overrides from a JSON object of
/// `track name → {volume_db, pan, is_muted, is_soloed}`.
///
/// A missing, unreadable or non-object file yields no overrides. Entries whose
/// value is not an object are skipped; absent fields take their defaults.
pub fn load_mixer_overrides(path: &Path) -> IndexMap<String, TrackMixerState> {
    let data = match read_json::<Value>(path) {
        Ok(data) => data,
        Err(JsonFileError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            return IndexMap::new();
        }
        Err(e) => {
            log::warn!("ignoring mixer overrides in {}: {e}", path.display());
            return IndexMap::new();
        }
    };

    let Value::Object(entries) = data else {
        log::warn!("ignoring mixer overrides in {}: not a JSON object", path.display());
        return IndexMap::new();
    };

    entries
        .into_iter()
        .filter_map(|(track, values)| {
            let Value::Object(fields) = values else {
                return None;
            };
            Some((track, state_from_fields(&fields)))
        })
        .collect()
}

/// Numbers and bools are read leniently: numeric strings parse, and any
/// truthy JSON value counts as `true`.
fn state_from_fields(fields: &serde_json::Map<String, Value>) -> TrackMixerState {
    let number = |key: &str| fields.get(key).and_then(as_f64).unwrap_or(0.0);
    let flag = |key: &str| fields.get(key).is_some_and(is_truthy);
    TrackMixerState {
        volume_db: number("volume_db"),
        pan: number("pan"),
        is_muted: flag("is_muted"),
        is_soloed: flag("is_soloed"),
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Write `mixer_overrides.json` into `dir` with an all-defaults entry for
/// every track, ready for hand editing.
pub fn write_mixer_template(project: &ProjectModel, dir: &Path) -> Result<PathBuf, JsonFileError> {
    std::fs::create_dir_all(dir)?;
    let template: IndexMap<&str, TrackMixerState> = project
        .track_names
        .iter()
        .map(|name| (name.as_str(), TrackMixerState::default()))
        .collect();
    let path = crate::paths::mixer_overrides_path(dir);
    write_json(&path, &template)?;
    Ok(path)
}
