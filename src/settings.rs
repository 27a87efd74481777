use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::util::{read_json, write_json, JsonFileError};

const SETTINGS_VERSION: u32 = 1;

/// Converter defaults stored in the OS config directory. Every field is
/// optional in the file; command-line flags override what is set here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterSettings {
    pub version: u32,
    /// Session template used when `--template` is not given.
    pub template_path: Option<PathBuf>,
    /// VST3 folder scanned for replacement suggestions.
    pub vst3_path: Option<PathBuf>,
    pub copy_audio: bool,
    pub json_progress: bool,
}

impl Default for ConverterSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            template_path: None,
            vst3_path: None,
            copy_audio: true,
            json_progress: false,
        }
    }
}

/// Load settings from `path`. Returns None if the file is missing or
/// unreadable; callers fall back to defaults.
pub fn load_settings_file(path: &Path) -> Option<ConverterSettings> {
    if !path.exists() {
        return None;
    }
    match read_json::<ConverterSettings>(path) {
        Ok(settings) => Some(settings),
        Err(e) => {
            log::warn!("ignoring settings file {}: {e}", path.display());
            None
        }
    }
}

/// Write settings to `path`, creating its directory.
pub fn save_settings_file(path: &Path, settings: &ConverterSettings) -> Result<(), JsonFileError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    write_json(path, settings)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let settings = ConverterSettings {
            template_path: Some(PathBuf::from("/templates/Default.als")),
            copy_audio: false,
            ..ConverterSettings::default()
        };
        let path = dir.path().join("nested").join("settings.json");
        save_settings_file(&path, &settings).unwrap();

        let loaded = load_settings_file(&path).expect("should load");
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"vst3_path": "/vst3"}"#).unwrap();

        let loaded = load_settings_file(&path).unwrap();
        assert_eq!(loaded.vst3_path, Some(PathBuf::from("/vst3")));
        assert!(loaded.copy_audio);
        assert!(!loaded.json_progress);
        assert_eq!(loaded.version, SETTINGS_VERSION);
    }

    #[test]
    fn test_load_missing_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_settings_file(&dir.path().join("settings.json")).is_none());
    }

    #[test]
    fn test_malformed_file_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(load_settings_file(&path).is_none());
    }
}
