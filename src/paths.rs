//! Centralized path definitions for the source bundle, the generated Live
//! project, and the locations searched for external resources.
//!
//! This module is the single source of truth for leaf filenames and directory
//! names. No other module should hard-code these strings.

use std::path::{Path, PathBuf};

// ── Application identity ─────────────────────────────────────────

pub const APP_ID: &str = "logic2live";

pub const SETTINGS_FILE: &str = "settings.json";

// ── Logic bundle layout ──────────────────────────────────────────

pub const RESOURCES_DIR: &str = "Resources";
pub const PROJECT_INFO_FILE: &str = "ProjectInformation.plist";
pub const ALTERNATIVES_DIR: &str = "Alternatives";
pub const METADATA_FILE: &str = "MetaData.plist";
pub const PROJECT_DATA_FILE: &str = "ProjectData";
pub const MEDIA_DIR: &str = "Media";
pub const AUDIO_FILES_DIR: &str = "Audio Files";

/// Prefix Logic puts in front of audio filenames listed in `MetaData.plist`.
pub const AUDIO_FILES_PREFIX: &str = "Audio Files/";

pub fn project_info_path(bundle: &Path) -> PathBuf {
    bundle.join(RESOURCES_DIR).join(PROJECT_INFO_FILE)
}

pub fn alternative_dir(bundle: &Path, alternative: u32) -> PathBuf {
    bundle
        .join(ALTERNATIVES_DIR)
        .join(format!("{alternative:03}"))
}

pub fn metadata_path(bundle: &Path, alternative: u32) -> PathBuf {
    alternative_dir(bundle, alternative).join(METADATA_FILE)
}

pub fn project_data_path(bundle: &Path, alternative: u32) -> PathBuf {
    alternative_dir(bundle, alternative).join(PROJECT_DATA_FILE)
}

pub fn audio_files_dir(bundle: &Path) -> PathBuf {
    bundle.join(MEDIA_DIR).join(AUDIO_FILES_DIR)
}

// ── Live project layout ──────────────────────────────────────────

pub const SAMPLES_DIR: &str = "Samples";
pub const IMPORTED_DIR: &str = "Imported";
pub const SESSION_EXT: &str = "als";
pub const MIXER_OVERRIDES_FILE: &str = "mixer_overrides.json";

/// Path of a sample relative to the Live project folder, always `/`-separated.
pub fn imported_sample_relative(filename: &str) -> String {
    format!("{SAMPLES_DIR}/{IMPORTED_DIR}/{filename}")
}

pub fn live_project_dir(output_dir: &Path, project_name: &str) -> PathBuf {
    output_dir.join(format!("{project_name} Project"))
}

pub fn session_file(project_dir: &Path, project_name: &str) -> PathBuf {
    project_dir.join(format!("{project_name}.{SESSION_EXT}"))
}

pub fn imported_samples_dir(project_dir: &Path) -> PathBuf {
    project_dir.join(SAMPLES_DIR).join(IMPORTED_DIR)
}

pub fn report_file(output_dir: &Path, project_name: &str) -> PathBuf {
    output_dir.join(format!("{project_name}_conversion_report.txt"))
}

pub fn mixer_overrides_path(output_dir: &Path) -> PathBuf {
    output_dir.join(MIXER_OVERRIDES_FILE)
}

// ── External resources ───────────────────────────────────────────

/// Editions of Live 12 whose installers ship `DefaultLiveSet.als`.
const LIVE_EDITIONS: [&str; 4] = ["Suite", "Trial", "Standard", "Intro"];

/// Candidate locations of Live's built-in default set, in search order.
pub fn default_template_candidates() -> Vec<PathBuf> {
    LIVE_EDITIONS
        .iter()
        .map(|edition| {
            if cfg!(target_os = "windows") {
                PathBuf::from(format!(
                    "C:/ProgramData/Ableton/Live 12 {edition}/Resources/Builtin/Templates/DefaultLiveSet.als"
                ))
            } else {
                PathBuf::from(format!(
                    "/Applications/Ableton Live 12 {edition}.app/Contents/App-Resources/Builtin/Templates/DefaultLiveSet.als"
                ))
            }
        })
        .collect()
}

/// Platform default VST3 install directory. `None` on Linux when the home
/// directory cannot be determined.
pub fn default_vst3_dir() -> Option<PathBuf> {
    if cfg!(target_os = "windows") {
        Some(PathBuf::from("C:/Program Files/Common Files/VST3"))
    } else if cfg!(target_os = "macos") {
        Some(PathBuf::from("/Library/Audio/Plug-Ins/VST3"))
    } else {
        dirs::home_dir().map(|home| home.join(".vst3"))
    }
}

/// Per-user config directory for this tool, when the platform has one.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join(APP_ID))
}

/// Settings file inside a config directory.
pub fn settings_path(config_dir: &Path) -> PathBuf {
    config_dir.join(SETTINGS_FILE)
}
