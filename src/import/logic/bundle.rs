use std::fs;
use std::path::Path;

use plist::{Dictionary, Value};

use super::constants::{
    metadata_key, project_info_key, AUDIO_EXTENSIONS, DEFAULT_TEMPO, DEFAULT_TIME_SIG,
};
use super::filename::classify;
use super::plugins::extract_plugins;
use super::types::{AlternativeMetadata, ProjectInfo};
use crate::audio::{read_header, DEFAULT_SAMPLE_RATE};
use crate::import::ImportError;
use crate::model::{collect_track_names, resolve_start_position, AudioFileRecord, ProjectModel};
use crate::paths;

/// Read `Resources/ProjectInformation.plist`.
///
/// The display name is variant `"0"`'s name, falling back to the bundle stem.
pub fn parse_project_info(bundle: &Path) -> Result<ProjectInfo, ImportError> {
    let dict = read_plist_dict(&paths::project_info_path(bundle))?;

    let variant_names: indexmap::IndexMap<String, String> = dict
        .get(project_info_key::VARIANT_NAMES)
        .and_then(Value::as_dictionary)
        .map(|names| {
            names
                .iter()
                .filter_map(|(k, v)| Some((k.clone(), v.as_string()?.to_string())))
                .collect()
        })
        .unwrap_or_default();

    let name = variant_names
        .get(project_info_key::PRIMARY_VARIANT)
        .cloned()
        .unwrap_or_else(|| bundle_stem(bundle));

    Ok(ProjectInfo {
        name,
        last_saved_from: string_field(&dict, project_info_key::LAST_SAVED_FROM),
        variant_names,
        active_variant: dict
            .get(project_info_key::ACTIVE_VARIANT)
            .and_then(Value::as_signed_integer)
            .unwrap_or(0),
        bundle_version: string_field(&dict, project_info_key::BUNDLE_VERSION),
    })
}

/// Read `Alternatives/NNN/MetaData.plist`, applying the host's defaults
/// (120 BPM, 4/4, 44.1 kHz) for absent keys.
pub fn parse_metadata(bundle: &Path, alternative: u32) -> Result<AlternativeMetadata, ImportError> {
    let dict = read_plist_dict(&paths::metadata_path(bundle, alternative))?;

    Ok(AlternativeMetadata {
        tempo: dict
            .get(metadata_key::TEMPO)
            .and_then(number)
            .unwrap_or(DEFAULT_TEMPO),
        time_sig_numerator: u32_field(&dict, metadata_key::NUMERATOR).unwrap_or(DEFAULT_TIME_SIG),
        time_sig_denominator: u32_field(&dict, metadata_key::DENOMINATOR)
            .unwrap_or(DEFAULT_TIME_SIG),
        sample_rate: u32_field(&dict, metadata_key::SAMPLE_RATE).unwrap_or(DEFAULT_SAMPLE_RATE),
        track_count: u32_field(&dict, metadata_key::TRACK_COUNT).unwrap_or(0),
        song_key: string_field(&dict, metadata_key::SONG_KEY),
        song_gender_key: string_field(&dict, metadata_key::SONG_GENDER_KEY),
        audio_files: audio_file_list(&dict, metadata_key::AUDIO_FILES),
        unused_audio_files: audio_file_list(&dict, metadata_key::UNUSED_AUDIO_FILES),
    })
}

/// List the recordings in `Media/Audio Files`, sorted by filename.
/// A bundle without that folder has no recordings.
pub fn discover_audio_files(bundle: &Path) -> Result<Vec<AudioFileRecord>, ImportError> {
    let dir = paths::audio_files_dir(bundle);
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut records = Vec::new();
    for entry in fs::read_dir(&dir)? {
        let path = entry?.path();
        if !path.is_file() || !has_audio_extension(&path) {
            continue;
        }
        let Some(filename) = path.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
            log::warn!("skipping audio file with non-UTF-8 name: {}", path.display());
            continue;
        };
        let file_path = fs::canonicalize(&path).unwrap_or(path);
        let parsed = classify(&filename);
        records.push(AudioFileRecord::new(filename, parsed, file_path));
    }
    records.sort_by(|a, b| a.filename.cmp(&b.filename));
    Ok(records)
}

/// Read every record's header and place it on the project timeline.
///
/// Files without an embedded recording position stay at 0. Unreadable
/// headers fall back to defaults without affecting other files.
pub fn resolve_regions(records: &mut [AudioFileRecord]) {
    for record in records.iter_mut() {
        let header = read_header(&record.file_path);
        record.frame_count = header.frame_count;
        record.sample_rate = header.sample_rate;
        record.start_position_samples = header
            .timeline_origin
            .map_or(0, |origin| resolve_start_position(origin, header.sample_rate));
        log::debug!(
            "{}: {} frames @ {} Hz, start {}",
            record.filename,
            record.frame_count,
            record.sample_rate,
            record.start_position_samples
        );
    }
}

/// Read one alternative of a bundle into a [`ProjectModel`].
pub fn parse_project(bundle: &Path, alternative: u32) -> Result<ProjectModel, ImportError> {
    if !bundle.exists() {
        return Err(ImportError::BundleNotFound(bundle.to_path_buf()));
    }

    let info = parse_project_info(bundle)?;
    let meta = parse_metadata(bundle, alternative)?;
    log::info!(
        "parsing '{}' alternative {alternative} ({} BPM, {}/{}, {} Hz)",
        info.name,
        meta.tempo,
        meta.time_sig_numerator,
        meta.time_sig_denominator,
        meta.sample_rate
    );

    let mut audio_files = discover_audio_files(bundle)?;
    resolve_regions(&mut audio_files);

    let project_data = read_project_data(bundle, alternative)?;
    let plugins = extract_plugins(&project_data);

    let track_names = collect_track_names(&audio_files);

    Ok(ProjectModel {
        name: info.name,
        tempo: meta.tempo,
        time_sig_numerator: meta.time_sig_numerator,
        time_sig_denominator: meta.time_sig_denominator,
        sample_rate: meta.sample_rate,
        audio_files,
        plugins,
        track_names,
        alternative,
        mixer_state: None,
    })
}

/// The alternative's binary project data; a missing file reads as empty.
fn read_project_data(bundle: &Path, alternative: u32) -> Result<Vec<u8>, ImportError> {
    match fs::read(paths::project_data_path(bundle, alternative)) {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

// ── Property-list helpers ───────────────────────────────────────────

fn read_plist_dict(path: &Path) -> Result<Dictionary, ImportError> {
    if !path.is_file() {
        return Err(ImportError::MissingMetadata(path.to_path_buf()));
    }
    Value::from_file(path)
        .map_err(|source| ImportError::Plist {
            path: path.to_path_buf(),
            source,
        })?
        .into_dictionary()
        .ok_or_else(|| ImportError::NotADictionary(path.to_path_buf()))
}

#[allow(clippy::cast_precision_loss)]
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Real(r) => Some(*r),
        Value::Integer(i) => i
            .as_signed()
            .map(|n| n as f64)
            .or_else(|| i.as_unsigned().map(|n| n as f64)),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn u32_field(dict: &Dictionary, key: &str) -> Option<u32> {
    let n = number(dict.get(key)?)?;
    (n.is_finite() && n >= 0.0 && n <= f64::from(u32::MAX)).then_some(n as u32)
}

fn string_field(dict: &Dictionary, key: &str) -> String {
    dict.get(key)
        .and_then(Value::as_string)
        .unwrap_or_default()
        .to_string()
}

fn audio_file_list(dict: &Dictionary, key: &str) -> Vec<String> {
    dict.get(key)
        .and_then(Value::as_array)
        .map(|files| {
            files
                .iter()
                .filter_map(Value::as_string)
                .map(|f| f.replace(paths::AUDIO_FILES_PREFIX, ""))
                .collect()
        })
        .unwrap_or_default()
}

fn has_audio_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| AUDIO_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
}

fn bundle_stem(bundle: &Path) -> String {
    bundle
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
