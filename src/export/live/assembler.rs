//! Build a Live session from a parsed project: one cloned audio track per
//! logical track, one arrangement clip per surviving recording.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::clip::{build_audio_clip, ClipTiming, SampleLocation};
use super::document::{Element, LiveDocument, VALUE_ATTR};
use super::ids::{reassign_ids, IdAllocator};
use super::template::{audio_track_skeleton, load_template, resolve_template, RETURN_TRACK};
use crate::arrange::resolve_overlaps;
use crate::export::ExportError;
use crate::model::{AudioFileRecord, ProjectModel, TrackMixerState};
use crate::paths;
use crate::util::atomic_write;

/// Live cycles through this many track colours.
const TRACK_COLORS: usize = 16;

const MAIN_TRACKS: [&str; 2] = ["MainTrack", "MasterTrack"];
const TRANSPORT: &str = "Transport";
const TEMPO_PATH: &str = "Tempo/Manual";
const TIME_SIGNATURE_PATH: &str = "TimeSignatures/RemoteableTimeSignature";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AssemblyStats {
    pub tracks: usize,
    pub clips: usize,
}

/// Audio copied into the project folder, and sources that were missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CopyOutcome {
    pub copied: Vec<String>,
    pub skipped: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSession {
    pub als_path: PathBuf,
    pub project_dir: PathBuf,
    pub stats: AssemblyStats,
    pub audio: CopyOutcome,
}

/// Tempo and meter as stored in one control block of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimingBlock {
    pub tempo: Option<f64>,
    pub numerator: Option<u32>,
    pub denominator: Option<u32>,
}

/// Both places a session records its tempo and meter.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SessionTiming {
    pub transport: TimingBlock,
    pub main_track: TimingBlock,
}

// ── Generation ──────────────────────────────────────────────────────

/// Write `<output>/<name> Project/<name>.als`, optionally with the project's
/// audio under `Samples/Imported`.
///
/// The template is found, loaded and the whole session assembled in memory
/// before anything is created on disk.
pub fn generate_session(
    project: &ProjectModel,
    output_dir: &Path,
    template_path: Option<&Path>,
    copy_audio: bool,
) -> Result<GeneratedSession, ExportError> {
    let template = resolve_template(template_path)?;
    let doc = load_template(&template)?;
    write_session(doc, project, output_dir, copy_audio)
}

/// [`generate_session`] for a template that is already loaded and checked.
pub fn write_session(
    mut doc: LiveDocument,
    project: &ProjectModel,
    output_dir: &Path,
    copy_audio: bool,
) -> Result<GeneratedSession, ExportError> {
    let project_dir = paths::live_project_dir(output_dir, &project.name);
    let absolute_dir = std::path::absolute(&project_dir).unwrap_or_else(|_| project_dir.clone());
    let location = if copy_audio {
        SampleLocation::Imported(&absolute_dir)
    } else {
        SampleLocation::Source
    };
    let stats = assemble(&mut doc, project, location)?;
    let data = doc.to_gzip()?;

    fs::create_dir_all(&project_dir)?;
    let als_path = paths::session_file(&project_dir, &project.name);
    atomic_write(&als_path, &data)?;
    log::info!(
        "wrote {} ({} tracks, {} clips)",
        als_path.display(),
        stats.tracks,
        stats.clips
    );

    let audio = if copy_audio {
        copy_audio_files(project, &project_dir)?
    } else {
        CopyOutcome::default()
    };

    Ok(GeneratedSession {
        als_path,
        project_dir,
        stats,
        audio,
    })
}

/// Replace the template's tracks with the project's, keeping return tracks
/// after the new ones, and write tempo, meter and the next free id.
pub fn assemble(
    doc: &mut LiveDocument,
    project: &ProjectModel,
    location: SampleLocation<'_>,
) -> Result<AssemblyStats, ExportError> {
    let skeleton = audio_track_skeleton(&doc.root)?.clone();
    let mut ids = IdAllocator::for_document(&doc.root);
    let mut stats = AssemblyStats::default();

    let mut new_tracks = Vec::with_capacity(project.track_names.len());
    for (index, name) in project.track_names.iter().enumerate() {
        let mut track = skeleton.clone();
        reassign_ids(&mut track, &mut ids)?;
        label_track(&mut track, name, index);
        stats.clips += place_clips(&mut track, project, name, &mut ids, location)?;
        if let Some(state) = project.mixer_for(name) {
            apply_mixer(&mut track, state);
        }
        new_tracks.push(track);
    }
    stats.tracks = new_tracks.len();

    let tracks = doc
        .root
        .find_mut("LiveSet/Tracks")
        .ok_or_else(|| ExportError::InvalidTemplate("no LiveSet/Tracks element".into()))?;
    let returns: Vec<Element> = std::mem::take(&mut tracks.children)
        .into_iter()
        .filter(|t| t.name == RETURN_TRACK)
        .collect();
    tracks.children = new_tracks;
    tracks.children.extend(returns);

    write_timing(&mut doc.root, project);

    let next_id = ids.current();
    if let Some(live_set) = doc.root.child_mut("LiveSet") {
        live_set
            .child_or_insert("NextPointeeId")
            .set_attr(VALUE_ATTR, next_id);
    }
    doc.root.set_attr(
        "Creator",
        format!("{} {}", paths::APP_ID, env!("CARGO_PKG_VERSION")),
    );
    Ok(stats)
}

fn label_track(track: &mut Element, name: &str, index: usize) {
    if let Some(names) = track.child_mut("Name") {
        names.set_value("EffectiveName", name);
        names.set_value("UserName", name);
    }
    let color = index % TRACK_COLORS;
    if !track.set_value("Color", color) {
        track.set_value("ColorIndex", color);
    }
}

/// Fill the track's arrangement lane with one clip per surviving recording.
fn place_clips(
    track: &mut Element,
    project: &ProjectModel,
    name: &str,
    ids: &mut IdAllocator,
    location: SampleLocation<'_>,
) -> Result<usize, ExportError> {
    let Some(lane) = track.search_mut("MainSequencer/Sample/ArrangerAutomation") else {
        log::warn!("template track has no arrangement lane; {name} gets no clips");
        return Ok(0);
    };
    let events = lane.child_or_insert("Events");
    events.children.clear();

    let candidates: Vec<&AudioFileRecord> = project.files_for_track(name).collect();
    for record in resolve_overlaps(&candidates) {
        let timing = ClipTiming::for_record(record, project.tempo, project.sample_rate);
        events.push(build_audio_clip(record, &timing, ids, location)?);
    }
    Ok(events.children.len())
}

fn apply_mixer(track: &mut Element, state: &TrackMixerState) {
    let Some(mixer) = track.search_mut("DeviceChain/Mixer") else {
        log::warn!("template track has no mixer; overrides not applied");
        return;
    };
    mixer.set_value("Volume/Manual", state.volume_linear());
    mixer.set_value("Pan/Manual", state.clamped_pan());
    mixer.set_value("Speaker/Manual", !state.is_muted);
    mixer.set_value("SoloSink", state.is_soloed);
}

/// Tempo (whole BPM) and meter go into the transport and the main track.
fn write_timing(root: &mut Element, project: &ProjectModel) {
    let Some(live_set) = root.child_mut("LiveSet") else {
        return;
    };
    let tempo = project.tempo.round();
    for block in MAIN_TRACKS.iter().chain(std::iter::once(&TRANSPORT)) {
        let Some(block) = live_set.child_mut(block) else {
            continue;
        };
        if let Some(manual) = block.search_mut(TEMPO_PATH) {
            manual.set_attr(VALUE_ATTR, tempo);
        }
        if let Some(sig) = block.search_mut(TIME_SIGNATURE_PATH) {
            sig.set_value("Numerator", project.time_sig_numerator);
            sig.set_value("Denominator", project.time_sig_denominator);
        }
    }
}

// ── Audio copy ──────────────────────────────────────────────────────

/// Copy every discovered recording into `Samples/Imported`. Sources that
/// are gone or unreadable are skipped.
pub fn copy_audio_files(
    project: &ProjectModel,
    project_dir: &Path,
) -> Result<CopyOutcome, ExportError> {
    let samples = paths::imported_samples_dir(project_dir);
    fs::create_dir_all(&samples)?;

    let mut outcome = CopyOutcome::default();
    for record in &project.audio_files {
        if !record.file_path.is_file() {
            log::warn!("audio file missing, skipped: {}", record.file_path.display());
            outcome.skipped.push(record.filename.clone());
            continue;
        }
        match copy_with_mtime(&record.file_path, &samples.join(&record.filename)) {
            Ok(()) => outcome.copied.push(record.filename.clone()),
            Err(e) => {
                log::warn!("cannot copy {}: {e}", record.file_path.display());
                outcome.skipped.push(record.filename.clone());
            }
        }
    }
    Ok(outcome)
}

/// Copy `from` to `to` and give the copy the source's modification time,
/// which clips record as `LastModDate`.
fn copy_with_mtime(from: &Path, to: &Path) -> std::io::Result<()> {
    fs::copy(from, to)?;
    let modified = fs::metadata(from)?.modified()?;
    fs::File::options().write(true).open(to)?.set_modified(modified)
}

// ── Read-back ───────────────────────────────────────────────────────

/// Tempo and meter of a written session, from both places they live.
pub fn read_session_timing(path: &Path) -> Result<SessionTiming, ExportError> {
    let doc = LiveDocument::load(path)?;
    let live_set = doc
        .root
        .child("LiveSet")
        .ok_or_else(|| ExportError::InvalidTemplate("no LiveSet element".into()))?;
    let main_track = MAIN_TRACKS.iter().find_map(|name| live_set.child(name));
    Ok(SessionTiming {
        transport: live_set.child(TRANSPORT).map(timing_of).unwrap_or_default(),
        main_track: main_track.map(timing_of).unwrap_or_default(),
    })
}

fn timing_of(block: &Element) -> TimingBlock {
    let tempo = block
        .search(TEMPO_PATH)
        .and_then(|e| e.attr(VALUE_ATTR))
        .and_then(|v| v.parse().ok());
    let sig = block.search(TIME_SIGNATURE_PATH);
    let part = |name: &str| {
        sig.and_then(|s| s.value_of(name))
            .and_then(|v| v.parse().ok())
    };
    TimingBlock {
        tempo,
        numerator: part("Numerator"),
        denominator: part("Denominator"),
    }
}
