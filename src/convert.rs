//! The end-to-end conversion: bundle in, Live project and report out.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::AppError;
use crate::export::live::{load_template, resolve_template, write_session};
use crate::import::logic::{load_mixer_overrides, parse_project, write_mixer_template};
use crate::paths;
use crate::plugins::match_plugins;
use crate::progress::{ProgressEvent, ProgressSink, Stage};
use crate::report::generate_report;
use crate::util::atomic_write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    pub bundle: PathBuf,
    pub output_dir: PathBuf,
    pub alternative: u32,
    pub copy_audio: bool,
    /// Print the report and stop; nothing is written.
    pub report_only: bool,
    /// Session template; the installed default set when `None`.
    pub template: Option<PathBuf>,
    /// Folder scanned for replacement suggestions; none are made when `None`.
    pub vst3_dir: Option<PathBuf>,
    pub mixer: Option<PathBuf>,
    pub generate_mixer_template: bool,
}

impl ConvertOptions {
    pub fn new(bundle: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            bundle: bundle.into(),
            output_dir: output_dir.into(),
            alternative: 0,
            copy_audio: true,
            report_only: false,
            template: None,
            vst3_dir: paths::default_vst3_dir(),
            mixer: None,
            generate_mixer_template: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversionSummary {
    pub project_name: String,
    pub als_path: Option<PathBuf>,
    pub report_path: Option<PathBuf>,
    pub mixer_template_path: Option<PathBuf>,
    pub report: String,
    pub tracks: usize,
    pub clips: usize,
    pub audio_files: usize,
    pub plugins: usize,
    pub copied_audio: Vec<String>,
    pub skipped_audio: Vec<String>,
}

/// Run a conversion, reporting each stage to `progress`.
pub fn convert(
    options: &ConvertOptions,
    progress: &mut dyn ProgressSink,
) -> Result<ConversionSummary, AppError> {
    progress.emit(ProgressEvent::new(
        Stage::Parsing,
        0.1,
        format!("Parsing {}...", display_name(&options.bundle)),
    ));
    let mut project = parse_project(&options.bundle, options.alternative)?;

    // Fail on a missing or unusable template before anything lands on disk.
    let template = if options.report_only {
        None
    } else {
        let path = resolve_template(options.template.as_deref())?;
        Some(load_template(&path)?)
    };

    if let Some(mixer) = &options.mixer {
        let overrides = load_mixer_overrides(mixer);
        progress.note(&format!(
            "  Loaded mixer overrides for {} track(s)",
            overrides.len()
        ));
        project.mixer_state = Some(overrides);
    }

    let mut summary = ConversionSummary {
        project_name: project.name.clone(),
        tracks: project.track_names.len(),
        audio_files: project.audio_files.len(),
        plugins: project.plugins.len(),
        ..ConversionSummary::default()
    };

    if options.generate_mixer_template {
        let path = write_mixer_template(&project, &options.output_dir)?;
        progress.note(&format!("  Mixer template: {}", path.display()));
        summary.mixer_template_path = Some(path);
    }

    progress.emit(
        ProgressEvent::new(
            Stage::Parsing,
            0.3,
            format!(
                "Found {} tracks, {} audio files, {} plugins",
                summary.tracks, summary.audio_files, summary.plugins
            ),
        )
        .with("tracks", summary.tracks)
        .with("audio_files", summary.audio_files)
        .with("plugins", summary.plugins),
    );

    progress.emit(ProgressEvent::new(Stage::Plugins, 0.4, "Matching plugins..."));
    let matches = match_plugins(&project.plugins, options.vst3_dir.as_deref());
    let report = generate_report(&project, &matches);
    progress.note(&report);
    summary.report.clone_from(&report);

    let Some(template) = template else {
        progress.emit(
            ProgressEvent::new(Stage::Complete, 1.0, "Report generated")
                .with("report", report)
                .with("tracks", summary.tracks)
                .with("audio_files", summary.audio_files)
                .with("plugins", summary.plugins),
        );
        return Ok(summary);
    };

    progress.emit(ProgressEvent::new(
        Stage::Generating,
        0.5,
        format!("Generating Ableton project in {}...", options.output_dir.display()),
    ));
    let session = write_session(template, &project, &options.output_dir, options.copy_audio)?;
    progress.note(&format!("  Created: {}", session.als_path.display()));
    if !session.audio.skipped.is_empty() {
        progress.note(&format!(
            "  Skipped {} missing audio file(s)",
            session.audio.skipped.len()
        ));
    }

    let report_path = paths::report_file(&options.output_dir, &project.name);
    atomic_write(&report_path, report.as_bytes())?;
    progress.note(&format!("  Report: {}", report_path.display()));

    summary.clips = session.stats.clips;
    summary.copied_audio = session.audio.copied;
    summary.skipped_audio = session.audio.skipped;
    summary.report_path = Some(report_path);

    progress.emit(
        ProgressEvent::new(Stage::Complete, 1.0, "Done!")
            .with("als_path", session.als_path.display().to_string())
            .with("report", report)
            .with("tracks", summary.tracks)
            .with("clips", summary.clips)
            .with("audio_files", summary.audio_files)
            .with("plugins", summary.plugins),
    );
    summary.als_path = Some(session.als_path);
    Ok(summary)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}
