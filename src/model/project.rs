use std::path::PathBuf;

use indexmap::{IndexMap, IndexSet};

use super::mixer::TrackMixerState;
use crate::audio::DEFAULT_SAMPLE_RATE;

/// A recording's filename split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFilename {
    pub track_name: String,
    pub take_number: u32,
    pub is_comp: bool,
    pub comp_label: String,
}

/// One recording found in the bundle's audio folder.
///
/// Created during discovery with the filename classification filled in;
/// `start_position_samples`, `frame_count` and `sample_rate` are set by the
/// timeline pass that reads each file's header.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioFileRecord {
    /// Filename including extension, e.g. `KICK IN#01.wav`.
    pub filename: String,
    /// Logical track, e.g. `KICK IN`.
    pub track_name: String,
    /// Take number from a `#NN` suffix, 0 when the file is not a take.
    pub take_number: u32,
    pub is_comp: bool,
    /// `Comp A` etc. Empty unless `is_comp`.
    pub comp_label: String,
    pub file_path: PathBuf,
    /// Project-relative start, in the file's own sample rate.
    pub start_position_samples: u64,
    pub frame_count: u64,
    pub sample_rate: u32,
}

impl AudioFileRecord {
    pub fn new(filename: impl Into<String>, parsed: ParsedFilename, file_path: PathBuf) -> Self {
        Self {
            filename: filename.into(),
            track_name: parsed.track_name,
            take_number: parsed.take_number,
            is_comp: parsed.is_comp,
            comp_label: parsed.comp_label,
            file_path,
            start_position_samples: 0,
            frame_count: 0,
            sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }

    /// Rendered bounce-in-place file.
    pub fn is_bounce_in_place(&self) -> bool {
        self.filename.contains("_bip")
    }

    /// Filename without its final extension.
    pub fn stem(&self) -> &str {
        self.filename
            .rsplit_once('.')
            .map_or(self.filename.as_str(), |(stem, _)| stem)
    }

    /// Exclusive end on the timeline, in the file's own samples.
    pub fn end_position_samples(&self) -> u64 {
        self.start_position_samples.saturating_add(self.frame_count)
    }
}

/// An effect instance found in the project's binary data.
#[derive(Debug, Clone, PartialEq)]
pub struct PluginInstance {
    /// Preset name as stored by the host (`#default` when unnamed).
    pub name: String,
    pub au_type: String,
    pub au_subtype: String,
    pub au_manufacturer: String,
    pub is_waves: bool,
    /// Decoded property list, kept as-is.
    pub raw: plist::Dictionary,
}

/// Everything the converter knows about one project alternative.
#[derive(Debug, Clone)]
pub struct ProjectModel {
    pub name: String,
    pub tempo: f64,
    pub time_sig_numerator: u32,
    pub time_sig_denominator: u32,
    pub sample_rate: u32,
    pub audio_files: Vec<AudioFileRecord>,
    pub plugins: Vec<PluginInstance>,
    /// Unique logical track names in first-seen order.
    pub track_names: Vec<String>,
    pub alternative: u32,
    pub mixer_state: Option<IndexMap<String, TrackMixerState>>,
}

impl ProjectModel {
    pub fn files_for_track<'a>(&'a self, track_name: &'a str) -> impl Iterator<Item = &'a AudioFileRecord> + 'a {
        self.audio_files
            .iter()
            .filter(move |r| r.track_name == track_name)
    }

    pub fn mixer_for(&self, track_name: &str) -> Option<&TrackMixerState> {
        self.mixer_state.as_ref()?.get(track_name)
    }
}

/// Unique track names in the order their first file appears.
pub fn collect_track_names(records: &[AudioFileRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.track_name.as_str())
        .collect::<IndexSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
