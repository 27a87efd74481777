use indexmap::IndexMap;

/// Bundle-level facts from `Resources/ProjectInformation.plist`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProjectInfo {
    pub name: String,
    pub last_saved_from: String,
    pub variant_names: IndexMap<String, String>,
    pub active_variant: i64,
    pub bundle_version: String,
}

/// Song settings of one alternative, from `Alternatives/NNN/MetaData.plist`.
#[derive(Debug, Clone, PartialEq)]
pub struct AlternativeMetadata {
    pub tempo: f64,
    pub time_sig_numerator: u32,
    pub time_sig_denominator: u32,
    pub sample_rate: u32,
    pub track_count: u32,
    pub song_key: String,
    pub song_gender_key: String,
    /// Referenced recordings, with the `Audio Files/` prefix stripped.
    pub audio_files: Vec<String>,
    pub unused_audio_files: Vec<String>,
}
