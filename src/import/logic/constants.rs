/// Keys read from `Resources/ProjectInformation.plist`.
pub(super) mod project_info_key {
    pub const VARIANT_NAMES: &str = "VariantNames";
    pub const LAST_SAVED_FROM: &str = "LastSavedFrom";
    pub const ACTIVE_VARIANT: &str = "ActiveVariant";
    pub const BUNDLE_VERSION: &str = "BundleVersion";
    /// Variant whose name is the project's display name.
    pub const PRIMARY_VARIANT: &str = "0";
}

/// Keys read from `Alternatives/NNN/MetaData.plist`.
pub(super) mod metadata_key {
    pub const TEMPO: &str = "BeatsPerMinute";
    pub const NUMERATOR: &str = "SongSignatureNumerator";
    pub const DENOMINATOR: &str = "SongSignatureDenominator";
    pub const SAMPLE_RATE: &str = "SampleRate";
    pub const TRACK_COUNT: &str = "NumberOfTracks";
    pub const SONG_KEY: &str = "SongKey";
    pub const SONG_GENDER_KEY: &str = "SongGenderKey";
    pub const AUDIO_FILES: &str = "AudioFiles";
    pub const UNUSED_AUDIO_FILES: &str = "UnusedAudioFiles";
}

/// Keys inside an embedded plugin property list.
pub(super) mod plugin_key {
    pub const NAME: &str = "name";
    pub const TYPE: &str = "type";
    pub const SUBTYPE: &str = "subtype";
    pub const MANUFACTURER: &str = "manufacturer";
    pub const WAVES_PRESET: &str = "Waves_XPst";
}

pub(super) const DEFAULT_TEMPO: f64 = 120.0;
pub(super) const DEFAULT_TIME_SIG: u32 = 4;

/// Extensions picked up from `Media/Audio Files` (compared lowercase).
pub(super) const AUDIO_EXTENSIONS: [&str; 5] = ["wav", "aif", "aiff", "mp3", "m4a"];

/// Start and end of a property list embedded in `ProjectData`.
pub(super) const EMBEDDED_PLIST_START: &[u8] = b"<?xml version";
pub(super) const EMBEDDED_PLIST_END: &[u8] = b"</plist>";
