pub mod mixer;
pub mod project;
pub mod timeline;

// Re-export commonly used types at the model level.
pub use mixer::TrackMixerState;
pub use project::{
    collect_track_names, AudioFileRecord, ParsedFilename, PluginInstance, ProjectModel,
};
pub use timeline::{resolve_start_position, samples_to_beats, samples_to_seconds};
