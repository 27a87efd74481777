//! Reader for `.logicx` project bundles.

mod bundle;
mod constants;
pub mod filename;
mod mixer;
mod plugins;
mod types;

pub use bundle::{
    discover_audio_files, parse_metadata, parse_project, parse_project_info, resolve_regions,
};
pub use mixer::{load_mixer_overrides, write_mixer_template};
pub use plugins::{extract_plugins, int_to_fourcc};
pub use types::{AlternativeMetadata, ProjectInfo};

pub use crate::import::ImportError;
