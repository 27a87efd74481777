//! Locating and validating the structural session template.

use std::path::{Path, PathBuf};

use super::document::{Element, LiveDocument};
use crate::export::ExportError;
use crate::paths;

pub const AUDIO_TRACK: &str = "AudioTrack";
pub const RETURN_TRACK: &str = "ReturnTrack";

/// Pick the template file: the explicit path if given, otherwise the first
/// installed default set. Nothing is read or written here.
pub fn resolve_template(explicit: Option<&Path>) -> Result<PathBuf, ExportError> {
    let searched = match explicit {
        Some(path) => vec![path.to_path_buf()],
        None => paths::default_template_candidates(),
    };
    match searched.iter().find(|p| p.is_file()) {
        Some(found) => Ok(found.clone()),
        None => Err(ExportError::TemplateNotFound { searched }),
    }
}

/// Load a template and check it has the structure assembly relies on.
pub fn load_template(path: &Path) -> Result<LiveDocument, ExportError> {
    log::debug!("loading session template {}", path.display());
    let doc = LiveDocument::load(path)?;
    audio_track_skeleton(&doc.root)?;
    Ok(doc)
}

/// The first audio track of the template's `LiveSet/Tracks`.
pub fn audio_track_skeleton(root: &Element) -> Result<&Element, ExportError> {
    let tracks = root
        .find("LiveSet/Tracks")
        .ok_or_else(|| ExportError::InvalidTemplate("no LiveSet/Tracks element".into()))?;
    tracks
        .child(AUDIO_TRACK)
        .ok_or_else(|| ExportError::InvalidTemplate("no AudioTrack to use as a skeleton".into()))
}
