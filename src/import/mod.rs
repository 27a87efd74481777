pub mod logic;

use std::path::PathBuf;

use thiserror::Error;

// ── Error type (shared across importers) ────────────────────────────

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("{} not found", .0.display())]
    BundleNotFound(PathBuf),
    #[error("required metadata missing: {}", .0.display())]
    MissingMetadata(PathBuf),
    #[error("cannot decode property list {}: {source}", path.display())]
    Plist {
        path: PathBuf,
        #[source]
        source: plist::Error,
    },
    #[error("{} is not a property-list dictionary", .0.display())]
    NotADictionary(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
