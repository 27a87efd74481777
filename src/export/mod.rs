pub mod live;

use std::path::PathBuf;

use thiserror::Error;

// ── Error type (shared across exporters) ────────────────────────────

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("session template not found (searched: {})", display_paths(.searched))]
    TemplateNotFound { searched: Vec<PathBuf> },
    #[error("invalid session template: {0}")]
    InvalidTemplate(String),
    #[error("no object ids left above {0}")]
    IdsExhausted(u64),
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
