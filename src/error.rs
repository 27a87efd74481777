use serde::Serialize;
use thiserror::Error;

use crate::export::ExportError;
use crate::import::ImportError;
use crate::util::JsonFileError;

/// Structured error type for the converter. The CLI matches on the variant to
/// choose an exit message, and the JSON progress stream serializes it so GUI
/// wrappers can react to error codes instead of parsing text.
#[derive(Debug, Clone, Error, Serialize)]
#[serde(tag = "code", content = "detail")]
pub enum AppError {
    #[error("{path} not found")]
    BundleNotFound { path: String },
    #[error("Required project metadata missing: {path}")]
    MissingMetadata { path: String },
    #[error("Session template not found (searched: {})", .searched.join(", "))]
    TemplateNotFound { searched: Vec<String> },
    #[error("Invalid session template: {message}")]
    InvalidTemplate { message: String },
    #[error("Import error: {message}")]
    ImportError { message: String },
    #[error("Export error: {message}")]
    ExportError { message: String },
    #[error("I/O error: {message}")]
    IoError { message: String },
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::IoError {
            message: e.to_string(),
        }
    }
}

impl From<JsonFileError> for AppError {
    fn from(e: JsonFileError) -> Self {
        AppError::IoError {
            message: e.to_string(),
        }
    }
}

impl From<ImportError> for AppError {
    fn from(e: ImportError) -> Self {
        match e {
            ImportError::BundleNotFound(path) => AppError::BundleNotFound {
                path: path.display().to_string(),
            },
            ImportError::MissingMetadata(path) => AppError::MissingMetadata {
                path: path.display().to_string(),
            },
            ImportError::Io(io_err) => AppError::IoError {
                message: io_err.to_string(),
            },
            other => AppError::ImportError {
                message: other.to_string(),
            },
        }
    }
}

impl From<ExportError> for AppError {
    fn from(e: ExportError) -> Self {
        match e {
            ExportError::TemplateNotFound { searched } => AppError::TemplateNotFound {
                searched: searched
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect(),
            },
            ExportError::InvalidTemplate(message) => AppError::InvalidTemplate { message },
            ExportError::Io(io_err) => AppError::IoError {
                message: io_err.to_string(),
            },
            other => AppError::ExportError {
                message: other.to_string(),
            },
        }
    }
}

impl AppError {
    /// Stable machine-readable code, identical to the serialized `code` tag.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::BundleNotFound { .. } => "BundleNotFound",
            AppError::MissingMetadata { .. } => "MissingMetadata",
            AppError::TemplateNotFound { .. } => "TemplateNotFound",
            AppError::InvalidTemplate { .. } => "InvalidTemplate",
            AppError::ImportError { .. } => "ImportError",
            AppError::ExportError { .. } => "ExportError",
            AppError::IoError { .. } => "IoError",
        }
    }
}
