use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Notegraph
#[derive(Error, Debug)]
pub enum NotegraphError {
    /// Source path missing or unopenable
    #[error("File \"{}\" not found or unreadable: {reason}", .path.display())]
    FileUnreadable { path: PathBuf, reason: String },

    /// The diagram is not well-formed XML
    #[error("Can not parse \"{}\": {reason}", .path.display())]
    MalformedDocument { path: PathBuf, reason: String },

    /// A note element lacks a required field or carries an unreadable one
    #[error("Malformed note {note}: {reason}")]
    MalformedNote { note: String, reason: String },

    /// Conversion requested on a path with the wrong extension
    #[error("File type of \"{}\" not supported", .path.display())]
    UnsupportedFileType { path: PathBuf },

    /// Refusing to overwrite an existing target
    #[error("Target \"{}\" already exists (use --force to overwrite)", .path.display())]
    OutputExists { path: PathBuf },

    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Outline JSON (de)serialization errors
    #[error("Outline JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Diagram XML could not be produced
    #[error("Failed to write diagram XML: {0}")]
    DiagramWrite(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl NotegraphError {
    pub(crate) fn malformed_note(note: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedNote {
            note: note.into(),
            reason: reason.into(),
        }
    }
}

/// Convenient Result type using NotegraphError
pub type Result<T> = std::result::Result<T, NotegraphError>;
