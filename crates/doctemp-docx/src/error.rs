//! Error types for DOCX archive operations

use thiserror::Error;

/// Errors that can occur while opening, reading or rebuilding a DOCX archive
#[derive(Error, Debug)]
pub enum DocxError {
    /// The source could not be opened or is not a ZIP archive
    #[error("Cannot open archive: {0}")]
    OpenFailure(#[source] zip::result::ZipError),

    /// The body entry is not present in the archive
    #[error("Required entry not found: {0}")]
    MissingEntry(String),

    /// An entry could not be read, decompressed or decoded
    #[error("Cannot read entry `{entry}`: {reason}")]
    ReadFailure { entry: String, reason: String },

    /// The body entry holds no visible text
    #[error("Document has no content")]
    EmptyContent,

    /// The destination could not be created or the rebuild failed
    #[error("Cannot write archive: {0}")]
    WriteFailure(String),

    /// The handle was closed before the operation
    #[error("Archive handle is closed")]
    Closed,
}

impl DocxError {
    pub(crate) fn read(entry: impl Into<String>, reason: impl ToString) -> Self {
        DocxError::ReadFailure {
            entry: entry.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<std::io::Error> for DocxError {
    fn from(err: std::io::Error) -> Self {
        DocxError::WriteFailure(err.to_string())
    }
}

/// Result type for DOCX operations
pub type Result<T> = std::result::Result<T, DocxError>;
