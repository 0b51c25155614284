//! Error types for template operations

use doctemp_docx::DocxError;
use thiserror::Error;

/// Errors that can occur while opening, rendering or exporting a template
#[derive(Error, Debug)]
pub enum TemplateError {
    /// The file extension does not map to a known document format
    #[error("Unsupported document type: {0}")]
    UnsupportedType(String),

    /// Opening, reading or writing the underlying document failed
    #[error(transparent)]
    Document(#[from] DocxError),

    /// The template did not compile or failed while rendering
    #[error("Template error: {0}")]
    RenderFailure(#[from] minijinja::Error),

    /// A configuration file could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for template operations
pub type Result<T> = std::result::Result<T, TemplateError>;
