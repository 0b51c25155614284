//! doctemp-core - Fill DOCX templates with data
//!
//! Opens a DOCX, exposes its body text as a [minijinja] template, renders it
//! against any `serde::Serialize` value and writes a new DOCX in which only
//! `word/document.xml` has changed.
//!
//! # Example
//!
//! ```no_run
//! use doctemp_core::DocTemplate;
//! use serde_json::json;
//!
//! let mut template = DocTemplate::open("invoice.docx")?;
//! let bytes = template.execute_bytes(json!({
//!     "customer": "ACME Corp",
//!     "items": [{ "name": "Widget", "qty": 3 }],
//! }))?;
//! template.close()?;
//! # let _ = bytes;
//! # Ok::<(), doctemp_core::TemplateError>(())
//! ```

pub mod config;
pub mod error;
pub mod template;

// Re-export main types
pub use config::{TemplateConfig, UndefinedMode};
pub use error::{Result, TemplateError};
pub use template::DocTemplate;

pub use doctemp_docx::{
    DocEvent, Document, Docx, NullObserver, Observer, RecordingObserver, SharedObserver,
    TracingObserver,
};
pub use minijinja::Value;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
