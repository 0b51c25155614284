//! # doctemp-docx
//!
//! DOCX archive handling for doctemp.
//!
//! This crate provides functionality to:
//! - Open a DOCX from a path or from bytes and extract its body text
//! - Clean the body markup so template tokens split by Word are whole again
//! - Rebuild the archive with a new body, copying every other entry unchanged
//!
//! ## Example
//!
//! ```no_run
//! use doctemp_docx::Docx;
//!
//! let mut docx = Docx::open("letter.docx")?;
//! let filled = docx.content().replace("{{ name }}", "Ada");
//! docx.write_to_file("out.docx", &filled)?;
//! docx.close()?;
//! # Ok::<(), doctemp_docx::DocxError>(())
//! ```

pub mod archive;
pub mod clean;
pub mod document;
pub mod error;
pub mod observer;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use archive::Docx;
pub use clean::{
    clean_text, escape_text, extract_text, template_source, visible_text, BODY_ENTRY,
};
pub use document::Document;
pub use error::{DocxError, Result};
pub use observer::{
    default_observer, DocEvent, NullObserver, Observer, RecordingObserver, SharedObserver,
    TracingObserver,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
