//! The capability shared by every templatable document format

use std::path::Path;

use crate::error::Result;

/// A document whose text can be read, replaced and written back out
///
/// [`crate::Docx`] is the ZIP-backed implementation. Another container format
/// plugs in by implementing this trait; callers only see `dyn Document`.
pub trait Document: Send {
    /// The current template text
    fn content(&self) -> &str;

    /// Replace the template text
    fn update_content(&mut self, content: String);

    /// Write a copy of the document with `text` as its body to `path`
    fn write_to_file(&mut self, path: &Path, text: &str) -> Result<()>;

    /// Produce a copy of the document with `text` as its body, in memory
    fn to_bytes(&mut self, text: &str) -> Result<Vec<u8>>;

    /// Release any resources held open by the document
    fn close(&mut self) -> Result<()>;
}
