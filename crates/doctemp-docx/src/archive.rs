//! Archive handling for DOCX templates
//!
//! DOCX files are ZIP archives containing XML files and resources. A [`Docx`]
//! keeps the source archive open, holds the cleaned body text, and rebuilds a
//! new archive on export where only `word/document.xml` differs.

use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Cursor, Read, Seek, Write};
use std::path::{Path, PathBuf};

use zip::read::ZipArchive;
use zip::result::ZipError;
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

use crate::clean::{read_document_text, BODY_ENTRY};
use crate::document::Document;
use crate::error::{DocxError, Result};
use crate::observer::{default_observer, DocEvent, SharedObserver};

/// Where the source archive lives
enum Backing {
    /// Opened from the filesystem; `archive` is `None` once closed
    File {
        path: PathBuf,
        archive: Option<ZipArchive<File>>,
    },
    /// Opened from caller-supplied bytes
    Buffer(ZipArchive<Cursor<Vec<u8>>>),
}

impl Backing {
    fn describe(&self) -> String {
        match self {
            Backing::File { path, .. } => path.display().to_string(),
            Backing::Buffer(_) => "<memory>".to_string(),
        }
    }
}

/// An open DOCX template
pub struct Docx {
    backing: Backing,
    /// Names of all source entries, in archive order
    entries: Vec<String>,
    content: String,
    observer: SharedObserver,
}

impl fmt::Debug for Docx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Docx")
            .field("source", &self.backing.describe())
            .field("entries", &self.entries)
            .field("content_len", &self.content.len())
            .finish()
    }
}

impl Docx {
    /// Open a DOCX file, keeping it open until [`Docx::close`]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, default_observer())
    }

    /// Open a DOCX file, reporting to the given observer
    pub fn open_with<P: AsRef<Path>>(path: P, observer: SharedObserver) -> Result<Self> {
        let path = path.as_ref();
        let loaded = File::open(path)
            .map_err(|e| DocxError::OpenFailure(ZipError::Io(e)))
            .and_then(load);

        let (archive, entries, content) = match loaded {
            Ok(loaded) => loaded,
            Err(e) => {
                observer.notify(&DocEvent::OpenFailed {
                    source: path.display().to_string(),
                    error: e.to_string(),
                });
                return Err(e);
            }
        };

        let docx = Self {
            backing: Backing::File {
                path: path.to_path_buf(),
                archive: Some(archive),
            },
            entries,
            content,
            observer,
        };
        docx.report_opened();
        Ok(docx)
    }

    /// Open a DOCX held in memory
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        Self::from_bytes_with(bytes, default_observer())
    }

    /// Open a DOCX held in memory, reporting to the given observer
    pub fn from_bytes_with(bytes: impl Into<Vec<u8>>, observer: SharedObserver) -> Result<Self> {
        let (archive, entries, content) = match load(Cursor::new(bytes.into())) {
            Ok(loaded) => loaded,
            Err(e) => {
                observer.notify(&DocEvent::OpenFailed {
                    source: "<memory>".to_string(),
                    error: e.to_string(),
                });
                return Err(e);
            }
        };

        let docx = Self {
            backing: Backing::Buffer(archive),
            entries,
            content,
            observer,
        };
        docx.report_opened();
        Ok(docx)
    }

    fn report_opened(&self) {
        self.observer.notify(&DocEvent::Opened {
            source: self.backing.describe(),
            entries: self.entries.len(),
        });
    }

    /// The current document text
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Replace the document text; no validation happens here
    pub fn update_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    /// Names of the source archive's entries, in archive order
    pub fn entry_names(&self) -> &[String] {
        &self.entries
    }

    /// Whether this handle reads from a file (as opposed to memory)
    pub fn is_file_backed(&self) -> bool {
        matches!(self.backing, Backing::File { .. })
    }

    /// Whether [`Docx::close`] has released the source file
    pub fn is_closed(&self) -> bool {
        matches!(self.backing, Backing::File { archive: None, .. })
    }

    /// Rebuild the archive with `text` as body and write it to `path`
    ///
    /// The destination is created (or truncated). If the rebuild fails after
    /// that, the partial file is removed and the error returned. A destination
    /// that cannot be opened for writing is left as it was.
    pub fn write_to_file<P: AsRef<Path>>(&mut self, path: P, text: &str) -> Result<()> {
        let path = path.as_ref();
        let destination = path.display().to_string();

        match self.write_file_inner(path, text) {
            Ok(bytes) => {
                self.observer.notify(&DocEvent::Exported { destination, bytes });
                Ok(())
            }
            Err(e) => {
                self.observer.notify(&DocEvent::ExportFailed {
                    destination,
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    fn write_file_inner(&mut self, path: &Path, text: &str) -> Result<u64> {
        // Fail before touching the destination
        if self.is_closed() {
            return Err(DocxError::Closed);
        }

        let file = File::create(path)?;
        let written = self.rebuild(BufWriter::new(file), text).and_then(|writer| {
            let file = writer
                .into_inner()
                .map_err(|e| DocxError::WriteFailure(e.to_string()))?;
            Ok(file.metadata()?.len())
        });

        if written.is_err() {
            let _ = fs::remove_file(path);
        }
        written
    }

    /// Rebuild the archive with `text` as body and return it as bytes
    pub fn to_bytes(&mut self, text: &str) -> Result<Vec<u8>> {
        match self.rebuild(Cursor::new(Vec::new()), text) {
            Ok(cursor) => {
                let bytes = cursor.into_inner();
                self.observer.notify(&DocEvent::Exported {
                    destination: "<memory>".to_string(),
                    bytes: bytes.len() as u64,
                });
                Ok(bytes)
            }
            Err(e) => {
                self.observer.notify(&DocEvent::ExportFailed {
                    destination: "<memory>".to_string(),
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    fn rebuild<W: Write + Seek>(&mut self, writer: W, text: &str) -> Result<W> {
        match &mut self.backing {
            Backing::File {
                archive: Some(archive),
                ..
            } => rebuild_archive(archive, writer, text),
            Backing::File { archive: None, .. } => Err(DocxError::Closed),
            Backing::Buffer(archive) => rebuild_archive(archive, writer, text),
        }
    }

    /// Release the source file
    ///
    /// A no-op for in-memory handles and for handles already closed.
    pub fn close(&mut self) -> Result<()> {
        if let Backing::File { path, archive } = &mut self.backing {
            if archive.take().is_some() {
                self.observer.notify(&DocEvent::Closed {
                    source: path.display().to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Document for Docx {
    fn content(&self) -> &str {
        Docx::content(self)
    }

    fn update_content(&mut self, content: String) {
        Docx::update_content(self, content)
    }

    fn write_to_file(&mut self, path: &Path, text: &str) -> Result<()> {
        Docx::write_to_file(self, path, text)
    }

    fn to_bytes(&mut self, text: &str) -> Result<Vec<u8>> {
        Docx::to_bytes(self, text)
    }

    fn close(&mut self) -> Result<()> {
        Docx::close(self)
    }
}

/// Open the ZIP, list its entries and read the cleaned body text
fn load<R: Read + Seek>(reader: R) -> Result<(ZipArchive<R>, Vec<String>, String)> {
    let mut archive = ZipArchive::new(reader).map_err(DocxError::OpenFailure)?;

    let mut entries = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let file = archive
            .by_index_raw(i)
            .map_err(|e| DocxError::read(format!("#{}", i), e))?;
        entries.push(file.name().to_string());
    }

    let content = read_document_text(&mut archive)?;
    Ok((archive, entries, content))
}

fn write_failure(err: ZipError) -> DocxError {
    DocxError::WriteFailure(err.to_string())
}

/// Copy every entry of `source` into a new archive over `writer`
///
/// Entries keep their name, order and compression method. The body entry
/// gets `text`; all others get their original decompressed bytes.
fn rebuild_archive<R: Read + Seek, W: Write + Seek>(
    source: &mut ZipArchive<R>,
    writer: W,
    text: &str,
) -> Result<W> {
    let mut zip = ZipWriter::new(writer);

    for i in 0..source.len() {
        let mut entry = source
            .by_index(i)
            .map_err(|e| DocxError::read(format!("#{}", i), e))?;
        let name = entry.name().to_string();

        let method = match entry.compression() {
            CompressionMethod::Stored => CompressionMethod::Stored,
            _ => CompressionMethod::Deflated,
        };
        let options = SimpleFileOptions::default().compression_method(method);

        if entry.is_dir() {
            zip.add_directory(name.as_str(), options)
                .map_err(write_failure)?;
            continue;
        }

        let contents = if name == BODY_ENTRY {
            text.as_bytes().to_vec()
        } else {
            let mut contents = Vec::with_capacity(entry.size() as usize);
            entry
                .read_to_end(&mut contents)
                .map_err(|e| DocxError::read(&name, e))?;
            contents
        };

        zip.start_file(name.as_str(), options)
            .map_err(write_failure)?;
        zip.write_all(&contents)?;
    }

    zip.finish().map_err(write_failure)
}
