//! Template facade over a document's text
//!
//! A [`DocTemplate`] binds a [`Document`]'s cleaned text as a minijinja
//! template source, renders it against caller data and hands the result back
//! to the document to rebuild the archive.
//!
//! # Example
//!
//! ```no_run
//! use doctemp_core::DocTemplate;
//! use minijinja::Value;
//! use serde_json::json;
//!
//! let mut template = DocTemplate::open("letter.docx")?;
//! template.add_function("shout", Value::from_function(|s: String| s.to_uppercase()));
//! template.parse()?;
//! template.execute("out.docx", json!({ "name": "Ada" }))?;
//! template.close()?;
//! # Ok::<(), doctemp_core::TemplateError>(())
//! ```

use std::borrow::Cow;
use std::fmt;
use std::path::Path;

use doctemp_docx::{
    default_observer, escape_text, template_source, DocEvent, Document, Docx, SharedObserver,
    BODY_ENTRY,
};
use minijinja::{escape_formatter, AutoEscape, Environment, Value};
use serde::Serialize;
use tracing::debug;

use crate::config::TemplateConfig;
use crate::error::{Result, TemplateError};

/// A document bound to a template environment
pub struct DocTemplate {
    document: Box<dyn Document>,
    env: Environment<'static>,
    /// Whether the environment holds a compiled body template
    parsed: bool,
    config: TemplateConfig,
    observer: SharedObserver,
}

impl fmt::Debug for DocTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocTemplate")
            .field("content_len", &self.document.content().len())
            .field("parsed", &self.parsed)
            .field("config", &self.config)
            .finish()
    }
}

impl DocTemplate {
    /// Open a template file with default settings
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, TemplateConfig::default(), default_observer())
    }

    /// Open a template file, choosing the document format by extension
    ///
    /// Unknown extensions fail with [`TemplateError::UnsupportedType`]
    /// before the file is touched.
    pub fn open_with<P: AsRef<Path>>(
        path: P,
        config: TemplateConfig,
        observer: SharedObserver,
    ) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();

        if !config.accepts_extension(extension) {
            return Err(TemplateError::UnsupportedType(path.display().to_string()));
        }

        let docx = Docx::open_with(path, observer.clone())?;
        Ok(Self::with_document(Box::new(docx), config, observer))
    }

    /// Open a DOCX template held in memory with default settings
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        Self::from_bytes_with(bytes, TemplateConfig::default(), default_observer())
    }

    /// Open a DOCX template held in memory
    pub fn from_bytes_with(
        bytes: impl Into<Vec<u8>>,
        config: TemplateConfig,
        observer: SharedObserver,
    ) -> Result<Self> {
        let docx = Docx::from_bytes_with(bytes, observer.clone())?;
        Ok(Self::with_document(Box::new(docx), config, observer))
    }

    /// Bind an already opened document
    pub fn with_document(
        document: Box<dyn Document>,
        config: TemplateConfig,
        observer: SharedObserver,
    ) -> Self {
        Self {
            document,
            env: build_environment(&config),
            parsed: false,
            config,
            observer,
        }
    }

    /// The settings this template was opened with
    pub fn config(&self) -> &TemplateConfig {
        &self.config
    }

    /// The current template text
    pub fn content(&self) -> &str {
        self.document.content()
    }

    /// Replace the template text, bypassing rendering
    ///
    /// The next render compiles the new text.
    pub fn update_content(&mut self, content: impl Into<String>) {
        self.document.update_content(content.into());
        self.parsed = false;
    }

    /// Register a function callable from template expressions
    ///
    /// Registering a name twice replaces the earlier function.
    pub fn add_function(&mut self, name: impl Into<Cow<'static, str>>, function: Value) {
        let name = name.into();
        debug!("Registering template function `{}`", name);
        self.env.add_global(name, function);
    }

    /// Register several functions at once
    pub fn add_functions<I, N>(&mut self, functions: I)
    where
        I: IntoIterator<Item = (N, Value)>,
        N: Into<Cow<'static, str>>,
    {
        for (name, function) in functions {
            self.add_function(name, function);
        }
    }

    /// Compile the current text
    ///
    /// Entities inside template spans are decoded for the engine only; the
    /// document text itself stays escaped. On failure the error is reported
    /// and returned, and whatever compiled before stays in place.
    pub fn parse(&mut self) -> Result<()> {
        let source = template_source(self.document.content());
        match self.env.add_template_owned(BODY_ENTRY, source) {
            Ok(()) => {
                self.parsed = true;
                Ok(())
            }
            Err(e) => {
                self.observer.notify(&DocEvent::ParseFailed {
                    error: e.to_string(),
                });
                Err(e.into())
            }
        }
    }

    /// Whether a successfully compiled source is available
    pub fn is_parsed(&self) -> bool {
        self.parsed
    }

    /// Render against `data` without writing anything
    ///
    /// Compiles first if [`DocTemplate::parse`] has not succeeded yet. The
    /// configured missing-value marker is removed from the output.
    pub fn render<S: Serialize>(&mut self, data: S) -> Result<String> {
        if !self.parsed {
            self.parse()?;
        }

        let rendered = match self
            .env
            .get_template(BODY_ENTRY)
            .and_then(|template| template.render(data))
        {
            Ok(rendered) => rendered,
            Err(e) => {
                self.observer.notify(&DocEvent::RenderFailed {
                    error: e.to_string(),
                });
                return Err(e.into());
            }
        };

        Ok(blank_missing(rendered, &self.config.missing_marker))
    }

    /// Render against `data` and write the resulting document to `path`
    pub fn execute<P: AsRef<Path>, S: Serialize>(&mut self, path: P, data: S) -> Result<()> {
        let rendered = self.render(data)?;
        self.document.write_to_file(path.as_ref(), &rendered)?;
        Ok(())
    }

    /// Render against `data` and return the resulting document as bytes
    pub fn execute_bytes<S: Serialize>(&mut self, data: S) -> Result<Vec<u8>> {
        let rendered = self.render(data)?;
        Ok(self.document.to_bytes(&rendered)?)
    }

    /// Release the underlying document
    pub fn close(&mut self) -> Result<()> {
        Ok(self.document.close()?)
    }
}

fn build_environment(config: &TemplateConfig) -> Environment<'static> {
    let mut env = Environment::new();
    env.set_undefined_behavior(config.undefined.into());
    env.set_trim_blocks(config.trim_blocks);
    env.set_keep_trailing_newline(true);

    // The body is named `*.xml`, which minijinja would map to HTML escaping
    env.set_auto_escape_callback(|_name| AutoEscape::None);

    let escape_values = config.escape_values;
    env.set_formatter(move |out, state, value| {
        if !escape_values || value.is_safe() {
            return escape_formatter(out, state, value);
        }
        out.write_str(&escape_text(&value.to_string()))?;
        Ok(())
    });
    env
}

fn blank_missing(rendered: String, marker: &str) -> String {
    if marker.is_empty() || !rendered.contains(marker) {
        return rendered;
    }
    rendered.replace(marker, "")
}
