//! Body text extraction and template-token cleanup
//!
//! Word splits text into runs wherever formatting, spell-checking or editing
//! history changes, so a placeholder typed as `{{ name }}` often lands in the
//! XML as several `<w:t>` fragments. The cleaner works on the raw markup
//! string (no XML tree) and glues those fragments back together.
//!
//! Cleaned text stays well-formed XML. Entities inside template spans are
//! only decoded by [`template_source`], when the text is handed to the engine.

use std::io::{Read, Seek};
use std::sync::OnceLock;

use quick_xml::escape::{partial_escape, unescape};
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::{Captures, Regex};
use zip::read::ZipArchive;

use crate::error::{DocxError, Result};

/// The entry holding the document body
pub const BODY_ENTRY: &str = "word/document.xml";

/// Markup Word inserts between runs that carries no content
fn noise_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"<w:proofErr[^>]*/>|<w:lastRenderedPageBreak\s*/>")
            .expect("valid noise regex")
    })
}

/// An opening brace separated from its partner (`{`, `%` or `#`) by tags
fn split_open_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{(?:<[^>]*>)+([{%#])").expect("valid open regex"))
}

/// A closing brace separated from its partner by tags
fn split_close_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([}%#])(?:<[^>]*>)+\}").expect("valid close regex"))
}

/// A complete `{{ }}`, `{% %}` or `{# #}` span, possibly crossing tags
fn span_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)\{\{.*?\}\}|\{%.*?%\}|\{#.*?#\}").expect("valid span regex")
    })
}

fn tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("valid tag regex"))
}

/// Read and concatenate the named entries, in archive order
///
/// Fails with [`DocxError::MissingEntry`] when none of `parts` is present.
pub fn extract_text<R: Read + Seek>(archive: &mut ZipArchive<R>, parts: &[&str]) -> Result<String> {
    let mut text = String::new();
    let mut found = false;

    for i in 0..archive.len() {
        let mut file = archive
            .by_index(i)
            .map_err(|e| DocxError::read(format!("#{}", i), e))?;
        let name = file.name().to_string();
        if !parts.contains(&name.as_str()) {
            continue;
        }
        found = true;

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .map_err(|e| DocxError::read(&name, e))?;
        let part = String::from_utf8(bytes).map_err(|e| DocxError::read(&name, e))?;
        text.push_str(&part);
    }

    if !found {
        return Err(DocxError::MissingEntry(parts.join(", ")));
    }
    Ok(text)
}

/// Normalize body markup so template tokens survive run splitting
pub fn clean_text(markup: &str) -> String {
    let text = noise_regex().replace_all(markup, "");
    let text = split_open_regex().replace_all(&text, "{$1");
    let text = split_close_regex().replace_all(&text, "$1}");

    span_regex()
        .replace_all(&text, |caps: &Captures| clean_span(&caps[0]))
        .into_owned()
}

/// Strip markup inside one template span and straighten typographic quotes
fn clean_span(span: &str) -> String {
    tag_regex()
        .replace_all(span, "")
        .replace(['\u{201C}', '\u{201D}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'")
}

/// Engine source for cleaned text: entities inside template spans decoded
///
/// Markup outside the spans is left escaped. A span holding a malformed
/// entity is passed through unchanged and left for the engine to reject.
pub fn template_source(text: &str) -> String {
    span_regex()
        .replace_all(text, |caps: &Captures| match unescape(&caps[0]) {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => caps[0].to_string(),
        })
        .into_owned()
}

/// Escape a substituted value for character data (`&`, `<`, `>` and `"`)
pub fn escape_text(value: &str) -> String {
    let escaped = partial_escape(value);
    if escaped.contains('"') {
        escaped.replace('"', "&quot;")
    } else {
        escaped.into_owned()
    }
}

/// Character data of an XML fragment, entities resolved
pub fn visible_text(markup: &str) -> Result<String> {
    let mut reader = Reader::from_str(markup);
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Text(e)) => {
                let unescaped = e.unescape().map_err(|e| DocxError::read(BODY_ENTRY, e))?;
                text.push_str(&unescaped);
            }
            Ok(Event::CData(e)) => text.push_str(&String::from_utf8_lossy(&e)),
            Ok(Event::Eof) => break,
            Err(e) => return Err(DocxError::read(BODY_ENTRY, e)),
            _ => {}
        }
    }

    Ok(text)
}

/// Extract the body entry, check it has visible text and clean it
pub fn read_document_text<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<String> {
    let markup = extract_text(archive, &[BODY_ENTRY])?;
    if visible_text(&markup)?.trim().is_empty() {
        return Err(DocxError::EmptyContent);
    }
    Ok(clean_text(&markup))
}
