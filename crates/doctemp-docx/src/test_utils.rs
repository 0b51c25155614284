//! Shared test fixtures for doctemp crates
//!
//! Builds small DOCX archives in memory so tests never depend on binary
//! fixtures checked into the repository. Enabled for this crate's own tests
//! and, through the `test-utils` feature, for dependent crates' tests.

use std::io::{Cursor, Read, Write};

use zip::read::ZipArchive;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::clean::BODY_ENTRY;

const CONTENT_TYPES: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
  <Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
</Types>"#;

const ROOT_RELS: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#;

const DOCUMENT_RELS: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#;

const STYLES: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:style w:type="paragraph" w:styleId="Normal" w:default="1">
    <w:name w:val="Normal"/>
  </w:style>
</w:styles>"#;

const PNG_STUB: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 1, 2];

/// Build a ZIP archive from `(name, contents)` pairs, in order
///
/// Names ending in `/` become directory entries. Entries named `*.png` are
/// stored uncompressed, everything else is deflated.
pub fn build_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    let mut zip = ZipWriter::new(&mut buffer);

    for (name, contents) in entries {
        let method = if name.ends_with(".png") {
            CompressionMethod::Stored
        } else {
            CompressionMethod::Deflated
        };
        let options = SimpleFileOptions::default().compression_method(method);

        if name.ends_with('/') {
            zip.add_directory(*name, options).expect("add directory");
            continue;
        }
        zip.start_file(*name, options).expect("start file");
        zip.write_all(contents).expect("write file");
    }

    zip.finish().expect("finish archive");
    buffer.into_inner()
}

/// Wrap raw body markup (`<w:p>` elements) into a complete document.xml
pub fn document_xml(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    {}
  </w:body>
</w:document>"#,
        body
    )
}

/// Create a minimal DOCX whose body is a single paragraph of `text`
pub fn create_minimal_docx(text: &str) -> Vec<u8> {
    create_docx_with_body(&format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", text))
}

/// Create a DOCX around the given body markup
///
/// Besides the body entry it carries content types, relationships, styles,
/// a media directory and a stored image, so rebuild tests see a mix of
/// entry kinds and compression methods.
pub fn create_docx_with_body(body: &str) -> Vec<u8> {
    let document = document_xml(body);
    build_archive(&[
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", ROOT_RELS),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS),
        (BODY_ENTRY, document.as_bytes()),
        ("word/styles.xml", STYLES),
        ("word/media/", b"".as_slice()),
        ("word/media/image1.png", PNG_STUB),
    ])
}

/// Read every entry of an archive as `(name, decompressed bytes)`, in order
pub fn read_entries(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).expect("valid archive");
    let mut entries = Vec::new();

    for i in 0..archive.len() {
        let mut file = archive.by_index(i).expect("entry");
        let mut contents = Vec::new();
        file.read_to_end(&mut contents).expect("read entry");
        entries.push((file.name().to_string(), contents));
    }

    entries
}

/// Extract the body entry of an archive as a string
pub fn extract_document_xml(bytes: &[u8]) -> String {
    read_entries(bytes)
        .into_iter()
        .find(|(name, _)| name == BODY_ENTRY)
        .map(|(_, contents)| String::from_utf8_lossy(&contents).into_owned())
        .expect("document.xml present")
}
