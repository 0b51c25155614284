//! Integration tests for doctemp CLI
//!
//! These tests drive the render and inspect commands against template files
//! written to a temporary directory.

use std::fs;
use std::io::{Cursor, Read, Write};

use doctemp_cli::{inspect_report, render_command};
use tempfile::TempDir;
use zip::read::ZipArchive;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Create a minimal valid DOCX template for testing
fn create_test_template(paragraph: &str) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    let mut zip = ZipWriter::new(&mut buffer);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    // [Content_Types].xml
    zip.start_file("[Content_Types].xml", options).unwrap();
    zip.write_all(br#"<?xml version="1.0" encoding="UTF-8"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#).unwrap();

    // _rels/.rels
    zip.start_file("_rels/.rels", options).unwrap();
    zip.write_all(br#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#).unwrap();

    // word/document.xml
    zip.start_file("word/document.xml", options).unwrap();
    zip.write_all(
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>{}</w:t></w:r></w:p>
  </w:body>
</w:document>"#,
            paragraph
        )
        .as_bytes(),
    )
    .unwrap();

    zip.finish().unwrap();
    buffer.into_inner()
}

fn read_document_xml(path: &std::path::Path) -> String {
    let bytes = fs::read(path).unwrap();
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut file = archive.by_name("word/document.xml").unwrap();
    let mut xml = String::new();
    file.read_to_string(&mut xml).unwrap();
    xml
}

#[test]
fn test_render_command_writes_output() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let template_path = temp_dir.path().join("letter.docx");
    let data_path = temp_dir.path().join("data.json");
    let output_path = temp_dir.path().join("filled.docx");

    fs::write(&template_path, create_test_template("Dear {{ name }} from {{ city }}")).unwrap();
    fs::write(&data_path, r#"{ "name": "Ada" }"#).unwrap();

    let written = render_command(&template_path, &data_path, Some(&output_path), None, false)
        .expect("render should succeed");

    assert_eq!(written, output_path);
    let xml = read_document_xml(&output_path);
    assert!(xml.contains("<w:t>Dear Ada from </w:t>"), "got: {}", xml);
}

#[test]
fn test_render_command_default_output() {
    let temp_dir = TempDir::new().unwrap();
    let template_path = temp_dir.path().join("letter.docx");
    let data_path = temp_dir.path().join("data.json");

    fs::write(&template_path, create_test_template("Hi {{ name }}")).unwrap();
    fs::write(&data_path, r#"{ "name": "Bo" }"#).unwrap();

    let written = render_command(&template_path, &data_path, None, None, false).unwrap();
    assert_eq!(written, temp_dir.path().join("letter.out.docx"));
    assert!(read_document_xml(&written).contains("Hi Bo"));
}

#[test]
fn test_render_command_strict_fails_on_missing_field() {
    let temp_dir = TempDir::new().unwrap();
    let template_path = temp_dir.path().join("letter.docx");
    let data_path = temp_dir.path().join("data.json");
    let output_path = temp_dir.path().join("filled.docx");

    fs::write(&template_path, create_test_template("Hi {{ name }}")).unwrap();
    fs::write(&data_path, "{}").unwrap();

    let result = render_command(&template_path, &data_path, Some(&output_path), None, true);
    assert!(result.is_err());
    assert!(!output_path.exists());
}

#[test]
fn test_render_command_with_config() {
    let temp_dir = TempDir::new().unwrap();
    let template_path = temp_dir.path().join("letter.dotx");
    let data_path = temp_dir.path().join("data.json");
    let config_path = temp_dir.path().join("doctemp.toml");
    let output_path = temp_dir.path().join("filled.docx");

    fs::write(&template_path, create_test_template("{{ company }}")).unwrap();
    fs::write(&data_path, r#"{ "company": "A & B" }"#).unwrap();
    fs::write(&config_path, "[template]\nextensions = [\"dotx\"]\n").unwrap();

    render_command(
        &template_path,
        &data_path,
        Some(&output_path),
        Some(&config_path),
        false,
    )
    .unwrap();
    assert!(read_document_xml(&output_path).contains("<w:t>A &amp; B</w:t>"));
}

#[test]
fn test_render_command_rejects_unknown_extension() {
    let temp_dir = TempDir::new().unwrap();
    let template_path = temp_dir.path().join("letter.pdf");
    let data_path = temp_dir.path().join("data.json");
    fs::write(&template_path, b"%PDF-1.7").unwrap();
    fs::write(&data_path, "{}").unwrap();

    let err = render_command(&template_path, &data_path, None, None, false).unwrap_err();
    assert!(format!("{:#}", err).contains("Unsupported document type"));
}

#[test]
fn test_render_command_invalid_json() {
    let temp_dir = TempDir::new().unwrap();
    let template_path = temp_dir.path().join("letter.docx");
    let data_path = temp_dir.path().join("data.json");
    fs::write(&template_path, create_test_template("Hi")).unwrap();
    fs::write(&data_path, "{ not json").unwrap();

    let err = render_command(&template_path, &data_path, None, None, false).unwrap_err();
    assert!(err.to_string().contains("Invalid JSON"));
}

#[test]
fn test_inspect_report() {
    let temp_dir = TempDir::new().unwrap();
    let template_path = temp_dir.path().join("letter.docx");
    fs::write(&template_path, create_test_template("Hello {{ name }}")).unwrap();

    let report = inspect_report(&template_path, false).unwrap();
    assert!(report.starts_with("Entries (3):"));
    assert!(report.contains("  word/document.xml\n"));
    assert!(report.contains("<w:t>Hello {{ name }}</w:t>"));

    let text = inspect_report(&template_path, true).unwrap();
    assert!(text.contains("Hello {{ name }}"));
    assert!(!text.contains("<w:t>"));
}

#[test]
fn test_inspect_text_with_escaped_condition() {
    let temp_dir = TempDir::new().unwrap();
    let template_path = temp_dir.path().join("letter.docx");
    fs::write(
        &template_path,
        create_test_template("{% if a &lt; b %}yes{% endif %}"),
    )
    .unwrap();

    let text = inspect_report(&template_path, true).unwrap();
    assert!(text.contains("{% if a < b %}yes{% endif %}"));

    let report = inspect_report(&template_path, false).unwrap();
    assert!(report.contains("{% if a &lt; b %}yes{% endif %}"));
}
