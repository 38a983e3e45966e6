//! Text extraction for uploaded resumes (Office Open XML `.docx`).
//!
//! Extraction is the first pipeline stage: callers supply a file name and the
//! raw bytes, this module returns plain UTF-8 text. Failures are reported as
//! an [`ExtractionError`] naming the offending file; the pipeline skips that
//! file and keeps going with the rest of the batch.
//!
//! Text layout follows the usual docx-to-text convention: every `w:t` run is
//! kept, each paragraph starts on a blank line, `w:tab` becomes a tab and
//! `w:br`/`w:cr` become newlines. Header parts come before the body and
//! footer parts after it, each separated by a blank line. The result is
//! trimmed.

use std::io::Read;
use std::path::Path;

use quick_xml::events::Event;
use thiserror::Error;

use crate::models::Upload;

/// The only file extension accepted for resumes.
pub const DOCX_EXTENSION: &str = "docx";

/// Archive entry holding the main document body.
const DOCUMENT_PART: &str = "word/document.xml";

/// Default cap on the size of a single uploaded file.
pub const DEFAULT_MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;
/// Default cap on decompressed bytes read from one ZIP entry (zip-bomb protection).
pub const DEFAULT_MAX_XML_ENTRY_BYTES: u64 = 50 * 1024 * 1024;

/// Size limits applied during extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractLimits {
    pub max_file_bytes: u64,
    pub max_xml_entry_bytes: u64,
}

impl Default for ExtractLimits {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            max_xml_entry_bytes: DEFAULT_MAX_XML_ENTRY_BYTES,
        }
    }
}

/// Extraction failure for one file.
#[derive(Debug, Clone, Error)]
#[error("{file}: {kind}")]
pub struct ExtractionError {
    /// File name as uploaded.
    pub file: String,
    pub kind: ExtractErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractErrorKind {
    #[error("unsupported format (only .docx resumes are accepted)")]
    UnsupportedFormat,
    #[error("corrupt document: {0}")]
    Corrupt(String),
    #[error("document exceeds size limit ({0} bytes)")]
    TooLarge(u64),
    #[error("could not read file: {0}")]
    Io(String),
}

impl ExtractionError {
    fn new(file: impl Into<String>, kind: ExtractErrorKind) -> Self {
        Self {
            file: file.into(),
            kind,
        }
    }
}

/// Returns true if `file_name` carries a `.docx` extension (case-insensitive).
pub fn is_supported(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case(DOCX_EXTENSION))
        .unwrap_or(false)
}

/// Extracts plain text from an uploaded document.
pub fn extract_text(
    file_name: &str,
    bytes: &[u8],
    limits: &ExtractLimits,
) -> Result<String, ExtractionError> {
    if !is_supported(file_name) {
        return Err(ExtractionError::new(
            file_name,
            ExtractErrorKind::UnsupportedFormat,
        ));
    }
    if bytes.len() as u64 > limits.max_file_bytes {
        return Err(ExtractionError::new(
            file_name,
            ExtractErrorKind::TooLarge(limits.max_file_bytes),
        ));
    }
    extract_docx(bytes, limits.max_xml_entry_bytes)
        .map_err(|kind| ExtractionError::new(file_name, kind))
}

/// Extracts the text of an [`Upload`].
pub fn extract_upload(upload: &Upload, limits: &ExtractLimits) -> Result<String, ExtractionError> {
    extract_text(&upload.file_name, &upload.bytes, limits)
}

/// Reads a document from disk and extracts its text.
pub fn extract_path(path: &Path, limits: &ExtractLimits) -> Result<String, ExtractionError> {
    let upload = read_upload(path, limits)?;
    extract_upload(&upload, limits)
}

/// Reads a file into an [`Upload`], refusing files above `max_file_bytes`
/// before loading them into memory.
pub fn read_upload(path: &Path, limits: &ExtractLimits) -> Result<Upload, ExtractionError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let meta = std::fs::metadata(path)
        .map_err(|e| ExtractionError::new(&file_name, ExtractErrorKind::Io(e.to_string())))?;
    if meta.len() > limits.max_file_bytes {
        return Err(ExtractionError::new(
            file_name,
            ExtractErrorKind::TooLarge(limits.max_file_bytes),
        ));
    }

    let bytes = std::fs::read(path)
        .map_err(|e| ExtractionError::new(&file_name, ExtractErrorKind::Io(e.to_string())))?;
    Ok(Upload::new(file_name, bytes))
}

fn extract_docx(bytes: &[u8], max_entry_bytes: u64) -> Result<String, ExtractErrorKind> {
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes))
        .map_err(|e| ExtractErrorKind::Corrupt(e.to_string()))?;

    let names: Vec<String> = archive.file_names().map(String::from).collect();
    let headers = numbered_parts(&names, "header");
    let footers = numbered_parts(&names, "footer");

    let mut sections = Vec::new();
    for name in &headers {
        sections.push(read_part(&mut archive, name, max_entry_bytes)?);
    }
    let body = archive.by_name(DOCUMENT_PART).map_err(|e| match e {
        zip::result::ZipError::FileNotFound => {
            ExtractErrorKind::Corrupt(format!("{} not found", DOCUMENT_PART))
        }
        other => ExtractErrorKind::Corrupt(other.to_string()),
    })?;
    sections.push(part_text(body, max_entry_bytes)?);
    for name in &footers {
        sections.push(read_part(&mut archive, name, max_entry_bytes)?);
    }

    sections.retain(|s| !s.is_empty());
    Ok(sections.join("\n\n"))
}

/// Names of `word/{kind}N.xml` entries, ordered by `N`.
fn numbered_parts(names: &[String], kind: &str) -> Vec<String> {
    let prefix = format!("word/{}", kind);
    let mut parts: Vec<(u32, &String)> = names
        .iter()
        .filter_map(|name| {
            let digits = name.strip_prefix(&prefix)?.strip_suffix(".xml")?;
            if !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            Some((digits.parse().unwrap_or(0), name))
        })
        .collect();
    parts.sort();
    parts.into_iter().map(|(_, name)| name.clone()).collect()
}

fn read_part<R: std::io::Read + std::io::Seek>(
    archive: &mut zip::ZipArchive<R>,
    name: &str,
    max_entry_bytes: u64,
) -> Result<String, ExtractErrorKind> {
    let entry = archive
        .by_name(name)
        .map_err(|e| ExtractErrorKind::Corrupt(format!("{}: {}", name, e)))?;
    part_text(entry, max_entry_bytes)
}

/// Reads one archive entry, bounded by `max_entry_bytes`, and extracts its text.
fn part_text(entry: impl Read, max_entry_bytes: u64) -> Result<String, ExtractErrorKind> {
    let mut xml = Vec::new();
    entry
        .take(max_entry_bytes)
        .read_to_end(&mut xml)
        .map_err(|e| ExtractErrorKind::Corrupt(e.to_string()))?;
    if xml.len() as u64 >= max_entry_bytes {
        return Err(ExtractErrorKind::TooLarge(max_entry_bytes));
    }

    document_text(&xml)
}

/// Walks a body, header or footer part and collects run text with
/// paragraph, tab and break markers.
fn document_text(xml: &[u8]) -> Result<String, ExtractErrorKind> {
    let mut reader = quick_xml::Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut out = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"t" => in_text = true,
                other => push_marker(&mut out, other),
            },
            Ok(Event::Empty(e)) => push_marker(&mut out, e.local_name().as_ref()),
            Ok(Event::End(e)) => {
                if e.local_name().as_ref() == b"t" {
                    in_text = false;
                }
            }
            Ok(Event::Text(te)) if in_text => {
                let text = te
                    .unescape()
                    .map_err(|e| ExtractErrorKind::Corrupt(e.to_string()))?;
                out.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ExtractErrorKind::Corrupt(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(out.trim().to_string())
}

fn push_marker(out: &mut String, local_name: &[u8]) {
    match local_name {
        b"p" => out.push_str("\n\n"),
        b"tab" => out.push('\t'),
        b"br" | b"cr" => out.push('\n'),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn docx_with_body(body: &str) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(std::io::Cursor::new(&mut buf));
            zip.start_file(DOCUMENT_PART, zip::write::SimpleFileOptions::default())
                .unwrap();
            let xml = format!(
                "<?xml version=\"1.0\"?><w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\"><w:body>{}</w:body></w:document>",
                body
            );
            zip.write_all(xml.as_bytes()).unwrap();
            zip.finish().unwrap();
        }
        buf
    }

    #[test]
    fn extracts_paragraph_text() {
        let bytes = docx_with_body(
            "<w:p><w:r><w:t>Jane Doe</w:t></w:r></w:p><w:p><w:r><w:t>5 years of Rust</w:t></w:r></w:p>",
        );
        let text = extract_text("jane.docx", &bytes, &ExtractLimits::default()).unwrap();
        assert_eq!(text, "Jane Doe\n\n5 years of Rust");
    }

    #[test]
    fn tabs_breaks_and_entities() {
        let bytes = docx_with_body(
            "<w:p><w:r><w:t>R&amp;D</w:t><w:tab/><w:t>Lead</w:t><w:br/><w:t xml:space=\"preserve\">SQL </w:t></w:r></w:p>",
        );
        let text = extract_text("a.docx", &bytes, &ExtractLimits::default()).unwrap();
        assert_eq!(text, "R&D\tLead\nSQL");
    }

    #[test]
    fn runs_in_one_paragraph_are_joined() {
        let bytes = docx_with_body(
            "<w:p><w:r><w:t>Pyth</w:t></w:r><w:r><w:t>on</w:t></w:r></w:p>",
        );
        let text = extract_text("a.docx", &bytes, &ExtractLimits::default()).unwrap();
        assert_eq!(text, "Python");
    }

    fn docx_with_parts(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(std::io::Cursor::new(&mut buf));
            for (name, text) in parts {
                zip.start_file(*name, zip::write::SimpleFileOptions::default())
                    .unwrap();
                let xml = format!(
                    "<w:root xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\"><w:p><w:r><w:t>{}</w:t></w:r></w:p></w:root>",
                    text
                );
                zip.write_all(xml.as_bytes()).unwrap();
            }
            zip.finish().unwrap();
        }
        buf
    }

    #[test]
    fn headers_precede_body_and_footers_follow() {
        let bytes = docx_with_parts(&[
            ("word/footer1.xml", "jane@example.com"),
            (DOCUMENT_PART, "Data engineer 5 years"),
            ("word/header2.xml", "Python SQL Pandas"),
            ("word/header1.xml", "Jane Doe"),
        ]);
        let text = extract_text("jane.docx", &bytes, &ExtractLimits::default()).unwrap();
        assert_eq!(
            text,
            "Jane Doe\n\nPython SQL Pandas\n\nData engineer 5 years\n\njane@example.com"
        );
    }

    #[test]
    fn empty_header_adds_no_separator() {
        let bytes = docx_with_parts(&[("word/header1.xml", ""), (DOCUMENT_PART, "Body")]);
        let text = extract_text("a.docx", &bytes, &ExtractLimits::default()).unwrap();
        assert_eq!(text, "Body");
    }

    #[test]
    fn header_numbers_sort_numerically() {
        let names: Vec<String> = [
            "word/header10.xml",
            "word/header2.xml",
            "word/header.xml",
            "word/headers.xml",
            "word/_rels/header1.xml.rels",
            "word/footer1.xml",
        ]
        .into_iter()
        .map(String::from)
        .collect();
        assert_eq!(
            numbered_parts(&names, "header"),
            vec!["word/header.xml", "word/header2.xml", "word/header10.xml"]
        );
    }

    #[test]
    fn oversize_header_is_rejected() {
        let bytes = docx_with_parts(&[
            ("word/header1.xml", "a header long enough to pass the cap"),
            (DOCUMENT_PART, "x"),
        ]);
        let limits = ExtractLimits {
            max_xml_entry_bytes: 140,
            ..ExtractLimits::default()
        };
        let err = extract_text("bomb.docx", &bytes, &limits).unwrap_err();
        assert_eq!(err.kind, ExtractErrorKind::TooLarge(140));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = extract_text("resume.pdf", b"%PDF-1.4", &ExtractLimits::default()).unwrap_err();
        assert_eq!(err.kind, ExtractErrorKind::UnsupportedFormat);
        assert_eq!(err.file, "resume.pdf");
        assert!(err.to_string().contains("resume.pdf"));
    }

    #[test]
    fn invalid_zip_is_corrupt() {
        let err = extract_text("bad.docx", b"not a zip", &ExtractLimits::default()).unwrap_err();
        assert!(matches!(err.kind, ExtractErrorKind::Corrupt(_)));
    }

    #[test]
    fn missing_document_part_is_corrupt() {
        let mut buf = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(std::io::Cursor::new(&mut buf));
            zip.start_file("word/styles.xml", zip::write::SimpleFileOptions::default())
                .unwrap();
            zip.write_all(b"<styles/>").unwrap();
            zip.finish().unwrap();
        }
        let err = extract_text("empty.docx", &buf, &ExtractLimits::default()).unwrap_err();
        match err.kind {
            ExtractErrorKind::Corrupt(msg) => assert!(msg.contains("word/document.xml")),
            other => panic!("unexpected kind: {:?}", other),
        }
    }

    #[test]
    fn oversize_upload_is_rejected() {
        let bytes = docx_with_body("<w:p><w:r><w:t>hello</w:t></w:r></w:p>");
        let limits = ExtractLimits {
            max_file_bytes: 8,
            ..ExtractLimits::default()
        };
        let err = extract_text("big.docx", &bytes, &limits).unwrap_err();
        assert_eq!(err.kind, ExtractErrorKind::TooLarge(8));
    }

    #[test]
    fn oversize_entry_is_rejected() {
        let bytes = docx_with_body("<w:p><w:r><w:t>hello world</w:t></w:r></w:p>");
        let limits = ExtractLimits {
            max_xml_entry_bytes: 16,
            ..ExtractLimits::default()
        };
        let err = extract_text("bomb.docx", &bytes, &limits).unwrap_err();
        assert_eq!(err.kind, ExtractErrorKind::TooLarge(16));
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        assert!(is_supported("CV.DOCX"));
        assert!(is_supported("dir/cv.docx"));
        assert!(!is_supported("cv.doc"));
        assert!(!is_supported("docx"));
    }
}
