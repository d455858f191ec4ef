//! Text extraction: turns an uploaded document into plain text.
//!
//! The media type is sniffed from the file content, never from the extension:
//! `%PDF-` → PDF, a ZIP archive holding `word/document.xml` → DOCX, anything
//! else is read as UTF-8 text.

pub mod docx;

use std::io::Cursor;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

const PDF_MAGIC: &[u8] = b"%PDF-";
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX extraction failed: {0}")]
    Docx(String),

    #[error("Document is not valid UTF-8 text: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Pdf,
    Docx,
    PlainText,
}

impl MediaType {
    pub fn mime(&self) -> &'static str {
        match self {
            MediaType::Pdf => "application/pdf",
            MediaType::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            MediaType::PlainText => "text/plain",
        }
    }
}

/// Inspects the leading bytes (and, for ZIP archives, the entry list).
pub fn detect_media_type(bytes: &[u8]) -> MediaType {
    if bytes.starts_with(PDF_MAGIC) {
        return MediaType::Pdf;
    }
    if bytes.starts_with(ZIP_MAGIC) && docx::is_word_document(Cursor::new(bytes)) {
        return MediaType::Docx;
    }
    MediaType::PlainText
}

/// Reads the file at `path` and returns its text content.
pub fn extract_text(path: &Path) -> Result<String, ExtractError> {
    let bytes = std::fs::read(path).map_err(|source| ExtractError::Io {
        path: path.display().to_string(),
        source,
    })?;
    extract_text_from_bytes(&bytes)
}

pub fn extract_text_from_bytes(bytes: &[u8]) -> Result<String, ExtractError> {
    let media_type = detect_media_type(bytes);
    debug!("Detected media type {}", media_type.mime());

    match media_type {
        MediaType::Pdf => {
            let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
                .map_err(|e| ExtractError::Pdf(e.to_string()))?;
            Ok(pages.join(" "))
        }
        MediaType::Docx => {
            let paragraphs = docx::paragraphs(Cursor::new(bytes))?;
            Ok(paragraphs.join(" "))
        }
        MediaType::PlainText => Ok(String::from_utf8(bytes.to_vec())?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    pub(crate) fn build_docx(paragraphs: &[&str]) -> Vec<u8> {
        let body: String = paragraphs
            .iter()
            .map(|p| format!("<w:p><w:pPr/><w:r><w:t xml:space=\"preserve\">{p}</w:t></w:r></w:p>"))
            .collect();
        let xml = format!(
            "<?xml version=\"1.0\"?><w:document xmlns:w=\"x\"><w:body>{body}</w:body></w:document>"
        );

        let mut buf = Vec::new();
        {
            let mut writer = zip::ZipWriter::new(Cursor::new(&mut buf));
            let options = zip::write::FileOptions::default();
            writer.start_file("[Content_Types].xml", options).unwrap();
            writer.write_all(b"<Types/>").unwrap();
            writer.start_file("word/document.xml", options).unwrap();
            writer.write_all(xml.as_bytes()).unwrap();
            writer.finish().unwrap();
        }
        buf
    }

    fn build_pdf(pages: &[&str]) -> Vec<u8> {
        use lopdf::content::{Content, Operation};
        use lopdf::{dictionary, Document, Object, Stream};

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let kids: Vec<Object> = pages
            .iter()
            .map(|line| {
                let content = Content {
                    operations: vec![
                        Operation::new("BT", vec![]),
                        Operation::new("Tf", vec!["F1".into(), 24.into()]),
                        Operation::new("Td", vec![72.into(), 700.into()]),
                        Operation::new("Tj", vec![Object::string_literal(*line)]),
                        Operation::new("ET", vec![]),
                    ],
                };
                let content_id =
                    doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
                doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "Contents" => content_id,
                })
                .into()
            })
            .collect();

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_pdf_pages_joined_with_a_space() {
        let bytes = build_pdf(&["Jane Doe", "Python developer"]);
        assert_eq!(detect_media_type(&bytes), MediaType::Pdf);

        let pages = pdf_extract::extract_text_from_mem_by_pages(&bytes).unwrap();
        assert_eq!(pages.len(), 2);
        assert!(pages[0].contains("Jane Doe"));
        assert!(pages[1].contains("Python developer"));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.pdf");
        std::fs::write(&path, &bytes).unwrap();
        let text = extract_text(&path).unwrap();
        assert_eq!(text, pages.join(" "));
        assert!(text.find("Jane Doe") < text.find("Python developer"));
    }

    #[test]
    fn test_detects_pdf_by_magic() {
        assert_eq!(detect_media_type(b"%PDF-1.7\n..."), MediaType::Pdf);
    }

    #[test]
    fn test_detects_docx_by_archive_contents() {
        let bytes = build_docx(&["Hello"]);
        assert_eq!(detect_media_type(&bytes), MediaType::Docx);
    }

    #[test]
    fn test_plain_zip_is_not_docx() {
        let mut buf = Vec::new();
        {
            let mut writer = zip::ZipWriter::new(Cursor::new(&mut buf));
            writer
                .start_file("notes.txt", zip::write::FileOptions::default())
                .unwrap();
            writer.write_all(b"hi").unwrap();
            writer.finish().unwrap();
        }
        assert_eq!(detect_media_type(&buf), MediaType::PlainText);
    }

    #[test]
    fn test_extension_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.pdf");
        std::fs::write(&path, "Jane Doe\nPython developer").unwrap();
        let text = extract_text(&path).unwrap();
        assert_eq!(text, "Jane Doe\nPython developer");
    }

    #[test]
    fn test_docx_paragraphs_joined_with_spaces() {
        let bytes = build_docx(&["Jane Doe", "Skills: Python &amp; SQL"]);
        let text = extract_text_from_bytes(&bytes).unwrap();
        assert_eq!(text, "Jane Doe Skills: Python & SQL");
    }

    #[test]
    fn test_invalid_utf8_is_an_error() {
        let err = extract_text_from_bytes(&[0xff, 0xfe, 0x00, 0x41]).unwrap_err();
        assert!(matches!(err, ExtractError::Encoding(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = extract_text(Path::new("/nonexistent/resume.txt")).unwrap_err();
        assert!(matches!(err, ExtractError::Io { .. }));
    }
}
