// src/document.rs
//! File collaborator: turns an uploaded résumé file into text, then a record

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::extraction::TextExtractor;
use crate::pdf;
use crate::types::resume::ResumeRecord;
use crate::utils::get_file_extension;

pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["txt", "pdf", "docx", "doc"];

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("File has no extension: {0}")]
    MissingExtension(String),

    #[error("Failed to read file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Txt,
    Pdf,
    Docx,
    Doc,
}

impl DocumentFormat {
    pub fn from_file_name(name: &str) -> Result<Self, DocumentError> {
        let ext = get_file_extension(name)
            .ok_or_else(|| DocumentError::MissingExtension(name.to_string()))?;

        match ext.as_str() {
            "txt" => Ok(DocumentFormat::Txt),
            "pdf" => Ok(DocumentFormat::Pdf),
            "docx" => Ok(DocumentFormat::Docx),
            "doc" => Ok(DocumentFormat::Doc),
            _ => Err(DocumentError::UnsupportedFormat(ext)),
        }
    }
}

/// Decode file bytes into text for extraction. PDF failures degrade to a
/// placeholder block; Word formats always get one.
pub fn document_text(name: &str, bytes: &[u8]) -> Result<String, DocumentError> {
    let text = match DocumentFormat::from_file_name(name)? {
        DocumentFormat::Txt => String::from_utf8_lossy(bytes).into_owned(),
        DocumentFormat::Pdf => match pdf::extract_text(bytes) {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                warn!("PDF {} produced no text, using placeholder", name);
                pdf_placeholder(name)
            }
            Err(e) => {
                warn!("PDF text reconstruction failed for {}: {:#}", name, e);
                pdf_placeholder(name)
            }
        },
        DocumentFormat::Docx | DocumentFormat::Doc => {
            warn!("Word document {} is not decoded, using placeholder", name);
            docx_placeholder(name)
        }
    };
    Ok(text)
}

fn manual_entry_fields() -> &'static str {
    "Name: [Please enter manually]\nEmail: [Please enter manually]\nPhone: [Please enter manually]\n\nSkills: [Please enter manually]\n\nExperience: [Please enter manually]\n\nEducation: [Please enter manually]"
}

fn pdf_placeholder(name: &str) -> String {
    format!(
        "PDF Resume: {}\n\nThis is a PDF file. For full PDF parsing support, please convert to TXT or DOCX format.\n\n{}",
        name,
        manual_entry_fields()
    )
}

fn docx_placeholder(name: &str) -> String {
    format!(
        "DOCX Resume: {}\n\nThis is a DOCX file. For full DOCX parsing support, please convert to TXT format.\n\n{}",
        name,
        manual_entry_fields()
    )
}

/// Reads a résumé file and runs the text extractor over it.
#[derive(Debug, Clone, Default)]
pub struct ResumeParser {
    extractor: TextExtractor,
}

impl ResumeParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn parse_file(&self, path: &Path) -> Result<ResumeRecord, DocumentError> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        // Reject before touching the disk
        DocumentFormat::from_file_name(&name)?;

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| DocumentError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        self.parse_bytes(&name, &bytes)
    }

    pub fn parse_bytes(&self, name: &str, bytes: &[u8]) -> Result<ResumeRecord, DocumentError> {
        info!("Parsing resume {} ({} bytes)", name, bytes.len());
        let text = document_text(name, bytes)?;
        Ok(self.parse_text(&text))
    }

    /// Pasted text skips format detection.
    pub fn parse_text(&self, text: &str) -> ResumeRecord {
        self.extractor.extract(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_format_detection() {
        assert_eq!(DocumentFormat::from_file_name("cv.TXT").unwrap(), DocumentFormat::Txt);
        assert_eq!(DocumentFormat::from_file_name("cv.pdf").unwrap(), DocumentFormat::Pdf);
        assert_eq!(DocumentFormat::from_file_name("cv.doc").unwrap(), DocumentFormat::Doc);

        match DocumentFormat::from_file_name("cv.rtf") {
            Err(DocumentError::UnsupportedFormat(ext)) => assert_eq!(ext, "rtf"),
            other => panic!("expected unsupported format, got {:?}", other),
        }
        assert!(matches!(
            DocumentFormat::from_file_name("resume"),
            Err(DocumentError::MissingExtension(_))
        ));
    }

    #[test]
    fn test_docx_yields_sentinel() {
        let record = ResumeParser::new()
            .parse_bytes("cv.docx", b"PK\x03\x04 binary")
            .unwrap();
        assert!(record.is_sentinel());
    }

    #[test]
    fn test_broken_pdf_degrades_to_placeholder() {
        let text = document_text("cv.pdf", b"%PDF-1.4 truncated").unwrap();
        assert!(text.starts_with("PDF Resume: cv.pdf"));

        let record = ResumeParser::new()
            .parse_bytes("cv.pdf", b"%PDF-1.4 truncated")
            .unwrap();
        assert!(record.is_sentinel());
    }

    #[test]
    fn test_txt_is_decoded_lossily() {
        let text = document_text("cv.txt", b"Jane Doe\n\xffjane@doe.dev").unwrap();
        assert!(text.contains("jane@doe.dev"));
    }

    #[tokio::test]
    async fn test_parse_file_from_disk() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        writeln!(file, "Jane Doe\njane@doe.dev\n\nSkills\nRust, Go").unwrap();

        let record = ResumeParser::new().parse_file(file.path()).await.unwrap();
        assert_eq!(record.full_name, "Jane Doe");
        assert_eq!(record.email, "jane@doe.dev");
        assert_eq!(record.skills, vec!["Rust", "Go"]);
    }

    #[tokio::test]
    async fn test_parse_file_rejects_unsupported_before_reading() {
        let result = ResumeParser::new()
            .parse_file(Path::new("/nonexistent/cv.odt"))
            .await;
        assert!(matches!(result, Err(DocumentError::UnsupportedFormat(_))));

        let result = ResumeParser::new()
            .parse_file(Path::new("/nonexistent/cv.txt"))
            .await;
        assert!(matches!(result, Err(DocumentError::Read { .. })));
    }
}
