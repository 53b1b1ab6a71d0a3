//! Document text extraction.
//!
//! Each supported format has an `Extractor` that turns raw upload bytes into plain
//! text plus a list of ATS-unfriendly formatting traits. Parsing is CPU-bound and
//! must run inside `tokio::task::spawn_blocking`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod docx;
pub mod pdf;

use self::docx::DocxExtractor;
use self::pdf::PdfExtractor;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Error extracting PDF: {0}")]
    Pdf(String),

    #[error("Error extracting DOCX: {0}")]
    Docx(String),
}

/// A structural trait of the source document that degrades machine readability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormattingIssue {
    ContainsImages,
    MultiColumn,
    TextBoxes,
    ExcessTables,
    HeaderContent,
}

impl FormattingIssue {
    /// Short stable label, e.g. `multi-column`.
    pub fn label(&self) -> &'static str {
        match self {
            FormattingIssue::ContainsImages => "contains-images",
            FormattingIssue::MultiColumn => "multi-column",
            FormattingIssue::TextBoxes => "text-boxes",
            FormattingIssue::ExcessTables => "excess-tables",
            FormattingIssue::HeaderContent => "header-content",
        }
    }

    /// Human-readable explanation shown to the user.
    pub fn description(&self) -> &'static str {
        match self {
            FormattingIssue::ContainsImages => "Contains images/graphics - may not be ATS-friendly",
            FormattingIssue::MultiColumn => {
                "Possible multi-column layout detected - use single column"
            }
            FormattingIssue::TextBoxes => "Contains text boxes or embedded objects - avoid for ATS",
            FormattingIssue::ExcessTables => {
                "Multiple tables detected - simplify structure for ATS"
            }
            FormattingIssue::HeaderContent => "Important info in header - ATS may not read it",
        }
    }
}

/// Extraction result: plain text plus detected formatting issues.
#[derive(Debug, Clone)]
pub struct TextSource {
    pub text: String,
    pub formatting_issues: Vec<FormattingIssue>,
}

/// Format-specific extractor.
///
/// `detect_formatting_issues` never fails: trouble reading the document yields an
/// empty list, leaving `extract_text` to report the error.
pub trait Extractor: Send + Sync {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, ExtractionError>;
    fn detect_formatting_issues(&self, bytes: &[u8]) -> Vec<FormattingIssue>;

    /// Both halves of the contract. Extractors override this to parse the
    /// document only once.
    fn read(&self, bytes: &[u8]) -> Result<TextSource, ExtractionError> {
        let text = self.extract_text(bytes)?;
        let formatting_issues = self.detect_formatting_issues(bytes);
        Ok(TextSource {
            text,
            formatting_issues,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Maps a lowercase file extension to a parseable format.
    /// Legacy `.doc` uploads go through the DOCX reader.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "pdf" => Some(DocumentFormat::Pdf),
            "docx" | "doc" => Some(DocumentFormat::Docx),
            _ => None,
        }
    }

    pub fn extractor(&self) -> &'static dyn Extractor {
        match self {
            DocumentFormat::Pdf => &PdfExtractor,
            DocumentFormat::Docx => &DocxExtractor,
        }
    }
}

/// Returns the lowercased text after the last `.` of a filename.
/// A name without a dot yields the whole name.
pub fn file_extension(filename: &str) -> String {
    filename
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// Runs both halves of the extractor contract for one document.
pub fn extract(format: DocumentFormat, bytes: &[u8]) -> Result<TextSource, ExtractionError> {
    let source = format.extractor().read(bytes)?;
    let labels: Vec<&str> = source
        .formatting_issues
        .iter()
        .map(FormattingIssue::label)
        .collect();
    tracing::debug!(
        "Extracted {} chars from {:?} (formatting issues: [{}])",
        source.text.len(),
        format,
        labels.join(", ")
    );
    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_extension_lowercases() {
        assert_eq!(file_extension("Resume.PDF"), "pdf");
        assert_eq!(file_extension("cv.final.docx"), "docx");
    }

    #[test]
    fn test_file_extension_without_dot_is_whole_name() {
        assert_eq!(file_extension("resume"), "resume");
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(DocumentFormat::from_extension("pdf"), Some(DocumentFormat::Pdf));
        assert_eq!(DocumentFormat::from_extension("doc"), Some(DocumentFormat::Docx));
        assert_eq!(DocumentFormat::from_extension("txt"), None);
    }

    #[test]
    fn test_formatting_issue_serializes_as_label() {
        for issue in [
            FormattingIssue::ContainsImages,
            FormattingIssue::MultiColumn,
            FormattingIssue::TextBoxes,
            FormattingIssue::ExcessTables,
            FormattingIssue::HeaderContent,
        ] {
            let json = serde_json::to_string(&issue).unwrap();
            assert_eq!(json, format!("\"{}\"", issue.label()));
        }
    }

    #[test]
    fn test_extract_rejects_garbage_pdf() {
        let result = extract(DocumentFormat::Pdf, b"definitely not a pdf");
        assert!(matches!(result, Err(ExtractionError::Pdf(_))));
    }

    #[test]
    fn test_extract_rejects_garbage_docx() {
        let result = extract(DocumentFormat::Docx, b"definitely not a docx");
        assert!(matches!(result, Err(ExtractionError::Docx(_))));
    }
}
