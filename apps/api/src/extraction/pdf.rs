//! PDF extraction: text via `pdf-extract`, structure checks via `lopdf`.

use lopdf::{Document, Object};
use tracing::warn;

use super::{ExtractionError, Extractor, FormattingIssue, TextSource};

/// Average line length (in chars) below which the text most likely came from
/// side-by-side columns.
const MULTI_COLUMN_LINE_THRESHOLD: f64 = 40.0;

pub struct PdfExtractor;

impl Extractor for PdfExtractor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        // pdf-extract panics on some malformed inputs instead of returning an error.
        let extracted = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes))
            .map_err(|_| ExtractionError::Pdf("PDF parser aborted on malformed input".to_string()))?;

        let text = extracted.map_err(|e| ExtractionError::Pdf(e.to_string()))?;
        Ok(text.trim().to_string())
    }

    fn detect_formatting_issues(&self, bytes: &[u8]) -> Vec<FormattingIssue> {
        let Some(document) = load_for_checks(bytes) else {
            return Vec::new();
        };
        let text = self.extract_text(bytes).unwrap_or_else(|e| {
            warn!("Skipping PDF layout check: {e}");
            String::new()
        });
        structure_issues(&document, &text)
    }

    /// Text is parsed once and reused for the layout check.
    fn read(&self, bytes: &[u8]) -> Result<TextSource, ExtractionError> {
        let text = self.extract_text(bytes)?;
        let formatting_issues = load_for_checks(bytes)
            .map(|document| structure_issues(&document, &text))
            .unwrap_or_default();
        Ok(TextSource {
            text,
            formatting_issues,
        })
    }
}

fn load_for_checks(bytes: &[u8]) -> Option<Document> {
    match Document::load_mem(bytes) {
        Ok(document) => Some(document),
        Err(e) => {
            warn!("Skipping PDF formatting checks, document did not load: {e}");
            None
        }
    }
}

fn structure_issues(document: &Document, text: &str) -> Vec<FormattingIssue> {
    let mut issues = Vec::new();
    if has_images(document) {
        issues.push(FormattingIssue::ContainsImages);
    }
    if looks_multi_column(text) {
        issues.push(FormattingIssue::MultiColumn);
    }
    issues
}

fn has_images(document: &Document) -> bool {
    document.objects.values().any(|object| match object {
        Object::Stream(stream) => stream
            .dict
            .get(b"Subtype")
            .and_then(|subtype| subtype.as_name())
            .map(|name| name == b"Image")
            .unwrap_or(false),
        _ => false,
    })
}

/// Short average line length is a cheap proxy for a multi-column layout:
/// extractors emit each column fragment as its own line.
fn looks_multi_column(text: &str) -> bool {
    if text.trim().is_empty() {
        return false;
    }
    let lines: Vec<&str> = text.split('\n').collect();
    let total_chars: usize = lines.iter().map(|line| line.chars().count()).sum();
    let average = total_chars as f64 / lines.len() as f64;
    average < MULTI_COLUMN_LINE_THRESHOLD
}

#[cfg(test)]
pub(crate) mod fixtures {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    /// Builds a one-page PDF showing `line` in Courier, optionally carrying a
    /// 1x1 grayscale image XObject in the page resources.
    pub(crate) fn build_pdf(line: &str, with_image: bool) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let mut resources = dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        };
        if with_image {
            let image_id = doc.add_object(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => 1,
                    "Height" => 1,
                    "ColorSpace" => "DeviceGray",
                    "BitsPerComponent" => 8,
                },
                vec![0u8],
            ));
            resources.set("XObject", dictionary! { "Im1" => image_id });
        }
        let resources_id = doc.add_object(resources);

        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(line)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("content should encode"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).expect("pdf fixture should save");
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::build_pdf;
    use super::*;

    #[test]
    fn test_short_lines_look_multi_column() {
        let text = "Jane Doe\nSkills\nRust\nGo\nExperience\nAcme";
        assert!(looks_multi_column(text));
    }

    #[test]
    fn test_long_lines_are_single_column() {
        let text = "Led the migration of a monolithic billing platform to event-driven services\n\
                    Reduced p99 latency by 40% across the public API by introducing caching layers";
        assert!(!looks_multi_column(text));
    }

    #[test]
    fn test_empty_text_is_not_multi_column() {
        assert!(!looks_multi_column("   "));
    }

    #[test]
    fn test_garbage_bytes_report_no_issues() {
        assert!(PdfExtractor
            .detect_formatting_issues(b"%PDF-garbage")
            .is_empty());
    }

    #[test]
    fn test_garbage_bytes_fail_extraction() {
        assert!(PdfExtractor.extract_text(b"not a pdf at all").is_err());
    }

    #[test]
    fn test_extracts_text_from_generated_pdf() {
        let bytes = build_pdf("Jane Doe Rust Engineer", false);
        let text = PdfExtractor.extract_text(&bytes).unwrap();
        assert!(text.contains("Jane"), "{text:?}");
    }

    #[test]
    fn test_image_xobject_flags_contains_images() {
        let bytes = build_pdf("Jane Doe Rust Engineer", true);
        let issues = PdfExtractor.detect_formatting_issues(&bytes);
        assert!(issues.contains(&FormattingIssue::ContainsImages), "{issues:?}");
    }

    #[test]
    fn test_text_only_pdf_has_no_image_issue() {
        let bytes = build_pdf("Jane Doe Rust Engineer", false);
        let issues = PdfExtractor.detect_formatting_issues(&bytes);
        assert!(!issues.contains(&FormattingIssue::ContainsImages));
    }

    #[test]
    fn test_read_returns_text_and_issues_together() {
        let bytes = build_pdf("Jane Doe Rust Engineer", true);
        let source = PdfExtractor.read(&bytes).unwrap();
        assert!(source.text.contains("Jane"));
        assert_eq!(
            source.formatting_issues,
            PdfExtractor.detect_formatting_issues(&bytes)
        );
    }

    #[test]
    fn test_layout_check_uses_supplied_text() {
        let document = Document::load_mem(&build_pdf("Jane", false)).unwrap();
        let single_column = "Led the migration of a monolithic billing platform to event-driven services";
        assert!(structure_issues(&document, single_column).is_empty());
        assert_eq!(
            structure_issues(&document, "Rust\nGo\nSQL"),
            vec![FormattingIssue::MultiColumn]
        );
    }
}
