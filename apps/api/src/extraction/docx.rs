//! DOCX extraction via `docx-rs`.

use docx_rs::{
    read_docx, DocumentChild, Docx, Paragraph, ParagraphChild, RunChild, Table, TableCellContent,
    TableChild, TableRowChild,
};
use tracing::warn;

use super::{ExtractionError, Extractor, FormattingIssue, TextSource};

/// More top-level tables than this is flagged as over-structured.
const MAX_TABLES: usize = 2;

pub struct DocxExtractor;

impl Extractor for DocxExtractor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let docx = read_docx(bytes).map_err(|e| ExtractionError::Docx(e.to_string()))?;
        Ok(document_text(&docx))
    }

    fn detect_formatting_issues(&self, bytes: &[u8]) -> Vec<FormattingIssue> {
        match read_docx(bytes) {
            Ok(docx) => document_issues(&docx),
            Err(e) => {
                warn!("Skipping DOCX formatting checks, document did not load: {e}");
                Vec::new()
            }
        }
    }

    fn read(&self, bytes: &[u8]) -> Result<TextSource, ExtractionError> {
        let docx = read_docx(bytes).map_err(|e| ExtractionError::Docx(e.to_string()))?;
        Ok(TextSource {
            text: document_text(&docx),
            formatting_issues: document_issues(&docx),
        })
    }
}

/// Non-empty body paragraphs first, then non-empty table cells, newline-joined.
fn document_text(docx: &Docx) -> String {
    let mut blocks = Vec::new();
    for child in &docx.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            let text = paragraph_text(paragraph);
            if !text.trim().is_empty() {
                blocks.push(text);
            }
        }
    }
    for table in top_level_tables(docx) {
        for cell_text in table_cell_texts(table) {
            if !cell_text.trim().is_empty() {
                blocks.push(cell_text);
            }
        }
    }
    blocks.join("\n")
}

fn document_issues(docx: &Docx) -> Vec<FormattingIssue> {
    let mut issues = Vec::new();
    if has_drawings(docx) {
        issues.push(FormattingIssue::TextBoxes);
    }
    if header_has_text(docx) {
        issues.push(FormattingIssue::HeaderContent);
    }
    if top_level_tables(docx).count() > MAX_TABLES {
        issues.push(FormattingIssue::ExcessTables);
    }
    issues
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();
    for child in &paragraph.children {
        if let ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                match run_child {
                    RunChild::Text(t) => text.push_str(&t.text),
                    RunChild::Tab(_) => text.push('\t'),
                    _ => {}
                }
            }
        }
    }
    text
}

fn paragraph_has_drawing(paragraph: &Paragraph) -> bool {
    paragraph.children.iter().any(|child| match child {
        ParagraphChild::Run(run) => run
            .children
            .iter()
            .any(|c| matches!(c, RunChild::Drawing(_))),
        _ => false,
    })
}

fn top_level_tables(docx: &Docx) -> impl Iterator<Item = &Table> {
    docx.document.children.iter().filter_map(|child| match child {
        DocumentChild::Table(table) => {
            let table: &Table = table;
            Some(table)
        }
        _ => None,
    })
}

#[allow(irrefutable_let_patterns)]
fn table_paragraphs(table: &Table) -> Vec<&Paragraph> {
    let mut paragraphs: Vec<&Paragraph> = Vec::new();
    for row in &table.rows {
        let TableChild::TableRow(row) = row else {
            continue;
        };
        for cell in &row.cells {
            let TableRowChild::TableCell(cell) = cell else {
                continue;
            };
            for content in &cell.children {
                match content {
                    TableCellContent::Paragraph(p) => paragraphs.push(p),
                    TableCellContent::Table(inner) => paragraphs.extend(table_paragraphs(inner)),
                    _ => {}
                }
            }
        }
    }
    paragraphs
}

/// One string per cell, paragraphs within a cell joined by newlines.
#[allow(irrefutable_let_patterns)]
fn table_cell_texts(table: &Table) -> Vec<String> {
    let mut texts = Vec::new();
    for row in &table.rows {
        let TableChild::TableRow(row) = row else {
            continue;
        };
        for cell in &row.cells {
            let TableRowChild::TableCell(cell) = cell else {
                continue;
            };
            let parts: Vec<String> = cell
                .children
                .iter()
                .filter_map(|content| match content {
                    TableCellContent::Paragraph(p) => Some(paragraph_text(p)),
                    _ => None,
                })
                .collect();
            texts.push(parts.join("\n"));
        }
    }
    texts
}

fn has_drawings(docx: &Docx) -> bool {
    docx.document.children.iter().any(|child| match child {
        DocumentChild::Paragraph(p) => paragraph_has_drawing(p),
        DocumentChild::Table(t) => table_paragraphs(t).into_iter().any(paragraph_has_drawing),
        _ => false,
    })
}

fn header_has_text(docx: &Docx) -> bool {
    let Some((_, header)) = &docx.document.section_property.header else {
        return false;
    };
    header.children.iter().any(|child| match child {
        docx_rs::HeaderChild::Paragraph(p) => !paragraph_text(p).trim().is_empty(),
        docx_rs::HeaderChild::Table(t) => table_cell_texts(t)
            .iter()
            .any(|text| !text.trim().is_empty()),
        #[allow(unreachable_patterns)]
        _ => false,
    })
}


#[cfg(test)]
mod tests {
    use docx_rs::{Header, Pic, Run};

    use super::fixtures::{build_docx, pack};
    use super::*;

    /// 1x1 transparent PNG.
    const ONE_PIXEL_PNG: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
        0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
        0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
        0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ];

    fn text_paragraph(text: &str) -> Paragraph {
        Paragraph::new().add_run(Run::new().add_text(text))
    }

    #[test]
    fn test_extracts_paragraphs_in_order() {
        let bytes = build_docx(&["Jane Doe", "Experience", "Rust Engineer at Acme"], &[]);
        let text = DocxExtractor.extract_text(&bytes).unwrap();
        assert_eq!(text, "Jane Doe\nExperience\nRust Engineer at Acme");
    }

    #[test]
    fn test_skips_blank_paragraphs() {
        let bytes = build_docx(&["Jane Doe", "   ", "Skills"], &[]);
        let text = DocxExtractor.extract_text(&bytes).unwrap();
        assert_eq!(text, "Jane Doe\nSkills");
    }

    #[test]
    fn test_table_cells_follow_paragraphs() {
        let bytes = build_docx(&["Skills"], &["Rust, Go, SQL"]);
        let text = DocxExtractor.extract_text(&bytes).unwrap();
        assert_eq!(text, "Skills\nRust, Go, SQL");
    }

    #[test]
    fn test_plain_document_has_no_issues() {
        let bytes = build_docx(&["Experience", "Education"], &["one", "two"]);
        assert!(DocxExtractor.detect_formatting_issues(&bytes).is_empty());
    }

    #[test]
    fn test_three_tables_flag_excess_tables() {
        let bytes = build_docx(&["Experience"], &["one", "two", "three"]);
        let issues = DocxExtractor.detect_formatting_issues(&bytes);
        assert_eq!(issues, vec![FormattingIssue::ExcessTables]);
    }

    #[test]
    fn test_header_text_flags_header_content() {
        let docx = Docx::new()
            .header(Header::new().add_paragraph(text_paragraph("jane@example.com | 555-123-4567")))
            .add_paragraph(text_paragraph("Experience"));
        let issues = DocxExtractor.detect_formatting_issues(&pack(docx));
        assert_eq!(issues, vec![FormattingIssue::HeaderContent]);
    }

    #[test]
    fn test_inline_picture_flags_text_boxes() {
        let docx = Docx::new()
            .add_paragraph(text_paragraph("Jane Doe"))
            .add_paragraph(Paragraph::new().add_run(Run::new().add_image(Pic::new(ONE_PIXEL_PNG))));
        assert!(has_drawings(&docx));

        let issues = DocxExtractor.detect_formatting_issues(&pack(docx));
        assert!(issues.contains(&FormattingIssue::TextBoxes), "{issues:?}");
    }

    #[test]
    fn test_read_matches_separate_calls() {
        let bytes = build_docx(&["Skills"], &["one", "two", "three"]);
        let source = DocxExtractor.read(&bytes).unwrap();
        assert_eq!(source.text, DocxExtractor.extract_text(&bytes).unwrap());
        assert_eq!(
            source.formatting_issues,
            DocxExtractor.detect_formatting_issues(&bytes)
        );
    }

    #[test]
    fn test_unreadable_bytes_report_no_issues() {
        assert!(DocxExtractor.detect_formatting_issues(b"PK\x03\x04junk").is_empty());
    }
}
