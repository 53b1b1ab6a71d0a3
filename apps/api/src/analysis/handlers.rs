//! Axum route handlers for the resume analysis API.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::info;

use crate::analysis::assembler::{assemble_analysis, AnalysisParts};
use crate::analysis::models::{JobTarget, ResumeAnalysis};
use crate::ats::gaps::find_missing_sections;
use crate::ats::scoring::compute_score;
use crate::errors::AppError;
use crate::extraction::{extract, file_extension, DocumentFormat, TextSource};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub filename: String,
    pub analysis: ResumeAnalysis,
}

/// Multipart fields of one upload.
struct ResumeUpload {
    filename: String,
    content: Bytes,
    target: JobTarget,
}

/// POST /api/analyze-resume
///
/// Multipart form: `file` (PDF or DOCX), optional `job_title`, `job_description`,
/// `target_industry`. Returns the ATS score plus assembled AI feedback.
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let upload = read_upload(multipart).await?;

    let extension = file_extension(&upload.filename);
    if !state.config.allowed_extensions.contains(&extension) {
        return Err(AppError::Validation(format!(
            "Invalid file type. Allowed types: {}",
            state.config.allowed_extensions.join(", ")
        )));
    }
    let format = DocumentFormat::from_extension(&extension)
        .ok_or_else(|| AppError::Validation(format!("Unsupported file type: {extension}")))?;

    if upload.content.len() > state.config.max_file_size {
        return Err(AppError::PayloadTooLarge(format!(
            "File too large. Maximum size: {}MB",
            state.config.max_file_size / 1024 / 1024
        )));
    }

    info!(
        "Analyzing '{}' ({} bytes, {:?})",
        upload.filename,
        upload.content.len(),
        format
    );

    let content = upload.content;
    let source: TextSource = tokio::task::spawn_blocking(move || extract(format, &content))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed during extraction: {e}")))??;

    if source.text.trim().is_empty() {
        return Err(AppError::Validation(
            "Could not extract text from resume. Please ensure the file is not empty or corrupted."
                .to_string(),
        ));
    }

    let TextSource {
        text,
        formatting_issues,
    } = source;
    let target = upload.target;

    // Scoring is CPU-bound; keep it off the async executor.
    let (ats_score, missing_sections) = {
        let text = text.clone();
        let issues = formatting_issues.clone();
        let job_description = target.job_description.clone();
        tokio::task::spawn_blocking(move || {
            (
                compute_score(&text, &issues, job_description.as_deref()),
                find_missing_sections(&text),
            )
        })
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed during scoring: {e}")))?
    };

    info!(
        "ATS score for '{}': overall={} keyword={} formatting={} content={}",
        upload.filename,
        ats_score.overall_score,
        ats_score.keyword_score,
        ats_score.formatting_score,
        ats_score.content_score
    );

    let analyzer = state.analyzer.as_ref();
    let (content, sections) = tokio::try_join!(
        analyzer.analyze_content(&text, &target),
        analyzer.analyze_sections(&text)
    )?;

    let analysis = assemble_analysis(
        analyzer,
        &text,
        &formatting_issues,
        &target,
        AnalysisParts {
            ats_score,
            missing_sections,
            content,
            sections,
        },
    )
    .await?;

    Ok(Json(AnalyzeResponse {
        success: true,
        filename: upload.filename,
        analysis,
    }))
}

async fn read_upload(mut multipart: Multipart) -> Result<ResumeUpload, AppError> {
    let mut file: Option<(String, Bytes)> = None;
    let mut target = JobTarget::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                file = Some((filename, bytes));
            }
            "job_title" => target.job_title = non_blank(field.text().await.map_err(multipart_error)?),
            "job_description" => {
                target.job_description = non_blank(field.text().await.map_err(multipart_error)?)
            }
            "target_industry" => {
                target.target_industry = non_blank(field.text().await.map_err(multipart_error)?)
            }
            _ => {}
        }
    }

    let (filename, content) =
        file.ok_or_else(|| AppError::Validation("Missing 'file' form field".to_string()))?;

    Ok(ResumeUpload {
        filename,
        content,
        target,
    })
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::Validation(format!("Invalid multipart body: {}", e.body_text()))
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank_trims_and_drops_empty() {
        assert_eq!(non_blank("  SRE ".to_string()), Some("SRE".to_string()));
        assert_eq!(non_blank("   ".to_string()), None);
    }
}
