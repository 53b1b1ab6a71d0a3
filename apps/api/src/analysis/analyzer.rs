//! AI collaborator: pluggable, trait-based resume reviewer.
//!
//! `AppState` holds an `Arc<dyn ResumeAnalyzer>`; the default backend is
//! `LlmResumeAnalyzer`. Every method is total with respect to model output:
//! when the model answers with something that is not the requested JSON shape,
//! the documented fallback below is returned instead of an error. Transport and
//! API failures still propagate as `AppError::Llm`.
//!
//! Fallback contract:
//! - `analyze_content`: `fallback_content_analysis()`
//! - `analyze_sections`: `fallback_sections()`
//! - `suggest_keywords`: empty list

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use crate::analysis::models::{
    ContentAnalysis, ImprovementSuggestion, JobTarget, SectionFeedback, PRIORITY_MEDIUM,
};
use crate::analysis::prompts::{build_content_prompt, build_keyword_prompt, build_section_prompt};
use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{CallParams, LlmClient, LlmError};

#[async_trait]
pub trait ResumeAnalyzer: Send + Sync {
    async fn analyze_content(
        &self,
        resume_text: &str,
        target: &JobTarget,
    ) -> Result<ContentAnalysis, AppError>;

    async fn analyze_sections(&self, resume_text: &str) -> Result<Vec<SectionFeedback>, AppError>;

    async fn suggest_keywords(
        &self,
        resume_text: &str,
        job_title: &str,
        job_description: Option<&str>,
    ) -> Result<Vec<String>, AppError>;

    /// Verifies the backing model is reachable.
    async fn check_connection(&self) -> Result<(), AppError>;
}

pub struct LlmResumeAnalyzer {
    llm: LlmClient,
}

impl LlmResumeAnalyzer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

const CONTENT_PARAMS: CallParams = CallParams {
    purpose: "content analysis",
    max_tokens: 2000,
    temperature: 0.7,
};

const SECTION_PARAMS: CallParams = CallParams {
    purpose: "section analysis",
    max_tokens: 1500,
    temperature: 0.7,
};

const KEYWORD_PARAMS: CallParams = CallParams {
    purpose: "keyword suggestion",
    max_tokens: 300,
    temperature: 0.4,
};

#[async_trait]
impl ResumeAnalyzer for LlmResumeAnalyzer {
    async fn analyze_content(
        &self,
        resume_text: &str,
        target: &JobTarget,
    ) -> Result<ContentAnalysis, AppError> {
        let prompt = build_content_prompt(resume_text, target);
        let result = self
            .llm
            .call_json::<ContentAnalysis>(&prompt, JSON_ONLY_SYSTEM, CONTENT_PARAMS)
            .await;
        content_or_fallback(result)
    }

    async fn analyze_sections(&self, resume_text: &str) -> Result<Vec<SectionFeedback>, AppError> {
        let prompt = build_section_prompt(resume_text);
        let result = self
            .llm
            .call_json::<Vec<SectionFeedback>>(&prompt, JSON_ONLY_SYSTEM, SECTION_PARAMS)
            .await;
        sections_or_fallback(result)
    }

    async fn suggest_keywords(
        &self,
        resume_text: &str,
        job_title: &str,
        job_description: Option<&str>,
    ) -> Result<Vec<String>, AppError> {
        let prompt = build_keyword_prompt(resume_text, job_title, job_description);
        let result = self
            .llm
            .call_json::<Vec<Value>>(&prompt, JSON_ONLY_SYSTEM, KEYWORD_PARAMS)
            .await;
        keywords_or_fallback(result)
    }

    async fn check_connection(&self) -> Result<(), AppError> {
        self.llm
            .ping()
            .await
            .map_err(|e| AppError::Llm(e.to_string()))
    }
}

pub fn fallback_content_analysis() -> ContentAnalysis {
    ContentAnalysis {
        strengths: vec!["Resume received".to_string()],
        improvement_suggestions: vec![ImprovementSuggestion {
            category: "General".to_string(),
            priority: PRIORITY_MEDIUM.to_string(),
            issue: "AI response was not valid JSON".to_string(),
            suggestion: "Try again (shorter resume text) or check model settings".to_string(),
            example: None,
        }],
        missing_elements: vec![],
        overall_feedback:
            "Analysis could not be completed due to formatting issues. Please try again."
                .to_string(),
    }
}

pub fn fallback_sections() -> Vec<SectionFeedback> {
    vec![SectionFeedback {
        section_name: "General".to_string(),
        content: "Resume content detected".to_string(),
        issues: vec!["Detailed section analysis unavailable".to_string()],
        suggestions: vec![
            "Ensure clear section headers".to_string(),
            "Use consistent formatting".to_string(),
        ],
    }]
}

fn collaborator_error(operation: &str, e: LlmError) -> AppError {
    AppError::Llm(format!("{operation} failed: {e}"))
}

fn content_or_fallback(
    result: Result<ContentAnalysis, LlmError>,
) -> Result<ContentAnalysis, AppError> {
    match result {
        Ok(analysis) => Ok(analysis),
        Err(e) if e.is_malformed_output() => {
            warn!("Content analysis output unusable, using fallback: {e}");
            Ok(fallback_content_analysis())
        }
        Err(e) => Err(collaborator_error("Content analysis", e)),
    }
}

fn sections_or_fallback(
    result: Result<Vec<SectionFeedback>, LlmError>,
) -> Result<Vec<SectionFeedback>, AppError> {
    match result {
        Ok(sections) => Ok(sections),
        Err(e) if e.is_malformed_output() => {
            warn!("Section analysis output unusable, using fallback: {e}");
            Ok(fallback_sections())
        }
        Err(e) => Err(collaborator_error("Section analysis", e)),
    }
}

/// Keeps the trimmed, non-empty string items; anything else in the array is ignored.
fn keywords_or_fallback(result: Result<Vec<Value>, LlmError>) -> Result<Vec<String>, AppError> {
    match result {
        Ok(items) => Ok(items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|keyword| !keyword.is_empty())
            .map(String::from)
            .collect()),
        Err(e) if e.is_malformed_output() => {
            warn!("Keyword suggestion output unusable, returning none: {e}");
            Ok(vec![])
        }
        Err(e) => Err(collaborator_error("Keyword suggestion", e)),
    }
}
