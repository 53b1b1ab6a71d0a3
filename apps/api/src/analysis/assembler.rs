//! Analysis assembly: merges the ATS engine's output with the AI collaborator's.

use std::collections::BTreeSet;

use tracing::info;

use crate::analysis::analyzer::ResumeAnalyzer;
use crate::analysis::models::{
    ContentAnalysis, ImprovementSuggestion, JobTarget, ResumeAnalysis, SectionFeedback,
    PRIORITY_HIGH,
};
use crate::ats::gaps::SectionLabel;
use crate::ats::scoring::AtsScore;
use crate::errors::AppError;
use crate::extraction::FormattingIssue;

/// Keyword gaps are only worth an extra model call below this keyword score.
const KEYWORD_SUGGESTION_THRESHOLD: u32 = 70;
const MAX_SUGGESTED_KEYWORDS: usize = 5;

/// Everything computed for one resume before assembly.
pub struct AnalysisParts {
    pub ats_score: AtsScore,
    pub missing_sections: BTreeSet<SectionLabel>,
    pub content: ContentAnalysis,
    pub sections: Vec<SectionFeedback>,
}

/// Builds the final `ResumeAnalysis`.
///
/// Asks the analyzer for keyword gaps only when a job title was given and the
/// keyword sub-score is below 70.
pub async fn assemble_analysis(
    analyzer: &dyn ResumeAnalyzer,
    resume_text: &str,
    formatting_issues: &[FormattingIssue],
    target: &JobTarget,
    parts: AnalysisParts,
) -> Result<ResumeAnalysis, AppError> {
    let AnalysisParts {
        ats_score,
        missing_sections,
        content,
        sections,
    } = parts;

    let mut improvement_suggestions = content.improvement_suggestions;
    improvement_suggestions.extend(formatting_suggestions(formatting_issues));

    if let Some(job_title) = keyword_gap_title(target, &ats_score) {
        let keywords = analyzer
            .suggest_keywords(resume_text, job_title, target.job_description.as_deref())
            .await?;
        info!("Keyword suggestions for '{job_title}': {} returned", keywords.len());
        if let Some(suggestion) = keyword_suggestion(&keywords) {
            improvement_suggestions.push(suggestion);
        }
    }

    Ok(ResumeAnalysis {
        ats_score,
        sections_analysis: sections,
        improvement_suggestions,
        strengths: content.strengths,
        missing_elements: merge_missing_elements(content.missing_elements, &missing_sections),
        overall_feedback: content.overall_feedback,
    })
}

fn formatting_suggestions(issues: &[FormattingIssue]) -> Vec<ImprovementSuggestion> {
    issues
        .iter()
        .map(|issue| ImprovementSuggestion {
            category: "Formatting".to_string(),
            priority: PRIORITY_HIGH.to_string(),
            issue: issue.description().to_string(),
            suggestion: "Fix this formatting issue for better ATS compatibility".to_string(),
            example: None,
        })
        .collect()
}

fn keyword_gap_title<'a>(target: &'a JobTarget, score: &AtsScore) -> Option<&'a str> {
    target
        .job_title
        .as_deref()
        .filter(|_| score.keyword_score < KEYWORD_SUGGESTION_THRESHOLD)
}

fn keyword_suggestion(keywords: &[String]) -> Option<ImprovementSuggestion> {
    if keywords.is_empty() {
        return None;
    }
    let top: Vec<&str> = keywords
        .iter()
        .take(MAX_SUGGESTED_KEYWORDS)
        .map(String::as_str)
        .collect();
    Some(ImprovementSuggestion {
        category: "Keywords".to_string(),
        priority: PRIORITY_HIGH.to_string(),
        issue: "Missing important keywords for the target role".to_string(),
        suggestion: format!("Consider adding these relevant keywords: {}", top.join(", ")),
        example: None,
    })
}

/// Set union of AI-reported elements and missing section labels, sorted.
fn merge_missing_elements(
    ai_reported: Vec<String>,
    missing_sections: &BTreeSet<SectionLabel>,
) -> Vec<String> {
    ai_reported
        .into_iter()
        .chain(missing_sections.iter().map(|label| label.to_string()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;

    /// Canned analyzer that records how often keyword suggestions were requested.
    #[derive(Default)]
    pub(crate) struct StubAnalyzer {
        pub keywords: Vec<String>,
        pub keyword_calls: AtomicUsize,
        pub offline: bool,
    }

    impl StubAnalyzer {
        pub(crate) fn with_keywords(keywords: &[&str]) -> Self {
            Self {
                keywords: keywords.iter().map(|k| k.to_string()).collect(),
                ..Default::default()
            }
        }

        /// Every connection check fails.
        pub(crate) fn offline() -> Self {
            Self {
                offline: true,
                ..Default::default()
            }
        }

        pub(crate) fn keyword_calls(&self) -> usize {
            self.keyword_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ResumeAnalyzer for StubAnalyzer {
        async fn analyze_content(
            &self,
            _resume_text: &str,
            _target: &JobTarget,
        ) -> Result<ContentAnalysis, AppError> {
            Ok(ContentAnalysis {
                strengths: vec!["Clear structure".to_string()],
                improvement_suggestions: vec![ImprovementSuggestion {
                    category: "Impact".to_string(),
                    priority: "Medium".to_string(),
                    issue: "Few metrics".to_string(),
                    suggestion: "Quantify outcomes".to_string(),
                    example: None,
                }],
                missing_elements: vec!["Skills".to_string(), "Certifications".to_string()],
                overall_feedback: "Solid foundation.".to_string(),
            })
        }

        async fn analyze_sections(
            &self,
            _resume_text: &str,
        ) -> Result<Vec<SectionFeedback>, AppError> {
            Ok(vec![SectionFeedback {
                section_name: "Experience".to_string(),
                content: "One role".to_string(),
                issues: vec![],
                suggestions: vec![],
            }])
        }

        async fn suggest_keywords(
            &self,
            _resume_text: &str,
            _job_title: &str,
            _job_description: Option<&str>,
        ) -> Result<Vec<String>, AppError> {
            self.keyword_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.keywords.clone())
        }

        async fn check_connection(&self) -> Result<(), AppError> {
            if self.offline {
                Err(AppError::Llm("connection refused".to_string()))
            } else {
                Ok(())
            }
        }
    }
}
