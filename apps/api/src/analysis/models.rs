use serde::{Deserialize, Serialize};

use crate::ats::scoring::AtsScore;

pub const PRIORITY_HIGH: &str = "High";
pub const PRIORITY_MEDIUM: &str = "Medium";

/// Optional targeting supplied with the upload.
#[derive(Debug, Clone, Default)]
pub struct JobTarget {
    pub job_title: Option<String>,
    pub job_description: Option<String>,
    pub target_industry: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovementSuggestion {
    pub category: String,
    /// High, Medium or Low.
    pub priority: String,
    pub issue: String,
    pub suggestion: String,
    #[serde(default)]
    pub example: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionFeedback {
    pub section_name: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub issues: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// Whole-resume review returned by the AI collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentAnalysis {
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvement_suggestions: Vec<ImprovementSuggestion>,
    #[serde(default)]
    pub missing_elements: Vec<String>,
    #[serde(default)]
    pub overall_feedback: String,
}

/// Final result returned to the client.
#[derive(Debug, Clone, Serialize)]
pub struct ResumeAnalysis {
    pub ats_score: AtsScore,
    pub sections_analysis: Vec<SectionFeedback>,
    pub improvement_suggestions: Vec<ImprovementSuggestion>,
    pub strengths: Vec<String>,
    pub missing_elements: Vec<String>,
    pub overall_feedback: String,
}
