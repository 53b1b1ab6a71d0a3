// Resume analysis LLM prompt templates.
// Placeholders are substituted with `str::replace` before the call.

use crate::analysis::models::JobTarget;

pub const CONTENT_ANALYSIS_PROMPT: &str = r#"You are an expert resume reviewer and career coach. Analyze this resume and provide detailed feedback.

{context}

Return JSON in this exact format:
{
  "strengths": ["3-5 key strengths"],
  "improvement_suggestions": [
    {
      "category": "Content/Formatting/Keywords/Impact",
      "priority": "High/Medium/Low",
      "issue": "specific issue found",
      "suggestion": "actionable suggestion",
      "example": "optional example of improvement"
    }
  ],
  "missing_elements": ["missing important elements"],
  "overall_feedback": "2-3 sentences overall assessment"
}

Focus on:
1) Impact and quantifiable achievements
2) ATS-friendly keywords for the target role
3) Action verbs and strong language
4) Formatting and structure
5) Relevance to target position"#;

pub const SECTION_ANALYSIS_PROMPT: &str = r#"Analyze this resume section by section. Identify each major section and provide specific feedback.

Resume:
{resume_text}

Return ONLY a JSON array in this format:
[
  {
    "section_name": "Section name (e.g., Experience, Education)",
    "content": "Brief summary of what's in this section",
    "issues": ["issues in this section"],
    "suggestions": ["improvements for this section"]
  }
]"#;

pub const KEYWORD_SUGGESTION_PROMPT: &str = r#"Based on the job title/description, suggest 5-8 important keywords/skills that are missing from the resume but should be included.

{context}

Return ONLY a JSON array of strings like:
["keyword1", "keyword2", "keyword3"]"#;

pub fn build_content_prompt(resume_text: &str, target: &JobTarget) -> String {
    let mut parts = vec![format!("Resume Text:\n{resume_text}\n")];
    if let Some(job_title) = &target.job_title {
        parts.push(format!("Target Job Title: {job_title}\n"));
    }
    if let Some(job_description) = &target.job_description {
        parts.push(format!("Job Description: {job_description}\n"));
    }
    if let Some(industry) = &target.target_industry {
        parts.push(format!("Target Industry: {industry}\n"));
    }
    CONTENT_ANALYSIS_PROMPT.replace("{context}", &parts.join("\n"))
}

pub fn build_section_prompt(resume_text: &str) -> String {
    SECTION_ANALYSIS_PROMPT.replace("{resume_text}", resume_text)
}

pub fn build_keyword_prompt(
    resume_text: &str,
    job_title: &str,
    job_description: Option<&str>,
) -> String {
    let mut parts = vec![format!("Job Title: {job_title}")];
    if let Some(job_description) = job_description {
        parts.push(format!("Job Description: {job_description}"));
    }
    parts.push(format!("Current Resume:\n{resume_text}"));
    KEYWORD_SUGGESTION_PROMPT.replace("{context}", &parts.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_prompt_includes_only_supplied_context() {
        let target = JobTarget {
            job_title: Some("Backend Engineer".to_string()),
            ..Default::default()
        };
        let prompt = build_content_prompt("Rust, Tokio", &target);
        assert!(prompt.contains("Resume Text:\nRust, Tokio"));
        assert!(prompt.contains("Target Job Title: Backend Engineer"));
        assert!(!prompt.contains("Job Description:"));
        assert!(!prompt.contains("{context}"));
    }

    #[test]
    fn test_keyword_prompt_orders_job_before_resume() {
        let prompt = build_keyword_prompt("my resume", "SRE", Some("on-call, k8s"));
        let title = prompt.find("Job Title: SRE").unwrap();
        let jd = prompt.find("Job Description: on-call, k8s").unwrap();
        let resume = prompt.find("Current Resume:\nmy resume").unwrap();
        assert!(title < jd && jd < resume);
    }

    #[test]
    fn test_section_prompt_substitutes_text() {
        let prompt = build_section_prompt("EDUCATION\nMIT");
        assert!(prompt.contains("Resume:\nEDUCATION\nMIT"));
        assert!(!prompt.contains("{resume_text}"));
    }
}
