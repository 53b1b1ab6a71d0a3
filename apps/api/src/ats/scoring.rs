//! ATS score engine: deterministic, rule-based scoring of resume text.
//!
//! `compute_score` combines three sub-scores with fixed weights:
//! keyword 40%, formatting 30%, content 30%. Every function here is pure and
//! total over any input string; the caller is responsible for rejecting empty text.
//!
//! Matching is plain lowercase substring / word-boundary matching. The thresholds
//! below were tuned against that granularity, so no stemming or normalization.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::extraction::FormattingIssue;

const ACTION_VERBS: &[&str] = &[
    "achieved",
    "improved",
    "increased",
    "decreased",
    "developed",
    "led",
    "managed",
    "created",
    "implemented",
    "designed",
    "optimized",
    "streamlined",
    "coordinated",
    "executed",
];

const STANDARD_SECTIONS: &[&str] = &[
    "experience",
    "work experience",
    "professional experience",
    "education",
    "skills",
    "technical skills",
    "summary",
    "professional summary",
    "objective",
    "certifications",
    "projects",
    "achievements",
];

const STOPWORDS: &[&str] = &["the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for"];

/// Glyphs that some ATS parsers mangle.
const PROBLEMATIC_GLYPHS: &[char] = &['•', '◆', '►', '★'];

const BULLET_INDICATORS: &[char] = &['-', '•', '*'];

const KEYWORD_BASE: i32 = 50;
const ACTION_VERB_POINTS: i32 = 2;
const ACTION_VERB_CAP: i32 = 20;
const QUANTIFIED_POINTS: i32 = 3;
const QUANTIFIED_CAP: i32 = 15;
const JD_OVERLAP_POINTS: usize = 15;

const ISSUE_PENALTY: i32 = 15;
const MIN_STANDARD_SECTIONS: usize = 3;
const FEW_SECTIONS_PENALTY: i32 = 20;
const NO_EMAIL_PENALTY: i32 = 15;
const NO_PHONE_PENALTY: i32 = 10;
const GLYPH_PENALTY: i32 = 5;

const CONTENT_BASE: i32 = 60;
const MAX_FIRST_PERSON: usize = 10;

static QUANTIFIED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+%|\$\d+|\d[\d,]*\+").expect("valid quantified regex"));

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w+\b").expect("valid word regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}\b").expect("valid email regex")
});

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}").expect("valid phone regex")
});

static FIRST_PERSON_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(i|me|my|mine)\b").expect("valid pronoun regex"));

/// Four-part ATS score. All components are in `0..=100`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtsScore {
    pub overall_score: u32,
    pub keyword_score: u32,
    pub formatting_score: u32,
    pub content_score: u32,
    pub details: String,
}

/// Scores resume text against ATS heuristics.
pub fn compute_score(
    text: &str,
    formatting_issues: &[FormattingIssue],
    job_description: Option<&str>,
) -> AtsScore {
    let keyword_score = keyword_score(text, job_description);
    let formatting_score = formatting_score(text, formatting_issues);
    let content_score = content_score(text);
    let overall_score = weighted_overall(keyword_score, formatting_score, content_score);

    AtsScore {
        overall_score,
        keyword_score,
        formatting_score,
        content_score,
        details: score_details(overall_score).to_string(),
    }
}

/// round(0.4k + 0.3f + 0.3c), computed in tenths to keep .5 boundaries exact.
fn weighted_overall(keyword: u32, formatting: u32, content: u32) -> u32 {
    let tenths = keyword * 4 + formatting * 3 + content * 3;
    ((tenths + 5) / 10).min(100)
}

fn keyword_score(text: &str, job_description: Option<&str>) -> u32 {
    let lower = text.to_lowercase();
    let mut score = KEYWORD_BASE;

    let verbs_found = ACTION_VERBS.iter().filter(|verb| lower.contains(*verb)).count() as i32;
    score += (verbs_found * ACTION_VERB_POINTS).min(ACTION_VERB_CAP);

    let quantified = QUANTIFIED_RE.find_iter(text).count() as i32;
    score += (quantified * QUANTIFIED_POINTS).min(QUANTIFIED_CAP);

    if let Some(job_description) = job_description {
        score += job_overlap_bonus(&lower, job_description) as i32;
    }

    clamp_score(score)
}

/// floor(|job ∩ resume| / |job| × 15) over lowercase word tokens, stopwords
/// removed from the job side. Zero when the job side has no tokens left.
fn job_overlap_bonus(resume_lower: &str, job_description: &str) -> usize {
    let job_lower = job_description.to_lowercase();
    let mut job_tokens = word_tokens(&job_lower);
    for stopword in STOPWORDS {
        job_tokens.remove(stopword);
    }
    if job_tokens.is_empty() {
        return 0;
    }
    let resume_tokens = word_tokens(resume_lower);
    let matched = job_tokens.intersection(&resume_tokens).count();
    matched * JD_OVERLAP_POINTS / job_tokens.len()
}

fn word_tokens(lower: &str) -> HashSet<&str> {
    WORD_RE.find_iter(lower).map(|m| m.as_str()).collect()
}

fn formatting_score(text: &str, formatting_issues: &[FormattingIssue]) -> u32 {
    let mut score = 100 - ISSUE_PENALTY * formatting_issues.len() as i32;

    let lower = text.to_lowercase();
    let sections_found = STANDARD_SECTIONS
        .iter()
        .filter(|section| lower.contains(*section))
        .count();
    if sections_found < MIN_STANDARD_SECTIONS {
        score -= FEW_SECTIONS_PENALTY;
    }

    if !EMAIL_RE.is_match(text) {
        score -= NO_EMAIL_PENALTY;
    }
    if !PHONE_RE.is_match(text) {
        score -= NO_PHONE_PENALTY;
    }

    if text.contains(PROBLEMATIC_GLYPHS) {
        score -= GLYPH_PENALTY;
    }

    clamp_score(score)
}

fn content_score(text: &str) -> u32 {
    let mut score = CONTENT_BASE;

    // 400–800 words is the sweet spot.
    score += match text.split_whitespace().count() {
        400..=800 => 20,
        300..=399 | 801..=1000 => 10,
        0..=299 => -10,
        _ => 0,
    };

    if text.contains(BULLET_INDICATORS) {
        score += 10;
    }

    if FIRST_PERSON_RE.find_iter(text).count() > MAX_FIRST_PERSON {
        score -= 10;
    }

    clamp_score(score)
}

fn clamp_score(score: i32) -> u32 {
    score.clamp(0, 100) as u32
}

/// Human-readable interpretation of the overall score.
pub fn score_details(overall: u32) -> &'static str {
    if overall >= 80 {
        "Excellent! Your resume is highly ATS-optimized."
    } else if overall >= 60 {
        "Good! Your resume should pass most ATS systems with minor improvements."
    } else if overall >= 40 {
        "Fair. Your resume needs optimization to improve ATS compatibility."
    } else {
        "Poor. Your resume may be rejected by ATS. Significant improvements needed."
    }
}
