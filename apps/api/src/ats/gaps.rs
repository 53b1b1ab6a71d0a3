use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Essential resume sections checked by `find_missing_sections`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SectionLabel {
    Experience,
    Education,
    Skills,
    Contact,
}

impl SectionLabel {
    pub const ALL: [SectionLabel; 4] = [
        SectionLabel::Experience,
        SectionLabel::Education,
        SectionLabel::Skills,
        SectionLabel::Contact,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionLabel::Experience => "Experience",
            SectionLabel::Education => "Education",
            SectionLabel::Skills => "Skills",
            SectionLabel::Contact => "Contact",
        }
    }

    /// Any one of these (lowercase substring) counts as the section being present.
    fn synonyms(&self) -> &'static [&'static str] {
        match self {
            SectionLabel::Experience => &["experience", "work experience", "employment"],
            SectionLabel::Education => &["education", "academic"],
            SectionLabel::Skills => &["skills", "technical skills", "competencies"],
            SectionLabel::Contact => &["email", "@", "phone"],
        }
    }
}

impl fmt::Display for SectionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the essential sections with no synonym anywhere in the text.
pub fn find_missing_sections(text: &str) -> BTreeSet<SectionLabel> {
    let lower = text.to_lowercase();
    SectionLabel::ALL
        .into_iter()
        .filter(|label| !label.synonyms().iter().any(|s| lower.contains(s)))
        .collect()
}
