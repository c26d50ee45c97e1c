// src/types/resume.rs
//! Structured résumé record produced by the text extractor

use serde::{Deserialize, Serialize};

/// Name placed in a record when automatic extraction found nothing usable.
pub const SENTINEL_NAME: &str = "Resume Uploaded";
pub const SENTINEL_SUMMARY: &str = "Please review and edit the extracted information below.";

/// Every field defaults to an empty string or sequence; absence is represented, not omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeRecord {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub linkedin: String,
    pub summary: String,
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    pub duration: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    pub degree: String,
    pub school: String,
    pub year: String,
    pub description: String,
}

impl ResumeRecord {
    /// Placeholder record telling the consumer that manual review is required.
    pub fn sentinel() -> Self {
        Self {
            full_name: SENTINEL_NAME.to_string(),
            summary: SENTINEL_SUMMARY.to_string(),
            ..Self::default()
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.full_name == SENTINEL_NAME && self.summary == SENTINEL_SUMMARY
    }

    /// True when at least one of name, email or skills was recovered.
    pub fn has_signal(&self) -> bool {
        !self.full_name.is_empty() || !self.email.is_empty() || !self.skills.is_empty()
    }
}

impl ExperienceEntry {
    pub fn push_description(&mut self, line: &str) {
        append_line(&mut self.description, line);
    }
}

impl EducationEntry {
    pub fn push_description(&mut self, line: &str) {
        append_line(&mut self.description, line);
    }
}

fn append_line(target: &mut String, line: &str) {
    if !target.is_empty() {
        target.push('\n');
    }
    target.push_str(line);
}
