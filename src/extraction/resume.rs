// src/extraction/resume.rs
use tracing::{debug, warn};

use super::entries::{parse_education, parse_experience, parse_skills};
use super::fields::{extract_email, extract_linkedin, extract_name, extract_phone};
use super::sections::{section_body, Section};
use super::text::normalize_lines;
use crate::types::resume::ResumeRecord;

/// Heuristic résumé extractor. Stateless; every call is independent.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextExtractor;

impl TextExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Never fails: partial results stay partial, and a text yielding no
    /// name, email or skills produces the sentinel record.
    pub fn extract(&self, text: &str) -> ResumeRecord {
        let lines = normalize_lines(text);
        debug!("Extracting resume data from {} lines", lines.len());

        let record = ResumeRecord {
            full_name: extract_name(&lines),
            email: extract_email(text),
            phone: extract_phone(text),
            linkedin: extract_linkedin(text),
            summary: extract_summary(&lines),
            skills: section_body(&lines, Section::Skills)
                .map(|body| parse_skills(&body))
                .unwrap_or_default(),
            experience: section_body(&lines, Section::Experience)
                .map(|body| parse_experience(&body))
                .unwrap_or_default(),
            education: section_body(&lines, Section::Education)
                .map(|body| parse_education(&body))
                .unwrap_or_default(),
        };

        debug!(
            "Extracted name={:?} email={:?} skills={} experience={} education={}",
            record.full_name,
            record.email,
            record.skills.len(),
            record.experience.len(),
            record.education.len()
        );

        if !record.has_signal() {
            warn!("Limited data extracted, returning placeholder record for manual review");
            return ResumeRecord::sentinel();
        }

        record
    }
}

fn extract_summary(lines: &[&str]) -> String {
    section_body(lines, Section::Summary)
        .map(|body| body.join(" ").trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Jane Doe
jane.doe@example.com | (555) 123-4567 | linkedin.com/in/janedoe

Summary
Backend engineer focused on reliable distributed systems
who enjoys mentoring and writing documentation.

Skills
Python, SQL; React
Docker

Work Experience
Senior Engineer | Acme Corp | 2019 - 2023
Migrated the billing platform to event sourcing
Engineer at Globex
Built internal tooling for deployments

Education
Bachelor of Science | State University | 2015
";

    #[test]
    fn test_extract_full_record() {
        let record = TextExtractor::new().extract(SAMPLE);

        assert_eq!(record.full_name, "Jane Doe");
        assert_eq!(record.email, "jane.doe@example.com");
        assert_eq!(record.phone, "(555) 123-4567");
        assert_eq!(record.linkedin, "linkedin.com/in/janedoe");
        assert_eq!(
            record.summary,
            "Backend engineer focused on reliable distributed systems who enjoys mentoring and writing documentation."
        );
        assert_eq!(record.skills, vec!["Python", "SQL", "React", "Docker"]);

        // Mid-length prose lines also pass the job-title length rule
        assert_eq!(record.experience.len(), 4);
        assert_eq!(record.experience[0].title, "Senior Engineer");
        assert_eq!(record.experience[0].company, "Acme Corp");
        assert_eq!(record.experience[0].duration, "2019 - 2023");
        assert_eq!(
            record.experience[1].title,
            "Migrated the billing platform to event sourcing"
        );
        assert_eq!(record.experience[2].title, "Engineer");
        assert_eq!(record.experience[2].company, "Globex");

        assert_eq!(record.education.len(), 1);
        assert_eq!(record.education[0].degree, "Bachelor of Science");
        assert_eq!(record.education[0].year, "2015");
    }

    #[test]
    fn test_skills_stop_before_next_section() {
        let text = "SKILLS\nPython, SQL; React\nEXPERIENCE\nEngineer at Acme";
        let record = TextExtractor::new().extract(text);
        assert_eq!(record.skills, vec!["Python", "SQL", "React"]);
    }

    #[test]
    fn test_empty_input_yields_sentinel() {
        let record = TextExtractor::new().extract("");
        assert!(record.is_sentinel());
        assert!(record.skills.is_empty());
    }

    #[test]
    fn test_sentinel_replaces_partial_record() {
        // A phone alone is not enough signal
        let record = TextExtractor::new().extract("call 555-123-4567\nthanks");
        assert!(record.is_sentinel());
        assert!(record.phone.is_empty());
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let extractor = TextExtractor::new();
        assert_eq!(extractor.extract(SAMPLE), extractor.extract(SAMPLE));
    }
}
