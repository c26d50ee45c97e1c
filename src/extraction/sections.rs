// src/extraction/sections.rs
//! Section header classification and section-body capture

use super::text::char_len;

/// Vocabulary matched as a substring of the uppercased line.
pub const SECTION_KEYWORDS: [&str; 22] = [
    "PROFILE",
    "CONTACT",
    "PERSONAL INFORMATION",
    "SUMMARY",
    "OBJECTIVE",
    "PROFESSIONAL SUMMARY",
    "EXPERIENCE",
    "WORK EXPERIENCE",
    "EMPLOYMENT",
    "EDUCATION",
    "ACADEMIC BACKGROUND",
    "SKILLS",
    "TECHNICAL SKILLS",
    "CORE COMPETENCIES",
    "PROJECTS",
    "PROJECT EXPERIENCE",
    "CERTIFICATIONS",
    "LICENSES",
    "ACHIEVEMENTS",
    "AWARDS",
    "PUBLICATIONS",
    "RESEARCH",
];

const ALL_CAPS_MAX_LEN: usize = 50;
const SUMMARY_MIN_LINE_LEN: usize = 10;

/// Keyword match or a short all-caps line.
///
/// The all-caps rule also fires on short uppercase content such as a
/// company name written in capitals; that false positive is accepted.
pub fn is_section_header(line: &str) -> bool {
    is_header_keyword(line) || is_short_all_caps(line)
}

/// Keyword half of [`is_section_header`].
pub fn is_header_keyword(line: &str) -> bool {
    contains_any(&line.to_uppercase(), &SECTION_KEYWORDS)
}

fn is_short_all_caps(line: &str) -> bool {
    !line.is_empty()
        && char_len(line) < ALL_CAPS_MAX_LEN
        && line
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_whitespace())
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Summary,
    Skills,
    Experience,
    Education,
}

impl Section {
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Section::Summary => &["SUMMARY", "OBJECTIVE", "PROFESSIONAL SUMMARY", "PROFILE"],
            Section::Skills => &["SKILLS", "TECHNICAL SKILLS", "CORE COMPETENCIES", "TECHNOLOGIES"],
            Section::Experience => &[
                "EXPERIENCE",
                "WORK EXPERIENCE",
                "EMPLOYMENT",
                "PROFESSIONAL EXPERIENCE",
            ],
            Section::Education => &["EDUCATION", "ACADEMIC BACKGROUND", "ACADEMIC QUALIFICATIONS"],
        }
    }

    /// Summary capture treats a short line as a structural break.
    fn min_line_len(&self) -> Option<usize> {
        match self {
            Section::Summary => Some(SUMMARY_MIN_LINE_LEN),
            _ => None,
        }
    }

    pub fn matches_header(&self, line: &str) -> bool {
        contains_any(&line.to_uppercase(), self.keywords())
    }
}

/// Lines following the first header for `section`, up to the next section
/// boundary. `None` when no header for the section exists.
pub fn section_body<'a>(lines: &[&'a str], section: Section) -> Option<Vec<&'a str>> {
    let start = lines.iter().position(|line| section.matches_header(line))?;

    let body = lines[start + 1..]
        .iter()
        .copied()
        .take_while(|line| {
            if is_section_header(line) {
                return false;
            }
            match section.min_line_len() {
                Some(min) => char_len(line) >= min,
                None => true,
            }
        })
        .collect();

    Some(body)
}
