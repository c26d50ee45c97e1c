// src/extraction/entries.rs
//! Turns captured section bodies into skills and experience/education entries

use regex::Regex;
use std::sync::LazyLock;

use super::sections::is_header_keyword;
use super::text::char_len;
use crate::types::resume::{EducationEntry, ExperienceEntry};

const MAX_SKILL_LEN: usize = 50;
const MIN_DESCRIPTION_LEN: usize = 10;

const DEGREE_KEYWORDS: [&str; 7] = [
    "Bachelor",
    "Master",
    "PhD",
    "Associate",
    "Certificate",
    "Diploma",
    "Degree",
];

static SKILL_SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,;•\n\r]+").expect("valid skill split regex"));

static PIPE_SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\|\s*").expect("valid pipe split regex"));

static TITLE_SEPARATOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+(?:at|@|\||-)\s+|\|.*\|").expect("valid title separator regex")
});

static TITLE_AT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)\s+(?:at|@)\s+(.+)$").expect("valid title-at regex"));

/// Split a skills body on commas, semicolons, bullets and newlines.
///
/// Tokens naming a section keyword are dropped; short all-caps tokens
/// such as `SQL` are kept.
pub fn parse_skills(body: &[&str]) -> Vec<String> {
    let joined = body.join("\n");
    let mut skills: Vec<String> = Vec::new();

    for token in SKILL_SPLIT_RE.split(&joined) {
        let token = token.trim();
        if token.is_empty() || char_len(token) >= MAX_SKILL_LEN || is_header_keyword(token) {
            continue;
        }
        if !skills.iter().any(|existing| existing == token) {
            skills.push(token.to_string());
        }
    }

    skills
}

pub fn parse_experience(body: &[&str]) -> Vec<ExperienceEntry> {
    let mut entries = Vec::new();
    let mut current: Option<ExperienceEntry> = None;

    for line in body {
        if looks_like_job_title(line) {
            if let Some(entry) = current.take() {
                entries.push(entry);
            }
            current = Some(parse_job_title_line(line));
        } else if let Some(entry) = current.as_mut() {
            if char_len(line) > MIN_DESCRIPTION_LEN {
                entry.push_description(line);
            }
        }
    }

    entries.extend(current);
    entries
}

pub fn parse_education(body: &[&str]) -> Vec<EducationEntry> {
    let mut entries = Vec::new();
    let mut current: Option<EducationEntry> = None;

    for line in body {
        if looks_like_degree(line) {
            if let Some(entry) = current.take() {
                entries.push(entry);
            }
            current = Some(parse_degree_line(line));
        } else if let Some(entry) = current.as_mut() {
            if char_len(line) > MIN_DESCRIPTION_LEN {
                entry.push_description(line);
            }
        }
    }

    entries.extend(current);
    entries
}

/// `Title | Company | Date`, `Title at Company`, or any 11 to 99 character
/// line without an `@`. The length fallback makes most prose lines titles.
pub fn looks_like_job_title(line: &str) -> bool {
    if TITLE_SEPARATOR_RE.is_match(line) {
        return true;
    }
    let len = char_len(line);
    len > 10 && len < 100 && !line.contains('@')
}

pub fn parse_job_title_line(line: &str) -> ExperienceEntry {
    let parts = split_pipes(line);
    if parts.len() >= 2 {
        return ExperienceEntry {
            title: parts[0].to_string(),
            company: parts[1].to_string(),
            duration: parts.get(2).map(|s| s.to_string()).unwrap_or_default(),
            description: String::new(),
        };
    }

    if let Some(caps) = TITLE_AT_RE.captures(line) {
        return ExperienceEntry {
            title: caps[1].trim().to_string(),
            company: caps[2].trim().to_string(),
            ..ExperienceEntry::default()
        };
    }

    ExperienceEntry {
        title: line.to_string(),
        ..ExperienceEntry::default()
    }
}

/// Case-sensitive, so `master` in prose does not open an entry.
pub fn looks_like_degree(line: &str) -> bool {
    DEGREE_KEYWORDS.iter().any(|keyword| line.contains(keyword))
}

pub fn parse_degree_line(line: &str) -> EducationEntry {
    let parts = split_pipes(line);
    if parts.len() >= 2 {
        return EducationEntry {
            degree: parts[0].to_string(),
            school: parts[1].to_string(),
            year: parts.get(2).map(|s| s.to_string()).unwrap_or_default(),
            description: String::new(),
        };
    }

    EducationEntry {
        degree: line.to_string(),
        ..EducationEntry::default()
    }
}

fn split_pipes(line: &str) -> Vec<&str> {
    PIPE_SPLIT_RE.split(line).map(str::trim).collect()
}
