// src/job/analysis.rs
//! Deterministic job-description analysis, used directly and as the
//! fallback whenever the remote analysis is unavailable

use chrono::Utc;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::debug;

use super::dom::html_to_text;
use crate::types::job::{Industry, JobAnalysis, JobPosting};

const MAX_KEYWORDS: usize = 20;
const MAX_REQUIREMENTS: usize = 10;
const MIN_REQUIREMENT_LEN: usize = 10;

static KEYWORD_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\b(?:javascript|python|java|react|angular|vue|node\.?js|typescript|sql|aws|azure|docker|kubernetes|git|agile|scrum)\b",
        r"(?i)\b(?:leadership|management|communication|analytical|problem.?solving|teamwork|collaboration)\b",
        r"(?i)\b(?:bachelor|master|phd|degree|certification|experience|years?)\b",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).expect("valid keyword regex"))
    .collect()
});

static REQUIREMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:\d+\.|•|-|requirements?)").expect("valid requirement regex")
});

static YEARS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\+?\s*years?\s*(?:of\s*)?experience").expect("valid years regex")
});

static LEVEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:entry|junior|mid|senior|lead|principal|director|manager)")
        .expect("valid level regex")
});

const SKILL_CATEGORIES: [(&str, &[&str]); 8] = [
    ("programming", &["programming", "coding", "development", "software"]),
    ("web", &["web", "frontend", "backend", "full-stack"]),
    ("mobile", &["mobile", "ios", "android", "react native"]),
    ("database", &["database", "sql", "nosql", "mongodb"]),
    ("cloud", &["cloud", "aws", "azure", "gcp"]),
    ("devops", &["devops", "docker", "kubernetes", "ci/cd"]),
    ("ai", &["machine learning", "ai", "artificial intelligence", "data science"]),
    ("management", &["project management", "agile", "scrum", "leadership"]),
];

/// Heuristic analysis of a posting's description.
pub fn analyze_posting(posting: &JobPosting) -> JobAnalysis {
    let text = html_to_text(&posting.description);

    let analysis = JobAnalysis {
        keywords: extract_keywords(&text),
        requirements: extract_requirements(&text),
        skills: extract_skill_categories(&text),
        experience: extract_experience(&text),
        industry: detect_industry(&text),
        title: posting.title.clone(),
        company: posting.company.clone(),
        location: posting.location.clone(),
        url: posting.url.clone(),
        source: posting.source.clone(),
        analyzed_at: Utc::now(),
        notes: None,
    };

    debug!(
        "Heuristic analysis: {} keywords, {} requirements, industry {}",
        analysis.keywords.len(),
        analysis.requirements.len(),
        analysis.industry
    );
    analysis
}

/// Whole-word matches, lowercased and de-duplicated in first-seen order.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();
    for re in KEYWORD_RES.iter() {
        for m in re.find_iter(text) {
            let keyword = m.as_str().to_lowercase();
            if !keywords.contains(&keyword) {
                keywords.push(keyword);
            }
        }
    }
    keywords.truncate(MAX_KEYWORDS);
    keywords
}

/// Numbered, bulleted or `Requirement`-prefixed lines longer than ten characters.
pub fn extract_requirements(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| line.chars().count() > MIN_REQUIREMENT_LEN && REQUIREMENT_RE.is_match(line))
        .take(MAX_REQUIREMENTS)
        .map(str::to_string)
        .collect()
}

/// Category tags whose vocabulary occurs anywhere in the text, substring match.
pub fn extract_skill_categories(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    SKILL_CATEGORIES
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|keyword| lower.contains(keyword)))
        .map(|(category, _)| category.to_string())
        .collect()
}

/// Year phrases first, then seniority words, each as written in the text.
pub fn extract_experience(text: &str) -> Vec<String> {
    YEARS_RE
        .find_iter(text)
        .chain(LEVEL_RE.find_iter(text))
        .map(|m| m.as_str().to_string())
        .collect()
}

pub fn detect_industry(text: &str) -> Industry {
    let lower = text.to_lowercase();
    Industry::DETECTABLE
        .into_iter()
        .find(|industry| industry.keywords().iter().any(|keyword| lower.contains(keyword)))
        .unwrap_or(Industry::General)
}

/// Read a remote structured analysis. `None` when the payload has no
/// `keywords` list, so the caller can fall back to [`analyze_posting`].
pub fn analysis_from_ai(value: &Value, posting: &JobPosting) -> Option<JobAnalysis> {
    let object = value.as_object()?;
    let keywords = string_list(object.get("keywords")?)?;

    let mut requirements = object
        .get("requirements")
        .and_then(string_list)
        .unwrap_or_default();
    requirements.truncate(MAX_REQUIREMENTS);

    let skills = match object.get("skills") {
        Some(Value::Object(groups)) => groups
            .values()
            .filter_map(string_list)
            .flatten()
            .collect(),
        Some(other) => string_list(other).unwrap_or_default(),
        None => Vec::new(),
    };

    let experience = match object.get("experience") {
        Some(Value::Object(fields)) => ["years", "level", "type"]
            .iter()
            .filter_map(|key| fields.get(*key).and_then(Value::as_str))
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
            .collect(),
        Some(other) => string_list(other).unwrap_or_default(),
        None => Vec::new(),
    };

    let industry = object
        .get("industry")
        .and_then(Value::as_str)
        .map(Industry::from_label)
        .unwrap_or_default();

    Some(JobAnalysis {
        keywords,
        requirements,
        skills,
        experience,
        industry,
        title: posting.title.clone(),
        company: posting.company.clone(),
        location: posting.location.clone(),
        url: posting.url.clone(),
        source: posting.source.clone(),
        analyzed_at: Utc::now(),
        notes: object
            .get("analysis")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

fn string_list(value: &Value) -> Option<Vec<String>> {
    let items = value.as_array()?;
    Some(
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
    )
}
