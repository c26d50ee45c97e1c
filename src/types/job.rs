// src/types/job.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A job posting scraped from a page. `url` and `source` are always set;
/// the other fields may be empty on partial extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobPosting {
    pub title: String,
    pub company: String,
    pub location: String,
    /// Raw HTML of the description element, or plain text.
    pub description: String,
    pub url: String,
    pub source: String,
}

impl JobPosting {
    pub fn has_title_and_company(&self) -> bool {
        !self.title.is_empty() && !self.company.is_empty()
    }

    pub fn has_any_content(&self) -> bool {
        !self.title.is_empty() || !self.company.is_empty() || !self.description.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobAnalysis {
    pub keywords: Vec<String>,
    /// At most ten entries.
    pub requirements: Vec<String>,
    /// Category tags such as `cloud` or `devops`.
    pub skills: Vec<String>,
    /// Year phrases first, then seniority words, each in order of appearance.
    pub experience: Vec<String>,
    pub industry: Industry,
    pub title: String,
    pub company: String,
    pub location: String,
    pub url: String,
    pub source: String,
    pub analyzed_at: DateTime<Utc>,
    /// Free-text commentary when the remote analysis returned prose alongside fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Industry {
    Technology,
    Finance,
    Healthcare,
    Education,
    Retail,
    #[default]
    General,
}

impl Industry {
    /// Detection precedence order; `General` is the fallthrough.
    pub const DETECTABLE: [Industry; 5] = [
        Industry::Technology,
        Industry::Finance,
        Industry::Healthcare,
        Industry::Education,
        Industry::Retail,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Industry::Technology => "technology",
            Industry::Finance => "finance",
            Industry::Healthcare => "healthcare",
            Industry::Education => "education",
            Industry::Retail => "retail",
            Industry::General => "general",
        }
    }

    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Industry::Technology => &["software", "tech", "programming", "development", "engineering"],
            Industry::Finance => &["banking", "finance", "financial", "investment", "trading"],
            Industry::Healthcare => &["health", "medical", "healthcare", "hospital", "clinic"],
            Industry::Education => &["education", "teaching", "academic", "university", "school"],
            Industry::Retail => &["retail", "sales", "customer", "commerce", "ecommerce"],
            Industry::General => &[],
        }
    }

    /// Lenient label lookup; unknown labels map to `General`.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim().to_lowercase();
        Self::DETECTABLE
            .into_iter()
            .find(|industry| label == industry.as_str() || label.contains(industry.as_str()))
            .unwrap_or(Industry::General)
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
