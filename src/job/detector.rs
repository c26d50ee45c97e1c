// src/job/detector.rs
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::dom::PageDom;
use super::sites::JobSite;
use crate::types::job::JobPosting;

pub const JOB_KEYWORDS: [&str; 13] = [
    "job",
    "career",
    "position",
    "opening",
    "employment",
    "apply now",
    "job description",
    "requirements",
    "qualifications",
    "hiring",
    "recruitment",
    "vacancy",
    "opportunity",
];

/// Which stage accepted the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionSource {
    /// A known site's parser found both title and company.
    Site,
    /// The page carries job vocabulary; the posting is whatever the generic
    /// parser could recover.
    Keywords,
    /// No job vocabulary, but the generic parser found content.
    Generic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDetection {
    pub detected: bool,
    pub posting: Option<JobPosting>,
    pub source: Option<DetectionSource>,
}

impl JobDetection {
    fn found(posting: JobPosting, source: DetectionSource) -> Self {
        Self {
            detected: true,
            posting: Some(posting),
            source: Some(source),
        }
    }

    fn not_found() -> Self {
        Self {
            detected: false,
            posting: None,
            source: None,
        }
    }
}

/// Advisory job-page check: a boolean gate with no confidence score.
pub fn detect(dom: &dyn PageDom) -> JobDetection {
    let url = dom.url();
    debug!("Detecting job posting on {} ({:?})", url, dom.title());

    if let Some(site) = JobSite::for_url(url) {
        debug!("Matched job site {}", site.label());
        if let Some(posting) = site.parse(dom) {
            if posting.has_title_and_company() {
                info!(
                    "Detected {} job: {} at {}",
                    site.label(),
                    posting.title,
                    posting.company
                );
                return JobDetection::found(posting, DetectionSource::Site);
            }
        }
        warn!("{} parser incomplete, falling back to generic parsing", site.label());
    }

    let generic = JobSite::Generic.parse(dom);

    if has_job_keywords(dom) {
        let posting = generic.unwrap_or_else(|| JobPosting {
            url: url.to_string(),
            source: JobSite::Generic.label().to_string(),
            ..JobPosting::default()
        });
        info!("Detected job page by keywords: {:?}", posting.title);
        return JobDetection::found(posting, DetectionSource::Keywords);
    }

    match generic {
        Some(posting) => {
            info!("Detected job page by generic selectors: {:?}", posting.title);
            JobDetection::found(posting, DetectionSource::Generic)
        }
        None => {
            debug!(
                "No job posting detected on {} (known job site: {}, job keywords: false)",
                url,
                is_known_job_site(url)
            );
            JobDetection::not_found()
        }
    }
}

/// Case-insensitive substring search over the title and body text.
pub fn has_job_keywords(dom: &dyn PageDom) -> bool {
    let title = dom.title().to_lowercase();
    let body = dom.body_text().to_lowercase();
    JOB_KEYWORDS
        .iter()
        .any(|keyword| title.contains(keyword) || body.contains(keyword))
}

pub fn is_known_job_site(url: &str) -> bool {
    JobSite::for_url(url).is_some()
}
