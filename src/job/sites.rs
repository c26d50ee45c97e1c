// src/job/sites.rs
//! Registry of site-specific job parsers plus the generic fallback parser

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use super::dom::PageDom;
use crate::types::job::JobPosting;

struct SelectorSet {
    title: &'static [&'static str],
    company: &'static [&'static str],
    location: &'static [&'static str],
    description: &'static [&'static str],
}

const LINKEDIN: SelectorSet = SelectorSet {
    title: &[
        "h1.job-title",
        ".job-details-jobs-unified-top-card__job-title",
        "h1[data-test-id=\"job-title\"]",
        ".jobs-unified-top-card__job-title",
        "h1.job-title-text",
        "h1[data-automation-id=\"job-title\"]",
    ],
    company: &[
        ".job-details-jobs-unified-top-card__company-name",
        ".job-details-jobs-unified-top-card__company-name a",
        "[data-test-id=\"job-company-name\"]",
        ".jobs-unified-top-card__company-name",
        ".job-details-jobs-unified-top-card__company-name a span",
    ],
    location: &[
        ".job-details-jobs-unified-top-card__bullet",
        ".job-details-jobs-unified-top-card__job-location",
        "[data-test-id=\"job-location\"]",
        ".jobs-unified-top-card__bullet",
        ".job-details-jobs-unified-top-card__job-location span",
    ],
    description: &[
        ".jobs-description-content__text",
        ".jobs-box__html-content",
        ".jobs-description__content",
        ".jobs-description-content",
        "#job-details",
        ".jobs-description__text",
    ],
};

const INDEED: SelectorSet = SelectorSet {
    title: &["h1[data-testid=\"job-title\"]", ".jobsearch-JobInfoHeader-title"],
    company: &["[data-testid=\"company-name\"]", ".jobsearch-CompanyInfoContainer"],
    location: &["[data-testid=\"job-location\"]", ".jobsearch-JobInfoHeader-subtitle"],
    description: &["#jobDescriptionText", ".jobsearch-jobDescriptionText"],
};

const GLASSDOOR: SelectorSet = SelectorSet {
    title: &[".jobTitle", ".JobDetails_jobTitle__"],
    company: &[".employerName", ".JobDetails_employerName__"],
    location: &[".location", ".JobDetails_location__"],
    description: &[".jobDescriptionContent", ".JobDetails_jobDescription__"],
};

// Monster and CareerBuilder share one template
const MONSTER: SelectorSet = SelectorSet {
    title: &["h1[data-testid=\"job-title\"]", ".job-title"],
    company: &["[data-testid=\"company-name\"]", ".company-name"],
    location: &["[data-testid=\"job-location\"]", ".job-location"],
    description: &[".job-description", ".job-details"],
};

const ZIPRECRUITER: SelectorSet = SelectorSet {
    title: &["h1[data-testid=\"job-title\"]", ".job_title"],
    company: &["[data-testid=\"company-name\"]", ".company_name"],
    location: &["[data-testid=\"job-location\"]", ".job_location"],
    description: &[".job_description", ".job-details"],
};

const ANGELLIST: SelectorSet = SelectorSet {
    title: &["h1", ".job-title"],
    company: &[".company-name", ".startup-name"],
    location: &[".location", ".job-location"],
    description: &[".job-description", ".description"],
};

const STACKOVERFLOW: SelectorSet = SelectorSet {
    title: &["h1", ".job-title"],
    company: &[".company-name", ".employer-name"],
    location: &[".location", ".job-location"],
    description: &[".job-description", ".description"],
};

const GITHUB: SelectorSet = SelectorSet {
    title: &["h1", ".job-title"],
    company: &[".company-name", ".organization-name"],
    location: &[".location", ".job-location"],
    description: &[".job-description", ".description"],
};

const WORKDAY: SelectorSet = SelectorSet {
    title: &["h1[data-automation-id=\"jobTitle\"]", ".job-title", "h1"],
    company: &["[data-automation-id=\"jobCompany\"]", ".company-name", ".job-company"],
    location: &["[data-automation-id=\"jobLocation\"]", ".job-location", ".location"],
    description: &[
        "[data-automation-id=\"jobPostingDescription\"]",
        ".job-description",
        ".description",
    ],
};

const SCOTIABANK: SelectorSet = SelectorSet {
    title: &[
        "h1.job-title",
        ".job-title",
        "h1[data-testid=\"job-title\"]",
        "h1.job-header-title",
        ".job-header h1",
        "h1",
    ],
    company: &[
        ".company-name",
        ".employer-name",
        "[data-testid=\"company-name\"]",
        ".job-company",
        ".employer",
    ],
    location: &[
        ".job-location",
        ".location",
        "[data-testid=\"job-location\"]",
        ".work-location",
        ".job-address",
    ],
    description: &[
        ".job-description",
        ".job-details",
        "[data-testid=\"job-description\"]",
        ".job-content",
        ".description",
        ".job-summary",
    ],
};

const GENERIC: SelectorSet = SelectorSet {
    title: &[
        "h1",
        "h2",
        ".job-title",
        ".position-title",
        ".job-header h1",
        "[data-testid*=\"job-title\"]",
        "[data-automation-id*=\"job-title\"]",
        ".job-title-text",
        ".job-name",
        ".position-name",
    ],
    company: &[
        ".company-name",
        ".employer",
        ".company",
        ".organization",
        "[data-testid*=\"company\"]",
        "[data-automation-id*=\"company\"]",
        ".employer-name",
        ".company-title",
        ".organization-name",
    ],
    location: &[
        ".location",
        ".job-location",
        ".work-location",
        "[data-testid*=\"location\"]",
        "[data-automation-id*=\"location\"]",
        ".job-address",
        ".work-address",
        ".office-location",
    ],
    description: &[
        ".job-description",
        ".description",
        ".job-details",
        ".requirements",
        "[data-testid*=\"description\"]",
        "[data-automation-id*=\"description\"]",
        ".job-content",
        ".job-summary",
        ".position-description",
    ],
};

/// Company lookups tried when a page's own company selectors miss.
const PAGE_COMPANY_FALLBACK: [&str; 3] = [
    "[data-test-id=\"company-name\"]",
    ".job-details-jobs-unified-top-card__company-name",
    ".jobs-unified-top-card__company-name",
];

const MAIN_CONTENT: [&str; 5] = ["main", ".main", ".content", ".job-content", "#content"];

static SITE_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\s*[-|]\s*(?:LinkedIn|Indeed(?:\.com)?|Glassdoor|Monster|ZipRecruiter|CareerBuilder|AngelList|Stack ?Overflow|GitHub|Workday|Scotiabank)\s*$",
    )
    .expect("valid site suffix regex")
});

/// One tagged parser per supported job board, plus the catch-all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobSite {
    LinkedIn,
    Indeed,
    Glassdoor,
    Monster,
    ZipRecruiter,
    CareerBuilder,
    AngelList,
    StackOverflow,
    GitHub,
    Workday,
    Scotiabank,
    Generic,
}

impl JobSite {
    /// Priority order for URL matching.
    pub const KNOWN: [JobSite; 11] = [
        JobSite::LinkedIn,
        JobSite::Indeed,
        JobSite::Glassdoor,
        JobSite::Monster,
        JobSite::ZipRecruiter,
        JobSite::CareerBuilder,
        JobSite::AngelList,
        JobSite::StackOverflow,
        JobSite::GitHub,
        JobSite::Workday,
        JobSite::Scotiabank,
    ];

    /// Substring looked for in the page URL.
    pub fn host_pattern(&self) -> Option<&'static str> {
        match self {
            JobSite::LinkedIn => Some("linkedin.com"),
            JobSite::Indeed => Some("indeed.com"),
            JobSite::Glassdoor => Some("glassdoor.com"),
            JobSite::Monster => Some("monster.com"),
            JobSite::ZipRecruiter => Some("ziprecruiter.com"),
            JobSite::CareerBuilder => Some("careerbuilder.com"),
            JobSite::AngelList => Some("angel.co"),
            JobSite::StackOverflow => Some("stackoverflow.com"),
            JobSite::GitHub => Some("github.com"),
            JobSite::Workday => Some("pwc.wd3.myworkdayjobs.com"),
            JobSite::Scotiabank => Some("jobs.scotiabank.com"),
            JobSite::Generic => None,
        }
    }

    /// Value written to `JobPosting::source`.
    pub fn label(&self) -> &'static str {
        match self {
            JobSite::LinkedIn => "LinkedIn",
            JobSite::Indeed => "Indeed",
            JobSite::Glassdoor => "Glassdoor",
            JobSite::Monster => "Monster",
            JobSite::ZipRecruiter => "ZipRecruiter",
            JobSite::CareerBuilder => "CareerBuilder",
            JobSite::AngelList => "AngelList",
            JobSite::StackOverflow => "StackOverflow",
            JobSite::GitHub => "GitHub",
            JobSite::Workday => "Workday",
            JobSite::Scotiabank => "Scotiabank",
            JobSite::Generic => "Generic",
        }
    }

    pub fn for_url(url: &str) -> Option<JobSite> {
        Self::KNOWN.into_iter().find(|site| {
            site.host_pattern()
                .is_some_and(|pattern| url.contains(pattern))
        })
    }

    fn selectors(&self) -> &'static SelectorSet {
        match self {
            JobSite::LinkedIn => &LINKEDIN,
            JobSite::Indeed => &INDEED,
            JobSite::Glassdoor => &GLASSDOOR,
            JobSite::Monster | JobSite::CareerBuilder => &MONSTER,
            JobSite::ZipRecruiter => &ZIPRECRUITER,
            JobSite::AngelList => &ANGELLIST,
            JobSite::StackOverflow => &STACKOVERFLOW,
            JobSite::GitHub => &GITHUB,
            JobSite::Workday => &WORKDAY,
            JobSite::Scotiabank => &SCOTIABANK,
            JobSite::Generic => &GENERIC,
        }
    }

    /// Run this parser against a page. Known sites always return a posting,
    /// possibly with empty fields; the generic parser returns `None` when
    /// title, company and description are all empty.
    pub fn parse(&self, dom: &dyn PageDom) -> Option<JobPosting> {
        let selectors = self.selectors();
        let mut posting = JobPosting {
            title: dom.first_text(selectors.title).unwrap_or_default(),
            company: dom.first_text(selectors.company).unwrap_or_default(),
            location: dom.first_text(selectors.location).unwrap_or_default(),
            description: dom.first_html(selectors.description).unwrap_or_default(),
            url: dom.url().to_string(),
            source: self.label().to_string(),
        };

        match self {
            JobSite::LinkedIn => {
                fill_if_empty(&mut posting.title, || title_from_page(dom.title()));
                fill_if_empty(&mut posting.company, || company_from_page(dom));
            }
            JobSite::Workday => {
                fill_if_empty(&mut posting.title, || dom.title().to_string());
                fill_if_empty(&mut posting.company, || "PwC".to_string());
                fill_if_empty(&mut posting.description, || dom.body_html());
            }
            JobSite::Scotiabank => {
                fill_if_empty(&mut posting.title, || title_from_page(dom.title()));
                fill_if_empty(&mut posting.company, || company_from_url(dom.url()));
            }
            JobSite::Generic => {
                fill_if_empty(&mut posting.title, || title_from_page(dom.title()));
                fill_if_empty(&mut posting.company, || company_from_page(dom));
                fill_if_empty(&mut posting.description, || {
                    dom.first_match_html(&MAIN_CONTENT)
                        .unwrap_or_else(|| dom.body_html())
                });
                if !posting.has_any_content() {
                    debug!("Generic parser found nothing on {}", dom.url());
                    return None;
                }
            }
            _ => {}
        }

        Some(posting)
    }
}

fn fill_if_empty(field: &mut String, fallback: impl FnOnce() -> String) {
    if field.is_empty() {
        *field = fallback();
    }
}

/// Page title with a trailing job-board name removed. A title that is only
/// a board name yields an empty string.
pub fn title_from_page(page_title: &str) -> String {
    let title = page_title.trim();
    if JobSite::KNOWN
        .iter()
        .any(|site| title.eq_ignore_ascii_case(site.label()))
    {
        return String::new();
    }
    SITE_SUFFIX_RE.replace(title, "").trim().to_string()
}

fn company_from_page(dom: &dyn PageDom) -> String {
    dom.first_text(&PAGE_COMPANY_FALLBACK).unwrap_or_default()
}

fn company_from_url(url: &str) -> String {
    if url.contains("scotiabank.com") {
        "Scotiabank".to_string()
    } else if url.contains("tangerine") {
        "Tangerine".to_string()
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::dom::HtmlPage;

    #[test]
    fn test_for_url_priority() {
        assert_eq!(
            JobSite::for_url("https://www.linkedin.com/jobs/view/123"),
            Some(JobSite::LinkedIn)
        );
        assert_eq!(
            JobSite::for_url("https://pwc.wd3.myworkdayjobs.com/Global_Experienced_Careers/job/1"),
            Some(JobSite::Workday)
        );
        assert_eq!(JobSite::for_url("https://careers.acme.example/1"), None);
    }

    #[test]
    fn test_linkedin_parser() {
        let html = r#"<html><body>
            <h1 class="job-title">Staff Engineer</h1>
            <div class="job-details-jobs-unified-top-card__company-name"><a>Acme</a></div>
            <span class="job-details-jobs-unified-top-card__bullet">Remote</span>
            <div class="jobs-description-content__text"><p>Own the platform.</p></div>
        </body></html>"#;
        let page = HtmlPage::parse("https://www.linkedin.com/jobs/view/1", None, html);
        let posting = JobSite::LinkedIn.parse(&page).unwrap();

        assert_eq!(posting.source, "LinkedIn");
        assert_eq!(posting.title, "Staff Engineer");
        assert_eq!(posting.company, "Acme");
        assert_eq!(posting.location, "Remote");
        assert_eq!(posting.description, "<p>Own the platform.</p>");
        assert_eq!(posting.url, "https://www.linkedin.com/jobs/view/1");
    }

    #[test]
    fn test_linkedin_title_falls_back_to_page_title() {
        let html = r#"<html><head><title>Data Engineer - LinkedIn</title></head><body>
            <div class="jobs-unified-top-card__company-name">Globex</div></body></html>"#;
        let page = HtmlPage::parse("https://www.linkedin.com/jobs/view/2", None, html);
        let posting = JobSite::LinkedIn.parse(&page).unwrap();
        assert_eq!(posting.title, "Data Engineer");
        assert_eq!(posting.company, "Globex");
    }

    #[test]
    fn test_workday_defaults() {
        let html = "<html><head><title>Senior Associate</title></head><body><p>Join us</p></body></html>";
        let page = HtmlPage::parse("https://pwc.wd3.myworkdayjobs.com/job/1", None, html);
        let posting = JobSite::Workday.parse(&page).unwrap();
        assert_eq!(posting.title, "Senior Associate");
        assert_eq!(posting.company, "PwC");
        assert!(posting.description.contains("Join us"));
    }

    #[test]
    fn test_scotiabank_company_from_url() {
        let html = "<html><body><h1>Analyst</h1></body></html>";
        let page = HtmlPage::parse("https://jobs.scotiabank.com/job/42", None, html);
        let posting = JobSite::Scotiabank.parse(&page).unwrap();
        assert_eq!(posting.title, "Analyst");
        assert_eq!(posting.company, "Scotiabank");
    }

    #[test]
    fn test_generic_parser_fallbacks() {
        let html = r#"<html><head><title>Platform Engineer | Indeed.com</title></head>
            <body><main><p>We build tools.</p></main></body></html>"#;
        let page = HtmlPage::parse("https://careers.acme.example/1", None, html);
        let posting = JobSite::Generic.parse(&page).unwrap();
        assert_eq!(posting.source, "Generic");
        assert_eq!(posting.title, "Platform Engineer");
        assert_eq!(posting.company, "");
        assert_eq!(posting.description, "<p>We build tools.</p>");
    }

    #[test]
    fn test_generic_description_keeps_textless_main() {
        let html = r#"<html><head><title>Designer</title></head>
            <body><main><img src="team.png"></main><p>Apply below.</p></body></html>"#;
        let page = HtmlPage::parse("https://careers.acme.example/2", None, html);
        let posting = JobSite::Generic.parse(&page).unwrap();
        assert_eq!(posting.description, r#"<img src="team.png">"#);
    }

    #[test]
    fn test_generic_parser_empty_page() {
        let page = HtmlPage::parse("https://example.com", None, "");
        assert!(JobSite::Generic.parse(&page).is_none());
    }

    #[test]
    fn test_title_from_page() {
        assert_eq!(title_from_page("Designer | LinkedIn"), "Designer");
        assert_eq!(title_from_page("LinkedIn"), "");
        assert_eq!(title_from_page("Careers at Acme"), "Careers at Acme");
    }
}
