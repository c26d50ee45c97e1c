// src/extraction/fields.rs
//! Atomic field extractors: name, email, phone, LinkedIn handle

use regex::Regex;
use std::sync::LazyLock;

use super::sections::is_section_header;

const NAME_SCAN_LINES: usize = 5;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9_.-]+@(?:[A-Za-z0-9_-]+\.)+[A-Za-z0-9_-]{2,4}")
        .expect("email regex is valid")
});

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\+?[0-9]{1,2}[-.\s]?)?(\(?[0-9]{3}\)?[-.\s]?)?([0-9]{3}[-.\s]?[0-9]{4})")
        .expect("phone regex is valid")
});

static LINKEDIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"linkedin\.com/in/[a-zA-Z0-9_-]+").expect("linkedin regex is valid")
});

static CONTACT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@|\(?[0-9]{3}\)?[-.\s]?[0-9]{3}[-.\s]?[0-9]{4}|linkedin\.com")
        .expect("contact regex is valid")
});

fn first_match(re: &Regex, text: &str) -> String {
    re.find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

pub fn extract_email(text: &str) -> String {
    first_match(&EMAIL_RE, text)
}

pub fn extract_phone(text: &str) -> String {
    first_match(&PHONE_RE, text)
}

pub fn extract_linkedin(text: &str) -> String {
    first_match(&LINKEDIN_RE, text)
}

/// First line among the leading five that is neither a header nor contact
/// info and looks like a personal name.
pub fn extract_name(lines: &[&str]) -> String {
    lines
        .iter()
        .take(NAME_SCAN_LINES)
        .find(|line| !is_section_header(line) && !contains_contact_info(line) && looks_like_name(line))
        .map(|line| line.to_string())
        .unwrap_or_default()
}

pub fn contains_contact_info(line: &str) -> bool {
    CONTACT_RE.is_match(line)
}

/// Two to four whitespace-separated tokens made only of letters and periods.
pub fn looks_like_name(line: &str) -> bool {
    let words: Vec<&str> = line.split_whitespace().collect();
    (2..=4).contains(&words.len())
        && words
            .iter()
            .all(|word| word.chars().all(|c| c.is_ascii_alphabetic() || c == '.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_email_returns_exact_substring() {
        let text = "Jane Doe\njane.doe-smith@mail.example.com | (555) 123-4567";
        assert_eq!(extract_email(text), "jane.doe-smith@mail.example.com");
        assert_eq!(extract_email("no address here"), "");
    }

    #[test]
    fn test_extract_email_first_match_wins() {
        let text = "primary: a@b.io\nsecondary: c@d.org";
        assert_eq!(extract_email(text), "a@b.io");
    }

    #[test]
    fn test_extract_phone() {
        assert_eq!(extract_phone("Call (555) 123-4567 today"), "(555) 123-4567");
        assert_eq!(extract_phone("+1 555.123.4567"), "+1 555.123.4567");
        assert_eq!(extract_phone("ext 12"), "");
    }

    #[test]
    fn test_extract_linkedin() {
        let text = "https://www.linkedin.com/in/jane_doe-42/ and more";
        assert_eq!(extract_linkedin(text), "linkedin.com/in/jane_doe-42");
        assert_eq!(extract_linkedin("linkedin.com/company/acme"), "");
    }

    #[test]
    fn test_extract_name_skips_headers_and_contacts() {
        let lines = vec![
            "CURRICULUM VITAE",
            "jane@doe.dev",
            "Jane A. Doe",
            "Rust Engineer",
        ];
        assert_eq!(extract_name(&lines), "Jane A. Doe");
    }

    #[test]
    fn test_extract_name_only_scans_five_lines() {
        let lines = vec![
            "Objective",
            "Build things that last for years",
            "+1 555 123 4567",
            "One",
            "Toolong line with far too many words",
            "Jane Doe",
        ];
        assert_eq!(extract_name(&lines), "");
    }

    #[test]
    fn test_looks_like_name() {
        assert!(looks_like_name("Ada Lovelace"));
        assert!(looks_like_name("J. R. R. Tolkien"));
        assert!(!looks_like_name("Ada"));
        assert!(!looks_like_name("Ada King Countess Of Lovelace"));
        assert!(!looks_like_name("Ada Lovelace3"));
    }
}
