// src/job/dom.rs
//! Page capability handed to the job-posting extractor

use scraper::{node::Node, ElementRef, Html, Selector};

use crate::extraction::text::clean_text;

const SKIPPED_ELEMENTS: [&str; 5] = ["script", "style", "noscript", "template", "head"];

const BLOCK_ELEMENTS: [&str; 27] = [
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr",
    "li", "main", "nav", "ol", "p", "section", "ul",
];

/// First element matched by a selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementContent {
    /// Concatenated text nodes, whitespace collapsed.
    pub text: String,
    pub html: String,
}

/// What the extractor may ask of a page: its URL and title, single-element
/// selector lookups, and the body as text or markup.
pub trait PageDom {
    fn url(&self) -> &str;

    fn title(&self) -> &str;

    /// `None` for no match or an unparsable selector.
    fn query(&self, selector: &str) -> Option<ElementContent>;

    /// Visible body text with block boundaries as newlines.
    fn body_text(&self) -> String;

    fn body_html(&self) -> String;

    /// Text of the first selector whose first match has non-empty text.
    fn first_text(&self, selectors: &[&str]) -> Option<String> {
        selectors
            .iter()
            .filter_map(|selector| self.query(selector))
            .map(|element| element.text)
            .find(|text| !text.is_empty())
    }

    /// Markup of the first selector whose first match has non-empty text,
    /// falling back to its text when the markup is empty.
    fn first_html(&self, selectors: &[&str]) -> Option<String> {
        selectors
            .iter()
            .filter_map(|selector| self.query(selector))
            .find(|element| !element.text.is_empty())
            .map(|element| {
                if element.html.is_empty() {
                    element.text
                } else {
                    element.html
                }
            })
    }

    /// Markup of the first selector that matches at all, even an element with
    /// no text; its text when the markup is empty.
    fn first_match_html(&self, selectors: &[&str]) -> Option<String> {
        selectors
            .iter()
            .find_map(|selector| self.query(selector))
            .map(|element| {
                if element.html.is_empty() {
                    element.text
                } else {
                    element.html
                }
            })
    }
}

/// A parsed HTML document standing in for a live browser page.
pub struct HtmlPage {
    url: String,
    title: String,
    document: Html,
}

impl HtmlPage {
    /// `title` overrides the document's `<title>` when the host supplies one.
    pub fn parse(url: &str, title: Option<&str>, html: &str) -> Self {
        let document = Html::parse_document(html);
        let title = match title {
            Some(title) => title.trim().to_string(),
            None => Selector::parse("title")
                .ok()
                .and_then(|selector| {
                    document
                        .select(&selector)
                        .next()
                        .map(|el| clean_text(&el.text().collect::<String>()))
                })
                .unwrap_or_default(),
        };

        Self {
            url: url.to_string(),
            title,
            document,
        }
    }

    fn body(&self) -> Option<ElementRef<'_>> {
        let selector = Selector::parse("body").ok()?;
        self.document.select(&selector).next()
    }
}

impl PageDom for HtmlPage {
    fn url(&self) -> &str {
        &self.url
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn query(&self, selector: &str) -> Option<ElementContent> {
        let selector = Selector::parse(selector).ok()?;
        let element = self.document.select(&selector).next()?;
        Some(ElementContent {
            text: clean_text(&element.text().collect::<String>()),
            html: element.inner_html(),
        })
    }

    fn body_text(&self) -> String {
        self.body().map(element_text).unwrap_or_default()
    }

    fn body_html(&self) -> String {
        self.body().map(|body| body.inner_html()).unwrap_or_default()
    }
}

/// Plain text of an HTML fragment such as a stored job description.
/// Plain text input passes through with its line structure intact.
pub fn html_to_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    element_text(fragment.root_element())
}

fn element_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    collect_text(element, &mut raw);

    raw.lines()
        .map(clean_text)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                let name = el.name();
                if SKIPPED_ELEMENTS.contains(&name) {
                    continue;
                }
                if name == "br" {
                    out.push('\n');
                    continue;
                }
                let is_block = BLOCK_ELEMENTS.contains(&name);
                if is_block {
                    out.push('\n');
                }
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_text(child_element, out);
                }
                if is_block {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}
