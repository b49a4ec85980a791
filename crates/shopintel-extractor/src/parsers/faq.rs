//! FAQ extraction from help/FAQ pages.
//!
//! Two heuristics run in order against each candidate page and the first
//! one producing at least one pair wins; later heuristics never merge into
//! an earlier non-empty result. Accordion markup is checked first because
//! themes that use it also contain unrelated heading/paragraph runs that
//! the adjacency heuristic would misread.

use std::sync::LazyLock;

use regex::Regex;
use shopintel_core::Faq;

use crate::fetch::PageFetch;
use crate::html::html_to_text;
use crate::parsers::{fetch_page, CategoryOutcome};

const CANDIDATE_PATHS: &[&str] = &[
    "/pages/faq",
    "/pages/faqs",
    "/pages/frequently-asked-questions",
    "/faq",
    "/faqs",
    "/help",
];

/// Shorter questions are navigation labels; shorter answers are buttons.
const MIN_QUESTION_CHARS: usize = 6;
const MIN_ANSWER_CHARS: usize = 11;

static DETAILS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<details\b[^>]*>(.*?)</details>").expect("valid details regex"));
static SUMMARY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<summary\b[^>]*>(.*?)</summary>").expect("valid summary regex"));
static HEADING_PAIR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<h[2-5][^>]*>(.*?)</h[2-5]>\s*(?:<(?:div|section)[^>]*>\s*)*<p[^>]*>(.*?)</p>")
        .expect("valid heading pair regex")
});

/// Tries the candidate FAQ paths in order; the first page yielding pairs
/// wins.
pub async fn extract_faqs(fetcher: &dyn PageFetch, origin: &str) -> CategoryOutcome<Vec<Faq>> {
    for path in CANDIDATE_PATHS {
        let Some(page) = fetch_page(fetcher, &format!("{origin}{path}")).await else {
            continue;
        };
        let faqs = parse_faq_page(&page.body);
        if !faqs.is_empty() {
            tracing::debug!(origin, path, count = faqs.len(), "FAQ page parsed");
            return CategoryOutcome::available(faqs);
        }
    }
    CategoryOutcome::missing("no FAQ page found")
}

/// Runs the heuristics in order, stopping at the first non-empty result.
fn parse_faq_page(html: &str) -> Vec<Faq> {
    let accordion = parse_accordion(html);
    if !accordion.is_empty() {
        return accordion;
    }
    parse_heading_adjacency(html)
}

/// `<details><summary>Q</summary>A</details>` accordion markup.
fn parse_accordion(html: &str) -> Vec<Faq> {
    DETAILS_RE
        .captures_iter(html)
        .filter_map(|cap| {
            let block = cap.get(1)?.as_str();
            let summary = SUMMARY_RE.captures(block)?;
            let question = html_to_text(summary.get(1)?.as_str());
            let answer = html_to_text(&block[summary.get(0)?.end()..]);
            keep_pair(question, answer)
        })
        .collect()
}

/// A heading immediately followed by a paragraph, the plain-page layout.
fn parse_heading_adjacency(html: &str) -> Vec<Faq> {
    HEADING_PAIR_RE
        .captures_iter(html)
        .filter_map(|cap| {
            let question = html_to_text(cap.get(1)?.as_str());
            let answer = html_to_text(cap.get(2)?.as_str());
            keep_pair(question, answer)
        })
        .collect()
}

fn keep_pair(question: String, answer: String) -> Option<Faq> {
    if question.chars().count() < MIN_QUESTION_CHARS || answer.chars().count() < MIN_ANSWER_CHARS {
        return None;
    }
    Some(Faq { question, answer })
}
