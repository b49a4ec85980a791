//! Notable navigation link extraction.
//!
//! Labels are matched against a small keyword table; a link is kept only
//! when its label names a concern a researcher cares about (order tracking,
//! contact, blog, support, and similar). Matching is label-driven because
//! storefront URL paths are theme-specific while visible labels are not.

use shopintel_core::{ImportantLink, LinkCategory};

use crate::fetch::PageFetch;
use crate::html::{absolutize_url, collect_anchors};
use crate::parsers::{fetch_page, CategoryOutcome};

/// Keyword table in match order; earlier rows win (e.g. "order tracking"
/// is Tracking, not Support).
const KEYWORD_CATEGORIES: &[(&[&str], LinkCategory)] = &[
    (&["track", "tracking"], LinkCategory::Tracking),
    (&["contact"], LinkCategory::Contact),
    (&["blog", "news"], LinkCategory::Blog),
    (&["support", "help", "faq"], LinkCategory::Support),
    (
        &["about", "size guide", "shipping", "returns", "careers"],
        LinkCategory::Other,
    ),
];

/// Scans homepage anchors for links whose label matches the keyword table.
pub async fn extract_important_links(
    fetcher: &dyn PageFetch,
    origin: &str,
) -> CategoryOutcome<Vec<ImportantLink>> {
    let Some(page) = fetch_page(fetcher, &format!("{origin}/")).await else {
        return CategoryOutcome::missing("home page unreachable");
    };

    let links = scan_links(&page.body, origin);
    if links.is_empty() {
        return CategoryOutcome::with_note(Vec::new(), "no notable links found on home page");
    }
    CategoryOutcome::available(links)
}

pub(crate) fn scan_links(html: &str, origin: &str) -> Vec<ImportantLink> {
    let mut seen_urls = std::collections::HashSet::new();
    let mut links = Vec::new();

    for anchor in collect_anchors(html) {
        if anchor.label.is_empty() {
            continue;
        }
        let Some(category) = categorize(&anchor.label) else {
            continue;
        };
        let Some(url) = absolutize_url(origin, &anchor.href) else {
            continue;
        };
        if !seen_urls.insert(url.clone()) {
            continue;
        }
        links.push(ImportantLink {
            label: anchor.label,
            url,
            category,
        });
    }

    links
}

fn categorize(label: &str) -> Option<LinkCategory> {
    let lower = label.to_lowercase();
    KEYWORD_CATEGORIES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, category)| *category)
}
