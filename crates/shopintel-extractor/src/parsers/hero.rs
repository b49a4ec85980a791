//! Hero product discovery on the storefront homepage.
//!
//! Themes place featured products behind plain `/products/{handle}` links
//! regardless of how the surrounding section is built, so the scan keys on
//! anchor hrefs rather than section markup. Cross-referencing the
//! discovered handles against the catalog happens at merge time, keeping
//! this parser independent of the catalog fetch.

use std::sync::LazyLock;

use regex::Regex;

use crate::fetch::PageFetch;
use crate::html::{absolutize_url, collect_anchors};
use crate::parsers::{fetch_page, CategoryOutcome};

/// Homepage placements beyond this are carousels and recommendation rails,
/// not hero sections.
const MAX_HERO_PRODUCTS: usize = 10;

static PRODUCT_HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/products/([^/?#]+)").expect("valid product href regex"));

/// A product link discovered on the homepage, in placement order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeroRef {
    /// URL slug, the cross-reference key against the catalog.
    pub handle: String,
    /// Anchor text, when the link carried any.
    pub label: Option<String>,
    /// Absolute product-page URL.
    pub url: String,
}

/// Scans the homepage for product links.
///
/// Order is first occurrence in the document (homepage placement); repeated
/// links to the same handle are dropped.
pub async fn extract_hero_refs(
    fetcher: &dyn PageFetch,
    origin: &str,
) -> CategoryOutcome<Vec<HeroRef>> {
    let Some(page) = fetch_page(fetcher, &format!("{origin}/")).await else {
        return CategoryOutcome::missing("home page unreachable");
    };

    let refs = scan_product_links(&page.body, origin);
    if refs.is_empty() {
        return CategoryOutcome::with_note(Vec::new(), "no product links found on home page");
    }
    tracing::debug!(origin, count = refs.len(), "hero product links found");
    CategoryOutcome::available(refs)
}

fn scan_product_links(html: &str, origin: &str) -> Vec<HeroRef> {
    let mut seen = std::collections::HashSet::new();
    let mut refs = Vec::new();

    for anchor in collect_anchors(html) {
        let Some(handle) = PRODUCT_HREF_RE
            .captures(&anchor.href)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
        else {
            continue;
        };
        if !seen.insert(handle.clone()) {
            continue;
        }
        let Some(url) = absolutize_url(origin, &anchor.href) else {
            continue;
        };
        refs.push(HeroRef {
            handle,
            label: Some(anchor.label).filter(|l| !l.is_empty()),
            url,
        });
        if refs.len() == MAX_HERO_PRODUCTS {
            break;
        }
    }

    refs
}
