//! Policy page retrieval.
//!
//! Shopify serves canonical `/policies/...` routes for stores that publish
//! policies through the admin, but many themes link hand-written `/pages/...`
//! variants instead, so each kind probes its candidate paths in order and
//! keeps the first page with substantial text. A kind absent from every
//! candidate path produces no entry, which is a normal outcome.

use std::collections::BTreeMap;

use shopintel_core::{PolicyDocument, PolicyKind};

use crate::fetch::PageFetch;
use crate::html::{html_to_text, main_content, truncate_chars};
use crate::parsers::{fetch_page, CategoryOutcome};

/// Below this many characters a candidate page is a placeholder or a soft
/// 404, not a policy.
const MIN_CONTENT_CHARS: usize = 100;
/// Storage cap on policy text.
const MAX_CONTENT_CHARS: usize = 2000;

const CANDIDATE_PATHS: &[(PolicyKind, &[&str])] = &[
    (
        PolicyKind::Privacy,
        &["/policies/privacy-policy", "/pages/privacy-policy", "/pages/privacy", "/privacy-policy"],
    ),
    (
        PolicyKind::Returns,
        &["/pages/returns", "/pages/return-policy", "/returns"],
    ),
    (
        PolicyKind::Refund,
        &["/policies/refund-policy", "/pages/refunds", "/pages/refund-policy", "/refunds"],
    ),
    (
        PolicyKind::Terms,
        &["/policies/terms-of-service", "/pages/terms-of-service", "/pages/terms", "/terms"],
    ),
    (
        PolicyKind::Shipping,
        &["/policies/shipping-policy", "/pages/shipping-policy", "/pages/shipping", "/shipping"],
    ),
];

/// Probes the candidate paths for every policy kind.
pub async fn extract_policies(
    fetcher: &dyn PageFetch,
    origin: &str,
) -> CategoryOutcome<BTreeMap<PolicyKind, PolicyDocument>> {
    let mut policies = BTreeMap::new();
    let mut missing: Vec<PolicyKind> = Vec::new();

    for (kind, paths) in CANDIDATE_PATHS {
        match find_policy(fetcher, origin, *kind, paths).await {
            Some(document) => {
                tracing::debug!(origin, kind = %kind, url = %document.url, "policy found");
                policies.insert(*kind, document);
            }
            None => missing.push(*kind),
        }
    }

    if policies.is_empty() {
        return CategoryOutcome::missing("no policy pages found");
    }
    if missing.is_empty() {
        CategoryOutcome::available(policies)
    } else {
        let listed = missing
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        CategoryOutcome::with_note(policies, format!("no page found for: {listed}"))
    }
}

async fn find_policy(
    fetcher: &dyn PageFetch,
    origin: &str,
    kind: PolicyKind,
    paths: &[&str],
) -> Option<PolicyDocument> {
    for path in paths {
        let url = format!("{origin}{path}");
        let Some(page) = fetch_page(fetcher, &url).await else {
            continue;
        };
        if let Some(content) = substantial_text(&page.body) {
            return Some(PolicyDocument {
                title: kind.title().to_string(),
                content,
                url,
            });
        }
    }
    None
}

/// Markup-stripped page substance, or `None` when too thin to be a policy.
fn substantial_text(html: &str) -> Option<String> {
    let text = html_to_text(main_content(html));
    if text.chars().count() < MIN_CONTENT_CHARS {
        return None;
    }
    Some(truncate_chars(&text, MAX_CONTENT_CHARS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substantial_text_rejects_thin_pages() {
        assert!(substantial_text("<main><p>Coming soon.</p></main>").is_none());
    }

    #[test]
    fn substantial_text_uses_main_element() {
        let body = "policy terms ".repeat(20);
        let html = format!("<nav>Shop Bestsellers Sale</nav><main><p>{body}</p></main>");
        let text = substantial_text(&html).unwrap();
        assert!(text.starts_with("policy terms"));
        assert!(!text.contains("Bestsellers"));
    }

    #[test]
    fn substantial_text_truncates_long_policies() {
        let html = format!("<main>{}</main>", "word ".repeat(1000));
        let text = substantial_text(&html).unwrap();
        assert_eq!(text.chars().count(), MAX_CONTENT_CHARS);
    }

    #[test]
    fn every_kind_has_candidate_paths() {
        assert_eq!(CANDIDATE_PATHS.len(), 5);
        for (_, paths) in CANDIDATE_PATHS {
            assert!(!paths.is_empty());
        }
    }
}
