//! Social presence discovery.
//!
//! Anchor hrefs on the homepage are matched against known platform domain
//! patterns and the account handle is lifted from the URL path. Share and
//! embed endpoints carry the platform domain without naming the store's
//! account, so they are skipped. The same platform seen twice (header and
//! footer both carry the icon row on most themes) keeps the first
//! occurrence.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use shopintel_core::{SocialHandle, SocialPlatform};

use crate::fetch::PageFetch;
use crate::html::collect_anchors;
use crate::parsers::{fetch_page, CategoryOutcome};

static PLATFORM_PATTERNS: LazyLock<Vec<(SocialPlatform, Regex)>> = LazyLock::new(|| {
    [
        (SocialPlatform::Instagram, r"instagram\.com/([a-z0-9_.]+)"),
        (SocialPlatform::Facebook, r"facebook\.com/([a-z0-9_.\-]+)"),
        (SocialPlatform::Twitter, r"(?:twitter|x)\.com/([a-z0-9_]+)"),
        (SocialPlatform::Tiktok, r"tiktok\.com/@?([a-z0-9_.]+)"),
        (
            SocialPlatform::Youtube,
            r"youtube\.com/(?:c/|channel/|user/|@)?([a-z0-9_\-]+)",
        ),
        (
            SocialPlatform::Linkedin,
            r"linkedin\.com/(?:company/|in/)?([a-z0-9_\-]+)",
        ),
        (SocialPlatform::Pinterest, r"pinterest\.com/([a-z0-9_]+)"),
    ]
    .into_iter()
    .map(|(platform, pattern)| (platform, Regex::new(pattern).expect("valid platform regex")))
    .collect()
});

/// Path segments that name a platform feature rather than an account.
const NON_ACCOUNT_SEGMENTS: &[&str] = &[
    "sharer", "share", "intent", "plugins", "embed", "hashtag", "search", "watch", "login",
];

/// Scans homepage anchors for social platform links.
pub async fn extract_social_handles(
    fetcher: &dyn PageFetch,
    origin: &str,
) -> CategoryOutcome<Vec<SocialHandle>> {
    let Some(page) = fetch_page(fetcher, &format!("{origin}/")).await else {
        return CategoryOutcome::missing("home page unreachable");
    };

    let handles = scan_social_links(&page.body);
    if handles.is_empty() {
        return CategoryOutcome::with_note(Vec::new(), "no social links found on home page");
    }
    CategoryOutcome::available(handles)
}

/// Returns at most one handle per platform, ordered by platform.
pub(crate) fn scan_social_links(html: &str) -> Vec<SocialHandle> {
    let mut by_platform: BTreeMap<SocialPlatform, SocialHandle> = BTreeMap::new();

    for anchor in collect_anchors(html) {
        let href = anchor.href.to_ascii_lowercase();
        for (platform, pattern) in PLATFORM_PATTERNS.iter() {
            let Some(cap) = pattern.captures(&href) else {
                continue;
            };
            let handle = cap.get(1).map_or("", |m| m.as_str());
            if handle.is_empty() || NON_ACCOUNT_SEGMENTS.contains(&handle) {
                continue;
            }
            by_platform.entry(*platform).or_insert_with(|| SocialHandle {
                platform: *platform,
                url: href.clone(),
                handle: handle.to_string(),
            });
            break;
        }
    }

    by_platform.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_handle_from_path() {
        let html = r#"<a href="https://instagram.com/colourpopcosmetics">Instagram</a>"#;
        let handles = scan_social_links(html);
        assert_eq!(handles.len(), 1);
        assert_eq!(handles[0].platform, SocialPlatform::Instagram);
        assert_eq!(handles[0].handle, "colourpopcosmetics");
    }

    #[test]
    fn same_platform_in_header_and_footer_keeps_first() {
        let html = r#"
            <header><a href="https://instagram.com/colourpopcosmetics">IG</a></header>
            <footer><a href="https://www.instagram.com/colourpopcosmetics/">Instagram</a></footer>
        "#;
        let handles = scan_social_links(html);
        assert_eq!(handles.len(), 1, "one entry per platform");
        assert_eq!(handles[0].url, "https://instagram.com/colourpopcosmetics");
    }

    #[test]
    fn tiktok_at_prefix_is_stripped() {
        let html = r#"<a href="https://www.tiktok.com/@colourpop">TikTok</a>"#;
        let handles = scan_social_links(html);
        assert_eq!(handles[0].handle, "colourpop");
    }

    #[test]
    fn share_endpoints_are_skipped() {
        let html = r#"
            <a href="https://www.facebook.com/sharer/sharer.php?u=https%3A%2F%2Fexample.com">Share</a>
            <a href="https://twitter.com/intent/tweet?url=x">Tweet</a>
        "#;
        assert!(scan_social_links(html).is_empty());
    }

    #[test]
    fn multiple_platforms_sorted_by_platform() {
        let html = r#"
            <a href="https://youtube.com/c/colourpop">YouTube</a>
            <a href="https://instagram.com/colourpopcosmetics">Instagram</a>
        "#;
        let handles = scan_social_links(html);
        assert_eq!(handles.len(), 2);
        assert_eq!(handles[0].platform, SocialPlatform::Instagram);
        assert_eq!(handles[1].platform, SocialPlatform::Youtube);
    }

    #[test]
    fn x_dot_com_maps_to_twitter() {
        let html = r#"<a href="https://x.com/colourpop">X</a>"#;
        let handles = scan_social_links(html);
        assert_eq!(handles[0].platform, SocialPlatform::Twitter);
        assert_eq!(handles[0].handle, "colourpop");
    }
}
