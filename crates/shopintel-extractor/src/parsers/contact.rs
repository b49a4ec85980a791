//! Contact channel extraction.
//!
//! Email and phone patterns run over the text of the homepage and, when one
//! of the usual contact paths resolves, the contact page. Everything lands
//! in sets so repeated footer/header mentions dedupe for free. Asset
//! filenames (`logo@2x.png`) satisfy the email pattern and are filtered by
//! extension.

use std::sync::LazyLock;

use regex::Regex;
use shopintel_core::ContactInfo;

use crate::fetch::PageFetch;
use crate::html::html_to_text;
use crate::parsers::{fetch_page, first_reachable, CategoryOutcome};

const CONTACT_PATHS: &[&str] = &["/pages/contact", "/pages/contact-us", "/contact"];

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("valid email regex")
});
static MAILTO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)href\s*=\s*["']mailto:([^"'?]+)"#).expect("valid mailto regex")
});
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\+?1?[-.\s]?\(?([0-9]{3})\)?[-.\s]?([0-9]{3})[-.\s]?([0-9]{4})")
        .expect("valid phone regex")
});

const ASSET_SUFFIXES: &[&str] = &[".png", ".jpg", ".jpeg", ".gif", ".webp", ".svg"];

/// Sweeps the homepage and a contact page (if any) for emails and phone
/// numbers.
pub async fn extract_contact_info(
    fetcher: &dyn PageFetch,
    origin: &str,
) -> CategoryOutcome<ContactInfo> {
    let home = fetch_page(fetcher, &format!("{origin}/")).await;
    let contact_page = first_reachable(fetcher, origin, CONTACT_PATHS).await;

    if home.is_none() && contact_page.is_none() {
        return CategoryOutcome::missing("home and contact pages unreachable");
    }

    let mut info = ContactInfo::default();
    for page in [home, contact_page].into_iter().flatten() {
        scan_page(&page.body, &mut info);
    }

    if info.emails.is_empty() && info.phone_numbers.is_empty() {
        return CategoryOutcome::with_note(info, "no contact details found");
    }
    CategoryOutcome::available(info)
}

pub(crate) fn scan_page(html: &str, info: &mut ContactInfo) {
    // mailto: links first — they survive even when the address is rendered
    // as an image or obfuscated in the visible text.
    for cap in MAILTO_RE.captures_iter(html) {
        if let Some(address) = cap.get(1) {
            let address = address.as_str().trim();
            if EMAIL_RE.is_match(address) {
                info.emails.insert(address.to_string());
            }
        }
    }

    let text = html_to_text(html);
    for m in EMAIL_RE.find_iter(&text) {
        let address = m.as_str();
        if is_asset_filename(address) {
            continue;
        }
        info.emails.insert(address.to_string());
    }

    for cap in PHONE_RE.captures_iter(&text) {
        let digits: String = (1..=3)
            .filter_map(|i| cap.get(i))
            .map(|m| m.as_str())
            .collect();
        if digits.len() >= 7 {
            info.phone_numbers.insert(digits);
        }
    }
}

fn is_asset_filename(candidate: &str) -> bool {
    let lower = candidate.to_ascii_lowercase();
    ASSET_SUFFIXES.iter().any(|suffix| lower.ends_with(suffix))
}
