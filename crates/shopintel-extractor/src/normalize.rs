//! Record normalization.
//!
//! Pure post-processing of an assembled [`InsightsRecord`]: no I/O, no
//! failure modes. A field that matches no cleanup pattern passes through
//! unchanged.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use shopintel_core::{InsightsRecord, SocialHandle, SocialPlatform};

use crate::html::collapse_whitespace;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}$").expect("valid email regex")
});

const MIN_PHONE_DIGITS: usize = 7;
const MAX_PHONE_DIGITS: usize = 15;

/// Cleans up an assembled record: dedupes social handles by platform,
/// canonicalizes email and phone formats, trims redundant whitespace.
#[must_use]
pub fn normalize_record(mut record: InsightsRecord) -> InsightsRecord {
    record.brand_name = record
        .brand_name
        .map(|s| collapse_whitespace(&s))
        .filter(|s| !s.is_empty());
    record.about_brand = record
        .about_brand
        .map(|s| collapse_whitespace(&s))
        .filter(|s| !s.is_empty());

    record.social_handles = dedupe_social(record.social_handles);

    let emails = std::mem::take(&mut record.contact_info.emails);
    record.contact_info.emails = emails.iter().filter_map(|e| normalize_email(e)).collect();
    let phones = std::mem::take(&mut record.contact_info.phone_numbers);
    record.contact_info.phone_numbers =
        phones.iter().filter_map(|p| normalize_phone(p)).collect();
    record.contact_info.address = record
        .contact_info
        .address
        .map(|a| collapse_whitespace(&a))
        .filter(|a| !a.is_empty());

    for faq in &mut record.faqs {
        faq.question = collapse_whitespace(&faq.question);
        faq.answer = collapse_whitespace(&faq.answer);
    }
    record.faqs.retain(|f| !f.question.is_empty() && !f.answer.is_empty());

    for policy in record.policies.values_mut() {
        policy.content = collapse_whitespace(&policy.content);
    }

    for link in &mut record.important_links {
        link.label = collapse_whitespace(&link.label);
    }

    record
}

/// Keeps the first handle per platform, ordered by platform. A leading `@`
/// on the handle is an artifact of the URL form, not part of the account
/// name.
fn dedupe_social(handles: Vec<SocialHandle>) -> Vec<SocialHandle> {
    let mut by_platform: BTreeMap<SocialPlatform, SocialHandle> = BTreeMap::new();
    for mut handle in handles {
        handle.handle = handle.handle.trim_start_matches('@').to_string();
        handle.url = handle.url.trim().to_string();
        by_platform.entry(handle.platform).or_insert(handle);
    }
    by_platform.into_values().collect()
}

/// Lowercases and validates; addresses that no longer look like an email
/// after trimming are dropped.
fn normalize_email(raw: &str) -> Option<String> {
    let email = raw.trim().trim_end_matches('.').to_lowercase();
    if EMAIL_RE.is_match(&email) {
        Some(email)
    } else {
        None
    }
}

/// Reduces a phone number to digits with an optional leading `+`; numbers
/// outside 7–15 digits are discarded as pattern noise.
fn normalize_phone(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let plus = trimmed.starts_with('+');
    let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();
    if digits.len() < MIN_PHONE_DIGITS || digits.len() > MAX_PHONE_DIGITS {
        return None;
    }
    Some(if plus { format!("+{digits}") } else { digits })
}
