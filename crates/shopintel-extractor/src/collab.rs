//! Optional collaborator capabilities.
//!
//! The surrounding system may supply these at construction time; the core
//! pipeline never invokes them. An absent capability is a no-op: the record
//! passes through untouched.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use shopintel_core::InsightsRecord;

/// Boxed error for collaborator implementations; the core never inspects
/// it beyond logging.
pub type CollabError = Box<dyn std::error::Error + Send + Sync>;

/// Which record text an enhancer is being asked to clean up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnhanceTarget {
    AboutBrand,
    FaqAnswer,
}

/// Language-model (or other) cleanup of extracted prose.
#[async_trait]
pub trait TextEnhancer: Send + Sync {
    /// Returns a cleaned replacement for `raw`, or `None` to keep the
    /// original text.
    async fn enhance(&self, target: EnhanceTarget, raw: &str) -> Option<String>;
}

/// Persistence for finished records, keyed by [`record_key`].
#[async_trait]
pub trait InsightsStore: Send + Sync {
    /// Stores one finished record under `key`.
    ///
    /// # Errors
    ///
    /// Implementation-defined; callers treat failures as non-fatal.
    async fn store(&self, key: &str, record: &InsightsRecord) -> Result<(), CollabError>;
}

/// Runs the enhancer over the record's prose fields. Absence, or an
/// enhancer declining a field, leaves that field unchanged.
pub async fn apply_text_enhancement(
    mut record: InsightsRecord,
    enhancer: Option<&dyn TextEnhancer>,
) -> InsightsRecord {
    let Some(enhancer) = enhancer else {
        return record;
    };

    if let Some(about) = record.about_brand.as_deref() {
        if let Some(cleaned) = enhancer.enhance(EnhanceTarget::AboutBrand, about).await {
            record.about_brand = Some(cleaned);
        }
    }
    for faq in &mut record.faqs {
        if let Some(cleaned) = enhancer.enhance(EnhanceTarget::FaqAnswer, &faq.answer).await {
            faq.answer = cleaned;
        }
    }
    record
}

/// Deterministic storage key: SHA-256 over the website URL and analysis
/// timestamp.
#[must_use]
pub fn record_key(website_url: &str, timestamp: &DateTime<Utc>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(website_url.as_bytes());
    hasher.update(b"|");
    hasher.update(timestamp.to_rfc3339().as_bytes());
    format!("{:x}", hasher.finalize())
}
