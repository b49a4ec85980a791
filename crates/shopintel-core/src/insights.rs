//! Record types for one storefront analysis.
//!
//! Everything here is plain structured data: the extractor builds an
//! [`InsightsRecord`] once per request and never mutates it after returning
//! it. Collections that the consumer treats as sets or keyed mappings use
//! BTree containers so serialization is deterministic for identical inputs.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A product from the store's public catalog.
///
/// `id` is the store-assigned numeric product id, kept as a string to avoid
/// precision loss; it is absent only for hero stubs discovered on the
/// homepage that could not be matched against the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    /// Storefront URL slug, e.g. `"lippie-pencil"`.
    #[serde(default)]
    pub handle: Option<String>,
    /// Body HTML stripped to plain text, truncated.
    #[serde(default)]
    pub description: Option<String>,
    /// First-variant price as a decimal string, exactly as the store
    /// returns it (e.g. `"5.00"`).
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub compare_at_price: Option<String>,
    /// ISO 4217 code when the store exposes one on a variant.
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Image URLs in gallery order.
    #[serde(default)]
    pub images: Vec<String>,
    /// First-variant availability; `false` when the store omits it.
    #[serde(default)]
    pub available: bool,
    /// Canonical product-page URL.
    #[serde(default)]
    pub url: Option<String>,
}

impl Product {
    /// A minimal product known only from a homepage link.
    #[must_use]
    pub fn stub(title: String, url: String) -> Self {
        Self {
            id: None,
            title,
            handle: None,
            description: None,
            price: None,
            compare_at_price: None,
            currency: None,
            vendor: None,
            product_type: None,
            tags: Vec::new(),
            images: Vec::new(),
            available: false,
            url: Some(url),
        }
    }
}

/// Social platforms recognized by the extractor.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SocialPlatform {
    Instagram,
    Facebook,
    Twitter,
    Tiktok,
    Youtube,
    Linkedin,
    Pinterest,
}

impl std::fmt::Display for SocialPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SocialPlatform::Instagram => "instagram",
            SocialPlatform::Facebook => "facebook",
            SocialPlatform::Twitter => "twitter",
            SocialPlatform::Tiktok => "tiktok",
            SocialPlatform::Youtube => "youtube",
            SocialPlatform::Linkedin => "linkedin",
            SocialPlatform::Pinterest => "pinterest",
        };
        write!(f, "{s}")
    }
}

/// One social presence; the normalizer keeps at most one per platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialHandle {
    pub platform: SocialPlatform,
    pub url: String,
    /// Account name extracted from the URL path, without a leading `@`.
    pub handle: String,
}

/// Contact channels collected from page text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub emails: BTreeSet<String>,
    pub phone_numbers: BTreeSet<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// A question/answer pair in page order. No dedup guarantee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faq {
    pub question: String,
    pub answer: String,
}

/// Policy page kinds probed by the extractor. A store may publish any
/// subset; absent kinds simply have no entry in the record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    Privacy,
    Returns,
    Refund,
    Terms,
    Shipping,
}

impl PolicyKind {
    /// Human-readable title used when building a [`PolicyDocument`].
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            PolicyKind::Privacy => "Privacy Policy",
            PolicyKind::Returns => "Return Policy",
            PolicyKind::Refund => "Refund Policy",
            PolicyKind::Terms => "Terms of Service",
            PolicyKind::Shipping => "Shipping Policy",
        }
    }
}

impl std::fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PolicyKind::Privacy => "privacy",
            PolicyKind::Returns => "returns",
            PolicyKind::Refund => "refund",
            PolicyKind::Terms => "terms",
            PolicyKind::Shipping => "shipping",
        };
        write!(f, "{s}")
    }
}

/// A policy page with markup stripped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDocument {
    pub title: String,
    pub content: String,
    pub url: String,
}

/// Buckets for notable navigation links.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LinkCategory {
    Tracking,
    Contact,
    Blog,
    Support,
    Other,
}

/// A navigation or footer link worth surfacing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportantLink {
    pub label: String,
    pub url: String,
    pub category: LinkCategory,
}

/// The eight extraction concerns. Used to key per-category notes and in
/// tracing output.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Catalog,
    Hero,
    Policies,
    Faqs,
    Social,
    Contact,
    About,
    Links,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Category::Catalog => "catalog",
            Category::Hero => "hero",
            Category::Policies => "policies",
            Category::Faqs => "faqs",
            Category::Social => "social",
            Category::Contact => "contact",
            Category::About => "about",
            Category::Links => "links",
        };
        write!(f, "{s}")
    }
}

/// The root aggregate for one analysis request.
///
/// Invariants upheld by the assembler:
/// - `total_products == product_catalog.len()`
/// - every hero product carrying an `id` also appears in `product_catalog`
///   (unmatched homepage products are URL/title stubs without an id)
/// - `extraction_success` is `true` iff the store passed the Shopify probe
///   and the catalog was retrieved; individual missing categories only add
///   entries to `category_notes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightsRecord {
    pub website_url: String,
    #[serde(default)]
    pub brand_name: Option<String>,
    #[serde(default)]
    pub about_brand: Option<String>,
    pub product_catalog: Vec<Product>,
    /// Subset of the catalog surfaced on the homepage, in placement order.
    pub hero_products: Vec<Product>,
    /// Sorted by platform; at most one entry per platform.
    pub social_handles: Vec<SocialHandle>,
    pub contact_info: ContactInfo,
    pub faqs: Vec<Faq>,
    pub policies: BTreeMap<PolicyKind, PolicyDocument>,
    pub important_links: Vec<ImportantLink>,
    pub total_products: usize,
    #[serde(default)]
    pub currency: Option<String>,
    pub analysis_timestamp: DateTime<Utc>,
    pub extraction_success: bool,
    /// Free-text notes for categories that came back empty or degraded,
    /// e.g. `faqs: "no FAQ page found"`.
    pub category_notes: BTreeMap<Category, String>,
}

impl InsightsRecord {
    /// An empty record for `website_url`, stamped now. The assembler fills
    /// it in during the merge phase.
    #[must_use]
    pub fn new(website_url: String) -> Self {
        Self {
            website_url,
            brand_name: None,
            about_brand: None,
            product_catalog: Vec::new(),
            hero_products: Vec::new(),
            social_handles: Vec::new(),
            contact_info: ContactInfo::default(),
            faqs: Vec::new(),
            policies: BTreeMap::new(),
            important_links: Vec::new(),
            total_products: 0,
            currency: None,
            analysis_timestamp: Utc::now(),
            extraction_success: false,
            category_notes: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
#[path = "insights_test.rs"]
mod tests;
