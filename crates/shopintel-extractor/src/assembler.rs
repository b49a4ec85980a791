//! Per-request orchestration: validate → probe → concurrent category
//! fan-out → merge.
//!
//! The eight category operations are independent units of work and run
//! concurrently, bounded by `max_concurrent_categories`. Each category
//! writes a distinct slice of the record, so the merge is associative and
//! the finished record is deterministic for fixed fetched content
//! regardless of completion order. A category still running when the
//! overall deadline expires is abandoned and reported unavailable; only the
//! catalog escalates to a request-level failure.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use shopintel_core::{
    AppConfig, Category, ContactInfo, Faq, ImportantLink, InsightsRecord, PolicyDocument,
    PolicyKind, Product, SocialHandle,
};

use crate::catalog;
use crate::error::ExtractError;
use crate::fetch::{HttpFetcher, PageFetch};
use crate::normalize::normalize_record;
use crate::parsers::hero::HeroRef;
use crate::parsers::{about, contact, faq, hero, links, policy, social, CategoryOutcome};
use crate::probe;

/// Default record currency when no catalog product names one.
const DEFAULT_CURRENCY: &str = "USD";

/// Results of the eight category operations, fanned back in for the merge.
enum CategoryData {
    Catalog(CategoryOutcome<Vec<Product>>),
    Hero(CategoryOutcome<Vec<HeroRef>>),
    Policies(CategoryOutcome<BTreeMap<PolicyKind, PolicyDocument>>),
    Faqs(CategoryOutcome<Vec<Faq>>),
    Social(CategoryOutcome<Vec<SocialHandle>>),
    Contact(CategoryOutcome<ContactInfo>),
    About(CategoryOutcome<about::AboutInfo>),
    Links(CategoryOutcome<Vec<ImportantLink>>),
}

/// One analysis request's orchestrator.
///
/// Owns the injectable fetch client for the duration of the request; the
/// reqwest connection pool inside [`HttpFetcher`] is the only state shared
/// across the concurrent category operations.
pub struct StoreAnalyzer {
    fetcher: Arc<dyn PageFetch>,
    config: AppConfig,
}

impl StoreAnalyzer {
    /// Builds an analyzer with an [`HttpFetcher`] from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Http`] if the HTTP client cannot be
    /// constructed.
    pub fn new(config: AppConfig) -> Result<Self, ExtractError> {
        let fetcher = Arc::new(HttpFetcher::new(&config)?);
        Ok(Self { fetcher, config })
    }

    /// Builds an analyzer around an externally supplied fetcher. Used by
    /// tests to inject instrumented stubs.
    #[must_use]
    pub fn with_fetcher(fetcher: Arc<dyn PageFetch>, config: AppConfig) -> Self {
        Self { fetcher, config }
    }

    /// Analyzes one storefront.
    ///
    /// # Errors
    ///
    /// - [`ExtractError::InvalidUrl`] — `url` is not a usable absolute URL;
    ///   surfaced before any fetch.
    /// - [`ExtractError::NotShopify`] — the probe gate failed; no category
    ///   fetches were issued.
    /// - [`ExtractError::CatalogUnavailable`] — the product catalog could
    ///   not be retrieved at all. Any other missing category degrades to a
    ///   note on the returned record.
    pub async fn analyze(&self, url: &str) -> Result<InsightsRecord, ExtractError> {
        let origin = validate_store_url(url)?;
        let fetcher = self.fetcher.as_ref();

        if !probe::is_shopify_store(fetcher, &origin).await {
            return Err(ExtractError::NotShopify { url: origin });
        }
        tracing::debug!(origin, "probe passed; fanning out category extraction");

        let deadline = Duration::from_secs(self.config.overall_deadline_secs);
        let config = &self.config;

        type Job<'a> = futures::future::BoxFuture<'a, CategoryData>;
        let jobs: Vec<(Category, Job<'_>)> = vec![
            (
                Category::Catalog,
                Box::pin(async {
                    CategoryData::Catalog(catalog::fetch_catalog(fetcher, &origin, config).await)
                }),
            ),
            (
                Category::Hero,
                Box::pin(async {
                    CategoryData::Hero(hero::extract_hero_refs(fetcher, &origin).await)
                }),
            ),
            (
                Category::Policies,
                Box::pin(async {
                    CategoryData::Policies(policy::extract_policies(fetcher, &origin).await)
                }),
            ),
            (
                Category::Faqs,
                Box::pin(async { CategoryData::Faqs(faq::extract_faqs(fetcher, &origin).await) }),
            ),
            (
                Category::Social,
                Box::pin(async {
                    CategoryData::Social(social::extract_social_handles(fetcher, &origin).await)
                }),
            ),
            (
                Category::Contact,
                Box::pin(async {
                    CategoryData::Contact(contact::extract_contact_info(fetcher, &origin).await)
                }),
            ),
            (
                Category::About,
                Box::pin(async {
                    CategoryData::About(about::extract_about(fetcher, &origin).await)
                }),
            ),
            (
                Category::Links,
                Box::pin(async {
                    CategoryData::Links(links::extract_important_links(fetcher, &origin).await)
                }),
            ),
        ];

        let results: Vec<(Category, Option<CategoryData>)> = stream::iter(jobs)
            .map(|(category, job)| async move {
                match tokio::time::timeout(deadline, job).await {
                    Ok(data) => (category, Some(data)),
                    Err(_) => {
                        tracing::warn!(%category, "category abandoned after overall deadline");
                        (category, None)
                    }
                }
            })
            .buffer_unordered(self.config.max_concurrent_categories.max(1))
            .collect()
            .await;

        merge_record(&origin, results)
    }
}

/// Combines category outcomes into the finished record. Associative: each
/// category writes its own fields, so result order does not matter.
fn merge_record(
    origin: &str,
    results: Vec<(Category, Option<CategoryData>)>,
) -> Result<InsightsRecord, ExtractError> {
    let mut record = InsightsRecord::new(origin.to_string());
    let mut hero_refs: Vec<HeroRef> = Vec::new();
    let mut catalog_seen = false;

    for (category, data) in results {
        let Some(data) = data else {
            if category == Category::Catalog {
                return Err(ExtractError::CatalogUnavailable {
                    url: origin.to_string(),
                    reason: "abandoned after overall deadline".to_string(),
                });
            }
            record
                .category_notes
                .insert(category, "abandoned after overall deadline".to_string());
            continue;
        };

        match data {
            CategoryData::Catalog(outcome) => {
                if !outcome.available {
                    return Err(ExtractError::CatalogUnavailable {
                        url: origin.to_string(),
                        reason: outcome
                            .note
                            .unwrap_or_else(|| "catalog fetch failed".to_string()),
                    });
                }
                catalog_seen = true;
                note(&mut record, Category::Catalog, outcome.note);
                record.product_catalog = outcome.value;
            }
            CategoryData::Hero(outcome) => {
                note(&mut record, Category::Hero, outcome.note);
                hero_refs = outcome.value;
            }
            CategoryData::Policies(outcome) => {
                note(&mut record, Category::Policies, outcome.note);
                record.policies = outcome.value;
            }
            CategoryData::Faqs(outcome) => {
                note(&mut record, Category::Faqs, outcome.note);
                record.faqs = outcome.value;
            }
            CategoryData::Social(outcome) => {
                note(&mut record, Category::Social, outcome.note);
                record.social_handles = outcome.value;
            }
            CategoryData::Contact(outcome) => {
                note(&mut record, Category::Contact, outcome.note);
                record.contact_info = outcome.value;
            }
            CategoryData::About(outcome) => {
                note(&mut record, Category::About, outcome.note);
                record.brand_name = outcome.value.brand_name;
                record.about_brand = outcome.value.about_text;
            }
            CategoryData::Links(outcome) => {
                note(&mut record, Category::Links, outcome.note);
                record.important_links = outcome.value;
            }
        }
    }

    // A record without a catalog result must not escape as a success.
    if !catalog_seen {
        return Err(ExtractError::CatalogUnavailable {
            url: origin.to_string(),
            reason: "catalog category did not run".to_string(),
        });
    }

    record.hero_products = resolve_hero_products(&record.product_catalog, hero_refs);
    record.total_products = record.product_catalog.len();
    record.currency = Some(
        record
            .product_catalog
            .iter()
            .find_map(|p| p.currency.clone())
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
    );
    record.extraction_success = true;

    Ok(normalize_record(record))
}

fn note(record: &mut InsightsRecord, category: Category, note: Option<String>) {
    if let Some(note) = note {
        record.category_notes.insert(category, note);
    }
}

/// Resolves homepage product references against the catalog by handle. A
/// match carries the full catalog product; an unmatched reference stays a
/// minimal URL/title stub.
fn resolve_hero_products(catalog: &[Product], refs: Vec<HeroRef>) -> Vec<Product> {
    let by_handle: HashMap<&str, &Product> = catalog
        .iter()
        .filter_map(|p| p.handle.as_deref().map(|h| (h, p)))
        .collect();

    refs.into_iter()
        .map(|r| match by_handle.get(r.handle.as_str()) {
            Some(product) => (*product).clone(),
            None => Product::stub(r.label.unwrap_or_else(|| r.handle.clone()), r.url),
        })
        .collect()
}

/// Validates the request URL and reduces it to a scheme+host origin.
///
/// A scheme-less input like `colourpop.com` gets `https://` prepended
/// before parsing; anything that still fails to parse as an absolute
/// http(s) URL with a host is rejected.
fn validate_store_url(url: &str) -> Result<String, ExtractError> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(ExtractError::InvalidUrl {
            url: url.to_string(),
            reason: "empty URL".to_string(),
        });
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let parsed = reqwest::Url::parse(&candidate).map_err(|e| ExtractError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ExtractError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme \"{}\"", parsed.scheme()),
        });
    }
    if parsed.host_str().is_none() {
        return Err(ExtractError::InvalidUrl {
            url: url.to_string(),
            reason: "missing host".to_string(),
        });
    }

    Ok(parsed.origin().ascii_serialization())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_absolute_https_url() {
        assert_eq!(
            validate_store_url("https://colourpop.com/collections/all").unwrap(),
            "https://colourpop.com"
        );
    }

    #[test]
    fn validate_prepends_https_for_bare_host() {
        assert_eq!(
            validate_store_url("colourpop.com").unwrap(),
            "https://colourpop.com"
        );
    }

    #[test]
    fn validate_rejects_empty_and_garbage() {
        assert!(matches!(
            validate_store_url("   "),
            Err(ExtractError::InvalidUrl { .. })
        ));
        assert!(matches!(
            validate_store_url("not a url"),
            Err(ExtractError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn validate_rejects_non_http_schemes() {
        assert!(matches!(
            validate_store_url("ftp://example.com"),
            Err(ExtractError::InvalidUrl { .. })
        ));
    }

    fn catalog_product(id: &str, handle: &str, title: &str) -> Product {
        let mut p = Product::stub(
            title.to_string(),
            format!("https://example.com/products/{handle}"),
        );
        p.id = Some(id.to_string());
        p.handle = Some(handle.to_string());
        p.price = Some("5.00".to_string());
        p.available = true;
        p
    }

    #[test]
    fn hero_match_carries_full_catalog_product() {
        let catalog = vec![catalog_product("123", "lippie-pencil", "Lippie Pencil")];
        let refs = vec![HeroRef {
            handle: "lippie-pencil".to_string(),
            label: Some("Shop Lippie".to_string()),
            url: "https://example.com/products/lippie-pencil".to_string(),
        }];
        let heroes = resolve_hero_products(&catalog, refs);
        assert_eq!(heroes.len(), 1);
        assert_eq!(heroes[0].id.as_deref(), Some("123"));
        assert_eq!(heroes[0].title, "Lippie Pencil");
        assert_eq!(heroes[0].price.as_deref(), Some("5.00"));
    }

    #[test]
    fn hero_unmatched_stays_minimal_stub() {
        let heroes = resolve_hero_products(
            &[],
            vec![HeroRef {
                handle: "mystery".to_string(),
                label: None,
                url: "https://example.com/products/mystery".to_string(),
            }],
        );
        assert_eq!(heroes.len(), 1);
        assert!(heroes[0].id.is_none());
        assert_eq!(heroes[0].title, "mystery");
        assert!(heroes[0].price.is_none());
    }

    #[test]
    fn hero_order_follows_homepage_placement() {
        let catalog = vec![
            catalog_product("1", "a", "A"),
            catalog_product("2", "b", "B"),
        ];
        let refs = vec![
            HeroRef {
                handle: "b".to_string(),
                label: None,
                url: "https://example.com/products/b".to_string(),
            },
            HeroRef {
                handle: "a".to_string(),
                label: None,
                url: "https://example.com/products/a".to_string(),
            },
        ];
        let heroes = resolve_hero_products(&catalog, refs);
        assert_eq!(heroes[0].id.as_deref(), Some("2"));
        assert_eq!(heroes[1].id.as_deref(), Some("1"));
    }
}
