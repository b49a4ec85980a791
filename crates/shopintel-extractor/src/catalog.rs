//! Product catalog extraction from the public `products.json` endpoint.
//!
//! ## Observed shape notes
//!
//! The endpoint paginates with `?limit=N&page=M`; the final page is an
//! empty `products` array, not an error. Field presence varies widely
//! across stores: `body_html` may be `null`, `product_type` and `vendor`
//! are often empty strings, images can appear without a `src`, and older
//! themes omit `available` on variants. Every optional field therefore
//! carries `#[serde(default)]` and maps to an empty value rather than
//! failing the page.
//!
//! No reliable currency field exists on the public endpoint; when a store
//! does expose a variant-level `currency` it is honored, otherwise the
//! merge step defaults the record currency.

use serde::Deserialize;
use shopintel_core::{AppConfig, Product};

use crate::fetch::PageFetch;
use crate::html::{html_to_text, truncate_chars};
use crate::parsers::CategoryOutcome;

/// Character cap applied to product descriptions after markup stripping.
const MAX_DESCRIPTION_CHARS: usize = 500;

/// Top-level response from `GET /products.json`.
#[derive(Debug, Deserialize)]
pub struct RawProductsPage {
    pub products: Vec<RawProduct>,
}

/// A single product as returned by the storefront.
#[derive(Debug, Deserialize)]
pub struct RawProduct {
    /// Store-assigned numeric product ID (e.g., `6789012345678`).
    pub id: i64,
    pub title: String,
    /// URL slug for the product page (e.g., `"lippie-pencil"`).
    pub handle: String,
    /// Raw HTML product description. May be `null` or absent.
    #[serde(default)]
    pub body_html: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    /// May be an empty string; normalized to `None` during mapping.
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub images: Vec<RawImage>,
    #[serde(default)]
    pub variants: Vec<RawVariant>,
}

/// A product image; `src` is usually present but guarded anyway.
#[derive(Debug, Deserialize)]
pub struct RawImage {
    #[serde(default)]
    pub src: Option<String>,
}

/// A purchasable variant. Only the first variant feeds the record.
#[derive(Debug, Deserialize)]
pub struct RawVariant {
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub compare_at_price: Option<String>,
    /// Absent on some older stores; treated as not available.
    #[serde(default)]
    pub available: bool,
    /// Non-standard; a few stores expose an ISO 4217 code here.
    #[serde(default)]
    pub currency: Option<String>,
}

/// Fetches the full catalog, following `page=N` pagination until an empty
/// page or the configured page cap.
///
/// Page 1 being unreachable or unparseable makes the whole category
/// unavailable (the assembler escalates that to a request failure). A
/// failure on a later page keeps the products already collected and records
/// a note instead.
pub async fn fetch_catalog(
    fetcher: &dyn PageFetch,
    origin: &str,
    config: &AppConfig,
) -> CategoryOutcome<Vec<Product>> {
    let mut products: Vec<Product> = Vec::new();
    let mut seen_ids = std::collections::HashSet::new();
    let mut note: Option<String> = None;

    for page in 1..=config.max_catalog_pages {
        let url = format!(
            "{origin}/products.json?limit={}&page={page}",
            config.catalog_page_limit
        );

        let result = match fetcher.fetch(&url).await {
            Ok(result) => result,
            Err(err) => {
                if page == 1 {
                    return CategoryOutcome::missing(format!("products.json unreachable: {err}"));
                }
                note = Some(format!("pagination stopped at page {page}: {err}"));
                break;
            }
        };

        if !result.is_ok() {
            if page == 1 {
                return CategoryOutcome::missing(format!(
                    "products.json unreachable ({})",
                    result.status
                ));
            }
            note = Some(format!(
                "pagination stopped at page {page} ({})",
                result.status
            ));
            break;
        }

        let parsed = match serde_json::from_str::<RawProductsPage>(&result.body) {
            Ok(parsed) => parsed,
            Err(err) => {
                if page == 1 {
                    return CategoryOutcome::missing(format!(
                        "products.json is not a product listing: {err}"
                    ));
                }
                note = Some(format!("pagination stopped at page {page}: malformed body"));
                break;
            }
        };

        if parsed.products.is_empty() {
            break;
        }

        let page_len = parsed.products.len();
        for raw in parsed.products {
            // Catalog identity is the store-assigned id; duplicates across
            // page boundaries are dropped.
            if seen_ids.insert(raw.id) {
                products.push(map_product(raw, origin));
            }
        }
        tracing::debug!(origin, page, count = page_len, "catalog page parsed");

        if page == config.max_catalog_pages {
            note = Some(format!(
                "page cap reached ({}); catalog may be truncated",
                config.max_catalog_pages
            ));
        }
    }

    let mut outcome = CategoryOutcome::available(products);
    outcome.note = note;
    outcome
}

/// Maps a raw product to the record shape. Missing price and image fields
/// become empty values, never a page failure.
fn map_product(raw: RawProduct, origin: &str) -> Product {
    let first_variant = raw.variants.first();
    let description = raw
        .body_html
        .as_deref()
        .map(html_to_text)
        .map(|t| truncate_chars(&t, MAX_DESCRIPTION_CHARS))
        .filter(|t| !t.is_empty());

    Product {
        id: Some(raw.id.to_string()),
        url: Some(format!("{origin}/products/{}", raw.handle)),
        handle: Some(raw.handle),
        title: raw.title,
        description,
        price: first_variant.and_then(|v| v.price.clone()).filter(|p| !p.is_empty()),
        compare_at_price: first_variant
            .and_then(|v| v.compare_at_price.clone())
            .filter(|p| !p.is_empty()),
        currency: first_variant
            .and_then(|v| v.currency.clone())
            .filter(|c| !c.is_empty()),
        vendor: raw.vendor.filter(|v| !v.is_empty()),
        product_type: raw.product_type.filter(|t| !t.is_empty()),
        tags: raw.tags,
        images: raw
            .images
            .into_iter()
            .filter_map(|img| img.src)
            .filter(|src| !src.is_empty())
            .collect(),
        available: first_variant.is_some_and(|v| v.available),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_product_json(id: i64, handle: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "title": "Lippie Pencil",
            "handle": handle,
            "body_html": "<p>A long-wearing lip pencil.</p>",
            "vendor": "ColourPop",
            "product_type": "Lip Liner",
            "tags": ["lips"],
            "images": [{"src": "https://cdn.example.com/lippie.jpg"}],
            "variants": [{
                "price": "5.00",
                "compare_at_price": null,
                "available": true
            }]
        })
    }

    #[test]
    fn maps_full_product() {
        let raw: RawProduct = serde_json::from_value(raw_product_json(123, "lippie-pencil")).unwrap();
        let product = map_product(raw, "https://example.com");
        assert_eq!(product.id.as_deref(), Some("123"));
        assert_eq!(product.title, "Lippie Pencil");
        assert_eq!(product.handle.as_deref(), Some("lippie-pencil"));
        assert_eq!(product.price.as_deref(), Some("5.00"));
        assert_eq!(product.description.as_deref(), Some("A long-wearing lip pencil."));
        assert_eq!(
            product.url.as_deref(),
            Some("https://example.com/products/lippie-pencil")
        );
        assert!(product.available);
        assert_eq!(product.images, vec!["https://cdn.example.com/lippie.jpg"]);
    }

    #[test]
    fn missing_variants_and_images_map_to_empty() {
        let raw: RawProduct = serde_json::from_value(serde_json::json!({
            "id": 7,
            "title": "Bare Product",
            "handle": "bare"
        }))
        .unwrap();
        let product = map_product(raw, "https://example.com");
        assert!(product.price.is_none());
        assert!(product.images.is_empty());
        assert!(!product.available);
        assert!(product.description.is_none());
    }

    #[test]
    fn empty_string_fields_become_none() {
        let raw: RawProduct = serde_json::from_value(serde_json::json!({
            "id": 8,
            "title": "Typed Product",
            "handle": "typed",
            "vendor": "",
            "product_type": "",
            "variants": [{"price": "", "available": false}]
        }))
        .unwrap();
        let product = map_product(raw, "https://example.com");
        assert!(product.vendor.is_none());
        assert!(product.product_type.is_none());
        assert!(product.price.is_none());
    }

    #[test]
    fn long_descriptions_are_truncated() {
        let body = format!("<p>{}</p>", "x".repeat(900));
        let raw: RawProduct = serde_json::from_value(serde_json::json!({
            "id": 9,
            "title": "Wordy",
            "handle": "wordy",
            "body_html": body
        }))
        .unwrap();
        let product = map_product(raw, "https://example.com");
        assert_eq!(product.description.unwrap().chars().count(), MAX_DESCRIPTION_CHARS);
    }

    #[test]
    fn page_without_products_key_is_rejected() {
        assert!(serde_json::from_str::<RawProductsPage>("{}").is_err());
        assert!(serde_json::from_str::<RawProductsPage>(r#"{"products": []}"#).is_ok());
    }
}
