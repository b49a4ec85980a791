//! Shopify storefront detection.
//!
//! The probe is a hard gate: a store that fails it never reaches the
//! category fan-out, so a non-Shopify site costs exactly one request.

use crate::catalog::RawProductsPage;
use crate::fetch::PageFetch;

/// Returns `true` when `origin` serves a well-formed product listing at the
/// public `products.json` endpoint.
///
/// Any fetch failure, non-2xx status, or body that does not match the
/// product-listing shape yields `false`. Exactly one fetch is performed.
pub async fn is_shopify_store(fetcher: &dyn PageFetch, origin: &str) -> bool {
    let url = format!("{origin}/products.json?limit=1");
    let result = match fetcher.fetch(&url).await {
        Ok(result) => result,
        Err(err) => {
            tracing::debug!(origin, error = %err, "probe fetch rejected");
            return false;
        }
    };

    if !result.is_ok() {
        tracing::debug!(origin, status = %result.status, "probe fetch failed");
        return false;
    }

    serde_json::from_str::<RawProductsPage>(&result.body).is_ok()
}
