use thiserror::Error;

/// Request-level failures of [`crate::assembler::StoreAnalyzer::analyze`].
///
/// Everything below the request level — a missing FAQ page, an unreachable
/// policy path, a markup shape no heuristic recognizes — degrades to a
/// per-category note on the record instead of an error. Callers therefore
/// see either a well-formed record or one of these named failures, never a
/// raw internal error.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid store URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("{url} does not appear to be a Shopify storefront")]
    NotShopify { url: String },

    #[error("product catalog unavailable for {url}: {reason}")]
    CatalogUnavailable { url: String, reason: String },

    /// HTTP client construction failure (e.g. invalid TLS config). Ordinary
    /// request failures never surface here — they map to
    /// [`crate::fetch::FetchStatus`].
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
