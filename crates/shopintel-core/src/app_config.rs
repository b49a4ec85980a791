/// Runtime configuration for the extractor and its frontend.
///
/// Every knob has a default suitable for polite scraping of a public
/// storefront; see [`crate::config`] for the `SHOPINTEL_*` environment
/// variables that override them.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
    /// Per-request timeout applied by the HTTP client.
    pub request_timeout_secs: u64,
    /// Redirect hops before a fetch is abandoned.
    pub max_redirects: usize,
    /// Additional attempts after the first failure for transient errors.
    pub max_retries: u32,
    /// Base delay for exponential retry backoff: `base_ms * 2^attempt`.
    pub retry_backoff_base_ms: u64,
    /// Cap on category fetch+parse operations in flight for one request.
    pub max_concurrent_categories: usize,
    /// Overall deadline for one analysis; categories still running when it
    /// expires are reported unavailable.
    pub overall_deadline_secs: u64,
    /// `limit` query parameter for `products.json` pages.
    pub catalog_page_limit: u32,
    /// Safety cap on catalog pages; prevents runaway pagination.
    pub max_catalog_pages: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            user_agent: "shopintel/0.1 (storefront-insights)".to_string(),
            request_timeout_secs: 10,
            max_redirects: 5,
            max_retries: 2,
            retry_backoff_base_ms: 250,
            max_concurrent_categories: 4,
            overall_deadline_secs: 30,
            catalog_page_limit: 250,
            max_catalog_pages: 20,
        }
    }
}
