use thiserror::Error;

use crate::app_config::AppConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a `SHOPINTEL_*` value fails to parse.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for
/// testing or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a `SHOPINTEL_*` value fails to parse.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup
/// function.
///
/// This is the core parsing logic, decoupled from the actual environment so
/// it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var`
/// needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let defaults = AppConfig::default();

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    fn parse_num<T: std::str::FromStr>(
        var: &str,
        raw: &str,
    ) -> Result<T, ConfigError>
    where
        T::Err: std::fmt::Display,
    {
        raw.parse::<T>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    }

    let parse_u32 = |var: &str, default: u32| -> Result<u32, ConfigError> {
        parse_num(var, &or_default(var, &default.to_string()))
    };
    let parse_u64 = |var: &str, default: u64| -> Result<u64, ConfigError> {
        parse_num(var, &or_default(var, &default.to_string()))
    };
    let parse_usize = |var: &str, default: usize| -> Result<usize, ConfigError> {
        parse_num(var, &or_default(var, &default.to_string()))
    };

    Ok(AppConfig {
        log_level: or_default("SHOPINTEL_LOG_LEVEL", &defaults.log_level),
        user_agent: or_default("SHOPINTEL_USER_AGENT", &defaults.user_agent),
        request_timeout_secs: parse_u64(
            "SHOPINTEL_REQUEST_TIMEOUT_SECS",
            defaults.request_timeout_secs,
        )?,
        max_redirects: parse_usize("SHOPINTEL_MAX_REDIRECTS", defaults.max_redirects)?,
        max_retries: parse_u32("SHOPINTEL_MAX_RETRIES", defaults.max_retries)?,
        retry_backoff_base_ms: parse_u64(
            "SHOPINTEL_RETRY_BACKOFF_BASE_MS",
            defaults.retry_backoff_base_ms,
        )?,
        max_concurrent_categories: parse_usize(
            "SHOPINTEL_MAX_CONCURRENT_CATEGORIES",
            defaults.max_concurrent_categories,
        )?,
        overall_deadline_secs: parse_u64(
            "SHOPINTEL_OVERALL_DEADLINE_SECS",
            defaults.overall_deadline_secs,
        )?,
        catalog_page_limit: parse_u32(
            "SHOPINTEL_CATALOG_PAGE_LIMIT",
            defaults.catalog_page_limit,
        )?,
        max_catalog_pages: parse_usize(
            "SHOPINTEL_MAX_CATALOG_PAGES",
            defaults.max_catalog_pages,
        )?,
    })
}
