//! Content parsers, one per extraction category.
//!
//! Every parser returns a [`CategoryOutcome`]: "the page is missing" or "no
//! heuristic matched" is a value, not an error, so one empty category never
//! aborts the rest of an analysis.

pub mod about;
pub mod contact;
pub mod faq;
pub mod hero;
pub mod links;
pub mod policy;
pub mod social;

use crate::fetch::{FetchResult, PageFetch};

/// A partial result plus its availability.
///
/// `available` distinguishes "the source material existed" from "it did
/// not" — an available-but-empty value (a reachable homepage with no social
/// links) is a different outcome than an unreachable page. `note` carries
/// the human-readable explanation that ends up in the record's
/// per-category notes.
#[derive(Debug, Clone)]
pub struct CategoryOutcome<T> {
    pub value: T,
    pub available: bool,
    pub note: Option<String>,
}

impl<T> CategoryOutcome<T> {
    pub fn available(value: T) -> Self {
        Self {
            value,
            available: true,
            note: None,
        }
    }

    pub fn with_note(value: T, note: impl Into<String>) -> Self {
        Self {
            value,
            available: true,
            note: Some(note.into()),
        }
    }
}

impl<T: Default> CategoryOutcome<T> {
    /// The source material was absent or unreachable.
    pub fn missing(note: impl Into<String>) -> Self {
        Self {
            value: T::default(),
            available: false,
            note: Some(note.into()),
        }
    }
}

/// Fetches `url` and returns the result only when it carries a usable body.
/// Failures are logged at debug level; the caller decides what "missing"
/// means for its category.
pub(crate) async fn fetch_page(fetcher: &dyn PageFetch, url: &str) -> Option<FetchResult> {
    match fetcher.fetch(url).await {
        Ok(result) if result.is_ok() => Some(result),
        Ok(result) => {
            tracing::debug!(url, status = %result.status, "page fetch failed");
            None
        }
        Err(err) => {
            tracing::debug!(url, error = %err, "page fetch rejected");
            None
        }
    }
}

/// Fetches candidate paths in order and returns the first reachable page.
pub(crate) async fn first_reachable(
    fetcher: &dyn PageFetch,
    origin: &str,
    paths: &[&str],
) -> Option<FetchResult> {
    for path in paths {
        if let Some(result) = fetch_page(fetcher, &format!("{origin}{path}")).await {
            return Some(result);
        }
    }
    None
}
