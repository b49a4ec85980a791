//! Brand name and about-text extraction.

use shopintel_core::Category;

use crate::fetch::PageFetch;
use crate::html::{
    extract_title, find_meta_content, html_to_text, main_content, truncate_chars,
};
use crate::parsers::{fetch_page, CategoryOutcome};

const ABOUT_PATHS: &[&str] = &["/pages/about-us", "/pages/about", "/pages/our-story", "/about"];

/// Below this the "about" page is a stub; fall through to the homepage
/// meta description instead.
const MIN_ABOUT_CHARS: usize = 50;
const MAX_ABOUT_CHARS: usize = 500;

/// Brand identity pulled from the storefront.
#[derive(Debug, Clone, Default)]
pub struct AboutInfo {
    /// Homepage `<title>` up to the first `|` separator.
    pub brand_name: Option<String>,
    pub about_text: Option<String>,
}

/// Reads the homepage title for the brand name and the first substantial
/// about page for the brand story, falling back to the homepage meta
/// description when no about page exists.
pub async fn extract_about(fetcher: &dyn PageFetch, origin: &str) -> CategoryOutcome<AboutInfo> {
    let home = fetch_page(fetcher, &format!("{origin}/")).await;

    let brand_name = home
        .as_ref()
        .and_then(|page| extract_title(&page.body))
        .and_then(|title| brand_name_from_title(&title));

    let mut about_text = None;
    for path in ABOUT_PATHS {
        if let Some(page) = fetch_page(fetcher, &format!("{origin}{path}")).await {
            let text = html_to_text(main_content(&page.body));
            if text.chars().count() >= MIN_ABOUT_CHARS {
                about_text = Some(truncate_chars(&text, MAX_ABOUT_CHARS));
                break;
            }
        }
    }

    if about_text.is_none() {
        about_text = home
            .as_ref()
            .and_then(|page| meta_description(&page.body))
            .map(|d| truncate_chars(&d, MAX_ABOUT_CHARS));
    }

    if home.is_none() && about_text.is_none() {
        return CategoryOutcome::missing("home and about pages unreachable");
    }

    let info = AboutInfo {
        brand_name,
        about_text,
    };
    if info.about_text.is_none() {
        tracing::debug!(origin, category = %Category::About, "no about page or meta description");
        return CategoryOutcome::with_note(info, "no about page or meta description found");
    }
    CategoryOutcome::available(info)
}

fn brand_name_from_title(title: &str) -> Option<String> {
    let name = title.split('|').next().unwrap_or(title).trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

fn meta_description(html: &str) -> Option<String> {
    find_meta_content(html, "property", "og:description")
        .or_else(|| find_meta_content(html, "name", "description"))
        .map(|d| html_to_text(&d))
        .filter(|d| !d.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brand_name_takes_segment_before_pipe() {
        assert_eq!(
            brand_name_from_title("ColourPop | Makeup & Beauty").as_deref(),
            Some("ColourPop")
        );
    }

    #[test]
    fn brand_name_without_separator_is_whole_title() {
        assert_eq!(brand_name_from_title("ColourPop").as_deref(), Some("ColourPop"));
    }

    #[test]
    fn empty_title_yields_no_brand_name() {
        assert!(brand_name_from_title("  ").is_none());
        assert!(brand_name_from_title("| store").is_none());
    }

    #[test]
    fn og_description_preferred_over_meta_description() {
        let html = r#"
            <meta property="og:description" content="Bold, cruelty-free makeup.">
            <meta name="description" content="A different description.">
        "#;
        assert_eq!(
            meta_description(html).as_deref(),
            Some("Bold, cruelty-free makeup.")
        );
    }

    #[test]
    fn meta_description_fallback() {
        let html = r#"<meta name="description" content="Affordable beauty essentials.">"#;
        assert_eq!(
            meta_description(html).as_deref(),
            Some("Affordable beauty essentials.")
        );
    }

    #[test]
    fn no_description_yields_none() {
        assert!(meta_description("<head></head>").is_none());
    }
}
