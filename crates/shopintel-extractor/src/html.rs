//! Regex helpers for storefront markup.
//!
//! Storefront themes share no schema, so extraction works on a small set of
//! anchored patterns (tags, attributes, meta content) rather than a full
//! markup tree. Attribute values are expected in the common
//! `attr="value"` / `attr='value'` forms; exotic unquoted attributes are
//! ignored.

use std::sync::LazyLock;

use regex::Regex;

static ANCHOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<a\b([^>]*)>(.*?)</a>").expect("valid anchor regex"));
static META_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<meta\b[^>]*>").expect("valid meta regex"));
static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("valid title regex"));
static MAIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<main\b[^>]*>(.*?)</main>").expect("valid main regex"));
static ARTICLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<article\b[^>]*>(.*?)</article>").expect("valid article regex")
});
static SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script>").expect("valid script regex")
});
static STYLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style>").expect("valid style regex"));
static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid comment regex"));
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]+>").expect("valid tag regex"));
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// One `<a>` element: its `href` and tag-stripped label text.
#[derive(Debug, Clone)]
pub(crate) struct Anchor {
    pub href: String,
    pub label: String,
}

/// Collects every anchor with a non-empty `href`, in document order.
pub(crate) fn collect_anchors(html: &str) -> Vec<Anchor> {
    ANCHOR_RE
        .captures_iter(html)
        .filter_map(|cap| {
            let attrs = cap.get(1)?.as_str();
            let href = extract_attr_from(attrs, "href")?;
            if href.is_empty()
                || href.starts_with('#')
                || href.starts_with("javascript:")
            {
                return None;
            }
            let label = html_to_text(cap.get(2).map_or("", |m| m.as_str()));
            Some(Anchor { href, label })
        })
        .collect()
}

/// Extracts a quoted attribute value from a tag's attribute string.
pub(crate) fn extract_attr_from(attrs: &str, attr: &str) -> Option<String> {
    let pattern = format!(r#"(?is)\b{}\s*=\s*["']([^"']*)["']"#, regex::escape(attr));
    let re = Regex::new(&pattern).expect("valid attr regex");
    re.captures(attrs)
        .and_then(|c| c.get(1).map(|m| m.as_str().trim().to_string()))
}

/// Finds the `content` of the first `<meta>` tag whose `key_attr` equals
/// `key_value`, e.g. `find_meta_content(html, "name", "description")`.
pub(crate) fn find_meta_content(html: &str, key_attr: &str, key_value: &str) -> Option<String> {
    META_TAG_RE.find_iter(html).find_map(|m| {
        let tag = m.as_str();
        let key = extract_attr_from(tag, key_attr)?;
        if key.eq_ignore_ascii_case(key_value) {
            extract_attr_from(tag, "content").filter(|c| !c.is_empty())
        } else {
            None
        }
    })
}

/// The document `<title>` text, if present and non-empty.
pub(crate) fn extract_title(html: &str) -> Option<String> {
    TITLE_RE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| html_to_text(m.as_str()))
        .filter(|t| !t.is_empty())
}

/// The inner markup of `<main>` or `<article>`, whichever appears first in
/// that preference order. Policy and about pages keep their substance there;
/// falling back to the whole document drags in nav and footer noise.
pub(crate) fn main_content(html: &str) -> &str {
    if let Some(m) = MAIN_RE.captures(html).and_then(|c| c.get(1)) {
        return m.as_str();
    }
    if let Some(m) = ARTICLE_RE.captures(html).and_then(|c| c.get(1)) {
        return m.as_str();
    }
    html
}

/// Strips markup down to readable text: scripts, styles, and comments
/// removed, tags dropped, common entities decoded, whitespace collapsed.
pub(crate) fn html_to_text(html: &str) -> String {
    let without_script = SCRIPT_RE.replace_all(html, " ");
    let without_style = STYLE_RE.replace_all(&without_script, " ");
    let without_comments = COMMENT_RE.replace_all(&without_style, " ");
    let without_tags = TAG_RE.replace_all(&without_comments, " ");
    let decoded = decode_entities(&without_tags);
    collapse_whitespace(&decoded)
}

/// Decodes the handful of entities storefront themes actually emit.
fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Collapses runs of whitespace to single spaces and trims the ends.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").trim().to_string()
}

/// Resolves `candidate` against `base`, returning an absolute URL string.
pub(crate) fn absolutize_url(base: &str, candidate: &str) -> Option<String> {
    let candidate = candidate.replace("&amp;", "&");
    if candidate.starts_with("http://") || candidate.starts_with("https://") {
        return Some(candidate);
    }
    let base = reqwest::Url::parse(base).ok()?;
    base.join(&candidate).ok().map(|u| u.to_string())
}

/// Truncates to at most `max` characters on a char boundary.
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        text.chars().take(max).collect()
    }
}
