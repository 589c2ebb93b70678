//! HTML signal extractor
//!
//! This module turns one fetched HTML document into a fixed [`Signals`]
//! record. Extraction is total: malformed or partial markup never produces
//! an error, missing elements simply yield absent, false or zero values.

use crate::url::has_https_scheme;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Cookie banner / consent wording, English and Finnish
static COOKIE_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(cookie|eväste|gdpr|consent)").expect("Failed to compile cookie regex")
});

/// Substrings that mark a privacy policy link (compared lowercase)
const PRIVACY_KEYWORDS: &[&str] = &["privacy", "tietosuoja"];

/// Link relations that count as a favicon
const FAVICON_SELECTOR: &str =
    r#"link[rel="icon"], link[rel="shortcut icon"], link[rel="apple-touch-icon"]"#;

/// Bytes-per-pixel used to approximate image payload from declared dimensions
const BYTES_PER_PIXEL: f64 = 0.25;

/// Signals extracted from a single page
///
/// Serialized with the camelCase field names used by the report API and the
/// text-generation payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signals {
    /// Source URL uses the https scheme
    #[serde(rename = "hasHTTPS")]
    pub has_https: bool,

    /// `<meta name="viewport">` is present
    pub has_viewport_meta: bool,

    /// Trimmed text of the first `<title>`
    pub title: Option<String>,

    /// Content of the first `<meta name="description">`
    pub meta_description: Option<String>,

    /// Trimmed text of the first `<h1>`
    pub h1: Option<String>,

    /// Href of the first `<link rel="canonical">`
    pub canonical: Option<String>,

    /// Content of the first `<meta name="robots">`
    pub robots: Option<String>,

    /// Any favicon link relation is present
    pub favicon: bool,

    /// Non-empty hreflang values of alternate links, in document order
    pub hreflang: Vec<String>,

    /// Body text mentions cookies, consent or GDPR
    pub has_cookie_words: bool,

    /// Some anchor points at a privacy policy
    pub privacy_policy_url_found: bool,

    /// Number of `<img>` elements
    pub img_count: usize,

    /// Number of `<script>` elements
    pub script_count: usize,

    /// Average approximate image size over images with declared dimensions
    pub avg_img_bytes_approx: Option<u64>,
}

/// Parses HTML content and extracts the audit signals
///
/// # Matching Rules
///
/// - `title` / `h1`: first element in document order, trimmed, empty is absent
/// - `metaDescription` / `canonical` / `robots`: attribute of the first
///   matching tag, empty is absent
/// - `hasHTTPS`: taken from `source_url`, never from the document
/// - `avgImgBytesApprox`: `width × height × 0.25` averaged over images that
///   declare both dimensions as positive numbers
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `source_url` - The URL the document was fetched from
///
/// # Example
///
/// ```
/// use site_audit::audit::extract_signals;
///
/// let html = r#"<html><head><title> Home </title></head><body><h1>Hi</h1></body></html>"#;
/// let signals = extract_signals(html, "https://example.com/");
/// assert_eq!(signals.title.as_deref(), Some("Home"));
/// assert!(signals.has_https);
/// ```
pub fn extract_signals(html: &str, source_url: &str) -> Signals {
    let document = Html::parse_document(html);

    let (img_count, avg_img_bytes_approx) = image_stats(&document);

    Signals {
        has_https: has_https_scheme(source_url),
        has_viewport_meta: exists(&document, r#"meta[name="viewport"]"#),
        title: first_text(&document, "title"),
        meta_description: first_attr(&document, r#"meta[name="description"]"#, "content"),
        h1: first_text(&document, "h1"),
        canonical: first_attr(&document, r#"link[rel="canonical"]"#, "href"),
        robots: first_attr(&document, r#"meta[name="robots"]"#, "content"),
        favicon: exists(&document, FAVICON_SELECTOR),
        hreflang: hreflang_values(&document),
        has_cookie_words: body_text(&document)
            .map(|text| COOKIE_WORDS.is_match(&text))
            .unwrap_or(false),
        privacy_policy_url_found: has_privacy_link(&document),
        img_count,
        script_count: count(&document, "script"),
        avg_img_bytes_approx,
    }
}

fn select_first<'a>(document: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    document.select(&selector).next()
}

fn exists(document: &Html, css: &str) -> bool {
    select_first(document, css).is_some()
}

fn count(document: &Html, css: &str) -> usize {
    Selector::parse(css)
        .map(|selector| document.select(&selector).count())
        .unwrap_or(0)
}

/// Trimmed text of the first match, `None` when missing or blank
fn first_text(document: &Html, css: &str) -> Option<String> {
    select_first(document, css)
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Attribute of the first match, unmodified, `None` when missing or empty
fn first_attr(document: &Html, css: &str, attr: &str) -> Option<String> {
    select_first(document, css)
        .and_then(|element| element.value().attr(attr))
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn hreflang_values(document: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse(r#"link[rel="alternate"][hreflang]"#) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("hreflang"))
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}

fn body_text(document: &Html) -> Option<String> {
    select_first(document, "body").map(|body| body.text().collect::<String>())
}

fn has_privacy_link(document: &Html) -> bool {
    let Ok(selector) = Selector::parse("a[href]") else {
        return false;
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .any(|href| {
            let href = href.to_lowercase();
            PRIVACY_KEYWORDS.iter().any(|keyword| href.contains(keyword))
        })
}

/// Returns the image count and the approximate average image size
fn image_stats(document: &Html) -> (usize, Option<u64>) {
    let Ok(selector) = Selector::parse("img") else {
        return (0, None);
    };

    let mut img_count = 0;
    let mut total_approx = 0.0;
    let mut counted = 0u32;

    for element in document.select(&selector) {
        img_count += 1;

        let width = parse_dimension(element.value().attr("width"));
        let height = parse_dimension(element.value().attr("height"));
        if let (Some(width), Some(height)) = (width, height) {
            total_approx += width * height * BYTES_PER_PIXEL;
            counted += 1;
        }
    }

    let average = (counted > 0).then(|| (total_approx / f64::from(counted)).round() as u64);
    (img_count, average)
}

/// Parses a declared width/height; only positive finite numbers qualify
fn parse_dimension(value: Option<&str>) -> Option<f64> {
    let parsed: f64 = value?.trim().parse().ok()?;
    (parsed.is_finite() && parsed > 0.0).then_some(parsed)
}
