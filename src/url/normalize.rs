use crate::UrlError;
use url::Url;

/// Scheme prepended to input that carries none
const DEFAULT_SCHEME_PREFIX: &str = "https://";

/// Normalizes a visitor-supplied URL before it is scanned
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace; reject empty input
/// 2. Prepend `https://` unless the input already starts with `http://` or
///    `https://` (case-insensitive)
/// 3. Parse the URL; reject if malformed
/// 4. Reject non-HTTP(S) schemes and URLs without a host
/// 5. Remove fragment (everything after #)
///
/// # Arguments
///
/// * `input` - The raw URL string as submitted
///
/// # Returns
///
/// * `Ok(Url)` - Normalized URL
/// * `Err(UrlError)` - Empty, malformed or unsupported input
///
/// # Examples
///
/// ```
/// use site_audit::url::normalize_scan_url;
///
/// let url = normalize_scan_url("  example.com/about#team ").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/about");
/// ```
pub fn normalize_scan_url(input: &str) -> Result<Url, UrlError> {
    let raw = input.trim();
    if raw.is_empty() {
        return Err(UrlError::Empty);
    }

    let lowered = raw.to_ascii_lowercase();
    let with_scheme = if lowered.starts_with("http://") || lowered.starts_with("https://") {
        raw.to_string()
    } else {
        format!("{}{}", DEFAULT_SCHEME_PREFIX, raw)
    };

    let mut url = Url::parse(&with_scheme).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => return Err(UrlError::MissingDomain),
    }

    url.set_fragment(None);

    Ok(url)
}

/// Returns true if the URL string uses the `https` scheme
///
/// Only the scheme prefix is inspected; the string does not have to be a
/// valid URL.
pub fn has_https_scheme(url: &str) -> bool {
    url.trim_start()
        .get(..DEFAULT_SCHEME_PREFIX.len())
        .map(|prefix| prefix.eq_ignore_ascii_case(DEFAULT_SCHEME_PREFIX))
        .unwrap_or(false)
}
