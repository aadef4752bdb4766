//! Reference link resolution

use url::Url;

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Fragment-only links
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
///
/// The fragment is dropped, so `/book/show/1#reviews` and `/book/show/1`
/// resolve to the same record URL.
pub fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let mut absolute = base_url.join(href).ok()?;
    if absolute.scheme() != "http" && absolute.scheme() != "https" {
        return None;
    }

    absolute.set_fragment(None);
    Some(absolute.to_string())
}

/// Normalizes a seed URL the same way discovered links are
pub fn canonical_seed(seed: &str) -> Result<String, url::ParseError> {
    let mut url = Url::parse(seed.trim())?;
    url.set_fragment(None);
    Ok(url.to_string())
}
