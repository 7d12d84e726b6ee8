use crate::UrlError;
use url::Url;

/// Reverses the dot-separated labels of a host name.
///
/// The reversed form groups a site's pages under a common row-key prefix in
/// the store, so that a prefix scan walks one site contiguously.
///
/// # Examples
///
/// ```
/// use backmap::url::reverse_domain;
///
/// assert_eq!(reverse_domain("en.wikipedia.org"), "org.wikipedia.en");
/// assert_eq!(reverse_domain("example.com"), "com.example");
/// ```
pub fn reverse_domain(host: &str) -> String {
    host.split('.').rev().collect::<Vec<_>>().join(".")
}

/// Computes the canonical key for a raw URL string.
///
/// The key is the reversed host, optionally followed by the URL's path when
/// `include_path` is set (the store-sub-pages toggle). The path is appended
/// unchanged; query string and fragment are not part of the key, so two URLs
/// differing only there share one identity.
///
/// The same key is used as the store row key and as the crawl dedup key.
///
/// # Arguments
///
/// * `url_str` - The raw absolute URL
/// * `include_path` - Whether to append the URL path to the key
///
/// # Returns
///
/// * `Ok(String)` - The canonical key
/// * `Err(UrlError)` - The URL is unparseable or has no host; callers must
///   skip the URL rather than abort the batch
pub fn canonicalize(url_str: &str, include_path: bool) -> Result<String, UrlError> {
    let url = Url::parse(url_str).map_err(|e| UrlError::Parse(format!("{}: {}", url_str, e)))?;
    canonicalize_url(&url, include_path)
}

/// Computes the canonical key for an already-parsed URL.
pub fn canonicalize_url(url: &Url, include_path: bool) -> Result<String, UrlError> {
    let host = url
        .host_str()
        .ok_or_else(|| UrlError::MissingHost(url.to_string()))?;

    let reversed = reverse_domain(host);

    if include_path {
        Ok(format!("{}{}", reversed, url.path()))
    } else {
        Ok(reversed)
    }
}
