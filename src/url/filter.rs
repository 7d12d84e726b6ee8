//! Scope and link filter pipeline
//!
//! Turns a page's raw anchor list into a cleaned, in-scope list of absolute
//! outbound links, each carrying the canonical key of its target. The
//! pipeline stages are strictly ordered; each stage only narrows the set.

use crate::crawler::Anchor;
use crate::url::{canonicalize_url, reverse_domain};
use regex::Regex;
use url::Url;

/// A single deny rule applied to the path of a resolved anchor URL.
struct DenyRule {
    pattern: Regex,
    reason: &'static str,
}

/// Path patterns for URLs that are never page targets: wiki administrative
/// namespaces and non-page resources. Policy lives in this table, not in the
/// filter control flow.
const DENY_PATTERNS: &[(&str, &str)] = &[
    (r"(?i)/help:", "help namespace"),
    (r"(?i)/template:", "template namespace"),
    (r"(?i)/template_talk:", "template talk namespace"),
    (r"(?i)/special:", "special namespace"),
    (r"(?i)/user:", "user namespace"),
    (r"(?i)/user_talk:", "user talk namespace"),
    (r"(?i)/file:", "file namespace"),
    (r"(?i)/image:", "image namespace"),
    (r"(?i)/category:", "category namespace"),
    (r"(?i)/talk:", "talk namespace"),
    (r"(?i)/portal:", "portal namespace"),
    (r"(?i)/wikipedia:", "project namespace"),
    (r"(?i)/mediawiki:", "software namespace"),
    (r"(?i)/draft:", "draft namespace"),
    (r"(?i)/module:", "module namespace"),
    (
        r"(?i)\.(png|jpe?g|gif|svg|webp|ico|css|js|json|xml|pdf|zip|gz|tar|mp3|mp4|webm|ogg|woff2?)$",
        "non-page resource",
    ),
];

/// Anchor schemes dropped before resolution.
const DENY_SCHEMES: &[&str] = &["mailto:", "tel:", "javascript:", "data:"];

/// An anchor that survived the filter pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundLink {
    /// Canonical key of the link target
    pub target_key: String,

    /// The resolved absolute URL
    pub url: Url,

    /// The anchor text
    pub text: String,
}

/// Filters raw anchors down to in-scope page links.
///
/// Constructed once per crawl from the configured scope root and the
/// store-sub-pages toggle, then applied to every fetched page.
pub struct LinkFilter {
    rules: Vec<DenyRule>,
    scope_prefix: Option<String>,
    include_path: bool,
}

impl LinkFilter {
    /// Creates a filter.
    ///
    /// # Arguments
    ///
    /// * `scope_root` - When set, anchors must point at this host or one of
    ///   its sub-domains ("stay on site")
    /// * `include_path` - Whether canonical keys carry the URL path
    pub fn new(scope_root: Option<&Url>, include_path: bool) -> Self {
        let rules = DENY_PATTERNS
            .iter()
            .map(|(pattern, reason)| DenyRule {
                // Patterns are fixed literals; a bad one is a programming
                // error caught at construction.
                pattern: Regex::new(pattern).unwrap_or_else(|e| {
                    panic!("invalid deny pattern {:?}: {}", pattern, e);
                }),
                reason,
            })
            .collect();

        let scope_prefix = scope_root
            .and_then(|url| url.host_str())
            .map(reverse_domain);

        Self {
            rules,
            scope_prefix,
            include_path,
        }
    }

    /// Runs the full pipeline over a page's anchors.
    ///
    /// Stages, in order: drop anchors with empty text or href; drop denied
    /// schemes and fragment-only hrefs; resolve against the base URL; drop
    /// paths matching the deny table; drop out-of-scope hosts; compute the
    /// canonical target key. Repeated targets within one page are kept;
    /// deduplication is the storage layer's concern, not the filter's.
    pub fn filter(&self, base: &Url, anchors: &[Anchor]) -> Vec<OutboundLink> {
        anchors
            .iter()
            .filter_map(|anchor| self.filter_one(base, anchor))
            .collect()
    }

    fn filter_one(&self, base: &Url, anchor: &Anchor) -> Option<OutboundLink> {
        let text = anchor.text.trim();
        let href = anchor.href.trim();

        if text.is_empty() || href.is_empty() {
            return None;
        }

        if DENY_SCHEMES.iter().any(|s| href.starts_with(s)) || href.starts_with('#') {
            return None;
        }

        let resolved = base.join(href).ok()?;
        if resolved.scheme() != "http" && resolved.scheme() != "https" {
            return None;
        }

        if let Some(rule) = self.rules.iter().find(|r| r.pattern.is_match(resolved.path())) {
            tracing::trace!("Dropping {} ({})", resolved, rule.reason);
            return None;
        }

        if let Some(scope) = &self.scope_prefix {
            // Prefix match on the reversed label string: the scope host and
            // its sub-domains pass. Not public-suffix aware; hosts sharing a
            // label prefix with the scope root also pass.
            let host = resolved.host_str()?;
            if !reverse_domain(host).starts_with(scope.as_str()) {
                return None;
            }
        }

        let target_key = canonicalize_url(&resolved, self.include_path).ok()?;

        Some(OutboundLink {
            target_key,
            url: resolved,
            text: text.to_string(),
        })
    }
}
