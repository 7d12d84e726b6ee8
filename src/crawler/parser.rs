//! HTML document extractor
//!
//! Parses fetched HTML into the small slice the crawler cares about: the
//! document language, the title, and the raw anchor list. Everything else in
//! the DOM is ignored.

use scraper::{Html, Selector};

/// A raw `(text, href)` anchor pair as it appears in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    /// The anchor's visible text
    pub text: String,

    /// The raw href attribute, possibly relative
    pub href: String,
}

/// The extracted slice of an HTML document.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    /// Value of the `<html lang>` attribute, empty when absent
    pub language: String,

    /// Text of the `<title>` element, empty when absent
    pub title: String,

    /// All `<a href>` anchors in document order
    pub anchors: Vec<Anchor>,
}

/// Extracts language, title and anchors from an HTML document.
///
/// Parsing never fails: malformed markup produces whatever the parser can
/// recover, and missing pieces come back empty. Anchors keep their raw href
/// values; resolution and filtering happen downstream.
///
/// # Example
///
/// ```
/// use backmap::crawler::extract_document;
///
/// let html = r#"<html lang="en"><head><title>Cats</title></head>
///               <body><a href="/wiki/Dog">Dog</a></body></html>"#;
/// let doc = extract_document(html);
/// assert_eq!(doc.language, "en");
/// assert_eq!(doc.title, "Cats");
/// assert_eq!(doc.anchors.len(), 1);
/// ```
pub fn extract_document(html: &str) -> ExtractedDocument {
    let document = Html::parse_document(html);

    let language = extract_language(&document);
    let title = extract_title(&document);
    let anchors = extract_anchors(&document);

    ExtractedDocument {
        language,
        title,
        anchors,
    }
}

/// Reads the lang attribute from the root html element.
fn extract_language(document: &Html) -> String {
    let Ok(selector) = Selector::parse("html") else {
        return String::new();
    };

    document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr("lang"))
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Reads the text content of the title element.
fn extract_title(document: &Html) -> String {
    let Ok(selector) = Selector::parse("title") else {
        return String::new();
    };

    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Collects every anchor with an href attribute, in document order.
fn extract_anchors(document: &Html) -> Vec<Anchor> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| {
            let href = element.value().attr("href")?;
            let text = element.text().collect::<String>().trim().to_string();
            Some(Anchor {
                text,
                href: href.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_language() {
        let html = r#"<html lang="en"><head></head><body></body></html>"#;
        assert_eq!(extract_document(html).language, "en");
    }

    #[test]
    fn test_missing_language_is_empty() {
        let html = r#"<html><head></head><body></body></html>"#;
        assert_eq!(extract_document(html).language, "");
    }

    #[test]
    fn test_extract_title() {
        let html = r#"<html><head><title>Test Page</title></head><body></body></html>"#;
        assert_eq!(extract_document(html).title, "Test Page");
    }

    #[test]
    fn test_title_whitespace_trimmed() {
        let html = r#"<html><head><title>  Test Page  </title></head><body></body></html>"#;
        assert_eq!(extract_document(html).title, "Test Page");
    }

    #[test]
    fn test_missing_title_is_empty() {
        let html = r#"<html><head></head><body></body></html>"#;
        assert_eq!(extract_document(html).title, "");
    }

    #[test]
    fn test_extract_anchor_pair() {
        let html = r#"<html><body><a href="/wiki/Dog">Dog</a></body></html>"#;
        let doc = extract_document(html);
        assert_eq!(
            doc.anchors,
            vec![Anchor {
                text: "Dog".to_string(),
                href: "/wiki/Dog".to_string(),
            }]
        );
    }

    #[test]
    fn test_anchor_without_href_skipped() {
        let html = r#"<html><body><a name="top">Top</a></body></html>"#;
        assert!(extract_document(html).anchors.is_empty());
    }

    #[test]
    fn test_anchor_with_empty_text_kept() {
        // The filter pipeline drops these; extraction reports what the
        // document contains.
        let html = r#"<html><body><a href="/x"><img src="i.png"></a></body></html>"#;
        let doc = extract_document(html);
        assert_eq!(doc.anchors.len(), 1);
        assert_eq!(doc.anchors[0].text, "");
    }

    #[test]
    fn test_anchors_in_document_order() {
        let html = r#"
            <html><body>
                <a href="/a">A</a>
                <a href="/b">B</a>
                <a href="/c">C</a>
            </body></html>
        "#;
        let doc = extract_document(html);
        let hrefs: Vec<_> = doc.anchors.iter().map(|a| a.href.as_str()).collect();
        assert_eq!(hrefs, vec!["/a", "/b", "/c"]);
    }

    #[test]
    fn test_nested_anchor_text_flattened() {
        let html = r#"<html><body><a href="/x"><b>Bold</b> link</a></body></html>"#;
        let doc = extract_document(html);
        assert_eq!(doc.anchors[0].text, "Bold link");
    }

    #[test]
    fn test_malformed_html_still_extracts() {
        let html = r#"<html><body><a href="/x">Unclosed"#;
        let doc = extract_document(html);
        assert_eq!(doc.anchors.len(), 1);
    }
}
