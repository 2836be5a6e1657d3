use encoding_rs::{Encoding, UTF_8};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::bytes::Regex;
use scraper::{ElementRef, Html, Selector};

/// How far into the body we look for a `<meta charset>` declaration.
const CHARSET_PRESCAN_BYTES: usize = 4096;

static META_CHARSET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?\s*([a-z0-9_\-:.]+)"#).unwrap()
});

/// A parsed HTML page with CSS-selector access.
///
/// Parsing never fails: html5ever closes unclosed tags and drops what it
/// cannot place, so any byte sequence yields a queryable tree.
#[derive(Debug)]
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// Decode raw response bytes and parse them.
    ///
    /// The encoding is taken from a byte-order mark, then the `charset`
    /// parameter of `content_type`, then a `<meta charset>` in the first
    /// few kilobytes, and finally defaults to UTF-8.
    pub fn from_bytes(bytes: &[u8], content_type: Option<&str>) -> Self {
        let encoding = detect_encoding(bytes, content_type);
        let (text, actual, had_errors) = encoding.decode(bytes);
        if had_errors {
            debug!(
                "Document: malformed {} sequences replaced while decoding",
                actual.name()
            );
        }
        Self::parse(&text)
    }

    pub fn select_first(&self, css: &str) -> Option<ElementRef<'_>> {
        let selector = selector(css)?;
        self.html.select(&selector).next()
    }

    pub fn select_all(&self, css: &str) -> Vec<ElementRef<'_>> {
        match selector(css) {
            Some(selector) => self.html.select(&selector).collect(),
            None => Vec::new(),
        }
    }

    /// Text content of the first match, or `None` when missing or blank.
    pub fn text(&self, css: &str) -> Option<String> {
        self.select_first(css)
            .map(|el| element_text(&el))
            .filter(|text| !text.is_empty())
    }

    /// Non-blank text content of every match, in document order.
    pub fn texts(&self, css: &str) -> Vec<String> {
        self.select_all(css)
            .iter()
            .map(element_text)
            .filter(|text| !text.is_empty())
            .collect()
    }

    pub fn attr(&self, css: &str, name: &str) -> Option<String> {
        self.select_first(css)
            .and_then(|el| el.value().attr(name))
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    pub fn inner_html(&self, css: &str) -> Option<String> {
        self.select_first(css).map(|el| el.inner_html())
    }
}

/// Concatenated descendant text with whitespace runs collapsed.
pub fn element_text(element: &ElementRef) -> String {
    let raw: String = element.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse a CSS selector, logging instead of failing on bad input.
pub(crate) fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            warn!("Document: invalid selector {:?}: {}", css, e);
            None
        }
    }
}

fn detect_encoding(bytes: &[u8], content_type: Option<&str>) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }

    content_type
        .and_then(charset_param)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .or_else(|| meta_charset(bytes))
        .unwrap_or(UTF_8)
}

fn charset_param(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if key.trim().eq_ignore_ascii_case("charset") {
            Some(value.trim().trim_matches(|c| c == '"' || c == '\''))
        } else {
            None
        }
    })
}

fn meta_charset(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(CHARSET_PRESCAN_BYTES)];
    let label = META_CHARSET.captures(head)?.get(1)?.as_bytes();
    let encoding = Encoding::for_label(label)?;
    // HTML prescan rule: a meta-declared UTF-16 means UTF-8.
    if encoding == encoding_rs::UTF_16LE || encoding == encoding_rs::UTF_16BE {
        Some(UTF_8)
    } else {
        Some(encoding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_collapses_whitespace() {
        let doc = Document::parse(
            "<html><body><p class='x'>  2 <b>cups</b>\n   flour </p><p class='x'> </p></body></html>",
        );
        assert_eq!(doc.text(".x"), Some("2 cups flour".to_string()));
        assert_eq!(doc.texts(".x"), vec!["2 cups flour".to_string()]);
    }

    #[test]
    fn test_missing_and_invalid_selectors_are_empty() {
        let doc = Document::parse("<html><body><p>hi</p></body></html>");
        assert!(doc.text(".nope").is_none());
        assert!(doc.select_all("p[").is_empty());
        assert!(doc.attr("img", "src").is_none());
    }

    #[test]
    fn test_attr_and_inner_html() {
        let doc = Document::parse(
            r#"<div class="hero"><img class="photo" src=" https://example.com/a.jpg "><span>x</span></div>"#,
        );
        assert_eq!(
            doc.attr("img.photo", "src"),
            Some("https://example.com/a.jpg".to_string())
        );
        assert!(doc.inner_html(".hero").unwrap().contains("<span>x</span>"));
    }

    #[test]
    fn test_malformed_markup_is_tolerated() {
        let doc = Document::parse("<html><body><ul><li>one<li>two</ul><div><p>open");
        assert_eq!(doc.texts("li"), vec!["one".to_string(), "two".to_string()]);
        assert_eq!(doc.text("p"), Some("open".to_string()));
    }

    #[test]
    fn test_charset_from_content_type() {
        // "Crème" in ISO-8859-1
        let bytes = b"<html><body><h1>Cr\xe8me</h1></body></html>";
        let doc = Document::from_bytes(bytes, Some("text/html; charset=ISO-8859-1"));
        assert_eq!(doc.text("h1"), Some("Crème".to_string()));
    }

    #[test]
    fn test_charset_from_meta() {
        let bytes =
            b"<html><head><meta charset=\"windows-1252\"></head><body><h1>Cr\xe8me</h1></body></html>";
        let doc = Document::from_bytes(bytes, Some("text/html"));
        assert_eq!(doc.text("h1"), Some("Crème".to_string()));
    }

    #[test]
    fn test_defaults_to_utf8() {
        let doc = Document::from_bytes("<h1>Crème brûlée</h1>".as_bytes(), None);
        assert_eq!(doc.text("h1"), Some("Crème brûlée".to_string()));
    }

    #[test]
    fn test_charset_param_parsing() {
        assert_eq!(charset_param("text/html; charset=\"utf-8\""), Some("utf-8"));
        assert_eq!(charset_param("text/html;Charset=latin1"), Some("latin1"));
        assert_eq!(charset_param("text/html"), None);
    }
}
