//! A fetched page, parsed once and shared by the detector and every strategy.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::models::clean_text;
use crate::structured::StructuredData;

/// Raw HTML plus its parsed tree and JSON-LD objects.
///
/// `scraper::Html` is not `Send`, so a `Page` is built and consumed without
/// crossing an `.await`.
pub struct Page {
    domain: String,
    html: String,
    document: Html,
    structured: StructuredData,
}

impl Page {
    pub fn new(url: &Url, html: String) -> Self {
        let domain = url.host_str().unwrap_or_default().to_lowercase();
        let document = Html::parse_document(&html);
        let structured = StructuredData::collect(&document);

        Self {
            domain,
            html,
            document,
            structured,
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Raw document text, used by the regular-expression passes.
    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn structured(&self) -> &StructuredData {
        &self.structured
    }

    /// Every element matching `css`. An unparsable selector matches nothing.
    pub fn select(&self, css: &str) -> Vec<ElementRef<'_>> {
        Selector::parse(css)
            .map(|selector| self.document.select(&selector).collect())
            .unwrap_or_default()
    }

    /// Trimmed text of the first element matching `css` that has any.
    pub fn first_text(&self, css: &str) -> Option<String> {
        self.select(css).into_iter().find_map(|el| element_text(&el))
    }

    /// `content` of the first non-empty `<meta>` whose `property`, `name` or
    /// `itemprop` equals `key`.
    pub fn meta(&self, key: &str) -> Option<String> {
        self.meta_all(key).into_iter().next()
    }

    /// Contents of every non-empty `<meta>` keyed by `key`, in document order.
    pub fn meta_all(&self, key: &str) -> Vec<String> {
        self.select("meta")
            .into_iter()
            .filter(|el| {
                let v = el.value();
                [v.attr("property"), v.attr("name"), v.attr("itemprop")]
                    .into_iter()
                    .flatten()
                    .any(|attr| attr.eq_ignore_ascii_case(key))
            })
            .filter_map(|el| el.value().attr("content").and_then(clean_text))
            .collect()
    }

    /// Text of `<title>`, trimmed; `None` when empty.
    pub fn title(&self) -> Option<String> {
        self.first_text("title")
    }

    /// `href` of `<link rel="canonical">`.
    pub fn canonical(&self) -> Option<String> {
        self.select(r#"link[rel="canonical"]"#)
            .into_iter()
            .find_map(|el| el.value().attr("href").and_then(clean_text))
    }
}

/// Concatenated text of an element, trimmed; `None` when blank.
pub fn element_text(element: &ElementRef<'_>) -> Option<String> {
    clean_text(&element.text().collect::<String>())
}

#[cfg(test)]
pub(crate) fn page_from(url: &str, html: &str) -> Page {
    Page::new(&Url::parse(url).expect("test url"), html.to_string())
}
