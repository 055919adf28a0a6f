//! Ordered fallback chains shared by the strategies.
//!
//! A chain is a slice of [`Step`]s tried in order; the first one producing a
//! value wins and later steps are never consulted. Each step is a plain
//! function so a chain can be read, and tested, one source at a time.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::models::{ProductRecord, clean_text};
use crate::normalize::{self, RIYAL_MARKER};
use crate::page::{Page, element_text};
use crate::structured::{first_offer, named_field, scalar_text, text_field};

/// One source in a fallback chain.
pub struct Step<T> {
    pub source: &'static str,
    pub run: fn(&Page) -> Option<T>,
}

impl<T> Clone for Step<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Step<T> {}

impl<T> Step<T> {
    pub const fn new(source: &'static str, run: fn(&Page) -> Option<T>) -> Self {
        Self { source, run }
    }
}

/// Runs `steps` in order and returns the first hit.
pub fn first_of<T>(page: &Page, field: &'static str, steps: &[Step<T>]) -> Option<T> {
    for step in steps {
        if let Some(value) = (step.run)(page) {
            debug!(field, source = step.source, "Field recovered");
            return Some(value);
        }
        debug!(field, source = step.source, "Source had nothing, trying next");
    }
    None
}

// ---------------------------------------------------------------------------
// Name
// ---------------------------------------------------------------------------

pub fn name_from_structured(page: &Page) -> Option<String> {
    page.structured()
        .products()
        .find_map(|product| text_field(product, "name"))
}

pub fn name_from_og_title(page: &Page) -> Option<String> {
    page.meta("og:title")
}

/// First `-` or `|` separated segment of `<title>`.
pub fn name_from_title(page: &Page) -> Option<String> {
    page.title().and_then(|t| first_segment(&t, &['-', '|']))
}

pub fn name_from_h1(page: &Page) -> Option<String> {
    page.first_text("h1")
}

pub fn first_segment(text: &str, separators: &[char]) -> Option<String> {
    text.split(separators).next().and_then(clean_text)
}

pub const NAME_CHAIN: [Step<String>; 3] = [
    Step::new("structured-data name", name_from_structured),
    Step::new("og:title meta", name_from_og_title),
    Step::new("title tag", name_from_title),
];

// ---------------------------------------------------------------------------
// Price
// ---------------------------------------------------------------------------

/// Price meta tags, most specific first.
pub const PRICE_META_KEYS: [&str; 3] = ["product:price:amount", "og:price:amount", "price"];

/// Selectors for elements that usually hold a displayed price.
pub const PRICE_SELECTORS: [&str; 7] = [
    r#"[itemprop="price"]"#,
    ".product-price",
    ".price",
    ".woocommerce-Price-amount",
    ".amount",
    r#"[class*="price"]"#,
    r#"[class*="amount"]"#,
];

/// Longer texts are containers holding more than one figure.
pub const MAX_PRICE_TEXT_LEN: usize = 48;

/// Amount inside a currency token: comma-grouped thousands, or a plain run.
const AMOUNT: &str = r"(?:\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+\.?\d*)";

/// Currency tokens in raw text, in priority order.
static PRICE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        format!(r"\$\s*{AMOUNT}"),
        format!(r"£\s*{AMOUNT}"),
        format!(r"€\s*{AMOUNT}"),
        format!(r"USD\s*{AMOUNT}"),
        format!(r"SAR\s*{AMOUNT}"),
        format!(r"ر\.س\s*{AMOUNT}"),
        format!(r"{AMOUNT}\s*ر\.س"),
        r"[٠-٩۰-۹]+".to_string(),
    ]
    .iter()
    .map(|p| Regex::new(p).expect("price pattern is valid"))
    .collect()
});

/// Parses a candidate, logging and discarding tokens that are not amounts.
pub fn accept_price(text: &str) -> Option<f64> {
    match normalize::parse_price(text) {
        Ok(amount) => Some(amount),
        Err(e) => {
            debug!(error = %e, "Price candidate rejected");
            None
        }
    }
}

/// Whether `text` carries a currency marker or non-ASCII (Arabic-Indic or
/// Persian) digits.
pub fn has_price_marker(text: &str) -> bool {
    ["$", "£", "€", "USD", "SAR", RIYAL_MARKER]
        .iter()
        .any(|marker| text.contains(*marker))
        || normalize::contains_arabic_digits(text)
}

/// `offers.price` of the first product carrying one.
pub fn price_from_structured(page: &Page) -> Option<f64> {
    page.structured()
        .products()
        .filter_map(first_offer)
        .filter_map(|offer| text_field(offer, "price"))
        .find_map(|text| accept_price(&text))
}

pub fn price_from_meta(page: &Page) -> Option<f64> {
    PRICE_META_KEYS
        .iter()
        .flat_map(|key| page.meta_all(key))
        .find_map(|text| accept_price(&text))
}

/// First element matched by `selectors` (in priority order) whose short text
/// carries a currency marker and parses.
pub fn price_from_selector_list(page: &Page, selectors: &[&str]) -> Option<f64> {
    selectors.iter().find_map(|css| {
        page.select(css)
            .iter()
            .filter_map(element_text)
            .filter(|text| text.chars().count() <= MAX_PRICE_TEXT_LEN && has_price_marker(text))
            .find_map(|text| accept_price(&text))
    })
}

pub fn price_from_selectors(page: &Page) -> Option<f64> {
    price_from_selector_list(page, &PRICE_SELECTORS)
}

/// Scans the raw document with [`PRICE_PATTERNS`]; the first pattern with a
/// parsable match wins.
pub fn price_from_patterns(page: &Page) -> Option<f64> {
    PRICE_PATTERNS.iter().find_map(|pattern| {
        pattern
            .find_iter(page.html())
            .find_map(|m| accept_price(m.as_str()))
    })
}

pub const PRICE_CHAIN: [Step<f64>; 4] = [
    Step::new("structured-data offers.price", price_from_structured),
    Step::new("price meta tags", price_from_meta),
    Step::new("price selectors", price_from_selectors),
    Step::new("currency patterns", price_from_patterns),
];

// ---------------------------------------------------------------------------
// Secondary fields
// ---------------------------------------------------------------------------

fn product_field(page: &Page, read: impl Fn(&Value) -> Option<String>) -> Option<String> {
    page.structured().products().find_map(read)
}

fn offer_field(page: &Page, key: &str) -> Option<String> {
    page.structured()
        .products()
        .filter_map(first_offer)
        .find_map(|offer| text_field(offer, key))
}

fn first_meta(page: &Page, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| page.meta(key))
}

/// `image` may be a URL, a list of URLs or an `ImageObject`.
fn image_from(value: &Value) -> Option<String> {
    match value {
        Value::Object(_) => text_field(value, "url").or_else(|| text_field(value, "contentUrl")),
        Value::Array(items) => items.iter().find_map(image_from),
        other => scalar_text(other),
    }
}

/// `https://schema.org/InStock` becomes `InStock`.
pub fn availability_label(raw: &str) -> Option<String> {
    clean_text(raw.rsplit('/').next().unwrap_or(raw))
}

fn rating_value(page: &Page, key: &str) -> Option<String> {
    page.structured()
        .products()
        .filter_map(|p| p.get("aggregateRating"))
        .find_map(|rating| text_field(rating, key))
}

fn parse_rating(text: &str) -> Option<f32> {
    normalize::to_ascii_digits(text).trim().parse::<f32>().ok()
}

fn parse_count(text: &str) -> Option<u32> {
    normalize::to_ascii_digits(text)
        .chars()
        .filter(char::is_ascii_digit)
        .collect::<String>()
        .parse()
        .ok()
}

pub fn currency_of(page: &Page) -> Option<String> {
    offer_field(page, "priceCurrency")
        .or_else(|| first_meta(page, &["product:price:currency", "og:price:currency"]))
        .map(|c| c.to_uppercase())
}

/// Fills every unset optional field from structured data, then meta tags.
pub fn fill_secondary(page: &Page, record: &mut ProductRecord) {
    fn keep_or(slot: &mut Option<String>, fill: impl FnOnce() -> Option<String>) {
        if slot.is_none() {
            *slot = fill();
        }
    }

    keep_or(&mut record.currency, || currency_of(page));
    keep_or(&mut record.brand, || {
        product_field(page, |p| named_field(p, "brand"))
            .or_else(|| first_meta(page, &["product:brand", "og:brand", "brand"]))
    });
    keep_or(&mut record.description, || {
        product_field(page, |p| text_field(p, "description"))
            .or_else(|| first_meta(page, &["og:description", "description"]))
    });
    keep_or(&mut record.image_url, || {
        product_field(page, |p| p.get("image").and_then(image_from))
            .or_else(|| first_meta(page, &["og:image", "twitter:image"]))
    });
    keep_or(&mut record.sku, || {
        product_field(page, |p| text_field(p, "sku"))
            .or_else(|| first_meta(page, &["product:retailer_item_id", "sku"]))
    });
    keep_or(&mut record.stock_status, || {
        offer_field(page, "availability")
            .or_else(|| first_meta(page, &["product:availability", "og:availability"]))
            .and_then(|raw| availability_label(&raw))
    });
    keep_or(&mut record.category, || {
        product_field(page, |p| named_field(p, "category"))
            .or_else(|| first_meta(page, &["product:category", "article:section"]))
    });

    if record.rating.is_none() {
        record.rating = rating_value(page, "ratingValue").and_then(|r| parse_rating(&r));
    }
    if record.review_count.is_none() {
        record.review_count = rating_value(page, "reviewCount")
            .or_else(|| rating_value(page, "ratingCount"))
            .and_then(|c| parse_count(&c));
    }

    fill_keywords(page, record);
}

// ---------------------------------------------------------------------------
// Keywords
// ---------------------------------------------------------------------------

fn split_keywords(raw: &str) -> impl Iterator<Item = &str> {
    raw.split([',', '،'])
}

/// Union of the `keywords` and `article:tag` metas, structured-data
/// `keywords` and the detected category.
pub fn fill_keywords(page: &Page, record: &mut ProductRecord) {
    for raw in page.meta_all("keywords") {
        record.add_keywords(split_keywords(&raw));
    }
    for raw in page.meta_all("article:tag") {
        record.add_keywords(split_keywords(&raw));
    }

    for object in page.structured().objects() {
        match object.get("keywords") {
            Some(Value::String(raw)) => record.add_keywords(split_keywords(raw)),
            Some(Value::Array(items)) => record.add_keywords(items.iter().filter_map(Value::as_str)),
            _ => {}
        }
    }

    if let Some(category) = record.category.clone() {
        record.add_keywords([category]);
    }
}
