//! JSON-LD structured data embedded in `<script type="application/ld+json">` tags.
//!
//! Blocks are flattened: top-level arrays and `@graph` arrays contribute each
//! of their objects. A block that is not valid JSON is skipped with a warning
//! and the rest of the page is still used.

use scraper::{Html, Selector};
use serde_json::Value;
use tracing::warn;

use crate::error::ParseError;

const LD_JSON_SELECTOR: &str = r#"script[type="application/ld+json"]"#;

/// All structured-data objects found on a page, in document order.
#[derive(Debug, Clone, Default)]
pub struct StructuredData {
    objects: Vec<Value>,
}

impl StructuredData {
    pub fn collect(document: &Html) -> Self {
        let Ok(selector) = Selector::parse(LD_JSON_SELECTOR) else {
            return Self::default();
        };

        let mut objects = Vec::new();
        for (index, element) in document.select(&selector).enumerate() {
            let text = element.text().collect::<String>();
            match parse_block(index, &text) {
                Ok(Some(value)) => flatten_into(value, &mut objects),
                Ok(None) => {}
                Err(e) => warn!(error = %e, "Skipping structured-data block"),
            }
        }

        Self { objects }
    }

    pub fn objects(&self) -> &[Value] {
        &self.objects
    }

    /// Objects whose `@type` is `Product`.
    pub fn products(&self) -> impl Iterator<Item = &Value> {
        self.objects.iter().filter(|v| is_product(v))
    }

    pub fn first_product(&self) -> Option<&Value> {
        self.products().next()
    }

    pub fn has_product(&self) -> bool {
        self.first_product().is_some()
    }
}

/// Parses one block. Blank blocks are `Ok(None)`.
pub fn parse_block(index: usize, text: &str) -> Result<Option<Value>, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|source| ParseError { index, source })
}

fn flatten_into(value: Value, out: &mut Vec<Value>) {
    match value {
        Value::Array(items) => {
            for item in items {
                flatten_into(item, out);
            }
        }
        Value::Object(mut map) => {
            if let Some(Value::Array(graph)) = map.remove("@graph") {
                for item in graph {
                    flatten_into(item, out);
                }
            }
            if !map.is_empty() {
                out.push(Value::Object(map));
            }
        }
        _ => {}
    }
}

fn type_matches(type_name: &str) -> bool {
    type_name == "Product" || type_name.ends_with("/Product")
}

pub fn is_product(value: &Value) -> bool {
    match value.get("@type") {
        Some(Value::String(s)) => type_matches(s),
        Some(Value::Array(types)) => types.iter().filter_map(Value::as_str).any(type_matches),
        _ => false,
    }
}

/// A scalar field rendered as trimmed text. Numbers are stringified.
pub fn text_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(scalar_text)
}

pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => crate::models::clean_text(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// `key` as text, or `key.name` when the field is a nested object
/// (`"brand": {"@type": "Brand", "name": "Acme"}`), or the first usable
/// element when it is a list.
pub fn named_field(value: &Value, key: &str) -> Option<String> {
    fn resolve(v: &Value) -> Option<String> {
        match v {
            Value::Object(_) => text_field(v, "name"),
            Value::Array(items) => items.iter().find_map(resolve),
            other => scalar_text(other),
        }
    }
    value.get(key).and_then(resolve)
}

/// `offers` of a product, first element when it is a list.
pub fn first_offer(product: &Value) -> Option<&Value> {
    match product.get("offers")? {
        Value::Array(items) => items.first(),
        offer @ Value::Object(_) => Some(offer),
        _ => None,
    }
}
