//! Data model for extracted products

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::strategies::StrategyKind;

/// A product scraped from a single page.
///
/// `name` and `price` are always present; every other field is best effort.
/// The record has no identity of its own, the caller assigns one when it
/// persists it.
#[derive(Debug, Clone, Serialize)]
pub struct ProductRecord {
    pub name: String,
    pub price: f64,
    pub currency: Option<String>,
    /// Lowercase host of the input URL.
    pub website: String,
    pub url: String,
    pub brand: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub stock_status: Option<String>,
    pub sku: Option<String>,
    pub category: Option<String>,
    pub rating: Option<f32>,
    pub review_count: Option<u32>,
    pub keywords: BTreeSet<String>,
    pub strategy: StrategyKind,
    pub extracted_at: DateTime<Utc>,
}

impl ProductRecord {
    /// Builds a record from the two required fields. Strings are trimmed.
    pub fn new(name: &str, price: f64, strategy: StrategyKind) -> Self {
        Self {
            name: name.trim().to_string(),
            price,
            currency: None,
            website: String::new(),
            url: String::new(),
            brand: None,
            description: None,
            image_url: None,
            stock_status: None,
            sku: None,
            category: None,
            rating: None,
            review_count: None,
            keywords: BTreeSet::new(),
            strategy,
            extracted_at: Utc::now(),
        }
    }

    /// Keywords as stored: sorted and comma-joined, `None` when there are none.
    pub fn keywords_line(&self) -> Option<String> {
        if self.keywords.is_empty() {
            None
        } else {
            Some(self.keywords.iter().map(String::as_str).collect::<Vec<_>>().join(", "))
        }
    }

    /// Adds keywords, lowercased and trimmed. Empty values are dropped.
    pub fn add_keywords<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for value in values {
            let keyword = value.as_ref().trim().to_lowercase();
            if !keyword.is_empty() {
                self.keywords.insert(keyword);
            }
        }
    }
}

/// Trims `value` and drops it when nothing is left.
pub fn clean_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
