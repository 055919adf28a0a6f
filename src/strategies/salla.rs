//! Salla storefronts.
//!
//! Salla templates always render the `product:*` Open Graph extension, so the
//! item id and price meta tags are trusted ahead of anything scraped from
//! the visible markup.

use crate::detector::{SALLA_CURRENCY_META, SALLA_ITEM_ID_META};
use crate::models::ProductRecord;
use crate::page::Page;

use super::chain::{self, NAME_CHAIN, Step, first_of};
use super::{ExtractionStrategy, StrategyKind};

/// Price elements of the stock Salla themes, sale price first.
const SALLA_PRICE_SELECTORS: [&str; 3] = [".total-price", ".price_is_on_sale", ".product-price"];

fn price_from_salla_meta(page: &Page) -> Option<f64> {
    page.meta_all("product:price:amount")
        .iter()
        .find_map(|text| chain::accept_price(text))
}

fn price_from_salla_selectors(page: &Page) -> Option<f64> {
    chain::price_from_selector_list(page, &SALLA_PRICE_SELECTORS)
}

const SALLA_PRICE_CHAIN: [Step<f64>; 5] = [
    Step::new("structured-data offers.price", chain::price_from_structured),
    Step::new("product:price:amount meta", price_from_salla_meta),
    Step::new("salla price selectors", price_from_salla_selectors),
    Step::new("price selectors", chain::price_from_selectors),
    Step::new("currency patterns", chain::price_from_patterns),
];

pub struct SallaStrategy;

impl ExtractionStrategy for SallaStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Salla
    }

    fn extract_name(&self, page: &Page) -> Option<String> {
        first_of(page, "name", &NAME_CHAIN)
    }

    fn extract_price(&self, page: &Page) -> Option<f64> {
        first_of(page, "price", &SALLA_PRICE_CHAIN)
    }

    fn extract_secondary(&self, page: &Page, record: &mut ProductRecord) {
        record.sku = page.meta(SALLA_ITEM_ID_META);
        record.currency = page.meta(SALLA_CURRENCY_META).map(|c| c.to_uppercase());
        chain::fill_secondary(page, record);
    }
}
