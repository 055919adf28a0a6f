//! Zid storefronts, recognised by their JSON-LD `Product` block.

use serde_json::Value;

use crate::page::Page;
use crate::structured::text_field;

use super::chain::{self, NAME_CHAIN, Step, first_of};
use super::{ExtractionStrategy, StrategyKind};

const ZID_PRICE_SELECTORS: [&str; 3] = ["#product-price", ".product-formatted-price", ".product-price"];

/// Amount of one offer: `price`, `lowPrice` for an `AggregateOffer`, or a
/// nested `priceSpecification.price`.
fn offer_amount(offer: &Value) -> Option<f64> {
    text_field(offer, "price")
        .or_else(|| text_field(offer, "lowPrice"))
        .or_else(|| offer.get("priceSpecification").and_then(|s| text_field(s, "price")))
        .and_then(|text| chain::accept_price(&text))
}

/// Every offer of every product block, in order.
fn price_from_offers(page: &Page) -> Option<f64> {
    page.structured().products().find_map(|product| match product.get("offers")? {
        Value::Array(offers) => offers.iter().find_map(offer_amount),
        offer => offer_amount(offer),
    })
}

fn price_from_zid_selectors(page: &Page) -> Option<f64> {
    chain::price_from_selector_list(page, &ZID_PRICE_SELECTORS)
}

const ZID_PRICE_CHAIN: [Step<f64>; 5] = [
    Step::new("structured-data offers", price_from_offers),
    Step::new("price meta tags", chain::price_from_meta),
    Step::new("zid price selectors", price_from_zid_selectors),
    Step::new("price selectors", chain::price_from_selectors),
    Step::new("currency patterns", chain::price_from_patterns),
];

pub struct ZidStrategy;

impl ExtractionStrategy for ZidStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Zid
    }

    fn extract_name(&self, page: &Page) -> Option<String> {
        first_of(page, "name", &NAME_CHAIN)
    }

    fn extract_price(&self, page: &Page) -> Option<f64> {
        first_of(page, "price", &ZID_PRICE_CHAIN)
    }
}
