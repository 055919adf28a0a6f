//! factory-moon.com, a WooCommerce shop pricing in riyals.

use tracing::debug;

use crate::error::NumericParseError;
use crate::normalize::{
    self, RIYAL_MARKER, contains_arabic_digits, extract_numeric_amount, is_arabic_digit,
    plausibility_correct,
};
use crate::page::{Page, element_text};

use super::chain::{self, Step, first_of};
use super::{ExtractionStrategy, StrategyKind};

/// WooCommerce price markup, most specific first.
const WOO_PRICE_SELECTORS: [&str; 8] = [
    "span.price",
    "p.price",
    "div.price",
    ".product-price",
    ".woocommerce-Price-amount",
    "bdi",
    ".price ins",
    ".amount",
];

fn is_riyal_price(text: &str) -> bool {
    text.contains(RIYAL_MARKER) || text.contains("SAR") || contains_arabic_digits(text)
}

/// Arabic-Indic digits win outright: when any are present every other
/// character, separators included, is dropped.
fn woo_amount(text: &str) -> Result<f64, NumericParseError> {
    let stripped = text.replace(RIYAL_MARKER, "").replace("SAR", "");
    let arabic: String = stripped.chars().filter(|c| is_arabic_digit(*c)).collect();

    let amount = if arabic.is_empty() {
        extract_numeric_amount(&stripped)?
    } else {
        extract_numeric_amount(&normalize::to_ascii_digits(&arabic))?
    };
    Ok(plausibility_correct(amount))
}

fn name_from_product_title(page: &Page) -> Option<String> {
    page.first_text("h1.product_title")
}

fn price_from_woo_selectors(page: &Page) -> Option<f64> {
    WOO_PRICE_SELECTORS.iter().find_map(|css| {
        page.select(css)
            .iter()
            .filter_map(element_text)
            .filter(|text| is_riyal_price(text))
            .find_map(|text| match woo_amount(&text) {
                Ok(amount) if amount > 0.0 => Some(amount),
                Ok(_) => None,
                Err(e) => {
                    debug!(selector = *css, error = %e, "WooCommerce price rejected");
                    None
                }
            })
    })
}

fn name_from_whole_title(page: &Page) -> Option<String> {
    page.title()
}

const NAME_STEPS: [Step<String>; 4] = [
    Step::new("h1.product_title", name_from_product_title),
    Step::new("first h1", chain::name_from_h1),
    Step::new("og:title meta", chain::name_from_og_title),
    Step::new("title tag", name_from_whole_title),
];

const PRICE_STEPS: [Step<f64>; 1] = [Step::new("woocommerce selectors", price_from_woo_selectors)];

pub struct FactoryMoonStrategy;

impl ExtractionStrategy for FactoryMoonStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::FactoryMoon
    }

    fn extract_name(&self, page: &Page) -> Option<String> {
        first_of(page, "name", &NAME_STEPS)
    }

    fn extract_price(&self, page: &Page) -> Option<f64> {
        first_of(page, "price", &PRICE_STEPS)
    }
}
