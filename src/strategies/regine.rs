//! regine-sa.com, which renders name and price as `<h1>` headings.

use tracing::debug;

use crate::normalize::{RIYAL_MARKER, extract_numeric_amount, to_ascii_digits};
use crate::page::{Page, element_text};

use super::chain::{self, Step, first_of};
use super::{ExtractionStrategy, StrategyKind};

/// Text before the riyal marker of the first heading carrying one.
fn price_from_heading(page: &Page) -> Option<f64> {
    page.select("h1")
        .iter()
        .filter_map(element_text)
        .filter(|text| text.contains(RIYAL_MARKER))
        .find_map(|text| {
            let amount = text.split(RIYAL_MARKER).next().unwrap_or_default();
            match extract_numeric_amount(&to_ascii_digits(amount)) {
                Ok(value) if value > 0.0 => Some(value),
                Ok(_) => None,
                Err(e) => {
                    debug!(error = %e, "Heading price rejected");
                    None
                }
            }
        })
}

const NAME_STEPS: [Step<String>; 1] = [Step::new("first h1", chain::name_from_h1)];
const PRICE_STEPS: [Step<f64>; 1] = [Step::new("h1 with riyal marker", price_from_heading)];

pub struct RegineStrategy;

impl ExtractionStrategy for RegineStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::RegineSa
    }

    fn extract_name(&self, page: &Page) -> Option<String> {
        first_of(page, "name", &NAME_STEPS)
    }

    fn extract_price(&self, page: &Page) -> Option<f64> {
        first_of(page, "price", &PRICE_STEPS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StrategyError;
    use crate::page::page_from;

    #[test]
    fn name_and_price_from_headings() {
        let page = page_from(
            "https://regine-sa.com/products/dress",
            "<h1> فستان سهرة </h1><h1>٣٥٠ ر.س</h1>",
        );
        let record = RegineStrategy.extract(&page).expect("record");
        assert_eq!(record.name, "فستان سهرة");
        assert_eq!(record.price, 350.0);
        assert_eq!(record.strategy, StrategyKind::RegineSa);
    }

    #[test]
    fn decimal_heading_price() {
        let page = page_from("https://regine-sa.com/p", "<h1>Dress</h1><h1>199.50 ر.س</h1>");
        assert_eq!(RegineStrategy.extract(&page).expect("record").price, 199.5);
    }

    #[test]
    fn heading_without_marker_is_missing_price() {
        let page = page_from("https://regine-sa.com/p", "<h1>Dress</h1><p>350 ر.س</p>");
        assert_eq!(RegineStrategy.extract(&page).expect_err("no price"), StrategyError::MissingPrice);
    }
}
