//! Best-effort strategy for pages that match no known platform.

use crate::error::{RequiredField, StrategyError};
use crate::page::Page;

use super::chain::{self, NAME_CHAIN, PRICE_CHAIN, Step, first_of};
use super::{ExtractionStrategy, StrategyKind};

/// Shared name chain, then the first `<h1>` as a last resort.
const GENERIC_NAME_CHAIN: [Step<String>; 4] = [
    NAME_CHAIN[0],
    NAME_CHAIN[1],
    NAME_CHAIN[2],
    Step::new("first h1", chain::name_from_h1),
];

pub struct GenericStrategy;

impl ExtractionStrategy for GenericStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Generic
    }

    fn extract_name(&self, page: &Page) -> Option<String> {
        first_of(page, "name", &GENERIC_NAME_CHAIN)
    }

    fn extract_price(&self, page: &Page) -> Option<f64> {
        first_of(page, "price", &PRICE_CHAIN)
    }

    fn missing(&self, field: RequiredField) -> StrategyError {
        StrategyError::UnsupportedSite { missing: field }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::page_from;

    fn extract(html: &str) -> Result<crate::models::ProductRecord, StrategyError> {
        GenericStrategy.extract(&page_from("https://shop.example/p/1", html))
    }

    #[test]
    fn structured_block_is_used_before_meta() {
        let record = extract(
            r#"<head>
                <meta property="og:title" content="Meta Name">
                <meta property="product:price:amount" content="5.00">
                <script type="application/ld+json">
                {"@type": "Product", "name": "Widget", "offers": {"price": "19.99"}}
                </script>
            </head>"#,
        )
        .expect("record");
        assert_eq!(record.name, "Widget");
        assert_eq!(record.price, 19.99);
        assert_eq!(record.strategy, StrategyKind::Generic);
    }

    #[test]
    fn title_and_price_class_element() {
        let record = extract(
            r#"<html><head><title>Widget - Best Store</title></head>
               <body><span class="price">SAR 49</span></body></html>"#,
        )
        .expect("record");
        assert_eq!(record.name, "Widget");
        assert_eq!(record.price, 49.0);
    }

    #[test]
    fn h1_is_the_last_name_source() {
        let record = extract("<title></title><h1> Desk Lamp </h1><p>$ 35.5</p>").expect("record");
        assert_eq!(record.name, "Desk Lamp");
        assert_eq!(record.price, 35.5);
    }

    #[test]
    fn grouped_thousands_in_body_text() {
        let record = extract("<title>Sofa</title><p>Now only $1,299.00</p>").expect("record");
        assert_eq!(record.price, 1299.0);

        let record = extract("<title>Sofa</title><p>2,450 ر.س</p>").expect("record");
        assert_eq!(record.price, 2450.0);
    }

    #[test]
    fn unparsable_offer_price_falls_back_to_meta() {
        let record = extract(
            r#"<head>
                <meta property="product:price:amount" content="25.00">
                <script type="application/ld+json">
                {"@type": "Product", "name": "Widget", "offers": {"price": "call us"}}
                </script>
            </head>"#,
        )
        .expect("record");
        assert_eq!(record.name, "Widget");
        assert_eq!(record.price, 25.0);
    }

    #[test]
    fn nothing_to_find_is_unsupported() {
        let err = extract("<html><head><title></title></head><body><p>hello</p></body></html>")
            .expect_err("no record");
        assert_eq!(
            err,
            StrategyError::UnsupportedSite {
                missing: RequiredField::Name
            }
        );
    }

    #[test]
    fn name_without_price_is_unsupported() {
        let err = extract("<title>Widget</title>").expect_err("no price");
        assert_eq!(err.missing_field(), RequiredField::Price);
    }
}
