//! darenfactory.com.
//!
//! The storefront prints prices only as Arabic-Indic digit runs with no
//! reliable markup around them, so the raw document is scanned for runs of
//! two to four digits and the first one is taken.

use std::sync::LazyLock;

use regex::Regex;

use crate::normalize::{extract_numeric_amount, to_ascii_digits};
use crate::page::Page;

use super::chain::{Step, first_of, first_segment};
use super::{ExtractionStrategy, StrategyKind};

static ARABIC_DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[٠-٩]+").expect("digit run pattern is valid"));

/// Digit-run lengths accepted as a price.
const PRICE_RUN_LEN: std::ops::RangeInclusive<usize> = 2..=4;

fn name_from_title(page: &Page) -> Option<String> {
    page.title().and_then(|t| first_segment(&t, &['-']))
}

fn name_from_og_title(page: &Page) -> Option<String> {
    page.meta("og:title").and_then(|t| first_segment(&t, &['-']))
}

fn price_from_digit_runs(page: &Page) -> Option<f64> {
    ARABIC_DIGIT_RUN
        .find_iter(page.html())
        .map(|m| m.as_str())
        .filter(|run| PRICE_RUN_LEN.contains(&run.chars().count()))
        .find_map(|run| extract_numeric_amount(&to_ascii_digits(run)).ok())
        .filter(|amount| *amount > 0.0)
}

const NAME_STEPS: [Step<String>; 2] = [
    Step::new("title tag", name_from_title),
    Step::new("og:title meta", name_from_og_title),
];

const PRICE_STEPS: [Step<f64>; 1] = [Step::new("arabic digit runs", price_from_digit_runs)];

pub struct DarenFactoryStrategy;

impl ExtractionStrategy for DarenFactoryStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::DarenFactory
    }

    fn extract_name(&self, page: &Page) -> Option<String> {
        first_of(page, "name", &NAME_STEPS)
    }

    fn extract_price(&self, page: &Page) -> Option<f64> {
        first_of(page, "price", &PRICE_STEPS)
    }
}
