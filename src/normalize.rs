//! Numeral and currency normalization.
//!
//! Prices on Arabic-locale storefronts are frequently written with
//! Arabic-Indic digits (`١٢٣`), sometimes with their Persian forms (`۱۲۳`),
//! and a riyal marker (`ر.س`). Everything in here turns such tokens into
//! plain `f64` amounts.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::NumericParseError;


/// Saudi riyal marker. Note the embedded `.`.
pub const RIYAL_MARKER: &str = "ر.س";

/// Amounts above this are assumed to have extraneous digits glued on.
pub const PLAUSIBILITY_THRESHOLD: f64 = 10_000.0;

static LEADING_AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.?\d{0,2}").expect("leading amount pattern is valid"));

/// Markers stripped before numeric extraction, longest first.
const CURRENCY_MARKERS: [&str; 7] = [RIYAL_MARKER, "ريال", "SAR", "USD", "$", "£", "€"];

/// Value of an Arabic-Indic (U+0660..) or Extended Arabic-Indic (U+06F0..)
/// digit, if `c` is one.
fn arabic_digit_value(c: char) -> Option<u32> {
    match c {
        '\u{0660}'..='\u{0669}' => Some(c as u32 - 0x0660),
        '\u{06F0}'..='\u{06F9}' => Some(c as u32 - 0x06F0),
        _ => None,
    }
}

pub fn is_arabic_digit(c: char) -> bool {
    arabic_digit_value(c).is_some()
}

pub fn contains_arabic_digits(text: &str) -> bool {
    text.chars().any(is_arabic_digit)
}

/// Maps every Arabic-Indic or Persian digit to its ASCII counterpart. All other
/// characters are left alone, so the function is idempotent.
pub fn to_ascii_digits(text: &str) -> String {
    text.chars()
        .map(|c| {
            arabic_digit_value(c)
                .and_then(|v| char::from_digit(v, 10))
                .unwrap_or(c)
        })
        .collect()
}

/// Removes known currency markers (riyal marker first, since it contains a dot).
pub fn strip_currency_markers(text: &str) -> String {
    CURRENCY_MARKERS
        .iter()
        .fold(text.to_string(), |acc, marker| acc.replace(*marker, ""))
}

/// Keeps only ASCII digits and dots, then parses. When several dots remain
/// only the last one is kept as the decimal point: `"1.234.56"` is `1234.56`.
pub fn extract_numeric_amount(text: &str) -> Result<f64, NumericParseError> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let collapsed = match cleaned.rfind('.') {
        Some(last) if cleaned[..last].contains('.') => {
            let mut head = cleaned[..last].replace('.', "");
            head.push_str(&cleaned[last..]);
            head
        }
        _ => cleaned,
    };

    if !collapsed.chars().any(|c| c.is_ascii_digit()) {
        return Err(NumericParseError {
            token: text.to_string(),
        });
    }

    collapsed
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| NumericParseError {
            token: text.to_string(),
        })
}

/// Lossy heuristic for amounts that look too large to be a price (for
/// instance a price run together with an SKU). Above the threshold the value
/// is re-read from the first `\d+\.?\d{0,2}` match of its string form, which
/// drops anything past the second decimal. Not a correctness guarantee.
pub fn plausibility_correct(amount: f64) -> f64 {
    if amount <= PLAUSIBILITY_THRESHOLD {
        return amount;
    }

    let rendered = amount.to_string();
    LEADING_AMOUNT
        .find(&rendered)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(amount)
}

/// Full pipeline used by the price chains: digits to ASCII, markers stripped,
/// numeric extraction, plausibility correction. Rejects non-positive amounts.
pub fn parse_price(text: &str) -> Result<f64, NumericParseError> {
    let ascii = to_ascii_digits(text);
    let amount = plausibility_correct(extract_numeric_amount(&strip_currency_markers(&ascii))?);

    if amount > 0.0 {
        Ok(amount)
    } else {
        Err(NumericParseError {
            token: text.to_string(),
        })
    }
}
