//! Shared price/currency text normalization used by every scraper.

use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::OnceLock;

/// Symbol matches take precedence over ISO code matches.
const CURRENCY_SYMBOLS: &[(&str, &str)] = &[
    ("₹", "INR"),
    ("€", "EUR"),
    ("$", "USD"),
    ("£", "GBP"),
    ("¥", "JPY"),
];

/// Candidate prices outside this open range are rejected as footnote numbers,
/// SKUs or review counts misread as prices.
const MIN_PLAUSIBLE: Decimal = Decimal::ZERO;
const MAX_PLAUSIBLE: Decimal = Decimal::from_parts(10_000_000, 0, 0, false, 0);

fn candidate_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[₹$€£¥]?\s?\d{1,3}(?:,\d{3})*(?:\.\d+)?").unwrap())
}

fn currency_code_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\b(USD|EUR|INR|GBP|JPY)\b").unwrap())
}

/// Parses free-form price text into a decimal. Strips everything except
/// digits, the decimal point and thousands separators, then drops the
/// separators. Returns `None` on anything unparseable; never panics.
pub fn parse_price(text: &str) -> Option<Decimal> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();
    let normalized = cleaned.replace(',', "");
    if normalized.is_empty() {
        return None;
    }
    Decimal::from_str(&normalized).ok()
}

/// Recognizes a currency from a symbol or a three-letter ISO code, symbol
/// taking precedence. Returns the ISO code.
pub fn parse_currency(text: &str) -> Option<String> {
    for (symbol, code) in CURRENCY_SYMBOLS {
        if text.contains(symbol) {
            return Some((*code).to_string());
        }
    }
    currency_code_regex()
        .find(text)
        .map(|m| m.as_str().to_uppercase())
}

/// Finds every currency-prefixed numeric substring, converts each with
/// [`parse_price`] and keeps only plausible figures.
pub fn extract_candidate_prices(text: &str) -> Vec<Decimal> {
    candidate_regex()
        .find_iter(text)
        .filter_map(|m| parse_price(m.as_str()))
        .filter(|price| *price > MIN_PLAUSIBLE && *price < MAX_PLAUSIBLE)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("$19.99", dec!(19.99))]
    #[case("₹1,23,456.50", dec!(123456.50))]
    #[case("1,299.99", dec!(1299.99))]
    #[case("EUR 50", dec!(50))]
    #[case("  42  ", dec!(42))]
    fn test_parse_price(#[case] text: &str, #[case] expected: Decimal) {
        assert_eq!(parse_price(text), Some(expected));
    }

    #[rstest]
    #[case("not a price")]
    #[case("")]
    #[case("...")]
    fn test_parse_price_failure(#[case] text: &str) {
        assert_eq!(parse_price(text), None);
    }

    #[rstest]
    #[case("₹1,23,456.50", "INR")]
    #[case("$19.99", "USD")]
    #[case("€50.00", "EUR")]
    #[case("£12", "GBP")]
    #[case("¥1500", "JPY")]
    #[case("price: 49 eur", "EUR")]
    #[case("49.00 USD", "USD")]
    fn test_parse_currency(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(parse_currency(text).as_deref(), Some(expected));
    }

    #[test]
    fn test_parse_currency_symbol_beats_code() {
        assert_eq!(parse_currency("USD ₹100").as_deref(), Some("INR"));
    }

    #[test]
    fn test_parse_currency_absent() {
        assert_eq!(parse_currency("49.00"), None);
    }

    #[test]
    fn test_extract_candidate_prices() {
        let candidates = extract_candidate_prices("Was $129.99, now $99.99");
        assert_eq!(candidates, vec![dec!(129.99), dec!(99.99)]);
    }

    #[test]
    fn test_extract_candidate_prices_filters_implausible() {
        let candidates = extract_candidate_prices("SKU 99,999,999 price $15.00 qty 0");
        assert_eq!(candidates, vec![dec!(15.00)]);
    }

    #[test]
    fn test_extract_candidate_prices_empty() {
        assert!(extract_candidate_prices("no numbers here").is_empty());
    }
}
