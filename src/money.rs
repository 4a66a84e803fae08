use std::sync::LazyLock;

use num_format::{Locale, ToFormattedString as _};
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::model::Currency;

// Longest leading number: optional sign, then `Infinity` or a decimal literal
// with an optional exponent. Anything after it is ignored.
static NUMERIC_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:Infinity|(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)")
        .expect("numeric prefix pattern is valid")
});

/// Reads the leading number of `value`, skipping leading whitespace.
/// `"12abc"` gives 12, `"abc"` gives `None`.
pub fn parse_price(value: &str) -> Option<f64> {
    let found = NUMERIC_PREFIX.find(value.trim_start())?;
    found.as_str().parse().ok()
}

/// Price text as shown in the preview.
///
/// Empty input counts as zero. Input without a leading number is shown
/// verbatim instead of being coerced.
pub fn format_money(value: &str, currency: Currency) -> String {
    let raw = if value.is_empty() { "0" } else { value };
    match parse_price(raw) {
        Some(amount) => format_amount(amount, currency),
        None => value.to_string(),
    }
}

/// en-US currency text: symbol prefix, `,` grouping, two fraction digits.
///
/// Rounds the shortest decimal form of `amount` half away from zero, so
/// `1.005` shows as `1.01`.
pub fn format_amount(amount: f64, currency: Currency) -> String {
    let sign = if amount.is_sign_negative() { "-" } else { "" };
    let magnitude = amount.abs();
    if magnitude.is_infinite() {
        return format!("{sign}{}∞", currency.symbol());
    }

    let fixed = two_places(magnitude);
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    // Beyond u128 the digits are shown ungrouped.
    let whole = match whole.parse::<u128>() {
        Ok(n) => n.to_formatted_string(&Locale::en),
        Err(_) => whole.to_string(),
    };
    format!("{sign}{}{whole}.{cents}", currency.symbol())
}

fn two_places(magnitude: f64) -> String {
    // `Display` gives the shortest round-trip form, never an exponent.
    let shortest = magnitude.to_string();
    match shortest.parse::<Decimal>() {
        Ok(exact) => {
            let mut rounded = exact.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            rounded.rescale(2);
            rounded.to_string()
        }
        // Out of Decimal range: huge values are whole numbers, tiny ones round to zero.
        Err(_) if shortest.contains('.') => format!("{magnitude:.2}"),
        Err(_) => format!("{shortest}.00"),
    }
}
