//! Display formatting for prices and counters.

use rust_decimal::{Decimal, RoundingStrategy};

/// Currency symbol used when neither the request nor the profile sets one.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "R$";

/// Formats `amount` as `"{symbol} 1,234.56"`: thousands grouped with commas
/// and exactly two decimal digits, rounded half away from zero.
#[must_use]
pub fn format_money(amount: Decimal, symbol: &str) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let abs = rounded.abs();
    let whole = abs.trunc();
    let cents = ((abs - whole) * Decimal::ONE_HUNDRED).trunc();

    let digits = whole.to_string();
    let cents = cents.to_string();
    let body = format!("{}.{cents:0>2}", group_thousands(&digits));
    if symbol.is_empty() {
        format!("{sign}{body}")
    } else {
        format!("{sign}{symbol} {body}")
    }
}

/// Formats a star rating with exactly one decimal, rounded half away from
/// zero: `4.25` becomes `"4.3"`, `5` becomes `"5.0"`.
#[must_use]
pub fn format_rating(rating: Decimal) -> String {
    let rounded = rating.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.1}")
}

/// Formats an integer counter with comma thousands separators.
#[must_use]
pub fn format_count(value: u64) -> String {
    group_thousands(&value.to_string())
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
