//! Original-price derivation from a current price and a discount rate.

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    /// A rate of 100% or more has no finite original price.
    #[error("invalid discount rate {0}%: must be below 100")]
    InvalidDiscount(Decimal),

    #[error("price must be non-negative, got {0}")]
    NegativePrice(Decimal),

    #[error("original price for {price} at {rate}% exceeds the representable range")]
    Overflow { price: Decimal, rate: Decimal },
}

/// Derives the pre-discount price: `price / (1 - rate / 100)`, rounded to two
/// decimals half away from zero.
///
/// Returns `Ok(None)` when there is no discount to show (`rate <= 0`).
///
/// # Errors
///
/// - [`PricingError::InvalidDiscount`] when `rate >= 100`. Callers suppress the
///   discount badge and line rather than failing the render.
/// - [`PricingError::NegativePrice`] when `price < 0`.
/// - [`PricingError::Overflow`] when the result does not fit a `Decimal`.
pub fn compute_original_price(
    price: Decimal,
    discount_rate_percent: Decimal,
) -> Result<Option<Decimal>, PricingError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(PricingError::NegativePrice(price));
    }
    if discount_rate_percent <= Decimal::ZERO {
        return Ok(None);
    }
    if discount_rate_percent >= Decimal::ONE_HUNDRED {
        return Err(PricingError::InvalidDiscount(discount_rate_percent));
    }

    // price * 100 / (100 - rate) keeps the division exact for integral rates.
    let original = price
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(Decimal::ONE_HUNDRED - discount_rate_percent))
        .ok_or(PricingError::Overflow {
            price,
            rate: discount_rate_percent,
        })?;

    Ok(Some(round_currency(original)))
}

/// Rounds to cents, half away from zero.
#[must_use]
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Discount rate rounded to a whole percent for badges and copy, e.g. `"-15%"`.
#[must_use]
pub fn discount_badge_text(discount_rate_percent: Decimal) -> String {
    let whole = discount_rate_percent
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    format!("-{}%", whole.normalize())
}
