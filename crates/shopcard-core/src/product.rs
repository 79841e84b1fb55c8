//! Product ingress: the loosely typed record from the catalogue client and
//! its validated counterpart used by every downstream component.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::pricing::{compute_original_price, PricingError};
use crate::CoreError;

/// Product record as the affiliate catalogue client emits it.
///
/// Numeric fields arrive as decimal strings (`"89.90"`) or bare JSON
/// numbers depending on the endpoint; both are accepted.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawProduct {
    #[serde(deserialize_with = "loose_string")]
    pub item_id: Option<String>,
    pub product_name: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub price: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub price_discount_rate: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub sales: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub rating_star: Option<String>,
    pub shop_name: Option<String>,
    pub image_url: Option<String>,
    pub offer_link: Option<String>,
    pub free_shipping: Option<bool>,
}

/// A validated product. Built only through [`normalize_product`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub item_id: String,
    pub product_name: String,
    /// Current price in store currency; never negative.
    pub price: Decimal,
    /// Discount percentage, `None` when absent, zero, or unparseable.
    pub price_discount_rate: Option<Decimal>,
    pub sales: u64,
    /// Star rating in `(0, 5]`; `None` when the catalogue has no rating.
    pub rating_star: Option<Decimal>,
    pub shop_name: Option<String>,
    /// May be empty; layout substitutes a placeholder.
    pub image_url: String,
    pub offer_link: Option<String>,
    pub free_shipping: Option<bool>,
}

impl Product {
    /// Positive discount rate, if any.
    #[must_use]
    pub fn discount_rate(&self) -> Option<Decimal> {
        self.price_discount_rate.filter(|rate| *rate > Decimal::ZERO)
    }

    /// Pre-discount price for display.
    ///
    /// # Errors
    ///
    /// Propagates [`PricingError`] from [`compute_original_price`]; a rate of
    /// 100% or more yields [`PricingError::InvalidDiscount`].
    pub fn original_price(&self) -> Result<Option<Decimal>, PricingError> {
        match self.discount_rate() {
            Some(rate) => compute_original_price(self.price, rate),
            None => Ok(None),
        }
    }

    /// `true` only when the catalogue (or the ingress heuristic) says so.
    #[must_use]
    pub fn ships_free(&self) -> bool {
        self.free_shipping == Some(true)
    }
}

/// Validates a raw record into a [`Product`].
///
/// Missing or malformed optional numbers degrade to documented defaults
/// (`sales` 0, no discount, no rating). A missing price becomes zero.
///
/// # Errors
///
/// - [`CoreError::MissingField`] when `itemId` is absent or blank.
/// - [`CoreError::InvalidField`] when `price` is present but not a
///   non-negative decimal.
pub fn normalize_product(raw: RawProduct) -> Result<Product, CoreError> {
    let item_id = non_blank(raw.item_id).ok_or(CoreError::MissingField("itemId"))?;

    let price = match non_blank(raw.price) {
        Some(text) => {
            let value = parse_decimal(&text).ok_or_else(|| CoreError::InvalidField {
                field: "price",
                reason: format!("'{text}' is not a decimal number"),
            })?;
            if value.is_sign_negative() && !value.is_zero() {
                return Err(CoreError::InvalidField {
                    field: "price",
                    reason: format!("'{text}' is negative"),
                });
            }
            value
        }
        None => {
            tracing::warn!(item_id = %item_id, "product has no price; defaulting to zero");
            Decimal::ZERO
        }
    };

    let price_discount_rate = non_blank(raw.price_discount_rate).and_then(|text| {
        let parsed = parse_decimal(&text);
        if parsed.is_none() {
            tracing::warn!(item_id = %item_id, value = %text, "ignoring malformed discount rate");
        }
        parsed.filter(|rate| *rate > Decimal::ZERO)
    });

    let sales = non_blank(raw.sales)
        .and_then(|text| parse_decimal(&text))
        .filter(|value| !value.is_sign_negative())
        .and_then(|value| u64::try_from(value.trunc()).ok())
        .unwrap_or(0);

    let rating_star = non_blank(raw.rating_star)
        .and_then(|text| parse_decimal(&text))
        .filter(|rating| *rating > Decimal::ZERO && *rating <= Decimal::from(5));

    let product_name = raw.product_name.map(|n| n.trim().to_string()).unwrap_or_default();

    let free_shipping = raw
        .free_shipping
        .or_else(|| infer_free_shipping(&product_name, price_discount_rate));

    Ok(Product {
        item_id,
        product_name,
        price,
        price_discount_rate,
        sales,
        rating_star,
        shop_name: non_blank(raw.shop_name),
        image_url: raw.image_url.map(|u| u.trim().to_string()).unwrap_or_default(),
        offer_link: non_blank(raw.offer_link),
        free_shipping,
    })
}

/// Low-confidence guess used only when the catalogue omits `freeShipping`:
/// a free-shipping phrase in the name, or a discount above 50%.
fn infer_free_shipping(product_name: &str, discount_rate: Option<Decimal>) -> Option<bool> {
    const PHRASES: &[&str] = &["frete grátis", "frete gratis", "free shipping"];

    let lower = product_name.to_lowercase();
    let by_name = PHRASES.iter().any(|phrase| lower.contains(phrase));
    let by_discount = discount_rate.is_some_and(|rate| rate > Decimal::from(50));

    (by_name || by_discount).then_some(true)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Accepts plain and scientific notation (`"1e3"`), rejecting anything else.
fn parse_decimal(text: &str) -> Option<Decimal> {
    let text = text.trim();
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseValue {
    Text(String),
    Unsigned(u64),
    Signed(i64),
    Float(f64),
}

fn loose_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<LooseValue>::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        LooseValue::Text(s) => s,
        LooseValue::Unsigned(n) => n.to_string(),
        LooseValue::Signed(n) => n.to_string(),
        LooseValue::Float(n) => n.to_string(),
    }))
}
