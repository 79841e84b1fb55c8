//! Template copy composed locally from product fields.

use rand::Rng;
use rust_decimal::RoundingStrategy;
use shopcard_core::{
    classify, format_count, format_money, format_rating, Product, DEFAULT_CURRENCY_SYMBOL,
};

use crate::cta::pick_cta;

const EMPTY_NAME_PLACEHOLDER: &str = "Special offer";

/// Composes promotional copy without any external service.
///
/// Output sections, in order: header, name, price, optional discount,
/// optional rating, sales, optional free shipping, call to action, hashtags.
/// Only the call to action is random.
#[derive(Debug, Clone)]
pub struct FallbackGenerator {
    currency_symbol: String,
}

impl Default for FallbackGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CURRENCY_SYMBOL)
    }
}

impl FallbackGenerator {
    #[must_use]
    pub fn new(currency_symbol: impl Into<String>) -> Self {
        Self {
            currency_symbol: currency_symbol.into(),
        }
    }

    /// Generates copy with the thread-local random source.
    #[must_use]
    pub fn generate(&self, product: &Product) -> String {
        self.generate_with_rng(product, &mut rand::rng())
    }

    /// Generates copy with an injected random source for the call to action.
    pub fn generate_with_rng<R: Rng + ?Sized>(&self, product: &Product, rng: &mut R) -> String {
        let category = classify(&product.product_name);
        let (lead, trail) = category.emojis();

        let name = if product.product_name.is_empty() {
            EMPTY_NAME_PLACEHOLDER
        } else {
            product.product_name.as_str()
        };

        let mut lines = vec![
            format!("{lead} SUPER OFFER {trail}"),
            String::new(),
            name.to_string(),
            String::new(),
            format!(
                "💰 Price: {}",
                format_money(product.price, &self.currency_symbol)
            ),
        ];

        if let Some(line) = self.discount_line(product) {
            lines.push(line);
        }

        if let Some(rating) = product.rating_star {
            lines.push(format!("⭐ Rating: {}/5", format_rating(rating)));
        }

        lines.push(format!("📦 {} sold", format_count(product.sales)));

        if product.ships_free() {
            lines.push("🚚 Free shipping!".to_string());
        }

        lines.push(String::new());
        lines.push(pick_cta(rng).to_string());
        lines.push(category.hashtags().to_string());

        lines.join("\n")
    }

    fn discount_line(&self, product: &Product) -> Option<String> {
        let rate = product.discount_rate()?;
        match product.original_price() {
            Ok(Some(original)) => {
                let whole = rate.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
                Some(format!(
                    "🏷️ {}% OFF (was {})",
                    whole.normalize(),
                    format_money(original, &self.currency_symbol)
                ))
            }
            Ok(None) => None,
            Err(error) => {
                tracing::warn!(
                    item_id = %product.item_id,
                    rate = %rate,
                    error = %error,
                    "omitting discount line"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rust_decimal::Decimal;

    use super::*;
    use crate::cta::CALLS_TO_ACTION;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn product() -> Product {
        Product {
            item_id: "1001".to_string(),
            product_name: "Vestido Floral Verão".to_string(),
            price: dec("89.99"),
            price_discount_rate: Some(dec("10")),
            sales: 12_345,
            rating_star: Some(dec("4.8")),
            shop_name: Some("Loja Oficial".to_string()),
            image_url: "https://cf.shopee.com.br/file/abc".to_string(),
            offer_link: None,
            free_shipping: Some(true),
        }
    }

    fn generate(product: &Product) -> String {
        FallbackGenerator::default().generate_with_rng(product, &mut StdRng::seed_from_u64(1))
    }

    #[test]
    fn sections_appear_in_order() {
        let text = generate(&product());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "👗 SUPER OFFER ✨");
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "Vestido Floral Verão");
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "💰 Price: R$ 89.99");
        assert_eq!(lines[5], "🏷️ 10% OFF (was R$ 99.99)");
        assert_eq!(lines[6], "⭐ Rating: 4.8/5");
        assert_eq!(lines[7], "📦 12,345 sold");
        assert_eq!(lines[8], "🚚 Free shipping!");
        assert_eq!(lines[9], "");
        assert!(CALLS_TO_ACTION.contains(&lines[10]), "unexpected CTA {}", lines[10]);
        assert_eq!(lines[11], "#fashion #style #ootd #shopee #deals");
        assert_eq!(lines.len(), 12);
    }

    #[test]
    fn absent_rating_emits_no_rating_line() {
        let mut p = product();
        p.rating_star = None;
        let text = generate(&p);
        assert!(!text.contains('⭐'), "rating line fabricated: {text}");
        assert!(!text.contains("Rating"));
    }

    #[test]
    fn present_rating_is_printed_verbatim() {
        let text = generate(&product());
        assert!(text.contains("4.8"));
    }

    #[test]
    fn midpoint_rating_rounds_up() {
        let mut p = product();
        p.rating_star = Some(dec("4.25"));
        assert!(generate(&p).contains("⭐ Rating: 4.3/5"));
    }

    #[test]
    fn whole_rating_keeps_one_decimal() {
        let mut p = product();
        p.rating_star = Some(dec("5"));
        assert!(generate(&p).contains("⭐ Rating: 5.0/5"));
    }

    #[test]
    fn no_discount_line_without_discount() {
        let mut p = product();
        p.price_discount_rate = None;
        let text = generate(&p);
        assert!(!text.contains("OFF"));
    }

    #[test]
    fn invalid_discount_is_omitted_not_fatal() {
        let mut p = product();
        p.price_discount_rate = Some(dec("100"));
        let text = generate(&p);
        assert!(!text.contains("OFF"));
        assert!(text.contains("R$ 89.99"));
    }

    #[test]
    fn free_shipping_line_requires_explicit_true() {
        let mut p = product();
        p.free_shipping = None;
        assert!(!generate(&p).contains("Free shipping"));
        p.free_shipping = Some(false);
        assert!(!generate(&p).contains("Free shipping"));
    }

    #[test]
    fn price_always_has_two_decimals() {
        let mut p = product();
        p.price = dec("7");
        let text = generate(&p);
        assert!(text.contains("R$ 7.00"));
    }

    #[test]
    fn zero_price_product_still_renders() {
        let mut p = product();
        p.price = Decimal::ZERO;
        p.price_discount_rate = None;
        p.sales = 0;
        assert!(generate(&p).contains("💰 Price: R$ 0.00"));
    }

    #[test]
    fn empty_name_uses_placeholder_and_general_theme() {
        let mut p = product();
        p.product_name = String::new();
        let text = generate(&p);
        assert!(text.starts_with("🔥 SUPER OFFER 🛍️"));
        assert!(text.contains(EMPTY_NAME_PLACEHOLDER));
        assert!(text.ends_with("#offer #bestseller #shopping #shopee #deals"));
    }

    #[test]
    fn custom_currency_symbol_is_used() {
        let text = FallbackGenerator::new("US$")
            .generate_with_rng(&product(), &mut StdRng::seed_from_u64(3));
        assert!(text.contains("💰 Price: US$ 89.99"));
    }

    #[test]
    fn unseeded_generation_is_non_empty() {
        assert!(!FallbackGenerator::default().generate(&product()).is_empty());
    }
}
