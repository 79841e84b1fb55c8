use shopcard_core::{format_count, format_money, Product};

/// Plain-text product summary shipped alongside the cards.
///
/// Lines for absent facts (rating, discount, shop, link) are left out rather
/// than printed empty.
#[must_use]
pub fn metadata_text(product: &Product, description: &str, currency_symbol: &str) -> String {
    let mut lines = vec![
        format!("Product: {}", product.product_name),
        format!("Item ID: {}", product.item_id),
        format!("Price: {}", format_money(product.price, currency_symbol)),
    ];

    if let (Some(rate), Ok(Some(original))) = (product.discount_rate(), product.original_price()) {
        lines.push(format!(
            "Original price: {}",
            format_money(original, currency_symbol)
        ));
        lines.push(format!("Discount: {}%", rate.normalize()));
    }
    if let Some(rating) = product.rating_star {
        lines.push(format!("Rating: {}/5", rating.normalize()));
    }
    lines.push(format!("Sales: {}", format_count(product.sales)));
    if let Some(shop) = &product.shop_name {
        lines.push(format!("Shop: {shop}"));
    }
    if product.ships_free() {
        lines.push("Free shipping: yes".to_string());
    }
    if let Some(link) = &product.offer_link {
        lines.push(format!("Link: {link}"));
    }
    if !product.image_url.trim().is_empty() {
        lines.push(format!("Image: {}", product.image_url.trim()));
    }

    let description = description.trim();
    if !description.is_empty() {
        lines.push(String::new());
        lines.push("Description:".to_string());
        lines.push(description.to_string());
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;

    use super::*;

    fn product() -> Product {
        Product {
            item_id: "321".to_string(),
            product_name: "Luminária LED".to_string(),
            price: Decimal::from_str("45.00").unwrap(),
            price_discount_rate: Some(Decimal::from(25)),
            sales: 2_048,
            rating_star: None,
            shop_name: Some("Casa & Cia".to_string()),
            image_url: String::new(),
            offer_link: Some("https://s.shopee.com.br/abc".to_string()),
            free_shipping: None,
        }
    }

    #[test]
    fn summary_lists_known_facts() {
        let text = metadata_text(&product(), "Great lamp.", "R$");
        assert_eq!(
            text,
            "Product: Luminária LED\n\
             Item ID: 321\n\
             Price: R$ 45.00\n\
             Original price: R$ 60.00\n\
             Discount: 25%\n\
             Sales: 2,048\n\
             Shop: Casa & Cia\n\
             Link: https://s.shopee.com.br/abc\n\
             \n\
             Description:\n\
             Great lamp.\n"
        );
    }

    #[test]
    fn absent_rating_is_not_printed() {
        assert!(!metadata_text(&product(), "", "R$").contains("Rating"));
    }

    #[test]
    fn invalid_discount_is_left_out() {
        let mut p = product();
        p.price_discount_rate = Some(Decimal::from(150));
        let text = metadata_text(&p, "", "R$");
        assert!(!text.contains("Discount"));
        assert!(!text.contains("Original price"));
    }

    #[test]
    fn blank_description_has_no_section() {
        assert!(!metadata_text(&product(), "  ", "R$").contains("Description:"));
    }
}
