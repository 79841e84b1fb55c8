//! Keyword classification of product names into card categories.
//!
//! One ordered rule table drives classification, the emoji pair used in copy
//! headers and the hashtag line, so the three never drift apart.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Beauty,
    Tech,
    Fashion,
    Home,
    Books,
    Accessories,
    General,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Beauty,
        Category::Tech,
        Category::Fashion,
        Category::Home,
        Category::Books,
        Category::Accessories,
        Category::General,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Beauty => "beauty",
            Category::Tech => "tech",
            Category::Fashion => "fashion",
            Category::Home => "home",
            Category::Books => "books",
            Category::Accessories => "accessories",
            Category::General => "general",
        }
    }

    /// Emoji pair framing the "SUPER OFFER" header.
    #[must_use]
    pub fn emojis(self) -> (&'static str, &'static str) {
        match self {
            Category::Beauty => ("💄", "✨"),
            Category::Tech => ("📱", "⚡"),
            Category::Fashion => ("👗", "✨"),
            Category::Home => ("🏠", "✨"),
            Category::Books => ("📚", "✨"),
            Category::Accessories => ("💍", "✨"),
            Category::General => ("🔥", "🛍️"),
        }
    }

    #[must_use]
    pub fn hashtags(self) -> &'static str {
        match self {
            Category::Beauty => "#beauty #makeup #selfcare #shopee #deals",
            Category::Tech => "#tech #gadgets #electronics #shopee #deals",
            Category::Fashion => "#fashion #style #ootd #shopee #deals",
            Category::Home => "#home #decor #kitchen #shopee #deals",
            Category::Books => "#books #reading #booklover #shopee #deals",
            Category::Accessories => "#accessories #jewelry #style #shopee #deals",
            Category::General => "#offer #bestseller #shopping #shopee #deals",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered rules; the first matching pattern wins. `General` has no rule and
/// is the fallback.
///
/// Each alternation is anchored at a leading word boundary and tolerates a
/// plural suffix, so `"ring"` matches `"rings"` but not `"string"`.
const RULES: &[(Category, &str)] = &[
    (
        Category::Beauty,
        r"(?i)\b(?:makeup|make-up|maquiagem|lipstick|batom|blush|eyeshadow|sombra|cosmetic|cosm[eé]tico|perfume|skincare|s[eé]rum|rimel|r[ií]mel|mascara|base l[ií]quida)(?:s|es)?\b",
    ),
    (
        Category::Tech,
        r"(?i)\b(?:phone|smartphone|iphone|samsung|xiaomi|celular|electronics?|eletr[oô]nico|gadget|headset|headphone|fone|earbuds?|bluetooth|carregador|charger|smartwatch|notebook|laptop|tablet)(?:s|es)?\b",
    ),
    (
        Category::Fashion,
        r"(?i)\b(?:shirt|t-shirt|camisa|camiseta|blouse|blusa|dress|vestido|pants|cal[cç]a|saia|skirt|jaqueta|jacket|fashion|moda|bermuda|shorts)(?:s|es)?\b",
    ),
    (
        Category::Home,
        r"(?i)\b(?:home|casa|kitchen|cozinha|decor|decora[cç][aã]o|furniture|m[oó]vel|m[oó]veis|utensil|utens[ií]lio|organizador|lumin[aá]ria)(?:s|es)?\b",
    ),
    (
        Category::Books,
        r"(?i)\b(?:book|livro|reading|leitura|literature|literatura|novel|romance)(?:s|es)?\b",
    ),
    (
        Category::Accessories,
        r"(?i)\b(?:jewelry|jewellery|joia|j[oó]ia|necklace|colar|bracelet|pulseira|ring|anel|an[eé]is|earring|brinco|accessory|accessories|acess[oó]rio)(?:s|es)?\b",
    ),
];

static COMPILED_RULES: LazyLock<Vec<(Category, Regex)>> = LazyLock::new(|| {
    RULES
        .iter()
        .map(|(category, pattern)| (*category, Regex::new(pattern).expect("valid regex")))
        .collect()
});

/// Classifies a free-text product name. Total over all strings; empty or
/// unmatched names map to [`Category::General`].
#[must_use]
pub fn classify(product_name: &str) -> Category {
    let name = product_name.trim();
    if name.is_empty() {
        return Category::General;
    }

    COMPILED_RULES
        .iter()
        .find(|(_, re)| re.is_match(name))
        .map_or(Category::General, |(category, _)| *category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iphone_is_tech() {
        assert_eq!(classify("iPhone 14 Pro Max"), Category::Tech);
    }

    #[test]
    fn portuguese_dress_is_fashion() {
        assert_eq!(classify("Vestido Floral Verão"), Category::Fashion);
    }

    #[test]
    fn empty_and_blank_names_are_general() {
        assert_eq!(classify(""), Category::General);
        assert_eq!(classify("   "), Category::General);
    }

    #[test]
    fn classification_is_deterministic() {
        let name = "Batom Matte Longa Duração";
        assert_eq!(classify(name), classify(name));
        assert_eq!(classify(name), Category::Beauty);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(classify("KITCHEN KNIFE SET"), Category::Home);
        assert_eq!(classify("wireless HEADSET"), Category::Tech);
    }

    #[test]
    fn earlier_rule_wins_when_several_match() {
        // beauty precedes tech
        assert_eq!(classify("Makeup mirror with bluetooth speaker"), Category::Beauty);
        // tech precedes accessories
        assert_eq!(classify("Smartwatch pulseira silicone"), Category::Tech);
    }

    #[test]
    fn plurals_match() {
        assert_eq!(classify("Kit 3 Camisetas Básicas"), Category::Fashion);
        assert_eq!(classify("Brincos dourados"), Category::Accessories);
        assert_eq!(classify("Livros infantis"), Category::Books);
    }

    #[test]
    fn word_boundary_prevents_substring_hits() {
        // "string" must not hit the accessories "ring" keyword
        assert_eq!(classify("Guitar string pack"), Category::General);
        // "notebook" is tech, not books
        assert_eq!(classify("Notebook Gamer 16GB"), Category::Tech);
    }

    #[test]
    fn unmatched_name_is_general() {
        assert_eq!(classify("Garden hose 20m"), Category::General);
    }

    #[test]
    fn every_category_has_distinct_hashtags() {
        let mut seen = std::collections::HashSet::new();
        for category in Category::ALL {
            assert!(seen.insert(category.hashtags()), "{category} reuses hashtags");
        }
    }
}
