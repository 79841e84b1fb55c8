use serde::{Deserialize, Serialize};

use crate::category::Category;

/// Card palette derived from a product's category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeColors {
    pub primary: String,
    pub accent: String,
    pub background: String,
}

/// Caller-supplied palette override; each present, non-blank key replaces the
/// matching theme color.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorOverrides {
    #[serde(default)]
    pub primary: Option<String>,
    #[serde(default)]
    pub accent: Option<String>,
    #[serde(default)]
    pub background: Option<String>,
}

impl ColorOverrides {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        [&self.primary, &self.accent, &self.background]
            .iter()
            .all(|value| non_blank(value.as_deref()).is_none())
    }

    /// Fills keys unset in `self` from `fallback`.
    #[must_use]
    pub fn or(self, fallback: &ColorOverrides) -> ColorOverrides {
        ColorOverrides {
            primary: self.primary.or_else(|| fallback.primary.clone()),
            accent: self.accent.or_else(|| fallback.accent.clone()),
            background: self.background.or_else(|| fallback.background.clone()),
        }
    }
}

impl ThemeColors {
    #[must_use]
    pub fn with_overrides(mut self, overrides: &ColorOverrides) -> Self {
        if let Some(primary) = non_blank(overrides.primary.as_deref()) {
            self.primary = primary.to_string();
        }
        if let Some(accent) = non_blank(overrides.accent.as_deref()) {
            self.accent = accent.to_string();
        }
        if let Some(background) = non_blank(overrides.background.as_deref()) {
            self.background = background.to_string();
        }
        self
    }
}

const PALETTE: &[(Category, &str, &str, &str)] = &[
    (Category::Beauty, "#FF6B9D", "#C44569", "#FFF0F5"),
    (Category::Tech, "#4A90E2", "#357ABD", "#F0F8FF"),
    (Category::Fashion, "#9B59B6", "#8E44AD", "#F8F0FF"),
    (Category::Home, "#27AE60", "#229954", "#F0FFF0"),
    (Category::Books, "#E67E22", "#D35400", "#FFF8F0"),
    (Category::Accessories, "#F39C12", "#E67E22", "#FFFAF0"),
    (Category::General, "#EE4D2D", "#FF6B35", "#FFF5F2"),
];

/// Fixed palette lookup; the same category always yields the same colors.
#[must_use]
pub fn theme_colors(category: Category) -> ThemeColors {
    let (_, primary, accent, background) = PALETTE
        .iter()
        .find(|(c, ..)| *c == category)
        .copied()
        .unwrap_or(PALETTE[PALETTE.len() - 1]);

    ThemeColors {
        primary: primary.to_string(),
        accent: accent.to_string(),
        background: background.to_string(),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
