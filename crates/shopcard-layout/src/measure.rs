//! Text measurement seam between layout and whatever surface paints the card.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Regular,
    Bold,
}

impl FontWeight {
    #[must_use]
    pub fn css_weight(self) -> u16 {
        match self {
            Self::Regular => 400,
            Self::Bold => 700,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FontSpec {
    pub size_px: f32,
    pub weight: FontWeight,
}

impl FontSpec {
    #[must_use]
    pub fn regular(size_px: f32) -> Self {
        Self {
            size_px,
            weight: FontWeight::Regular,
        }
    }

    #[must_use]
    pub fn bold(size_px: f32) -> Self {
        Self {
            size_px,
            weight: FontWeight::Bold,
        }
    }
}

/// Measures rendered text width in pixels.
///
/// A real rendering surface supplies exact metrics; layout only needs widths.
pub trait TextMeasurer: Send + Sync {
    fn measure_text_width(&self, text: &str, font: &FontSpec) -> f32;
}

/// Width estimate from per-character advance classes of a generic sans-serif.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproxMeasurer;

const BOLD_FACTOR: f32 = 1.06;

fn advance_em(c: char) -> f32 {
    match c {
        ' ' | 'i' | 'l' | 'j' | 'I' | '!' | '|' | '\'' | '.' | ',' | ':' | ';' => 0.28,
        'f' | 't' | 'r' | '(' | ')' | '[' | ']' | '-' => 0.36,
        'm' | 'w' => 0.82,
        'M' | 'W' | '@' | '%' => 0.9,
        'A'..='Z' | '0'..='9' | '$' | '#' | '&' => 0.64,
        c if c.is_ascii() => 0.52,
        // Emoji and other pictographs render roughly square.
        c if u32::from(c) >= 0x2600 => 1.0,
        // Latin-1 and other accented letters.
        _ => 0.56,
    }
}

impl TextMeasurer for ApproxMeasurer {
    fn measure_text_width(&self, text: &str, font: &FontSpec) -> f32 {
        let em: f32 = text
            .chars()
            .filter(|c| !matches!(c, '\u{fe0f}' | '\u{200d}'))
            .map(advance_em)
            .sum();
        let weight = match font.weight {
            FontWeight::Regular => 1.0,
            FontWeight::Bold => BOLD_FACTOR,
        };
        em * font.size_px * weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_has_zero_width() {
        assert!(ApproxMeasurer
            .measure_text_width("", &FontSpec::regular(40.0))
            .abs()
            < f32::EPSILON);
    }

    #[test]
    fn width_scales_with_font_size() {
        let small = ApproxMeasurer.measure_text_width("Headphones", &FontSpec::regular(20.0));
        let large = ApproxMeasurer.measure_text_width("Headphones", &FontSpec::regular(40.0));
        assert!((large - 2.0 * small).abs() < 0.01);
    }

    #[test]
    fn bold_is_wider_than_regular() {
        let regular = ApproxMeasurer.measure_text_width("Deal", &FontSpec::regular(30.0));
        let bold = ApproxMeasurer.measure_text_width("Deal", &FontSpec::bold(30.0));
        assert!(bold > regular);
    }

    #[test]
    fn wide_glyphs_measure_wider_than_narrow_ones() {
        let font = FontSpec::regular(30.0);
        assert!(
            ApproxMeasurer.measure_text_width("mmmm", &font)
                > ApproxMeasurer.measure_text_width("iiii", &font)
        );
    }

    #[test]
    fn emoji_variation_selector_adds_no_width() {
        let font = FontSpec::regular(30.0);
        assert!(
            (ApproxMeasurer.measure_text_width("🛍️", &font)
                - ApproxMeasurer.measure_text_width("🛍", &font))
            .abs()
                < f32::EPSILON
        );
    }
}
