//! Named layout presets. Templates differ only in the data held here.

use serde::Serialize;
use shopcard_core::Template;

/// How the product image shares the canvas with the content column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageArrangement {
    /// Image across the top 60% of the canvas.
    Standard,
    /// Image across the top 70% of the canvas.
    FullImage,
    /// Image on the left half, content on the right half.
    Split,
}

impl ImageArrangement {
    /// Share of the canvas the image occupies: height for stacked
    /// arrangements, width for `Split`.
    #[must_use]
    pub fn image_fraction(self) -> f32 {
        match self {
            Self::Standard => 0.6,
            Self::FullImage => 0.7,
            Self::Split => 0.5,
        }
    }

    #[must_use]
    pub fn is_side_by_side(self) -> bool {
        matches!(self, Self::Split)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SafeInsetsPx {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct LayoutPreset {
    pub template: Template,
    pub width: u32,
    pub height: u32,
    pub arrangement: ImageArrangement,
    safe_area_percent: u32,
    pub title_font_px: f32,
    pub min_title_font_px: f32,
    pub title_max_lines: usize,
    pub price_font_px: f32,
    pub body_font_px: f32,
    pub excerpt_max_lines: usize,
    pub show_badge: bool,
    pub show_original_price: bool,
    pub show_info: bool,
    pub show_excerpt: bool,
    pub show_footer: bool,
}

impl LayoutPreset {
    #[must_use]
    pub fn for_template(template: Template) -> Self {
        let square = Self {
            template,
            width: 1080,
            height: 1080,
            arrangement: ImageArrangement::Standard,
            safe_area_percent: 5,
            title_font_px: 48.0,
            min_title_font_px: 32.0,
            title_max_lines: 2,
            price_font_px: 64.0,
            body_font_px: 26.0,
            excerpt_max_lines: 3,
            show_badge: true,
            show_original_price: true,
            show_info: true,
            show_excerpt: false,
            show_footer: true,
        };

        match template {
            Template::Modern => square,
            Template::Minimal => Self {
                show_badge: false,
                show_info: false,
                show_footer: false,
                safe_area_percent: 7,
                ..square
            },
            Template::Bold => Self {
                height: 1350,
                arrangement: ImageArrangement::FullImage,
                title_font_px: 60.0,
                min_title_font_px: 40.0,
                price_font_px: 80.0,
                show_info: false,
                ..square
            },
            Template::Elegant => Self {
                width: 1920,
                arrangement: ImageArrangement::Split,
                safe_area_percent: 6,
                title_font_px: 56.0,
                min_title_font_px: 36.0,
                title_max_lines: 3,
                show_badge: false,
                show_excerpt: true,
                excerpt_max_lines: 6,
                ..square
            },
            Template::Vibrant => Self {
                height: 1350,
                title_font_px: 56.0,
                price_font_px: 72.0,
                show_excerpt: true,
                ..square
            },
            Template::Search => Self {
                width: 1200,
                height: 628,
                arrangement: ImageArrangement::Split,
                title_font_px: 40.0,
                min_title_font_px: 24.0,
                price_font_px: 48.0,
                body_font_px: 22.0,
                ..square
            },
            Template::Portrait => Self {
                height: 1920,
                arrangement: ImageArrangement::FullImage,
                safe_area_percent: 7,
                title_font_px: 60.0,
                min_title_font_px: 40.0,
                title_max_lines: 3,
                price_font_px: 80.0,
                body_font_px: 30.0,
                show_excerpt: true,
                ..square
            },
        }
    }

    /// Integer safe-area inset with floor rounding:
    /// `inset_px = floor(dimension_px * percent / 100)`.
    #[must_use]
    pub fn safe_insets_px(&self) -> SafeInsetsPx {
        let horizontal = self.width.saturating_mul(self.safe_area_percent) / 100;
        let vertical = self.height.saturating_mul(self.safe_area_percent) / 100;
        SafeInsetsPx {
            left: horizontal,
            right: horizontal,
            top: vertical,
            bottom: vertical,
        }
    }
}
