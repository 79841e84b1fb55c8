//! Render-agnostic description of one card: positioned blocks and their content.

use serde::Serialize;
use shopcard_core::{Category, ImageFormat, Template, ThemeColors};

use crate::measure::FontSpec;
use crate::preset::ImageArrangement;

pub const IMAGE_PLACEHOLDER_LABEL: &str = "Image unavailable";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    #[must_use]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Whether `other` lies entirely within `self`.
    #[must_use]
    pub fn contains(&self, other: &Rect) -> bool {
        const SLACK: f32 = 0.01;
        other.x >= self.x - SLACK
            && other.y >= self.y - SLACK
            && other.right() <= self.right() + SLACK
            && other.bottom() <= self.bottom() + SLACK
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Fill {
    Solid { color: String },
    LinearGradient { from: String, to: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImageContent {
    Remote { url: String },
    Placeholder { label: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageBlock {
    pub rect: Rect,
    pub content: ImageContent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextBlock {
    pub rect: Rect,
    pub lines: Vec<String>,
    pub font: FontSpec,
    pub line_height: f32,
    pub color: String,
}

/// Pre-discount price, painted struck through.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OriginalPrice {
    pub rect: Rect,
    pub text: String,
    pub font: FontSpec,
    pub color: String,
}

/// Current price shown large; original price smaller beside or below it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceBlock {
    /// Bounds of the whole block, original price included.
    pub rect: Rect,
    pub current: String,
    pub current_rect: Rect,
    pub current_font: FontSpec,
    pub current_color: String,
    pub original: Option<OriginalPrice>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BadgeBlock {
    pub rect: Rect,
    pub text: String,
    pub font: FontSpec,
    pub fill: String,
    pub text_color: String,
}

/// Call-to-action bar at the bottom of the card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FooterBlock {
    pub rect: Rect,
    pub label: String,
    pub font: FontSpec,
    pub fill: Fill,
    pub text_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardPlan {
    pub template: Template,
    pub arrangement: ImageArrangement,
    pub width: u32,
    pub height: u32,
    /// Raster format and quality for the capture step.
    pub format: ImageFormat,
    pub quality: Option<f32>,
    pub category: Category,
    pub colors: ThemeColors,
    pub background: Fill,
    pub image: ImageBlock,
    pub badge: Option<BadgeBlock>,
    pub title: TextBlock,
    pub price: PriceBlock,
    pub info: Option<TextBlock>,
    pub excerpt: Option<TextBlock>,
    pub footer: Option<FooterBlock>,
    /// Layout decisions worth surfacing: dropped blocks, truncation, placeholders.
    pub notes: Vec<String>,
}

impl CardPlan {
    /// Swaps the image region to a placeholder after the rendering side failed
    /// to load the remote image. Geometry is unchanged.
    pub fn mark_image_unavailable(&mut self) {
        if let ImageContent::Remote { url } = &self.image.content {
            tracing::warn!(url = %url, template = %self.template, "product image unavailable; using placeholder");
            self.notes
                .push("image failed to load; placeholder used".to_string());
        }
        self.image.content = ImageContent::Placeholder {
            label: IMAGE_PLACEHOLDER_LABEL.to_string(),
        };
    }

    #[must_use]
    pub fn has_placeholder_image(&self) -> bool {
        matches!(self.image.content, ImageContent::Placeholder { .. })
    }

    /// Canvas bounds as a rectangle at the origin.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn canvas(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width as f32, self.height as f32)
    }
}
