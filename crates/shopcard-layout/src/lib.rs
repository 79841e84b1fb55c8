//! Card layout: turns a product, its copy, and card settings into a
//! render-agnostic [`CardPlan`], and paints plans as SVG.
//!
//! Text measurement goes through the [`TextMeasurer`] seam so a real
//! rendering surface can supply exact glyph metrics.

pub mod engine;
pub mod measure;
pub mod plan;
pub mod preset;
pub mod svg;
pub mod wrap;

pub use engine::CardLayoutEngine;
pub use measure::{ApproxMeasurer, FontSpec, FontWeight, TextMeasurer};
pub use plan::{
    BadgeBlock, CardPlan, Fill, FooterBlock, ImageBlock, ImageContent, OriginalPrice, PriceBlock,
    Rect, TextBlock,
};
pub use preset::{ImageArrangement, LayoutPreset};
pub use svg::render_svg;
pub use wrap::{ellipsize, wrap_text};
