//! Computes a [`CardPlan`] from a product, its copy, and the card settings.

use shopcard_core::pricing::discount_badge_text;
use shopcard_core::{
    classify, format_count, format_money, format_rating, theme_colors, CardConfig, Product,
};

use crate::measure::{ApproxMeasurer, FontSpec, TextMeasurer};
use crate::plan::{
    BadgeBlock, CardPlan, Fill, FooterBlock, ImageBlock, ImageContent, OriginalPrice,
    PriceBlock, Rect, TextBlock, IMAGE_PLACEHOLDER_LABEL,
};
use crate::preset::LayoutPreset;
use crate::wrap::{clamp_lines, ellipsize, wrap_text};

const TITLE_STEP_PX: f32 = 4.0;
const TITLE_LINE_HEIGHT: f32 = 1.2;
const BODY_LINE_HEIGHT: f32 = 1.3;
const PRICE_BLOCK_HEIGHT: f32 = 1.25;
const ORIGINAL_PRICE_SCALE: f32 = 0.5;
const BLOCK_GAP: f32 = 0.4;
const FOOTER_HEIGHT: f32 = 2.2;
const INFO_MAX_LINES: usize = 2;
const EMPTY_TITLE: &str = "Special offer";
const ON_PRIMARY: &str = "#FFFFFF";

/// Text and surface colors independent of category.
struct Ink {
    text: &'static str,
    muted: &'static str,
    background: String,
    gradient_end: &'static str,
}

impl Ink {
    fn new(background: &str, dark_mode: bool) -> Self {
        if dark_mode {
            Self {
                text: "#FFFFFF",
                muted: "#B3B3B3",
                background: "#121212".to_string(),
                gradient_end: "#262626",
            }
        } else {
            Self {
                text: "#222222",
                muted: "#8A8A8A",
                background: background.to_string(),
                gradient_end: "#FFFFFF",
            }
        }
    }
}

/// Lays out product cards. Never fails: missing images, unusable discounts and
/// text that does not fit all degrade to a smaller but valid plan.
pub struct CardLayoutEngine<M = ApproxMeasurer> {
    measurer: M,
}

impl CardLayoutEngine<ApproxMeasurer> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            measurer: ApproxMeasurer,
        }
    }
}

impl Default for CardLayoutEngine<ApproxMeasurer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: TextMeasurer> CardLayoutEngine<M> {
    #[must_use]
    pub fn with_measurer(measurer: M) -> Self {
        Self { measurer }
    }

    #[allow(clippy::too_many_lines)]
    pub fn layout(&self, product: &Product, description: &str, config: &CardConfig) -> CardPlan {
        let preset = LayoutPreset::for_template(config.template);
        let category = classify(&product.product_name);
        let colors = theme_colors(category).with_overrides(&config.custom_colors);
        let ink = Ink::new(&colors.background, config.dark_mode);
        let mut notes = Vec::new();

        let width = px(preset.width);
        let height = px(preset.height);
        let insets = preset.safe_insets_px();
        let (left, right, top, bottom) = (
            px(insets.left),
            px(insets.right),
            px(insets.top),
            px(insets.bottom),
        );

        let fraction = preset.arrangement.image_fraction();
        let (image_rect, column) = if preset.arrangement.is_side_by_side() {
            let image_width = (width * fraction).floor();
            (
                Rect::new(0.0, 0.0, image_width, height),
                Rect::new(
                    image_width + left,
                    top,
                    width - image_width - left - right,
                    height - top - bottom,
                ),
            )
        } else {
            let image_height = (height * fraction).floor();
            let column_y = image_height + top * 0.5;
            (
                Rect::new(0.0, 0.0, width, image_height),
                Rect::new(left, column_y, width - left - right, height - column_y - bottom),
            )
        };

        let gap = preset.body_font_px * BLOCK_GAP;

        let footer = preset.show_footer.then(|| {
            let footer_height = preset.body_font_px * FOOTER_HEIGHT;
            FooterBlock {
                rect: Rect::new(
                    column.x,
                    column.bottom() - footer_height,
                    column.width,
                    footer_height,
                ),
                label: config.cta_label.clone(),
                font: FontSpec::bold(preset.body_font_px * 1.1),
                fill: if config.use_gradient {
                    Fill::LinearGradient {
                        from: colors.primary.clone(),
                        to: colors.accent.clone(),
                    }
                } else {
                    Fill::Solid {
                        color: colors.primary.clone(),
                    }
                },
                text_color: ON_PRIMARY.to_string(),
            }
        });
        let content_bottom = footer
            .as_ref()
            .map_or(column.bottom(), |f| f.rect.y - gap);

        let image = ImageBlock {
            rect: image_rect,
            content: image_content(&product.image_url),
        };
        if matches!(image.content, ImageContent::Placeholder { .. }) {
            tracing::debug!(item_id = %product.item_id, "image url unusable; placeholder region");
            notes.push("image url missing or unusable; placeholder used".to_string());
        }

        let original_price = match product.original_price() {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!(
                    item_id = %product.item_id,
                    error = %error,
                    "discount not derivable; badge and original price suppressed"
                );
                notes.push(format!("discount suppressed: {error}"));
                None
            }
        };

        // Price block height is known up front so the title can size around it.
        let price_font = FontSpec::bold(preset.price_font_px);
        let price_line = preset.price_font_px * PRICE_BLOCK_HEIGHT;
        let current = format_money(product.price, &config.currency_symbol);
        let current_width = self.measurer.measure_text_width(&current, &price_font);
        let original = original_price
            .filter(|_| preset.show_original_price)
            .map(|value| format_money(value, &config.currency_symbol));
        let original_font = FontSpec::regular(preset.price_font_px * ORIGINAL_PRICE_SCALE);
        let original_line = original_font.size_px * PRICE_BLOCK_HEIGHT;
        let original_width = original
            .as_deref()
            .map_or(0.0, |text| self.measurer.measure_text_width(text, &original_font));
        let inline_original = current_width + gap + original_width <= column.width;
        let price_height = if original.is_some() && !inline_original {
            price_line + original_line
        } else {
            price_line
        };

        let title_text = match product.product_name.trim() {
            "" => EMPTY_TITLE,
            name => name,
        };
        let title_budget = content_bottom - column.y - price_height - gap;
        let (title_lines, title_font, truncated) =
            self.fit_title(title_text, &preset, column.width, title_budget);
        if truncated {
            notes.push("title truncated".to_string());
        }
        let title_line_height = title_font.size_px * TITLE_LINE_HEIGHT;
        let title = TextBlock {
            rect: Rect::new(
                column.x,
                column.y,
                column.width,
                lines_height(title_lines.len(), title_line_height),
            ),
            lines: title_lines,
            font: title_font,
            line_height: title_line_height,
            color: ink.text.to_string(),
        };

        let mut cursor = title.rect.bottom() + gap;
        let price_y = cursor;
        let original = original.map(|text| {
            let rect = if inline_original {
                Rect::new(
                    column.x + current_width + gap,
                    price_y + price_line - original_line,
                    original_width,
                    original_line,
                )
            } else {
                Rect::new(column.x, price_y + price_line, original_width, original_line)
            };
            OriginalPrice {
                rect,
                text,
                font: original_font,
                color: ink.muted.to_string(),
            }
        });
        let price = PriceBlock {
            rect: Rect::new(column.x, price_y, column.width, price_height),
            current,
            current_rect: Rect::new(column.x, price_y, current_width, price_line),
            current_font: price_font,
            current_color: colors.primary.clone(),
            original,
        };
        cursor += price_height + gap;

        let badge = self.badge(
            product,
            config,
            &preset,
            &image_rect,
            &colors.primary,
            original_price.is_some(),
        );

        let body_font = FontSpec::regular(preset.body_font_px);
        let body_line = preset.body_font_px * BODY_LINE_HEIGHT;

        let mut info_lines = if preset.show_info {
            let mut lines = wrap_text(&info_text(product), column.width, &body_font, &self.measurer);
            clamp_lines(&mut lines, INFO_MAX_LINES, column.width, &body_font, &self.measurer);
            lines
        } else {
            Vec::new()
        };

        let mut excerpt_lines = if preset.show_excerpt {
            let mut lines = wrap_text(description, column.width, &body_font, &self.measurer);
            clamp_lines(
                &mut lines,
                preset.excerpt_max_lines,
                column.width,
                &body_font,
                &self.measurer,
            );
            lines
        } else {
            Vec::new()
        };

        let stacked = |info: usize, excerpt: usize| {
            let mut end = cursor;
            for count in [info, excerpt] {
                if count > 0 {
                    end += lines_height(count, body_line) + gap;
                }
            }
            end - gap
        };

        if !info_lines.is_empty() && stacked(info_lines.len(), excerpt_lines.len()) > content_bottom {
            tracing::debug!(item_id = %product.item_id, template = %config.template, "dropping info line");
            notes.push("info line dropped: no room".to_string());
            info_lines.clear();
        }
        if !excerpt_lines.is_empty() && stacked(0, excerpt_lines.len()) > content_bottom {
            let room = lines_within(content_bottom - cursor, body_line);
            if room == 0 {
                notes.push("description excerpt dropped: no room".to_string());
                excerpt_lines.clear();
            } else {
                let mut lines = wrap_text(description, column.width, &body_font, &self.measurer);
                clamp_lines(&mut lines, room, column.width, &body_font, &self.measurer);
                notes.push("description excerpt shortened".to_string());
                excerpt_lines = lines;
            }
        }

        let info = text_block(info_lines, &column, cursor, body_font, body_line, ink.muted);
        if let Some(block) = &info {
            cursor = block.rect.bottom() + gap;
        }
        let excerpt = text_block(excerpt_lines, &column, cursor, body_font, body_line, ink.text);

        let background = if config.use_gradient {
            Fill::LinearGradient {
                from: ink.background.clone(),
                to: ink.gradient_end.to_string(),
            }
        } else {
            Fill::Solid {
                color: ink.background.clone(),
            }
        };

        tracing::debug!(
            item_id = %product.item_id,
            template = %config.template,
            category = %category,
            title_lines = title.lines.len(),
            title_font_px = title.font.size_px,
            notes = notes.len(),
            "card laid out"
        );

        CardPlan {
            template: config.template,
            arrangement: preset.arrangement,
            width: preset.width,
            height: preset.height,
            format: config.format,
            quality: config.quality,
            category,
            colors,
            background,
            image,
            badge,
            title,
            price,
            info,
            excerpt,
            footer,
            notes,
        }
    }

    /// Shrinks the title font in fixed steps until the wrapped title fits the
    /// preset line budget, the column width and `max_height`. Falls back to
    /// the minimum size with an ellipsized last line.
    fn fit_title(
        &self,
        text: &str,
        preset: &LayoutPreset,
        max_width: f32,
        max_height: f32,
    ) -> (Vec<String>, FontSpec, bool) {
        let mut size = preset.title_font_px;
        loop {
            let font = FontSpec::bold(size);
            let lines = wrap_text(text, max_width, &font, &self.measurer);
            let fits = lines.len() <= preset.title_max_lines
                && lines_height(lines.len(), size * TITLE_LINE_HEIGHT) <= max_height
                && lines
                    .iter()
                    .all(|line| self.measurer.measure_text_width(line, &font) <= max_width);
            if fits {
                return (lines, font, false);
            }
            if size - TITLE_STEP_PX < preset.min_title_font_px {
                break;
            }
            size -= TITLE_STEP_PX;
        }

        let font = FontSpec::bold(preset.min_title_font_px);
        let budget = preset
            .title_max_lines
            .min(lines_within(max_height, font.size_px * TITLE_LINE_HEIGHT))
            .max(1);
        let mut lines = wrap_text(text, max_width, &font, &self.measurer);
        clamp_lines(&mut lines, budget, max_width, &font, &self.measurer);
        for line in &mut lines {
            *line = ellipsize(line, max_width, &font, &self.measurer);
        }
        (lines, font, true)
    }

    fn badge(
        &self,
        product: &Product,
        config: &CardConfig,
        preset: &LayoutPreset,
        image: &Rect,
        fill: &str,
        discount_derivable: bool,
    ) -> Option<BadgeBlock> {
        if !(preset.show_badge && config.show_badge && discount_derivable) {
            return None;
        }
        let rate = product.discount_rate()?;
        let text = discount_badge_text(rate);
        let font = FontSpec::bold(preset.body_font_px * 1.3);
        let badge_width = self.measurer.measure_text_width(&text, &font) + font.size_px * 1.2;
        let badge_height = font.size_px * 1.8;
        let inset = font.size_px;
        let x = if preset.arrangement.is_side_by_side() {
            image.x + inset
        } else {
            image.right() - inset - badge_width
        };
        Some(BadgeBlock {
            rect: Rect::new(x, image.y + inset, badge_width, badge_height),
            text,
            font,
            fill: fill.to_string(),
            text_color: ON_PRIMARY.to_string(),
        })
    }
}

fn text_block(
    lines: Vec<String>,
    column: &Rect,
    y: f32,
    font: FontSpec,
    line_height: f32,
    color: &str,
) -> Option<TextBlock> {
    if lines.is_empty() {
        return None;
    }
    Some(TextBlock {
        rect: Rect::new(column.x, y, column.width, lines_height(lines.len(), line_height)),
        lines,
        font,
        line_height,
        color: color.to_string(),
    })
}

fn image_content(url: &str) -> ImageContent {
    let url = url.trim();
    let usable = ["https://", "http://"]
        .iter()
        .any(|scheme| url.len() > scheme.len() && url.to_ascii_lowercase().starts_with(scheme));
    if usable {
        ImageContent::Remote {
            url: url.to_string(),
        }
    } else {
        ImageContent::Placeholder {
            label: IMAGE_PLACEHOLDER_LABEL.to_string(),
        }
    }
}

/// Rating (only when present), sales, shop and free shipping, dot separated.
fn info_text(product: &Product) -> String {
    let mut parts = Vec::new();
    if let Some(rating) = product.rating_star {
        parts.push(format!("⭐ {}", format_rating(rating)));
    }
    parts.push(format!("{} sold", format_count(product.sales)));
    if let Some(shop) = &product.shop_name {
        parts.push(shop.clone());
    }
    if product.ships_free() {
        parts.push("🚚 Free shipping".to_string());
    }
    parts.join(" · ")
}

#[allow(clippy::cast_precision_loss)]
fn px(value: u32) -> f32 {
    value as f32
}

#[allow(clippy::cast_precision_loss)]
fn lines_height(count: usize, line_height: f32) -> f32 {
    count as f32 * line_height
}

/// How many lines of `line_height` fit in `height`.
fn lines_within(height: f32, line_height: f32) -> usize {
    if line_height <= 0.0 {
        return 0;
    }
    (1..=256)
        .take_while(|n| lines_height(*n, line_height) <= height)
        .count()
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
