//! Paints a [`CardPlan`] as standalone SVG markup.

use std::fmt::Write as _;

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::measure::FontSpec;
use crate::plan::{CardPlan, Fill, ImageContent, Rect, TextBlock};

const FONT_FAMILY: &str = "Helvetica, Arial, sans-serif";
const PLACEHOLDER_FILL: &str = "#E6E6E6";
const PLACEHOLDER_TEXT: &str = "#9A9A9A";
/// Baseline offset from the top of a line box, as a share of font size.
const ASCENT: f32 = 0.8;

/// Serializes `plan` into an SVG document sized to the card canvas.
///
/// All product-derived text and URLs are escaped.
#[must_use]
pub fn render_svg(plan: &CardPlan) -> String {
    let mut out = String::with_capacity(4096);
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = plan.width,
        h = plan.height
    );

    out.push_str("<defs>");
    push_gradient(&mut out, "card-bg", &plan.background, true);
    if let Some(footer) = &plan.footer {
        push_gradient(&mut out, "card-cta", &footer.fill, false);
    }
    out.push_str("</defs>");

    let canvas = plan.canvas();
    push_rect(&mut out, &canvas, &fill_ref("card-bg", &plan.background), 0.0);

    match &plan.image.content {
        ImageContent::Remote { url } => {
            let r = &plan.image.rect;
            let _ = write!(
                out,
                r#"<image href="{}" x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="xMidYMid slice"/>"#,
                encode_double_quoted_attribute(url),
                num(r.x),
                num(r.y),
                num(r.width),
                num(r.height)
            );
        }
        ImageContent::Placeholder { label } => {
            let r = &plan.image.rect;
            push_rect(&mut out, r, PLACEHOLDER_FILL, 0.0);
            let font = FontSpec::regular((r.height.min(r.width) * 0.06).max(14.0));
            push_centered_text(&mut out, r, label, &font, PLACEHOLDER_TEXT);
        }
    }

    if let Some(badge) = &plan.badge {
        push_rect(&mut out, &badge.rect, &badge.fill, badge.rect.height * 0.2);
        push_centered_text(&mut out, &badge.rect, &badge.text, &badge.font, &badge.text_color);
    }

    push_text_block(&mut out, &plan.title);

    let price = &plan.price;
    push_text(
        &mut out,
        price.current_rect.x,
        price.current_rect.y + price.current_font.size_px * ASCENT,
        &price.current,
        &price.current_font,
        &price.current_color,
        "",
    );
    if let Some(original) = &price.original {
        push_text(
            &mut out,
            original.rect.x,
            original.rect.y + original.font.size_px * ASCENT,
            &original.text,
            &original.font,
            &original.color,
            r#" text-decoration="line-through""#,
        );
    }

    for block in plan.info.iter().chain(plan.excerpt.iter()) {
        push_text_block(&mut out, block);
    }

    if let Some(footer) = &plan.footer {
        push_rect(
            &mut out,
            &footer.rect,
            &fill_ref("card-cta", &footer.fill),
            footer.rect.height * 0.5,
        );
        push_centered_text(&mut out, &footer.rect, &footer.label, &footer.font, &footer.text_color);
    }

    out.push_str("</svg>");
    out
}

fn push_gradient(out: &mut String, id: &str, fill: &Fill, vertical: bool) {
    if let Fill::LinearGradient { from, to } = fill {
        let (x2, y2) = if vertical { ("0", "1") } else { ("1", "0") };
        let _ = write!(
            out,
            r#"<linearGradient id="{id}" x1="0" y1="0" x2="{x2}" y2="{y2}"><stop offset="0" stop-color="{}"/><stop offset="1" stop-color="{}"/></linearGradient>"#,
            encode_double_quoted_attribute(from),
            encode_double_quoted_attribute(to)
        );
    }
}

fn fill_ref(id: &str, fill: &Fill) -> String {
    match fill {
        Fill::Solid { color } => color.clone(),
        Fill::LinearGradient { .. } => format!("url(#{id})"),
    }
}

fn push_rect(out: &mut String, rect: &Rect, fill: &str, radius: f32) {
    let _ = write!(
        out,
        r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}" fill="{}"/>"#,
        num(rect.x),
        num(rect.y),
        num(rect.width),
        num(rect.height),
        num(radius),
        encode_double_quoted_attribute(fill)
    );
}

fn push_text(
    out: &mut String,
    x: f32,
    baseline: f32,
    text: &str,
    font: &FontSpec,
    color: &str,
    extra: &str,
) {
    let _ = write!(
        out,
        r#"<text x="{}" y="{}" font-family="{FONT_FAMILY}" font-size="{}" font-weight="{}" fill="{}"{extra}>{}</text>"#,
        num(x),
        num(baseline),
        num(font.size_px),
        font.weight.css_weight(),
        encode_double_quoted_attribute(color),
        encode_text(text)
    );
}

fn push_centered_text(out: &mut String, rect: &Rect, text: &str, font: &FontSpec, color: &str) {
    let baseline = rect.y + rect.height * 0.5 + font.size_px * 0.35;
    push_text(
        out,
        rect.x + rect.width * 0.5,
        baseline,
        text,
        font,
        color,
        r#" text-anchor="middle""#,
    );
}

fn push_text_block(out: &mut String, block: &TextBlock) {
    let mut top = block.rect.y;
    for line in &block.lines {
        let baseline = top + (block.line_height - block.font.size_px) * 0.5 + block.font.size_px * ASCENT;
        push_text(out, block.rect.x, baseline, line, &block.font, &block.color, "");
        top += block.line_height;
    }
}

/// Pixel value with at most one decimal and no trailing zeros.
fn num(value: f32) -> String {
    let text = format!("{value:.1}");
    match text.strip_suffix(".0") {
        Some(whole) => whole.to_string(),
        None => text,
    }
}
