//! Rendering: draws the full card scene to a 2D context.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It receives read-only views of document state and produces pixels — it
//! does not mutate any application state. Paint order is fixed: card
//! background, layers bottom→top, the static frame, the text overlay, and
//! finally the selection chrome (omitted entirely on the export path).
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level callers ([`crate::engine::Engine::render`] and the export
//! pipeline) handle the result.

use std::collections::HashMap;
use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use crate::consts::{
    CARD_BACKGROUND, CARD_HEIGHT, CARD_WIDTH, DETAILS_BOTTOM_OFFSET, DETAILS_FONT_PX,
    DETAILS_LINE_HEIGHT, DETAILS_WRAP_FRACTION, HANDLE_SIZE_PX, OVERLAY_PAD_LEFT,
    OVERLAY_PAD_RIGHT, OVERLAY_PAD_TOP, REMOVE_BUTTON_COLOR, REMOVE_BUTTON_RADIUS_PX,
    SELECTION_BORDER_PX, SELECTION_COLOR, TEXT_COLOR, TITLE_FONT_PX,
};
use crate::doc::{CardDocument, Layer, LayerId};
use crate::hit;

/// How a scene should be painted.
pub struct RenderOptions {
    /// Total paint scale: card units × `scale` = backing-store pixels.
    /// The visible canvas passes display-scale × device-pixel-ratio; the
    /// export path passes its pixel-density multiplier.
    pub scale: f64,
    /// Compact mode — resize handles are not drawn.
    pub mobile: bool,
    /// Display scale used to keep selection chrome screen-constant.
    /// `None` omits the chrome entirely (export path).
    pub chrome_scale: Option<f64>,
}

/// Draw the full scene.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(
    ctx: &CanvasRenderingContext2d,
    doc: &CardDocument,
    images: &HashMap<LayerId, HtmlImageElement>,
    frame: Option<&HtmlImageElement>,
    opts: &RenderOptions,
) -> Result<(), JsValue> {
    ctx.set_transform(opts.scale, 0.0, 0.0, opts.scale, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, CARD_WIDTH, CARD_HEIGHT);
    ctx.set_fill_style_str(CARD_BACKGROUND);
    ctx.fill_rect(0.0, 0.0, CARD_WIDTH, CARD_HEIGHT);

    // Layer content, bottom first.
    for layer in doc.layers.iter() {
        if let Some(img) = images.get(&layer.id) {
            draw_layer(ctx, layer, img)?;
        }
    }

    // The decorative frame always paints above every layer.
    if let Some(frame) = frame {
        if is_decoded(frame) {
            ctx.draw_image_with_html_image_element_and_dw_and_dh(
                frame,
                0.0,
                0.0,
                CARD_WIDTH,
                CARD_HEIGHT,
            )?;
        }
    }

    draw_text_overlay(ctx, doc)?;

    if let Some(display_scale) = opts.chrome_scale {
        if let Some(layer) = doc.selected().and_then(|id| doc.layers.get(&id)) {
            draw_selection(ctx, layer, display_scale, opts.mobile)?;
        }
    }

    Ok(())
}

fn is_decoded(img: &HtmlImageElement) -> bool {
    img.complete() && img.natural_width() > 0
}

/// Paint one layer: the image cover-fits the bounding box, is scaled by the
/// content zoom around the box center, and is clipped to the box.
fn draw_layer(
    ctx: &CanvasRenderingContext2d,
    layer: &Layer,
    img: &HtmlImageElement,
) -> Result<(), JsValue> {
    if !is_decoded(img) {
        // Still decoding; the host repaints on the image's load event.
        return Ok(());
    }
    let nat_w = f64::from(img.natural_width());
    let nat_h = f64::from(img.natural_height());

    ctx.save();
    ctx.begin_path();
    ctx.rect(layer.x, layer.y, layer.width, layer.height);
    ctx.clip();

    let cover = (layer.width / nat_w).max(layer.height / nat_h);
    let content_scale = cover * layer.zoom;
    let dw = nat_w * content_scale;
    let dh = nat_h * content_scale;
    let dx = layer.x + (layer.width - dw) / 2.0;
    let dy = layer.y + (layer.height - dh) / 2.0;
    let result = ctx.draw_image_with_html_image_element_and_dw_and_dh(img, dx, dy, dw, dh);

    ctx.restore();
    result
}

fn font(px: f64) -> String {
    format!("{px}px sans-serif")
}

/// Paint the two text fields. The title flows down from the overlay's top
/// padding; the details block is horizontally centered with its bottom line
/// anchored a fixed offset above the card bottom, growing upward. User line
/// breaks are preserved; overflowing text is drawn as-is, never clipped.
fn draw_text_overlay(ctx: &CanvasRenderingContext2d, doc: &CardDocument) -> Result<(), JsValue> {
    ctx.set_fill_style_str(TEXT_COLOR);

    if !doc.title.is_empty() {
        ctx.set_font(&font(TITLE_FONT_PX));
        ctx.set_text_align("left");
        ctx.set_text_baseline("top");
        let wrap_width = CARD_WIDTH - OVERLAY_PAD_LEFT - OVERLAY_PAD_RIGHT;
        let mut y = OVERLAY_PAD_TOP;
        for paragraph in doc.title.split('\n') {
            for line in wrap_line(ctx, paragraph, wrap_width)? {
                ctx.fill_text(&line, OVERLAY_PAD_LEFT, y)?;
                y += TITLE_FONT_PX;
            }
        }
    }

    if !doc.details.is_empty() {
        ctx.set_font(&font(DETAILS_FONT_PX));
        ctx.set_text_align("center");
        ctx.set_text_baseline("bottom");
        let wrap_width = CARD_WIDTH * DETAILS_WRAP_FRACTION;
        let line_height = DETAILS_FONT_PX * DETAILS_LINE_HEIGHT;

        let mut lines = Vec::new();
        for paragraph in doc.details.split('\n') {
            lines.extend(wrap_line(ctx, paragraph, wrap_width)?);
        }

        let bottom = CARD_HEIGHT - DETAILS_BOTTOM_OFFSET;
        let count = lines.len();
        for (i, line) in lines.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let y = bottom - ((count - 1 - i) as f64) * line_height;
            ctx.fill_text(line, CARD_WIDTH / 2.0, y)?;
        }
    }

    Ok(())
}

/// Greedy word wrap against the context's current font. An empty input
/// yields a single empty line so blank user lines keep their height.
fn wrap_line(
    ctx: &CanvasRenderingContext2d,
    text: &str,
    max_width: f64,
) -> Result<Vec<String>, JsValue> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_owned()
        } else {
            format!("{current} {word}")
        };
        if current.is_empty() || ctx.measure_text(&candidate)?.width() <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_owned();
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    Ok(lines)
}

/// Selection chrome: border, resize handles (desktop only), remove button.
/// Sizes are screen-constant — divided by the display scale so they don't
/// shrink with the card.
fn draw_selection(
    ctx: &CanvasRenderingContext2d,
    layer: &Layer,
    display_scale: f64,
    mobile: bool,
) -> Result<(), JsValue> {
    let border = SELECTION_BORDER_PX / display_scale;
    ctx.set_stroke_style_str(SELECTION_COLOR);
    ctx.set_line_width(border);
    ctx.stroke_rect(layer.x, layer.y, layer.width, layer.height);

    if !mobile {
        let half = HANDLE_SIZE_PX / display_scale / 2.0;
        ctx.set_fill_style_str("#ffffff");
        ctx.set_line_width(border / 2.0);
        for (_, pos) in hit::anchor_positions(layer) {
            ctx.fill_rect(pos.x - half, pos.y - half, half * 2.0, half * 2.0);
            ctx.stroke_rect(pos.x - half, pos.y - half, half * 2.0, half * 2.0);
        }
    }

    let center = hit::remove_button_center(layer);
    let radius = REMOVE_BUTTON_RADIUS_PX / display_scale;
    ctx.set_fill_style_str(REMOVE_BUTTON_COLOR);
    ctx.begin_path();
    ctx.arc(center.x, center.y, radius, 0.0, 2.0 * PI)?;
    ctx.fill();

    let arm = radius * 0.45;
    ctx.set_stroke_style_str("#ffffff");
    ctx.set_line_width(radius * 0.22);
    ctx.begin_path();
    ctx.move_to(center.x - arm, center.y - arm);
    ctx.line_to(center.x + arm, center.y + arm);
    ctx.move_to(center.x + arm, center.y - arm);
    ctx.line_to(center.x - arm, center.y + arm);
    ctx.stroke();

    Ok(())
}
