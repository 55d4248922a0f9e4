//! Top-level engine: command handlers over the card document.
//!
//! `EngineCore` holds all editor logic with no browser dependencies so it can
//! be tested natively. Every interaction — mouse, touch, or wheel — funnels
//! into the same command handlers, which mutate the document through the
//! [`crate::doc`] contract and report what the host must do next as
//! [`Action`]s. `Engine` wraps the core with the browser-coupled pieces: the
//! canvas element, decoded images, the frame asset, and object-URL lifecycle.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::collections::HashMap;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::consts::{CARD_HEIGHT, CARD_WIDTH, FRAME_ASSET_PATH, MIN_LAYER_SIZE, MIN_ZOOM, PINCH_ZOOM_DIVISOR, WHEEL_ZOOM_STEP};
use crate::doc::{CardDocument, Layer, LayerId, PartialLayer};
use crate::export::CaptureError;
use crate::hit::{self, Hit, HitPart, ResizeAnchor};
use crate::input::{GestureState, WheelDelta};
use crate::render::{self, RenderOptions};
use crate::viewport::{Point, Viewport};

/// Actions returned from command handlers for the host to process.
#[derive(Debug, Clone)]
pub enum Action {
    /// The scene changed; repaint.
    RenderNeeded,
    /// The selection changed; sync dependent UI (depth buttons, etc.).
    SelectionChanged(Option<LayerId>),
    /// A layer left the document. The browser wrapper releases its image
    /// resources; hosts may ignore it.
    LayerRemoved { id: LayerId, src: String },
    /// The pointer hovers a different affordance; update the CSS cursor.
    SetCursor(&'static str),
}

/// Selection stashed by [`EngineCore::begin_capture`] and handed back to
/// [`EngineCore::finish_capture`]. Opaque so restore cannot be skipped
/// piecemeal.
#[derive(Debug)]
pub struct CaptureStash {
    selection: Option<LayerId>,
}

/// Core engine state — all logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser
/// dependencies.
pub struct EngineCore {
    pub doc: CardDocument,
    pub viewport: Viewport,
    pub gesture: GestureState,
    capture_in_flight: bool,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self {
            doc: CardDocument::new(),
            viewport: Viewport::default(),
            gesture: GestureState::Idle,
            capture_in_flight: false,
        }
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Structural commands ---

    /// Append a layer at the top of the stack.
    pub fn add_layer(&mut self, layer: Layer) -> Vec<Action> {
        self.doc.layers.add(layer);
        vec![Action::RenderNeeded]
    }

    /// Remove a layer. Silent no-op for an unknown id. Clears the selection
    /// when it referenced the removed layer.
    pub fn remove_layer(&mut self, id: &LayerId) -> Vec<Action> {
        let was_selected = self.doc.selected() == Some(*id);
        let Some(removed) = self.doc.remove_layer(id) else {
            return Vec::new();
        };
        let mut actions = vec![Action::LayerRemoved { id: removed.id, src: removed.src }];
        if was_selected {
            actions.push(Action::SelectionChanged(None));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Remove whichever layer is selected; no-op without a selection.
    pub fn remove_selected(&mut self) -> Vec<Action> {
        match self.doc.selected() {
            Some(id) => self.remove_layer(&id),
            None => Vec::new(),
        }
    }

    /// Select a layer. No-op if already selected or unknown.
    pub fn select(&mut self, id: LayerId) -> Vec<Action> {
        if self.doc.selected() == Some(id) {
            return Vec::new();
        }
        if self.doc.select(id) {
            vec![Action::SelectionChanged(Some(id)), Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    /// Drop the selection. No-op when nothing is selected.
    pub fn clear_selection(&mut self) -> Vec<Action> {
        if self.doc.clear_selection().is_some() {
            vec![Action::SelectionChanged(None), Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    /// Move the selected layer to the top of the paint order.
    pub fn bring_selection_to_front(&mut self) -> Vec<Action> {
        match self.doc.selected() {
            Some(id) if self.doc.layers.to_front(&id) => vec![Action::RenderNeeded],
            _ => Vec::new(),
        }
    }

    /// Move the selected layer to the bottom of the paint order.
    pub fn send_selection_to_back(&mut self) -> Vec<Action> {
        match self.doc.selected() {
            Some(id) if self.doc.layers.to_back(&id) => vec![Action::RenderNeeded],
            _ => Vec::new(),
        }
    }

    pub fn set_title(&mut self, title: String) -> Vec<Action> {
        if self.doc.title == title {
            return Vec::new();
        }
        self.doc.title = title;
        vec![Action::RenderNeeded]
    }

    pub fn set_details(&mut self, details: String) -> Vec<Action> {
        if self.doc.details == details {
            return Vec::new();
        }
        self.doc.details = details;
        vec![Action::RenderNeeded]
    }

    /// Recompute the display transform from the window's inner size.
    pub fn set_viewport(&mut self, window_width: f64, window_height: f64) -> Viewport {
        self.viewport = Viewport::from_window(window_width, window_height);
        self.viewport
    }

    // --- Input events ---
    //
    // Screen points are CSS pixels relative to the card's on-screen
    // top-left corner. All handlers are no-ops while a capture is in
    // flight so the stack cannot change between selection stash and
    // restore.

    pub fn on_pointer_down(&mut self, screen: Point) -> Vec<Action> {
        if self.capture_in_flight {
            return Vec::new();
        }
        let card_pt = self.viewport.screen_to_card(screen);
        match hit::hit_test(card_pt, &self.doc, &self.viewport) {
            Some(Hit { layer_id, part: HitPart::RemoveButton }) => self.remove_layer(&layer_id),
            Some(Hit { layer_id, part: HitPart::ResizeHandle(anchor) }) => {
                let Some(layer) = self.doc.layers.get(&layer_id) else {
                    return Vec::new();
                };
                self.gesture = GestureState::Resizing {
                    id: layer_id,
                    anchor,
                    start_card: card_pt,
                    orig_x: layer.x,
                    orig_y: layer.y,
                    orig_w: layer.width,
                    orig_h: layer.height,
                };
                Vec::new()
            }
            Some(Hit { layer_id, part: HitPart::Body }) => {
                let actions = self.select(layer_id);
                self.gesture = GestureState::Dragging { id: layer_id, last_card: card_pt };
                actions
            }
            None => self.clear_selection(),
        }
    }

    pub fn on_pointer_move(&mut self, screen: Point) -> Vec<Action> {
        if self.capture_in_flight {
            return Vec::new();
        }
        let card_pt = self.viewport.screen_to_card(screen);
        match self.gesture {
            GestureState::Dragging { id, last_card } => {
                let Some(layer) = self.doc.layers.get(&id) else {
                    self.gesture = GestureState::Idle;
                    return Vec::new();
                };
                let x = clamp_position(layer.x + (card_pt.x - last_card.x), layer.width, CARD_WIDTH);
                let y = clamp_position(layer.y + (card_pt.y - last_card.y), layer.height, CARD_HEIGHT);
                self.doc.layers.apply_partial(
                    &id,
                    &PartialLayer { x: Some(x), y: Some(y), ..Default::default() },
                );
                self.gesture = GestureState::Dragging { id, last_card: card_pt };
                vec![Action::RenderNeeded]
            }
            GestureState::Resizing { id, anchor, start_card, orig_x, orig_y, orig_w, orig_h } => {
                let (x, y, w, h) = resize_rect(
                    (orig_x, orig_y, orig_w, orig_h),
                    anchor,
                    card_pt.x - start_card.x,
                    card_pt.y - start_card.y,
                );
                self.doc.layers.apply_partial(
                    &id,
                    &PartialLayer {
                        x: Some(x),
                        y: Some(y),
                        width: Some(w),
                        height: Some(h),
                        ..Default::default()
                    },
                );
                vec![Action::RenderNeeded]
            }
            GestureState::Pinching { .. } => Vec::new(),
            GestureState::Idle => {
                let hit = hit::hit_test(card_pt, &self.doc, &self.viewport);
                vec![Action::SetCursor(cursor_for(hit.as_ref()))]
            }
        }
    }

    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        if self.capture_in_flight {
            return Vec::new();
        }
        if matches!(self.gesture, GestureState::Pinching { .. }) {
            // Pinches end on touch-end, not pointer-up.
            return Vec::new();
        }
        self.gesture = GestureState::Idle;
        Vec::new()
    }

    /// Wheel over a layer steps its content zoom; scroll down zooms out.
    pub fn on_wheel(&mut self, screen: Point, delta: WheelDelta) -> Vec<Action> {
        if self.capture_in_flight {
            return Vec::new();
        }
        let card_pt = self.viewport.screen_to_card(screen);
        let Some(id) = hit::layer_at(card_pt, &self.doc.layers) else {
            return Vec::new();
        };
        let step = if delta.dy > 0.0 {
            -WHEEL_ZOOM_STEP
        } else if delta.dy < 0.0 {
            WHEEL_ZOOM_STEP
        } else {
            return Vec::new();
        };
        self.adjust_zoom(&id, step)
    }

    /// A two-finger gesture begins: target the layer under the midpoint and
    /// start tracking the inter-finger distance. Single-finger touches flow
    /// through the pointer handlers instead.
    pub fn on_touch_start(&mut self, touches: &[Point]) -> Vec<Action> {
        if self.capture_in_flight || touches.len() < 2 {
            return Vec::new();
        }
        let (a, b) = (touches[0], touches[1]);
        let mid = Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
        let card_mid = self.viewport.screen_to_card(mid);
        match hit::layer_at(card_mid, &self.doc.layers) {
            Some(id) => {
                self.gesture = GestureState::Pinching { id, last_distance: a.distance(b) };
            }
            None => self.gesture = GestureState::Idle,
        }
        Vec::new()
    }

    /// Zoom the pinched layer by the change in inter-finger distance since
    /// the previous sample.
    pub fn on_touch_move(&mut self, touches: &[Point]) -> Vec<Action> {
        if self.capture_in_flight {
            return Vec::new();
        }
        let GestureState::Pinching { id, last_distance } = self.gesture else {
            return Vec::new();
        };
        if touches.len() < 2 {
            return Vec::new();
        }
        let distance = touches[0].distance(touches[1]);
        self.gesture = GestureState::Pinching { id, last_distance: distance };
        self.adjust_zoom(&id, (distance - last_distance) / PINCH_ZOOM_DIVISOR)
    }

    /// Fingers lifted; a pinch ends once fewer than two remain.
    pub fn on_touch_end(&mut self, remaining: usize) -> Vec<Action> {
        if self.capture_in_flight {
            return Vec::new();
        }
        if remaining < 2 && matches!(self.gesture, GestureState::Pinching { .. }) {
            self.gesture = GestureState::Idle;
        }
        Vec::new()
    }

    fn adjust_zoom(&mut self, id: &LayerId, delta: f64) -> Vec<Action> {
        let Some(layer) = self.doc.layers.get(id) else {
            return Vec::new();
        };
        let zoom = (layer.zoom + delta).max(MIN_ZOOM);
        self.doc.layers.apply_partial(id, &PartialLayer { zoom: Some(zoom), ..Default::default() });
        vec![Action::RenderNeeded]
    }

    // --- Capture ---

    /// Stash and clear the selection for the duration of a capture. Input
    /// handlers refuse events until [`Self::finish_capture`] runs.
    ///
    /// # Errors
    ///
    /// `CaptureError::InFlight` if a capture is already running; capture is
    /// not reentrant.
    pub fn begin_capture(&mut self) -> Result<CaptureStash, CaptureError> {
        if self.capture_in_flight {
            return Err(CaptureError::InFlight);
        }
        self.capture_in_flight = true;
        self.gesture = GestureState::Idle;
        Ok(CaptureStash { selection: self.doc.clear_selection() })
    }

    /// Restore the stashed selection, success or failure. The id is
    /// re-validated against the stack, so a restore is total even if the
    /// document changed underneath (it cannot while input is gated).
    pub fn finish_capture(&mut self, stash: CaptureStash) -> Vec<Action> {
        self.capture_in_flight = false;
        if let Some(id) = stash.selection {
            if !self.doc.select(id) {
                log::warn!("stashed selection {id} vanished during capture");
            }
        }
        vec![Action::SelectionChanged(self.doc.selected()), Action::RenderNeeded]
    }

    #[must_use]
    pub fn capture_in_flight(&self) -> bool {
        self.capture_in_flight
    }

    // --- Queries ---

    /// The currently selected layer, if any.
    #[must_use]
    pub fn selection(&self) -> Option<LayerId> {
        self.doc.selected()
    }

    /// Look up a layer by id.
    #[must_use]
    pub fn layer(&self, id: &LayerId) -> Option<&Layer> {
        self.doc.layers.get(id)
    }
}

/// Clamp a layer's edge offset so the whole box stays inside the card axis.
fn clamp_position(pos: f64, size: f64, card_extent: f64) -> f64 {
    pos.min(card_extent - size).max(0.0)
}

/// New rect for a resize gesture: the dragged edge(s) follow the delta, the
/// opposite edge stays pinned, and the result is kept at least
/// `MIN_LAYER_SIZE` on each axis and inside the card.
fn resize_rect(
    (orig_x, orig_y, orig_w, orig_h): (f64, f64, f64, f64),
    anchor: ResizeAnchor,
    dx: f64,
    dy: f64,
) -> (f64, f64, f64, f64) {
    use ResizeAnchor::{E, N, Ne, Nw, S, Se, Sw, W};

    let (mut x, mut y, mut w, mut h) = (orig_x, orig_y, orig_w, orig_h);

    if matches!(anchor, Ne | E | Se) {
        w = (orig_w + dx).min(CARD_WIDTH - orig_x).max(MIN_LAYER_SIZE);
    }
    if matches!(anchor, Nw | W | Sw) {
        let left = (orig_x + dx).min(orig_x + orig_w - MIN_LAYER_SIZE).max(0.0);
        w = orig_x + orig_w - left;
        x = left;
    }
    if matches!(anchor, Sw | S | Se) {
        h = (orig_h + dy).min(CARD_HEIGHT - orig_y).max(MIN_LAYER_SIZE);
    }
    if matches!(anchor, Nw | N | Ne) {
        let top = (orig_y + dy).min(orig_y + orig_h - MIN_LAYER_SIZE).max(0.0);
        h = orig_y + orig_h - top;
        y = top;
    }

    (x, y, w, h)
}

/// CSS cursor for whatever the pointer is hovering.
fn cursor_for(hit: Option<&Hit>) -> &'static str {
    use ResizeAnchor::{E, N, Ne, Nw, S, Se, Sw, W};

    match hit.map(|h| h.part) {
        Some(HitPart::RemoveButton) => "pointer",
        Some(HitPart::ResizeHandle(Nw | Se)) => "nwse-resize",
        Some(HitPart::ResizeHandle(Ne | Sw)) => "nesw-resize",
        Some(HitPart::ResizeHandle(N | S)) => "ns-resize",
        Some(HitPart::ResizeHandle(E | W)) => "ew-resize",
        Some(HitPart::Body) => "move",
        None => "default",
    }
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas
/// element plus the decoded image resources.
pub struct Engine {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    pub(crate) images: HashMap<LayerId, HtmlImageElement>,
    pub(crate) frame: Option<HtmlImageElement>,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the element cannot provide a 2D rendering context.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, ctx, images: HashMap::new(), frame: None, core: EngineCore::new() })
    }

    /// Start loading the decorative frame image. Returns the element so the
    /// host can hook `onload` for a repaint once it decodes.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the image element cannot be created.
    pub fn load_frame(&mut self) -> Result<HtmlImageElement, JsValue> {
        let img = HtmlImageElement::new()?;
        img.set_src(FRAME_ASSET_PATH);
        self.frame = Some(img.clone());
        Ok(img)
    }

    /// Create a layer from an uploaded file: mints an object URL (owned by
    /// the layer until removal), starts decoding, and appends the layer at
    /// the top of the stack.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the object URL or image element cannot be created.
    pub fn add_layer_from_file(
        &mut self,
        file: &web_sys::File,
    ) -> Result<(LayerId, HtmlImageElement, Vec<Action>), JsValue> {
        let url = web_sys::Url::create_object_url_with_blob(file)?;
        let img = HtmlImageElement::new()?;
        img.set_src(&url);
        let layer = Layer::new(url);
        let id = layer.id;
        self.images.insert(id, img.clone());
        let actions = self.core.add_layer(layer);
        Ok((id, img, actions))
    }

    // --- Delegated commands (resource release applied) ---

    pub fn remove_selected(&mut self) -> Vec<Action> {
        let actions = self.core.remove_selected();
        self.release_removed(&actions);
        actions
    }

    pub fn bring_selection_to_front(&mut self) -> Vec<Action> {
        self.core.bring_selection_to_front()
    }

    pub fn send_selection_to_back(&mut self) -> Vec<Action> {
        self.core.send_selection_to_back()
    }

    pub fn clear_selection(&mut self) -> Vec<Action> {
        self.core.clear_selection()
    }

    pub fn set_title(&mut self, title: String) -> Vec<Action> {
        self.core.set_title(title)
    }

    pub fn set_details(&mut self, details: String) -> Vec<Action> {
        self.core.set_details(details)
    }

    pub fn set_viewport(&mut self, window_width: f64, window_height: f64) -> Viewport {
        self.core.set_viewport(window_width, window_height)
    }

    // --- Delegated input events ---

    pub fn on_pointer_down(&mut self, screen: Point) -> Vec<Action> {
        let actions = self.core.on_pointer_down(screen);
        self.release_removed(&actions);
        actions
    }

    pub fn on_pointer_move(&mut self, screen: Point) -> Vec<Action> {
        self.core.on_pointer_move(screen)
    }

    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        self.core.on_pointer_up()
    }

    pub fn on_wheel(&mut self, screen: Point, delta: WheelDelta) -> Vec<Action> {
        self.core.on_wheel(screen, delta)
    }

    pub fn on_touch_start(&mut self, touches: &[Point]) -> Vec<Action> {
        self.core.on_touch_start(touches)
    }

    pub fn on_touch_move(&mut self, touches: &[Point]) -> Vec<Action> {
        self.core.on_touch_move(touches)
    }

    pub fn on_touch_end(&mut self, remaining: usize) -> Vec<Action> {
        self.core.on_touch_end(remaining)
    }

    // --- Render ---

    /// Draw the current state to the visible canvas at the display scale,
    /// resizing the backing store to match the device pixel ratio first.
    ///
    /// # Errors
    ///
    /// Returns `Err` if any `Canvas2D` call fails.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn render(&self) -> Result<(), JsValue> {
        let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
        let vp = self.core.viewport;
        let (css_w, css_h) = vp.card_screen_size();
        let backing_w = (css_w * dpr).round().max(1.0) as u32;
        let backing_h = (css_h * dpr).round().max(1.0) as u32;
        if self.canvas.width() != backing_w {
            self.canvas.set_width(backing_w);
        }
        if self.canvas.height() != backing_h {
            self.canvas.set_height(backing_h);
        }

        render::draw(
            &self.ctx,
            &self.core.doc,
            &self.images,
            self.frame.as_ref(),
            &RenderOptions {
                scale: vp.scale * dpr,
                mobile: vp.mobile,
                chrome_scale: Some(vp.scale),
            },
        )
    }

    /// Release the object URLs and decoded images of removed layers.
    fn release_removed(&mut self, actions: &[Action]) {
        for action in actions {
            if let Action::LayerRemoved { id, src } = action {
                self.images.remove(id);
                if let Err(err) = web_sys::Url::revoke_object_url(src) {
                    log::warn!("failed to revoke object url: {err:?}");
                }
            }
        }
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn selection(&self) -> Option<LayerId> {
        self.core.selection()
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.core.viewport
    }
}
