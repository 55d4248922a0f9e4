//! Export pipeline: rasterize the card at full resolution and hand the PNG
//! to the host environment.
//!
//! The pipeline always runs in the same order: stash + clear the selection,
//! repaint the visible canvas (so no chrome is on screen), wait one settle
//! delay, rasterize an offscreen canvas at `CARD_WIDTH × CARD_HEIGHT ×
//! pixel-ratio`, encode to a PNG blob, deliver, and restore the stashed
//! selection. Restore happens on every path — a failed capture never leaves
//! the document with its selection cleared. Captures are not reentrant; a
//! second request while one is in flight is rejected.

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use thiserror::Error;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, CanvasRenderingContext2d, HtmlAnchorElement, HtmlCanvasElement};

use crate::consts::{CAPTURE_SETTLE_MS, CARD_HEIGHT, CARD_WIDTH};
use crate::engine::Engine;
use crate::render::{self, RenderOptions};

/// Why a capture failed. Nothing here is fatal: the document (including the
/// restored selection) stays intact and the session remains usable.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// A capture is already running.
    #[error("an export is already in progress")]
    InFlight,
    /// The offscreen canvas could not be prepared.
    #[error("could not prepare the export canvas: {0}")]
    Canvas(String),
    /// Rasterization or PNG encoding failed (e.g. a tainted image source).
    #[error("could not rasterize the card: {0}")]
    Rasterize(String),
    /// The PNG was produced but could not be handed to the environment.
    #[error("could not deliver the image: {0}")]
    Delivery(String),
}

/// Coarse platform classification for the delivery step. Mobile browsers
/// generally cannot trigger a direct file download, so the PNG is opened
/// in a new view there instead.
#[must_use]
pub fn is_mobile_user_agent(user_agent: &str) -> bool {
    let ua = user_agent.to_ascii_lowercase();
    ["android", "iphone", "ipad", "ipod", "mobile"]
        .iter()
        .any(|needle| ua.contains(needle))
}

/// Timestamp-based export filename.
#[must_use]
pub fn export_filename(unix_millis: f64) -> String {
    // Truncation is the point: whole milliseconds are plenty unique.
    #[allow(clippy::cast_possible_truncation)]
    let millis = unix_millis.max(0.0) as u64;
    format!("photocard-{millis}.png")
}

/// Capture the card and deliver the PNG.
///
/// The engine is shared behind `Rc<RefCell>` because the borrow must be
/// released across the await points; input handlers are gated by the
/// engine's in-flight flag for the whole duration.
///
/// # Errors
///
/// Any [`CaptureError`]. The stashed selection is restored first.
pub async fn capture_and_deliver(
    engine: Rc<RefCell<Engine>>,
    pixel_ratio: f64,
) -> Result<(), CaptureError> {
    let stash = {
        let mut guard = engine.borrow_mut();
        let stash = guard.core.begin_capture()?;
        if let Err(err) = guard.render() {
            log::warn!("pre-capture repaint failed: {}", describe(&err));
        }
        stash
    };

    // Let the chrome-free repaint reach the screen before rasterizing.
    TimeoutFuture::new(CAPTURE_SETTLE_MS).await;

    let result = rasterize_and_deliver(&engine, pixel_ratio).await;

    let mut guard = engine.borrow_mut();
    guard.core.finish_capture(stash);
    if let Err(err) = guard.render() {
        log::warn!("post-capture repaint failed: {}", describe(&err));
    }

    result
}

async fn rasterize_and_deliver(
    engine: &Rc<RefCell<Engine>>,
    pixel_ratio: f64,
) -> Result<(), CaptureError> {
    // The borrow is scoped: `to_blob` must not hold the engine locked.
    let canvas = render_offscreen(&engine.borrow(), pixel_ratio)?;
    let blob = canvas_to_blob(&canvas).await?;
    deliver(&blob)
}

/// Paint the composition at export resolution onto a detached canvas.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn render_offscreen(engine: &Engine, pixel_ratio: f64) -> Result<HtmlCanvasElement, CaptureError> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| CaptureError::Canvas("no document".to_owned()))?;
    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|err| CaptureError::Canvas(describe(&err)))?
        .dyn_into()
        .map_err(|_| CaptureError::Canvas("not a canvas element".to_owned()))?;
    canvas.set_width((CARD_WIDTH * pixel_ratio).round().max(1.0) as u32);
    canvas.set_height((CARD_HEIGHT * pixel_ratio).round().max(1.0) as u32);

    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")
        .map_err(|err| CaptureError::Canvas(describe(&err)))?
        .ok_or_else(|| CaptureError::Canvas("2d context unavailable".to_owned()))?
        .dyn_into()
        .map_err(|_| CaptureError::Canvas("unexpected context type".to_owned()))?;

    render::draw(
        &ctx,
        &engine.core.doc,
        &engine.images,
        engine.frame.as_ref(),
        &RenderOptions { scale: pixel_ratio, mobile: false, chrome_scale: None },
    )
    .map_err(|err| CaptureError::Rasterize(describe(&err)))?;

    Ok(canvas)
}

/// Bridge the callback-style `toBlob` into a future.
async fn canvas_to_blob(canvas: &HtmlCanvasElement) -> Result<Blob, CaptureError> {
    let source = canvas.clone();
    let promise = js_sys::Promise::new(&mut move |resolve, reject| {
        let reject_empty = reject.clone();
        let callback = Closure::once_into_js(move |blob: Option<Blob>| {
            let settled = match blob {
                Some(blob) => resolve.call1(&JsValue::NULL, &blob),
                None => reject_empty.call1(&JsValue::NULL, &JsValue::from_str("no image data")),
            };
            if let Err(err) = settled {
                log::warn!("toBlob settlement failed: {err:?}");
            }
        });
        // `toBlob` itself throws on a tainted canvas.
        if let Err(err) = source.to_blob(callback.unchecked_ref()) {
            if let Err(err) = reject.call1(&JsValue::NULL, &err) {
                log::warn!("toBlob rejection failed: {err:?}");
            }
        }
    });

    let value = JsFuture::from(promise)
        .await
        .map_err(|err| CaptureError::Rasterize(describe(&err)))?;
    value
        .dyn_into::<Blob>()
        .map_err(|_| CaptureError::Rasterize("unexpected toBlob result".to_owned()))
}

/// Hand the PNG to the environment: a download link on desktop, an
/// open-in-view on mobile user agents. The temporary object URL is revoked
/// once the handoff completes.
fn deliver(blob: &Blob) -> Result<(), CaptureError> {
    let window =
        web_sys::window().ok_or_else(|| CaptureError::Delivery("no window".to_owned()))?;
    let url = web_sys::Url::create_object_url_with_blob(blob)
        .map_err(|err| CaptureError::Delivery(describe(&err)))?;

    let user_agent = window.navigator().user_agent().unwrap_or_default();
    if is_mobile_user_agent(&user_agent) {
        // The URL must stay alive while the new view loads the blob, so it
        // is not revoked here; it dies with the session.
        match window.open_with_url(&url) {
            Ok(Some(_)) => Ok(()),
            Ok(None) => Err(CaptureError::Delivery("view was blocked".to_owned())),
            Err(err) => Err(CaptureError::Delivery(describe(&err))),
        }
    } else {
        let outcome = trigger_download(&window, &url);
        if let Err(err) = web_sys::Url::revoke_object_url(&url) {
            log::warn!("failed to revoke export url: {err:?}");
        }
        outcome
    }
}

fn trigger_download(window: &web_sys::Window, url: &str) -> Result<(), CaptureError> {
    let document =
        window.document().ok_or_else(|| CaptureError::Delivery("no document".to_owned()))?;
    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(|err| CaptureError::Delivery(describe(&err)))?
        .dyn_into()
        .map_err(|_| CaptureError::Delivery("not an anchor element".to_owned()))?;
    anchor.set_href(url);
    anchor.set_download(&export_filename(js_sys::Date::now()));
    anchor.click();
    Ok(())
}

fn describe(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}
