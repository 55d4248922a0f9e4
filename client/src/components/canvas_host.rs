//! Bridge between the Leptos UI and the imperative `canvas::Engine`.
//!
//! Mounts the `<canvas>` element, creates the `Engine` bound to it, wires
//! pointer/wheel/touch events and the window resize signal, and applies the
//! engine's [`Action`]s back onto the reactive layer. The canvas element's
//! CSS size tracks the viewport scale; the engine manages the backing store.

use std::cell::RefCell;
use std::rc::Rc;

use canvas::consts::{CARD_HEIGHT, CARD_WIDTH};
use canvas::engine::{Action, Engine};
use canvas::input::WheelDelta;
use canvas::viewport::Point;
use leptos::html;
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::Closure;

use crate::app::{DocSignals, EngineContext};
use crate::state::ui::UiState;

/// Apply engine actions to the reactive layer and repaint when asked.
/// Cursor actions are handled where the canvas element is in scope.
pub fn dispatch(engine: EngineContext, doc: DocSignals, actions: &[Action]) {
    let mut needs_render = false;
    for action in actions {
        match action {
            Action::RenderNeeded => needs_render = true,
            Action::SelectionChanged(selection) => doc.selection.set(*selection),
            Action::LayerRemoved { .. } | Action::SetCursor(_) => {}
        }
    }
    if needs_render {
        repaint(engine);
    }
}

/// Redraw the visible canvas, logging (not surfacing) paint failures.
pub fn repaint(engine: EngineContext) {
    engine.with(|e| {
        if let Err(err) = e.render() {
            log::error!("repaint failed: {err:?}");
        }
    });
}

/// Measure the window, refit the card, and sync the reactive mirrors.
pub fn apply_viewport(engine: EngineContext, ui: RwSignal<UiState>, scale: RwSignal<f64>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let width = window.inner_width().map_or(0.0, |v| v.as_f64().unwrap_or(0.0));
    let height = window.inner_height().map_or(0.0, |v| v.as_f64().unwrap_or(0.0));
    let Some(viewport) = engine.with(|e| e.set_viewport(width, height)) else {
        return;
    };
    ui.update(|u| u.set_mobile(viewport.mobile));
    scale.set(viewport.scale);
    repaint(engine);
}

/// Touch positions in CSS pixels relative to the canvas top-left corner.
fn touch_points(canvas: &web_sys::HtmlCanvasElement, touches: &web_sys::TouchList) -> Vec<Point> {
    let rect = canvas.get_bounding_client_rect();
    (0..touches.length())
        .filter_map(|i| touches.item(i))
        .map(|t| Point::new(f64::from(t.client_x()) - rect.left(), f64::from(t.client_y()) - rect.top()))
        .collect()
}

/// Canvas host: the workspace column and the card canvas inside it.
#[component]
pub fn CanvasHost() -> impl IntoView {
    let engine = expect_context::<EngineContext>();
    let doc = expect_context::<DocSignals>();
    let ui = expect_context::<RwSignal<UiState>>();
    let scale = RwSignal::new(1.0_f64);
    let canvas_ref = NodeRef::<html::Canvas>::new();

    // Create the engine once the canvas element exists, seed the default
    // text, start the frame image loading, and hook the resize signal.
    Effect::new(move |_| {
        let Some(canvas_el) = canvas_ref.get() else {
            return;
        };
        if engine.0.with_value(Option::is_some) {
            return;
        }
        let mut built = match Engine::new(canvas_el) {
            Ok(engine) => engine,
            Err(err) => {
                log::error!("canvas engine init failed: {err:?}");
                return;
            }
        };
        built.set_title(doc.title.get_untracked());
        built.set_details(doc.details.get_untracked());
        match built.load_frame() {
            Ok(frame) => {
                let onload = Closure::<dyn FnMut()>::new(move || repaint(engine));
                frame.set_onload(Some(onload.as_ref().unchecked_ref()));
                onload.forget();
            }
            Err(err) => log::warn!("frame image failed to start loading: {err:?}"),
        }
        engine.0.set_value(Some(Rc::new(RefCell::new(built))));

        apply_viewport(engine, ui, scale);
        let on_resize = Closure::<dyn FnMut()>::new(move || apply_viewport(engine, ui, scale));
        if let Some(window) = web_sys::window() {
            if let Err(err) = window
                .add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())
            {
                log::warn!("resize listener failed: {err:?}");
            }
        }
        // The listener lives for the whole session.
        on_resize.forget();
    });

    let on_pointer_down = move |ev: web_sys::PointerEvent| {
        ev.prevent_default();
        // Keep the workspace click-to-deselect from undoing a selection.
        ev.stop_propagation();
        if let Some(canvas) = canvas_ref.get_untracked() {
            if let Err(err) = canvas.set_pointer_capture(ev.pointer_id()) {
                log::debug!("pointer capture failed: {err:?}");
            }
        }
        let point = Point::new(f64::from(ev.offset_x()), f64::from(ev.offset_y()));
        if let Some(actions) = engine.with(|e| e.on_pointer_down(point)) {
            dispatch(engine, doc, &actions);
        }
    };

    let on_pointer_move = move |ev: web_sys::PointerEvent| {
        let point = Point::new(f64::from(ev.offset_x()), f64::from(ev.offset_y()));
        let Some(actions) = engine.with(|e| e.on_pointer_move(point)) else {
            return;
        };
        for action in &actions {
            if let Action::SetCursor(cursor) = action {
                if let Some(canvas) = canvas_ref.get_untracked() {
                    if let Err(err) = web_sys::HtmlElement::style(&canvas).set_property("cursor", cursor) {
                        log::debug!("cursor update failed: {err:?}");
                    }
                }
            }
        }
        dispatch(engine, doc, &actions);
    };

    let on_pointer_up = move |_ev: web_sys::PointerEvent| {
        if let Some(actions) = engine.with(|e| e.on_pointer_up()) {
            dispatch(engine, doc, &actions);
        }
    };

    let on_wheel = move |ev: web_sys::WheelEvent| {
        ev.prevent_default();
        let point = Point::new(f64::from(ev.offset_x()), f64::from(ev.offset_y()));
        let delta = WheelDelta { dx: ev.delta_x(), dy: ev.delta_y() };
        if let Some(actions) = engine.with(|e| e.on_wheel(point, delta)) {
            dispatch(engine, doc, &actions);
        }
    };

    let on_touch_start = move |ev: web_sys::TouchEvent| {
        let Some(canvas) = canvas_ref.get_untracked() else {
            return;
        };
        let points = touch_points(&canvas, &ev.touches());
        if points.len() >= 2 {
            ev.prevent_default();
            if let Some(actions) = engine.with(|e| e.on_touch_start(&points)) {
                dispatch(engine, doc, &actions);
            }
        }
    };

    let on_touch_move = move |ev: web_sys::TouchEvent| {
        let Some(canvas) = canvas_ref.get_untracked() else {
            return;
        };
        let points = touch_points(&canvas, &ev.touches());
        if points.len() >= 2 {
            ev.prevent_default();
        }
        if let Some(actions) = engine.with(|e| e.on_touch_move(&points)) {
            dispatch(engine, doc, &actions);
        }
    };

    let on_touch_end = move |ev: web_sys::TouchEvent| {
        let remaining = ev.touches().length() as usize;
        if let Some(actions) = engine.with(|e| e.on_touch_end(remaining)) {
            dispatch(engine, doc, &actions);
        }
    };

    let on_workspace_down = move |_ev: web_sys::PointerEvent| {
        if let Some(actions) = engine.with(|e| e.clear_selection()) {
            dispatch(engine, doc, &actions);
        }
    };

    view! {
        <main class="workspace" on:pointerdown=on_workspace_down>
            <canvas
                class="card-canvas"
                node_ref=canvas_ref
                style:width=move || format!("{:.2}px", scale.get() * CARD_WIDTH)
                style:height=move || format!("{:.2}px", scale.get() * CARD_HEIGHT)
                on:pointerdown=on_pointer_down
                on:pointermove=on_pointer_move
                on:pointerup=on_pointer_up
                on:wheel=on_wheel
                on:touchstart=on_touch_start
                on:touchmove=on_touch_move
                on:touchend=on_touch_end
            >
                "Your browser does not support canvas."
            </canvas>
        </main>
    }
}
