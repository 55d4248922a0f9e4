//! Editor sidebar: upload, the two text fields, layer depth controls, and
//! the PNG export button.
//!
//! On desktop this is a static 320 px column; in compact mode it overlays
//! the workspace and is toggled from the menu button in the app shell.

use canvas::consts::EXPORT_PIXEL_RATIO;
use canvas::export;
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::Closure;

use crate::app::{DocSignals, EngineContext};
use crate::components::canvas_host::{dispatch, repaint};
use crate::state::ui::UiState;

/// Editor panel for everything that isn't direct canvas manipulation.
#[component]
pub fn Sidebar() -> impl IntoView {
    let engine = expect_context::<EngineContext>();
    let doc = expect_context::<DocSignals>();
    let ui = expect_context::<RwSignal<UiState>>();

    let on_upload = move |ev: web_sys::Event| {
        let input = event_target::<web_sys::HtmlInputElement>(&ev);
        let Some(files) = input.files() else {
            return;
        };
        for i in 0..files.length() {
            let Some(file) = files.item(i) else {
                continue;
            };
            match engine.with(|e| e.add_layer_from_file(&file)) {
                Some(Ok((_, img, actions))) => {
                    // Repaint once the image finishes decoding.
                    let onload = Closure::<dyn FnMut()>::new(move || repaint(engine));
                    img.set_onload(Some(onload.as_ref().unchecked_ref()));
                    onload.forget();
                    dispatch(engine, doc, &actions);
                }
                Some(Err(err)) => log::error!("upload failed: {err:?}"),
                None => {}
            }
        }
        // Allow re-selecting the same file later.
        input.set_value("");
    };

    let on_title = move |ev: web_sys::Event| {
        let value = event_target_value(&ev);
        doc.title.set(value.clone());
        if let Some(actions) = engine.with(|e| e.set_title(value)) {
            dispatch(engine, doc, &actions);
        }
    };

    let on_details = move |ev: web_sys::Event| {
        let value = event_target_value(&ev);
        doc.details.set(value.clone());
        if let Some(actions) = engine.with(|e| e.set_details(value)) {
            dispatch(engine, doc, &actions);
        }
    };

    let on_front = move |_| {
        if let Some(actions) = engine.with(|e| e.bring_selection_to_front()) {
            dispatch(engine, doc, &actions);
        }
    };

    let on_back = move |_| {
        if let Some(actions) = engine.with(|e| e.send_selection_to_back()) {
            dispatch(engine, doc, &actions);
        }
    };

    let on_remove = move |_| {
        if let Some(actions) = engine.with(|e| e.remove_selected()) {
            dispatch(engine, doc, &actions);
        }
    };

    let on_export = move |_| {
        if ui.with_untracked(|u| u.export_in_flight) {
            return;
        }
        let Some(handle) = engine.handle() else {
            return;
        };
        ui.update(UiState::begin_export);
        leptos::task::spawn_local(async move {
            if let Err(err) = export::capture_and_deliver(handle, EXPORT_PIXEL_RATIO).await {
                log::error!("export failed: {err}");
                if let Some(window) = web_sys::window() {
                    if let Err(alert_err) =
                        window.alert_with_message(&format!("Export failed: {err}"))
                    {
                        log::warn!("alert failed: {alert_err:?}");
                    }
                }
            }
            ui.update(UiState::end_export);
        });
    };

    view! {
        <aside
            class="sidebar"
            class=("sidebar--open", move || ui.get().sidebar_open)
        >
            <h2 class="sidebar__heading">"Studio Editor"</h2>

            <label class="btn sidebar__upload">
                "Add Photo"
                <input
                    type="file"
                    accept="image/*"
                    multiple
                    class="sidebar__file-input"
                    on:change=on_upload
                />
            </label>

            <div class="sidebar__section">
                <span class="sidebar__label">"Date"</span>
                <input
                    class="sidebar__input"
                    placeholder="Date"
                    prop:value=move || doc.title.get()
                    on:input=on_title
                />
            </div>

            <div class="sidebar__section">
                <span class="sidebar__label">"Title"</span>
                <textarea
                    class="sidebar__input sidebar__textarea"
                    placeholder="Type here... Use Enter for new lines"
                    prop:value=move || doc.details.get()
                    on:input=on_details
                ></textarea>
            </div>

            <Show when=move || doc.selection.get().is_some()>
                <div class="sidebar__section">
                    <span class="sidebar__label">"Layer Depth"</span>
                    <div class="sidebar__row">
                        <button class="btn sidebar__action" on:click=on_front>"Front"</button>
                        <button class="btn sidebar__action" on:click=on_back>"Back"</button>
                    </div>
                    <button class="btn sidebar__action sidebar__remove" on:click=on_remove>
                        "Remove Photo"
                    </button>
                </div>
            </Show>

            <button
                class="btn sidebar__save"
                disabled=move || ui.get().export_in_flight
                on:click=on_export
            >
                {move || if ui.get().export_in_flight { "Exporting…" } else { "Download PNG" }}
            </button>
        </aside>
    }
}
