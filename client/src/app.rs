//! Root application component and shared context wiring.

use std::cell::RefCell;
use std::rc::Rc;

use canvas::doc::LayerId;
use canvas::engine::Engine;
use leptos::prelude::*;

use crate::components::canvas_host::CanvasHost;
use crate::components::sidebar::Sidebar;
use crate::state::ui::UiState;
use crate::util::date;

/// Default details text shown on a fresh card ("write here").
pub const DEFAULT_DETAILS: &str = "এখানে লিখুন";

/// Shared handle to the imperative engine. Provided as context at startup;
/// the slot is filled once the canvas mounts.
#[derive(Clone, Copy)]
pub struct EngineContext(pub StoredValue<Option<Rc<RefCell<Engine>>>, LocalStorage>);

impl EngineContext {
    /// Run `f` against the engine if it has been created. Callers must not
    /// re-enter (`with` inside `with`) — the engine sits in a `RefCell`.
    pub fn with<R>(&self, f: impl FnOnce(&mut Engine) -> R) -> Option<R> {
        self.0.with_value(|slot| slot.as_ref().map(|engine| f(&mut engine.borrow_mut())))
    }

    /// Clone the shared handle, e.g. to move it into an async export task.
    #[must_use]
    pub fn handle(&self) -> Option<Rc<RefCell<Engine>>> {
        self.0.with_value(Clone::clone)
    }
}

/// Reactive mirrors of the document state the sidebar edits. The engine's
/// document stays authoritative; these exist so the view updates.
#[derive(Clone, Copy)]
pub struct DocSignals {
    pub title: RwSignal<String>,
    pub details: RwSignal<String>,
    pub selection: RwSignal<Option<LayerId>>,
}

/// Root application component.
///
/// Provides all shared state contexts and lays out the studio: sidebar,
/// workspace, and the mobile menu toggle.
#[component]
pub fn App() -> impl IntoView {
    let ui = RwSignal::new(UiState::default());
    let doc = DocSignals {
        title: RwSignal::new(date::today_bengali()),
        details: RwSignal::new(DEFAULT_DETAILS.to_owned()),
        selection: RwSignal::new(None),
    };
    let engine = EngineContext(StoredValue::new_local(None));

    provide_context(ui);
    provide_context(doc);
    provide_context(engine);

    view! {
        <div class="studio" class=("studio--mobile", move || ui.get().mobile)>
            <button
                class="studio__menu-toggle"
                title="Toggle editor panel"
                on:click=move |_| ui.update(UiState::toggle_sidebar)
            >
                "\u{2630}"
            </button>
            <Sidebar/>
            <CanvasHost/>
        </div>
    }
}
