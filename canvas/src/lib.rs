//! Card editing and rendering engine for the photocard studio.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns the
//! full lifecycle of the card canvas: translating raw DOM input events into
//! document mutations, fitting the fixed-size virtual card into the live
//! window, painting the composition (layers, frame, text), and exporting it
//! as a full-resolution PNG. The host Leptos layer is responsible only for
//! wiring DOM events to the engine and reacting to the resulting
//! [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`doc`] | Layer stack and in-session card document |
//! | [`viewport`] | Fit-to-window display scaler and coordinate conversions |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`hit`] | Hit-testing against layers and selection chrome |
//! | [`render`] | Scene painting to a 2D context |
//! | [`export`] | PNG capture pipeline and host delivery |
//! | [`consts`] | Shared numeric constants (card size, zoom bounds, margins) |

pub mod consts;
pub mod doc;
pub mod engine;
pub mod export;
pub mod hit;
pub mod input;
pub mod render;
pub mod viewport;
