//! Input model: wheel/touch payloads and the gesture state machine.
//!
//! `GestureState` is the active gesture being tracked between pointer-down
//! and pointer-up (or between touch samples for a pinch), carrying all
//! context needed to compute incremental deltas. The pinch scratch value
//! (`last_distance`) lives here, keyed to the layer the gesture started on,
//! and is reset whenever a new two-finger gesture starts.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::doc::LayerId;
use crate::hit::ResizeAnchor;
use crate::viewport::Point;

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// Internal state for the input state machine.
///
/// Each active variant carries the gesture context needed to compute deltas
/// on the next input sample.
#[derive(Debug, Clone, Copy)]
pub enum GestureState {
    /// No gesture in progress; waiting for the next pointer-down.
    Idle,
    /// The user is moving a layer across the card.
    Dragging {
        /// Id of the layer being dragged.
        id: LayerId,
        /// Card-space position of the pointer at the previous event.
        last_card: Point,
    },
    /// The user is resizing a layer by dragging one of its eight handles.
    Resizing {
        /// Id of the layer being resized.
        id: LayerId,
        /// Which corner/edge handle is being dragged.
        anchor: ResizeAnchor,
        /// Card-space pointer position at the start of the resize.
        start_card: Point,
        /// Layer x at the start of the resize.
        orig_x: f64,
        /// Layer y at the start of the resize.
        orig_y: f64,
        /// Layer width at the start of the resize.
        orig_w: f64,
        /// Layer height at the start of the resize.
        orig_h: f64,
    },
    /// The user is pinch-zooming a layer's content with two fingers.
    Pinching {
        /// Id of the layer whose content zoom is being adjusted.
        id: LayerId,
        /// Inter-finger distance (screen pixels) at the previous sample.
        last_distance: f64,
    },
}

impl Default for GestureState {
    fn default() -> Self {
        Self::Idle
    }
}

impl GestureState {
    /// Whether any gesture is currently active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}
