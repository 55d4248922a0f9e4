//! Document model: placed image layers and the in-session card document.
//!
//! This module defines the core data types that describe what is on the card
//! (`Layer`), a sparse-update type for incremental geometry edits
//! (`PartialLayer`), the ordered stack that owns all live layers
//! (`LayerStack`), and the full editable session state (`CardDocument`).
//!
//! Data flows into this layer from uploads (layer creation) and from the
//! input engine (mutations). The renderer reads `LayerStack::iter` for draw
//! order: index 0 is furthest back, the last entry paints on top, and above
//! the whole stack sit the static frame and the text overlay.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use uuid::Uuid;

use crate::consts::{DEFAULT_LAYER_SIZE, DEFAULT_LAYER_X, DEFAULT_LAYER_Y, MIN_ZOOM};

/// Unique identifier for a layer.
pub type LayerId = Uuid;

/// One uploaded image placed on the card.
///
/// Geometry is stored in card-space pixels and is independent of the
/// on-screen display scale. `zoom` scales the image content inside the
/// bounding box; it never changes `width`/`height`.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Unique identifier, stable for the layer's lifetime.
    pub id: LayerId,
    /// Handle to the decoded image content (an object URL). Owned by this
    /// layer alone; released when the layer is removed.
    pub src: String,
    /// Left edge of the bounding box.
    pub x: f64,
    /// Top edge of the bounding box.
    pub y: f64,
    /// Width of the bounding box. Always positive.
    pub width: f64,
    /// Height of the bounding box. Always positive.
    pub height: f64,
    /// Content zoom inside the bounding box. Clamped to [`MIN_ZOOM`].
    pub zoom: f64,
}

impl Layer {
    /// Create a layer with the default centered geometry and zoom 1.0.
    #[must_use]
    pub fn new(src: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            src,
            x: DEFAULT_LAYER_X,
            y: DEFAULT_LAYER_Y,
            width: DEFAULT_LAYER_SIZE,
            height: DEFAULT_LAYER_SIZE,
            zoom: 1.0,
        }
    }

    /// Whether a card-space point lies inside the bounding box.
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

/// Sparse geometry update for a layer. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialLayer {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub zoom: Option<f64>,
}

/// Ordered stack of layers. The order IS the paint order: index 0 is
/// furthest back, the last entry is on top. Ids are unique.
#[derive(Debug, Clone, Default)]
pub struct LayerStack {
    layers: Vec<Layer>,
}

impl LayerStack {
    /// Create an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Append a layer at the top of the stack. A layer with the same id
    /// replaces the existing entry in place instead.
    pub fn add(&mut self, layer: Layer) {
        if let Some(existing) = self.layers.iter_mut().find(|l| l.id == layer.id) {
            *existing = layer;
        } else {
            self.layers.push(layer);
        }
    }

    /// Remove a layer by id, returning it if it was present.
    pub fn remove(&mut self, id: &LayerId) -> Option<Layer> {
        let index = self.layers.iter().position(|l| l.id == *id)?;
        Some(self.layers.remove(index))
    }

    /// Return a reference to a layer by id.
    #[must_use]
    pub fn get(&self, id: &LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == *id)
    }

    /// Apply a sparse geometry update to a layer. Zoom is clamped to
    /// [`MIN_ZOOM`]; width/height are kept positive. Returns false if the
    /// layer doesn't exist (a silent no-op for the caller).
    pub fn apply_partial(&mut self, id: &LayerId, partial: &PartialLayer) -> bool {
        let Some(layer) = self.layers.iter_mut().find(|l| l.id == *id) else {
            return false;
        };
        if let Some(x) = partial.x {
            layer.x = x;
        }
        if let Some(y) = partial.y {
            layer.y = y;
        }
        if let Some(w) = partial.width {
            layer.width = w.max(1.0);
        }
        if let Some(h) = partial.height {
            layer.height = h.max(1.0);
        }
        if let Some(z) = partial.zoom {
            layer.zoom = z.max(MIN_ZOOM);
        }
        true
    }

    /// Move a layer to the top of the paint order, preserving the relative
    /// order of all other layers. Returns false if the id is absent.
    pub fn to_front(&mut self, id: &LayerId) -> bool {
        let Some(layer) = self.remove(id) else {
            return false;
        };
        self.layers.push(layer);
        true
    }

    /// Move a layer to the bottom of the paint order, preserving the
    /// relative order of all other layers. Returns false if the id is absent.
    pub fn to_back(&mut self, id: &LayerId) -> bool {
        let Some(layer) = self.remove(id) else {
            return false;
        };
        self.layers.insert(0, layer);
        true
    }

    /// Layers in paint order (bottom first).
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Layer> {
        self.layers.iter()
    }

    /// Ids in paint order (bottom first).
    #[must_use]
    pub fn ids(&self) -> Vec<LayerId> {
        self.layers.iter().map(|l| l.id).collect()
    }

    /// Number of layers currently in the stack.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns `true` if the stack contains no layers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

/// The full in-session editable state: the two free-text fields, the layer
/// stack, and the selection. There is no external durable form.
#[derive(Debug, Clone, Default)]
pub struct CardDocument {
    /// Date/title line painted at the top of the text overlay.
    pub title: String,
    /// Details text painted near the bottom; user line breaks are preserved.
    pub details: String,
    pub layers: LayerStack,
    selected: Option<LayerId>,
}

impl CardDocument {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently selected layer id, if any. When set, the id is always
    /// present in the stack.
    #[must_use]
    pub fn selected(&self) -> Option<LayerId> {
        self.selected
    }

    /// Select a layer. Returns false (and leaves the selection untouched)
    /// if the id is not in the stack.
    pub fn select(&mut self, id: LayerId) -> bool {
        if self.layers.get(&id).is_none() {
            return false;
        }
        self.selected = Some(id);
        true
    }

    /// Clear the selection, returning the previously selected id.
    pub fn clear_selection(&mut self) -> Option<LayerId> {
        self.selected.take()
    }

    /// Remove a layer by id. Clears the selection if it referenced the
    /// removed layer; selection of any other layer is untouched.
    pub fn remove_layer(&mut self, id: &LayerId) -> Option<Layer> {
        let removed = self.layers.remove(id)?;
        if self.selected == Some(removed.id) {
            self.selected = None;
        }
        Some(removed)
    }
}
