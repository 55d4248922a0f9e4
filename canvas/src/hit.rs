//! Hit-testing against the layer stack and the selected layer's chrome.
//!
//! The selected layer's remove button and resize handles are checked before
//! any layer body so chrome stays clickable even when another layer overlaps
//! it. Bodies are tested top→bottom (reverse paint order). All slop radii are
//! screen-constant: they are divided by the current display scale before
//! comparing in card space.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::consts::{HANDLE_RADIUS_PX, REMOVE_BUTTON_RADIUS_PX};
use crate::doc::{CardDocument, Layer, LayerId, LayerStack};
use crate::viewport::{Point, Viewport};

/// Which part of a layer was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle(ResizeAnchor),
    RemoveButton,
}

/// Anchor position for resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeAnchor {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy)]
pub struct Hit {
    pub layer_id: LayerId,
    pub part: HitPart,
}

/// Card-space positions of the eight resize handles of a layer.
#[must_use]
pub fn anchor_positions(layer: &Layer) -> [(ResizeAnchor, Point); 8] {
    let (x, y, w, h) = (layer.x, layer.y, layer.width, layer.height);
    let (mx, my) = (x + w / 2.0, y + h / 2.0);
    [
        (ResizeAnchor::Nw, Point::new(x, y)),
        (ResizeAnchor::N, Point::new(mx, y)),
        (ResizeAnchor::Ne, Point::new(x + w, y)),
        (ResizeAnchor::E, Point::new(x + w, my)),
        (ResizeAnchor::Se, Point::new(x + w, y + h)),
        (ResizeAnchor::S, Point::new(mx, y + h)),
        (ResizeAnchor::Sw, Point::new(x, y + h)),
        (ResizeAnchor::W, Point::new(x, my)),
    ]
}

/// Card-space center of the remove button: the layer's top-right corner.
#[must_use]
pub fn remove_button_center(layer: &Layer) -> Point {
    Point::new(layer.x + layer.width, layer.y)
}

/// The top-most layer whose bounding box contains `card_pt`, ignoring
/// selection chrome. Used for wheel zoom and pinch targeting.
#[must_use]
pub fn layer_at(card_pt: Point, layers: &LayerStack) -> Option<LayerId> {
    layers
        .iter()
        .rev()
        .find(|layer| layer.contains(card_pt.x, card_pt.y))
        .map(|layer| layer.id)
}

/// Test what is under `card_pt`, checking the selected layer's chrome first.
///
/// Resize handles are skipped entirely in mobile mode (they are not drawn
/// there either). Returns `None` over empty card area.
#[must_use]
pub fn hit_test(card_pt: Point, doc: &CardDocument, viewport: &Viewport) -> Option<Hit> {
    if let Some(selected_id) = doc.selected() {
        if let Some(layer) = doc.layers.get(&selected_id) {
            let remove_radius = viewport.screen_dist_to_card(REMOVE_BUTTON_RADIUS_PX);
            if card_pt.distance(remove_button_center(layer)) <= remove_radius {
                return Some(Hit { layer_id: selected_id, part: HitPart::RemoveButton });
            }

            if !viewport.mobile {
                let slop = viewport.screen_dist_to_card(HANDLE_RADIUS_PX);
                for (anchor, pos) in anchor_positions(layer) {
                    if card_pt.distance(pos) <= slop {
                        return Some(Hit {
                            layer_id: selected_id,
                            part: HitPart::ResizeHandle(anchor),
                        });
                    }
                }
            }
        }
    }

    layer_at(card_pt, &doc.layers).map(|layer_id| Hit { layer_id, part: HitPart::Body })
}
