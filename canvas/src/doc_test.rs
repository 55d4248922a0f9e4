#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use super::*;

fn make_layer(src: &str) -> Layer {
    Layer::new(src.to_owned())
}

fn make_layer_at(x: f64, y: f64, w: f64, h: f64) -> Layer {
    Layer { x, y, width: w, height: h, ..Layer::new("blob:test".to_owned()) }
}

// =============================================================
// Layer construction
// =============================================================

#[test]
fn new_layer_has_centered_default_geometry() {
    let layer = make_layer("blob:a");
    assert_eq!(layer.x, 340.0);
    assert_eq!(layer.y, 500.0);
    assert_eq!(layer.width, 600.0);
    assert_eq!(layer.height, 600.0);
}

#[test]
fn new_layer_defaults_to_zoom_one() {
    let layer = make_layer("blob:a");
    assert_eq!(layer.zoom, 1.0);
}

#[test]
fn new_layer_keeps_source_handle() {
    let layer = make_layer("blob:abc123");
    assert_eq!(layer.src, "blob:abc123");
}

#[test]
fn new_layers_get_distinct_ids() {
    let a = make_layer("blob:a");
    let b = make_layer("blob:b");
    assert_ne!(a.id, b.id);
}

#[test]
fn layer_contains_point_inside() {
    let layer = make_layer_at(100.0, 200.0, 50.0, 60.0);
    assert!(layer.contains(125.0, 230.0));
}

#[test]
fn layer_contains_edges_inclusive() {
    let layer = make_layer_at(100.0, 200.0, 50.0, 60.0);
    assert!(layer.contains(100.0, 200.0));
    assert!(layer.contains(150.0, 260.0));
}

#[test]
fn layer_does_not_contain_point_outside() {
    let layer = make_layer_at(100.0, 200.0, 50.0, 60.0);
    assert!(!layer.contains(99.0, 230.0));
    assert!(!layer.contains(125.0, 261.0));
}

// =============================================================
// LayerStack: add / remove / get
// =============================================================

#[test]
fn empty_stack() {
    let stack = LayerStack::new();
    assert_eq!(stack.len(), 0);
    assert!(stack.is_empty());
}

#[test]
fn add_appends_at_top() {
    let mut stack = LayerStack::new();
    let a = make_layer("blob:a");
    let b = make_layer("blob:b");
    let (a_id, b_id) = (a.id, b.id);
    stack.add(a);
    stack.add(b);
    assert_eq!(stack.ids(), vec![a_id, b_id]);
}

#[test]
fn add_same_id_replaces_in_place() {
    let mut stack = LayerStack::new();
    let a = make_layer("blob:a");
    let b = make_layer("blob:b");
    let a_id = a.id;
    stack.add(a.clone());
    stack.add(b.clone());

    let replacement = Layer { x: 10.0, ..a };
    stack.add(replacement);

    assert_eq!(stack.len(), 2);
    assert_eq!(stack.ids(), vec![a_id, b.id]);
    assert_eq!(stack.get(&a_id).map(|l| l.x), Some(10.0));
}

#[test]
fn remove_returns_layer() {
    let mut stack = LayerStack::new();
    let layer = make_layer("blob:a");
    let id = layer.id;
    stack.add(layer);

    let removed = stack.remove(&id);
    assert_eq!(removed.map(|l| l.id), Some(id));
    assert!(stack.is_empty());
}

#[test]
fn remove_missing_id_is_none() {
    let mut stack = LayerStack::new();
    stack.add(make_layer("blob:a"));
    assert!(stack.remove(&Uuid::new_v4()).is_none());
    assert_eq!(stack.len(), 1);
}

#[test]
fn get_missing_id_is_none() {
    let stack = LayerStack::new();
    assert!(stack.get(&Uuid::new_v4()).is_none());
}

// =============================================================
// LayerStack: apply_partial
// =============================================================

#[test]
fn apply_partial_merges_present_fields() {
    let mut stack = LayerStack::new();
    let layer = make_layer("blob:a");
    let id = layer.id;
    stack.add(layer);

    let ok = stack.apply_partial(
        &id,
        &PartialLayer { x: Some(10.0), y: Some(20.0), ..Default::default() },
    );
    assert!(ok);

    let layer = stack.get(&id).unwrap();
    assert_eq!(layer.x, 10.0);
    assert_eq!(layer.y, 20.0);
    // Untouched fields keep their values.
    assert_eq!(layer.width, 600.0);
    assert_eq!(layer.zoom, 1.0);
}

#[test]
fn apply_partial_clamps_zoom_to_floor() {
    let mut stack = LayerStack::new();
    let layer = make_layer("blob:a");
    let id = layer.id;
    stack.add(layer);

    stack.apply_partial(&id, &PartialLayer { zoom: Some(0.05), ..Default::default() });
    assert_eq!(stack.get(&id).unwrap().zoom, 0.3);
}

#[test]
fn apply_partial_allows_large_zoom() {
    let mut stack = LayerStack::new();
    let layer = make_layer("blob:a");
    let id = layer.id;
    stack.add(layer);

    stack.apply_partial(&id, &PartialLayer { zoom: Some(9.5), ..Default::default() });
    assert_eq!(stack.get(&id).unwrap().zoom, 9.5);
}

#[test]
fn apply_partial_keeps_dimensions_positive() {
    let mut stack = LayerStack::new();
    let layer = make_layer("blob:a");
    let id = layer.id;
    stack.add(layer);

    stack.apply_partial(
        &id,
        &PartialLayer { width: Some(-5.0), height: Some(0.0), ..Default::default() },
    );
    let layer = stack.get(&id).unwrap();
    assert!(layer.width > 0.0);
    assert!(layer.height > 0.0);
}

#[test]
fn apply_partial_missing_id_is_noop() {
    let mut stack = LayerStack::new();
    stack.add(make_layer("blob:a"));
    let ok = stack.apply_partial(&Uuid::new_v4(), &PartialLayer { x: Some(1.0), ..Default::default() });
    assert!(!ok);
}

#[test]
fn apply_partial_empty_partial_changes_nothing() {
    let mut stack = LayerStack::new();
    let layer = make_layer("blob:a");
    let id = layer.id;
    let before = layer.clone();
    stack.add(layer);

    assert!(stack.apply_partial(&id, &PartialLayer::default()));
    assert_eq!(stack.get(&id), Some(&before));
}

// =============================================================
// LayerStack: reorder
// =============================================================

#[test]
fn to_front_moves_layer_to_end() {
    let mut stack = LayerStack::new();
    let ids: Vec<LayerId> = (0..3)
        .map(|i| {
            let layer = make_layer(&format!("blob:{i}"));
            let id = layer.id;
            stack.add(layer);
            id
        })
        .collect();

    assert!(stack.to_front(&ids[0]));
    assert_eq!(stack.ids(), vec![ids[1], ids[2], ids[0]]);
}

#[test]
fn to_back_moves_layer_to_start() {
    let mut stack = LayerStack::new();
    let ids: Vec<LayerId> = (0..3)
        .map(|i| {
            let layer = make_layer(&format!("blob:{i}"));
            let id = layer.id;
            stack.add(layer);
            id
        })
        .collect();

    assert!(stack.to_back(&ids[2]));
    assert_eq!(stack.ids(), vec![ids[2], ids[0], ids[1]]);
}

#[test]
fn to_front_then_to_back_restores_relative_order_of_others() {
    let mut stack = LayerStack::new();
    let ids: Vec<LayerId> = (0..4)
        .map(|i| {
            let layer = make_layer(&format!("blob:{i}"));
            let id = layer.id;
            stack.add(layer);
            id
        })
        .collect();

    stack.to_front(&ids[0]);
    stack.to_back(&ids[0]);
    assert_eq!(stack.ids(), ids);
}

#[test]
fn reorder_missing_id_is_noop() {
    let mut stack = LayerStack::new();
    let layer = make_layer("blob:a");
    let id = layer.id;
    stack.add(layer);

    assert!(!stack.to_front(&Uuid::new_v4()));
    assert!(!stack.to_back(&Uuid::new_v4()));
    assert_eq!(stack.ids(), vec![id]);
}

#[test]
fn reorder_single_layer_is_stable() {
    let mut stack = LayerStack::new();
    let layer = make_layer("blob:a");
    let id = layer.id;
    stack.add(layer);

    assert!(stack.to_front(&id));
    assert!(stack.to_back(&id));
    assert_eq!(stack.ids(), vec![id]);
}

// =============================================================
// CardDocument: selection
// =============================================================

#[test]
fn new_document_is_empty() {
    let doc = CardDocument::new();
    assert!(doc.title.is_empty());
    assert!(doc.details.is_empty());
    assert!(doc.layers.is_empty());
    assert!(doc.selected().is_none());
}

#[test]
fn select_existing_layer() {
    let mut doc = CardDocument::new();
    let layer = make_layer("blob:a");
    let id = layer.id;
    doc.layers.add(layer);

    assert!(doc.select(id));
    assert_eq!(doc.selected(), Some(id));
}

#[test]
fn select_missing_layer_is_refused() {
    let mut doc = CardDocument::new();
    let layer = make_layer("blob:a");
    let id = layer.id;
    doc.layers.add(layer);
    doc.select(id);

    assert!(!doc.select(Uuid::new_v4()));
    // Existing selection is untouched.
    assert_eq!(doc.selected(), Some(id));
}

#[test]
fn clear_selection_returns_previous() {
    let mut doc = CardDocument::new();
    let layer = make_layer("blob:a");
    let id = layer.id;
    doc.layers.add(layer);
    doc.select(id);

    assert_eq!(doc.clear_selection(), Some(id));
    assert!(doc.selected().is_none());
    assert_eq!(doc.clear_selection(), None);
}

#[test]
fn removing_selected_layer_clears_selection() {
    let mut doc = CardDocument::new();
    let layer = make_layer("blob:a");
    let id = layer.id;
    doc.layers.add(layer);
    doc.select(id);

    let removed = doc.remove_layer(&id);
    assert!(removed.is_some());
    assert!(doc.selected().is_none());
}

#[test]
fn removing_other_layer_keeps_selection() {
    let mut doc = CardDocument::new();
    let a = make_layer("blob:a");
    let b = make_layer("blob:b");
    let (a_id, b_id) = (a.id, b.id);
    doc.layers.add(a);
    doc.layers.add(b);
    doc.select(a_id);

    doc.remove_layer(&b_id);
    assert_eq!(doc.selected(), Some(a_id));
}

#[test]
fn remove_missing_layer_is_noop() {
    let mut doc = CardDocument::new();
    let layer = make_layer("blob:a");
    let id = layer.id;
    doc.layers.add(layer);
    doc.select(id);

    assert!(doc.remove_layer(&Uuid::new_v4()).is_none());
    assert_eq!(doc.selected(), Some(id));
    assert_eq!(doc.layers.len(), 1);
}
