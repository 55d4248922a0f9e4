use super::*;

// =============================================================
// Defaults
// =============================================================

#[test]
fn default_is_desktop_with_closed_overlay() {
    let state = UiState::default();
    assert!(!state.mobile);
    assert!(!state.sidebar_open);
    assert!(!state.export_in_flight);
}

// =============================================================
// Breakpoint transitions
// =============================================================

#[test]
fn entering_mobile_closes_overlay() {
    let mut state = UiState { mobile: false, sidebar_open: true, export_in_flight: false };
    state.set_mobile(true);
    assert!(state.mobile);
    assert!(!state.sidebar_open);
}

#[test]
fn leaving_mobile_closes_overlay() {
    let mut state = UiState { mobile: true, sidebar_open: true, export_in_flight: false };
    state.set_mobile(false);
    assert!(!state.mobile);
    assert!(!state.sidebar_open);
}

#[test]
fn resize_within_same_mode_keeps_overlay() {
    let mut state = UiState { mobile: true, sidebar_open: true, export_in_flight: false };
    state.set_mobile(true);
    assert!(state.sidebar_open);
}

// =============================================================
// Sidebar toggle
// =============================================================

#[test]
fn toggle_sidebar_flips_state() {
    let mut state = UiState::default();
    state.toggle_sidebar();
    assert!(state.sidebar_open);
    state.toggle_sidebar();
    assert!(!state.sidebar_open);
}

// =============================================================
// Export flag
// =============================================================

#[test]
fn export_flag_round_trip() {
    let mut state = UiState::default();
    state.begin_export();
    assert!(state.export_in_flight);
    state.end_export();
    assert!(!state.export_in_flight);
}

#[test]
fn export_flag_does_not_touch_layout_state() {
    let mut state = UiState { mobile: true, sidebar_open: true, export_in_flight: false };
    state.begin_export();
    state.end_export();
    assert!(state.mobile);
    assert!(state.sidebar_open);
}
