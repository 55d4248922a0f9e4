#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

// --- Point ---

#[test]
fn point_new() {
    let p = Point::new(3.0, 4.0);
    assert_eq!(p.x, 3.0);
    assert_eq!(p.y, 4.0);
}

#[test]
fn point_clone() {
    let p = Point::new(1.0, 2.0);
    let q = p;
    assert!(point_approx_eq(p, q));
}

#[test]
fn point_distance() {
    let a = Point::new(0.0, 0.0);
    let b = Point::new(3.0, 4.0);
    assert!(approx_eq(a.distance(b), 5.0));
    assert!(approx_eq(b.distance(a), 5.0));
}

#[test]
fn point_distance_to_self_is_zero() {
    let p = Point::new(7.0, -2.0);
    assert!(approx_eq(p.distance(p), 0.0));
}

// --- Viewport defaults ---

#[test]
fn viewport_default_is_identity_desktop() {
    let vp = Viewport::default();
    assert_eq!(vp.scale, 1.0);
    assert!(!vp.mobile);
}

// --- from_window: mode detection ---

#[test]
fn wide_window_is_desktop() {
    let vp = Viewport::from_window(1920.0, 1080.0);
    assert!(!vp.mobile);
}

#[test]
fn narrow_window_is_mobile() {
    let vp = Viewport::from_window(800.0, 900.0);
    assert!(vp.mobile);
}

#[test]
fn breakpoint_boundary_is_mobile() {
    let vp = Viewport::from_window(1024.0, 768.0);
    assert!(vp.mobile);
}

#[test]
fn just_above_breakpoint_is_desktop() {
    let vp = Viewport::from_window(1025.0, 768.0);
    assert!(!vp.mobile);
}

// --- from_window: scale ---

#[test]
fn scale_never_exceeds_one() {
    for (w, h) in [(10_000.0, 10_000.0), (5000.0, 3000.0), (1920.0, 8000.0)] {
        let vp = Viewport::from_window(w, h);
        assert!(vp.scale <= 1.0, "scale {} for window {w}x{h}", vp.scale);
    }
}

#[test]
fn scaled_card_fits_available_space_desktop() {
    for (w, h) in [(1920.0, 1080.0), (1280.0, 1600.0), (1400.0, 700.0), (2560.0, 1440.0)] {
        let vp = Viewport::from_window(w, h);
        let avail_w = w - SIDEBAR_WIDTH_PX - 2.0 * DESKTOP_MARGIN_PX;
        let avail_h = h - 2.0 * DESKTOP_MARGIN_PX;
        assert!(CARD_WIDTH * vp.scale <= avail_w + EPSILON);
        assert!(CARD_HEIGHT * vp.scale <= avail_h + EPSILON);
    }
}

#[test]
fn scaled_card_fits_available_space_mobile() {
    for (w, h) in [(390.0, 844.0), (768.0, 1024.0), (1024.0, 600.0)] {
        let vp = Viewport::from_window(w, h);
        let avail_w = w - 2.0 * MOBILE_MARGIN_PX;
        let avail_h = h - 2.0 * MOBILE_MARGIN_PX;
        assert!(CARD_WIDTH * vp.scale <= avail_w + EPSILON);
        assert!(CARD_HEIGHT * vp.scale <= avail_h + EPSILON);
    }
}

#[test]
fn huge_window_caps_scale_at_one() {
    let vp = Viewport::from_window(20_000.0, 20_000.0);
    assert_eq!(vp.scale, 1.0);
}

#[test]
fn degenerate_window_scales_to_zero() {
    // No floor: a container with no available space gets no card.
    let vp = Viewport::from_window(0.0, 0.0);
    assert_eq!(vp.scale, 0.0);

    let vp = Viewport::from_window(-50.0, 100.0);
    assert_eq!(vp.scale, 0.0);
}

#[test]
fn scaled_card_fits_even_in_tiny_windows() {
    for (w, h) in [(0.0, 0.0), (10.0, 10.0), (2.0 * MOBILE_MARGIN_PX, 500.0), (60.0, 900.0)] {
        let vp = Viewport::from_window(w, h);
        let avail_w = (w - 2.0 * MOBILE_MARGIN_PX).max(0.0);
        let avail_h = (h - 2.0 * MOBILE_MARGIN_PX).max(0.0);
        assert!(CARD_WIDTH * vp.scale <= avail_w + EPSILON, "width at {w}x{h}");
        assert!(CARD_HEIGHT * vp.scale <= avail_h + EPSILON, "height at {w}x{h}");
    }
}

#[test]
fn scale_is_uniform_in_both_axes() {
    // A window proportionally wider than the card: height binds.
    let vp = Viewport::from_window(5000.0, 1000.0);
    let expected = (1000.0 - 2.0 * DESKTOP_MARGIN_PX) / CARD_HEIGHT;
    assert!(approx_eq(vp.scale, expected));
}

// --- Coordinate conversions ---

#[test]
fn screen_to_card_identity_at_scale_one() {
    let vp = Viewport { scale: 1.0, mobile: false };
    let card = vp.screen_to_card(Point::new(50.0, 75.0));
    assert!(point_approx_eq(card, Point::new(50.0, 75.0)));
}

#[test]
fn screen_to_card_divides_by_scale() {
    let vp = Viewport { scale: 0.5, mobile: false };
    let card = vp.screen_to_card(Point::new(40.0, 80.0));
    assert!(point_approx_eq(card, Point::new(80.0, 160.0)));
}

#[test]
fn card_to_screen_multiplies_by_scale() {
    let vp = Viewport { scale: 0.25, mobile: true };
    let screen = vp.card_to_screen(Point::new(400.0, 800.0));
    assert!(point_approx_eq(screen, Point::new(100.0, 200.0)));
}

#[test]
fn conversions_roundtrip() {
    let vp = Viewport::from_window(1600.0, 900.0);
    let original = Point::new(123.4, 567.8);
    let back = vp.screen_to_card(vp.card_to_screen(original));
    assert!(point_approx_eq(back, original));
}

#[test]
fn screen_dist_to_card_divides_by_scale() {
    let vp = Viewport { scale: 0.5, mobile: false };
    assert!(approx_eq(vp.screen_dist_to_card(10.0), 20.0));
}

#[test]
fn zero_scale_conversions_stay_finite() {
    let vp = Viewport::from_window(0.0, 0.0);
    assert_eq!(vp.scale, 0.0);

    let card = vp.screen_to_card(Point::new(40.0, 80.0));
    assert!(point_approx_eq(card, Point::new(0.0, 0.0)));
    assert!(approx_eq(vp.screen_dist_to_card(10.0), 0.0));
}

#[test]
fn card_screen_size_scales_card() {
    let vp = Viewport { scale: 0.5, mobile: false };
    let (w, h) = vp.card_screen_size();
    assert!(approx_eq(w, CARD_WIDTH * 0.5));
    assert!(approx_eq(h, CARD_HEIGHT * 0.5));
}
