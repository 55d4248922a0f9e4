//! Shared numeric constants for the canvas crate.

// ── Card geometry ───────────────────────────────────────────────

/// Width of the virtual card, in card-space pixels. Exports are always
/// rendered at this resolution regardless of the on-screen scale.
pub const CARD_WIDTH: f64 = 1280.0;

/// Height of the virtual card, in card-space pixels.
pub const CARD_HEIGHT: f64 = 1600.0;

// ── Layers ──────────────────────────────────────────────────────

/// Default edge length of a freshly uploaded layer.
pub const DEFAULT_LAYER_SIZE: f64 = 600.0;

/// Default left offset of a new layer; centers it horizontally.
pub const DEFAULT_LAYER_X: f64 = (CARD_WIDTH - DEFAULT_LAYER_SIZE) / 2.0;

/// Default top offset of a new layer; centers it vertically.
pub const DEFAULT_LAYER_Y: f64 = (CARD_HEIGHT - DEFAULT_LAYER_SIZE) / 2.0;

/// Smallest edge a resize gesture may produce, in card-space pixels.
pub const MIN_LAYER_SIZE: f64 = 50.0;

/// Lower bound for the per-layer content zoom. There is no upper bound.
pub const MIN_ZOOM: f64 = 0.3;

/// Zoom change per wheel tick over a layer.
pub const WHEEL_ZOOM_STEP: f64 = 0.05;

/// Divisor applied to the change in inter-finger distance during a pinch.
pub const PINCH_ZOOM_DIVISOR: f64 = 200.0;

// ── Viewport fitting ────────────────────────────────────────────

/// Window widths at or below this are treated as the compact/mobile mode.
pub const MOBILE_BREAKPOINT_PX: f64 = 1024.0;

/// Fixed width of the desktop sidebar column, subtracted from the
/// available width before fitting the card.
pub const SIDEBAR_WIDTH_PX: f64 = 320.0;

/// Workspace margin around the card on desktop.
pub const DESKTOP_MARGIN_PX: f64 = 80.0;

/// Workspace margin around the card in mobile mode.
pub const MOBILE_MARGIN_PX: f64 = 24.0;

// ── Selection chrome / hit-testing ──────────────────────────────

/// Screen-space hit slop in pixels for resize handles.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

/// Drawn edge length of a resize handle square, in screen pixels.
pub const HANDLE_SIZE_PX: f64 = 12.0;

/// Radius of the remove button drawn on the selected layer's top-right
/// corner, in screen pixels.
pub const REMOVE_BUTTON_RADIUS_PX: f64 = 16.0;

/// Stroke width of the selection border, in screen pixels.
pub const SELECTION_BORDER_PX: f64 = 4.0;

pub const SELECTION_COLOR: &str = "#3b82f6";
pub const REMOVE_BUTTON_COLOR: &str = "#ef4444";

// ── Composition ─────────────────────────────────────────────────

/// Card body color painted beneath the bottom-most layer.
pub const CARD_BACKGROUND: &str = "#111111";

pub const TEXT_COLOR: &str = "#ffffff";

/// Relative path the decorative frame image is loaded from.
pub const FRAME_ASSET_PATH: &str = "./photocard.png";

/// Text overlay padding, card space: top / right / left.
pub const OVERLAY_PAD_TOP: f64 = 95.0;
pub const OVERLAY_PAD_RIGHT: f64 = 120.0;
pub const OVERLAY_PAD_LEFT: f64 = 90.0;

/// Title line: font size in card-space pixels (line height factor 1.0).
pub const TITLE_FONT_PX: f64 = 38.0;

/// Details block: font size, line-height factor, bottom anchor, and the
/// fraction of the card width lines wrap to.
pub const DETAILS_FONT_PX: f64 = 60.0;
pub const DETAILS_LINE_HEIGHT: f64 = 1.2;
pub const DETAILS_BOTTOM_OFFSET: f64 = 300.0;
pub const DETAILS_WRAP_FRACTION: f64 = 0.8;

// ── Export ──────────────────────────────────────────────────────

/// Delay between hiding the selection chrome and rasterizing, giving the
/// visible canvas one repaint before capture.
pub const CAPTURE_SETTLE_MS: u32 = 50;

/// Pixel-density multiplier applied to the export resolution.
pub const EXPORT_PIXEL_RATIO: f64 = 1.0;
