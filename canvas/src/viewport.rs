#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use crate::consts::{
    CARD_HEIGHT, CARD_WIDTH, DESKTOP_MARGIN_PX, MOBILE_BREAKPOINT_PX, MOBILE_MARGIN_PX,
    SIDEBAR_WIDTH_PX,
};

/// A point in either screen or card space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Straight-line distance to another point.
    #[must_use]
    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Display transform fitting the fixed-size card into the live window.
///
/// `scale` is the single uniform factor applied at paint time; it only ever
/// shrinks the card (never exceeds 1.0). Layer geometry is stored in
/// card-space pixels and is never rewritten by the scaler — interactions
/// divide observed screen deltas by `scale` instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scale: f64,
    /// Compact mode: window width at or below the mobile breakpoint.
    pub mobile: bool,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { scale: 1.0, mobile: false }
    }
}

impl Viewport {
    /// Derive the display transform from the window's inner size.
    ///
    /// Mobile mode keeps the full width (the sidebar overlays the workspace)
    /// with a tighter margin; desktop reserves the sidebar column and a wider
    /// margin. The resulting factor is `min(availW / CARD_W, availH / CARD_H)`
    /// capped at 1.0 so the card is never upscaled.
    #[must_use]
    pub fn from_window(window_width: f64, window_height: f64) -> Self {
        let mobile = window_width <= MOBILE_BREAKPOINT_PX;
        let (chrome_width, margin) = if mobile {
            (0.0, MOBILE_MARGIN_PX)
        } else {
            (SIDEBAR_WIDTH_PX, DESKTOP_MARGIN_PX)
        };

        let avail_width = (window_width - chrome_width - 2.0 * margin).max(0.0);
        let avail_height = (window_height - 2.0 * margin).max(0.0);

        let scale = (avail_width / CARD_WIDTH).min(avail_height / CARD_HEIGHT).min(1.0);

        Self { scale, mobile }
    }

    /// Convert a screen-space point (CSS pixels, relative to the card's
    /// top-left corner on screen) to card coordinates.
    ///
    /// A degenerate container produces scale 0; the card has no on-screen
    /// extent then, so everything maps to the origin instead of dividing
    /// by zero.
    #[must_use]
    pub fn screen_to_card(&self, screen: Point) -> Point {
        if self.scale <= 0.0 {
            return Point::new(0.0, 0.0);
        }
        Point { x: screen.x / self.scale, y: screen.y / self.scale }
    }

    /// Convert a card-space point to screen coordinates.
    #[must_use]
    pub fn card_to_screen(&self, card: Point) -> Point {
        Point { x: card.x * self.scale, y: card.y * self.scale }
    }

    /// Convert a screen-space distance (pixels) to card-space distance.
    /// Zero at scale 0, like [`Self::screen_to_card`].
    #[must_use]
    pub fn screen_dist_to_card(&self, screen_dist: f64) -> f64 {
        if self.scale <= 0.0 {
            return 0.0;
        }
        screen_dist / self.scale
    }

    /// On-screen size of the scaled card, in CSS pixels.
    #[must_use]
    pub fn card_screen_size(&self) -> (f64, f64) {
        (CARD_WIDTH * self.scale, CARD_HEIGHT * self.scale)
    }
}
