#[cfg(test)]
#[path = "ui_test.rs"]
mod ui_test;

/// UI state for the chrome around the card: compact mode, the mobile
/// sidebar overlay, and the export button.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UiState {
    /// Window width at or below the breakpoint. The sidebar becomes an
    /// overlay and resize handles disappear.
    pub mobile: bool,
    /// Whether the sidebar overlay is open. Only meaningful in compact mode;
    /// the desktop sidebar is a static column.
    pub sidebar_open: bool,
    /// A capture is running; the export button is disabled meanwhile.
    pub export_in_flight: bool,
}

impl UiState {
    /// Record a breakpoint change. Crossing the breakpoint in either
    /// direction closes the overlay so the workspace is never left covered.
    pub fn set_mobile(&mut self, mobile: bool) {
        if self.mobile != mobile {
            self.sidebar_open = false;
        }
        self.mobile = mobile;
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }

    pub fn begin_export(&mut self) {
        self.export_in_flight = true;
    }

    pub fn end_export(&mut self) {
        self.export_in_flight = false;
    }
}
