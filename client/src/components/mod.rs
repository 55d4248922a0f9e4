pub mod canvas_host;
pub mod sidebar;
