// Reusable TUI components

pub mod logs_panel;
pub mod results_panel;
pub mod status_bar;
pub mod toast;
