pub mod app_log;
pub mod context_menu;
pub mod external;
pub mod main_window;
pub mod menu_labels;
pub mod navigation;
pub mod persistence;
pub mod shell;
pub mod window_placement;

pub use shell::ShellState;
