pub mod context_menu;
pub mod zoom;
