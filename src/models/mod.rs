pub mod shell_config;
pub mod window_state;

pub use shell_config::ShellConfig;
pub use window_state::{StatePatch, WindowState};
