use serde::{Deserialize, Serialize};

use super::window_state::{DEFAULT_HEIGHT, DEFAULT_WIDTH, DEFAULT_ZOOM_FACTOR};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    pub title: String,
    pub start_url: String,
    /// Only navigations to this origin stay inside the window.
    pub allowed_origin: String,
    pub default_width: u32,
    pub default_height: u32,
    pub default_zoom: f64,
    pub zoom_step: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub state_file_name: String,
    pub native_context_menu: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            title: "Messenger".to_string(),
            start_url: "https://www.messenger.com".to_string(),
            allowed_origin: "https://www.messenger.com".to_string(),
            default_width: DEFAULT_WIDTH,
            default_height: DEFAULT_HEIGHT,
            default_zoom: DEFAULT_ZOOM_FACTOR,
            zoom_step: 0.1,
            min_zoom: 0.25,
            max_zoom: 5.0,
            state_file_name: "state.json".to_string(),
            native_context_menu: true,
        }
    }
}

impl ShellConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        if !zoom.is_finite() {
            return self.default_zoom;
        }
        zoom.clamp(self.min_zoom, self.max_zoom)
    }
}
