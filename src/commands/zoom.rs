use crate::core::{
    app_log,
    main_window::{self, ZoomDirection},
    ShellState,
};
use serde_json::json;
use tauri::{State, WebviewWindow};

/// Ctrl/Cmd + wheel or +/-/0 in the page. Returns the zoom factor now in effect.
#[tauri::command]
pub async fn zoom_changed(
    window: WebviewWindow,
    state: State<'_, ShellState>,
    direction: ZoomDirection,
) -> Result<f64, String> {
    let zoom = main_window::apply_zoom_change(&window, &state, direction)?;
    app_log::info_with(
        "zoom",
        "changed",
        json!({ "direction": format!("{:?}", direction), "zoom": zoom }),
    );
    Ok(zoom)
}
