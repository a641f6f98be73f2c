use crate::core::{
    context_menu::{self, ContextMenuParams},
    ShellState,
};
use tauri::{Manager, State, WebviewWindow};

#[tauri::command]
pub async fn show_context_menu(
    window: WebviewWindow,
    state: State<'_, ShellState>,
    params: ContextMenuParams,
) -> Result<(), String> {
    if !state.config.native_context_menu {
        return Ok(());
    }

    let entries = context_menu::external_entries(&params);
    let menu = context_menu::build_menu(window.app_handle(), state.labels, &entries, &params)
        .map_err(|e| format!("Failed to build context menu: {}", e))?;
    state.context_targets.lock().replace(entries);

    window
        .popup_menu(&menu)
        .map_err(|e| format!("Failed to show context menu: {}", e))?;
    Ok(())
}
