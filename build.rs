fn main() {
    // The remote page may only reach these two commands (see capabilities/main.json).
    tauri_build::try_build(tauri_build::Attributes::new().app_manifest(
        tauri_build::AppManifest::new().commands(&["zoom_changed", "show_context_menu"]),
    ))
    .expect("failed to run tauri-build");
}
