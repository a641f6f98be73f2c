use crate::core::app_log;
use serde_json::json;
use tauri::{AppHandle, Runtime};
use tauri_plugin_opener::OpenerExt;

/// Hands `url` to the system's default handler. Failures are only logged.
pub fn open<R: Runtime>(app: &AppHandle<R>, url: &str) {
    if let Err(e) = app.opener().open_url(url, None::<&str>) {
        app_log::warn(
            "opener",
            "open_failed",
            json!({ "url": url, "error": e.to_string() }),
        );
    }
}
