use crate::core::{
    app_log, external,
    navigation::NavigationDecision,
    persistence::StateStore,
    window_placement::{self, Candidate, Rect},
    ShellState,
};
use crate::models::{ShellConfig, StatePatch};
use anyhow::{Context, Result};
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::json;
use tauri::{
    webview::{NewWindowResponse, PageLoadEvent},
    AppHandle, Manager, PhysicalPosition, PhysicalSize, Position, Runtime, Size, Url, Webview,
    WebviewUrl, WebviewWindow, WebviewWindowBuilder, Window, WindowEvent,
};

pub const MAIN_WINDOW_LABEL: &str = "main";

const PAGE_BRIDGE: &str = include_str!("page_bridge.js");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomDirection {
    In,
    Out,
    Reset,
}

/// The bits of a native window the controller reads when deciding what to persist.
pub trait WindowGeometry {
    fn maximized(&self) -> bool;
    fn minimized(&self) -> bool;
    /// Outer position and inner size, in physical pixels.
    fn bounds(&self) -> Option<Rect>;
}

impl<R: Runtime> WindowGeometry for Window<R> {
    fn maximized(&self) -> bool {
        self.is_maximized().unwrap_or(false)
    }

    fn minimized(&self) -> bool {
        self.is_minimized().unwrap_or(false)
    }

    fn bounds(&self) -> Option<Rect> {
        let pos = self.outer_position().ok()?;
        let size = self.inner_size().ok()?;
        Some(Rect::new(pos.x, pos.y, size.width, size.height))
    }
}

/// Bounds worth restoring to: a minimized window reports a parked, zero-sized rectangle.
fn restorable_bounds(window: &impl WindowGeometry) -> Option<Rect> {
    if window.minimized() {
        return None;
    }
    window.bounds().filter(|b| b.width > 0 && b.height > 0)
}

/// Per-window controller state: current zoom, last restored geometry and one-shot startup flags.
#[derive(Debug, Clone)]
pub struct WindowSession {
    zoom: f64,
    normal_bounds: Option<Rect>,
    shown: bool,
    zoom_restored: bool,
}

impl WindowSession {
    pub fn new(zoom: f64) -> Self {
        Self {
            zoom,
            normal_bounds: None,
            shown: false,
            zoom_restored: false,
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn normal_bounds(&self) -> Option<Rect> {
        self.normal_bounds
    }

    pub fn step_zoom(&mut self, direction: ZoomDirection, config: &ShellConfig) -> f64 {
        let next = match direction {
            ZoomDirection::In => self.zoom + config.zoom_step,
            ZoomDirection::Out => self.zoom - config.zoom_step,
            ZoomDirection::Reset => config.default_zoom,
        };
        self.zoom = config.clamp_zoom((next * 100.0).round() / 100.0);
        self.zoom
    }

    /// Remembers the current rectangle as the restore geometry unless the window is
    /// maximized or minimized.
    pub fn observe(&mut self, window: &impl WindowGeometry) {
        if window.maximized() {
            return;
        }
        if let Some(bounds) = restorable_bounds(window) {
            self.normal_bounds = Some(bounds);
        }
    }

    /// What to write for the current event, if anything. Only a maximized window is persisted.
    pub fn persist_patch(&self, window: &impl WindowGeometry) -> Option<StatePatch> {
        if !window.maximized() {
            return None;
        }
        let bounds = self.normal_bounds.or_else(|| restorable_bounds(window))?;
        Some(StatePatch {
            x: Some(bounds.x),
            y: Some(bounds.y),
            width: Some(bounds.width),
            height: Some(bounds.height),
            zoom_factor: Some(self.zoom),
        })
    }

    fn mark_shown(&mut self) -> bool {
        !std::mem::replace(&mut self.shown, true)
    }

    fn mark_zoom_restored(&mut self) -> bool {
        !std::mem::replace(&mut self.zoom_restored, true)
    }
}

pub fn persist_if_maximized(
    window: &impl WindowGeometry,
    session: &Mutex<WindowSession>,
    store: &StateStore,
) -> bool {
    let patch = session.lock().persist_patch(window);
    match patch {
        Some(patch) => {
            store.save(&patch);
            true
        }
        None => false,
    }
}

pub fn handle_window_event<R: Runtime>(window: &Window<R>, event: &WindowEvent) {
    if window.label() != MAIN_WINDOW_LABEL {
        return;
    }
    let Some(state) = window.try_state::<ShellState>() else {
        return;
    };

    match event {
        WindowEvent::Resized(_) | WindowEvent::Moved(_) => {
            state.session.lock().observe(window);
            persist_if_maximized(window, &state.session, &state.store);
        }
        WindowEvent::CloseRequested { .. } => {
            let saved = persist_if_maximized(window, &state.session, &state.store);
            app_log::info_with("window", "close_requested", json!({ "saved": saved }));
        }
        _ => {}
    }
}

pub fn apply_zoom_change<R: Runtime>(
    window: &WebviewWindow<R>,
    state: &ShellState,
    direction: ZoomDirection,
) -> Result<f64, String> {
    let zoom = state.session.lock().step_zoom(direction, &state.config);
    window
        .set_zoom(zoom)
        .map_err(|e| format!("Failed to set zoom: {}", e))?;
    let webview: &Webview<R> = window.as_ref();
    persist_if_maximized(&webview.window(), &state.session, &state.store);
    Ok(zoom)
}

fn page_bridge_script(config: &ShellConfig) -> String {
    format!(
        "window.__MESSENGER_SHELL__ = {{ nativeContextMenu: {} }};\n{}",
        config.native_context_menu, PAGE_BRIDGE
    )
}

fn on_navigation<R: Runtime>(app: &AppHandle<R>, url: &Url) -> bool {
    let Some(state) = app.try_state::<ShellState>() else {
        return false;
    };
    let decision = state.guard.check_navigation(url);
    if decision != NavigationDecision::Allow {
        app_log::info_with(
            "navigation",
            "redirected",
            json!({ "url": url.as_str(), "decision": format!("{:?}", decision) }),
        );
    }
    if decision == NavigationDecision::OpenExternal {
        external::open(app, url.as_str());
    }
    decision.allows_in_place()
}

fn on_new_window<R: Runtime>(app: &AppHandle<R>, url: &Url) {
    let Some(state) = app.try_state::<ShellState>() else {
        return;
    };
    if state.guard.check_new_window(url) == NavigationDecision::OpenExternal {
        external::open(app, url.as_str());
    }
}

fn on_page_load<R: Runtime>(window: &WebviewWindow<R>, event: PageLoadEvent) {
    let Some(state) = window.try_state::<ShellState>() else {
        return;
    };

    // the first load of any kind shows the window, even if it never finishes
    if state.session.lock().mark_shown() {
        if let Err(e) = window.show() {
            app_log::warn("window", "show_failed", json!({ "error": e.to_string() }));
        }
    }

    if !matches!(event, PageLoadEvent::Finished) {
        return;
    }
    let zoom = {
        let mut session = state.session.lock();
        session.mark_zoom_restored().then(|| session.zoom())
    };
    if let Some(zoom) = zoom {
        if let Err(e) = window.set_zoom(zoom) {
            app_log::warn("zoom", "restore_failed", json!({ "zoom": zoom, "error": e.to_string() }));
        }
    }
}

/// Builds the main window hidden, already placed at the restored (normalized) bounds.
pub fn create<R: Runtime>(app: &AppHandle<R>) -> Result<WebviewWindow<R>> {
    let state = app
        .try_state::<ShellState>()
        .context("shell state is not initialized")?;
    let config = &state.config;

    let persisted = state.store.load();
    let layout = window_placement::current_layout(app);
    let bounds = window_placement::normalize(Candidate::from_state(&persisted), &layout);
    let zoom = config.clamp_zoom(persisted.zoom_or_default());
    *state.session.lock() = WindowSession::new(zoom);

    let start_url = Url::parse(&config.start_url)
        .with_context(|| format!("invalid start url: {}", config.start_url))?;

    let nav_app = app.clone();
    let popup_app = app.clone();
    let mut builder =
        WebviewWindowBuilder::new(app, MAIN_WINDOW_LABEL, WebviewUrl::External(start_url))
            .title(&config.title)
            .inner_size(config.default_width as f64, config.default_height as f64)
            .visible(false)
            .zoom_hotkeys_enabled(false)
            .initialization_script(&page_bridge_script(config))
            .on_navigation(move |url| on_navigation(&nav_app, url))
            .on_new_window(move |url, _features| {
                on_new_window(&popup_app, &url);
                NewWindowResponse::Deny
            })
            .on_page_load(|window, payload| on_page_load(&window, payload.event()));

    if let Some(icon) = app.default_window_icon() {
        builder = builder.icon(icon.clone())?;
    }

    let window = builder.build().context("failed to create the main window")?;

    if let Err(e) = window.set_position(Position::Physical(PhysicalPosition {
        x: bounds.x,
        y: bounds.y,
    })) {
        app_log::warn("window", "set_position_failed", json!({ "error": e.to_string() }));
    }
    if let Err(e) = window.set_size(Size::Physical(PhysicalSize {
        width: bounds.width,
        height: bounds.height,
    })) {
        app_log::warn("window", "set_size_failed", json!({ "error": e.to_string() }));
    }

    app_log::info_with(
        "window",
        "created",
        json!({
            "x": bounds.x,
            "y": bounds.y,
            "width": bounds.width,
            "height": bounds.height,
            "zoom": zoom,
            "displays": layout.displays.len(),
        }),
    );
    Ok(window)
}

/// Shows the main window, recreating it if it was closed (macOS keeps running without one).
pub fn ensure<R: Runtime>(app: &AppHandle<R>) -> Result<()> {
    if let Some(window) = app.get_webview_window(MAIN_WINDOW_LABEL) {
        window.show().context("failed to show the main window")?;
        window.set_focus().context("failed to focus the main window")?;
        return Ok(());
    }
    create(app)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct FakeWindow {
        maximized: Cell<bool>,
        minimized: Cell<bool>,
        bounds: Cell<Option<Rect>>,
    }

    impl FakeWindow {
        fn restored(bounds: Rect) -> Self {
            Self {
                maximized: Cell::new(false),
                minimized: Cell::new(false),
                bounds: Cell::new(Some(bounds)),
            }
        }

        fn maximize(&self, screen: Rect) {
            self.maximized.set(true);
            self.minimized.set(false);
            self.bounds.set(Some(screen));
        }

        /// Windows parks minimized windows far off-screen with an empty client area.
        fn minimize(&self) {
            self.maximized.set(false);
            self.minimized.set(true);
            self.bounds.set(Some(Rect::new(-32000, -32000, 0, 0)));
        }
    }

    impl WindowGeometry for FakeWindow {
        fn maximized(&self) -> bool {
            self.maximized.get()
        }

        fn minimized(&self) -> bool {
            self.minimized.get()
        }

        fn bounds(&self) -> Option<Rect> {
            self.bounds.get()
        }
    }

    fn store() -> (tempfile::TempDir, StateStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = StateStore::new(dir.path().join("state.json"));
        (dir, store)
    }

    const SCREEN: Rect = Rect {
        x: 0,
        y: 0,
        width: 1920,
        height: 1040,
    };

    #[test]
    fn zoom_steps_by_a_tenth() {
        let config = ShellConfig::default();
        let mut session = WindowSession::new(1.0);
        assert_eq!(session.step_zoom(ZoomDirection::In, &config), 1.1);
        assert_eq!(session.step_zoom(ZoomDirection::In, &config), 1.2);
        assert_eq!(session.step_zoom(ZoomDirection::Out, &config), 1.1);
        assert_eq!(session.step_zoom(ZoomDirection::Out, &config), 1.0);
        assert_eq!(session.step_zoom(ZoomDirection::Out, &config), 0.9);
        assert_eq!(session.step_zoom(ZoomDirection::Reset, &config), 1.0);
    }

    #[test]
    fn zoom_is_kept_within_range() {
        let config = ShellConfig::default();
        let mut session = WindowSession::new(0.3);
        assert_eq!(session.step_zoom(ZoomDirection::Out, &config), 0.25);
        assert_eq!(session.step_zoom(ZoomDirection::Out, &config), 0.25);

        let mut session = WindowSession::new(4.95);
        assert_eq!(session.step_zoom(ZoomDirection::In, &config), 5.0);
    }

    #[test]
    fn zoom_in_is_persisted_while_maximized() {
        let (_dir, store) = store();
        let config = ShellConfig::default();
        let session = Mutex::new(WindowSession::new(1.0));
        let window = FakeWindow::restored(Rect::new(100, 80, 1100, 800));
        session.lock().observe(&window);
        window.maximize(SCREEN);

        let zoom = session.lock().step_zoom(ZoomDirection::In, &config);
        assert_eq!(zoom, 1.1);
        assert!(persist_if_maximized(&window, &session, &store));
        assert_eq!(store.load().zoom_factor, 1.1);
    }

    #[test]
    fn maximized_window_saves_its_restore_geometry() {
        let (_dir, store) = store();
        let session = Mutex::new(WindowSession::new(1.0));
        let window = FakeWindow::restored(Rect::new(100, 80, 1100, 800));

        session.lock().observe(&window);
        window.maximize(SCREEN);
        session.lock().observe(&window);
        assert_eq!(session.lock().normal_bounds(), Some(Rect::new(100, 80, 1100, 800)));

        assert!(persist_if_maximized(&window, &session, &store));
        let state = store.load();
        assert_eq!((state.x, state.y), (Some(100), Some(80)));
        assert_eq!((state.width, state.height), (1100, 800));
    }

    #[test]
    fn maximized_without_observed_restore_geometry_uses_current_bounds() {
        let session = WindowSession::new(1.0);
        let window = FakeWindow::restored(Rect::new(0, 0, 10, 10));
        window.maximize(SCREEN);

        let patch = session.persist_patch(&window).expect("patch");
        assert_eq!(patch.width, Some(1920));
        assert_eq!(patch.zoom_factor, Some(1.0));
    }

    #[test]
    fn restored_window_changes_are_not_persisted() {
        let (_dir, store) = store();
        let session = Mutex::new(WindowSession::new(1.0));
        let window = FakeWindow::restored(Rect::new(100, 80, 1100, 800));
        window.maximize(SCREEN);
        assert!(persist_if_maximized(&window, &session, &store));

        // un-maximize, resize, then close while restored: the resize is dropped
        window.maximized.set(false);
        window.bounds.set(Some(Rect::new(300, 300, 640, 480)));
        session.lock().observe(&window);
        assert!(!persist_if_maximized(&window, &session, &store));

        let state = store.load();
        assert_eq!((state.width, state.height), (1920, 1040));
    }

    #[test]
    fn minimizing_a_maximized_window_keeps_its_restore_geometry() {
        let (_dir, store) = store();
        let session = Mutex::new(WindowSession::new(1.0));
        let window = FakeWindow::restored(Rect::new(100, 80, 1100, 800));

        session.lock().observe(&window);
        window.maximize(SCREEN);
        assert!(persist_if_maximized(&window, &session, &store));

        window.minimize();
        session.lock().observe(&window);
        assert!(!persist_if_maximized(&window, &session, &store));

        window.maximize(SCREEN);
        session.lock().observe(&window);
        assert!(persist_if_maximized(&window, &session, &store));

        let state = store.load();
        assert_eq!((state.x, state.y), (Some(100), Some(80)));
        assert_eq!((state.width, state.height), (1100, 800));
    }

    #[test]
    fn zero_sized_bounds_are_never_remembered() {
        let mut session = WindowSession::new(1.0);
        let window = FakeWindow::restored(Rect::new(10, 10, 0, 0));
        session.observe(&window);
        assert_eq!(session.normal_bounds(), None);

        window.maximized.set(true);
        assert_eq!(session.persist_patch(&window), None);
    }

    #[test]
    fn startup_flags_fire_once() {
        let mut session = WindowSession::new(1.0);
        assert!(session.mark_shown());
        assert!(!session.mark_shown());
        assert!(session.mark_zoom_restored());
        assert!(!session.mark_zoom_restored());
    }

    #[test]
    fn zoom_direction_deserializes_from_page_payload() {
        let d: ZoomDirection = serde_json::from_str("\"in\"").expect("deserialize");
        assert_eq!(d, ZoomDirection::In);
        assert!(serde_json::from_str::<ZoomDirection>("\"sideways\"").is_err());
    }

    #[test]
    fn bridge_script_carries_context_menu_flag() {
        let mut config = ShellConfig::default();
        assert!(page_bridge_script(&config).starts_with(
            "window.__MESSENGER_SHELL__ = { nativeContextMenu: true };"
        ));
        config.native_context_menu = false;
        assert!(page_bridge_script(&config).contains("nativeContextMenu: false"));
    }
}
