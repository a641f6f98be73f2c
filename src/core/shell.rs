use crate::core::{
    context_menu::ContextTargets,
    main_window::WindowSession,
    menu_labels::{self, MenuLabels},
    navigation::NavigationGuard,
    persistence::StateStore,
};
use crate::models::ShellConfig;
use anyhow::Result;
use parking_lot::Mutex;

/// Everything the shell keeps for its single window, held in Tauri's managed state.
pub struct ShellState {
    pub config: ShellConfig,
    pub store: StateStore,
    pub guard: NavigationGuard,
    pub labels: &'static MenuLabels,
    pub session: Mutex<WindowSession>,
    pub context_targets: Mutex<ContextTargets>,
}

impl ShellState {
    pub fn new(config: ShellConfig, store: StateStore) -> Result<Self> {
        let guard = NavigationGuard::new(&config.allowed_origin)?;
        let session = WindowSession::new(config.default_zoom);
        Ok(Self {
            config,
            store,
            guard,
            labels: menu_labels::system_labels(),
            session: Mutex::new(session),
            context_targets: Mutex::new(ContextTargets::default()),
        })
    }
}
