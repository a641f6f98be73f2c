use crate::core::{external, menu_labels::MenuLabels, ShellState};
use serde::Deserialize;
use tauri::{
    menu::{Menu, MenuBuilder, MenuEvent, MenuItemBuilder, PredefinedMenuItem},
    AppHandle, Manager, Runtime,
};

const ID_PREFIX: &str = "ctx:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Audio,
    #[serde(other)]
    Other,
}

/// What the page reports about the element under the cursor.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContextMenuParams {
    pub link_url: Option<String>,
    pub src_url: Option<String>,
    pub media_type: Option<MediaKind>,
    pub is_editable: bool,
    pub selection_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalAction {
    OpenLink,
    OpenImage,
    OpenVideo,
}

impl ExternalAction {
    pub fn id(self) -> &'static str {
        match self {
            ExternalAction::OpenLink => "ctx:open_link",
            ExternalAction::OpenImage => "ctx:open_image",
            ExternalAction::OpenVideo => "ctx:open_video",
        }
    }

    fn label(self, labels: &MenuLabels) -> &'static str {
        match self {
            ExternalAction::OpenLink => labels.open_link,
            ExternalAction::OpenImage => labels.open_image,
            ExternalAction::OpenVideo => labels.open_video,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// The "open externally" entries for a click, in menu order.
pub fn external_entries(params: &ContextMenuParams) -> Vec<(ExternalAction, String)> {
    let mut entries = Vec::new();
    if let Some(link) = non_empty(&params.link_url) {
        entries.push((ExternalAction::OpenLink, link));
    }
    if let Some(src) = non_empty(&params.src_url) {
        match params.media_type {
            Some(MediaKind::Image) => entries.push((ExternalAction::OpenImage, src)),
            Some(MediaKind::Video) => entries.push((ExternalAction::OpenVideo, src)),
            _ => {}
        }
    }
    entries
}

/// URLs behind the entries of the most recently shown menu.
#[derive(Debug, Default)]
pub struct ContextTargets {
    entries: Vec<(ExternalAction, String)>,
}

impl ContextTargets {
    pub fn replace(&mut self, entries: Vec<(ExternalAction, String)>) {
        self.entries = entries;
    }

    pub fn url_for(&self, id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(action, _)| action.id() == id)
            .map(|(_, url)| url.as_str())
    }
}

pub fn build_menu<R: Runtime>(
    app: &AppHandle<R>,
    labels: &MenuLabels,
    entries: &[(ExternalAction, String)],
    params: &ContextMenuParams,
) -> tauri::Result<Menu<R>> {
    let mut builder = MenuBuilder::new(app);
    for (action, _) in entries {
        let item = MenuItemBuilder::with_id(action.id(), action.label(labels)).build(app)?;
        builder = builder.item(&item);
    }
    if !entries.is_empty() {
        builder = builder.separator();
    }

    let has_selection = !params.selection_text.trim().is_empty();
    if params.is_editable {
        builder = builder
            .item(&PredefinedMenuItem::cut(app, Some(labels.cut))?)
            .item(&PredefinedMenuItem::copy(app, Some(labels.copy))?)
            .item(&PredefinedMenuItem::paste(app, Some(labels.paste))?)
            .separator();
    } else if has_selection {
        builder = builder
            .item(&PredefinedMenuItem::copy(app, Some(labels.copy))?)
            .separator();
    }

    builder
        .item(&PredefinedMenuItem::select_all(app, Some(labels.select_all))?)
        .build()
}

pub fn handle_menu_event<R: Runtime>(app: &AppHandle<R>, event: MenuEvent) {
    let id = event.id().as_ref();
    if !id.starts_with(ID_PREFIX) {
        return;
    }
    let Some(state) = app.try_state::<ShellState>() else {
        return;
    };
    let url = state.context_targets.lock().url_for(id).map(str::to_string);
    match url {
        Some(url) => external::open(app, &url),
        None => crate::core::app_log::info("context_menu", "stale_entry"),
    }
}
