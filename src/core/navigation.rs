use anyhow::{Context, Result};
use tauri::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDecision {
    /// Let the webview load the URL in place.
    Allow,
    /// Cancel and hand the URL to the system browser/mail client.
    OpenExternal,
    /// Cancel without opening anything.
    Block,
}

impl NavigationDecision {
    pub fn allows_in_place(self) -> bool {
        self == NavigationDecision::Allow
    }
}

/// One-entry origin allow-list for the main webview.
#[derive(Debug, Clone)]
pub struct NavigationGuard {
    allowed: Url,
}

impl NavigationGuard {
    pub fn new(allowed_origin: &str) -> Result<Self> {
        let allowed = Url::parse(allowed_origin)
            .with_context(|| format!("invalid allowed origin: {}", allowed_origin))?;
        Ok(Self { allowed })
    }

    pub fn is_allowed(&self, url: &Url) -> bool {
        if url.as_str() == "about:blank" {
            return true;
        }
        url.origin().is_tuple() && url.origin() == self.allowed.origin()
    }

    pub fn check_navigation(&self, url: &Url) -> NavigationDecision {
        if self.is_allowed(url) {
            return NavigationDecision::Allow;
        }
        external_or_block(url)
    }

    /// New browsing contexts are never created in-app, whatever their origin.
    pub fn check_new_window(&self, url: &Url) -> NavigationDecision {
        external_or_block(url)
    }
}

/// Schemes that only mean something inside the page, or reach the local filesystem.
const LOCAL_SCHEMES: &[&str] = &["javascript", "file", "data", "about", "blob"];

fn external_or_block(url: &Url) -> NavigationDecision {
    if LOCAL_SCHEMES.contains(&url.scheme()) {
        NavigationDecision::Block
    } else {
        NavigationDecision::OpenExternal
    }
}
