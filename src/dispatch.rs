//! Card click → game loader.

use crate::catalog::{GameRecord, find_by_identity};
use crate::error::PortalError;

const FORM_HOSTS: [&str; 2] = ["forms.gle", "google.com/forms"];
const NEW_TAB_MARKERS: [&str; 2] = ["youtu.be", "/YouTube.html"];

/// Feedback-style forms never load inside the frame.
pub fn is_external_form(url: &str) -> bool {
    FORM_HOSTS.iter().any(|h| url.contains(h))
}

/// Urls the frame cannot host.
pub fn opens_in_new_context(url: &str) -> bool {
    is_external_form(url) || NEW_TAB_MARKERS.iter().any(|m| url.contains(m))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadAction {
    /// Hand the resolved record to the page's loader.
    Loader(GameRecord),
    /// Show in the embedded frame directly.
    Embed(String),
    /// Open in a new browsing context.
    OpenExternal(String),
    /// Nothing to load.
    Ignore,
}

/// What the page offers at click time.
#[derive(Clone, Copy, Debug, Default)]
pub struct DispatchEnv {
    pub loader_available: bool,
    pub display_available: bool,
}

pub fn resolve_card_click(url: &str, name: &str, catalog: &[GameRecord], env: DispatchEnv) -> LoadAction {
    if url.is_empty() {
        log::warn!("no url for card '{name}'");
        return LoadAction::Ignore;
    }
    if is_external_form(url) {
        return LoadAction::OpenExternal(url.to_string());
    }
    if env.loader_available {
        match find_by_identity(catalog, url) {
            Some(record) => return LoadAction::Loader(record.clone()),
            None => log::debug!("{}; loading by url", PortalError::LoadDispatchFailure(url.to_string())),
        }
    }
    load_by_url(url, env.display_available)
}

/// Fallback path when no loader / record is available.
pub fn load_by_url(url: &str, display_available: bool) -> LoadAction {
    if opens_in_new_context(url) || !display_available {
        if !display_available {
            log::warn!("game display not found, opening {url} in new tab");
        }
        LoadAction::OpenExternal(url.to_string())
    } else {
        LoadAction::Embed(url.to_string())
    }
}

/// Page-level game loader collaborator.
pub trait GameLoader {
    fn load(&mut self, record: &GameRecord);
    fn load_url(&mut self, url: &str);
}
