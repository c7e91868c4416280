// Game display: embedded frame, new-tab fallback and play-time tracking.
use std::cell::RefCell;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, HtmlElement, HtmlIFrameElement, window};

use super::{catalog_global, now_ms, settings};
use crate::catalog::{CatalogProvider, GameRecord, JsCatalog};
use crate::dispatch::{DispatchEnv, GameLoader, LoadAction, opens_in_new_context, resolve_card_click};
use crate::stats::PlayTracker;

pub const GAME_DISPLAY_ID: &str = "game-display";
pub const GAME_FRAME_ID: &str = "game-iframe";

thread_local! {
    static TRACKER: RefCell<PlayTracker> = RefCell::new(PlayTracker::new());
    // onload / onerror of the frame; replaced on every load
    static FRAME_HANDLERS: RefCell<Vec<Closure<dyn FnMut(Event)>>> = const { RefCell::new(Vec::new()) };
}

pub fn open_external(url: &str) {
    if let Some(w) = window() {
        if w.open_with_url_and_target(url, "_blank").is_err() {
            log::error!("could not open {url} in a new tab");
        }
    }
}

fn display_elements() -> Option<(HtmlElement, HtmlIFrameElement)> {
    let doc = window()?.document()?;
    let display = doc.get_element_by_id(GAME_DISPLAY_ID)?.dyn_into::<HtmlElement>().ok()?;
    let frame = doc.get_element_by_id(GAME_FRAME_ID)?.dyn_into::<HtmlIFrameElement>().ok()?;
    Some((display, frame))
}

/// Hide every `.content` section and clear the active nav link.
pub fn hide_all() {
    let Some(doc) = window().and_then(|w| w.document()) else { return };
    if let Ok(sections) = doc.query_selector_all(".content") {
        for i in 0..sections.length() {
            if let Some(el) = sections.item(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) {
                let _ = el.style().set_property("display", "none");
            }
        }
    }
    if let Ok(links) = doc.query_selector_all(".sidebar-link") {
        for i in 0..links.length() {
            if let Some(el) = links.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                let _ = el.class_list().remove_1("active");
            }
        }
    }
    if let Ok(Some(info)) = doc.query_selector(".homepage-info-buttons") {
        if let Ok(info) = info.dyn_into::<HtmlElement>() {
            let _ = info.style().set_property("display", "none");
        }
    }
}

/// Close the running session, if any, into the stored stats.
pub fn stop_tracking() {
    let store = settings();
    TRACKER.with(|t| {
        if let Some(store) = store.as_ref() {
            match t.borrow_mut().stop(now_ms(), store) {
                Ok(Some(secs)) => log::debug!("session recorded: {secs}s"),
                Ok(None) => {}
                Err(err) => log::warn!("play stats not saved: {err}"),
            }
        }
    });
}

/// Frame-based loader used when the page provides none.
#[derive(Default)]
pub struct PortalLoader;

impl GameLoader for PortalLoader {
    fn load(&mut self, record: &GameRecord) {
        log::info!("loading {} ({})", record.name, record.url);
        self.load_url(&record.url);
    }

    fn load_url(&mut self, url: &str) {
        if url.is_empty() {
            log::error!("no url provided");
            return;
        }
        if opens_in_new_context(url) {
            open_external(url);
            return;
        }
        let Some((display, frame)) = display_elements() else {
            log::warn!("game display not found, opening {url} in new tab");
            open_external(url);
            return;
        };
        hide_all();
        stop_tracking();

        // detach before resetting src so stale handlers never see the blank load
        frame.set_onload(None);
        frame.set_onerror(None);
        frame.set_src("");
        frame.set_src(url);
        let _ = display.style().set_property("display", "block");

        // load / error are advisory: they feed stats and are never retried
        let loaded_url = url.to_string();
        let on_load = Closure::wrap(Box::new(move |_evt: Event| {
            log::info!("game loaded: {loaded_url}");
            TRACKER.with(|t| t.borrow_mut().start(&loaded_url, now_ms()));
        }) as Box<dyn FnMut(_)>);
        let failed_url = url.to_string();
        let on_error = Closure::wrap(Box::new(move |_evt: Event| {
            log::error!("failed to load game: {failed_url}");
        }) as Box<dyn FnMut(_)>);
        frame.set_onload(Some(on_load.as_ref().unchecked_ref()));
        frame.set_onerror(Some(on_error.as_ref().unchecked_ref()));
        FRAME_HANDLERS.with(|h| *h.borrow_mut() = vec![on_load, on_error]);
    }
}

/// A `loadGame(url)` function published by the page.
pub struct JsLoader(js_sys::Function);

impl JsLoader {
    pub fn from_page() -> Option<Self> {
        let f = js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str("loadGame")).ok()?;
        f.dyn_into::<js_sys::Function>().ok().map(JsLoader)
    }
}

impl GameLoader for JsLoader {
    fn load(&mut self, record: &GameRecord) {
        self.load_url(&record.url);
    }

    fn load_url(&mut self, url: &str) {
        if let Err(err) = self.0.call1(&JsValue::NULL, &JsValue::from_str(url)) {
            log::error!("page loadGame failed for {url}: {err:?}");
        }
    }
}

fn page_loader() -> Box<dyn GameLoader> {
    match JsLoader::from_page() {
        Some(js) => Box::new(js),
        None => Box::new(PortalLoader),
    }
}

/// Carousel card click.
pub fn dispatch_card_click(url: &str, name: &str) {
    let catalog = JsCatalog::new(&catalog_global()).snapshot().unwrap_or_default();
    let env = DispatchEnv { loader_available: true, display_available: display_elements().is_some() };
    match resolve_card_click(url, name, &catalog, env) {
        LoadAction::Loader(record) => page_loader().load(&record),
        LoadAction::Embed(url) => PortalLoader.load_url(&url),
        LoadAction::OpenExternal(url) => open_external(&url),
        LoadAction::Ignore => {}
    }
}

/// Load by url in the portal frame. Safe to publish as the page's `loadGame`.
pub fn load_game(url: &str) {
    PortalLoader.load_url(url);
}
