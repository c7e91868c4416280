//! Browser side of the portal.
//!
//! Everything that touches `web_sys` lives under this module: the homepage
//! carousel task, track containers, the game frame, the games grid and the
//! data-management buttons. The logic these call into (polling, selection,
//! dispatch, stats) is plain Rust and tested natively.
//!
//! Shared DOM state is kept in thread-locals; the page is single-threaded and
//! every borrow is released before control returns to the event loop.

use rand::SeedableRng;
use rand::rngs::StdRng;
use std::cell::RefCell;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, HtmlElement, MouseEvent, window};

use crate::carousel::{Carousel, StartOutcome, TrackSet};
use crate::catalog::JsCatalog;
use crate::config::CarouselConfig;
use crate::poller::{CancelToken, TimerSleeper};
use crate::settings::{LocalStore, PortalSettings};
use crate::visibility::{AnimationState, apply_visibility};

mod data;
mod dom_track;
mod gotd;
mod grid;
mod loader;

pub use data::{clear_all_data, export_data, import_data, update_stats};
pub use dom_track::{DomTrack, DomTrackSet};
pub use gotd::display_game_of_the_day;
pub use grid::{render_apps, render_grid, run_search};
pub use loader::{PortalLoader, load_game};

type HomeCarousel = Carousel<JsCatalog, StdRng>;

/// Homepage carousel once its tracks are bound.
struct HomeState {
    carousel: HomeCarousel,
    tracks: DomTrackSet,
}

thread_local! {
    static CONFIG: RefCell<CarouselConfig> = RefCell::new(CarouselConfig::full_width());
    static HOME: RefCell<Option<HomeState>> = const { RefCell::new(None) };
    // cancel flag of the poll currently in flight
    static PENDING: RefCell<Option<CancelToken>> = const { RefCell::new(None) };
}

// --- Small shared helpers -------------------------------------------------------

pub(crate) fn settings() -> Option<PortalSettings<LocalStore>> {
    match LocalStore::open() {
        Ok(store) => Some(PortalSettings::new(store)),
        Err(err) => {
            log::warn!("{err}");
            None
        }
    }
}

pub(crate) fn now_ms() -> f64 {
    window().and_then(|w| w.performance()).map(|p| p.now()).unwrap_or(0.0)
}

pub(crate) fn catalog_global() -> String {
    CONFIG.with(|c| c.borrow().catalog_global.clone())
}

fn auto_scroll() -> bool {
    settings().is_none_or(|s| s.carousel_auto_scroll())
}

fn new_carousel(config: &CarouselConfig) -> HomeCarousel {
    Carousel::new(config.clone(), JsCatalog::new(&config.catalog_global), StdRng::from_entropy())
}

// --- Homepage carousel ------------------------------------------------------------

/// Start (or restart) the homepage carousel with `config`.
pub fn start_home_carousel(config: CarouselConfig) {
    CONFIG.with(|c| *c.borrow_mut() = config.clone());
    spawn_poll(config);
}

fn spawn_poll(config: CarouselConfig) {
    let cancel = CancelToken::new();
    if let Some(previous) = PENDING.with(|p| p.borrow_mut().replace(cancel.clone())) {
        previous.cancel();
    }
    wasm_bindgen_futures::spawn_local(async move {
        let mut carousel = new_carousel(&config);
        let ids = config.layout.track_ids();
        let mut tracks = DomTrackSet::new(&ids, &config.placeholder_image);
        let result = carousel.start(TimerSleeper, cancel, &mut tracks).await;
        match &result {
            Ok(StartOutcome::Cancelled) => return,
            Ok(StartOutcome::Rendered(n)) | Ok(StartOutcome::FallbackRendered(n)) => {
                log::info!("home carousel ready ({n} cards)");
                apply_visibility(is_hidden(), tracks.tracks_mut(), auto_scroll());
            }
            Ok(StartOutcome::NothingPlayable) => log::error!("no playable games found"),
            Err(err) => log::error!("{err}"),
        }
        PENDING.with(|p| p.borrow_mut().take());
        // cards of the current set stay clickable until something replaces them
        if result.as_ref().is_ok_and(StartOutcome::rendered) {
            replace_home(HomeState { carousel, tracks });
        }
    });
}

fn replace_home(next: HomeState) {
    let keep: Vec<String> = next.tracks.ids().into_iter().map(String::from).collect();
    let keep: Vec<&str> = keep.iter().map(String::as_str).collect();
    if let Some(previous) = HOME.with(|h| h.borrow_mut().replace(next)) {
        previous.tracks.retire(&keep);
    }
}

/// Re-render from an already loaded catalog, or poll again if it is not there.
pub fn reload_home_carousels() {
    log::info!("reloading carousel");
    let rendered = HOME.with(|h| {
        let mut home = h.borrow_mut();
        let home = home.as_mut()?;
        home.carousel.reload(&mut home.tracks)
    });
    if rendered.is_none() {
        let config = CONFIG.with(|c| c.borrow().clone());
        spawn_poll(config);
    }
}

// --- Visibility -----------------------------------------------------------------

fn is_hidden() -> bool {
    window().and_then(|w| w.document()).is_some_and(|d| d.hidden())
}

fn on_visibility_change() {
    let hidden = is_hidden();
    let on = auto_scroll();
    let state = HOME.with(|h| {
        h.borrow_mut().as_mut().map(|home| apply_visibility(hidden, home.tracks.tracks_mut(), on))
    });
    let state = state.unwrap_or(if on { AnimationState::for_visibility(hidden) } else { AnimationState::Paused });
    // tracks this carousel does not own follow the same state
    let class = CONFIG.with(|c| c.borrow().track_class.clone());
    let Some(doc) = window().and_then(|w| w.document()) else { return };
    let Ok(nodes) = doc.query_selector_all(&format!(".{class}")) else { return };
    for i in 0..nodes.length() {
        if let Some(el) = nodes.item(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) {
            dom_track::set_play_state(&el, state);
        }
    }
}

fn wire_visibility() -> Result<(), JsValue> {
    let doc = window().and_then(|w| w.document()).ok_or_else(|| JsValue::from_str("no document"))?;
    let closure = Closure::wrap(Box::new(move |_evt: Event| on_visibility_change()) as Box<dyn FnMut(_)>);
    doc.add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

// --- Page wiring ------------------------------------------------------------------

fn toggle_fullscreen() {
    let Some(doc) = window().and_then(|w| w.document()) else { return };
    if doc.fullscreen_element().is_some() {
        doc.exit_fullscreen();
        return;
    }
    if let Some(frame) = doc.get_element_by_id(loader::GAME_FRAME_ID) {
        if let Err(err) = frame.request_fullscreen() {
            log::error!("fullscreen error: {err:?}");
        }
    }
}

/// Hide everything, then show `section` and mark `link` active.
fn show_section(section: &str, link: &str) -> Option<web_sys::Document> {
    loader::hide_all();
    let doc = window().and_then(|w| w.document())?;
    if let Some(el) = doc.get_element_by_id(section).and_then(|e| e.dyn_into::<HtmlElement>().ok()) {
        let _ = el.style().set_property("display", "block");
    }
    if let Some(link) = doc.get_element_by_id(link) {
        let _ = link.class_list().add_1("active");
    }
    Some(doc)
}

pub fn show_home() {
    let Some(doc) = show_section("content-home", "homeLink") else { return };
    if let Ok(Some(info)) = doc.query_selector(".homepage-info-buttons") {
        if let Ok(info) = info.dyn_into::<HtmlElement>() {
            let _ = info.style().set_property("display", "flex");
        }
    }
    if let Err(err) = gotd::display_game_of_the_day() {
        log::error!("game of the day: {err:?}");
    }
}

pub fn show_games() {
    show_section("content-gms", "gameLink");
    grid::run_search();
}

pub fn show_apps() {
    show_section("content-aps", "appsLink");
    grid::render_apps();
}

fn listen_click(id: &str, f: fn()) -> Result<(), JsValue> {
    let doc = window().and_then(|w| w.document()).ok_or_else(|| JsValue::from_str("no document"))?;
    if let Some(el) = doc.get_element_by_id(id) {
        let closure = Closure::wrap(Box::new(move |_evt: MouseEvent| f()) as Box<dyn FnMut(_)>);
        el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

/// Wire the shell: visibility, search, navigation, data buttons and the
/// game of the day.
pub fn start_portal() -> Result<(), JsValue> {
    wire_visibility()?;
    grid::wire_search()?;
    data::wire_data_buttons()?;
    listen_click("fullscreenBtn", toggle_fullscreen)?;
    listen_click("backToHomeGame", || {
        loader::stop_tracking();
        show_home();
    })?;
    listen_click("backToHomeApps", show_home)?;
    listen_click("homeLink", show_home)?;
    listen_click("gameLink", show_games)?;
    listen_click("appsLink", show_apps)?;
    if let Err(err) = gotd::display_game_of_the_day() {
        log::warn!("game of the day: {err:?}");
    }
    if let Err(err) = update_stats() {
        log::warn!("stats panel: {err:?}");
    }
    log::info!("portal initialized");
    Ok(())
}
