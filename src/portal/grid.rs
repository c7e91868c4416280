// Games / apps grids with debounced search.
use gloo_timers::callback::Timeout;
use std::cell::RefCell;
use std::collections::HashMap;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, HtmlImageElement, HtmlInputElement, KeyboardEvent, MouseEvent, window};

use super::loader::load_game;
use super::{catalog_global, settings};
use crate::catalog::{CatalogProvider, GameRecord, JsCatalog};
use crate::search::{APPS_GRID, GAMES_GRID, GridSpec, listable, search_games};

pub const SEARCH_INPUT_ID: &str = "searchInput";
pub const SEARCH_BUTTON_ID: &str = "searchBtn";
pub const APPS_GLOBAL: &str = "apps";
const SEARCH_DEBOUNCE_MS: u32 = 300;

thread_local! {
    // card closures per list id; replaced on every render of that list
    static GRID_HANDLERS: RefCell<HashMap<&'static str, Vec<Closure<dyn FnMut(Event)>>>> =
        RefCell::new(HashMap::new());
    static PENDING_SEARCH: RefCell<Option<Timeout>> = const { RefCell::new(None) };
}

/// Replace the grid's list with one card per record.
pub fn render_grid(spec: &GridSpec, records: &[&GameRecord]) -> Result<(), JsValue> {
    let doc = window().and_then(|w| w.document()).ok_or_else(|| JsValue::from_str("no document"))?;
    let Some(list) = doc.get_element_by_id(spec.list_id) else {
        log::warn!("#{} not in page", spec.list_id);
        return Ok(());
    };
    list.set_inner_html("");
    let mut handlers = Vec::with_capacity(records.len() * 2);

    if records.is_empty() {
        let p = doc.create_element("p")?;
        p.set_class_name("no-results");
        p.set_text_content(Some(spec.empty_text));
        list.append_child(&p)?;
    }
    let favorites = settings().map(|s| s.favorites()).unwrap_or_default();
    for game in records {
        let card = doc.create_element("div")?;
        let favorite = favorites.contains(&game.url);
        card.set_class_name(&if favorite { format!("{} favorite", spec.card_class) } else { spec.card_class.to_string() });
        let img: HtmlImageElement = doc.create_element("img")?.dyn_into()?;
        img.set_src(spec.image_for(game));
        img.set_alt(&game.name);
        img.set_attribute("loading", "lazy")?;
        card.append_child(&img)?;
        let title = doc.create_element("h3")?;
        title.set_text_content(Some(&game.name));
        card.append_child(&title)?;

        let url = game.url.clone();
        let on_click = Closure::wrap(Box::new(move |_evt: Event| load_game(&url)) as Box<dyn FnMut(_)>);
        card.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
        handlers.push(on_click);
        if spec.keyboard {
            card.set_attribute("tabindex", "0")?;
            let url = game.url.clone();
            let on_key = Closure::wrap(Box::new(move |evt: Event| {
                if evt.dyn_ref::<KeyboardEvent>().is_some_and(|k| k.key() == "Enter") {
                    load_game(&url);
                }
            }) as Box<dyn FnMut(_)>);
            card.add_event_listener_with_callback("keypress", on_key.as_ref().unchecked_ref())?;
            handlers.push(on_key);
        }
        list.append_child(&card)?;
    }
    GRID_HANDLERS.with(|h| h.borrow_mut().insert(spec.list_id, handlers));
    Ok(())
}

/// Filter the catalog by the search box and redraw the games grid.
pub fn run_search() {
    let Some(doc) = window().and_then(|w| w.document()) else { return };
    let query = doc
        .get_element_by_id(SEARCH_INPUT_ID)
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        .map(|input| input.value())
        .unwrap_or_default();
    let Some(catalog) = JsCatalog::new(&catalog_global()).snapshot() else {
        log::error!("games array not found");
        return;
    };
    let hits = search_games(&catalog, &query);
    log::debug!("search '{}' matched {} games", query.trim(), hits.len());
    if let Err(err) = render_grid(&GAMES_GRID, &hits) {
        log::warn!("game list not rendered: {err:?}");
    }
}

/// Fill `#app-list` from the page's `apps` array.
pub fn render_apps() {
    let Some(apps) = JsCatalog::new(APPS_GLOBAL).snapshot() else {
        log::warn!("apps array not found");
        return;
    };
    let records: Vec<&GameRecord> = listable(&apps).collect();
    if let Err(err) = render_grid(&APPS_GRID, &records) {
        log::warn!("app list not rendered: {err:?}");
    }
}

fn schedule_search() {
    let timeout = Timeout::new(SEARCH_DEBOUNCE_MS, run_search);
    // dropping the previous timeout cancels it
    PENDING_SEARCH.with(|p| *p.borrow_mut() = Some(timeout));
}

/// Hook the search box and button.
pub fn wire_search() -> Result<(), JsValue> {
    let doc = window().and_then(|w| w.document()).ok_or_else(|| JsValue::from_str("no document"))?;
    if let Some(btn) = doc.get_element_by_id(SEARCH_BUTTON_ID) {
        let on_click = Closure::wrap(Box::new(move |_evt: MouseEvent| run_search()) as Box<dyn FnMut(_)>);
        btn.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
        on_click.forget();
    }
    if let Some(input) = doc.get_element_by_id(SEARCH_INPUT_ID) {
        let on_key = Closure::wrap(Box::new(move |evt: KeyboardEvent| {
            if evt.key() == "Enter" {
                run_search();
            }
        }) as Box<dyn FnMut(_)>);
        input.add_event_listener_with_callback("keypress", on_key.as_ref().unchecked_ref())?;
        on_key.forget();

        let on_input = Closure::wrap(Box::new(move |_evt: Event| schedule_search()) as Box<dyn FnMut(_)>);
        input.add_event_listener_with_callback("input", on_input.as_ref().unchecked_ref())?;
        on_input.forget();
    }
    Ok(())
}
