// "Game of the Day" card on the homepage.
use std::cell::RefCell;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlImageElement, MouseEvent, window};

use super::loader::load_game;
use crate::catalog::{GameRecord, parse_record_json};
use crate::search::GAMES_GRID;

pub const GOTD_CONTAINER_ID: &str = "game-of-the-day-container";
const PICKER_FN: &str = "getGameOfTheDay";

thread_local! {
    static PLAY_HANDLER: RefCell<Option<Closure<dyn FnMut(MouseEvent)>>> = const { RefCell::new(None) };
}

/// Ask the page's picker for today's game.
fn todays_game() -> Option<GameRecord> {
    let picker = js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str(PICKER_FN)).ok()?;
    let Some(picker) = picker.dyn_ref::<js_sys::Function>() else {
        log::error!("{PICKER_FN} not found");
        return None;
    };
    let game = match picker.call0(&JsValue::NULL) {
        Ok(game) => game,
        Err(err) => {
            log::error!("{PICKER_FN} failed: {err:?}");
            return None;
        }
    };
    let json = js_sys::JSON::stringify(&game).ok()?.as_string()?;
    parse_record_json(&json)
}

/// Fill the container, if the page has one, with today's pick.
pub fn display_game_of_the_day() -> Result<(), JsValue> {
    let doc = window().and_then(|w| w.document()).ok_or_else(|| JsValue::from_str("no document"))?;
    let Some(container) = doc.get_element_by_id(GOTD_CONTAINER_ID) else { return Ok(()) };
    let Some(game) = todays_game() else { return Ok(()) };

    let card = doc.create_element("div")?;
    card.set_class_name("gotd-card");
    let badge = doc.create_element("div")?;
    badge.set_class_name("gotd-badge");
    badge.set_text_content(Some("Game of the Day"));
    card.append_child(&badge)?;

    let img: HtmlImageElement = doc.create_element("img")?.dyn_into()?;
    img.set_src(GAMES_GRID.image_for(&game));
    img.set_alt(&game.name);
    img.set_attribute("loading", "lazy")?;
    card.append_child(&img)?;

    let title = doc.create_element("h3")?;
    title.set_text_content(Some(&game.name));
    card.append_child(&title)?;

    let play = doc.create_element("button")?;
    play.set_class_name("gotd-play-btn");
    play.set_text_content(Some("Play Now"));
    let url = game.url.clone();
    let on_play = Closure::wrap(Box::new(move |_evt: MouseEvent| load_game(&url)) as Box<dyn FnMut(_)>);
    play.add_event_listener_with_callback("click", on_play.as_ref().unchecked_ref())?;
    card.append_child(&play)?;

    container.set_inner_html("");
    container.append_child(&card)?;
    PLAY_HANDLER.with(|h| *h.borrow_mut() = Some(on_play));
    log::info!("game of the day: {}", game.name);
    Ok(())
}
