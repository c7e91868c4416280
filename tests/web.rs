// Browser tests for the DOM glue (`wasm-pack test --headless --firefox`).
#![cfg(target_arch = "wasm32")]

use portal_carousel::carousel::TrackSet;
use portal_carousel::portal::DomTrackSet;
use portal_carousel::render::{CardModel, TrackSurface};
use portal_carousel::settings::{LocalStore, PortalSettings};
use portal_carousel::visibility::AnimationState;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{HtmlElement, window};

wasm_bindgen_test_configure!(run_in_browser);

fn add_track(id: &str) -> HtmlElement {
    let doc = window().and_then(|w| w.document()).unwrap();
    let el: HtmlElement = doc.create_element("div").unwrap().dyn_into().unwrap();
    el.set_id(id);
    doc.body().unwrap().append_child(&el).unwrap();
    el
}

#[wasm_bindgen_test]
fn dom_track_attaches_and_rerenders() {
    let mut set = DomTrackSet::new(&["web-track-late"], "ph.png");
    assert_eq!(set.attach(), Err("web-track-late".to_string()));

    let el = add_track("web-track-late");
    set.attach().unwrap();
    let cards = [CardModel::new("/a", "A", "a.png"), CardModel::new("/a", "A", "a.png")];
    set.tracks_mut()[0].replace_cards(&cards);
    set.tracks_mut()[0].replace_cards(&cards);
    assert_eq!(el.child_element_count(), 2);
    assert_eq!(el.first_element_child().unwrap().get_attribute("data-game-url").as_deref(), Some("/a"));

    set.tracks_mut()[0].set_animation_state(AnimationState::Paused);
    assert_eq!(el.style().get_property_value("animation-play-state").unwrap(), "paused");
    el.remove();
}

#[wasm_bindgen_test]
fn local_store_round_trips_flags() {
    let settings = PortalSettings::new(LocalStore::open().unwrap());
    settings.set_carousel_auto_scroll(false).unwrap();
    assert!(!settings.carousel_auto_scroll());
    settings.set_carousel_auto_scroll(true).unwrap();
    assert!(settings.carousel_auto_scroll());
}

#[wasm_bindgen_test]
fn retired_set_empties_containers_it_alone_owned() {
    let top = add_track("web-track-top");
    let bottom = add_track("web-track-bottom");
    let mut old = DomTrackSet::new(&["web-track-top", "web-track-bottom"], "ph.png");
    old.attach().unwrap();
    for track in old.tracks_mut() {
        track.replace_cards(&[CardModel::new("/a", "A", "a.png")]);
    }

    old.retire(&["web-track-top"]);
    assert_eq!(top.child_element_count(), 1);
    assert_eq!(bottom.child_element_count(), 0);
    top.remove();
    bottom.remove();
}

#[wasm_bindgen_test]
fn grids_use_their_own_list_and_wording() {
    use portal_carousel::portal::render_grid;
    use portal_carousel::search::{APPS_GRID, GAMES_GRID};
    use portal_carousel::GameRecord;

    let apps = add_track(APPS_GRID.list_id);
    render_grid(&APPS_GRID, &[]).unwrap();
    assert_eq!(apps.text_content().as_deref(), Some("No apps found."));

    let games = add_track(GAMES_GRID.list_id);
    let blank = GameRecord::new("Slope", "/g/slope").with_image("");
    render_grid(&GAMES_GRID, &[&blank]).unwrap();
    let card = games.first_element_child().unwrap();
    assert_eq!(card.get_attribute("tabindex").as_deref(), Some("0"));
    let img = card.query_selector("img").unwrap().unwrap();
    assert_eq!(img.get_attribute("src").as_deref(), Some(GAMES_GRID.placeholder_image));
    apps.remove();
    games.remove();
}
