//! Portal carousel core crate.
//!
//! A game-portal shell for the browser: the homepage carousel waits for the
//! page's game catalog, shuffles a loop-safe selection into one or two
//! scrolling tracks and hands clicks to the game frame. Play statistics and
//! local data export / import ride along.
//!
//! Pure logic (polling, selection, dispatch, stats) is plain Rust and tested
//! natively; `portal` holds the `web_sys` glue.

use wasm_bindgen::prelude::*;

pub mod carousel;
pub mod catalog;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod poller;
pub mod portal;
pub mod render;
pub mod search;
pub mod selection;
pub mod settings;
pub mod stats;
pub mod visibility;

pub use carousel::{Carousel, StartOutcome, TrackSet};
pub use catalog::{CatalogProvider, GameRecord, StaticCatalog};
pub use config::{CarouselConfig, TrackLayout};
pub use error::PortalError;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    // a second init (hot reload) is harmless
    let _ = console_log::init_with_level(log::Level::Info);
}

// -----------------------------------------------------------------------------
// JS entrypoints
// -----------------------------------------------------------------------------

/// Wire the shell (visibility, search, buttons). Call once after DOM ready.
#[wasm_bindgen]
pub fn start_portal() -> Result<(), JsValue> {
    portal::start_portal()
}

/// Start the homepage carousel with a preset: `"full"` or `"split"`.
#[wasm_bindgen]
pub fn start_home_carousel(variant: &str) {
    portal::start_home_carousel(CarouselConfig::variant(variant));
}

/// Start the homepage carousel from a JSON config object.
#[wasm_bindgen]
pub fn start_home_carousel_with(config_json: &str) -> Result<(), JsValue> {
    let config = CarouselConfig::from_json(config_json)?;
    portal::start_home_carousel(config);
    Ok(())
}

#[wasm_bindgen(js_name = reloadHomeCarousels)]
pub fn reload_home_carousels() {
    portal::reload_home_carousels();
}

#[wasm_bindgen]
pub fn load_game(url: &str) {
    portal::load_game(url);
}

#[wasm_bindgen]
pub fn show_home() {
    portal::show_home();
}

#[wasm_bindgen]
pub fn show_games() {
    portal::show_games();
}

#[wasm_bindgen]
pub fn show_apps() {
    portal::show_apps();
}

#[wasm_bindgen]
pub fn display_game_of_the_day() -> Result<(), JsValue> {
    portal::display_game_of_the_day()
}

#[wasm_bindgen]
pub fn search_games() {
    portal::run_search();
}

#[wasm_bindgen]
pub fn export_data() -> Result<(), JsValue> {
    portal::export_data()
}

#[wasm_bindgen]
pub fn import_data(json: &str) -> Result<(), JsValue> {
    portal::import_data(json)
}

#[wasm_bindgen]
pub fn clear_all_data() -> Result<(), JsValue> {
    portal::clear_all_data()
}

#[wasm_bindgen]
pub fn update_stats() -> Result<(), JsValue> {
    portal::update_stats()
}
