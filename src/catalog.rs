//! Game catalog collaborator.
//!
//! The catalog is owned by page code outside this crate and is populated at an
//! indeterminate time. Everything here only reads snapshots of it.

use serde::Deserialize;
use std::cell::RefCell;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

/// One playable entry (game or app).
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct GameRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub image: Option<String>,
}

impl GameRecord {
    pub fn new(name: &str, url: &str) -> Self {
        Self { name: name.to_string(), url: url.to_string(), image: None }
    }

    pub fn with_image(mut self, image: &str) -> Self {
        self.image = Some(image.to_string());
        self
    }

    /// Url, or name when the url is absent.
    pub fn identity(&self) -> &str {
        if self.url.is_empty() { &self.name } else { &self.url }
    }
}

/// Source of catalog snapshots.
///
/// `None` means the catalog is not reachable yet; `Some(vec![])` means it is
/// reachable but still empty. Both are expected transient states.
pub trait CatalogProvider {
    fn snapshot(&self) -> Option<Vec<GameRecord>>;

    /// Snapshot only when it has at least one record.
    fn populated(&self) -> Option<Vec<GameRecord>> {
        self.snapshot().filter(|games| !games.is_empty())
    }
}

/// In-memory catalog. Can be filled after construction.
#[derive(Default)]
pub struct StaticCatalog {
    games: RefCell<Option<Vec<GameRecord>>>,
}

impl StaticCatalog {
    pub fn new(games: Vec<GameRecord>) -> Self {
        Self { games: RefCell::new(Some(games)) }
    }

    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn set(&self, games: Vec<GameRecord>) {
        self.games.replace(Some(games));
    }
}

impl CatalogProvider for StaticCatalog {
    fn snapshot(&self) -> Option<Vec<GameRecord>> {
        self.games.borrow().clone()
    }
}

impl<C: CatalogProvider + ?Sized> CatalogProvider for std::rc::Rc<C> {
    fn snapshot(&self) -> Option<Vec<GameRecord>> {
        (**self).snapshot()
    }
}

/// Reads a global JS array (e.g. `window.games`).
#[derive(Clone, Debug)]
pub struct JsCatalog {
    global: String,
}

impl JsCatalog {
    pub fn new(global: &str) -> Self {
        Self { global: global.to_string() }
    }
}

impl CatalogProvider for JsCatalog {
    fn snapshot(&self) -> Option<Vec<GameRecord>> {
        let value = lookup_global(&self.global)?;
        let array: js_sys::Array = value.unchecked_into();
        let json = js_sys::JSON::stringify(&array).ok()?.as_string()?;
        Some(parse_catalog_json(&json))
    }
}

// Top-level `const games = [...]` in a classic script is a global lexical
// binding and never shows up on `window`, so fall back to a scoped lookup.
fn lookup_global(name: &str) -> Option<JsValue> {
    let on_window = js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str(name)).ok();
    if let Some(v) = on_window.filter(js_sys::Array::is_array) {
        return Some(v);
    }
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$') {
        return None;
    }
    let body = format!("return typeof {name} !== 'undefined' ? {name} : undefined;");
    let lexical = js_sys::Function::new_no_args(&body).call0(&JsValue::NULL).ok()?;
    js_sys::Array::is_array(&lexical).then_some(lexical)
}

/// Parse a JSON array of records; non-object elements are skipped.
pub fn parse_catalog_json(json: &str) -> Vec<GameRecord> {
    let items: Vec<serde_json::Value> = match serde_json::from_str(json) {
        Ok(items) => items,
        Err(err) => {
            log::warn!("catalog is not a JSON array: {err}");
            return Vec::new();
        }
    };
    items
        .into_iter()
        .filter(|v| v.is_object())
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect()
}

/// Parse one record (e.g. the game of the day). Needs both name and url.
pub fn parse_record_json(json: &str) -> Option<GameRecord> {
    serde_json::from_str::<GameRecord>(json)
        .ok()
        .filter(|g| !g.name.is_empty() && !g.url.is_empty())
}

pub fn find_by_identity<'a>(catalog: &'a [GameRecord], identity: &str) -> Option<&'a GameRecord> {
    catalog.iter().find(|g| g.identity() == identity)
}
