//! Persisted user preferences.
//!
//! The page keeps everything in a flat string store; `PortalSettings` puts
//! typed getters / setters on top so callers never touch raw keys.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::error::{PortalError, Result};

// --- Keys ---------------------------------------------------------------------

pub const KEY_THEME: &str = "selectedTheme";
pub const KEY_SNOW: &str = "snowEffect";
pub const KEY_AUTO_SEASONAL: &str = "autoApplySeasonalThemes";
pub const KEY_AUTO_SCROLL: &str = "carouselAutoScroll";
pub const KEY_FAVORITES: &str = "gameFavorites";
pub const KEY_PLAY_TIME: &str = "gamePlayTime";
pub const KEY_PLAY_COUNT: &str = "gamePlayCount";
pub const KEY_LAST_PLAYED: &str = "gameLastPlayed";

pub type PlayTime = BTreeMap<String, u64>;
pub type PlayCount = BTreeMap<String, u32>;
pub type LastPlayed = BTreeMap<String, serde_json::Value>;

// --- Store ----------------------------------------------------------------------

pub trait SettingsStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

#[derive(Default)]
pub struct MemoryStore {
    map: RefCell<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.map.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.borrow().is_empty()
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.borrow().get(key).cloned()
    }
    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.map.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
    fn remove(&self, key: &str) -> Result<()> {
        self.map.borrow_mut().remove(key);
        Ok(())
    }
    fn clear(&self) -> Result<()> {
        self.map.borrow_mut().clear();
        Ok(())
    }
}

/// `window.localStorage`.
pub struct LocalStore {
    storage: web_sys::Storage,
}

impl LocalStore {
    pub fn open() -> Result<Self> {
        let storage = web_sys::window()
            .ok_or_else(|| PortalError::Storage("no window".into()))?
            .local_storage()
            .map_err(|_| PortalError::Storage("localStorage access denied".into()))?
            .ok_or_else(|| PortalError::Storage("localStorage unavailable".into()))?;
        Ok(Self { storage })
    }
}

fn storage_err(op: &str, key: &str) -> PortalError {
    PortalError::Storage(format!("{op} '{key}' failed"))
}

impl SettingsStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }
    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.storage.set_item(key, value).map_err(|_| storage_err("set", key))
    }
    fn remove(&self, key: &str) -> Result<()> {
        self.storage.remove_item(key).map_err(|_| storage_err("remove", key))
    }
    fn clear(&self) -> Result<()> {
        self.storage.clear().map_err(|_| storage_err("clear", "*"))
    }
}

// --- Typed view -----------------------------------------------------------------

pub struct PortalSettings<S: SettingsStore> {
    store: S,
}

impl<S: SettingsStore> PortalSettings<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.store.get(key).filter(|v| !v.is_empty())
    }

    pub fn theme(&self) -> Option<String> {
        self.raw(KEY_THEME)
    }

    pub fn set_theme(&self, theme: &str) -> Result<()> {
        self.store.set(KEY_THEME, theme)
    }

    pub fn snow_effect(&self) -> bool {
        self.flag(KEY_SNOW, false)
    }

    pub fn set_snow_effect(&self, on: bool) -> Result<()> {
        self.set_flag(KEY_SNOW, on)
    }

    pub fn auto_seasonal_themes(&self) -> bool {
        self.flag(KEY_AUTO_SEASONAL, false)
    }

    pub fn set_auto_seasonal_themes(&self, on: bool) -> Result<()> {
        self.set_flag(KEY_AUTO_SEASONAL, on)
    }

    /// Homepage strips scroll unless explicitly disabled.
    pub fn carousel_auto_scroll(&self) -> bool {
        self.flag(KEY_AUTO_SCROLL, true)
    }

    pub fn set_carousel_auto_scroll(&self, on: bool) -> Result<()> {
        self.set_flag(KEY_AUTO_SCROLL, on)
    }

    pub fn favorites(&self) -> Vec<String> {
        self.json(KEY_FAVORITES)
    }

    pub fn is_favorite(&self, url: &str) -> bool {
        self.favorites().iter().any(|f| f == url)
    }

    /// Flip favorite state; returns the new state.
    pub fn toggle_favorite(&self, url: &str) -> Result<bool> {
        let mut favs = self.favorites();
        let now_fav = match favs.iter().position(|f| f == url) {
            Some(i) => {
                favs.remove(i);
                false
            }
            None => {
                favs.push(url.to_string());
                true
            }
        };
        self.set_json(KEY_FAVORITES, &favs)?;
        Ok(now_fav)
    }

    pub fn play_time(&self) -> PlayTime {
        self.json(KEY_PLAY_TIME)
    }

    pub fn play_count(&self) -> PlayCount {
        self.json(KEY_PLAY_COUNT)
    }

    pub fn last_played(&self) -> LastPlayed {
        self.json(KEY_LAST_PLAYED)
    }

    pub fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let text = serde_json::to_string(value)?;
        self.store.set(key, &text)
    }

    // Malformed values read as default; the store is user-editable.
    fn json<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.raw(key) {
            Some(text) => serde_json::from_str(&text).unwrap_or_else(|err| {
                log::warn!("ignoring malformed '{key}': {err}");
                T::default()
            }),
            None => T::default(),
        }
    }

    fn flag(&self, key: &str, default: bool) -> bool {
        match self.raw(key).as_deref() {
            Some("enabled") | Some("true") => true,
            Some("disabled") | Some("false") => false,
            _ => default,
        }
    }

    fn set_flag(&self, key: &str, on: bool) -> Result<()> {
        self.store.set(key, if on { "enabled" } else { "disabled" })
    }
}
