//! Play statistics and local data export / import.

use serde::{Deserialize, Serialize};

use crate::error::{PortalError, Result};
use crate::settings::{
    KEY_AUTO_SCROLL, KEY_AUTO_SEASONAL, KEY_FAVORITES, KEY_LAST_PLAYED, KEY_PLAY_COUNT, KEY_PLAY_TIME, KEY_SNOW,
    KEY_THEME, LastPlayed, PlayCount, PlayTime, PortalSettings, SettingsStore,
};

pub const EXPORT_VERSION: &str = "1.2.4";

// --- Session tracking -----------------------------------------------------------

/// Tracks the game currently shown in the frame.
#[derive(Debug, Default)]
pub struct PlayTracker {
    current: Option<(String, f64)>,
}

impl PlayTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_ref().map(|(url, _)| url.as_str())
    }

    /// Begin a session; an unfinished one is dropped unrecorded.
    pub fn start(&mut self, url: &str, now_ms: f64) {
        self.current = Some((url.to_string(), now_ms));
    }

    /// Close the session and fold it into the stored stats.
    /// Returns the whole seconds recorded.
    pub fn stop<S: SettingsStore>(&mut self, now_ms: f64, settings: &PortalSettings<S>) -> Result<Option<u64>> {
        let Some((url, started)) = self.current.take() else {
            return Ok(None);
        };
        let secs = ((now_ms - started) / 1000.0).max(0.0).floor() as u64;

        let mut time = settings.play_time();
        *time.entry(url.clone()).or_insert(0) += secs;
        settings.set_json(KEY_PLAY_TIME, &time)?;

        let mut count = settings.play_count();
        *count.entry(url.clone()).or_insert(0) += 1;
        settings.set_json(KEY_PLAY_COUNT, &count)?;

        let mut last = settings.last_played();
        last.insert(url, serde_json::Value::from(now_ms));
        settings.set_json(KEY_LAST_PLAYED, &last)?;
        Ok(Some(secs))
    }
}

// --- Summary --------------------------------------------------------------------

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatsSummary {
    pub favorites: usize,
    pub games_played: usize,
    pub total_play_secs: u64,
    pub sessions: u64,
}

impl StatsSummary {
    pub fn from_settings<S: SettingsStore>(settings: &PortalSettings<S>) -> Self {
        let count = settings.play_count();
        Self {
            favorites: settings.favorites().len(),
            games_played: count.len(),
            total_play_secs: settings.play_time().values().sum(),
            sessions: count.values().map(|&c| u64::from(c)).sum(),
        }
    }

    /// "{h}h {m}m"
    pub fn play_time_label(&self) -> String {
        let hours = self.total_play_secs / 3600;
        let minutes = (self.total_play_secs % 3600) / 60;
        format!("{hours}h {minutes}m")
    }
}

// --- Export / import --------------------------------------------------------------

/// Stored settings are strings; imported files may carry bare scalars
/// (`"snowEffect": true`), which are kept in their JSON text form.
fn scalar_string<'de, D>(de: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(de)? {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedSettings {
    #[serde(default, deserialize_with = "scalar_string", skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(default, deserialize_with = "scalar_string", skip_serializing_if = "Option::is_none")]
    pub snow_effect: Option<String>,
    #[serde(default, deserialize_with = "scalar_string", skip_serializing_if = "Option::is_none")]
    pub auto_seasonal_themes: Option<String>,
    #[serde(default, deserialize_with = "scalar_string", skip_serializing_if = "Option::is_none")]
    pub carousel_auto_scroll: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStats {
    #[serde(default)]
    pub favorites: Option<Vec<String>>,
    #[serde(default)]
    pub play_time: Option<PlayTime>,
    #[serde(default)]
    pub play_count: Option<PlayCount>,
    #[serde(default)]
    pub last_played: Option<LastPlayed>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub version: String,
    #[serde(default)]
    pub export_date: String,
    pub settings: ExportedSettings,
    #[serde(default)]
    pub game_stats: Option<GameStats>,
}

/// Snapshot of everything the portal stores. `date` is an ISO-8601 timestamp.
pub fn export_document<S: SettingsStore>(settings: &PortalSettings<S>, date: &str) -> ExportDocument {
    ExportDocument {
        version: EXPORT_VERSION.to_string(),
        export_date: date.to_string(),
        settings: ExportedSettings {
            theme: settings.raw(KEY_THEME),
            snow_effect: settings.raw(KEY_SNOW),
            auto_seasonal_themes: settings.raw(KEY_AUTO_SEASONAL),
            carousel_auto_scroll: settings.raw(KEY_AUTO_SCROLL),
        },
        game_stats: Some(GameStats {
            favorites: Some(settings.favorites()),
            play_time: Some(settings.play_time()),
            play_count: Some(settings.play_count()),
            last_played: Some(settings.last_played()),
        }),
    }
}

pub fn export_json<S: SettingsStore>(settings: &PortalSettings<S>, date: &str) -> Result<String> {
    Ok(serde_json::to_string_pretty(&export_document(settings, date))?)
}

/// `portal-data-YYYY-MM-DD.json` from an ISO timestamp.
pub fn export_filename(iso_date: &str) -> String {
    let day = iso_date.split('T').next().unwrap_or(iso_date);
    format!("portal-data-{day}.json")
}

/// Validate and write an exported document back. Only present keys are written.
pub fn import_document<S: SettingsStore>(json: &str, settings: &PortalSettings<S>) -> Result<ExportDocument> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let has_version = value.get("version").and_then(|v| v.as_str()).is_some_and(|v| !v.is_empty());
    if !has_version {
        return Err(PortalError::InvalidExport("missing version"));
    }
    if !value.get("settings").is_some_and(|s| s.is_object()) {
        return Err(PortalError::InvalidExport("missing settings"));
    }
    let doc: ExportDocument = serde_json::from_value(value)?;

    let store = settings.store();
    let pairs = [
        (KEY_THEME, &doc.settings.theme),
        (KEY_SNOW, &doc.settings.snow_effect),
        (KEY_AUTO_SEASONAL, &doc.settings.auto_seasonal_themes),
        (KEY_AUTO_SCROLL, &doc.settings.carousel_auto_scroll),
    ];
    for (key, value) in pairs {
        if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
            store.set(key, v)?;
        }
    }
    if let Some(stats) = &doc.game_stats {
        if let Some(f) = &stats.favorites {
            settings.set_json(KEY_FAVORITES, f)?;
        }
        if let Some(t) = &stats.play_time {
            settings.set_json(KEY_PLAY_TIME, t)?;
        }
        if let Some(c) = &stats.play_count {
            settings.set_json(KEY_PLAY_COUNT, c)?;
        }
        if let Some(l) = &stats.last_played {
            settings.set_json(KEY_LAST_PLAYED, l)?;
        }
    }
    log::info!("imported data file v{}", doc.version);
    Ok(doc)
}

pub fn clear_all<S: SettingsStore>(settings: &PortalSettings<S>) -> Result<()> {
    settings.store().clear()?;
    log::info!("all portal data cleared");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MemoryStore;

    #[test]
    fn test_tracker_records_session() {
        let s = PortalSettings::new(MemoryStore::new());
        let mut t = PlayTracker::new();
        t.start("/g/a", 1_000.0);
        assert_eq!(t.stop(62_500.0, &s).unwrap(), Some(61));
        t.start("/g/a", 0.0);
        t.stop(4_000.0, &s).unwrap();
        assert_eq!(s.play_time().get("/g/a"), Some(&65));
        assert_eq!(s.play_count().get("/g/a"), Some(&2));
        assert!(s.last_played().contains_key("/g/a"));
        assert_eq!(t.stop(10_000.0, &s).unwrap(), None);
    }

    #[test]
    fn test_summary_label() {
        let s = PortalSettings::new(MemoryStore::new());
        s.set_json(KEY_PLAY_TIME, &PlayTime::from([("/a".into(), 3_700), ("/b".into(), 200)])).unwrap();
        s.set_json(KEY_PLAY_COUNT, &PlayCount::from([("/a".into(), 3), ("/b".into(), 1)])).unwrap();
        s.toggle_favorite("/a").unwrap();
        let sum = StatsSummary::from_settings(&s);
        assert_eq!(sum, StatsSummary { favorites: 1, games_played: 2, total_play_secs: 3_900, sessions: 4 });
        assert_eq!(sum.play_time_label(), "1h 5m");
    }

    #[test]
    fn test_export_then_import_into_fresh_store() {
        let src = PortalSettings::new(MemoryStore::new());
        src.set_theme("midnight").unwrap();
        src.toggle_favorite("/g/a").unwrap();
        let json = export_json(&src, "2026-10-18T09:30:00.000Z").unwrap();
        assert!(json.contains("\"exportDate\""));

        let dst = PortalSettings::new(MemoryStore::new());
        import_document(&json, &dst).unwrap();
        assert_eq!(dst.theme().as_deref(), Some("midnight"));
        assert_eq!(dst.favorites(), vec!["/g/a".to_string()]);
        assert!(dst.store().get(KEY_SNOW).is_none());
    }

    #[test]
    fn test_import_rejects_missing_fields() {
        let s = PortalSettings::new(MemoryStore::new());
        let err = import_document(r#"{"settings":{}}"#, &s).unwrap_err();
        assert!(matches!(err, PortalError::InvalidExport("missing version")));
        let err = import_document(r#"{"version":"1"}"#, &s).unwrap_err();
        assert!(matches!(err, PortalError::InvalidExport("missing settings")));
        assert!(matches!(import_document("nope", &s), Err(PortalError::Json(_))));
        assert!(s.store().is_empty());
    }

    #[test]
    fn test_import_minimal_document() {
        let s = PortalSettings::new(MemoryStore::new());
        let doc = import_document(r#"{"version":"1.2.4","settings":{"theme":"ocean"}}"#, &s).unwrap();
        assert_eq!(doc.export_date, "");
        assert_eq!(s.theme().as_deref(), Some("ocean"));
        assert_eq!(s.store().len(), 1);
    }

    #[test]
    fn test_import_stringifies_scalar_settings() {
        let s = PortalSettings::new(MemoryStore::new());
        import_document(r#"{"version":"1","settings":{"snowEffect":true,"theme":null,"carouselAutoScroll":"disabled"}}"#, &s)
            .unwrap();
        assert_eq!(s.store().get(KEY_SNOW).as_deref(), Some("true"));
        assert!(s.store().get(KEY_THEME).is_none());
        assert!(!s.carousel_auto_scroll());
    }

    #[test]
    fn test_filename_uses_day() {
        assert_eq!(export_filename("2026-10-18T09:30:00.000Z"), "portal-data-2026-10-18.json");
    }

    #[test]
    fn test_clear_all() {
        let s = PortalSettings::new(MemoryStore::new());
        s.set_theme("x").unwrap();
        clear_all(&s).unwrap();
        assert!(s.store().is_empty());
    }
}
