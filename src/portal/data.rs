// Settings page: data export / import / clear and the stats panel.
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Blob, BlobPropertyBag, Event, FileReader, HtmlAnchorElement, HtmlInputElement, MouseEvent, Url, window};

use super::settings;
use crate::stats::{StatsSummary, clear_all, export_filename, export_json, import_document};

pub const STATS_PANEL_ID: &str = "data-stats";

fn iso_now() -> String {
    js_sys::Date::new_0().to_iso_string().into()
}

fn reload_page() {
    if let Some(w) = window() {
        let _ = w.location().reload();
    }
}

/// Download everything as `portal-data-<day>.json`.
pub fn export_data() -> Result<(), JsValue> {
    let settings = settings().ok_or_else(|| JsValue::from_str("localStorage unavailable"))?;
    let date = iso_now();
    let json = export_json(&settings, &date)?;

    let parts = js_sys::Array::of1(&JsValue::from_str(&json));
    let opts = BlobPropertyBag::new();
    opts.set_type("application/json");
    let blob = Blob::new_with_str_sequence_and_options(&parts, &opts)?;
    let href = Url::create_object_url_with_blob(&blob)?;

    let doc = window().and_then(|w| w.document()).ok_or_else(|| JsValue::from_str("no document"))?;
    let body = doc.body().ok_or_else(|| JsValue::from_str("no body"))?;
    let a: HtmlAnchorElement = doc.create_element("a")?.dyn_into()?;
    a.set_href(&href);
    a.set_download(&export_filename(&date));
    body.append_child(&a)?;
    a.click();
    body.remove_child(&a)?;
    Url::revoke_object_url(&href)?;
    log::info!("data exported");
    Ok(())
}

/// Apply an exported JSON document, then reload so every widget re-reads it.
pub fn import_data(json: &str) -> Result<(), JsValue> {
    let settings = settings().ok_or_else(|| JsValue::from_str("localStorage unavailable"))?;
    import_document(json, &settings)?;
    reload_page();
    Ok(())
}

/// Two confirmations, then wipe the store.
pub fn clear_all_data() -> Result<(), JsValue> {
    let w = window().ok_or_else(|| JsValue::from_str("no window"))?;
    if !w.confirm_with_message("Clear ALL portal data? This cannot be undone.")? {
        return Ok(());
    }
    if !w.confirm_with_message("All saved data will be permanently deleted. Continue?")? {
        return Ok(());
    }
    let settings = settings().ok_or_else(|| JsValue::from_str("localStorage unavailable"))?;
    clear_all(&settings)?;
    reload_page();
    Ok(())
}

/// Refresh the `#data-stats` panel.
pub fn update_stats() -> Result<(), JsValue> {
    let doc = window().and_then(|w| w.document()).ok_or_else(|| JsValue::from_str("no document"))?;
    let Some(panel) = doc.get_element_by_id(STATS_PANEL_ID) else { return Ok(()) };
    let Some(settings) = settings() else {
        panel.set_text_content(Some("Error loading statistics"));
        return Ok(());
    };
    let summary = StatsSummary::from_settings(&settings);
    panel.set_inner_html("");
    let rows = [
        ("Favorite Games", summary.favorites.to_string()),
        ("Games Played", summary.games_played.to_string()),
        ("Total Play Time", summary.play_time_label()),
        ("Total Sessions", summary.sessions.to_string()),
    ];
    for (label, value) in rows {
        let stat = doc.create_element("div")?;
        stat.set_class_name("data-stat");
        let l = doc.create_element("div")?;
        l.set_class_name("data-stat-label");
        l.set_text_content(Some(label));
        let v = doc.create_element("div")?;
        v.set_class_name("data-stat-value");
        v.set_text_content(Some(&value));
        stat.append_child(&l)?;
        stat.append_child(&v)?;
        panel.append_child(&stat)?;
    }
    Ok(())
}

fn read_selected_file(input: &HtmlInputElement) -> Result<(), JsValue> {
    let Some(file) = input.files().and_then(|files| files.get(0)) else { return Ok(()) };
    let reader = FileReader::new()?;
    let on_load = {
        let reader = reader.clone();
        Closure::once_into_js(move |_evt: Event| {
            let text = reader.result().ok().and_then(|r| r.as_string()).unwrap_or_default();
            if let Err(err) = import_data(&text) {
                log::error!("import failed: {err:?}");
                if let Some(w) = window() {
                    let _ = w.alert_with_message("Error importing data. Please ensure the file is valid.");
                }
            }
        })
    };
    reader.set_onload(Some(on_load.unchecked_ref()));
    reader.read_as_text(&file)
}

fn on_click(id: &str, action: fn() -> Result<(), JsValue>) -> Result<(), JsValue> {
    let Some(doc) = window().and_then(|w| w.document()) else { return Ok(()) };
    if let Some(btn) = doc.get_element_by_id(id) {
        let cb = Closure::wrap(Box::new(move |_evt: MouseEvent| {
            if let Err(err) = action() {
                log::error!("{err:?}");
            }
        }) as Box<dyn FnMut(_)>);
        btn.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }
    Ok(())
}

/// Hook the export / import / clear buttons.
pub fn wire_data_buttons() -> Result<(), JsValue> {
    on_click("export-data-btn", export_data)?;
    on_click("clear-data-btn", clear_all_data)?;
    let Some(doc) = window().and_then(|w| w.document()) else { return Ok(()) };
    let (Some(btn), Some(file)) = (doc.get_element_by_id("import-data-btn"), doc.get_element_by_id("import-file")) else {
        return Ok(());
    };
    let file: HtmlInputElement = file.dyn_into()?;
    {
        let file = file.clone();
        let cb = Closure::wrap(Box::new(move |_evt: MouseEvent| file.click()) as Box<dyn FnMut(_)>);
        btn.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }
    let input = file.clone();
    let cb = Closure::wrap(Box::new(move |_evt: Event| {
        if let Err(err) = read_selected_file(&input) {
            log::error!("could not read import file: {err:?}");
        }
    }) as Box<dyn FnMut(_)>);
    file.add_event_listener_with_callback("change", cb.as_ref().unchecked_ref())?;
    cb.forget();
    Ok(())
}
