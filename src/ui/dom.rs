//! DOM writer for `RankingView`
//!
//! Element ids are fixed by `index.html`.

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlButtonElement, HtmlInputElement, HtmlSelectElement};

use super::view::{ItemView, RankingView};
use crate::settings::Settings;

pub const TITLE_ID: &str = "title";
pub const COUNTER_ID: &str = "counter";
pub const FILE_INPUT_ID: &str = "file-input";
pub const EXPORT_BTN_ID: &str = "export-btn";
pub const QUERY_ID: &str = "query-title";
pub const LIST_ID: &str = "droppable-area";
pub const SUBMIT_BTN_ID: &str = "submit-btn";
pub const PROGRESS_ID: &str = "progress";
pub const STATUS_ID: &str = "status";
pub const NOTE_ID: &str = "reverted-note";

// Preferences form
pub const PREFS_ID: &str = "prefs";
pub const SHUFFLE_ID: &str = "pref-shuffle";
pub const SEED_ID: &str = "pref-seed";
pub const RANK_LABELS_ID: &str = "pref-rank-labels";
pub const LOG_LEVEL_ID: &str = "pref-log-level";

/// Class on the list while it differs from its loaded order
pub const CHANGED_CLASS: &str = "changed";
/// Class marking a draggable candidate row
pub const ITEM_CLASS: &str = "draggable-item";
/// Attribute holding a row's list position
pub const INDEX_ATTR: &str = "data-index";
/// Attribute on the list holding its drop-target id
pub const TARGET_ATTR: &str = "data-drop-target";

fn set_text(document: &Document, id: &str, text: Option<&str>) {
    if let Some(el) = document.get_element_by_id(id) {
        el.set_text_content(text);
    }
}

fn set_hidden(el: &Element, hidden: bool) {
    let _ = el.class_list().toggle_with_force("hidden", hidden);
}

/// Copy the view into the page
pub fn render(document: &Document, view: &RankingView) -> Result<(), JsValue> {
    set_text(document, TITLE_ID, Some(view.title));

    if let Some(el) = document.get_element_by_id(COUNTER_ID) {
        el.set_text_content(view.counter.as_deref());
        set_hidden(&el, view.counter.is_none());
    }

    if let Some(btn) = document.get_element_by_id(EXPORT_BTN_ID) {
        btn.dyn_into::<HtmlButtonElement>()?
            .set_disabled(!view.export_enabled);
    }

    set_text(document, QUERY_ID, view.query.as_deref());
    set_text(document, PROGRESS_ID, view.progress.as_deref());

    if let Some(el) = document.get_element_by_id(STATUS_ID) {
        el.set_text_content(view.error.as_deref());
        set_hidden(&el, view.error.is_none());
    }

    if let Some(el) = document.get_element_by_id(NOTE_ID) {
        el.set_text_content(view.reverted_note);
        set_hidden(&el, view.reverted_note.is_none());
    }

    if let Some(list) = document.get_element_by_id(LIST_ID) {
        list.set_inner_html("");
        let _ = list
            .class_list()
            .toggle_with_force(CHANGED_CLASS, view.current_changed);
        match &view.drop_target {
            Some(target) => list.set_attribute(TARGET_ATTR, target)?,
            None => list.remove_attribute(TARGET_ATTR)?,
        }
        for item in &view.items {
            list.append_child(&item_element(document, item)?)?;
        }
    }

    if let Some(btn) = document.get_element_by_id(SUBMIT_BTN_ID) {
        set_hidden(&btn, !view.submit_visible);
    }

    Ok(())
}

fn item_element(document: &Document, item: &ItemView) -> Result<Element, JsValue> {
    let row = document.create_element("div")?;
    row.set_id(&item.id);
    row.set_class_name(ITEM_CLASS);
    row.set_attribute("draggable", "true")?;
    row.set_attribute(INDEX_ATTR, &item.index.to_string())?;

    let pre = document.create_element("pre")?;
    if let Some(label) = &item.rank_label {
        let strong = document.create_element("strong")?;
        strong.set_text_content(Some(label));
        pre.append_child(&strong)?;
        pre.append_child(&document.create_text_node(" "))?;
    }
    pre.append_child(&document.create_text_node(&item.text))?;
    row.append_child(&pre)?;

    Ok(row)
}

fn input(document: &Document, id: &str) -> Option<HtmlInputElement> {
    document.get_element_by_id(id)?.dyn_into().ok()
}

fn select(document: &Document, id: &str) -> Option<HtmlSelectElement> {
    document.get_element_by_id(id)?.dyn_into().ok()
}

/// Fill the preferences form from `settings`
pub fn render_settings(document: &Document, settings: &Settings) {
    if let Some(el) = input(document, SHUFFLE_ID) {
        el.set_checked(settings.shuffle_on_load);
    }
    if let Some(el) = input(document, SEED_ID) {
        el.set_value(&settings.seed_text());
    }
    if let Some(el) = input(document, RANK_LABELS_ID) {
        el.set_checked(settings.show_rank_labels);
    }
    if let Some(el) = select(document, LOG_LEVEL_ID) {
        el.set_value(settings.log_level.as_str());
    }
}

/// Read the preferences form over a copy of `current`
pub fn read_settings(document: &Document, current: &Settings) -> Settings {
    let mut settings = current.clone();
    let shuffle = input(document, SHUFFLE_ID).map_or(current.shuffle_on_load, |el| el.checked());
    let seed = input(document, SEED_ID).map_or_else(|| current.seed_text(), |el| el.value());
    let rank_labels =
        input(document, RANK_LABELS_ID).map_or(current.show_rank_labels, |el| el.checked());
    let log_level = select(document, LOG_LEVEL_ID)
        .map_or_else(|| current.log_level.as_str().to_string(), |el| el.value());
    settings.apply_form(shuffle, &seed, rank_labels, &log_level);
    settings
}
