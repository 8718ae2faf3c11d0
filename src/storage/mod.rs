use crate::models::FloatingNote;
use serde::{Deserialize, Serialize};

pub(crate) const NOTES_KEY: &str = "sticky_notes_notes";
pub(crate) const BOARD_KEY: &str = "sticky_notes_board";

pub(crate) fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

pub(crate) fn load_json_from_storage<T: for<'de> Deserialize<'de>>(key: &str) -> Option<T> {
    let storage = local_storage()?;
    let json = storage.get_item(key).ok().flatten()?;
    serde_json::from_str(&json).ok()
}

/// Returns `false` when there is no storage, serialization failed or the write was
/// refused (quota, private mode).
pub(crate) fn save_json_to_storage<T: Serialize>(key: &str, value: &T) -> bool {
    let Ok(json) = serde_json::to_string(value) else {
        return false;
    };
    match local_storage() {
        Some(storage) => storage.set_item(key, &json).is_ok(),
        None => false,
    }
}

pub(crate) fn load_board() -> Vec<FloatingNote> {
    load_json_from_storage::<Vec<FloatingNote>>(BOARD_KEY).unwrap_or_default()
}

pub(crate) fn save_board(notes: &[FloatingNote]) {
    if !save_json_to_storage(BOARD_KEY, &notes) {
        leptos::logging::warn!("board: could not write {BOARD_KEY}");
    }
}
