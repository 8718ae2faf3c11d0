mod app;
mod bridge;
mod components;
mod floating;
mod models;
mod pages;
mod state;
mod storage;
mod store;
mod toast;
mod util;

use crate::app::App;
use leptos::prelude::*;

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;


// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();
    mount_to_body(App);
}

#[cfg(test)]
mod tests {
    use crate::models::{FloatingNote, Note, NoteColor};

    #[test]
    fn test_note_contract_deserialize() {
        // Shape written by the desktop host.
        let json = r##"{
            "id": "1700000000000",
            "title": "Groceries",
            "content": "<p>milk</p>",
            "lastModified": 1700000000123,
            "isStarred": true,
            "color": "#f6ffed"
        }"##;
        let note: Note = serde_json::from_str(json).expect("note should parse");
        assert_eq!(note.id, "1700000000000");
        assert_eq!(note.last_modified, 1_700_000_000_123);
        assert!(note.is_starred);
        assert_eq!(note.color, NoteColor::Green);
    }

    #[test]
    fn test_note_contract_defaults_for_missing_fields() {
        let json = r#"{"id": "1", "title": "Bare", "lastModified": 5}"#;
        let note: Note = serde_json::from_str(json).expect("note should parse");
        assert_eq!(note.content, "");
        assert!(!note.is_starred);
        assert_eq!(note.color, NoteColor::White);
    }

    #[test]
    fn test_note_contract_accepts_iso_last_modified() {
        // Collections written before timestamps became epoch millis.
        let json = r##"[
            {"id": "1", "title": "Old", "content": "", "lastModified": "2024-05-01T10:00:00.000Z", "isStarred": false, "color": "#ffffff"},
            {"id": "2", "title": "New", "lastModified": 1714557600000}
        ]"##;
        let notes: Vec<Note> = serde_json::from_str(json).expect("mixed collection should parse");
        assert_eq!(notes[0].last_modified, 1_714_557_600_000);
        assert_eq!(notes[1].last_modified, 1_714_557_600_000);
    }

    #[test]
    fn test_note_contract_tolerates_unreadable_last_modified() {
        let json = r#"{"id": "1", "title": "t", "lastModified": "yesterday"}"#;
        let note: Note = serde_json::from_str(json).expect("note should still parse");
        assert_eq!(note.last_modified, 0);

        let json = r#"{"id": "1", "title": "t", "lastModified": 12.0}"#;
        let note: Note = serde_json::from_str(json).expect("fractional millis should parse");
        assert_eq!(note.last_modified, 12);
    }

    #[test]
    fn test_note_unknown_color_falls_back_to_white() {
        let json = r##"{"id": "1", "title": "t", "lastModified": 5, "color": "#123456"}"##;
        let note: Note = serde_json::from_str(json).expect("note should parse");
        assert_eq!(note.color, NoteColor::White);
    }

    #[test]
    fn test_note_serializes_camel_case_and_hex_color() {
        let note = Note {
            id: "2".to_string(),
            title: "t".to_string(),
            content: String::new(),
            last_modified: 9,
            is_starred: false,
            color: NoteColor::Red,
        };
        let v = serde_json::to_value(&note).expect("should serialize");
        assert_eq!(v["lastModified"], 9);
        assert_eq!(v["isStarred"], false);
        assert_eq!(v["color"], "#fff1f0");
        assert!(v.get("last_modified").is_none());
    }

    #[test]
    fn test_floating_note_contract_deserialize() {
        let json = r##"{
            "id": "sticky-1",
            "position": {"x": 10.5, "y": 20},
            "size": {"width": 240, "height": 180},
            "color": "#fff7e6"
        }"##;
        let n: FloatingNote = serde_json::from_str(json).expect("floating note should parse");
        assert_eq!(n.content, "");
        assert_eq!(n.position.x, 10.5);
        assert_eq!(n.size.height, 180.0);
        assert_eq!(n.color, NoteColor::Orange);
    }
}
