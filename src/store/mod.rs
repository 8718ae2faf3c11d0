use crate::models::{Note, NoteColor, ViewMode};
use leptos::logging::warn;

pub(crate) const DEFAULT_TITLE_PREFIX: &str = "Note";

/// Where the detail pane currently is.
///
/// `Empty` ⇄ `Selected` ⇄ `EditingTitle`. Deleting the selected note (or deselecting)
/// always lands in `Empty`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SelectionPhase {
    Empty,
    Selected,
    EditingTitle,
}

/// The note collection plus the selection and edit buffer of the detail pane.
///
/// Plain data, no signals: `state::AppState` wraps it in an `RwSignal` and persists the
/// collection whenever `revision()` moves.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct NoteStore {
    notes: Vec<Note>,
    selected_id: Option<String>,
    editing_title: bool,
    edit_buffer: String,

    /// Bumped on every collection mutation; selection changes leave it alone.
    revision: u64,
}

/// New `last_modified` for an edit at `now`. Never goes backwards and never repeats,
/// even if the clock does.
pub(crate) fn touched(previous: i64, now: i64) -> i64 {
    now.max(previous.saturating_add(1))
}

/// "Note N" where N is one past the current count. Deliberately count-based: titles can
/// repeat after deletions.
pub(crate) fn default_title(count: usize) -> String {
    format!("{DEFAULT_TITLE_PREFIX} {}", count + 1)
}

fn matches_query(note: &Note, needle_lower: &str) -> bool {
    needle_lower.is_empty()
        || note.title.to_lowercase().contains(needle_lower)
        || note.content.to_lowercase().contains(needle_lower)
}

impl NoteStore {
    pub fn new(notes: Vec<Note>) -> Self {
        Self {
            notes,
            ..Default::default()
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    pub fn selected(&self) -> Option<&Note> {
        self.selected_id.as_deref().and_then(|id| self.get(id))
    }

    pub fn edit_buffer(&self) -> &str {
        &self.edit_buffer
    }

    pub fn is_editing_title(&self) -> bool {
        self.phase() == SelectionPhase::EditingTitle
    }

    pub fn phase(&self) -> SelectionPhase {
        match (&self.selected_id, self.editing_title) {
            (None, _) => SelectionPhase::Empty,
            (Some(_), false) => SelectionPhase::Selected,
            (Some(_), true) => SelectionPhase::EditingTitle,
        }
    }

    /// Swap in a freshly loaded collection. Not a user edit, so the revision stays put.
    pub fn replace_all(&mut self, notes: Vec<Note>) {
        self.notes = notes;
        let still_there = self
            .selected_id
            .as_deref()
            .is_some_and(|id| self.notes.iter().any(|n| n.id == id));
        if !still_there {
            self.clear_selection();
        }
    }

    fn next_id(&self, now: i64) -> String {
        let mut candidate = now;
        while self.notes.iter().any(|n| n.id == candidate.to_string()) {
            candidate += 1;
        }
        candidate.to_string()
    }

    fn clear_selection(&mut self) {
        self.selected_id = None;
        self.editing_title = false;
        self.edit_buffer.clear();
    }

    /// Append an empty note, select it and open its title for editing.
    pub fn create(&mut self, now: i64) -> String {
        let note = Note {
            id: self.next_id(now),
            title: default_title(self.notes.len()),
            content: String::new(),
            last_modified: now,
            is_starred: false,
            color: NoteColor::default(),
        };
        let id = note.id.clone();

        self.notes.push(note);
        self.revision += 1;

        self.selected_id = Some(id.clone());
        self.edit_buffer.clear();
        self.editing_title = true;
        id
    }

    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.notes.len();
        self.notes.retain(|n| n.id != id);
        if self.notes.len() == before {
            warn!("delete: no note with id {id}");
            return false;
        }
        self.revision += 1;

        if self.selected_id.as_deref() == Some(id) {
            self.clear_selection();
        }
        true
    }

    fn modify(&mut self, id: &str, now: i64, edit: impl FnOnce(&mut Note)) -> bool {
        let Some(slot) = self.notes.iter_mut().find(|n| n.id == id) else {
            warn!("edit ignored: no note with id {id}");
            return false;
        };

        let mut next = slot.clone();
        edit(&mut next);
        next.last_modified = touched(slot.last_modified, now);
        *slot = next;

        self.revision += 1;
        true
    }

    pub fn update_content(&mut self, id: &str, content: &str, now: i64) -> bool {
        let changed = self.modify(id, now, |n| n.content = content.to_string());
        if changed && self.selected_id.as_deref() == Some(id) {
            self.edit_buffer = content.to_string();
        }
        changed
    }

    pub fn update_title(&mut self, id: &str, title: &str, now: i64) -> bool {
        self.modify(id, now, |n| n.title = title.to_string())
    }

    pub fn toggle_star(&mut self, id: &str, now: i64) -> bool {
        self.modify(id, now, |n| n.is_starred = !n.is_starred)
    }

    pub fn update_color(&mut self, id: &str, color: NoteColor, now: i64) -> bool {
        self.modify(id, now, |n| n.color = color)
    }

    pub fn select(&mut self, id: &str) -> bool {
        let Some(content) = self.get(id).map(|n| n.content.clone()) else {
            return false;
        };
        self.selected_id = Some(id.to_string());
        self.edit_buffer = content;
        self.editing_title = false;
        true
    }

    pub fn deselect(&mut self) {
        self.clear_selection();
    }

    pub fn begin_title_edit(&mut self) -> bool {
        if self.selected_id.is_none() {
            return false;
        }
        self.editing_title = true;
        true
    }

    pub fn end_title_edit(&mut self) {
        self.editing_title = false;
    }

    /// Notes matching `query` (case-insensitive, title or content) and `mode`, in
    /// collection order.
    pub fn filtered_view(&self, query: &str, mode: ViewMode) -> Vec<Note> {
        let needle = query.to_lowercase();
        self.notes
            .iter()
            .filter(|n| mode.admits(n) && matches_query(n, &needle))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(id: &str, title: &str, content: &str, starred: bool) -> Note {
        Note {
            id: id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            last_modified: 1_000,
            is_starred: starred,
            color: NoteColor::White,
        }
    }

    fn sample() -> NoteStore {
        NoteStore::new(vec![
            note("1", "Groceries", "<p>Milk and eggs</p>", false),
            note("2", "Ideas", "<p>Rust <b>sticky</b> notes</p>", true),
            note("3", "Todo", "<p>call mom</p>", true),
            note("4", "Books", "<p>rust in action</p>", false),
        ])
    }

    fn ids(notes: &[Note]) -> Vec<&str> {
        notes.iter().map(|n| n.id.as_str()).collect()
    }

    fn is_subsequence(small: &[Note], big: &[Note]) -> bool {
        let mut it = big.iter();
        small.iter().all(|s| it.any(|b| b.id == s.id))
    }

    #[test]
    fn test_create_appends_selects_and_opens_title_edit() {
        let mut store = sample();
        let before = store.len();
        let id = store.create(5_000);

        assert_eq!(store.len(), before + 1);
        assert_eq!(store.selected_id(), Some(id.as_str()));
        assert!(store.is_editing_title());
        assert_eq!(store.phase(), SelectionPhase::EditingTitle);
        assert_eq!(store.edit_buffer(), "");

        let created = store.get(&id).expect("created note");
        assert_eq!(created.title, "Note 5");
        assert_eq!(created.content, "");
        assert_eq!(created.color, NoteColor::White);
        assert!(!created.is_starred);
        assert_eq!(store.notes().last().map(|n| n.id.as_str()), Some(id.as_str()));
    }

    #[test]
    fn test_create_ids_unique_within_same_millisecond() {
        let mut store = NoteStore::default();
        let a = store.create(42);
        let b = store.create(42);
        let c = store.create(42);
        assert_eq!(a, "42");
        assert_eq!(b, "43");
        assert_eq!(c, "44");
    }

    #[test]
    fn test_default_titles_collide_after_delete() {
        let mut store = NoteStore::default();
        let first = store.create(1);
        let _second = store.create(2);
        assert!(store.delete(&first));
        let third = store.create(3);

        let titles: Vec<&str> = store.notes().iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["Note 2", "Note 2"]);
        assert_eq!(store.get(&third).map(|n| n.title.as_str()), Some("Note 2"));
    }

    #[test]
    fn test_mutations_strictly_increase_last_modified() {
        let mut store = sample();
        // Frozen clock, earlier than the stored timestamp.
        let now = 10;

        let mut last = store.get("2").map(|n| n.last_modified).unwrap_or_default();
        let steps: [fn(&mut NoteStore, i64) -> bool; 4] = [
            |s, now| s.update_title("2", "Ideas v2", now),
            |s, now| s.update_content("2", "<p>new</p>", now),
            |s, now| s.toggle_star("2", now),
            |s, now| s.update_color("2", NoteColor::Orange, now),
        ];
        for step in steps {
            assert!(step(&mut store, now));
            let current = store.get("2").map(|n| n.last_modified).unwrap_or_default();
            assert!(current > last, "{current} should be > {last}");
            last = current;
        }

        let n = store.get("2").expect("note 2");
        assert_eq!(n.title, "Ideas v2");
        assert_eq!(n.content, "<p>new</p>");
        assert!(!n.is_starred);
        assert_eq!(n.color, NoteColor::Orange);
    }

    #[test]
    fn test_touched_uses_clock_when_ahead() {
        assert_eq!(touched(100, 5_000), 5_000);
        assert_eq!(touched(5_000, 5_000), 5_001);
        assert_eq!(touched(i64::MAX, 0), i64::MAX);
    }

    #[test]
    fn test_edits_on_missing_id_are_noops() {
        let mut store = sample();
        let snapshot = store.clone();

        assert!(!store.update_title("nope", "x", 9_999));
        assert!(!store.update_content("nope", "x", 9_999));
        assert!(!store.toggle_star("nope", 9_999));
        assert!(!store.update_color("nope", NoteColor::Red, 9_999));
        assert!(!store.delete("nope"));

        assert_eq!(store, snapshot);
    }

    #[test]
    fn test_revision_moves_only_on_collection_changes() {
        let mut store = sample();
        let r0 = store.revision();

        store.select("1");
        store.begin_title_edit();
        store.end_title_edit();
        store.deselect();
        assert_eq!(store.revision(), r0);

        store.toggle_star("1", 2_000);
        assert_eq!(store.revision(), r0 + 1);

        store.replace_all(vec![note("9", "Loaded", "", false)]);
        assert_eq!(store.revision(), r0 + 1);
    }

    #[test]
    fn test_delete_selected_clears_selection_and_buffer() {
        let mut store = sample();
        assert!(store.select("3"));
        assert_eq!(store.edit_buffer(), "<p>call mom</p>");

        assert!(store.delete("3"));
        assert_eq!(store.selected_id(), None);
        assert_eq!(store.edit_buffer(), "");
        assert_eq!(store.phase(), SelectionPhase::Empty);
    }

    #[test]
    fn test_delete_other_keeps_selection() {
        let mut store = sample();
        store.select("1");
        assert!(store.delete("2"));
        assert_eq!(store.selected_id(), Some("1"));
        assert_eq!(store.edit_buffer(), "<p>Milk and eggs</p>");
    }

    #[test]
    fn test_deleted_note_never_in_any_view() {
        let mut store = sample();
        store.delete("2");
        for query in ["", "rust", "IDEAS", "sticky", "zzz"] {
            for mode in [ViewMode::All, ViewMode::Starred] {
                let view = store.filtered_view(query, mode);
                assert!(view.iter().all(|n| n.id != "2"), "{query:?} {mode}");
            }
        }
    }

    #[test]
    fn test_filter_matches_title_or_content_case_insensitive() {
        let store = sample();
        assert_eq!(ids(&store.filtered_view("RUST", ViewMode::All)), vec!["2", "4"]);
        assert_eq!(ids(&store.filtered_view("groc", ViewMode::All)), vec!["1"]);
        assert_eq!(ids(&store.filtered_view("", ViewMode::All)), vec!["1", "2", "3", "4"]);
        assert!(store.filtered_view("missing", ViewMode::All).is_empty());
    }

    #[test]
    fn test_filter_combines_query_and_mode() {
        let store = sample();
        assert_eq!(ids(&store.filtered_view("", ViewMode::Starred)), vec!["2", "3"]);
        assert_eq!(ids(&store.filtered_view("rust", ViewMode::Starred)), vec!["2"]);
    }

    #[test]
    fn test_filter_is_idempotent_and_ordered() {
        let store = sample();
        let a = store.filtered_view("o", ViewMode::All);
        let b = store.filtered_view("o", ViewMode::All);
        assert_eq!(a, b);
        assert!(is_subsequence(&a, store.notes()));
    }

    #[test]
    fn test_starred_view_is_subsequence_of_all_view() {
        let mut store = sample();
        store.toggle_star("4", 2_000);
        for query in ["", "rust", "o", "p>"] {
            let all = store.filtered_view(query, ViewMode::All);
            let starred = store.filtered_view(query, ViewMode::Starred);
            assert!(is_subsequence(&starred, &all), "query {query:?}");
        }
    }

    #[test]
    fn test_select_loads_buffer_and_leaves_title_edit() {
        let mut store = sample();
        store.create(9_000);
        assert!(store.is_editing_title());

        assert!(store.select("2"));
        assert_eq!(store.phase(), SelectionPhase::Selected);
        assert_eq!(store.edit_buffer(), "<p>Rust <b>sticky</b> notes</p>");

        assert!(!store.select("missing"));
        assert_eq!(store.selected_id(), Some("2"));
    }

    #[test]
    fn test_title_edit_requires_selection() {
        let mut store = sample();
        assert!(!store.begin_title_edit());
        assert_eq!(store.phase(), SelectionPhase::Empty);

        store.select("1");
        assert!(store.begin_title_edit());
        assert_eq!(store.phase(), SelectionPhase::EditingTitle);
        store.end_title_edit();
        assert_eq!(store.phase(), SelectionPhase::Selected);
    }

    #[test]
    fn test_update_content_refreshes_buffer_of_selected_only() {
        let mut store = sample();
        store.select("1");
        store.update_content("1", "<p>oat milk</p>", 2_000);
        assert_eq!(store.edit_buffer(), "<p>oat milk</p>");

        store.update_content("4", "<p>other</p>", 2_000);
        assert_eq!(store.edit_buffer(), "<p>oat milk</p>");
    }

    #[test]
    fn test_replace_all_drops_vanished_selection() {
        let mut store = sample();
        store.select("1");
        store.replace_all(vec![note("1", "Groceries", "", false)]);
        assert_eq!(store.selected_id(), Some("1"));

        store.replace_all(vec![note("7", "Other", "", false)]);
        assert_eq!(store.selected_id(), None);
        assert_eq!(store.edit_buffer(), "");
    }

    #[test]
    fn test_selected_resolves_to_the_stored_note() {
        let mut store = sample();
        assert!(store.selected().is_none());
        assert!(store.select("3"));
        assert_eq!(store.selected().map(|n| n.title.as_str()), Some("Todo"));
        assert!(!store.select("missing"));
        assert_eq!(store.selected_id(), Some("3"));
    }

    #[test]
    fn test_empty_store_reports_empty() {
        let mut store = NoteStore::default();
        assert!(store.is_empty());
        store.create(1);
        assert!(!store.is_empty());
        assert_eq!(store.len(), 1);
    }
}
