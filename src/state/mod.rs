use crate::bridge::{EnvConfig, NotesBridge};
use crate::models::{Note, NoteColor, ViewMode};
use crate::store::NoteStore;
use crate::toast::Toaster;
use crate::util::now_ms;
use leptos::logging::{error, log, warn};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[derive(Clone, Copy)]
pub(crate) struct AppState {
    /// Collection + selection. The autosave Effect watches its revision.
    pub store: RwSignal<NoteStore>,

    /// Sidebar filter.
    pub search_query: RwSignal<String>,
    pub view_mode: RwSignal<ViewMode>,

    /// True until the startup load settles.
    pub loading: RwSignal<bool>,

    pub bridge: StoredValue<NotesBridge>,
    pub toaster: Toaster,
}

impl AppState {
    pub fn new() -> Self {
        let cfg = EnvConfig::new();
        let bridge = NotesBridge::from_config(&cfg);
        log!("notes bridge: {}", bridge.label());
        Self::with_bridge(bridge, Toaster::new(cfg.toast_ms))
    }

    pub fn with_bridge(bridge: NotesBridge, toaster: Toaster) -> Self {
        Self {
            store: RwSignal::new(NoteStore::default()),
            search_query: RwSignal::new(String::new()),
            view_mode: RwSignal::new(ViewMode::All),
            loading: RwSignal::new(false),
            bridge: StoredValue::new(bridge),
            toaster,
        }
    }

    /// Filtered sidebar list. Tracks the store, the query and the mode.
    pub fn visible_notes(&self) -> Vec<Note> {
        let query = self.search_query.get();
        let mode = self.view_mode.get();
        self.store.with(|s| s.filtered_view(&query, mode))
    }

    pub fn load_notes(&self) {
        let state = *self;
        let bridge = self.bridge.get_value();
        state.loading.set(true);

        spawn_local(async move {
            match bridge.load_all().await {
                Ok(Some(notes)) => {
                    log!("loaded {} notes from {}", notes.len(), bridge.label());
                    state.store.update(|s| s.replace_all(notes));
                }
                Ok(None) => log!("no saved notes in {}", bridge.label()),
                Err(e) => {
                    error!("{e}");
                    state.toaster.error("Failed to load notes");
                }
            }
            state.loading.set(false);
        });
    }

    /// Push the whole collection to the bridge whenever it changes.
    ///
    /// Skips the first run so the empty startup collection never overwrites saved data.
    /// Saves are not ordered against each other; the last one to finish wins.
    pub fn start_autosave(&self) {
        let state = *self;
        Effect::new(move |prev: Option<u64>| {
            let revision = state.store.with(|s| s.revision());
            if prev.is_some_and(|p| p != revision) {
                let snapshot = state.store.with_untracked(|s| s.notes().to_vec());
                state.persist(snapshot);
            }
            revision
        });
    }

    fn persist(&self, notes: Vec<Note>) {
        let bridge = self.bridge.get_value();
        let toaster = self.toaster;
        spawn_local(async move {
            if let Err(e) = bridge.save_all(&notes).await {
                error!("{e}");
                toaster.error("Failed to save notes");
            }
        });
    }

    /// Apply a store mutation. No-op while the startup load is in flight.
    fn edit<R>(&self, f: impl FnOnce(&mut NoteStore) -> R) -> Option<R> {
        if self.loading.get_untracked() {
            warn!("notes are still loading; edit ignored");
            return None;
        }
        self.store.try_update(f)
    }

    pub fn create_note(&self) {
        let now = now_ms();
        if self.edit(|s| s.create(now)).is_some() {
            self.toaster.success("Note created");
        }
    }

    pub fn delete_note(&self, id: &str) {
        if self.edit(|s| s.delete(id)) == Some(true) {
            self.toaster.success("Note deleted");
        }
    }

    pub fn select_note(&self, id: &str) {
        self.edit(|s| s.select(id));
    }

    pub fn deselect_note(&self) {
        self.edit(|s| s.deselect());
    }

    pub fn begin_title_edit(&self) {
        self.edit(|s| s.begin_title_edit());
    }

    pub fn end_title_edit(&self) {
        self.edit(|s| s.end_title_edit());
    }

    pub fn rename_selected(&self, title: &str) {
        let now = now_ms();
        self.edit(|s| match s.selected_id().map(str::to_string) {
            Some(id) => s.update_title(&id, title, now),
            None => false,
        });
    }

    pub fn edit_selected_content(&self, content: &str) {
        let now = now_ms();
        self.edit(|s| match s.selected_id().map(str::to_string) {
            Some(id) => s.update_content(&id, content, now),
            None => false,
        });
    }

    pub fn toggle_star(&self, id: &str) {
        let now = now_ms();
        self.edit(|s| s.toggle_star(id, now));
    }

    pub fn set_color(&self, id: &str, color: NoteColor) {
        let now = now_ms();
        self.edit(|s| s.update_color(id, color, now));
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub(crate) struct AppContext(pub AppState);

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use crate::toast::{Toast, ToastKind};
    use leptos::reactive::owner::Owner;
    use leptos::task::Executor;
    use wasm_bindgen_futures::JsFuture;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    /// Give spawned bridge calls and pending effects a few macrotask turns.
    async fn settle() {
        for _ in 0..4 {
            let promise = js_sys::Promise::new(&mut |resolve, _| {
                let _ = window().set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, 0);
            });
            let _ = JsFuture::from(promise).await;
        }
    }

    fn harness(bridge: NotesBridge) -> (Owner, AppState) {
        let _ = Executor::init_wasm_bindgen();
        let owner = Owner::new();
        owner.set();
        let state = AppState::with_bridge(bridge, Toaster::new(60_000));
        (owner, state)
    }

    fn note(id: &str, title: &str) -> Note {
        Note {
            id: id.to_string(),
            title: title.to_string(),
            content: String::new(),
            last_modified: 1,
            is_starred: false,
            color: NoteColor::White,
        }
    }

    fn messages(toasts: &[Toast], kind: ToastKind) -> Vec<String> {
        toasts
            .iter()
            .filter(|t| t.kind == kind)
            .map(|t| t.message.clone())
            .collect()
    }

    #[wasm_bindgen_test]
    async fn test_autosave_skips_first_run_then_saves_each_mutation() {
        let bridge = NotesBridge::memory();
        let (_owner, state) = harness(bridge.clone());
        state.start_autosave();
        settle().await;
        assert_eq!(bridge.load_all().await.expect("load"), None);

        state.create_note();
        settle().await;
        let saved = bridge.load_all().await.expect("load").expect("saved after create");
        assert_eq!(saved.len(), 1);
        let id = saved[0].id.clone();

        state.toggle_star(&id);
        settle().await;
        let saved = bridge.load_all().await.expect("load").expect("saved after star");
        assert!(saved[0].is_starred);

        state.delete_note(&id);
        settle().await;
        assert_eq!(bridge.load_all().await.expect("load"), Some(vec![]));
    }

    #[wasm_bindgen_test]
    async fn test_load_replaces_collection_without_saving() {
        let bridge = NotesBridge::memory();
        let stored = vec![note("1", "Groceries"), note("2", "Ideas")];
        bridge.save_all(&stored).await.expect("seed");

        let (_owner, state) = harness(bridge.clone());
        state.start_autosave();
        state.load_notes();
        settle().await;

        assert!(!state.loading.get_untracked());
        assert_eq!(state.store.with_untracked(|s| s.notes().to_vec()), stored);
        assert_eq!(state.store.with_untracked(|s| s.revision()), 0);
        assert!(state.toaster.visible().is_empty());
    }

    #[wasm_bindgen_test]
    async fn test_edits_during_startup_load_are_ignored() {
        let bridge = NotesBridge::memory();
        let stored = vec![note("1", "Groceries")];
        bridge.save_all(&stored).await.expect("seed");

        let (_owner, state) = harness(bridge.clone());
        state.start_autosave();
        state.load_notes();
        // The load task has not run yet.
        state.create_note();
        settle().await;

        assert_eq!(state.store.with_untracked(|s| s.notes().to_vec()), stored);
        assert_eq!(bridge.load_all().await.expect("load"), Some(stored.clone()));
        assert!(messages(&state.toaster.visible(), ToastKind::Success).is_empty());

        state.create_note();
        settle().await;
        let saved = bridge.load_all().await.expect("load").expect("saved");
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0], stored[0]);
    }

    #[wasm_bindgen_test]
    async fn test_load_failure_toasts_and_keeps_collection() {
        let bridge = NotesBridge::Host {
            load_channel: "load-notes".to_string(),
            save_channel: "save-notes".to_string(),
        };
        let (_owner, state) = harness(bridge);
        state.store.update(|s| s.replace_all(vec![note("1", "Kept")]));

        state.load_notes();
        settle().await;

        assert!(!state.loading.get_untracked());
        assert_eq!(state.store.with_untracked(|s| s.len()), 1);
        assert_eq!(
            messages(&state.toaster.visible(), ToastKind::Error),
            vec!["Failed to load notes".to_string()]
        );
    }

    #[wasm_bindgen_test]
    async fn test_save_failure_toasts_and_keeps_edit() {
        let bridge = NotesBridge::Host {
            load_channel: "load-notes".to_string(),
            save_channel: "save-notes".to_string(),
        };
        let (_owner, state) = harness(bridge);
        state.start_autosave();
        settle().await;

        state.create_note();
        settle().await;

        assert_eq!(state.store.with_untracked(|s| s.len()), 1);
        let toasts = state.toaster.visible();
        assert_eq!(messages(&toasts, ToastKind::Success), vec!["Note created".to_string()]);
        assert_eq!(
            messages(&toasts, ToastKind::Error),
            vec!["Failed to save notes".to_string()]
        );
    }
}
