use crate::pages::{BoardPage, NotesPage};
use crate::state::{AppContext, AppState};
use crate::toast::ToastViewport;
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

#[component]
pub fn App() -> impl IntoView {
    let state = AppState::new();
    provide_context(AppContext(state));
    provide_context(state.toaster);

    // Load once at startup; the autosave Effect ignores its own first run, so the
    // empty collection it sees here is never written back.
    state.load_notes();
    state.start_autosave();

    // IMPORTANT:
    // - Leptos CSR requires the `csr` feature on `leptos`.
    // - router hooks require a <Router> context.
    view! {
        <Router>
            <Routes fallback=|| view! { <div class="px-4 py-8 text-xs text-muted-foreground">"Not found"</div> }>
                <Route path=path!("board") view=BoardPage />
                <Route path=path!("") view=NotesPage />
            </Routes>
        </Router>
        <ToastViewport />
    }
}
