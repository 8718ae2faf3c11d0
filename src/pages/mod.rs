use crate::components::rich_text::RichTextEditor;
use crate::components::sticky_note::StickyNote;
use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, Hint, Input, Popconfirm, Spinner, TooltipPosition,
};
use crate::floating::Board;
use crate::models::{FloatingNote, Note, NoteColor, Point, Size, ViewMode};
use crate::state::{AppContext, AppState};
use crate::storage::{load_board, save_board};
use crate::store::SelectionPhase;
use crate::util::{format_local_time, now_ms, preview};
use icons::{Pencil, Plus, Star, Trash2};
use leptos::ev;
use leptos::html;
use leptos::prelude::*;
use leptos_dom::helpers::window_event_listener;
use leptos_router::components::A;
use wasm_bindgen::JsCast;

const PREVIEW_CHARS: usize = 50;

/// Shared header links between the two pages.
#[component]
fn PageNav() -> impl IntoView {
    view! {
        <nav class="flex items-center gap-3 text-xs text-muted-foreground">
            <A href="/" attr:class="hover:text-foreground">"Notes"</A>
            <A href="/board" attr:class="hover:text-foreground">"Board"</A>
        </nav>
    }
}

#[component]
pub fn NotesPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let state = app_state.0;
    let search_ref = NodeRef::<html::Input>::new();

    // Keyboard shortcuts:
    // - Cmd/Ctrl+K: focus search
    // - Cmd/Ctrl+N: new note
    // - Esc: blur search, or close the open note
    let key_handle = window_event_listener(ev::keydown, move |ev: web_sys::KeyboardEvent| {
        let is_meta = ev.meta_key() || ev.ctrl_key();
        let key = ev.key().to_lowercase();

        // Avoid hijacking shortcuts while typing.
        let typing = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlElement>().ok())
            .map(|el| {
                let tag = el.tag_name().to_lowercase();
                tag == "input" || tag == "textarea" || el.is_content_editable()
            })
            .unwrap_or(false);

        if typing && key != "escape" && !(is_meta && key == "k") {
            return;
        }

        if is_meta && key == "k" {
            ev.prevent_default();
            if let Some(input) = search_ref.get() {
                let _ = input.focus();
                input.select();
            }
            return;
        }

        if is_meta && key == "n" {
            ev.prevent_default();
            state.create_note();
            return;
        }

        if key == "escape" {
            if typing {
                if let Some(input) = search_ref.get() {
                    let _ = input.blur();
                }
            } else {
                state.deselect_note();
            }
        }
    });
    on_cleanup(move || key_handle.remove());

    let is_mode = move |mode: ViewMode| move || (state.view_mode.get() == mode).to_string();

    view! {
        <div data-name="NotesPage" class="flex h-screen w-full overflow-hidden bg-background text-foreground">
            <aside class="flex w-72 shrink-0 flex-col border-r">
                <div class="flex items-center justify-between gap-2 px-3 pt-3">
                    <h1 class="text-sm font-semibold">
                        "Sticky Notes"
                        <span class="ml-1.5 text-xs font-normal text-muted-foreground">
                            {move || state.store.with(|s| s.len())}
                        </span>
                    </h1>
                    <PageNav />
                </div>

                <div class="flex flex-col gap-2 p-3">
                    <Input
                        bind_value=state.search_query
                        placeholder="Search notes"
                        aria_label="Search notes"
                        node_ref=search_ref
                    />
                    <div class="flex items-center gap-1">
                        <Button
                            variant=ButtonVariant::Ghost
                            size=ButtonSize::Sm
                            class="data-[active=true]:bg-accent"
                            attr:data-active=is_mode(ViewMode::All)
                            on:click=move |_| state.view_mode.set(ViewMode::All)
                        >
                            "All"
                        </Button>
                        <Button
                            variant=ButtonVariant::Ghost
                            size=ButtonSize::Sm
                            class="data-[active=true]:bg-accent"
                            attr:data-active=is_mode(ViewMode::Starred)
                            on:click=move |_| state.view_mode.set(ViewMode::Starred)
                        >
                            <Star />
                            "Starred"
                        </Button>
                        <div class="flex-1" />
                        <Button
                            size=ButtonSize::Sm
                            attr:title="New note (Ctrl+N)"
                            attr:disabled=move || state.loading.get()
                            on:click=move |_| state.create_note()
                        >
                            <Plus />
                            "New"
                        </Button>
                    </div>
                </div>

                <div class="min-h-0 flex-1 overflow-y-auto px-2 pb-3">
                    <Show when=move || state.loading.get()>
                        <div class="flex items-center gap-2 px-2 py-3 text-xs text-muted-foreground">
                            <Spinner />
                            "Loading notes..."
                        </div>
                    </Show>
                    <Show when=move || !state.loading.get() && state.visible_notes().is_empty()>
                        <div class="px-2 py-3 text-xs text-muted-foreground">
                            {move || {
                                if state.store.with(|s| s.is_empty()) {
                                    "No notes yet"
                                } else {
                                    "No matching notes"
                                }
                            }}
                        </div>
                    </Show>
                    <ul class="flex flex-col gap-1">
                        // Every edit bumps `last_modified`, so it doubles as a render key.
                        <For
                            each=move || state.visible_notes()
                            key=|n| (n.id.clone(), n.last_modified)
                            children=move |note: Note| view! { <NoteListItem note=note /> }
                        />
                    </ul>
                </div>
            </aside>

            <main class="flex min-w-0 flex-1 flex-col">
                <Show
                    when=move || state.store.with(|s| s.phase() != SelectionPhase::Empty)
                    fallback=|| {
                        view! {
                            <div class="flex flex-1 items-center justify-center text-sm text-muted-foreground">
                                "Select a note or create a new one"
                            </div>
                        }
                    }
                >
                    <NoteDetail />
                </Show>
            </main>
        </div>
    }
}

#[component]
fn NoteListItem(note: Note) -> impl IntoView {
    let state = expect_context::<AppContext>().0;

    let id = StoredValue::new(note.id.clone());
    let is_selected = move || state.store.with(|s| s.selected_id() == Some(id.get_value().as_str()));
    let starred = note.is_starred;
    let star_hint = if starred { "Unstar" } else { "Star" };
    let star_class = if starred {
        "size-4 fill-yellow-400 text-yellow-400"
    } else {
        "size-4 text-muted-foreground"
    };
    let snippet = preview(&note.content, PREVIEW_CHARS);
    let stamp = format_local_time(note.last_modified);

    view! {
        <li
            data-name="NoteListItem"
            class="group cursor-pointer rounded-md border border-transparent px-3 py-2 hover:border-border data-[selected=true]:border-ring"
            style=format!("background-color: {};", note.color.hex())
            data-selected=move || is_selected().to_string()
            on:click=move |_| state.select_note(&id.get_value())
        >
            <div class="flex items-start justify-between gap-2">
                <span class="truncate text-sm font-medium">{note.title.clone()}</span>
                <Hint text=star_hint.to_string() position=TooltipPosition::Left>
                    <button
                        type="button"
                        class="shrink-0"
                        aria-label=star_hint
                        on:click=move |ev: web_sys::MouseEvent| {
                            ev.stop_propagation();
                            state.toggle_star(&id.get_value());
                        }
                    >
                        <Star class=star_class.to_string() />
                    </button>
                </Hint>
            </div>
            <p class="mt-1 line-clamp-2 text-xs text-muted-foreground">{snippet}</p>
            <p class="mt-1 text-[11px] text-muted-foreground/80">{stamp}</p>
        </li>
    }
}

/// Title, body editor and footer of the selected note.
#[component]
fn NoteDetail() -> impl IntoView {
    let state = expect_context::<AppContext>().0;

    let selected_field = move |f: fn(&Note) -> String| {
        move || state.store.with(|s| s.selected().map(f).unwrap_or_default())
    };
    let title = selected_field(|n| n.title.clone());
    let background = selected_field(|n| format!("background-color: {};", n.color.hex()));
    let modified = selected_field(|n| format_local_time(n.last_modified));

    let doc_key = Signal::derive(move || state.store.with(|s| s.selected_id().map(str::to_string)));
    let body = Signal::derive(move || state.store.with(|s| s.edit_buffer().to_string()));

    view! {
        <div data-name="NoteDetail" class="flex min-h-0 flex-1 flex-col" style=background>
            <header class="flex items-center gap-2 border-b px-6 py-3">
                <Show
                    when=move || state.store.with(|s| s.is_editing_title())
                    fallback=move || {
                        view! {
                            <h2
                                class="min-w-0 flex-1 truncate text-lg font-semibold"
                                on:dblclick=move |_| state.begin_title_edit()
                            >
                                {title}
                            </h2>
                            <Button
                                variant=ButtonVariant::Ghost
                                size=ButtonSize::Icon
                                attr:aria-label="Rename"
                                on:click=move |_| state.begin_title_edit()
                            >
                                <Pencil />
                            </Button>
                        }
                    }
                >
                    <TitleEditor state=state />
                </Show>
                <Popconfirm
                    title="Delete this note?"
                    confirm_label="Delete"
                    on_confirm=move |_| {
                        let id = state.store.with_untracked(|s| s.selected_id().map(str::to_string));
                        if let Some(id) = id {
                            state.delete_note(&id);
                        }
                    }
                >
                    <Button variant=ButtonVariant::DangerGhost size=ButtonSize::Icon attr:aria-label="Delete">
                        <Trash2 />
                    </Button>
                </Popconfirm>
            </header>

            <RichTextEditor
                doc_key=doc_key
                content=body
                placeholder="Start writing..."
                on_input=move |markup: String| state.edit_selected_content(&markup)
            />

            <footer class="flex items-center justify-between gap-2 border-t px-6 py-2 text-xs text-muted-foreground">
                <span>"Last modified: " {modified}</span>
                <ColorSwatches state=state />
            </footer>
        </div>
    }
}

#[component]
fn TitleEditor(state: AppState) -> impl IntoView {
    let initial = state.store.with_untracked(|s| s.selected().map(|n| n.title.clone()).unwrap_or_default());
    let value = RwSignal::new(initial);

    view! {
        <Input
            class="h-8 flex-1 text-lg font-semibold"
            bind_value=value
            aria_label="Note title"
            autofocus=true
            on_change=move |title: String| state.rename_selected(&title)
            on_enter=move |_| state.end_title_edit()
            on_blur=move |_| state.end_title_edit()
        />
    }
}

#[component]
fn ColorSwatches(state: AppState) -> impl IntoView {
    let current = move || state.store.with(|s| s.selected().map(|n| n.color));

    view! {
        <div class="flex items-center gap-1.5" role="radiogroup" aria-label="Note color">
            {NoteColor::PALETTE
                .into_iter()
                .map(|color| {
                    view! {
                        <Button
                            variant=ButtonVariant::Outline
                            size=ButtonSize::Swatch
                            class="data-[active=true]:ring-2 data-[active=true]:ring-ring"
                            attr:style=format!("background-color: {};", color.hex())
                            attr:title=color.label()
                            attr:aria-label=color.label()
                            attr:data-active=move || (current() == Some(color)).to_string()
                            on:click=move |_| {
                                let id = state.store.with_untracked(|s| s.selected_id().map(str::to_string));
                                if let Some(id) = id {
                                    state.set_color(&id, color);
                                }
                            }
                        >
                            <span class="sr-only">{color.label()}</span>
                        </Button>
                    }
                })
                .collect_view()}
        </div>
    }
}

/// Free-floating stickies, persisted to local storage after each edit or finished drag.
#[component]
pub fn BoardPage() -> impl IntoView {
    let board: RwSignal<Board> = RwSignal::new(Board::new(load_board()));

    // Apply a change and write the board out if it asks for it.
    let change = move |f: &dyn Fn(&mut Board)| {
        let unsaved = board.try_update(|b| {
            f(b);
            b.take_unsaved()
        });
        if unsaved == Some(true) {
            board.with_untracked(|b| save_board(b.notes()));
        }
    };

    let on_add = move |_| change(&|b| {
        b.add(now_ms());
    });
    let on_delete = Callback::new(move |id: String| {
        change(&|b| {
            b.remove(&id);
        })
    });
    let on_update = Callback::new(move |(id, content): (String, String)| {
        change(&|b| {
            b.set_content(&id, content.clone());
        })
    });
    let on_position_change = Callback::new(move |(id, position): (String, Point)| {
        change(&|b| {
            b.move_to(&id, position);
        })
    });
    let on_drag_end = Callback::new(move |_: String| change(&|b| b.finish_move()));
    let on_size_change = Callback::new(move |(id, size): (String, Size)| {
        change(&|b| {
            b.set_size(&id, size);
        })
    });

    view! {
        <div data-name="BoardPage" class="relative h-screen w-full overflow-hidden bg-muted/40">
            <div class="absolute right-3 top-3 z-10 flex items-center gap-3">
                <PageNav />
                <Button size=ButtonSize::Sm on:click=on_add>
                    <Plus />
                    "Add sticky"
                </Button>
            </div>
            <For
                each=move || board.with(|b| b.notes().to_vec())
                key=|n| n.id.clone()
                children=move |n: FloatingNote| {
                    let id = n.id.clone();
                    let note = Signal::derive(move || {
                        board.with(|b| b.get(&id).cloned()).unwrap_or_else(|| n.clone())
                    });
                    view! {
                        <StickyNote
                            note=note
                            on_delete=on_delete
                            on_update=on_update
                            on_position_change=on_position_change
                            on_drag_end=on_drag_end
                            on_size_change=on_size_change
                        />
                    }
                }
            />
        </div>
    }
}
