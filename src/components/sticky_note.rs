use crate::components::ui::{Button, ButtonSize, ButtonVariant};
use crate::floating::{DragTracker, FloatingEditor, PointerCapture};
use crate::models::{FloatingNote, Point, Size};
use icons::{Pencil, Trash2};
use leptos::ev;
use leptos::prelude::*;
use leptos_dom::helpers::{window_event_listener, WindowListenerHandle};
use wasm_bindgen::JsCast;

/// Window-level mousemove/mouseup listeners, registered only while a drag is active.
pub(crate) struct WindowCapture {
    on_move: Callback<Point>,
    on_release: Callback<()>,
    handles: Option<(WindowListenerHandle, WindowListenerHandle)>,
}

impl WindowCapture {
    pub fn new(on_move: Callback<Point>, on_release: Callback<()>) -> Self {
        Self {
            on_move,
            on_release,
            handles: None,
        }
    }
}

impl PointerCapture for WindowCapture {
    fn acquire(&mut self) {
        if self.handles.is_some() {
            return;
        }
        let on_move = self.on_move;
        let on_release = self.on_release;
        let move_handle = window_event_listener(ev::mousemove, move |e: web_sys::MouseEvent| {
            on_move.run(pointer_of(&e));
        });
        let up_handle = window_event_listener(ev::mouseup, move |_| on_release.run(()));
        self.handles = Some((move_handle, up_handle));
    }

    fn release(&mut self) {
        if let Some((move_handle, up_handle)) = self.handles.take() {
            move_handle.remove();
            up_handle.remove();
        }
    }
}

fn pointer_of(e: &web_sys::MouseEvent) -> Point {
    Point::new(f64::from(e.client_x()), f64::from(e.client_y()))
}

/// Blank or unparsable input counts as missing and falls back to the default edge.
fn parse_edge(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}

/// A draggable, resizable note positioned absolutely on the board.
#[component]
pub fn StickyNote(
    #[prop(into)] note: Signal<FloatingNote>,
    #[prop(into)] on_delete: Callback<String>,
    #[prop(into)] on_update: Callback<(String, String)>,
    #[prop(into)] on_position_change: Callback<(String, Point)>,
    #[prop(into)] on_drag_end: Callback<String>,
    #[prop(into)] on_size_change: Callback<(String, Size)>,
) -> impl IntoView {
    let id = StoredValue::new(note.with_untracked(|n| n.id.clone()));
    let dragging = RwSignal::new(false);
    let editor = RwSignal::new(FloatingEditor::default());

    let tracker = StoredValue::new(None::<DragTracker<WindowCapture>>);

    let on_move = Callback::new(move |pointer: Point| {
        let mut next = None;
        tracker.update_value(|t| next = t.as_mut().and_then(|t| t.pointer_move(pointer)));
        if let Some(position) = next {
            on_position_change.run((id.get_value(), position));
        }
    });
    let on_release = Callback::new(move |_: ()| {
        tracker.update_value(|t| {
            if let Some(t) = t.as_mut() {
                t.end();
            }
        });
        dragging.set(false);
        on_drag_end.run(id.get_value());
    });
    tracker.set_value(Some(DragTracker::new(WindowCapture::new(on_move, on_release))));

    // Unmounting mid-drag must not leave window listeners behind.
    on_cleanup(move || {
        tracker.try_update_value(|t| {
            if let Some(t) = t.as_mut() {
                t.end();
            }
        });
    });

    let on_mousedown = move |e: web_sys::MouseEvent| {
        if e.button() != 0 {
            return;
        }
        let position = note.with_untracked(|n| n.position);
        tracker.update_value(|t| {
            if let Some(t) = t.as_mut() {
                t.start(pointer_of(&e), position);
            }
        });
        dragging.set(true);
    };

    // Controls inside the note must not start a drag.
    let stop = |e: web_sys::MouseEvent| e.stop_propagation();

    let style = move || {
        note.with(|n| {
            format!(
                "background-color: {}; width: {}px; height: {}px; transform: translate({}px, {}px); cursor: {};",
                n.color.hex(),
                n.size.width,
                n.size.height,
                n.position.x,
                n.position.y,
                if dragging.get() { "grabbing" } else { "grab" },
            )
        })
    };

    let on_size_input = move |e: web_sys::Event, axis: Axis| {
        let Some(input) = e
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        else {
            return;
        };
        let value = parse_edge(&input.value());
        let size = note.with_untracked(|n| n.size);
        let size = match axis {
            Axis::Width => size.with_width(value),
            Axis::Height => size.with_height(value),
        };
        on_size_change.run((id.get_value(), size));
    };

    view! {
        <div
            data-name="StickyNote"
            class="absolute left-0 top-0 flex select-none flex-col overflow-hidden rounded-md border shadow-md"
            style=style
            on:mousedown=on_mousedown
        >
            <div class="flex items-center justify-end gap-1 px-1 pt-1">
                <Button
                    variant=ButtonVariant::Ghost
                    size=ButtonSize::IconSm
                    attr:aria-label="Edit"
                    on:mousedown=stop
                    on:click=move |_| editor.update(|ed| ed.begin(&note.get_untracked().content))
                >
                    <Pencil />
                </Button>
                <Button
                    variant=ButtonVariant::DangerGhost
                    size=ButtonSize::IconSm
                    attr:aria-label="Delete"
                    on:mousedown=stop
                    on:click=move |_| on_delete.run(id.get_value())
                >
                    <Trash2 />
                </Button>
            </div>

            <Show
                when=move || editor.with(|ed| ed.is_editing())
                fallback=move || {
                    view! {
                        <div class="flex-1 overflow-auto whitespace-pre-wrap px-3 py-1 text-sm">
                            {move || note.with(|n| n.content.clone())}
                        </div>
                    }
                }
            >
                <div class="flex flex-1 flex-col gap-1 px-2 py-1" on:mousedown=stop>
                    <textarea
                        class="min-h-[4.5rem] w-full flex-1 resize-none rounded border bg-background/70 p-1 text-sm outline-none"
                        prop:value=move || editor.with(|ed| ed.buffer().to_string())
                        on:input=move |e: web_sys::Event| {
                            if let Some(ta) = e
                                .target()
                                .and_then(|t| t.dyn_into::<web_sys::HtmlTextAreaElement>().ok())
                            {
                                editor.update(|ed| ed.input(&ta.value()));
                            }
                        }
                    />
                    <div class="flex justify-end gap-1">
                        <Button
                            variant=ButtonVariant::Ghost
                            size=ButtonSize::Sm
                            on:click=move |_| editor.update(|ed| ed.cancel())
                        >
                            "Cancel"
                        </Button>
                        <Button
                            size=ButtonSize::Sm
                            on:click=move |_| {
                                let mut saved = None;
                                editor.update(|ed| saved = ed.save());
                                if let Some(content) = saved {
                                    on_update.run((id.get_value(), content));
                                }
                            }
                        >
                            "Save"
                        </Button>
                    </div>
                </div>
            </Show>

            <div class="flex items-center gap-1 px-2 pb-2 text-xs text-muted-foreground" on:mousedown=stop>
                <input
                    type="number"
                    min="100"
                    aria-label="Width"
                    class="h-6 w-16 rounded border bg-background/70 px-1"
                    prop:value=move || note.with(|n| n.size.width.to_string())
                    on:change=move |e| on_size_input(e, Axis::Width)
                />
                <span>"×"</span>
                <input
                    type="number"
                    min="100"
                    aria-label="Height"
                    class="h-6 w-16 rounded border bg-background/70 px-1"
                    prop:value=move || note.with(|n| n.size.height.to_string())
                    on:change=move |e| on_size_input(e, Axis::Height)
                />
            </div>
        </div>
    }
}

#[derive(Clone, Copy)]
enum Axis {
    Width,
    Height,
}
