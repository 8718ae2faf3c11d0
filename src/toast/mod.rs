use icons::X;
use leptos::prelude::*;
use tw_merge::tw_merge;
use wasm_bindgen::JsCast;

pub(crate) const MAX_TOASTS: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum ToastKind {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

/// Visible toasts, oldest first. Holds at most `MAX_TOASTS`.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct ToastQueue {
    items: Vec<Toast>,
    next_id: u64,
}

impl ToastQueue {
    pub fn items(&self) -> &[Toast] {
        &self.items
    }

    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.items.push(Toast {
            id,
            kind,
            message: message.into(),
        });
        if self.items.len() > MAX_TOASTS {
            let overflow = self.items.len() - MAX_TOASTS;
            self.items.drain(..overflow);
        }
        id
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|t| t.id != id);
        self.items.len() != before
    }
}

/// Transient notifications, shared through context.
#[derive(Clone, Copy)]
pub(crate) struct Toaster {
    queue: RwSignal<ToastQueue>,
    duration_ms: i32,
}

impl Toaster {
    pub fn new(duration_ms: u32) -> Self {
        Self {
            queue: RwSignal::new(ToastQueue::default()),
            duration_ms: i32::try_from(duration_ms).unwrap_or(i32::MAX),
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(ToastKind::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(ToastKind::Error, message.into());
    }

    /// Visible toasts, oldest first. Tracks the queue.
    pub fn visible(&self) -> Vec<Toast> {
        self.queue.with(|q| q.items().to_vec())
    }

    pub fn dismiss(&self, id: u64) {
        self.queue.update(|q| {
            q.dismiss(id);
        });
    }

    fn show(&self, kind: ToastKind, message: String) {
        let mut id = 0;
        self.queue.update(|q| id = q.push(kind, message));

        let queue = self.queue;
        let _ = window().set_timeout_with_callback_and_timeout_and_arguments_0(
            wasm_bindgen::closure::Closure::once_into_js(move || {
                // The owner may be gone by the time the timer fires.
                let _ = queue.try_update(|q| q.dismiss(id));
            })
            .as_ref()
            .unchecked_ref(),
            self.duration_ms,
        );
    }
}

#[component]
pub fn ToastViewport() -> impl IntoView {
    let toaster = expect_context::<Toaster>();

    view! {
        <div
            data-name="ToastViewport"
            class="pointer-events-none fixed top-4 left-1/2 z-[1000] flex -translate-x-1/2 flex-col items-center gap-2"
        >
            <For
                each=move || toaster.visible()
                key=|t| t.id
                children=move |t: Toast| {
                    let id = t.id;
                    let class = tw_merge!(
                        "pointer-events-auto flex items-center gap-2 rounded-md border px-3 py-2 text-sm shadow-md bg-background",
                        match t.kind {
                            ToastKind::Success => "border-success/40 text-foreground",
                            ToastKind::Error => "border-destructive/40 text-destructive",
                        }
                    );
                    view! {
                        <div data-name="Toast" data-kind=t.kind.as_ref().to_string() class=class role="status">
                            <span>{t.message}</span>
                            <button
                                type="button"
                                class="text-muted-foreground hover:text-foreground [&_svg]:size-3.5"
                                aria-label="Dismiss"
                                on:click=move |_| toaster.dismiss(id)
                            >
                                <X />
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
