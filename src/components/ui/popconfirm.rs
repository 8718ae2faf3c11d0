use crate::components::hooks::use_random::use_random_id_for;
use crate::components::ui::{Button, ButtonSize, ButtonVariant};
use leptos::prelude::*;

/// Two-step confirmation: clicking the trigger opens a small panel, and
/// `on_confirm` only runs from its Confirm button.
#[component]
pub fn Popconfirm(
    #[prop(into)] title: String,
    #[prop(into)] on_confirm: Callback<()>,
    #[prop(into, default = "Confirm".to_string())] confirm_label: String,
    #[prop(into, default = "Cancel".to_string())] cancel_label: String,
    children: Children,
) -> impl IntoView {
    let open = RwSignal::new(false);
    let title_id = use_random_id_for("popconfirm");
    let title = StoredValue::new(title);
    let confirm_label = StoredValue::new(confirm_label);
    let cancel_label = StoredValue::new(cancel_label);

    view! {
        <div data-name="Popconfirm" class="relative inline-flex">
            <span class="inline-flex" on:click=move |_| open.update(|o| *o = !*o)>
                {children()}
            </span>
            <Show when=move || open.get()>
                <div
                    data-name="PopconfirmPanel"
                    class="absolute right-0 top-full z-50 mt-1 w-52 rounded-md border bg-popover p-3 text-sm text-popover-foreground shadow-md"
                    role="alertdialog"
                    aria-labelledby=title_id.clone()
                    on:keydown=move |ev: web_sys::KeyboardEvent| {
                        if ev.key() == "Escape" {
                            open.set(false);
                        }
                    }
                >
                    <p id=title_id.clone() class="mb-3">{title.get_value()}</p>
                    <div class="flex justify-end gap-2">
                        <Button
                            variant=ButtonVariant::Outline
                            size=ButtonSize::Sm
                            on:click=move |_| open.set(false)
                        >
                            {cancel_label.get_value()}
                        </Button>
                        <Button
                            variant=ButtonVariant::Destructive
                            size=ButtonSize::Sm
                            on:click=move |_| {
                                open.set(false);
                                on_confirm.run(());
                            }
                        >
                            {confirm_label.get_value()}
                        </Button>
                    </div>
                </div>
            </Show>
        </div>
    }
}
