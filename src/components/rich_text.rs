use crate::components::ui::{Button, ButtonSize, ButtonVariant};
use leptos::html;
use leptos::logging::warn;
use leptos::prelude::*;
use wasm_bindgen::JsCast;

/// Toolbar actions, each mapped onto a `document.execCommand` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::EnumIter, strum::AsRefStr)]
pub(crate) enum FormatCommand {
    Heading1,
    Heading2,
    Heading3,
    Paragraph,
    Bold,
    Italic,
    Underline,
    Strike,
    BulletList,
    NumberedList,
    Clear,
}

impl FormatCommand {
    /// `(command, value)` for `execCommand`.
    pub fn exec_args(self) -> (&'static str, Option<&'static str>) {
        match self {
            Self::Heading1 => ("formatBlock", Some("<h1>")),
            Self::Heading2 => ("formatBlock", Some("<h2>")),
            Self::Heading3 => ("formatBlock", Some("<h3>")),
            Self::Paragraph => ("formatBlock", Some("<p>")),
            Self::Bold => ("bold", None),
            Self::Italic => ("italic", None),
            Self::Underline => ("underline", None),
            Self::Strike => ("strikeThrough", None),
            Self::BulletList => ("insertUnorderedList", None),
            Self::NumberedList => ("insertOrderedList", None),
            Self::Clear => ("removeFormat", None),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Heading1 => "H1",
            Self::Heading2 => "H2",
            Self::Heading3 => "H3",
            Self::Paragraph => "P",
            Self::Bold => "B",
            Self::Italic => "I",
            Self::Underline => "U",
            Self::Strike => "S",
            Self::BulletList => "• List",
            Self::NumberedList => "1. List",
            Self::Clear => "Clear",
        }
    }

    fn label_class(self) -> &'static str {
        match self {
            Self::Bold => "font-bold",
            Self::Italic => "italic",
            Self::Underline => "underline",
            Self::Strike => "line-through",
            _ => "",
        }
    }

    /// Toolbar groups are separated after these.
    fn ends_group(self) -> bool {
        matches!(self, Self::Paragraph | Self::Strike | Self::NumberedList)
    }

    fn run(self) {
        let Some(doc) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.dyn_into::<web_sys::HtmlDocument>().ok())
        else {
            return;
        };
        let (command, value) = self.exec_args();
        let result = match value {
            Some(v) => doc.exec_command_with_show_ui_and_value(command, false, v),
            None => doc.exec_command(command),
        };
        if !matches!(result, Ok(true)) {
            warn!("editor: {command} was not applied");
        }
    }
}

/// Contenteditable body editor.
///
/// The DOM owns the markup while the user types; it is only rewritten from
/// `content` when `doc_key` changes, so the caret is never reset mid-edit.
#[component]
pub fn RichTextEditor(
    #[prop(into)] doc_key: Signal<Option<String>>,
    #[prop(into)] content: Signal<String>,
    #[prop(into)] on_input: Callback<String>,
    #[prop(into, optional)] placeholder: String,
) -> impl IntoView {
    use strum::IntoEnumIterator;

    let body_ref = NodeRef::<html::Div>::new();

    Effect::new(move |prev: Option<Option<String>>| {
        let key = doc_key.get();
        if let Some(el) = body_ref.get() {
            if prev.as_ref() != Some(&key) || el.inner_html().is_empty() {
                el.set_inner_html(&content.get_untracked());
            }
        }
        key
    });

    let on_body_input = move |_| {
        if let Some(el) = body_ref.get_untracked() {
            on_input.run(el.inner_html());
        }
    };

    view! {
        <div data-name="RichTextEditor" class="flex min-h-0 flex-1 flex-col">
            <div class="flex flex-wrap items-center gap-0.5 border-b px-2 py-1" role="toolbar">
                {FormatCommand::iter()
                    .map(|cmd| {
                        view! {
                            <Button
                                variant=ButtonVariant::Ghost
                                size=ButtonSize::Sm
                                class="h-7 px-2"
                                attr:title=cmd.as_ref().to_string()
                                // Keep the caret inside the editor.
                                on:mousedown=move |ev: web_sys::MouseEvent| {
                                    ev.prevent_default();
                                    cmd.run();
                                }
                            >
                                <span class=cmd.label_class()>{cmd.label()}</span>
                            </Button>
                            {cmd.ends_group().then(|| view! { <span class="mx-1 h-4 w-px bg-border" /> })}
                        }
                    })
                    .collect_view()}
            </div>
            <div
                node_ref=body_ref
                class="prose prose-sm min-h-0 max-w-none flex-1 overflow-auto px-6 py-4 outline-none empty:before:text-muted-foreground empty:before:content-[attr(data-placeholder)]"
                contenteditable="true"
                data-placeholder=placeholder
                on:input=on_body_input
            />
        </div>
    }
}
