use leptos::prelude::*;
use leptos_ui::clx;
use tw_merge::tw_merge;

clx! {Tooltip, div, "inline-flex relative whitespace-nowrap transition-all duration-300 ease-in-out group/tooltip"}

#[derive(Clone, Copy, Default, strum::Display, strum::AsRefStr)]
pub enum TooltipPosition {
    #[default]
    Top,
    Left,
    Right,
    Bottom,
}

#[component]
pub fn TooltipContent(
    #[prop(into, optional)] class: String,
    #[prop(default = TooltipPosition::default())] position: TooltipPosition,
    children: Children,
) -> impl IntoView {
    const SHARED_TRANSITION_CLASSES: &str = "absolute opacity-0 transition-all duration-300 ease-in-out pointer-events-none group-hover/tooltip:opacity-100 z-[1000]";

    let position_class = match position {
        TooltipPosition::Top => "left-1/2 -translate-x-1/2 bottom-full mb-1.5",
        TooltipPosition::Right => "top-1/2 -translate-y-1/2 left-full ml-1.5",
        TooltipPosition::Bottom => "left-1/2 -translate-x-1/2 top-full mt-1.5",
        TooltipPosition::Left => "top-1/2 -translate-y-1/2 right-full mr-1.5",
    };

    let tooltip_class = tw_merge!(
        SHARED_TRANSITION_CLASSES,
        "rounded py-1 px-2 text-xs whitespace-nowrap shadow-lg text-background bg-foreground/90",
        class,
        position_class,
    );

    view! {
        <div data-name="TooltipContent" data-position=position.as_ref().to_string() class=tooltip_class role="tooltip">
            {children()}
        </div>
    }
}

/// Hover hint with a text that may change (e.g. "Star" / "Unstar").
#[component]
pub fn Hint(
    #[prop(into)] text: Signal<String>,
    #[prop(default = TooltipPosition::default())] position: TooltipPosition,
    children: Children,
) -> impl IntoView {
    view! {
        <Tooltip>
            {children()}
            <TooltipContent position=position>{move || text.get()}</TooltipContent>
        </Tooltip>
    }
}
