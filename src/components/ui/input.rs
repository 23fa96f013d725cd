use leptos::html;
use leptos::prelude::*;
use tw_merge::tw_merge;
use wasm_bindgen::JsCast;

/// Text input whose value is owned by the caller.
///
/// Edits are reported through `on_input` with the new text; the displayed text
/// always follows `value`.
#[component]
pub fn Input(
    // Styling
    #[prop(into, optional)] class: String,

    // Common HTML attributes
    #[prop(into, default = "text")] r#type: &'static str,
    #[prop(into, optional)] placeholder: String,
    #[prop(optional)] autocomplete: Option<&'static str>,

    #[prop(into)] value: Signal<String>,

    // Events
    #[prop(optional)] on_input: Option<Callback<String>>,
    #[prop(optional)] on_keydown: Option<Callback<web_sys::KeyboardEvent>>,
    #[prop(optional)] on_focus: Option<Callback<()>>,
    #[prop(optional)] on_click: Option<Callback<()>>,

    // Ref for direct DOM access
    #[prop(optional)] node_ref: NodeRef<html::Input>,
) -> impl IntoView {
    let merged_class = tw_merge!(
        "placeholder:text-muted-foreground selection:bg-primary selection:text-primary-foreground dark:bg-input/30 border-input flex h-9 w-full min-w-0 rounded-md border bg-transparent px-3 py-1 text-base shadow-xs transition-[color,box-shadow] outline-none disabled:pointer-events-none disabled:cursor-not-allowed disabled:opacity-50 md:text-sm",
        "focus-visible:border-ring focus-visible:ring-ring/50",
        "focus-visible:ring-2",
        class
    );

    let handle_input = move |ev: web_sys::Event| {
        let Some(on_input) = on_input else {
            return;
        };
        if let Some(target) = ev.target() {
            if let Some(input) = target.dyn_ref::<web_sys::HtmlInputElement>() {
                on_input.run(input.value());
            }
        }
    };

    let handle_keydown = move |ev: web_sys::KeyboardEvent| {
        if let Some(on_keydown) = on_keydown {
            on_keydown.run(ev);
        }
    };

    view! {
        <input
            data-name="Input"
            type=r#type
            class=merged_class
            placeholder=placeholder
            autocomplete=autocomplete
            prop:value=move || value.get()
            on:input=handle_input
            on:keydown=handle_keydown
            on:focus=move |_| {
                if let Some(on_focus) = on_focus {
                    on_focus.run(());
                }
            }
            on:click=move |_| {
                if let Some(on_click) = on_click {
                    on_click.run(());
                }
            }
            node_ref=node_ref
        />
    }
}
