use icons::ChevronDown;
use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_ui::clx;
use tw_merge::*;
use wasm_bindgen::JsCast;

use crate::components::ui::{Input, SpinnerCircle};
use crate::lookup::{
    highlight, use_outside_dismissal, view_mode, Listing, QueryDebouncer, RemoteSearchController,
    SearchRequest, ViewMode,
};
use crate::models::{SearchSource, Selection};
use crate::state::AppContext;

mod components {
    use super::*;
    clx! {LookupMessage, div, "px-3 py-2 text-sm italic text-muted-foreground"}
    clx! {LookupList, ul, "flex flex-col gap-0.5"}
}

#[allow(unused_imports)]
pub use components::*;

const CHIP_CLASS: &str = "flex h-9 w-full items-center gap-2 rounded-md border border-input bg-muted/40 px-3 text-sm cursor-pointer hover:bg-accent";
const OPTION_CLASS: &str = "flex w-full items-center gap-2 rounded-sm px-2 py-1.5 text-sm cursor-pointer hover:bg-accent hover:text-accent-foreground data-[active=true]:bg-accent";
const DROPDOWN_CLASS: &str = "absolute left-0 top-[calc(100%+4px)] z-50 w-full max-h-[300px] overflow-auto rounded-md border bg-card p-1 shadow-md";

/// Type-ahead picker for one record of a remote catalog (customers, items, accounts).
///
/// The control is fully controlled: `value` and `display_name` come from the
/// owning form, and each pick or clear is reported exactly once via `on_change`.
#[component]
pub(crate) fn RemoteSearch(
    source: SearchSource,
    #[prop(into)] value: Signal<String>,
    #[prop(into)] display_name: Signal<String>,
    #[prop(into)] on_change: Callback<Selection>,
    #[prop(optional, into)] placeholder: String,
    /// Overrides the configured quiet period.
    #[prop(optional)]
    debounce_ms: Option<u32>,
    #[prop(optional, into)] class: String,
) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let api_client = app_state.0.api_client;
    let quiet_ms = debounce_ms.unwrap_or(app_state.0.config.lookup_debounce_ms);

    let kind = source.kind.as_ref().to_string();
    let source = StoredValue::new(source);

    let controller = RwSignal::new(RemoteSearchController::new());
    let debouncer = StoredValue::new(QueryDebouncer::new(quiet_ms));
    let timer_id: StoredValue<Option<i32>> = StoredValue::new(None);

    let root_ref = NodeRef::<html::Div>::new();
    let input_ref = NodeRef::<html::Input>::new();

    let run_search = move |req: SearchRequest| {
        let api_client = api_client.get_untracked();
        let source = source.get_value();
        spawn_local(async move {
            let result = api_client.search(&source, &req.query).await;
            // The row may have been removed while the request was in flight.
            let _ = controller.try_update(|c| c.resolve(req.epoch, result));
        });
    };

    let clear_timer = move || {
        if let Some(tid) = timer_id.try_update_value(Option::take).flatten() {
            if let Some(win) = web_sys::window() {
                win.clear_timeout_with_handle(tid);
            }
        }
    };

    let cancel_pending = move || {
        clear_timer();
        let _ = debouncer.try_update_value(|d| d.cancel());
    };

    let open = move || {
        if controller.with_untracked(RemoteSearchController::is_open) {
            return;
        }
        clear_timer();
        let req = debouncer
            .try_update_value(|d| controller.try_update(|c| c.open_fresh(d)))
            .flatten()
            .flatten();
        if let Some(req) = req {
            run_search(req);
        }
    };

    let close = move || {
        if !controller
            .try_with_untracked(RemoteSearchController::is_open)
            .unwrap_or(false)
        {
            cancel_pending();
            return;
        }
        clear_timer();
        let _ = debouncer.try_update_value(|d| controller.try_update(|c| c.close(d)));
    };

    let pick = move |selection: Option<Selection>| {
        if let Some(selection) = selection {
            cancel_pending();
            on_change.run(selection);
        }
    };

    let select = move |index: usize| {
        pick(controller.try_update(|c| c.select(index)).flatten());
    };

    let on_input = move |text: String| {
        // Typing after Escape reopens the dropdown.
        open();
        controller.update(|c| c.set_query(text.clone()));

        let Some(ticket) = debouncer.try_update_value(|d| d.push(text)) else {
            return;
        };
        let Some(win) = web_sys::window() else {
            return;
        };
        if let Some(prev) = timer_id.try_update_value(Option::take).flatten() {
            win.clear_timeout_with_handle(prev);
        }

        let cb = wasm_bindgen::closure::Closure::once_into_js(move || {
            let _ = timer_id.try_update_value(|t| *t = None);
            let Some(query) = debouncer.try_update_value(|d| d.fire(ticket)).flatten() else {
                return;
            };
            if let Some(req) = controller.try_update(|c| c.commit(query)).flatten() {
                run_search(req);
            }
        });

        let tid = win
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                cb.as_ref().unchecked_ref(),
                i32::try_from(quiet_ms).unwrap_or(i32::MAX),
            )
            .ok();
        timer_id.set_value(tid);
    };

    let on_keydown = move |ev: web_sys::KeyboardEvent| match ev.key().as_str() {
        "ArrowDown" => {
            ev.prevent_default();
            controller.update(|c| c.move_active(1));
        }
        "ArrowUp" => {
            ev.prevent_default();
            controller.update(|c| c.move_active(-1));
        }
        "Enter" => {
            if controller.with_untracked(|c| c.active().is_some()) {
                ev.prevent_default();
                pick(controller.try_update(|c| c.select_active()).flatten());
            }
        }
        "Escape" => close(),
        _ => {}
    };

    let on_clear = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        let current = value.get_untracked();
        pick(controller.with_untracked(|c| c.clear(&current)));
    };

    let on_edit = move |_: web_sys::MouseEvent| {
        open();
        request_animation_frame(move || {
            if let Some(input) = input_ref.get_untracked() {
                let _ = input.focus();
            }
        });
    };

    use_outside_dismissal(
        vec![root_ref],
        move || {
            controller
                .try_with_untracked(RemoteSearchController::is_open)
                .unwrap_or(false)
        },
        close,
    );

    Effect::new(move |prev: Option<String>| {
        let current = value.get();
        let Some(prev) = prev else {
            return current;
        };
        if controller.with_untracked(RemoteSearchController::is_open) {
            let closed = debouncer
                .try_update_value(|d| {
                    controller.try_update(|c| c.value_changed(&prev, &current, d))
                })
                .flatten()
                .unwrap_or(false);
            if closed {
                clear_timer();
            }
        }
        current
    });

    on_cleanup(move || cancel_pending());

    let mode = Memo::new(move |_| {
        view_mode(
            &value.get(),
            &display_name.get(),
            controller.with(RemoteSearchController::is_open),
        )
    });

    let root_class = tw_merge!("relative w-full", class);

    view! {
        <div
            node_ref=root_ref
            data-name="RemoteSearch"
            data-lookup=kind
            data-loading=move || controller.with(RemoteSearchController::is_loading).to_string()
            class=root_class
        >
            {move || match mode.get() {
                ViewMode::Chip { label } => {
                    view! {
                        <div data-name="LookupChip" class=CHIP_CLASS on:click=on_edit>
                            <span class="flex-1 truncate">{label}</span>
                            <button
                                type="button"
                                aria-label="Clear"
                                class="text-muted-foreground hover:text-foreground"
                                on:click=on_clear
                            >
                                "×"
                            </button>
                        </div>
                    }
                        .into_any()
                }
                ViewMode::SearchBox => {
                    view! {
                        <div class="relative">
                            <Input
                                node_ref=input_ref
                                autocomplete="off"
                                class="pr-8"
                                placeholder=placeholder.clone()
                                value=Signal::derive(move || controller.with(|c| c.query().to_string()))
                                on_focus=Callback::new(move |_| open())
                                on_click=Callback::new(move |_| open())
                                on_input=Callback::new(on_input)
                                on_keydown=Callback::new(on_keydown)
                            />
                            <ChevronDown class="absolute right-2 top-2.5 size-4 text-muted-foreground pointer-events-none" />
                        </div>
                    }
                        .into_any()
                }
            }}

            <Show when=move || controller.with(RemoteSearchController::is_open)>
                <div data-name="LookupDropdown" class=DROPDOWN_CLASS>
                    {move || controller.with(|c| render_listing(c, select))}
                </div>
            </Show>
        </div>
    }
}

fn render_listing(
    c: &RemoteSearchController,
    select: impl Fn(usize) + Copy + Send + Sync + 'static,
) -> AnyView {
    match c.listing() {
        Listing::Closed => ().into_any(),
        Listing::Loading => view! {
            <div class="flex justify-center py-3">
                <SpinnerCircle class="text-muted-foreground" />
            </div>
        }
        .into_any(),
        Listing::NotFound => view! { <LookupMessage>"Not found"</LookupMessage> }.into_any(),
        Listing::Options(options) => {
            let query = c.query();
            let active = c.active();
            let items = options
                .iter()
                .enumerate()
                .map(|(i, option)| {
                    let segments = highlight(&option.label, query);
                    let code = (option.code != option.label).then(|| option.code.clone());
                    let is_active = (active == Some(i)).to_string();
                    view! {
                        <li
                            data-name="LookupOption"
                            data-active=is_active
                            class=OPTION_CLASS
                            on:click=move |_| select(i)
                        >
                            <span class="flex-1 truncate">
                                {segments
                                    .into_iter()
                                    .map(|s| {
                                        if s.matched {
                                            view! { <mark class="bg-transparent font-semibold text-foreground">{s.text}</mark> }
                                                .into_any()
                                        } else {
                                            view! { <span>{s.text}</span> }.into_any()
                                        }
                                    })
                                    .collect_view()}
                            </span>
                            {code.map(|code| view! { <span class="text-xs text-muted-foreground">{code}</span> })}
                        </li>
                    }
                })
                .collect_view();
            view! {
                <LookupList>{items}</LookupList>
            }
            .into_any()
        }
    }
}
