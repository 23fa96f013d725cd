use leptos::ev;
use leptos::html;
use leptos::prelude::*;
use leptos_dom::helpers::window_event_listener;
use wasm_bindgen::JsCast;

/// Something occupying screen space that a pointer target can fall inside.
pub(crate) trait Boundary<T: ?Sized> {
    fn contains(&self, target: &T) -> bool;
}

impl Boundary<web_sys::Node> for web_sys::HtmlDivElement {
    fn contains(&self, target: &web_sys::Node) -> bool {
        let node: &web_sys::Node = self.as_ref();
        node.contains(Some(target))
    }
}

/// A control's boundary may be split, e.g. a dropdown rendered outside the
/// normal layout flow. Inside any part counts as inside.
pub(crate) fn is_inside<B, T>(parts: &[B], target: &T) -> bool
where
    B: Boundary<T>,
    T: ?Sized,
{
    parts.iter().any(|part| part.contains(target))
}

pub(crate) fn should_dismiss(is_open: bool, inside: bool) -> bool {
    is_open && !inside
}

/// Closes one control on pointer-downs outside its boundary.
///
/// Registers a single window `pointerdown` listener for the calling component
/// and removes it when the component's owner is cleaned up. Each control calls
/// this with its own refs, so several mounted controls dismiss independently.
pub(crate) fn use_outside_dismissal(
    boundary: Vec<NodeRef<html::Div>>,
    is_open: impl Fn() -> bool + 'static,
    on_dismiss: impl Fn() + 'static,
) {
    let handle = window_event_listener(ev::pointerdown, move |ev: web_sys::PointerEvent| {
        if !is_open() {
            return;
        }
        let Some(target) = ev.target().and_then(|t| t.dyn_into::<web_sys::Node>().ok()) else {
            return;
        };

        let parts: Vec<web_sys::HtmlDivElement> =
            boundary.iter().filter_map(|r| r.get_untracked()).collect();
        if should_dismiss(true, is_inside(&parts, &target)) {
            on_dismiss();
        }
    });

    on_cleanup(move || handle.remove());
}
