//! Remote type-ahead lookup: debounce, dropdown state, view mode and outside dismissal.
//!
//! Everything here except [`use_outside_dismissal`] is plain state with no DOM,
//! driven by `components::remote_search`.

pub(crate) mod controller;
pub(crate) mod debounce;
pub(crate) mod dismiss;
pub(crate) mod display;
pub(crate) mod highlight;

pub(crate) use controller::{Listing, RemoteSearchController, SearchRequest};
pub(crate) use debounce::QueryDebouncer;
pub(crate) use dismiss::use_outside_dismissal;
pub(crate) use display::{view_mode, ViewMode};
pub(crate) use highlight::highlight;
