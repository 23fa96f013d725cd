use crate::lookup::debounce::QueryDebouncer;
use crate::models::{SearchOption, Selection};

pub(crate) type Epoch = u64;

/// A search the host must run and later report back through
/// [`RemoteSearchController::resolve`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SearchRequest {
    pub epoch: Epoch,
    pub query: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct OpenState {
    pub query: String,
    pub options: Vec<SearchOption>,
    pub loading: bool,
    /// Keyboard-highlighted option.
    pub active: Option<usize>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) enum SearchPhase {
    #[default]
    Closed,
    Open(OpenState),
}

/// What the dropdown should show.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Listing<'a> {
    Closed,
    Loading,
    NotFound,
    Options(&'a [SearchOption]),
}

/// Dropdown state for one lookup control.
///
/// The selected value itself lives with the owning form; this only tracks
/// whether the dropdown is open, what it shows, and which search is current.
/// `epoch` increases with every issued search and is never reset, so a response
/// is applied only while it belongs to the newest request.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct RemoteSearchController {
    phase: SearchPhase,
    epoch: Epoch,
}

impl RemoteSearchController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        matches!(self.phase, SearchPhase::Open(_))
    }

    #[cfg(test)]
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn query(&self) -> &str {
        match &self.phase {
            SearchPhase::Open(s) => &s.query,
            SearchPhase::Closed => "",
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(&self.phase, SearchPhase::Open(s) if s.loading)
    }

    #[cfg(test)]
    pub fn options(&self) -> &[SearchOption] {
        match &self.phase {
            SearchPhase::Open(s) => &s.options,
            SearchPhase::Closed => &[],
        }
    }

    pub fn active(&self) -> Option<usize> {
        match &self.phase {
            SearchPhase::Open(s) => s.active,
            SearchPhase::Closed => None,
        }
    }

    pub fn listing(&self) -> Listing<'_> {
        match &self.phase {
            SearchPhase::Closed => Listing::Closed,
            SearchPhase::Open(s) if s.loading => Listing::Loading,
            SearchPhase::Open(s) if s.options.is_empty() => Listing::NotFound,
            SearchPhase::Open(s) => Listing::Options(&s.options),
        }
    }

    /// Opens with an empty query and asks for the default list.
    /// Returns `None` when already open.
    pub fn open(&mut self) -> Option<SearchRequest> {
        if self.is_open() {
            return None;
        }
        self.phase = SearchPhase::Open(OpenState::default());
        Some(self.issue(String::new()))
    }

    /// Like [`open`](Self::open), but an edit still waiting out the quiet
    /// period from an earlier session is dropped. Nothing is cancelled when
    /// already open.
    pub fn open_fresh(&mut self, pending: &mut QueryDebouncer) -> Option<SearchRequest> {
        if self.is_open() {
            return None;
        }
        pending.cancel();
        self.open()
    }

    /// Closes without selecting and drops any pending edit.
    pub fn close(&mut self, pending: &mut QueryDebouncer) -> bool {
        pending.cancel();
        self.dismiss()
    }

    /// The owning form replaced the value. Clearing a non-empty value while
    /// open closes the dropdown; returns whether it did.
    pub fn value_changed(
        &mut self,
        prev: &str,
        current: &str,
        pending: &mut QueryDebouncer,
    ) -> bool {
        if prev.is_empty() || !current.is_empty() || !self.is_open() {
            return false;
        }
        self.close(pending)
    }

    /// Mirrors the text box while open; closed controls ignore typing.
    pub fn set_query(&mut self, text: impl Into<String>) {
        if let SearchPhase::Open(s) = &mut self.phase {
            s.query = text.into();
        }
    }

    /// A debounced query arrived. Suppressed while closed.
    pub fn commit(&mut self, query: impl Into<String>) -> Option<SearchRequest> {
        if !self.is_open() {
            return None;
        }
        Some(self.issue(query.into()))
    }

    fn issue(&mut self, query: String) -> SearchRequest {
        self.epoch = self.epoch.wrapping_add(1);
        if let SearchPhase::Open(s) = &mut self.phase {
            s.loading = true;
        }
        log::debug!("lookup search issued (epoch {}): {:?}", self.epoch, query);
        SearchRequest {
            epoch: self.epoch,
            query,
        }
    }

    /// Applies a finished search if it is still the newest one.
    ///
    /// Failures become an empty list. Returns whether the result was applied.
    pub fn resolve<E: std::fmt::Display>(
        &mut self,
        epoch: Epoch,
        result: Result<Vec<SearchOption>, E>,
    ) -> bool {
        if epoch != self.epoch {
            log::debug!(
                "lookup search discarded: epoch {} superseded by {}",
                epoch,
                self.epoch
            );
            return false;
        }
        let SearchPhase::Open(s) = &mut self.phase else {
            return false;
        };

        s.options = match result {
            Ok(options) => options,
            Err(e) => {
                log::warn!("lookup search failed (epoch {epoch}): {e}");
                Vec::new()
            }
        };
        s.loading = false;
        s.active = None;
        true
    }

    /// Picks the option at `index` and closes.
    pub fn select(&mut self, index: usize) -> Option<Selection> {
        let SearchPhase::Open(s) = &mut self.phase else {
            return None;
        };
        if index >= s.options.len() {
            return None;
        }
        let option = s.options.swap_remove(index);
        self.phase = SearchPhase::Closed;
        Some(Selection::from_option(option))
    }

    pub fn select_active(&mut self) -> Option<Selection> {
        let index = self.active()?;
        self.select(index)
    }

    /// Moves the keyboard highlight by `delta`, clamped to the list.
    pub fn move_active(&mut self, delta: isize) {
        let SearchPhase::Open(s) = &mut self.phase else {
            return;
        };
        if s.options.is_empty() {
            s.active = None;
            return;
        }
        let last = s.options.len() - 1;
        let next = match s.active {
            None if delta >= 0 => 0,
            None => last,
            Some(i) => i.saturating_add_signed(delta).min(last),
        };
        s.active = Some(next);
    }

    /// Closes without selecting. Returns whether anything changed.
    pub fn dismiss(&mut self) -> bool {
        if !self.is_open() {
            return false;
        }
        self.phase = SearchPhase::Closed;
        true
    }

    /// The chip's clear action. `None` when there is nothing to clear.
    pub fn clear(&self, current_value: &str) -> Option<Selection> {
        if current_value.is_empty() {
            return None;
        }
        Some(Selection::default())
    }
}
