/// Coalesces a burst of query edits into a single committed query.
///
/// The debouncer does not own a clock. Every edit returns a [`DebounceTicket`]
/// that the host hands to a timer scheduled `quiet_period_ms` out; when that
/// timer fires the host calls [`QueryDebouncer::fire`]. Only the ticket of the
/// most recent edit yields a commit, so a burst commits exactly once even if an
/// earlier timer could not be cancelled in time.
#[derive(Clone, Debug)]
pub(crate) struct QueryDebouncer {
    quiet_period_ms: u32,
    generation: u64,
    pending: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct DebounceTicket {
    generation: u64,
}

impl QueryDebouncer {
    pub fn new(quiet_period_ms: u32) -> Self {
        Self {
            quiet_period_ms,
            generation: 0,
            pending: None,
        }
    }

    pub fn quiet_period_ms(&self) -> u32 {
        self.quiet_period_ms
    }

    /// Records an edit, superseding any pending one.
    pub fn push(&mut self, query: impl Into<String>) -> DebounceTicket {
        self.generation = self.generation.wrapping_add(1);
        self.pending = Some(query.into());
        DebounceTicket {
            generation: self.generation,
        }
    }

    pub fn fire(&mut self, ticket: DebounceTicket) -> Option<String> {
        if ticket.generation != self.generation {
            return None;
        }
        self.pending.take()
    }

    /// Drops the pending edit; outstanding tickets become inert.
    pub fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.pending = None;
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
