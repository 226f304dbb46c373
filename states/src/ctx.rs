use log::trace;

use crate::{State, StateRuntime, Updater};

/// Owner of a single reducer state.
///
/// The context is the only place the state can change. Async work sends
/// events through an [`Updater`]; the owner applies them with [`Self::sync`]
/// and renders from [`Self::state`].
#[derive(Debug)]
pub struct StateCtx<S: State> {
    state: S,
    runtime: StateRuntime<S::Event>,
}

impl<S: State> Default for StateCtx<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateCtx<S> {
    pub fn new() -> Self {
        Self::with_state(S::default())
    }

    pub fn with_state(state: S) -> Self {
        Self {
            state,
            runtime: StateRuntime::new(),
        }
    }

    /// Current snapshot of the state.
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Handle for sending events from async code.
    pub fn updater(&self) -> Updater<S::Event> {
        Updater::new(S::TYPE, self.runtime.sender())
    }

    /// Apply one event immediately, bypassing the queue.
    ///
    /// Queued events are applied first so ordering stays FIFO.
    pub fn apply(&mut self, event: S::Event) {
        self.sync();
        self.reduce_one(event);
    }

    /// Apply every queued event in arrival order. Returns how many were applied.
    pub fn sync(&mut self) -> usize {
        let events: Vec<S::Event> = self.runtime.drain().collect();
        let applied = events.len();
        for event in events {
            self.reduce_one(event);
        }
        if applied > 0 {
            trace!("{}: applied {applied} queued event(s)", S::TYPE);
        }
        applied
    }

    /// Number of events waiting for the next [`Self::sync`].
    pub fn pending(&self) -> usize {
        self.runtime.pending()
    }

    /// Drop queued events and rebuild the state from its default.
    pub fn reset(&mut self) {
        let dropped = self.runtime.drain().count();
        if dropped > 0 {
            trace!("{}: reset dropped {dropped} queued event(s)", S::TYPE);
        }
        self.state = S::default();
    }

    fn reduce_one(&mut self, event: S::Event) {
        let current = std::mem::take(&mut self.state);
        self.state = current.reduce(event);
    }
}
