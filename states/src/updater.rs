use flume::Sender;
use log::debug;

use crate::{Error, TaskGenerations, TaskId};

/// Cloneable, `Send` handle that queues events for a [`crate::StateCtx`].
#[derive(Debug)]
pub struct Updater<E> {
    state: &'static str,
    send: Sender<E>,
}

impl<E> Clone for Updater<E> {
    fn clone(&self) -> Self {
        Self {
            state: self.state,
            send: self.send.clone(),
        }
    }
}

impl<E> Updater<E> {
    pub(crate) fn new(state: &'static str, send: Sender<E>) -> Self {
        Self { state, send }
    }

    /// Queue an event. Fails only when the owning context has been dropped.
    pub fn send(&self, event: E) -> Result<(), Error> {
        self.send
            .send(event)
            .map_err(|_| Error::store_closed(self.state))
    }

    /// Wrap this updater so it only forwards events while `task` is the
    /// newest task issued by `generations`.
    pub fn latest_only(&self, generations: &TaskGenerations, task: TaskId) -> LatestOnlyUpdater<E> {
        LatestOnlyUpdater {
            inner: self.clone(),
            generations: generations.clone(),
            task,
        }
    }
}

/// An [`Updater`] bound to one task generation.
///
/// Once a newer task has been issued from the same [`TaskGenerations`], every
/// send through this handle is dropped instead of reaching the store.
#[derive(Debug)]
pub struct LatestOnlyUpdater<E> {
    inner: Updater<E>,
    generations: TaskGenerations,
    task: TaskId,
}

impl<E> Clone for LatestOnlyUpdater<E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            generations: self.generations.clone(),
            task: self.task,
        }
    }
}

impl<E> LatestOnlyUpdater<E> {
    pub fn task(&self) -> TaskId {
        self.task
    }

    pub fn is_latest(&self) -> bool {
        self.generations.is_latest(self.task)
    }

    /// Forward `event` if this task is still the latest one.
    ///
    /// Returns `Ok(false)` when the event was dropped as stale.
    pub fn send(&self, event: E) -> Result<bool, Error> {
        if !self.is_latest() {
            debug!(
                "{}: dropping event from superseded task generation {} (latest is {})",
                self.inner.state,
                self.task.generation(),
                self.generations.latest()
            );
            return Ok(false);
        }
        self.inner.send(event).map(|()| true)
    }
}
