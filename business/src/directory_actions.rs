//! Action orchestrator: turns intents into remote calls and store events.
//!
//! Every operation follows the same shape: emit a "requested" event, call the
//! [`DirectoryApi`], then emit exactly one terminal event. Nothing here reads
//! or writes [`crate::DirectoryState`] directly; events go through an
//! [`Updater`] and are applied when the owner syncs.
//!
//! Page loads are sequenced: each load takes a [`roster_states::TaskId`] and its
//! result only reaches the store if no later load was started meanwhile.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use log::{debug, warn};
use roster_states::{LatestOnlyUpdater, TaskGenerations, Updater};

use crate::client::DirectoryApi;
use crate::directory_state::{DirectoryEvent, MutationKind};
use crate::error::DirectoryError;
use crate::user::{UserDraft, UserId, UserPatch, UserRecord};

/// How a page load ended, from the caller's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The result (success data) was handed to the store.
    Applied { page: u32, record_count: usize },
    /// A newer load started before this one finished; its result was dropped.
    Superseded,
}

pub struct DirectoryActions<A: ?Sized> {
    api: Arc<A>,
    updater: Updater<DirectoryEvent>,
    list_generations: TaskGenerations,
    current_page: AtomicU32,
    session_expired: AtomicBool,
}

impl<A: ?Sized> std::fmt::Debug for DirectoryActions<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryActions")
            .field("list_generations", &self.list_generations)
            .field("current_page", &self.current_page)
            .finish_non_exhaustive()
    }
}

impl<A: DirectoryApi + ?Sized> DirectoryActions<A> {
    pub fn new(api: Arc<A>, updater: Updater<DirectoryEvent>) -> Self {
        Self {
            api,
            updater,
            list_generations: TaskGenerations::new(),
            current_page: AtomicU32::new(1),
            session_expired: AtomicBool::new(false),
        }
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    /// Drop the results of every load currently in flight.
    pub fn invalidate_loads(&self) {
        let task = self.list_generations.issue();
        debug!("Invalidated in-flight loads (now at task {})", task.generation());
    }

    /// Whether any call was refused for an expired session since the last
    /// check. Reading clears the flag.
    ///
    /// Set even when the failure itself was superseded.
    pub fn take_session_expired(&self) -> bool {
        self.session_expired.swap(false, Ordering::AcqRel)
    }

    fn note_failure(&self, error: &DirectoryError) {
        if error.is_session_expired() {
            self.session_expired.store(true, Ordering::Release);
        }
    }

    /// Page most recently requested through [`Self::load_page`].
    pub fn current_page(&self) -> u32 {
        self.current_page.load(Ordering::Acquire)
    }

    /// Fetch one page and replace the store's records with it.
    ///
    /// A failure that arrives after a newer load was started is dropped like a
    /// stale success and reported as [`LoadOutcome::Superseded`].
    pub async fn load_page(&self, page: NonZeroU32) -> Result<LoadOutcome, DirectoryError> {
        let task = self.list_generations.issue();
        let latest = self.updater.latest_only(&self.list_generations, task);
        self.current_page.store(page.get(), Ordering::Release);

        debug!("Loading page {page} (task {})", task.generation());
        emit_latest(&latest, DirectoryEvent::ListRequested);

        match self.api.list_page(page).await {
            Ok(result) => {
                let outcome = LoadOutcome::Applied {
                    page: result.page,
                    record_count: result.records.len(),
                };
                let applied = emit_latest(
                    &latest,
                    DirectoryEvent::ListSucceeded {
                        records: result.records,
                        page: result.page,
                        page_count: result.page_count,
                        total_count: result.total_count,
                    },
                );
                Ok(if applied { outcome } else { LoadOutcome::Superseded })
            }
            Err(error) => {
                warn!("Loading page {page} failed: {error}");
                self.note_failure(&error);
                if emit_latest(&latest, DirectoryEvent::ListFailed {
                    error: error.clone(),
                }) {
                    Err(error)
                } else {
                    Ok(LoadOutcome::Superseded)
                }
            }
        }
    }

    /// Move the store to `page` and load it. Page 0 is treated as page 1.
    pub async fn go_to_page(&self, page: u32) -> Result<LoadOutcome, DirectoryError> {
        let page = NonZeroU32::new(page).unwrap_or(NonZeroU32::MIN);
        self.emit(DirectoryEvent::PageChanged { page: page.get() });
        self.load_page(page).await
    }

    /// Reload the page last requested.
    pub async fn refresh(&self) -> Result<LoadOutcome, DirectoryError> {
        let page = NonZeroU32::new(self.current_page()).unwrap_or(NonZeroU32::MIN);
        self.load_page(page).await
    }

    pub fn set_query(&self, text: impl Into<String>) {
        self.emit(DirectoryEvent::QueryChanged { text: text.into() });
    }

    pub async fn create_user(&self, draft: UserDraft) -> Result<UserRecord, DirectoryError> {
        self.emit(DirectoryEvent::MutationRequested {
            kind: MutationKind::Create,
        });
        match self.api.create(&draft).await {
            Ok(record) => {
                self.emit(DirectoryEvent::CreateSucceeded {
                    record: record.clone(),
                });
                Ok(record)
            }
            Err(error) => Err(self.mutation_failed(MutationKind::Create, error)),
        }
    }

    /// Apply `patch` remotely, then locally to the matching record.
    ///
    /// Returns the server's echo of the record when it sent a full one.
    pub async fn edit_user(
        &self,
        id: UserId,
        patch: UserPatch,
    ) -> Result<Option<UserRecord>, DirectoryError> {
        self.emit(DirectoryEvent::MutationRequested {
            kind: MutationKind::Update,
        });
        match self.api.update(&id, &patch).await {
            Ok(echoed) => {
                self.emit(DirectoryEvent::UpdateSucceeded { id, patch });
                Ok(echoed)
            }
            Err(error) => Err(self.mutation_failed(MutationKind::Update, error)),
        }
    }

    pub async fn remove_user(&self, id: UserId) -> Result<(), DirectoryError> {
        self.emit(DirectoryEvent::MutationRequested {
            kind: MutationKind::Delete,
        });
        match self.api.delete(&id).await {
            Ok(()) => {
                self.emit(DirectoryEvent::DeleteSucceeded { id });
                Ok(())
            }
            Err(error) => Err(self.mutation_failed(MutationKind::Delete, error)),
        }
    }

    fn mutation_failed(&self, kind: MutationKind, error: DirectoryError) -> DirectoryError {
        warn!("User {kind} failed: {error}");
        self.note_failure(&error);
        self.emit(DirectoryEvent::MutationFailed {
            kind,
            error: error.clone(),
        });
        error
    }

    fn emit(&self, event: DirectoryEvent) {
        if let Err(e) = self.updater.send(event) {
            warn!("Directory event not delivered: {e}");
        }
    }
}

/// Send through a sequenced updater. `false` when the event was stale.
fn emit_latest(latest: &LatestOnlyUpdater<DirectoryEvent>, event: DirectoryEvent) -> bool {
    match latest.send(event) {
        Ok(applied) => applied,
        Err(e) => {
            warn!("Directory event not delivered: {e}");
            false
        }
    }
}
