//! The synchronization store: the single source of truth for what the
//! directory screen shows.
//!
//! [`DirectoryState::reduce`] is a pure function of (state, event). It never
//! performs IO; the action layer feeds it events describing what happened.

use log::trace;
use roster_states::State;

use crate::error::DirectoryError;
use crate::user::{UserId, UserPatch, UserRecord};

/// What the directory is currently doing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Idle,
    Loading,
    /// The last operation failed. The error lives here, so it can only be
    /// present while the status says so.
    Error(DirectoryError),
}

/// Which mutation an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

impl std::fmt::Display for MutationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryEvent {
    ListRequested,
    ListSucceeded {
        records: Vec<UserRecord>,
        page: u32,
        page_count: u32,
        total_count: u32,
    },
    ListFailed {
        error: DirectoryError,
    },
    MutationRequested {
        kind: MutationKind,
    },
    CreateSucceeded {
        record: UserRecord,
    },
    UpdateSucceeded {
        id: UserId,
        patch: UserPatch,
    },
    DeleteSucceeded {
        id: UserId,
    },
    MutationFailed {
        kind: MutationKind,
        error: DirectoryError,
    },
    QueryChanged {
        text: String,
    },
    PageChanged {
        page: u32,
    },
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryState {
    records: Vec<UserRecord>,
    status: Status,
    page: u32,
    page_count: u32,
    total_count: u32,
    query: String,
}

impl Default for DirectoryState {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            status: Status::Idle,
            page: 1,
            page_count: 1,
            total_count: 0,
            query: String::new(),
        }
    }
}

impl State for DirectoryState {
    type Event = DirectoryEvent;
    const TYPE: &'static str = "directory";

    fn reduce(mut self, event: DirectoryEvent) -> Self {
        trace!("directory: {}", event_name(&event));
        match event {
            DirectoryEvent::ListRequested | DirectoryEvent::MutationRequested { .. } => {
                self.status = Status::Loading;
            }
            DirectoryEvent::ListSucceeded {
                records,
                page,
                page_count,
                total_count,
            } => {
                self.records = records;
                self.page = page.max(1);
                self.page_count = page_count.max(1);
                self.total_count = total_count;
                self.status = Status::Idle;
            }
            DirectoryEvent::ListFailed { error } | DirectoryEvent::MutationFailed { error, .. } => {
                self.status = Status::Error(error);
            }
            DirectoryEvent::CreateSucceeded { record } => {
                self.records.insert(0, record);
                self.total_count = self.total_count.saturating_add(1);
                self.status = Status::Idle;
            }
            DirectoryEvent::UpdateSucceeded { id, patch } => {
                if let Some(slot) = self.records.iter_mut().find(|r| r.id == id) {
                    *slot = slot.patched(&patch);
                }
                self.status = Status::Idle;
            }
            DirectoryEvent::DeleteSucceeded { id } => {
                let before = self.records.len();
                self.records.retain(|r| r.id != id);
                if self.records.len() < before {
                    self.total_count = self.total_count.saturating_sub(1);
                }
                self.status = Status::Idle;
            }
            DirectoryEvent::QueryChanged { text } => {
                self.query = text;
            }
            DirectoryEvent::PageChanged { page } => {
                self.page = page.max(1);
            }
            DirectoryEvent::Reset => return Self::default(),
        }
        self
    }
}

fn event_name(event: &DirectoryEvent) -> &'static str {
    match event {
        DirectoryEvent::ListRequested => "ListRequested",
        DirectoryEvent::ListSucceeded { .. } => "ListSucceeded",
        DirectoryEvent::ListFailed { .. } => "ListFailed",
        DirectoryEvent::MutationRequested { .. } => "MutationRequested",
        DirectoryEvent::CreateSucceeded { .. } => "CreateSucceeded",
        DirectoryEvent::UpdateSucceeded { .. } => "UpdateSucceeded",
        DirectoryEvent::DeleteSucceeded { .. } => "DeleteSucceeded",
        DirectoryEvent::MutationFailed { .. } => "MutationFailed",
        DirectoryEvent::QueryChanged { .. } => "QueryChanged",
        DirectoryEvent::PageChanged { .. } => "PageChanged",
        DirectoryEvent::Reset => "Reset",
    }
}

impl DirectoryState {
    pub fn records(&self) -> &[UserRecord] {
        &self.records
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn last_error(&self) -> Option<&DirectoryError> {
        match &self.status {
            Status::Error(error) => Some(error),
            Status::Idle | Status::Loading => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, Status::Loading)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn total_count(&self) -> u32 {
        self.total_count
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn has_next_page(&self) -> bool {
        self.page < self.page_count
    }

    pub fn has_prev_page(&self) -> bool {
        self.page > 1
    }

    pub fn find(&self, id: &UserId) -> Option<&UserRecord> {
        self.records.iter().find(|r| &r.id == id)
    }

    /// Records whose first or last name contains the query, ignoring case.
    /// An empty query shows everything, in store order.
    pub fn visible_records(&self) -> Vec<&UserRecord> {
        let needle = self.query.trim().to_lowercase();
        if needle.is_empty() {
            return self.records.iter().collect();
        }
        self.records
            .iter()
            .filter(|r| {
                r.first_name.to_lowercase().contains(&needle)
                    || r.last_name.to_lowercase().contains(&needle)
            })
            .collect()
    }
}
