//! Task generations for "latest request wins" sequencing.
//!
//! Every async request of a given kind takes a [`TaskId`] from a shared
//! [`TaskGenerations`] counter. When the request completes it asks whether its
//! id is still the newest one issued; if not, a later request superseded it and
//! its result must be discarded.
//!
//! ```
//! use roster_states::TaskGenerations;
//!
//! let generations = TaskGenerations::new();
//! let first = generations.issue();
//! let second = generations.issue();
//!
//! assert!(!generations.is_latest(first));
//! assert!(generations.is_latest(second));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifier of one issued task: a strictly increasing generation number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId {
    generation: u64,
}

impl TaskId {
    pub fn new(generation: u64) -> Self {
        Self { generation }
    }

    /// Higher generation values indicate more recently issued tasks.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Shared, monotonically increasing task counter.
///
/// Clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct TaskGenerations {
    latest: Arc<AtomicU64>,
}

impl TaskGenerations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new task id, superseding every id issued before it.
    pub fn issue(&self) -> TaskId {
        TaskId::new(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Generation of the newest issued task, `0` when none was issued.
    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::Acquire)
    }

    pub fn is_latest(&self, task: TaskId) -> bool {
        self.latest() == task.generation()
    }
}
