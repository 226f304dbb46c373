//! Owned reducer stores for the roster console.
//!
//! A [`StateCtx`] owns one piece of state and applies events to it through a
//! pure [`State::reduce`] function. Asynchronous code never touches the state
//! directly: it holds an [`Updater`] (a cloneable, `Send` event sender) and the
//! owner calls [`StateCtx::sync`] from its own loop to apply whatever arrived.
//!
//! [`TaskGenerations`] and [`LatestOnlyUpdater`] add a "latest request wins"
//! gate so results of superseded requests are dropped before they reach the
//! store.

mod ctx;
mod error;
mod runtime;
mod state;
mod task;
mod updater;

pub use ctx::StateCtx;
pub use error::Error;
pub use runtime::StateRuntime;
pub use state::State;
pub use task::{TaskGenerations, TaskId};
pub use updater::{LatestOnlyUpdater, Updater};
