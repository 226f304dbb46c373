//! Client-side synchronization core for the roster admin console.
//!
//! Layers, leaf first:
//! - [`user`] / [`validation`]: the user model and the form rules that guard it
//! - [`client`]: the remote directory API behind the [`DirectoryApi`] trait
//! - [`directory_state`]: the pure reducer over [`DirectoryState`]
//! - [`directory_actions`]: async orchestration that feeds events to the reducer
//! - [`session`] / [`auth_state`] / [`route`]: who may see the directory
//! - [`console`]: everything above wired into one owned container

pub mod auth_state;
pub mod client;
pub mod config;
pub mod console;
pub mod directory_actions;
pub mod directory_state;
pub mod error;
pub mod http;
pub mod route;
pub mod session;
pub mod user;
pub mod validation;

#[cfg(test)]
mod test_utils;

pub use auth_state::{AuthEvent, AuthState, AuthStatus};
pub use client::{DirectoryApi, HttpDirectoryClient, PageResult};
pub use config::{BusinessConfig, ConfigError};
pub use console::Console;
pub use directory_actions::{DirectoryActions, LoadOutcome};
pub use directory_state::{DirectoryEvent, DirectoryState, MutationKind, Status};
pub use error::{AuthError, ConsoleError, DirectoryError, SessionError};
pub use route::{Route, resolve_route};
pub use session::{MemorySessionStore, SessionCredential, SessionGuard, SessionStore};
pub use user::{DEFAULT_AVATAR_URL, UserDraft, UserId, UserPatch, UserRecord};
pub use validation::{LoginForm, ValidationError};
