//! Command implementations for the roster CLI.
//!
//! Each command takes the [`Console`] built by `main`, so tests can drive the
//! same code against a mock server.

pub mod completions;
pub mod list;
pub mod login;
pub mod users;

use std::io::IsTerminal as _;

use anyhow::{Result, bail};
use roster_business::{Console, ConsoleError};

use crate::output::Output;

pub use completions::generate_completions;
pub use list::run_list;
pub use login::{run_login, run_logout, run_status};
pub use users::{run_create, run_delete, run_edit};

/// Make sure `console` holds a live session, prompting for a sign-in when
/// stdin is a terminal.
pub async fn ensure_authenticated(console: &mut Console) -> Result<()> {
    if console.is_authenticated() {
        return Ok(());
    }

    let out = Output::new();
    out.warning("Session expired or not signed in. Please sign in to continue.");
    out.newline();

    if !std::io::stdin().is_terminal() {
        bail!("Cannot prompt for sign-in: stdin is not a terminal. Run `roster login` first.");
    }

    run_login(console, None, None, false).await
}

/// Print each field problem of a rejected form, then turn the error into the
/// command's failure.
fn report(out: &Output, error: ConsoleError) -> anyhow::Error {
    if let ConsoleError::Invalid(problems) = &error {
        for problem in problems {
            out.error(problem);
        }
    }
    error.into()
}
