//! `create`, `edit` and `delete` commands.

use std::io::IsTerminal as _;

use anyhow::{Context as _, Result, bail};
use inquire::Confirm;
use roster_business::{Console, DEFAULT_AVATAR_URL, UserDraft, UserId, UserPatch};
use tracing::{info, instrument};

use super::{ensure_authenticated, report};
use crate::cli::UserFields;
use crate::output::Output;

impl UserFields {
    /// Draft for `create`. Missing names and email stay empty so validation
    /// reports them.
    pub fn into_draft(self) -> UserDraft {
        UserDraft::new(
            self.first_name.unwrap_or_default(),
            self.last_name.unwrap_or_default(),
            self.email.unwrap_or_default(),
        )
        .with_avatar_url(
            self.avatar_url
                .unwrap_or_else(|| DEFAULT_AVATAR_URL.to_owned()),
        )
    }

    /// Patch for `edit`, touching only the fields that were passed.
    pub fn into_patch(self) -> UserPatch {
        UserPatch {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            avatar_url: self.avatar_url,
        }
    }
}

#[instrument(skip_all, name = "create")]
pub async fn run_create(console: &mut Console, fields: UserFields) -> Result<()> {
    let out = Output::new();

    ensure_authenticated(console).await?;

    let record = match console.create_user(fields.into_draft()).await {
        Ok(record) => record,
        Err(e) => {
            out.error("Could not create user");
            return Err(report(&out, e));
        }
    };

    info!(id = %record.id, "Created user");
    out.success(format!("Created {} ({})", record.full_name(), record.id));
    if record.id.is_provisional() {
        out.dim("The server returned no id; a local one was assigned.");
    }
    Ok(())
}

#[instrument(skip_all, name = "edit", fields(id = %id))]
pub async fn run_edit(console: &mut Console, id: &str, fields: UserFields) -> Result<()> {
    let out = Output::new();

    let patch = fields.into_patch();
    if patch.is_empty() {
        bail!("Nothing to change: pass at least one of --first-name, --last-name, --email, --avatar-url");
    }

    ensure_authenticated(console).await?;

    match console.edit_user(UserId::new(id), patch).await {
        Ok(Some(echo)) => {
            out.success(format!("Updated user {id}"));
            out.labeled("Name", echo.full_name());
            out.labeled("Email", echo.email);
        }
        Ok(None) => out.success(format!("Updated user {id}")),
        Err(e) => {
            out.error(format!("Could not update user {id}"));
            return Err(report(&out, e));
        }
    }
    Ok(())
}

#[instrument(skip_all, name = "delete", fields(id = %id))]
pub async fn run_delete(console: &mut Console, id: &str, yes: bool) -> Result<()> {
    let out = Output::new();

    ensure_authenticated(console).await?;

    if !yes {
        if !std::io::stdin().is_terminal() {
            bail!("Refusing to delete without confirmation: pass --yes when stdin is not a terminal");
        }
        let confirmed = Confirm::new(&format!("Delete user {id}?"))
            .with_default(false)
            .prompt()
            .context("Failed to confirm")?;
        if !confirmed {
            out.dim("Cancelled.");
            return Ok(());
        }
    }

    if let Err(e) = console.remove_user(UserId::new(id)).await {
        out.error(format!("Could not delete user {id}"));
        return Err(report(&out, e));
    }

    out.success(format!("Deleted user {id}"));
    Ok(())
}
