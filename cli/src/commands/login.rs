//! Session commands: `login`, `logout` and `status`.

use std::path::Path;

use anyhow::{Context as _, Result};
use chrono::Utc;
use inquire::Text;
use roster_business::{Console, LoginForm};
use tracing::{info, instrument, warn};

use super::report;
use crate::output::Output;

/// Sign in, prompting for whatever was not passed in.
///
/// The email prompt is pre-filled with the remembered email.
#[instrument(skip_all, name = "login")]
pub async fn run_login(
    console: &mut Console,
    email: Option<String>,
    password: Option<String>,
    remember: bool,
) -> Result<()> {
    let out = Output::new();

    let email = match email {
        Some(email) => email,
        None => {
            out.header("Sign in to the directory");
            out.newline();
            let remembered = console.auth().remembered_email.clone().unwrap_or_default();
            Text::new("Email:")
                .with_initial_value(&remembered)
                .prompt()
                .context("Failed to read email")?
        }
    };
    let password = match password {
        Some(password) => password,
        None => rpassword::prompt_password("Password: ").context("Failed to read password")?,
    };

    info!(email = %email, remember, "Attempting login");

    if let Err(e) = console
        .login(LoginForm::new(email.clone(), password), remember)
        .await
    {
        warn!("Login failed: {e}");
        out.error(console.auth().error().unwrap_or("Sign in failed"));
        return Err(report(&out, e)).context("Sign in failed");
    }

    out.success(format!("Signed in as {email}"));
    if remember {
        out.dim("Your email will be pre-filled next time.");
    }
    Ok(())
}

#[instrument(skip_all, name = "logout")]
pub fn run_logout(console: &mut Console) -> Result<()> {
    let out = Output::new();

    if console.session().credential().is_none() {
        out.info("Not signed in.");
        return Ok(());
    }

    console.logout().context("Failed to clear the saved session")?;
    out.success("Signed out");
    Ok(())
}

#[instrument(skip_all, name = "status")]
pub fn run_status(console: &Console, config_path: &Path) -> Result<()> {
    let out = Output::new();

    match console.session().credential() {
        Some(credential) if console.is_authenticated() => {
            out.success("Signed in");
            out.labeled("Since", credential.issued_at.to_rfc3339());
            match credential.expires_at {
                Some(at) => out.labeled("Expires", at.to_rfc3339()),
                None => out.labeled("Expires", "never"),
            }
        }
        Some(credential) => {
            let expired_at = credential.expires_at.unwrap_or_else(Utc::now);
            out.warning(format!("Session expired at {}", expired_at.to_rfc3339()));
            out.dim("Run `roster login` to sign in again.");
        }
        None => {
            out.info("Not signed in");
            out.dim("Run `roster login` to sign in.");
        }
    }

    if let Some(email) = &console.auth().remembered_email {
        out.labeled("Remembered email", email);
    }
    out.labeled("Session file", config_path.display());
    Ok(())
}
