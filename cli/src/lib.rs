//! The `roster` command line front end.
//!
//! `main` parses arguments and hands them to [`run`]; everything else lives
//! here so the commands can be exercised from integration tests.

pub mod cli;
pub mod commands;
pub mod config;
pub mod output;
pub mod timing;

use std::sync::Arc;

use anyhow::{Context as _, Result};
use roster_business::{BusinessConfig, Console};
use tracing::debug;

use crate::cli::{Cli, Commands};
use crate::config::{Config, FileSessionStore};

/// Run one parsed invocation.
pub async fn run(cli: Cli) -> Result<()> {
    let Cli {
        command,
        api_url,
        config,
        ..
    } = cli;

    if let Commands::Completions { shell } = command {
        commands::generate_completions(shell);
        return Ok(());
    }

    let mut business = BusinessConfig::from_env().context("Failed to load configuration")?;
    if let Some(url) = api_url {
        business = business.with_api_base_url(url);
    }
    let config_path = match config {
        Some(path) => path,
        None => Config::default_path()?,
    };
    debug!(api = %business.api_base_url, config = %config_path.display(), "Starting");

    let store = Arc::new(FileSessionStore::new(&config_path));
    let mut console =
        Console::connect(business, store).context("Failed to set up the directory client")?;

    match command {
        Commands::Login { email, remember } => {
            commands::run_login(&mut console, email, None, remember).await
        }
        Commands::Logout => commands::run_logout(&mut console),
        Commands::Status => commands::run_status(&console, &config_path),
        Commands::List { page, query, json } => {
            commands::run_list(&mut console, page, query, json).await
        }
        Commands::Create { fields } => commands::run_create(&mut console, fields).await,
        Commands::Edit { id, fields } => commands::run_edit(&mut console, &id, fields).await,
        Commands::Delete { id, yes } => commands::run_delete(&mut console, &id, yes).await,
        Commands::Completions { .. } => Ok(()),
    }
}
