//! `list` command.

use anyhow::{Context as _, Result};
use roster_business::Console;
use tracing::instrument;

use super::{ensure_authenticated, report};
use crate::output::{Output, user_table};

#[instrument(skip_all, name = "list", fields(page = page, query = query.as_deref().unwrap_or("")))]
pub async fn run_list(
    console: &mut Console,
    page: u32,
    query: Option<String>,
    json: bool,
) -> Result<()> {
    let out = Output::new();

    ensure_authenticated(console).await?;

    if let Err(e) = console.load_page(page).await {
        out.error(format!("Error listing users: {e}"));
        return Err(report(&out, e));
    }
    if let Some(query) = query {
        console.set_query(query);
    }

    let directory = console.directory();
    let visible = directory.visible_records();

    if json {
        let body = serde_json::to_string_pretty(&visible).context("Failed to serialize users")?;
        out.print(body);
        return Ok(());
    }

    if visible.is_empty() {
        out.dim("No users found.");
    } else {
        out.print(user_table(visible.iter().copied()));
    }
    out.page_summary(
        directory.page(),
        directory.page_count(),
        visible.len(),
        directory.total_count(),
    );
    Ok(())
}
