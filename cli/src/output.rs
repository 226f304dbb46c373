//! Terminal output utilities for styled CLI output.

use std::fmt::Display;

use console::{Term, style};
use roster_business::UserRecord;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Terminal output helper for consistent styled output.
pub struct Output {
    term: Term,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper writing to stdout.
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    /// Print a success message with a green checkmark.
    pub fn success(&self, message: impl Display) {
        drop(
            self.term
                .write_line(&format!("{} {}", style("✓").green().bold(), message)),
        );
    }

    /// Print an error message with a red X.
    pub fn error(&self, message: impl Display) {
        drop(
            self.term
                .write_line(&format!("{} {}", style("✗").red().bold(), message)),
        );
    }

    /// Print a warning message with a yellow warning sign.
    pub fn warning(&self, message: impl Display) {
        drop(
            self.term
                .write_line(&format!("{} {}", style("⚠").yellow().bold(), message)),
        );
    }

    /// Print an info message with a blue info icon.
    pub fn info(&self, message: impl Display) {
        drop(
            self.term
                .write_line(&format!("{} {}", style("ℹ").blue().bold(), message)),
        );
    }

    /// Print a plain message without any prefix.
    pub fn print(&self, message: impl Display) {
        drop(self.term.write_line(&message.to_string()));
    }

    pub fn newline(&self) {
        drop(self.term.write_line(""));
    }

    /// Print a header with emphasis.
    pub fn header(&self, message: impl Display) {
        drop(
            self.term
                .write_line(&style(message).bold().cyan().to_string()),
        );
    }

    /// Print a dim/muted message.
    pub fn dim(&self, message: impl Display) {
        drop(self.term.write_line(&style(message).dim().to_string()));
    }

    /// Print a labeled value with indentation.
    pub fn labeled(&self, label: impl Display, value: impl Display) {
        drop(
            self.term
                .write_line(&format!("  {}: {}", style(label).dim(), value)),
        );
    }

    /// Print a page summary line.
    pub fn page_summary(&self, page: u32, page_count: u32, shown: usize, total: u32) {
        drop(self.term.write_line(&format!(
            "\n{} {} of {} ({} shown, {} total)",
            style("Page").bold(),
            style(page).cyan(),
            style(page_count.max(1)).cyan(),
            shown,
            style(total).cyan().bold()
        )));
    }
}

#[derive(Tabled)]
pub struct UserRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Email")]
    pub email: String,
    #[tabled(rename = "Avatar")]
    pub avatar: String,
}

impl From<&UserRecord> for UserRow {
    fn from(record: &UserRecord) -> Self {
        Self {
            id: record.id.to_string(),
            name: truncate_str(&record.full_name(), 28),
            email: record.email.clone(),
            avatar: truncate_str(&record.avatar_url, 40),
        }
    }
}

pub fn user_table<'a>(records: impl IntoIterator<Item = &'a UserRecord>) -> String {
    let rows: Vec<UserRow> = records.into_iter().map(UserRow::from).collect();
    let mut table = Table::new(&rows);
    table.with(Style::rounded());
    table.to_string()
}

pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{truncated}...")
    } else {
        s.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use roster_business::{UserDraft, UserId};

    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("short", 10), "short");
        assert_eq!(truncate_str("a very long name indeed", 10), "a very ...");
    }

    #[test]
    fn test_user_table_lists_every_record() {
        let records = vec![
            UserDraft::new("George", "Bluth", "george.bluth@reqres.in").into_record(UserId::from(1)),
            UserDraft::new("Janet", "Weaver", "janet.weaver@reqres.in").into_record(UserId::from(2)),
        ];

        let table = user_table(&records);

        assert!(table.contains("George Bluth"));
        assert!(table.contains("janet.weaver@reqres.in"));
        assert!(table.contains("ID"));
    }
}
