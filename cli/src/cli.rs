use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "roster")]
#[command(about = "Manage the users of a remote directory", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Base URL of the directory API (overrides ROSTER_API_BASE_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Path of the session file (defaults to the platform config directory)
    #[arg(long, global = true, env = "ROSTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Show timing/latency information
    #[arg(long, global = true)]
    pub timing: bool,

    /// Enable verbose debug output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in to the directory
    Login {
        /// Email to sign in with (prompted when omitted)
        #[arg(long, short = 'e')]
        email: Option<String>,

        /// Remember the email for the next sign-in
        #[arg(long, short = 'r')]
        remember: bool,
    },
    /// Sign out and forget the saved session
    Logout,
    /// Show whether a session is active
    Status,
    /// List one page of users
    List {
        /// Page to show (1-based)
        #[arg(long, short = 'p', default_value = "1")]
        page: u32,

        /// Only show users whose first or last name contains this text
        #[arg(long, short = 'q')]
        query: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Create a user
    Create {
        #[command(flatten)]
        fields: UserFields,
    },
    /// Edit fields of an existing user
    Edit {
        /// User id
        id: String,

        #[command(flatten)]
        fields: UserFields,
    },
    /// Delete a user
    Delete {
        /// User id
        id: String,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// User fields shared by `create` and `edit`.
#[derive(Args, Debug, Default, Clone)]
pub struct UserFields {
    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    /// Profile image link
    #[arg(long)]
    pub avatar_url: Option<String>,
}
