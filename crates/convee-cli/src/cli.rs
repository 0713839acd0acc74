//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Admin console for Convee inquiries.
#[derive(Parser, Debug)]
#[command(name = "convee")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Also write logs to a daily rotating file in this directory
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and store the session
    Login {
        /// Email address (defaults to CONVEE_EMAIL or the last one used)
        #[arg(short, long)]
        email: Option<String>,
    },

    /// End the session locally and on the backend
    Logout,

    /// Show whether a stored session is still valid
    Status,

    /// List inquiries
    Inquiries {
        /// Only show rows containing this text (case-insensitive)
        #[arg(short, long)]
        search: Option<String>,

        /// Sort by this field
        #[arg(long)]
        sort: Option<String>,

        /// Sort descending
        #[arg(long, requires = "sort")]
        desc: bool,

        /// Maximum number of rows to fetch
        #[arg(short, long)]
        limit: Option<u32>,

        /// Comma-separated columns to show
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,

        /// Print raw JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}
