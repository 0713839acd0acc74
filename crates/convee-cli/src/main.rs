//! Convee admin console - a command-line client for the inquiries collection.
//!
//! Logs in against the Directus backend, keeps the session on disk for at
//! most six hours, and lists inquiries as a searchable, sortable table.

mod cli;
mod output;

use std::io::{self, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use convee_core::models::{filter_records, sort_records, INQUIRY_DEFAULT_SORT};
use convee_core::utils::format_remaining;
use convee_core::{
    fetch_collection, ApiClient, Config, Credentials, QueryOptions, SessionStorage, SessionStore,
    Startup,
};
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

type Session = SessionStore<ApiClient, Box<dyn SessionStorage>>;

/// Log file name prefix inside `--log-dir`
const LOG_FILE_PREFIX: &str = "convee.log";

/// Initialize the tracing subscriber for logging
fn init_tracing(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    // RUST_LOG wins over -v flags
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _log_guard = init_tracing(cli.verbose, cli.log_dir.as_deref());

    let mut config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            Config::default().with_env_overrides(|key| std::env::var(key).ok())
        }
    };
    info!(backend = %config.backend_url, "Convee admin starting");

    match cli.command {
        Commands::Login { email } => login(&mut config, email).await,
        Commands::Logout => logout(&config).await,
        Commands::Status => status(&config).await,
        Commands::Inquiries {
            search,
            sort,
            desc,
            limit,
            fields,
            json,
        } => {
            let limit = limit.unwrap_or(config.page_limit);
            inquiries(&config, search, sort, desc, limit, fields, json).await
        }
    }
}

fn open_session(config: &Config) -> Result<Session> {
    let api = ApiClient::with_timeout(&config.backend_url, config.request_timeout())
        .context("Failed to create API client")?;
    let storage = config.open_storage()?;
    Ok(SessionStore::new(api, storage))
}

// =========================================================================
// Commands
// =========================================================================

async fn login(config: &mut Config, email: Option<String>) -> Result<()> {
    let email = match email.or_else(|| std::env::var("CONVEE_EMAIL").ok()) {
        Some(email) => email,
        None => prompt_email(config.last_email.as_deref())?,
    };

    let password = match std::env::var("CONVEE_PASSWORD") {
        Ok(password) if !password.is_empty() => password,
        _ => rpassword::prompt_password("Password: ")?,
    };

    let mut session = open_session(config)?;
    let credentials = Credentials::new(email, password);

    if let Err(e) = session.login(&credentials).await {
        error!(error = %e, "Login failed");
        bail!("{}", e.user_message().unwrap_or("Login failed."));
    }

    config.last_email = Some(credentials.email.clone());
    if let Err(e) = config.save() {
        warn!(error = %e, "Failed to save config");
    }

    println!("Login successful.");
    if let Some(left) = session.remaining() {
        println!("Session valid for {}.", format_remaining(left));
    }
    session.teardown();
    Ok(())
}

async fn logout(config: &Config) -> Result<()> {
    let mut session = open_session(config)?;
    // Restores the token (if still valid) so the backend can be told too
    session.initialize().await;
    session.logout().await;
    println!("Logged out.");
    Ok(())
}

async fn status(config: &Config) -> Result<()> {
    let mut session = open_session(config)?;

    match session.initialize().await {
        Startup::Authenticated(identity) => {
            println!("Logged in as {}.", identity.display_name());
            if let Some(left) = session.remaining() {
                println!("Session expires in {}.", format_remaining(left));
            }
        }
        Startup::NoSession => println!("Not logged in."),
        Startup::Expired => println!("Session expired. Please log in again."),
        Startup::Rejected => println!("Session is no longer valid. Please log in again."),
    }

    session.teardown();
    Ok(())
}

async fn inquiries(
    config: &Config,
    search: Option<String>,
    sort: Option<String>,
    desc: bool,
    limit: u32,
    fields: Vec<String>,
    json: bool,
) -> Result<()> {
    let mut session = open_session(config)?;

    if !matches!(session.initialize().await, Startup::Authenticated(_)) {
        bail!("Not logged in. Run `convee login` first.");
    }

    let mut options = QueryOptions::new().sort(INQUIRY_DEFAULT_SORT).limit(limit);
    if !fields.is_empty() {
        options = options.fields(fields.iter().cloned());
    }

    let records = match fetch_collection(&mut session, &config.collection, &options).await {
        Ok(records) => records,
        Err(e) if e.requires_login() => bail!("Session ended. Please log in again."),
        Err(e) => return Err(e).context("Failed to load inquiries"),
    };
    session.teardown();

    let mut view = filter_records(&records, search.as_deref().unwrap_or(""));
    if let Some(ref field) = sort {
        sort_records(&mut view, field, !desc);
    }

    if json {
        output::print_json(&view)?;
    } else {
        output::print_table(&view, &fields);
    }
    Ok(())
}

fn prompt_email(last_email: Option<&str>) -> Result<String> {
    match last_email {
        Some(last) => print!("Email [{}]: ", last),
        None => print!("Email: "),
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    match (input.is_empty(), last_email) {
        (true, Some(last)) => Ok(last.to_string()),
        _ => Ok(input.to_string()),
    }
}
