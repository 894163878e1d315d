// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! FitCoach diagnostics CLI
//!
//! Exercises the client against a backend the same way the app's debug
//! screen does: shows where the API URL comes from, checks health and
//! version, and prints recent request failures.

use anyhow::Context;
use clap::{Parser, Subcommand};
use fitcoach_client::client::{ApiClient, BaseUrl, SessionEvents};
use fitcoach_client::config::Config;
use fitcoach_client::storage::{MemoryStore, SealedFileStore, SecureStore, Session};
use fitcoach_client::ApiError;
use serde::Serialize;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "fitcoach", about = "FitCoach API client diagnostics")]
struct Cli {
    /// Emit JSON logs
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the resolved API URL and session state
    Status,
    /// Call GET /api/health
    Health,
    /// Call GET /api/version
    Version,
    /// Call GET /api/diagnostics
    Diagnostics,
    /// Show the signed-in user
    Me,
    /// Sign in and store the token
    Login {
        email: String,
        #[arg(long, env = "FITCOACH_PASSWORD")]
        password: String,
    },
    /// Forget the stored token
    Logout,
    /// Persist a runtime API URL override
    SetApiUrl { url: String },
    /// Remove the runtime API URL override
    ClearApiUrl,
}

/// Prints the session-expired alert the app would show.
struct ConsoleEvents;

impl SessionEvents for ConsoleEvents {
    fn session_expired(&self, message: &str) {
        eprintln!("{message}");
    }
}

#[derive(Serialize)]
struct StatusReport<'a> {
    api_url: Option<&'a str>,
    api_url_source: &'static str,
    signed_in: bool,
    qa_login_enabled: bool,
    store: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.json);

    let config = Config::from_env().context("Failed to load configuration")?;

    let store_desc = match &config.store_key {
        Some(_) => config.store_path.display().to_string(),
        None => "memory".to_string(),
    };
    let store: Arc<dyn SecureStore> = match &config.store_key {
        Some(key) => Arc::new(SealedFileStore::new(&config.store_path, key)?),
        None => {
            tracing::warn!("FITCOACH_STORE_KEY not set, session will not be persisted");
            Arc::new(MemoryStore::new())
        }
    };
    let session = Session::new(store);
    let client = ApiClient::from_config(config, session)?.with_events(Arc::new(ConsoleEvents));

    let result = run(&client, cli.command, store_desc).await;
    if let Err(err) = result {
        eprintln!("error (status {}): {}", err.status(), err);
        for record in client.diagnostics().records() {
            eprintln!("  {}", serde_json::to_string(&record)?);
        }
        std::process::exit(1);
    }
    Ok(())
}

async fn run(client: &ApiClient, command: Command, store_desc: String) -> Result<(), ApiError> {
    match command {
        Command::Status => {
            let base = client.base_url()?;
            let report = StatusReport {
                api_url: base.as_str(),
                api_url_source: base.source(),
                signed_in: client.session().is_signed_in()?,
                qa_login_enabled: client.config().qa_login_enabled,
                store: store_desc,
            };
            print_json(&report);
            if base == BaseUrl::Missing {
                return Err(ApiError::NotConfigured);
            }
        }
        Command::Health => {
            let health = client.health().await?;
            println!("{}", health.status);
        }
        Command::Version => {
            let version = client.version().await?;
            match version.build_id {
                Some(build) => println!("{} ({})", version.version, build),
                None => println!("{}", version.version),
            }
        }
        Command::Diagnostics => print_json(&client.server_diagnostics().await?),
        Command::Me => {
            let me = client.me().await?;
            println!("{}", me.email);
            if let Some(coach) = me.coach_id() {
                println!("coach: {}", coach.profile().name);
            }
        }
        Command::Login { email, password } => {
            client.login(&email, &password).await?;
            println!("Signed in as {email}");
        }
        Command::Logout => {
            client.logout()?;
            println!("Signed out");
        }
        Command::SetApiUrl { url } => {
            let url = client.session().set_api_url_override(&url)?;
            println!("API URL set to {url}");
        }
        Command::ClearApiUrl => {
            client.session().clear_api_url_override()?;
            println!("API URL override cleared");
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::error!(error = %e, "Failed to render output"),
    }
}

/// Initialize structured logging.
fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("fitcoach_client=info,warn"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
