//! CLI module
//!
//! Subcommands for running migrations or a single notification pass
//! without starting the HTTP server. `notify-due` is the cron entry
//! point for the daily job.

use clap::{Parser, Subcommand};

use crate::{
    configuration::{
        get_configuration, set_configuration, AppState, Config, State,
    },
    error::Error,
    handler::notify_due,
    provider::{DatabasePool, HTTP},
};

#[derive(Parser)]
#[command(name = "subtracker")]
#[command(about = "Subscription tracking backend", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the API server (default if no command specified)
    Serve,

    /// Run database migrations and exit
    Migrate,

    /// Run one due-subscription notification pass and exit
    NotifyDue,
}

pub fn init_config() -> Result<Config, Error> {
    set_configuration()?;
    get_configuration()
}

pub async fn run_migrate() -> Result<(), Error> {
    let config = init_config()?;
    let database = DatabasePool::new(&config).await?;

    State::init_migrations(&database).await?;
    tracing::info!("Migrations complete");

    Ok(())
}

/// One-shot batch pass. Exits nonzero only when the due-subscription
/// fetch itself fails; per-endpoint failures are part of the report.
pub async fn run_notify_due() -> Result<(), Error> {
    let config = init_config()?;
    let database = DatabasePool::new(&config).await?;
    let http = HTTP::new(config.clone())?;

    let state = State::new(config, database, http).await?;
    let app_state = AppState::new(state);

    let report = notify_due::notify_due_subscriptions(&app_state).await?;
    tracing::info!(
        "Notified {} users: {} delivered, {} failed",
        report.users,
        report.delivered,
        report.failed
    );

    Ok(())
}
