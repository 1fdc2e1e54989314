//! Campus weather CLI
//!
//! Prints current conditions, the daily report or API JSON using the same
//! store and feed as the server.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use application::ApplicationError;
use clap::Parser;
use infrastructure::{AppConfig, build_runtime, init_logging};
use presentation_cli::{
    cli::{Cli, Commands},
    display,
};
use presentation_http::handlers::weather::ApiReading;
use tracing::debug;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_from(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    init_logging(&config.logging)?;

    let runtime = build_runtime(&config).await?;
    let service = &runtime.service;
    let command = cli.selected_command();
    debug!(?command, max_age = ?cli.max_age, "Running command");

    let result = match command {
        Commands::Current => service
            .current(config.freshness.page_max_age())
            .await
            .map(|reading| display::format_current(&reading)),
        Commands::Report => service
            .daily_report()
            .await
            .map(|report| display::format_report(&report)),
        Commands::Api => match service.current(config.freshness.api_max_age()).await {
            Ok(reading) => Ok(serde_json::to_string_pretty(&ApiReading::from(&reading))?),
            Err(e) => Err(e),
        },
    };

    runtime.database.close().await;

    match result {
        Ok(output) => {
            println!("{output}");
            Ok(())
        },
        Err(e) => {
            report_failure(&e);
            Err(e.into())
        },
    }
}

/// Explain a failure on stderr, echoing the upstream text for parse errors
fn report_failure(err: &ApplicationError) {
    if let Some(raw) = err.raw_text() {
        eprintln!("ERR: Failed to parse weather information from source.");
        eprintln!("Original string:");
        eprintln!("{raw}");
    }
}
