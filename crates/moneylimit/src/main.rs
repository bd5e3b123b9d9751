// SPDX-FileCopyrightText: 2026 MoneyLimit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! MoneyLimit - a Telegram bot that turns a monthly budget into a daily limit.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod admin;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use moneylimit_config::model::MoneyLimitConfig;

/// MoneyLimit - daily spending limits over Telegram.
#[derive(Parser, Debug)]
#[command(name = "moneylimit", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the XDG hierarchy.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the bot until SIGINT or SIGTERM (the default).
    Serve,
    /// Print usage counters from the database.
    Stats,
    /// Extend a user's access without a payment.
    Grant {
        /// Telegram user id.
        user_id: i64,
        /// Days to add.
        days: u32,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            moneylimit_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) | None => serve::run_serve(config).await,
        Some(Commands::Stats) => admin::run_stats(&config).await,
        Some(Commands::Grant { user_id, days }) => admin::run_grant(&config, user_id, days).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn load_config(
    path: Option<&std::path::Path>,
) -> Result<MoneyLimitConfig, Vec<moneylimit_config::diagnostic::ConfigError>> {
    match path {
        Some(path) => moneylimit_config::load_and_validate_path(path),
        None => moneylimit_config::load_and_validate(),
    }
}

/// Initializes the tracing subscriber with the given log level.
pub(crate) fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "moneylimit={log_level},moneylimit_agent={log_level},moneylimit_budget={log_level},\
             moneylimit_storage={log_level},moneylimit_telegram={log_level},warn"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
