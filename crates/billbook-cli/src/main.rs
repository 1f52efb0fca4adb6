//! Billbook CLI - Utility bill tracker
//!
//! Usage:
//!   billbook init                                  Initialize database
//!   billbook signup alice --password ...           Register a user
//!   billbook add -u alice -c water --usage 10 --rate 200 --month 2024-01
//!   billbook dashboard -u alice --year 2024        Per-category summary
//!   billbook chart -u alice -c gas --png gas.png   Trend chart image
//!   billbook serve --port 3000                     Start web server

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let open_db = || commands::open_db(&cli.db, cli.no_encrypt);

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Signup { username, password } => {
            commands::cmd_signup(&open_db()?, &username, &password)
        }
        Commands::Add { owner, fields } => commands::cmd_add(&open_db()?, &owner, &fields),
        Commands::Edit { owner, id, fields } => {
            commands::cmd_edit(&open_db()?, &owner, id, &fields)
        }
        Commands::Delete { owner, id } => commands::cmd_delete(&open_db()?, &owner, id),
        Commands::List { owner, filter } => commands::cmd_list(&open_db()?, &owner, &filter),
        Commands::Dashboard {
            user,
            year,
            sort,
            order,
        } => commands::cmd_dashboard(&open_db()?, &user, &year, &sort, &order),
        Commands::Chart {
            owner,
            time_range,
            json,
            png,
        } => commands::cmd_chart(&open_db()?, &owner, &time_range, json, png.as_deref()),
        Commands::Export {
            user,
            format,
            output,
        } => commands::cmd_export(&open_db()?, &user, &format, output.as_deref()),
        Commands::Serve {
            port,
            host,
            static_dir,
        } => {
            commands::cmd_serve(&cli.db, &host, port, cli.no_encrypt, static_dir.as_deref())
                .await
        }
    }
}
