//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Billbook - Track water, electricity and gas bills
#[derive(Parser)]
#[command(name = "billbook")]
#[command(about = "Self-hosted utility bill tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "billbook.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set BILLBOOK_DB_KEY environment variable with your passphrase.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Register a new user
    Signup {
        /// Username
        username: String,

        /// Password (at least 8 characters)
        #[arg(long)]
        password: String,
    },

    /// Record a bill
    Add {
        #[command(flatten)]
        owner: BillTarget,

        #[command(flatten)]
        fields: BillFields,
    },

    /// Edit a bill; the amount is recomputed
    Edit {
        #[command(flatten)]
        owner: BillTarget,

        /// Bill ID
        id: i64,

        #[command(flatten)]
        fields: BillFields,
    },

    /// Delete a bill permanently
    Delete {
        #[command(flatten)]
        owner: BillTarget,

        /// Bill ID
        id: i64,
    },

    /// List bills, optionally narrowed by range filters
    List {
        #[command(flatten)]
        owner: BillTarget,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Show per-category bills, averages and years
    Dashboard {
        /// Username
        #[arg(short, long)]
        user: String,

        /// Year to show, or all_time
        #[arg(long, default_value = "all_time")]
        year: String,

        /// Sort field: date, usage, rate, amount
        #[arg(long, default_value = "date")]
        sort: String,

        /// Sort order: asc, desc
        #[arg(long, default_value = "asc")]
        order: String,
    },

    /// Show monthly chart series with trend lines
    Chart {
        #[command(flatten)]
        owner: BillTarget,

        /// Year to chart, or all_time
        #[arg(long, default_value = "all_time")]
        time_range: String,

        /// Print the series as JSON
        #[arg(long)]
        json: bool,

        /// Also write the chart as a PNG image to this path
        #[arg(long)]
        png: Option<PathBuf>,
    },

    /// Export all of a user's bills
    Export {
        /// Username
        #[arg(short, long)]
        user: String,

        /// Output format: csv, json
        #[arg(short, long, default_value = "csv")]
        format: String,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory containing static files to serve (e.g., ui/dist)
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
}

/// Which user's bills of which category a command works on
#[derive(Args, Debug, Clone)]
pub struct BillTarget {
    /// Username
    #[arg(short, long)]
    pub user: String,

    /// Bill type: water, electricity, gas
    #[arg(short, long)]
    pub category: String,
}

/// Raw bill fields, validated by the core library
#[derive(Args, Debug, Clone)]
pub struct BillFields {
    /// Usage (m³ or kWh)
    #[arg(long)]
    pub usage: String,

    /// Rate (cents for water/electricity, dollars for gas)
    #[arg(long)]
    pub rate: String,

    /// Billing month (YYYY-MM)
    #[arg(long)]
    pub month: String,
}

/// Inclusive range bounds for `list`
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    #[arg(long)]
    pub usage_min: Option<String>,
    #[arg(long)]
    pub usage_max: Option<String>,
    #[arg(long)]
    pub rate_min: Option<String>,
    #[arg(long)]
    pub rate_max: Option<String>,
    #[arg(long)]
    pub amount_min: Option<String>,
    #[arg(long)]
    pub amount_max: Option<String>,
    /// Earliest bill date (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<String>,
    /// Latest bill date (YYYY-MM-DD)
    #[arg(long)]
    pub end_date: Option<String>,
}
