//! Billbook Core Library
//!
//! Shared functionality for the Billbook utility-bill tracker:
//! - Database access and migrations
//! - Bill validation and range filters
//! - Averages, year lists and monthly rollups
//! - Linear trend fitting, chart series and PNG rendering
//! - CSV/JSON export
//! - Password hashing and login

pub mod auth;
pub mod chart;
pub mod db;
pub mod error;
pub mod export;
pub mod filter;
pub mod models;
pub mod plot;
pub mod stats;
pub mod trend;
pub mod validate;

pub use chart::{build_chart, ChartData, ChartField, ChartPanel};
pub use db::Database;
pub use error::{Error, Result};
pub use export::{export_rows, write_csv, ExportFormat, ExportRow};
pub use filter::{BillFilter, FilterParams};
pub use models::*;
pub use plot::render_png;
pub use trend::TrendLine;
pub use validate::validate_bill;
