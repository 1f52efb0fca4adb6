//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `bills` - Bill commands (add, edit, delete, list)
//! - `core` - Core commands (init) and shared utilities (open_db, find_user)
//! - `export` - CSV/JSON export
//! - `reports` - Dashboard and chart series
//! - `serve` - Web server command
//! - `users` - User registration

pub mod bills;
pub mod core;
pub mod export;
pub mod reports;
pub mod serve;
pub mod users;

// Re-export command functions for main.rs
pub use bills::*;
pub use core::*;
pub use export::*;
pub use reports::*;
pub use serve::*;
pub use users::*;

/// Format a number without trailing zeros beyond two decimals
pub fn fmt_num(value: f64) -> String {
    let s = format!("{:.2}", value);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}
