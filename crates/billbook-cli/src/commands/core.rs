//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `find_user` - Resolve a username to a user
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{Context, Result};
use billbook_core::{db::Database, models::User};

/// Open database with encryption by default, or unencrypted if --no-encrypt
pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path is not valid UTF-8")?;
    if no_encrypt {
        Database::new_unencrypted(path_str).context("Failed to open database (unencrypted)")
    } else {
        Database::new(path_str).context("Failed to open database")
    }
}

/// Look up a user by name
pub fn find_user(db: &Database, username: &str) -> Result<User> {
    db.get_user_by_username(username.trim())?
        .with_context(|| format!("User not found: {}", username))
}

pub fn cmd_init(db_path: &Path, no_encrypt: bool) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path, no_encrypt)?;

    if db.is_encrypted() {
        println!("   🔒 Encryption: ENABLED");
    } else {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    }
    println!("   📁 Location: {}", db.path());

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Create a user: billbook signup <name> --password <password>");
    println!("  2. Record a bill: billbook add -u <name> -c water --usage 10 --rate 200 --month 2024-01");
    println!("  3. Start web UI: billbook serve");

    Ok(())
}
