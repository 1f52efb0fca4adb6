//! User commands

use anyhow::{Context, Result};
use billbook_core::db::Database;

pub fn cmd_signup(db: &Database, username: &str, password: &str) -> Result<()> {
    let user = db
        .register_user(username, password)
        .context("Failed to register user")?;

    println!("✅ Registered user '{}' (id {})", user.username, user.id);
    Ok(())
}
