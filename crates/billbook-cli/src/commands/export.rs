//! Export command implementation

use std::path::Path;

use anyhow::{Context, Result};
use billbook_core::db::Database;
use billbook_core::export::ExportFormat;

use super::find_user;

pub fn cmd_export(db: &Database, username: &str, format: &str, output: Option<&Path>) -> Result<()> {
    let user = find_user(db, username)?;
    let format: ExportFormat = format.parse()?;

    let data = db.export_bills(user.id, format)?;

    match output {
        Some(path) => {
            std::fs::write(path, &data)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("✅ Exported bills to {}", path.display());
        }
        None => print!("{}", data),
    }

    Ok(())
}
