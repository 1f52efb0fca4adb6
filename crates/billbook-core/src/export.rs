//! Bill export
//!
//! Flattens every bill a user owns into one row per bill, water first, then
//! electricity, then gas, each category in storage order.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{Bill, Category};

/// File name offered for CSV downloads
pub const CSV_FILE_NAME: &str = "bills.csv";

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl std::str::FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(Error::InvalidInput(format!(
                "Unknown export format: {} (valid: csv, json)",
                s
            ))),
        }
    }
}

/// One exported bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    #[serde(rename = "Type")]
    pub category: String,
    #[serde(rename = "Usage")]
    pub usage: f64,
    #[serde(rename = "Rate")]
    pub rate: f64,
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Amount")]
    pub amount: f64,
}

impl From<&Bill> for ExportRow {
    fn from(bill: &Bill) -> Self {
        Self {
            category: bill.category.label().to_string(),
            usage: bill.usage,
            rate: bill.rate,
            date: bill.date,
            amount: bill.amount,
        }
    }
}

/// Collect a user's bills as export rows
pub fn export_rows(db: &Database, user_id: i64) -> Result<Vec<ExportRow>> {
    let mut rows = Vec::new();
    for category in Category::ALL {
        rows.extend(db.list_bills(user_id, category)?.iter().map(ExportRow::from));
    }
    Ok(rows)
}

/// Render rows as CSV with a `Type,Usage,Rate,Date,Amount` header
///
/// The header is written even when there are no rows.
pub fn write_csv(rows: &[ExportRow]) -> Result<String> {
    let mut buf = Vec::new();
    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(&mut buf);

        writer.write_record(["Type", "Usage", "Rate", "Date", "Amount"])?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
    }

    String::from_utf8(buf).map_err(|e| Error::InvalidInput(e.to_string()))
}

impl Database {
    /// Export a user's bills in the requested format
    pub fn export_bills(&self, user_id: i64, format: ExportFormat) -> Result<String> {
        self.require_user(user_id)?;
        let rows = export_rows(self, user_id)?;
        match format {
            ExportFormat::Csv => write_csv(&rows),
            ExportFormat::Json => Ok(serde_json::to_string_pretty(&rows)?),
        }
    }
}
