//! Bill CRUD operations
//!
//! Every write takes a [`ValidatedBill`], so the amount stored is always the one
//! computed by the validator. The `*_user_bill` variants scope each lookup to
//! the owning user; a bill owned by someone else is reported as not found.

use chrono::Local;
use rusqlite::{params, OptionalExtension, Row};
use tracing::{debug, info};

use super::{parse_date, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Bill, BillInput, Category, ValidatedBill};
use crate::validate::validate_bill;

const BILL_COLUMNS: &str = "id, user_id, category, usage, rate, date, amount, created_at";

fn row_to_bill(row: &Row) -> rusqlite::Result<Bill> {
    let category: String = row.get(2)?;
    let date: String = row.get(5)?;
    let created_at: String = row.get(7)?;

    Ok(Bill {
        id: row.get(0)?,
        user_id: row.get(1)?,
        category: category.parse().map_err(|e: Error| {
            rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
        })?,
        usage: row.get(3)?,
        rate: row.get(4)?,
        date: parse_date(&date)?,
        amount: row.get(6)?,
        created_at: parse_datetime(&created_at),
    })
}

fn bill_not_found(category: Category, id: i64) -> Error {
    Error::NotFound(format!("{} bill {}", category, id))
}

fn today() -> chrono::NaiveDate {
    Local::now().date_naive()
}

impl Database {
    /// Store a validated bill for a user
    pub fn create_bill(&self, user_id: i64, bill: &ValidatedBill) -> Result<Bill> {
        self.require_user(user_id)?;

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO bills (user_id, category, usage, rate, date, amount)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                user_id,
                bill.category.as_str(),
                bill.usage,
                bill.rate,
                bill.date.format("%Y-%m-%d").to_string(),
                bill.amount,
            ],
        )?;
        let id = conn.last_insert_rowid();

        info!(
            user_id,
            bill_id = id,
            category = %bill.category,
            amount = bill.amount,
            "Created bill"
        );
        self.get_bill(bill.category, id)
    }

    /// Get a bill by category and ID
    pub fn get_bill(&self, category: Category, id: i64) -> Result<Bill> {
        let conn = self.conn()?;
        conn.query_row(
            &format!("SELECT {} FROM bills WHERE id = ? AND category = ?", BILL_COLUMNS),
            params![id, category.as_str()],
            row_to_bill,
        )
        .optional()?
        .ok_or_else(|| bill_not_found(category, id))
    }

    /// Replace a bill's fields in place; the category comes from `bill`
    pub fn update_bill(&self, id: i64, bill: &ValidatedBill) -> Result<Bill> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE bills SET usage = ?, rate = ?, date = ?, amount = ?
             WHERE id = ? AND category = ?",
            params![
                bill.usage,
                bill.rate,
                bill.date.format("%Y-%m-%d").to_string(),
                bill.amount,
                id,
                bill.category.as_str(),
            ],
        )?;

        if changed == 0 {
            return Err(bill_not_found(bill.category, id));
        }

        info!(bill_id = id, category = %bill.category, amount = bill.amount, "Updated bill");
        self.get_bill(bill.category, id)
    }

    /// Permanently delete a bill
    pub fn delete_bill(&self, category: Category, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM bills WHERE id = ? AND category = ?",
            params![id, category.as_str()],
        )?;

        if deleted == 0 {
            return Err(bill_not_found(category, id));
        }

        info!(bill_id = id, category = %category, "Deleted bill");
        Ok(())
    }

    /// A user's bills of one category, in insertion order
    pub fn list_bills(&self, user_id: i64, category: Category) -> Result<Vec<Bill>> {
        debug!(user_id, category = %category, "Listing bills");
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM bills WHERE user_id = ? AND category = ? ORDER BY id",
            BILL_COLUMNS
        ))?;

        let bills = stmt
            .query_map(params![user_id, category.as_str()], row_to_bill)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(bills)
    }

    /// Get a bill only if it belongs to `user_id`
    pub fn get_user_bill(&self, user_id: i64, category: Category, id: i64) -> Result<Bill> {
        let bill = self.get_bill(category, id)?;
        if bill.user_id != user_id {
            debug!(user_id, bill_id = id, "Bill belongs to another user");
            return Err(bill_not_found(category, id));
        }
        Ok(bill)
    }

    /// Update a bill only if it belongs to `user_id`
    pub fn update_user_bill(&self, user_id: i64, id: i64, bill: &ValidatedBill) -> Result<Bill> {
        self.get_user_bill(user_id, bill.category, id)?;
        self.update_bill(id, bill)
    }

    /// Delete a bill only if it belongs to `user_id`
    pub fn delete_user_bill(&self, user_id: i64, category: Category, id: i64) -> Result<()> {
        self.get_user_bill(user_id, category, id)?;
        self.delete_bill(category, id)
    }

    /// Validate raw input against today's date and store it
    pub fn add_bill(&self, user_id: i64, category: Category, input: &BillInput) -> Result<Bill> {
        // A missing user is reported before any input problem
        self.require_user(user_id)?;
        let bill = validate_bill(category, input, today())?;
        self.create_bill(user_id, &bill)
    }

    /// Re-validate raw input and overwrite one of the user's bills
    pub fn edit_bill(
        &self,
        user_id: i64,
        category: Category,
        id: i64,
        input: &BillInput,
    ) -> Result<Bill> {
        // Ownership is checked before the input is validated
        self.get_user_bill(user_id, category, id)?;
        let bill = validate_bill(category, input, today())?;
        self.update_bill(id, &bill)
    }
}
