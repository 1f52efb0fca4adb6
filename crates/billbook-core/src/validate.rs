//! Bill validation
//!
//! Every create and edit goes through [`validate_bill`] before anything is
//! written, so both paths enforce the same rules and compute the amount the
//! same way.

use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::models::{BillInput, Category, ValidatedBill};

/// Parse a `YYYY-MM` month string into the first day of that month
pub fn parse_month(month_year: &str) -> Result<NaiveDate> {
    let trimmed = month_year.trim();
    NaiveDate::parse_from_str(&format!("{}-01", trimmed), "%Y-%m-%d").map_err(|_| {
        Error::InvalidInput(format!(
            "Invalid month: {:?} (use YYYY-MM)",
            month_year
        ))
    })
}

fn parse_number(field: &str, value: &str) -> Result<f64> {
    let number: f64 = value
        .trim()
        .parse()
        .map_err(|_| Error::InvalidInput(format!("{} must be a number, got {:?}", field, value)))?;

    if !number.is_finite() {
        return Err(Error::InvalidInput(format!("{} must be a finite number", field)));
    }

    Ok(number)
}

/// Validate raw bill input and compute its amount.
///
/// Fails with [`Error::InvalidInput`] when usage or rate is not a positive
/// number, the month does not parse, or the amount overflows, and with
/// [`Error::FutureDate`] when the month starts after `today`.
pub fn validate_bill(category: Category, input: &BillInput, today: NaiveDate) -> Result<ValidatedBill> {
    let usage = parse_number("Usage", &input.usage)?;
    let rate = parse_number("Rate", &input.rate)?;
    let date = parse_month(&input.date)?;

    if usage <= 0.0 || rate <= 0.0 {
        return Err(Error::InvalidInput(
            "Usage and rate must be positive numbers".to_string(),
        ));
    }

    if date > today {
        return Err(Error::FutureDate(date));
    }

    let amount = category.amount(usage, rate);
    if !amount.is_finite() {
        return Err(Error::InvalidInput(
            "Usage and rate are too large to compute an amount".to_string(),
        ));
    }

    Ok(ValidatedBill {
        category,
        usage,
        rate,
        date,
        amount,
    })
}
