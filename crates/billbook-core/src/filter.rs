//! Bill filter builder
//!
//! Range bounds over usage, rate, amount and date. Every bound is optional and
//! inclusive; the bounds that are set are combined with AND.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::Bill;

/// Raw query-string style filter parameters
///
/// Empty strings are treated the same as missing values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterParams {
    pub usage_min: Option<String>,
    pub usage_max: Option<String>,
    pub rate_min: Option<String>,
    pub rate_max: Option<String>,
    pub amount_min: Option<String>,
    pub amount_max: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Builder for bill range filters
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BillFilter {
    pub usage_min: Option<f64>,
    pub usage_max: Option<f64>,
    pub rate_min: Option<f64>,
    pub rate_max: Option<f64>,
    pub amount_min: Option<f64>,
    pub amount_max: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn parse_bound(field: &'static str, value: &Option<String>) -> Result<Option<f64>> {
    present(value)
        .map(|s| match s.parse::<f64>() {
            Ok(n) if !n.is_nan() => Ok(n),
            _ => Err(Error::InvalidInput(format!(
                "{} must be a number, got {:?}",
                field, s
            ))),
        })
        .transpose()
}

fn parse_date_bound(field: &'static str, value: &Option<String>) -> Result<Option<NaiveDate>> {
    present(value)
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| Error::InvalidDateFormat {
                field,
                value: s.to_string(),
            })
        })
        .transpose()
}

fn within<T: PartialOrd>(value: T, min: Option<T>, max: Option<T>) -> bool {
    min.map_or(true, |min| value >= min) && max.map_or(true, |max| value <= max)
}

impl BillFilter {
    /// Create a filter with no bounds
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse raw parameters into a filter.
    ///
    /// A malformed date fails with [`Error::InvalidDateFormat`] and a malformed
    /// number with [`Error::InvalidInput`]; neither is silently dropped.
    pub fn from_params(params: &FilterParams) -> Result<Self> {
        Ok(Self {
            usage_min: parse_bound("usage_min", &params.usage_min)?,
            usage_max: parse_bound("usage_max", &params.usage_max)?,
            rate_min: parse_bound("rate_min", &params.rate_min)?,
            rate_max: parse_bound("rate_max", &params.rate_max)?,
            amount_min: parse_bound("amount_min", &params.amount_min)?,
            amount_max: parse_bound("amount_max", &params.amount_max)?,
            start_date: parse_date_bound("start_date", &params.start_date)?,
            end_date: parse_date_bound("end_date", &params.end_date)?,
        })
    }

    /// Set usage bounds
    pub fn usage(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.usage_min = min;
        self.usage_max = max;
        self
    }

    /// Set rate bounds
    pub fn rate(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.rate_min = min;
        self.rate_max = max;
        self
    }

    /// Set amount bounds
    pub fn amount(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.amount_min = min;
        self.amount_max = max;
        self
    }

    /// Set date range (bill months are compared as first-of-month dates)
    pub fn date_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    /// True when no bound is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Whether a single bill satisfies every bound
    pub fn matches(&self, bill: &Bill) -> bool {
        within(bill.usage, self.usage_min, self.usage_max)
            && within(bill.rate, self.rate_min, self.rate_max)
            && within(bill.amount, self.amount_min, self.amount_max)
            && within(bill.date, self.start_date, self.end_date)
    }

    /// Bills satisfying every bound, in input order
    pub fn apply(&self, bills: &[Bill]) -> Vec<Bill> {
        bills.iter().filter(|b| self.matches(b)).cloned().collect()
    }
}
