//! Bill statistics: averages, year lists and monthly rollups

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};

use crate::models::{Bill, MonthlyRollup};

fn mean(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let count = values.len();
    if count == 0 {
        return 0.0;
    }
    values.sum::<f64>() / count as f64
}

/// Mean rate, or 0 when there are no bills
pub fn average_rate(bills: &[Bill]) -> f64 {
    mean(bills.iter().map(|b| b.rate))
}

/// Mean usage, or 0 when there are no bills
pub fn average_usage(bills: &[Bill]) -> f64 {
    mean(bills.iter().map(|b| b.usage))
}

/// Distinct bill years, most recent first
pub fn distinct_years(bills: &[Bill]) -> Vec<i32> {
    let years: BTreeSet<i32> = bills.iter().map(|b| b.date.year()).collect();
    years.into_iter().rev().collect()
}

/// First day of the month containing `date`
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Group bills by calendar month, ascending.
///
/// Usage and amount are summed. The rate is taken from the first bill seen
/// for each month; differing rates within a month are not reconciled.
pub fn monthly_rollup(bills: &[Bill]) -> Vec<MonthlyRollup> {
    let mut months: BTreeMap<NaiveDate, MonthlyRollup> = BTreeMap::new();

    for bill in bills {
        let month = month_start(bill.date);
        months
            .entry(month)
            .and_modify(|m| {
                m.usage_sum += bill.usage;
                m.amount_sum += bill.amount;
            })
            .or_insert(MonthlyRollup {
                month,
                usage_sum: bill.usage,
                rate_first: bill.rate,
                amount_sum: bill.amount,
            });
    }

    months.into_values().collect()
}
