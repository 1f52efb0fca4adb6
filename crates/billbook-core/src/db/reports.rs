//! Dashboard and filtered bill views

use tracing::debug;

use super::Database;
use crate::error::{Error, Result};
use crate::filter::BillFilter;
use crate::models::{BillSort, Category, CategorySummary, Dashboard, FilteredBills, YearFilter};
use crate::stats::{average_rate, average_usage, distinct_years};

impl Database {
    /// Per-category bills, averages and available years for one user.
    ///
    /// Averages cover the bills in the selected year; the year list always
    /// covers every bill in the category.
    pub fn dashboard(&self, user_id: i64, year: YearFilter, sort: BillSort) -> Result<Dashboard> {
        let user = self
            .get_user(user_id)?
            .ok_or_else(|| Error::NotFound(format!("user {}", user_id)))?;

        let mut categories = Vec::with_capacity(Category::ALL.len());
        for category in Category::ALL {
            let all = self.list_bills(user_id, category)?;
            let years = distinct_years(&all);

            let mut bills: Vec<_> = all.into_iter().filter(|b| year.matches(b.date)).collect();
            let average_rate = average_rate(&bills);
            let average_usage = average_usage(&bills);
            sort.sort(&mut bills);

            let spec = category.spec();
            categories.push(CategorySummary {
                category,
                usage_unit: spec.usage_unit,
                rate_unit: spec.rate_unit,
                bills,
                average_rate,
                average_usage,
                years,
            });
        }

        debug!(user_id, year = %year, "Built dashboard");
        Ok(Dashboard {
            user,
            selected_year: year.year(),
            sort,
            categories,
        })
    }

    /// One category of a user's bills narrowed by `filter`
    ///
    /// Averages and years describe the whole category, not just the matches.
    pub fn filter_bills(
        &self,
        user_id: i64,
        category: Category,
        filter: &BillFilter,
    ) -> Result<FilteredBills> {
        self.require_user(user_id)?;

        let all = self.list_bills(user_id, category)?;
        let bills = filter.apply(&all);
        debug!(user_id, category = %category, matched = bills.len(), "Filtered bills");

        Ok(FilteredBills {
            category,
            bills,
            average_rate: average_rate(&all),
            average_usage: average_usage(&all),
            years: distinct_years(&all),
        })
    }
}
