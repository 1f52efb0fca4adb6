//! Domain models for Billbook

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A registered user. The password hash never leaves the `db` module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// Utility bill category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Water,
    Electricity,
    Gas,
}

/// Units and amount scaling for a category
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategorySpec {
    pub category: Category,
    /// Capitalized name used in CSV exports and chart titles
    pub label: &'static str,
    pub usage_unit: &'static str,
    pub rate_unit: &'static str,
    /// Rates are entered in cents for water and electricity, dollars for gas
    pub rate_divisor: f64,
}

static CATEGORY_SPECS: [CategorySpec; 3] = [
    CategorySpec {
        category: Category::Water,
        label: "Water",
        usage_unit: "m³",
        rate_unit: "¢",
        rate_divisor: 100.0,
    },
    CategorySpec {
        category: Category::Electricity,
        label: "Electricity",
        usage_unit: "kWh",
        rate_unit: "¢",
        rate_divisor: 100.0,
    },
    CategorySpec {
        category: Category::Gas,
        label: "Gas",
        usage_unit: "m³",
        rate_unit: "$",
        rate_divisor: 1.0,
    },
];

impl Category {
    /// All categories in display/export order
    pub const ALL: [Category; 3] = [Self::Water, Self::Electricity, Self::Gas];

    pub fn spec(&self) -> &'static CategorySpec {
        match self {
            Self::Water => &CATEGORY_SPECS[0],
            Self::Electricity => &CATEGORY_SPECS[1],
            Self::Gas => &CATEGORY_SPECS[2],
        }
    }

    pub fn specs() -> &'static [CategorySpec] {
        &CATEGORY_SPECS
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Water => "water",
            Self::Electricity => "electricity",
            Self::Gas => "gas",
        }
    }

    pub fn label(&self) -> &'static str {
        self.spec().label
    }

    /// Bill amount in dollars for the given usage and rate
    pub fn amount(&self, usage: f64, rate: f64) -> f64 {
        usage * rate / self.spec().rate_divisor
    }
}

impl std::str::FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "water" => Ok(Self::Water),
            "electricity" => Ok(Self::Electricity),
            "gas" => Ok(Self::Gas),
            _ => Err(Error::UnknownCategory(s.to_string())),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored utility bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    pub id: i64,
    pub user_id: i64,
    pub category: Category,
    /// Physical units (m³ or kWh)
    pub usage: f64,
    /// Price per unit (cents for water/electricity, dollars for gas)
    pub rate: f64,
    /// Billing month, always the first day
    pub date: NaiveDate,
    /// Dollars, derived from usage and rate at write time
    pub amount: f64,
    pub created_at: DateTime<Utc>,
}

/// Raw form-style bill submission
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BillInput {
    pub usage: String,
    pub rate: String,
    /// Billing month as `YYYY-MM`
    pub date: String,
}

impl BillInput {
    pub fn new(usage: impl Into<String>, rate: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            usage: usage.into(),
            rate: rate.into(),
            date: date.into(),
        }
    }
}

/// Bill fields that passed validation, with the amount computed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedBill {
    pub category: Category,
    pub usage: f64,
    pub rate: f64,
    pub date: NaiveDate,
    pub amount: f64,
}

/// One calendar month of aggregated bills
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRollup {
    /// First day of the month
    pub month: NaiveDate,
    pub usage_sum: f64,
    /// Rate of the first bill seen for this month
    pub rate_first: f64,
    pub amount_sum: f64,
}

/// Dashboard year selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YearFilter {
    #[default]
    AllTime,
    Year(i32),
}

impl YearFilter {
    pub fn matches(&self, date: NaiveDate) -> bool {
        use chrono::Datelike;
        match self {
            Self::AllTime => true,
            Self::Year(year) => date.year() == *year,
        }
    }

    pub fn year(&self) -> Option<i32> {
        match self {
            Self::AllTime => None,
            Self::Year(year) => Some(*year),
        }
    }
}

impl std::str::FromStr for YearFilter {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all_time") || s.eq_ignore_ascii_case("all") {
            return Ok(Self::AllTime);
        }
        s.parse::<i32>()
            .map(Self::Year)
            .map_err(|_| Error::InvalidInput(format!("Invalid year: {}", s)))
    }
}

impl std::fmt::Display for YearFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AllTime => write!(f, "all_time"),
            Self::Year(year) => write!(f, "{}", year),
        }
    }
}

/// Column to sort bills by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Date,
    Usage,
    Rate,
    Amount,
}

impl std::str::FromStr for SortField {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "usage" => Ok(Self::Usage),
            "rate" => Ok(Self::Rate),
            "amount" => Ok(Self::Amount),
            _ => Err(Error::InvalidInput(format!(
                "Unknown sort field: {} (valid: date, usage, rate, amount)",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl std::str::FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(Error::InvalidInput(format!(
                "Unknown sort order: {} (valid: asc, desc)",
                s
            ))),
        }
    }
}

/// Sort order for bill listings (defaults to date ascending)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BillSort {
    pub field: SortField,
    pub order: SortOrder,
}

impl BillSort {
    pub fn new(field: SortField, order: SortOrder) -> Self {
        Self { field, order }
    }

    /// Stable in-place sort; bills comparing equal keep their storage order
    pub fn sort(&self, bills: &mut [Bill]) {
        bills.sort_by(|a, b| {
            let ordering = match self.field {
                SortField::Date => a.date.cmp(&b.date),
                SortField::Usage => a.usage.total_cmp(&b.usage),
                SortField::Rate => a.rate.total_cmp(&b.rate),
                SortField::Amount => a.amount.total_cmp(&b.amount),
            };
            match self.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
    }
}

/// Per-category dashboard section
#[derive(Debug, Clone, Serialize)]
pub struct CategorySummary {
    pub category: Category,
    pub usage_unit: &'static str,
    pub rate_unit: &'static str,
    /// Bills in the selected year, sorted
    pub bills: Vec<Bill>,
    pub average_rate: f64,
    pub average_usage: f64,
    /// Years with bills in this category, most recent first
    pub years: Vec<i32>,
}

/// Dashboard for one user
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub user: User,
    /// Selected year (`None` for all time)
    pub selected_year: Option<i32>,
    pub sort: BillSort,
    pub categories: Vec<CategorySummary>,
}

/// Result of applying a filter to one category of a user's bills
#[derive(Debug, Clone, Serialize)]
pub struct FilteredBills {
    pub category: Category,
    /// Bills matching the filter, in storage order
    pub bills: Vec<Bill>,
    /// Averages over every bill in the category
    pub average_rate: f64,
    pub average_usage: f64,
    /// Years with bills in this category, most recent first
    pub years: Vec<i32>,
}
