//! Chart series for the three-panel monthly trend chart
//!
//! Produces plain numbers for a renderer: one panel each for rate, usage and
//! amount, with trend-line predictions at every plotted month.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Bill, Category, MonthlyRollup};
use crate::stats::monthly_rollup;
use crate::trend::TrendLine;

/// Which rollup field a panel plots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartField {
    Rate,
    Usage,
    Amount,
}

impl ChartField {
    pub const ALL: [ChartField; 3] = [Self::Rate, Self::Usage, Self::Amount];

    fn value(&self, month: &MonthlyRollup) -> f64 {
        match self {
            Self::Rate => month.rate_first,
            Self::Usage => month.usage_sum,
            Self::Amount => month.amount_sum,
        }
    }

    /// Axis label with the category's units
    pub fn axis_label(&self, category: Category) -> String {
        let spec = category.spec();
        match self {
            Self::Rate => format!("Rate ({})", spec.rate_unit),
            Self::Usage => format!("Usage ({})", spec.usage_unit),
            Self::Amount => "Amount ($)".to_string(),
        }
    }

    pub fn title(&self, category: Category) -> String {
        let name = match self {
            Self::Rate => "Rate",
            Self::Usage => "Usage",
            Self::Amount => "Amount",
        };
        format!("{} Bills - Monthly {}", category.label(), name)
    }
}

/// One chart panel
#[derive(Debug, Clone, Serialize)]
pub struct ChartPanel {
    pub field: ChartField,
    pub title: String,
    pub y_label: String,
    pub values: Vec<f64>,
    /// Trend predictions aligned with `values`; absent with fewer than two months
    pub trend: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend_line: Option<TrendLine>,
}

/// Data behind a category chart
#[derive(Debug, Clone, Serialize)]
pub struct ChartData {
    pub category: Category,
    pub months: Vec<NaiveDate>,
    pub panels: Vec<ChartPanel>,
}

impl ChartData {
    /// Nothing to plot
    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    pub fn panel(&self, field: ChartField) -> Option<&ChartPanel> {
        self.panels.iter().find(|p| p.field == field)
    }
}

/// Build the rollup-based chart series for a category's bills
pub fn build_chart(category: Category, bills: &[Bill]) -> ChartData {
    let rollup = monthly_rollup(bills);
    let months: Vec<NaiveDate> = rollup.iter().map(|m| m.month).collect();

    let panels = ChartField::ALL
        .iter()
        .map(|field| {
            let series: Vec<(NaiveDate, f64)> =
                rollup.iter().map(|m| (m.month, field.value(m))).collect();
            let line = TrendLine::fit_dated(&series);
            ChartPanel {
                field: *field,
                title: field.title(category),
                y_label: field.axis_label(category),
                values: series.iter().map(|(_, v)| *v).collect(),
                trend: line.map(|l| months.iter().map(|m| l.predict_date(*m)).collect()),
                trend_line: line,
            }
        })
        .collect();

    ChartData {
        category,
        months,
        panels,
    }
}
