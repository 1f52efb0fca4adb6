//! Dashboard and chart commands

use std::path::Path;

use anyhow::{Context, Result};
use billbook_core::chart::{build_chart, ChartData};
use billbook_core::db::Database;
use billbook_core::models::{BillSort, Category, SortField, SortOrder, YearFilter};
use billbook_core::plot::{render_png, DEFAULT_CHART_SIZE};

use super::{find_user, fmt_num, format_bill_row};
use crate::cli::BillTarget;

pub fn cmd_dashboard(db: &Database, username: &str, year: &str, sort: &str, order: &str) -> Result<()> {
    let user = find_user(db, username)?;
    let year: YearFilter = year.parse()?;
    let sort = BillSort::new(sort.parse::<SortField>()?, order.parse::<SortOrder>()?);

    let dashboard = db.dashboard(user.id, year, sort)?;

    println!();
    match dashboard.selected_year {
        Some(y) => println!("📊 {}'s bills for {}", dashboard.user.username, y),
        None => println!("📊 {}'s bills (all time)", dashboard.user.username),
    }

    for summary in &dashboard.categories {
        let spec = summary.category.spec();
        println!();
        println!("   {} ({} bills)", spec.label, summary.bills.len());
        println!("   ─────────────────────────────────────────────────────────────");
        for bill in &summary.bills {
            println!("{}", format_bill_row(bill));
        }
        println!(
            "   Avg usage: {} {}  │  Avg rate: {} {}",
            fmt_num(summary.average_usage),
            spec.usage_unit,
            fmt_num(summary.average_rate),
            spec.rate_unit
        );
        if !summary.years.is_empty() {
            let years: Vec<String> = summary.years.iter().map(|y| y.to_string()).collect();
            println!("   Years: {}", years.join(", "));
        }
    }

    Ok(())
}

/// Chart series for a user's bills in one category and time range
pub fn chart_for(db: &Database, owner: &BillTarget, time_range: &str) -> Result<ChartData> {
    let user = find_user(db, &owner.user)?;
    let category: Category = owner.category.parse()?;
    let range: YearFilter = time_range.parse()?;

    let bills: Vec<_> = db
        .list_bills(user.id, category)?
        .into_iter()
        .filter(|b| range.matches(b.date))
        .collect();

    Ok(build_chart(category, &bills))
}

pub fn cmd_chart(
    db: &Database,
    owner: &BillTarget,
    time_range: &str,
    json: bool,
    png: Option<&Path>,
) -> Result<()> {
    let chart = chart_for(db, owner, time_range)?;

    if let Some(path) = png {
        let image = render_png(&chart, DEFAULT_CHART_SIZE)?;
        std::fs::write(path, image)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("🖼️  Chart written to {}", path.display());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&chart)?);
        return Ok(());
    }

    if chart.is_empty() {
        println!("No data available for the selected time range.");
        return Ok(());
    }

    for panel in &chart.panels {
        println!();
        println!("📈 {}", panel.title);
        println!("   Month    │ {:>12} │ {:>12}", panel.y_label, "Trend");
        println!("   ─────────────────────────────────────────");
        for (i, month) in chart.months.iter().enumerate() {
            let trend = panel
                .trend
                .as_ref()
                .map(|t| fmt_num(t[i]))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "   {}  │ {:>12} │ {:>12}",
                month.format("%Y-%m"),
                fmt_num(panel.values[i]),
                trend
            );
        }
    }

    Ok(())
}
