//! Bill command implementations

use anyhow::{Context, Result};
use billbook_core::db::Database;
use billbook_core::filter::{BillFilter, FilterParams};
use billbook_core::models::{Bill, BillInput, Category};

use super::{find_user, fmt_num};
use crate::cli::{BillFields, BillTarget, FilterArgs};

fn parse_category(value: &str) -> Result<Category> {
    Ok(value.parse::<Category>()?)
}

fn input(fields: &BillFields) -> BillInput {
    BillInput::new(&fields.usage, &fields.rate, &fields.month)
}

impl From<&FilterArgs> for FilterParams {
    fn from(args: &FilterArgs) -> Self {
        FilterParams {
            usage_min: args.usage_min.clone(),
            usage_max: args.usage_max.clone(),
            rate_min: args.rate_min.clone(),
            rate_max: args.rate_max.clone(),
            amount_min: args.amount_min.clone(),
            amount_max: args.amount_max.clone(),
            start_date: args.start_date.clone(),
            end_date: args.end_date.clone(),
        }
    }
}

/// One table row for a bill
pub fn format_bill_row(bill: &Bill) -> String {
    let spec = bill.category.spec();
    format!(
        "   #{:<5} │ {} │ {:>10} {:<3} │ {:>8} {:<1} │ ${:>9.2}",
        bill.id,
        bill.date.format("%Y-%m"),
        fmt_num(bill.usage),
        spec.usage_unit,
        fmt_num(bill.rate),
        spec.rate_unit,
        bill.amount
    )
}

pub fn cmd_add(db: &Database, owner: &BillTarget, fields: &BillFields) -> Result<()> {
    let user = find_user(db, &owner.user)?;
    let category = parse_category(&owner.category)?;

    let bill = db
        .add_bill(user.id, category, &input(fields))
        .context("Failed to add bill")?;

    println!(
        "✅ Added {} bill #{} for {}: ${:.2}",
        category.label(),
        bill.id,
        bill.date.format("%Y-%m"),
        bill.amount
    );
    Ok(())
}

pub fn cmd_edit(db: &Database, owner: &BillTarget, id: i64, fields: &BillFields) -> Result<()> {
    let user = find_user(db, &owner.user)?;
    let category = parse_category(&owner.category)?;

    let bill = db
        .edit_bill(user.id, category, id, &input(fields))
        .context("Failed to edit bill")?;

    println!(
        "✅ Updated {} bill #{}: ${:.2}",
        category.label(),
        bill.id,
        bill.amount
    );
    Ok(())
}

pub fn cmd_delete(db: &Database, owner: &BillTarget, id: i64) -> Result<()> {
    let user = find_user(db, &owner.user)?;
    let category = parse_category(&owner.category)?;

    db.delete_user_bill(user.id, category, id)
        .context("Failed to delete bill")?;

    println!("🗑️  Deleted {} bill #{}", category.label(), id);
    Ok(())
}

pub fn cmd_list(db: &Database, owner: &BillTarget, filter: &FilterArgs) -> Result<()> {
    let user = find_user(db, &owner.user)?;
    let category = parse_category(&owner.category)?;
    let filter = BillFilter::from_params(&FilterParams::from(filter))?;

    let result = db.filter_bills(user.id, category, &filter)?;

    if result.bills.is_empty() {
        println!("No {} bills found.", category);
        if filter.is_empty() {
            println!("  billbook add -u {} -c {} --usage ... --rate ... --month YYYY-MM", user.username, category);
        }
        return Ok(());
    }

    let spec = category.spec();
    println!();
    println!("📝 {} Bills", spec.label);
    println!("   ─────────────────────────────────────────────────────────────");
    for bill in &result.bills {
        println!("{}", format_bill_row(bill));
    }
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   Category average usage: {} {}   rate: {} {}",
        fmt_num(result.average_usage),
        spec.usage_unit,
        fmt_num(result.average_rate),
        spec.rate_unit
    );

    Ok(())
}
