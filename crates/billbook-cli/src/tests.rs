//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use billbook_core::db::Database;
use billbook_core::models::Category;
use chrono::Datelike;

use crate::cli::{BillFields, BillTarget, FilterArgs};
use crate::commands::{self, fmt_num};

fn setup_test_db() -> Database {
    let db = Database::in_memory().unwrap();
    db.register_user("alice", "password123").unwrap();
    db
}

fn target(category: &str) -> BillTarget {
    BillTarget {
        user: "alice".to_string(),
        category: category.to_string(),
    }
}

fn fields(usage: &str, rate: &str, month: &str) -> BillFields {
    BillFields {
        usage: usage.to_string(),
        rate: rate.to_string(),
        month: month.to_string(),
    }
}

fn alice_id(db: &Database) -> i64 {
    db.get_user_by_username("alice").unwrap().unwrap().id
}

// ========== Core Command Tests ==========

#[test]
fn test_open_db_and_init() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("billbook.db");

    commands::cmd_init(&path, true).unwrap();
    assert!(path.exists());

    let db = commands::open_db(&path, true).unwrap();
    assert!(!db.is_encrypted());
    assert!(db.get_user_by_username("nobody").unwrap().is_none());
}

#[test]
fn test_find_user() {
    let db = setup_test_db();
    assert_eq!(commands::find_user(&db, " alice ").unwrap().username, "alice");
    let err = commands::find_user(&db, "bob").unwrap_err();
    assert!(err.to_string().contains("bob"));
}

#[test]
fn test_cmd_signup() {
    let db = Database::in_memory().unwrap();
    commands::cmd_signup(&db, "carol", "password123").unwrap();
    assert!(db.authenticate("carol", "password123").is_ok());

    assert!(commands::cmd_signup(&db, "carol", "password123").is_err());
    assert!(commands::cmd_signup(&db, "dave", "short").is_err());
}

// ========== Bill Command Tests ==========

#[test]
fn test_cmd_add_and_list() {
    let db = setup_test_db();
    commands::cmd_add(&db, &target("water"), &fields("10", "200", "2024-01")).unwrap();
    commands::cmd_add(&db, &target("Water"), &fields("5", "200", "2024-02")).unwrap();

    let bills = db.list_bills(alice_id(&db), Category::Water).unwrap();
    assert_eq!(bills.len(), 2);
    assert_eq!(bills[0].amount, 20.0);

    assert!(commands::cmd_list(&db, &target("water"), &FilterArgs::default()).is_ok());
}

#[test]
fn test_cmd_add_rejects_bad_input() {
    let db = setup_test_db();
    assert!(commands::cmd_add(&db, &target("water"), &fields("ten", "200", "2024-01")).is_err());
    assert!(commands::cmd_add(&db, &target("steam"), &fields("10", "200", "2024-01")).is_err());

    let next_year = chrono::Local::now().year() + 1;
    let month = format!("{}-01", next_year);
    assert!(commands::cmd_add(&db, &target("gas"), &fields("1", "1", &month)).is_err());

    let unknown = BillTarget {
        user: "mallory".to_string(),
        category: "gas".to_string(),
    };
    assert!(commands::cmd_add(&db, &unknown, &fields("1", "1", "2024-01")).is_err());

    for category in Category::ALL {
        assert!(db.list_bills(alice_id(&db), category).unwrap().is_empty());
    }
}

#[test]
fn test_cmd_edit_and_delete() {
    let db = setup_test_db();
    commands::cmd_add(&db, &target("gas"), &fields("3", "4.5", "2024-03")).unwrap();
    let id = db.list_bills(alice_id(&db), Category::Gas).unwrap()[0].id;

    commands::cmd_edit(&db, &target("gas"), id, &fields("4", "4.5", "2024-03")).unwrap();
    assert_eq!(db.get_bill(Category::Gas, id).unwrap().amount, 18.0);

    // Wrong category does not find the bill
    assert!(commands::cmd_delete(&db, &target("water"), id).is_err());

    commands::cmd_delete(&db, &target("gas"), id).unwrap();
    assert!(db.list_bills(alice_id(&db), Category::Gas).unwrap().is_empty());
    assert!(commands::cmd_delete(&db, &target("gas"), id).is_err());
}

#[test]
fn test_cmd_list_with_filters() {
    let db = setup_test_db();
    for usage in ["5", "15", "10"] {
        commands::cmd_add(&db, &target("water"), &fields(usage, "200", "2024-01")).unwrap();
    }

    let filter = FilterArgs {
        usage_min: Some("10".to_string()),
        ..Default::default()
    };
    assert!(commands::cmd_list(&db, &target("water"), &filter).is_ok());

    let bad = FilterArgs {
        start_date: Some("2024/13/40".to_string()),
        ..Default::default()
    };
    let err = commands::cmd_list(&db, &target("water"), &bad).unwrap_err();
    assert!(err.to_string().contains("start_date"));
}

// ========== Report Command Tests ==========

#[test]
fn test_cmd_dashboard() {
    let db = setup_test_db();
    commands::cmd_add(&db, &target("electricity"), &fields("100", "12", "2024-01")).unwrap();

    assert!(commands::cmd_dashboard(&db, "alice", "all_time", "date", "asc").is_ok());
    assert!(commands::cmd_dashboard(&db, "alice", "2024", "amount", "desc").is_ok());
    assert!(commands::cmd_dashboard(&db, "alice", "last-year", "date", "asc").is_err());
    assert!(commands::cmd_dashboard(&db, "alice", "all_time", "colour", "asc").is_err());
    assert!(commands::cmd_dashboard(&db, "alice", "all_time", "date", "sideways").is_err());
}

#[test]
fn test_chart_for() {
    let db = setup_test_db();
    commands::cmd_add(&db, &target("water"), &fields("10", "200", "2023-12")).unwrap();
    commands::cmd_add(&db, &target("water"), &fields("10", "200", "2024-01")).unwrap();
    commands::cmd_add(&db, &target("water"), &fields("5", "200", "2024-01")).unwrap();

    let chart = commands::chart_for(&db, &target("water"), "all_time").unwrap();
    assert_eq!(chart.months.len(), 2);

    let chart = commands::chart_for(&db, &target("water"), "2024").unwrap();
    assert_eq!(chart.months.len(), 1);
    assert!(chart.panels.iter().all(|p| p.trend.is_none()));

    assert!(commands::cmd_chart(&db, &target("water"), "all_time", false, None).is_ok());
    assert!(commands::cmd_chart(&db, &target("water"), "all_time", true, None).is_ok());
    assert!(commands::cmd_chart(&db, &target("water"), "1999", false, None).is_ok());
}

#[test]
fn test_cmd_chart_writes_png() {
    let db = setup_test_db();
    commands::cmd_add(&db, &target("gas"), &fields("3", "4.5", "2024-03")).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gas.png");
    commands::cmd_chart(&db, &target("gas"), "all_time", false, Some(path.as_path())).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(&[137, 80, 78, 71, 13, 10, 26, 10]));

    // Empty range still produces an image
    let empty = dir.path().join("empty.png");
    commands::cmd_chart(&db, &target("gas"), "1999", false, Some(empty.as_path())).unwrap();
    assert!(empty.exists());
}

#[test]
fn test_cmd_export_to_file() {
    let db = setup_test_db();
    commands::cmd_add(&db, &target("gas"), &fields("3", "4.5", "2024-03")).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bills.csv");
    commands::cmd_export(&db, "alice", "csv", Some(path.as_path())).unwrap();

    let csv = std::fs::read_to_string(&path).unwrap();
    assert_eq!(csv, "Type,Usage,Rate,Date,Amount\nGas,3.0,4.5,2024-03-01,13.5\n");

    assert!(commands::cmd_export(&db, "alice", "xml", None).is_err());
}

#[test]
fn test_fmt_num() {
    assert_eq!(fmt_num(12.0), "12");
    assert_eq!(fmt_num(12.5), "12.5");
    assert_eq!(fmt_num(0.126), "0.13");
    assert_eq!(fmt_num(200.0), "200");
}
