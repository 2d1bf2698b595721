use anyhow::Result;
use std::fs;
use tempfile::TempDir;

use super::{summarize_by_member, summarize_by_payment_type, CsvReportSink};
use crate::models::LedgerRow;
use crate::types::Money;

fn row(member_id: &str, member_name: &str, payment_title: &str, pence: i64) -> LedgerRow {
    LedgerRow {
        member_name: member_name.to_string(),
        member_id: member_id.to_string(),
        payment_title: payment_title.to_string(),
        payment_id: "p1".to_string(),
        amount_owed: Money::from_minor(pence),
        currency: "GBP".to_string(),
        status: "UNANSWERED".to_string(),
    }
}

#[test]
fn test_member_summary_groups_and_sorts_descending() {
    let ledger = vec![
        row("m1", "John Smith", "Match Fee", 1000),
        row("m2", "Jane Doe", "Match Fee", 2500),
        row("m1", "John Smith", "Membership", 500),
    ];

    let summary = summarize_by_member(&ledger);

    assert_eq!(summary.len(), 2);
    assert_eq!(summary[0].member_name, "Jane Doe");
    assert_eq!(summary[0].total.to_string(), "25.00");
    assert_eq!(summary[1].member_name, "John Smith");
    assert_eq!(summary[1].total.to_string(), "15.00");
}

#[test]
fn test_member_summary_conserves_ledger_total() {
    let ledger = vec![
        row("m1", "John Smith", "A", 199),
        row("m2", "Jane Doe", "B", 301),
        row("m3", "Bob Wilson", "C", 250),
        row("m1", "John Smith", "D", 1),
    ];

    let summary = summarize_by_member(&ledger);

    let summary_total: Money = summary.iter().map(|entry| entry.total).sum();
    let ledger_total: Money = ledger.iter().map(|row| row.amount_owed).sum();

    assert_eq!(summary_total, ledger_total);
}

#[test]
fn test_member_summary_ties_keep_first_seen_order() {
    let ledger = vec![
        row("m1", "John Smith", "A", 500),
        row("m2", "Jane Doe", "A", 500),
        row("m3", "Bob Wilson", "A", 500),
    ];

    let summary = summarize_by_member(&ledger);
    let names: Vec<&str> = summary.iter().map(|entry| entry.member_name.as_str()).collect();

    assert_eq!(names, vec!["John Smith", "Jane Doe", "Bob Wilson"]);
}

#[test]
fn test_member_summary_separates_currencies() {
    let ledger = vec![
        row("m1", "John Smith", "A", 500),
        LedgerRow {
            currency: "EUR".to_string(),
            ..row("m1", "John Smith", "A", 700)
        },
    ];

    let summary = summarize_by_member(&ledger);

    assert_eq!(summary.len(), 2);
    assert_eq!(summary[0].currency, "EUR");
    assert_eq!(summary[1].currency, "GBP");
}

#[test]
fn test_payment_type_summary_counts_and_totals() {
    let ledger = vec![
        row("m1", "John Smith", "Match Fee", 1000),
        row("m2", "Jane Doe", "Match Fee", 1500),
        row("m1", "John Smith", "Membership", 9900),
    ];

    let summary = summarize_by_payment_type(&ledger);

    assert_eq!(summary.len(), 2);
    assert_eq!(summary["Match Fee"].count, 2);
    assert_eq!(summary["Match Fee"].total_amount.to_string(), "25.00");
    assert_eq!(summary["Membership"].count, 1);
    assert_eq!(summary["Membership"].total_amount.to_string(), "99.00");
}

#[test]
fn test_aggregations_are_total_on_empty_ledger() {
    assert!(summarize_by_member(&[]).is_empty());
    assert!(summarize_by_payment_type(&[]).is_empty());
}

#[test]
fn test_sink_writes_detail_and_summary_files() -> Result<()> {
    let dir = TempDir::new()?;
    let report_path = dir.path().join("report.csv");

    let ledger = vec![row("m1", "John Smith", "Match Fee", 2500)];
    let summary = summarize_by_member(&ledger);

    let sink = CsvReportSink::new(&report_path);
    let written = sink.write(&ledger, &summary)?;

    assert_eq!(written, Some(report_path.as_path()));

    let detail = fs::read_to_string(&report_path)?;
    assert!(detail.contains("member_name,member_id,payment_title"));
    assert!(detail.contains("John Smith,m1,Match Fee,p1,25.0,GBP,UNANSWERED"));

    let summary_text = fs::read_to_string(dir.path().join("report_summary.csv"))?;
    assert!(summary_text.contains("John Smith,m1,GBP,25.0"));

    Ok(())
}

#[test]
fn test_sink_returns_none_for_empty_ledger() -> Result<()> {
    let dir = TempDir::new()?;
    let report_path = dir.path().join("report.csv");

    let sink = CsvReportSink::new(&report_path);
    let written = sink.write(&[], &[])?;

    assert!(written.is_none());
    assert!(!report_path.exists());

    Ok(())
}
