mod aggregate;
mod sink;
#[cfg(test)]
mod tests;

pub use aggregate::{summarize_by_member, summarize_by_payment_type, MemberSummary, PaymentTypeSummary};
pub use sink::CsvReportSink;

use crate::models::{LedgerRow, RunStatistics};

/// Prints the human-readable run summary to stdout: the run counters and the
/// top owing members.
pub fn print_summary(ledger: &[LedgerRow], stats: &RunStatistics) {
    println!("\n--- Payment Report Summary ---");
    println!("Found {} total payments", stats.total_payments_found);
    if !stats.title_filters.is_empty() {
        println!(
            "Filtered out {} payments not containing all of: {:?}",
            stats.filtered_out, stats.title_filters
        );
    }
    println!("Processed {} payments", stats.processed);
    println!("{} payments have unpaid recipients", stats.payments_with_unpaid);
    println!("Total unpaid items found: {}", stats.total_unpaid_items);

    if ledger.is_empty() {
        println!("No outstanding payments found.");
        return;
    }

    println!("\nTop owing members:");
    for summary in summarize_by_member(ledger).iter().take(10) {
        println!(
            "  {} ({}): {} {}",
            summary.member_name, summary.member_id, summary.total, summary.currency
        );
    }
}
