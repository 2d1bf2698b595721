use tracing::{debug, info, warn};

use crate::models::{LedgerRow, MemberIndex, PaymentSummary, RunStatistics};
use crate::provider::PaymentProvider;

/// Whether a payment title satisfies every filter term.
///
/// Terms are case-insensitive substrings combined with AND: a payment
/// survives only if its title contains all of them. An empty term list
/// matches everything.
pub fn title_matches(title: &str, filters: &[String]) -> bool {
    let title = title.to_lowercase();

    filters
        .iter()
        .all(|term| title.contains(&term.to_lowercase()))
}

/// Derives the unpaid-item ledger from one snapshot of club payments.
///
/// For every payment surviving the title filters, fetches the detail record
/// once and turns each outstanding recipient into a [`LedgerRow`] in input
/// order. A failed detail fetch skips that single payment and the run
/// carries on; this function never fails as a whole.
pub async fn reconcile<P>(
    provider: &P,
    payments: &[PaymentSummary],
    members: &MemberIndex,
    title_filters: &[String],
) -> (Vec<LedgerRow>, RunStatistics)
where
    P: PaymentProvider + ?Sized,
{
    let mut ledger = Vec::new();
    let mut stats = RunStatistics {
        total_payments_found: payments.len(),
        title_filters: title_filters.to_vec(),
        ..RunStatistics::default()
    };

    info!("Processing {} payments", payments.len());
    if !title_filters.is_empty() {
        info!("Filtering for payments containing all of: {title_filters:?}");
    }

    for payment in payments {
        if !title_matches(&payment.title, title_filters) {
            stats.filtered_out += 1;
            continue;
        }

        // One fetch per payment, no retries. A failure here is terminal for
        // this payment only.
        let detail = match provider.payment_detail(&payment.id).await {
            Ok(detail) => detail,
            Err(error) => {
                warn!("Failed to process payment '{}': {error}", payment.title);
                continue;
            }
        };

        stats.processed += 1;
        let mut unpaid_count = 0usize;

        for recipient in &detail.recipients {
            if !recipient.status.is_outstanding() {
                continue;
            }

            unpaid_count += 1;
            ledger.push(LedgerRow {
                member_name: members.display_name(&recipient.member_id),
                member_id: recipient.member_id.clone(),
                payment_title: payment.title.clone(),
                payment_id: payment.id.clone(),
                amount_owed: recipient.amount_owed(),
                currency: recipient.currency.clone(),
                status: recipient.status.to_string(),
            });
        }

        if unpaid_count > 0 {
            stats.payments_with_unpaid += 1;
            debug!("Payment '{}' has {unpaid_count} unpaid recipients", payment.title);
        }
    }

    stats.total_unpaid_items = ledger.len();

    (ledger, stats)
}
