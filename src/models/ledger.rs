use serde::Serialize;

use crate::types::{MemberId, Money, PaymentId};

/// One unpaid recipient resolved to a member name and an owed amount.
///
/// Rows are produced in payment order, recipient order within a payment, and
/// are never mutated after creation.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerRow {
    pub member_name: String,
    pub member_id: MemberId,
    pub payment_title: String,
    pub payment_id: PaymentId,
    pub amount_owed: Money,
    pub currency: String,
    pub status: String,
}

/// Counters describing a single reconciliation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunStatistics {
    pub total_payments_found: usize,
    pub filtered_out: usize,
    pub processed: usize,
    pub payments_with_unpaid: usize,
    pub total_unpaid_items: usize,
    pub title_filters: Vec<String>,
}
