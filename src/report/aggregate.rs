use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::models::LedgerRow;
use crate::types::{MemberId, Money};

/// Total owed by one member in one currency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberSummary {
    pub member_name: String,
    pub member_id: MemberId,
    pub currency: String,
    pub total: Money,
}

/// Count and total across all ledger rows sharing a payment title.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PaymentTypeSummary {
    pub count: usize,
    pub total_amount: Money,
}

/// Groups the ledger by (member name, member id, currency) and sums amounts.
///
/// The result is sorted descending by total; groups with equal totals keep
/// their first-seen order.
pub fn summarize_by_member(ledger: &[LedgerRow]) -> Vec<MemberSummary> {
    let mut groups: Vec<MemberSummary> = Vec::new();
    let mut positions: HashMap<(MemberId, String), usize> = HashMap::new();

    for row in ledger {
        let key = (row.member_id.clone(), row.currency.clone());

        match positions.get(&key) {
            Some(&position) => groups[position].total += row.amount_owed,
            None => {
                positions.insert(key, groups.len());
                groups.push(MemberSummary {
                    member_name: row.member_name.clone(),
                    member_id: row.member_id.clone(),
                    currency: row.currency.clone(),
                    total: row.amount_owed,
                });
            }
        }
    }

    // sort_by is stable, so equal totals keep first-seen order.
    groups.sort_by(|a, b| b.total.cmp(&a.total));
    groups
}

/// Groups the ledger by payment title with a per-title count and total.
pub fn summarize_by_payment_type(ledger: &[LedgerRow]) -> BTreeMap<String, PaymentTypeSummary> {
    let mut groups: BTreeMap<String, PaymentTypeSummary> = BTreeMap::new();

    for row in ledger {
        let summary = groups.entry(row.payment_title.clone()).or_default();
        summary.count += 1;
        summary.total_amount += row.amount_owed;
    }

    groups
}
