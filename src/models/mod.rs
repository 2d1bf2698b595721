mod ledger;
mod member;
mod payment;

use serde::Deserialize;
use std::fmt;
use std::fmt::{Display, Formatter};

pub use ledger::{LedgerRow, RunStatistics};
pub use member::{MemberIndex, MemberRecord};
pub use payment::{Claim, PaymentDetail, PaymentSummary, Product, Recipient};

/// Response status of a payment recipient as reported upstream.
///
/// The upstream convention is inverted from what the names suggest:
/// `ANSWERED` means the recipient has paid, and `UNANSWERED` means the
/// payment is still outstanding. This is an external-contract quirk, so the
/// polarity lives in [`RecipientStatus::is_outstanding`] and nowhere else.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecipientStatus {
    Unanswered,
    Answered,
    #[serde(other)]
    Other,
}

impl RecipientStatus {
    /// Whether this recipient still owes money. Only `UNANSWERED` does;
    /// every other status is treated as settled.
    pub fn is_outstanding(&self) -> bool {
        matches!(self, RecipientStatus::Unanswered)
    }
}

impl Display for RecipientStatus {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let text = match self {
            RecipientStatus::Unanswered => "UNANSWERED",
            RecipientStatus::Answered => "ANSWERED",
            RecipientStatus::Other => "OTHER",
        };
        write!(formatter, "{text}")
    }
}
