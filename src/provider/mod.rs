mod club_api;
mod errors;

use async_trait::async_trait;

use crate::models::{MemberRecord, PaymentDetail, PaymentSummary};

pub use club_api::ClubApiClient;
pub use errors::ProviderError;

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Read-only access to the upstream club-management API.
///
/// The reconciliation engine and the query adapter depend on this seam only,
/// so they stay testable against stub providers with no network involved.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Fetches all club member records.
    async fn list_members(&self) -> ProviderResult<Vec<MemberRecord>>;

    /// Fetches all payment summaries for the club.
    async fn list_payments(&self) -> ProviderResult<Vec<PaymentSummary>>;

    /// Fetches the detailed view (recipients) of a single payment.
    async fn payment_detail(&self, payment_id: &str) -> ProviderResult<PaymentDetail>;
}
