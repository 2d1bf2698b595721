use serde::Deserialize;

use crate::models::RecipientStatus;
use crate::types::{MemberId, Money, PaymentId};

fn default_title() -> String {
    "Unnamed Payment".to_string()
}

fn default_currency() -> String {
    "GBP".to_string()
}

fn default_status() -> RecipientStatus {
    RecipientStatus::Other
}

/// One entry from the club payments listing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentSummary {
    pub id: PaymentId,
    #[serde(default = "default_title")]
    pub title: String,
}

/// The detailed view of a single payment, fetched lazily per payment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentDetail {
    #[serde(default)]
    pub recipients: Vec<Recipient>,
}

/// A member's obligation against one payment.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    #[serde(default)]
    pub member_id: MemberId,
    #[serde(default = "default_status")]
    pub status: RecipientStatus,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub claims: Vec<Claim>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Claim {
    #[serde(default)]
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Product {
    /// Price in minor units (pence).
    #[serde(default)]
    pub price: i64,
}

impl Recipient {
    /// The amount this recipient owes: the first claim's first product's
    /// price. Upstream nests a single claim/product pair for club payments;
    /// anything missing along that path means nothing is owed.
    pub fn amount_owed(&self) -> Money {
        let minor = self
            .claims
            .first()
            .and_then(|claim| claim.products.first())
            .map(|product| product.price)
            .unwrap_or(0);

        Money::from_minor(minor)
    }
}
