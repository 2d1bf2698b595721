use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::models::{MemberRecord, PaymentDetail, PaymentSummary};
use crate::provider::{PaymentProvider, ProviderError, ProviderResult};

const DEFAULT_BASE_URL: &str = "https://api.spond.com";

/// HTTP client for the club-management API.
///
/// Authenticates with a bearer token plus a club id header, mirroring the
/// requests the club web frontend itself issues.
pub struct ClubApiClient {
    http: reqwest::Client,
    base_url: String,
    bearer_token: String,
    club_id: String,
}

impl ClubApiClient {
    pub fn new(bearer_token: impl Into<String>, club_id: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            bearer_token: bearer_token.into(),
            club_id: club_id.into(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ProviderResult<T> {
        let url = format!("{}{}", self.base_url, path);

        debug!("GET {url}");

        let response = self
            .http
            .get(&url)
            .header("accept", "application/json")
            .header("authorization", format!("Bearer {}", self.bearer_token))
            .header("origin", "https://club.spond.com")
            .header("referer", "https://club.spond.com/")
            .header("x-spond-clubid", &self.club_id)
            .send()
            .await
            .map_err(|source| ProviderError::Connection {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
            .to_string();

        let body = response
            .text()
            .await
            .map_err(|source| ProviderError::Connection {
                url: url.clone(),
                source,
            })?;

        if !status.is_success() {
            return Err(ProviderError::Transport {
                status: status.as_u16(),
                url,
                body,
            });
        }

        if !content_type.contains("application/json") {
            return Err(ProviderError::Format { url, content_type });
        }

        serde_json::from_str(&body).map_err(|source| ProviderError::Decode { url, source })
    }
}

#[async_trait]
impl PaymentProvider for ClubApiClient {
    async fn list_members(&self) -> ProviderResult<Vec<MemberRecord>> {
        self.get_json("/club/v1/members?").await
    }

    async fn list_payments(&self) -> ProviderResult<Vec<PaymentSummary>> {
        self.get_json("/club/v1/payments/?").await
    }

    async fn payment_detail(&self, payment_id: &str) -> ProviderResult<PaymentDetail> {
        let path = format!("/club/v1/payments/{payment_id}?includeSignupRequestRecipients=false");
        self.get_json(&path).await
    }
}
