use thiserror::Error;

/// Failures at the upstream API boundary.
///
/// `Format` and `Decode` are kept distinct from `Transport` so that upstream
/// API drift (an HTML login page, a changed payload shape) is diagnosable
/// from the error kind alone.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP {status} from {url}: {body}")]
    Transport {
        status: u16,
        url: String,
        body: String,
    },
    #[error("request to {url} failed: {source}")]
    Connection {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("expected JSON from {url} but got content-type '{content_type}'")]
    Format { url: String, content_type: String },
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}
