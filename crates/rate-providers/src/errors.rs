use thiserror::Error;

/// Errors a single provider call can produce.
///
/// The chain treats every variant the same way (skip to the next
/// provider); the distinction exists for logging and tests.
#[derive(Error, Debug)]
pub enum RateProviderError {
    /// Non-2xx HTTP status from the provider.
    #[error("{provider} returned status {status}")]
    Status {
        provider: &'static str,
        status: u16,
    },

    /// Transport-level failure (DNS, TLS, connection reset).
    #[error("{provider} request failed: {message}")]
    Request {
        provider: &'static str,
        message: String,
    },

    /// The request exceeded the per-call deadline.
    #[error("{provider} timed out")]
    Timeout { provider: &'static str },

    /// The body was not the JSON shape the provider documents.
    #[error("{provider} returned a malformed response: {message}")]
    MalformedResponse {
        provider: &'static str,
        message: String,
    },

    /// A well-formed response that simply lacks the requested pair.
    #[error("{provider} has no rate for {base}/{quote}")]
    MissingRate {
        provider: &'static str,
        base: String,
        quote: String,
    },
}

impl RateProviderError {
    pub(crate) fn from_reqwest(provider: &'static str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout { provider }
        } else if err.is_decode() {
            Self::MalformedResponse {
                provider,
                message: err.to_string(),
            }
        } else {
            Self::Request {
                provider,
                message: err.to_string(),
            }
        }
    }
}
