use thiserror::Error;

/// Errors returned by the Steam storefront client.
#[derive(Debug, Error)]
pub enum SteamError {
    /// Network, TLS, or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The payload parsed as JSON but lacks a structure we rely on.
    #[error("unexpected response shape for {context}: {reason}")]
    UpstreamShape { context: String, reason: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl SteamError {
    #[must_use]
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            Self::UnexpectedStatus { status, .. } => Some(*status),
            Self::UpstreamShape { .. } | Self::Deserialize { .. } | Self::InvalidBaseUrl { .. } => {
                None
            }
        }
    }

    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::UnexpectedStatus { .. })
    }
}
