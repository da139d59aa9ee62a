use thiserror::Error;

/// Errors returned by the CheapShark client and everything built on it.
///
/// There is no not-found variant: lookups report it as
/// [`crate::Lookup::NotFound`].
#[derive(Debug, Error)]
pub enum CheapSharkError {
    /// Network, TLS, or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A non-2xx status other than 404.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The payload parsed as JSON but not into the structure we rely on.
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

    /// A store directory refresh this call queued behind has just failed and
    /// there is no earlier snapshot to fall back on.
    #[error("store directory unavailable: {reason}")]
    StoreDirectoryUnavailable {
        reason: String,
        upstream_status: Option<u16>,
        transport: bool,
    },
}

impl CheapSharkError {
    /// HTTP status reported by the upstream, when the failure carried one.
    #[must_use]
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            Self::UnexpectedStatus { status, .. } => Some(*status),
            Self::StoreDirectoryUnavailable {
                upstream_status, ..
            } => *upstream_status,
            Self::UpstreamShape { .. } | Self::Deserialize { .. } | Self::InvalidBaseUrl { .. } => {
                None
            }
        }
    }

    /// `true` for network/timeout/status failures, `false` for payload problems.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        match self {
            Self::Http(_) | Self::UnexpectedStatus { .. } => true,
            Self::StoreDirectoryUnavailable { transport, .. } => *transport,
            Self::UpstreamShape { .. } | Self::Deserialize { .. } | Self::InvalidBaseUrl { .. } => {
                false
            }
        }
    }
}
