use reqwest::StatusCode;

/// Failure of a catalog operation.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Every attempt allowed by the retry policy hit a transient failure.
    #[error("catalog request failed after {attempts} attempts: {last}")]
    RetryExhausted { attempts: u32, last: String },

    /// Upstream answered with a non-transient error status. Never retried.
    #[error("catalog returned HTTP {status}: {message}")]
    Status { status: StatusCode, message: String },

    /// Upstream answered 2xx with a body we could not map.
    #[error("failed to decode catalog response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to build catalog HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}

impl CatalogError {
    /// True when the catalog reported the requested id does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::Status { status, .. } if *status == StatusCode::NOT_FOUND)
    }
}
