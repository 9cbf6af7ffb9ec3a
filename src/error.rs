//! Error types for upstream fetches.
//!
//! Every failure an adapter can hit falls into one of these variants. They never
//! leave the adapter: the public fetch operations log them and degrade to an
//! empty result so the feed always renders.

/// A failed upstream call.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Network unreachable, DNS failure, connection reset, client timeout.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The upstream answered with a non-success status code.
    #[error("upstream responded with status {status}")]
    Upstream { status: u16 },

    /// The response body was not the JSON shape we expected.
    #[error("decode failure: {0}")]
    Decode(#[from] serde_json::Error),

    /// The upstream answered 2xx but reported an application-level error
    /// (e.g. a GraphQL `errors` array).
    #[error("upstream api error: {0}")]
    Api(String),
}

impl FetchError {
    /// Short, stable label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Transport(_) => "transport",
            FetchError::Upstream { .. } => "upstream",
            FetchError::Decode(_) => "decode",
            FetchError::Api(_) => "api",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_message_includes_status() {
        let err = FetchError::Upstream { status: 503 };
        assert_eq!(err.kind(), "upstream");
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_decode_from_serde() {
        let err: FetchError = serde_json::from_str::<Vec<u8>>("{not json")
            .unwrap_err()
            .into();
        assert_eq!(err.kind(), "decode");
    }
}
