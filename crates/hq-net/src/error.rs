//! Network errors

/// Errors raised while fetching a document
#[derive(Debug, thiserror::Error)]
pub enum NetError {
    /// The cancellation token fired before the document arrived
    #[error("request cancelled")]
    Cancelled,

    #[error("request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid proxy '{url}': {source}")]
    InvalidProxy {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error(transparent)]
    Parse(#[from] hq_html::ParseError),
}

impl From<reqwest::Error> for NetError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            NetError::Timeout(err)
        } else {
            NetError::Transport(err)
        }
    }
}
