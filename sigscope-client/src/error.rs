use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, TLS or body transfer failure.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
    /// `{ "error": ... }` inside a successful response.
    #[error("{0}")]
    Backend(String),
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Backend errors are shown verbatim; everything else collapses to the
    /// caller's generic message.
    pub fn user_message(&self, generic: &str) -> String {
        match self {
            ApiError::Backend(msg) => msg.clone(),
            _ => generic.to_string(),
        }
    }

    pub fn is_backend(&self) -> bool {
        matches!(self, ApiError::Backend(_))
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
