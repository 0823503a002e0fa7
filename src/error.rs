use thiserror::Error;

/// Failures produced by a single exchange with the remote API.
///
/// Every variant is terminal for the call that produced it; the shell
/// renders the message and waits for the next user action. String
/// payloads keep the type `Clone + PartialEq` so results can cross the
/// worker-thread boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExchangeError {
    #[error("{0} is not set")]
    MissingCredential(String),

    #[error("failed to serialize request body: {0}")]
    RequestConstruction(String),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("unexpected reply from API: {0}")]
    Malformed(String),

    #[error("API error: {0}")]
    Remote(String),
}

impl From<reqwest::Error> for ExchangeError {
    fn from(err: reqwest::Error) -> Self {
        ExchangeError::Transport(err.to_string())
    }
}
