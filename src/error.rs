use thiserror::Error;

/// Failure classes surfaced to the user. Every variant is shown verbatim
/// in the webview and leaves session state untouched; nothing here is
/// retried or fatal to the process.
#[derive(Debug, Error)]
pub enum PunchError {
    /// Connection, DNS, or timeout failure before an HTTP response.
    #[error("network request failed: {0}")]
    Transport(String),

    /// The server answered, but not with what the protocol promises:
    /// non-success HTTP status, non-200 envelope, or a malformed body.
    #[error("unexpected server response: {0}")]
    Protocol(String),

    /// The operation makes no sense in the current session state.
    #[error("invalid session state: {0}")]
    State(&'static str),
}

impl From<reqwest::Error> for PunchError {
    fn from(err: reqwest::Error) -> Self {
        PunchError::Transport(err.to_string())
    }
}
