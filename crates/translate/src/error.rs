//! Error taxonomy for the execution path.

use serde_json::Value;
use thiserror::Error;

/// Terminal failures of a single `execute` call. Nothing here is retried.
#[derive(Debug, Error)]
pub enum ExecuteError {
    /// No configuration stored for the requested tool id.
    #[error("no API configuration for tool '{0}'")]
    ConfigNotFound(String),

    /// Payload carried none of `body`, `query`, `args`.
    #[error("payload has no usable source: expected one of 'body', 'query' or 'args'")]
    MissingPayloadSource,

    /// A string source (or its once-decoded inner string) was not valid JSON.
    #[error("payload is not valid JSON: {0}")]
    InvalidJsonPayload(String),

    /// The materialized source was neither an object nor an accepted list.
    #[error("unsupported payload type: {0}")]
    UnsupportedPayloadType(String),

    /// The stored configuration itself is unusable (bad method, bad URL).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The remote answered with a non-2xx status.
    #[error("remote returned {status}: {body}")]
    RemoteHttp { status: u16, body: Value },

    /// No response at all: connect failure, DNS failure, or timeout.
    #[error("remote unreachable: {0}")]
    RemoteUnreachable(String),
}

impl ExecuteError {
    /// HTTP status to surface to the caller.
    ///
    /// `RemoteHttp` propagates the remote status unchanged (500 if the
    /// stored code is not a valid HTTP status).
    #[must_use]
    pub fn http_status(&self) -> u16 {
        match self {
            Self::ConfigNotFound(_) => 404,
            Self::MissingPayloadSource => 422,
            Self::InvalidJsonPayload(_)
            | Self::UnsupportedPayloadType(_)
            | Self::Configuration(_) => 400,
            Self::RemoteHttp { status, .. } => {
                if (100..=599).contains(status) {
                    *status
                } else {
                    500
                }
            }
            Self::RemoteUnreachable(_) => 502,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExecuteError>;
