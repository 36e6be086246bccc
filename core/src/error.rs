//! Caller-facing failure taxonomy.
//!
//! Every failure that leaves the service is one of these kinds. Details that
//! should not reach a client (provider messages, transport errors) stay in
//! the `Display` output, which is logged, and are replaced by
//! [`AltTextError::public_message`] on the wire.

use serde::Serialize;
use thiserror::Error;

use crate::api_clients::ApiError;

pub type Result<T> = std::result::Result<T, AltTextError>;

/// Serializable discriminant of [`AltTextError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    MissingInput,
    Misconfigured,
    UpstreamInvalidResponse,
    UpstreamTransportFailure,
    InternalFailure,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::MissingInput => "MissingInput",
            ErrorKind::Misconfigured => "Misconfigured",
            ErrorKind::UpstreamInvalidResponse => "UpstreamInvalidResponse",
            ErrorKind::UpstreamTransportFailure => "UpstreamTransportFailure",
            ErrorKind::InternalFailure => "InternalFailure",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum AltTextError {
    /// No image was supplied.
    #[error("Image file is required")]
    MissingInput,

    /// The model credential is absent or the client is unusable.
    #[error("misconfigured: {0}")]
    Misconfigured(String),

    /// The model answered but without a usable completion.
    #[error("invalid upstream response: {0}")]
    UpstreamInvalidResponse(String),

    /// The model could not be reached.
    #[error("upstream transport failure: {0}")]
    UpstreamTransportFailure(String),

    #[error("internal failure: {0}")]
    InternalFailure(String),
}

impl AltTextError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AltTextError::MissingInput => ErrorKind::MissingInput,
            AltTextError::Misconfigured(_) => ErrorKind::Misconfigured,
            AltTextError::UpstreamInvalidResponse(_) => ErrorKind::UpstreamInvalidResponse,
            AltTextError::UpstreamTransportFailure(_) => ErrorKind::UpstreamTransportFailure,
            AltTextError::InternalFailure(_) => ErrorKind::InternalFailure,
        }
    }

    /// Message that is safe to return to a caller.
    pub fn public_message(&self) -> &'static str {
        match self.kind() {
            ErrorKind::MissingInput => "Image file is required",
            ErrorKind::Misconfigured => "Model provider credential not configured",
            ErrorKind::UpstreamInvalidResponse => "Invalid response from model provider",
            ErrorKind::UpstreamTransportFailure => "Model provider unreachable",
            ErrorKind::InternalFailure => "Server error",
        }
    }
}

impl From<ApiError> for AltTextError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::NotAuthenticated => {
                AltTextError::Misconfigured("model credential not configured".to_string())
            }
            ApiError::InvalidConfig(msg) => AltTextError::Misconfigured(msg),
            ApiError::Network(e) => AltTextError::UpstreamTransportFailure(e.to_string()),
            err @ (ApiError::ApiResponse { .. }
            | ApiError::Parse(_)
            | ApiError::EmptyCompletion) => AltTextError::UpstreamInvalidResponse(err.to_string()),
        }
    }
}
