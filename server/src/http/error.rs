use alttext_core::AltTextError;
use alttext_core::ErrorKind;
use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use serde::Serialize;
use thiserror::Error;

/// Failures returned by the HTTP layer.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error(transparent)]
    Generation(#[from] AltTextError),

    #[error("malformed multipart body: {0}")]
    InvalidMultipart(String),

    #[error("upload exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("origin not allowed: {0}")]
    OriginNotAllowed(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    kind: &'static str,
    message: String,
}

impl HttpError {
    pub fn status(&self) -> StatusCode {
        match self {
            HttpError::Generation(err) => generation_status(err.kind()),
            HttpError::InvalidMultipart(_) => StatusCode::BAD_REQUEST,
            HttpError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            HttpError::OriginNotAllowed(_) => StatusCode::FORBIDDEN,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            HttpError::Generation(err) => err.kind().as_str(),
            HttpError::InvalidMultipart(_) => "InvalidMultipart",
            HttpError::PayloadTooLarge { .. } => "PayloadTooLarge",
            HttpError::OriginNotAllowed(_) => "OriginNotAllowed",
        }
    }

    /// Caller-safe message. Internal detail stays in the logs.
    pub fn public_message(&self) -> String {
        match self {
            HttpError::Generation(err) => err.public_message().to_string(),
            HttpError::InvalidMultipart(_) => "Malformed multipart form data".to_string(),
            HttpError::PayloadTooLarge { limit } => {
                format!("Image exceeds the {limit} byte upload limit")
            }
            HttpError::OriginNotAllowed(_) => "Origin not allowed".to_string(),
        }
    }
}

pub fn generation_status(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::MissingInput => StatusCode::BAD_REQUEST,
        ErrorKind::Misconfigured | ErrorKind::InternalFailure => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorKind::UpstreamInvalidResponse | ErrorKind::UpstreamTransportFailure => {
            StatusCode::BAD_GATEWAY
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), kind = self.kind(), "{self}");
        } else {
            tracing::warn!(status = status.as_u16(), kind = self.kind(), "{self}");
        }

        let body = ErrorBody {
            kind: self.kind(),
            message: self.public_message(),
        };
        (status, Json(serde_json::json!({ "error": body }))).into_response()
    }
}
