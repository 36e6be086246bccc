//! API clients for vision-capable model providers.
//!
//! The pipeline talks to a provider through the [`VisionModel`] trait so the
//! service can be exercised against a mock server or a stub in tests.

mod openai;

pub use openai::{OpenAiConfig, OpenAiVisionClient};

use std::fmt;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

use crate::prompt::PromptPayload;

/// Errors from API client operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No credential configured for the provider.
    #[error("Not authenticated with provider")]
    NotAuthenticated,

    /// Network request failed.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error ({status}): {message}")]
    ApiResponse {
        /// HTTP status code.
        status: u16,
        /// Error message from API.
        message: String,
        /// Error type (if provided).
        error_type: Option<String>,
    },

    /// Failed to parse API response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The response parsed but carried no usable completion.
    #[error("Response contained no completion")]
    EmptyCompletion,

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for API client operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Untrusted text returned by the model for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCompletion {
    pub text: String,
    /// Model that served the request, when reported.
    pub model: Option<String>,
    pub finish_reason: Option<String>,
}

/// An uploaded image, inlined into the request as a data URI.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    mime_type: String,
    bytes: Vec<u8>,
}

impl ImageAttachment {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// `data:{mime};base64,{bytes}`
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }
}

// Image bytes never reach logs.
impl fmt::Debug for ImageAttachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageAttachment")
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// A provider that turns a prompt plus one image into a text completion.
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Whether the provider credential is present.
    fn is_configured(&self) -> bool {
        true
    }

    async fn complete(
        &self,
        payload: &PromptPayload,
        image: &ImageAttachment,
    ) -> ApiResult<RawCompletion>;
}
