//! Root of the `alttext-core` library.
//!
//! Rules, prompt composition, the validation pipeline and the vision model
//! client behind the alt-text relay.

// Library code reports through `tracing`, never stdout/stderr.
#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod api_clients;
pub mod classify;
pub mod config;
pub mod default_client;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod prompt;
pub mod rules;
pub mod score;
pub mod service;
pub mod terms;
pub mod validator;


pub use api_clients::{ApiError, ImageAttachment, OpenAiVisionClient, VisionModel};
pub use config::{ConfigError, ConfigLoader, ServiceConfig};
pub use error::{AltTextError, ErrorKind};
pub use pipeline::{Pipeline, PipelineOptions, ResultBundle};
pub use service::{AltTextService, GenerationRequest};
