//! One generation request end to end: input checks, rules, prompt, model
//! call, pipeline.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;

use crate::api_clients::{ImageAttachment, OpenAiConfig, OpenAiVisionClient, VisionModel};
use crate::config::ServiceConfig;
use crate::error::{AltTextError, Result};
use crate::pipeline::{Pipeline, ResultBundle};
use crate::prompt::compose;
use crate::rules;

/// Input for one generation. Text fields are optional and may be blank.
#[derive(Clone, Default)]
pub struct GenerationRequest {
    pub image: Vec<u8>,
    pub mime_type: String,
    pub context_text: Option<String>,
    pub rules: Option<String>,
    pub dos: Option<String>,
    pub donts: Option<String>,
}

impl GenerationRequest {
    pub fn new(image: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            image,
            mime_type: mime_type.into(),
            ..Default::default()
        }
    }
}

impl std::fmt::Debug for GenerationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationRequest")
            .field("image_bytes", &self.image.len())
            .field("mime_type", &self.mime_type)
            .field("context_text", &self.context_text)
            .field("rules", &self.rules)
            .field("dos", &self.dos)
            .field("donts", &self.donts)
            .finish()
    }
}

#[derive(Clone)]
pub struct AltTextService {
    model: Arc<dyn VisionModel>,
    pipeline: Pipeline,
}

impl AltTextService {
    pub fn new(model: Arc<dyn VisionModel>, pipeline: Pipeline) -> Self {
        Self { model, pipeline }
    }

    /// Service backed by the OpenAI client described by `config`.
    pub fn from_config(config: &ServiceConfig) -> Self {
        let client = OpenAiVisionClient::new(OpenAiConfig::from(config), config.request_timeout);
        Self::new(Arc::new(client), Pipeline::new(config.pipeline))
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Run one request. A panic anywhere below this call is caught and
    /// reported as [`AltTextError::InternalFailure`].
    pub async fn generate(&self, request: GenerationRequest) -> Result<ResultBundle> {
        match AssertUnwindSafe(self.generate_inner(request))
            .catch_unwind()
            .await
        {
            Ok(result) => result,
            Err(payload) => {
                let detail = panic_message(payload.as_ref());
                tracing::error!("alt text generation panicked: {detail}");
                Err(AltTextError::InternalFailure(detail))
            }
        }
    }

    async fn generate_inner(&self, request: GenerationRequest) -> Result<ResultBundle> {
        tracing::info!(
            mime_type = %request.mime_type,
            image_bytes = request.image.len(),
            has_context = has_text(&request.context_text),
            has_rules = has_text(&request.rules)
                || has_text(&request.dos)
                || has_text(&request.donts),
            "alt text requested"
        );

        if request.image.is_empty() {
            tracing::warn!("rejecting request without image");
            return Err(AltTextError::MissingInput);
        }
        if !self.model.is_configured() {
            tracing::error!("model credential not configured");
            return Err(AltTextError::Misconfigured(
                "model credential not configured".to_string(),
            ));
        }

        let rule_set = rules::build(
            request.dos.as_deref().unwrap_or_default(),
            request.donts.as_deref().unwrap_or_default(),
            request.rules.as_deref().unwrap_or_default(),
        );
        let payload = compose(&rule_set, request.context_text.as_deref().unwrap_or_default());
        let image = ImageAttachment::new(request.mime_type, request.image);

        let completion = self.model.complete(&payload, &image).await.map_err(|e| {
            let err = AltTextError::from(e);
            tracing::warn!(kind = %err.kind(), "model call failed: {err}");
            err
        })?;

        let outcome = self.pipeline.run(&completion.text, &rule_set);
        tracing::debug!(
            violations = ?outcome.verdict.kinds(),
            score = ?outcome.bundle.score,
            length = outcome.bundle.length,
            "pipeline finished"
        );
        Ok(outcome.bundle)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}

fn has_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.trim().is_empty())
}
