//! The validation pipeline: validate, normalize, then classify and score.
//!
//! Which stages run is controlled by [`PipelineOptions`]. Validation always
//! runs, because the warning is part of every result.

use serde::{Deserialize, Serialize};

use crate::classify::{ImageType, Language, classify};
use crate::normalize::normalize;
use crate::rules::RuleSet;
use crate::score::score;
use crate::validator::{ValidationVerdict, validate};

/// Recognized pipeline options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineOptions {
    pub enable_classification: bool,
    pub enable_scoring: bool,
    pub auto_truncate: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            enable_classification: true,
            enable_scoring: true,
            auto_truncate: true,
        }
    }
}

/// Result returned to the caller for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultBundle {
    pub alt_text: String,
    /// Length of `alt_text` in characters.
    pub length: usize,
    pub warning: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_type: Option<ImageType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
}

/// Bundle plus the verdict it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutcome {
    pub bundle: ResultBundle,
    pub verdict: ValidationVerdict,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Pipeline {
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new(options: PipelineOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> PipelineOptions {
        self.options
    }

    /// Run every enabled stage over `raw`.
    ///
    /// The verdict and score describe `raw` as the model produced it, so an
    /// overlong reply is still reported after it has been truncated.
    /// Classification looks at the final text.
    pub fn run(&self, raw: &str, rules: &RuleSet) -> PipelineOutcome {
        let verdict = validate(raw, rules);

        let alt_text = if self.options.auto_truncate {
            normalize(raw, rules).into_string()
        } else {
            raw.to_string()
        };

        let classification = self
            .options
            .enable_classification
            .then(|| classify(&alt_text));
        let compliance = self.options.enable_scoring.then(|| score(&verdict));

        let bundle = ResultBundle {
            length: alt_text.chars().count(),
            warning: verdict.warning(),
            image_type: classification.map(|c| c.image_type),
            language: classification.map(|c| c.language),
            score: compliance,
            alt_text,
        };

        PipelineOutcome { bundle, verdict }
    }
}
