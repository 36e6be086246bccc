//! `alttext generate` - describe a local image through the configured model.

use std::path::PathBuf;

use alttext_core::AltTextService;
use alttext_core::ConfigLoader;
use alttext_core::GenerationRequest;
use anyhow::Context;
use clap::Parser;

/// Exit status when the service rejects or fails the request.
pub const GENERATION_FAILED_EXIT_CODE: i32 = 2;

#[derive(Debug, Parser)]
pub struct GenerateArgs {
    /// Image file to describe
    #[arg(value_name = "IMAGE")]
    pub image: PathBuf,

    /// Surrounding page text used as vocabulary reference
    #[arg(long)]
    pub context: Option<String>,

    #[arg(long)]
    pub dos: Option<String>,

    #[arg(long)]
    pub donts: Option<String>,

    #[arg(long)]
    pub rules: Option<String>,

    /// Override the MIME type guessed from the file extension
    #[arg(long, value_name = "TYPE")]
    pub mime_type: Option<String>,

    /// TOML config file. Defaults to `alttext.toml` if present.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl GenerateArgs {
    fn mime_type(&self) -> String {
        self.mime_type.clone().unwrap_or_else(|| {
            mime_guess::from_path(&self.image)
                .first_or_octet_stream()
                .essence_str()
                .to_string()
        })
    }

    pub async fn run(self) -> anyhow::Result<i32> {
        let mut loader = ConfigLoader::new();
        if let Some(path) = &self.config {
            loader = loader.with_config_path(path);
        }
        let config = loader.load().context("loading configuration")?;
        tracing::debug!(?config, "configuration loaded");

        let image = std::fs::read(&self.image)
            .with_context(|| format!("reading {}", self.image.display()))?;
        let request = GenerationRequest {
            mime_type: self.mime_type(),
            image,
            context_text: self.context,
            rules: self.rules,
            dos: self.dos,
            donts: self.donts,
        };

        match AltTextService::from_config(&config).generate(request).await {
            Ok(bundle) => {
                println!("{}", serde_json::to_string_pretty(&bundle)?);
                Ok(0)
            }
            Err(err) => {
                tracing::warn!(kind = %err.kind(), "generation failed: {err}");
                eprintln!("error: {}: {}", err.kind(), err.public_message());
                Ok(GENERATION_FAILED_EXIT_CODE)
            }
        }
    }
}
