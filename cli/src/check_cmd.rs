//! `alttext check` - run the validation pipeline over existing alt text.
//!
//! Reads the text from a file or stdin and prints a JSON report with the
//! result bundle and the individual violations.

use std::io::Read;
use std::path::PathBuf;

use alttext_core::Pipeline;
use alttext_core::PipelineOptions;
use alttext_core::ResultBundle;
use alttext_core::rules;
use alttext_core::terms::RULE_TABLE_VERSION;
use alttext_core::validator::Violation;
use anyhow::Context;
use clap::Parser;
use serde::Serialize;

#[derive(Debug, Parser)]
pub struct CheckArgs {
    /// File containing the alt text. Reads stdin when omitted or `-`.
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Report overlong text without truncating it
    #[arg(long)]
    pub no_truncate: bool,

    /// Skip content classification
    #[arg(long)]
    pub no_classify: bool,

    /// Skip the compliance score
    #[arg(long)]
    pub no_score: bool,

    /// Exit with status 1 when any rule is violated
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckReport {
    pub rule_table_version: &'static str,
    pub bundle: ResultBundle,
    pub violations: Vec<Violation>,
}

impl CheckArgs {
    pub fn options(&self) -> PipelineOptions {
        PipelineOptions {
            enable_classification: !self.no_classify,
            enable_scoring: !self.no_score,
            auto_truncate: !self.no_truncate,
        }
    }

    fn read_input(&self) -> anyhow::Result<String> {
        match &self.file {
            Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display())),
            _ => {
                let mut text = String::new();
                std::io::stdin()
                    .read_to_string(&mut text)
                    .context("reading stdin")?;
                Ok(text)
            }
        }
    }

    pub fn run(self) -> anyhow::Result<i32> {
        let input = self.read_input()?;
        let report = check_text(input.trim(), self.options());
        tracing::debug!(
            violations = report.violations.len(),
            strict = self.strict,
            "check finished"
        );
        println!("{}", serde_json::to_string_pretty(&report)?);

        if self.strict && !report.violations.is_empty() {
            return Ok(1);
        }
        Ok(0)
    }
}

pub fn check_text(text: &str, options: PipelineOptions) -> CheckReport {
    let outcome = Pipeline::new(options).run(text, &rules::build("", "", ""));
    CheckReport {
        rule_table_version: RULE_TABLE_VERSION,
        bundle: outcome.bundle,
        violations: outcome.verdict.violations().to_vec(),
    }
}
