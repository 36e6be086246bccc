//! `alttext prompt` - print the prompt that would be sent to the model.

use alttext_core::prompt::PromptPayload;
use alttext_core::prompt::compose;
use alttext_core::rules;
use clap::Parser;

#[derive(Debug, Parser)]
pub struct PromptArgs {
    /// Surrounding page text used as vocabulary reference
    #[arg(long, default_value = "")]
    pub context: String,

    /// Things the description should do
    #[arg(long, default_value = "")]
    pub dos: String,

    /// Things the description must not do
    #[arg(long, default_value = "")]
    pub donts: String,

    /// Free-form rules appended after the dos and don'ts
    #[arg(long, default_value = "")]
    pub rules: String,

    /// Print the payload as JSON instead of plain text
    #[arg(long)]
    pub json: bool,
}

impl PromptArgs {
    pub fn payload(&self) -> PromptPayload {
        let rule_set = rules::build(&self.dos, &self.donts, &self.rules);
        compose(&rule_set, &self.context)
    }

    pub fn run(self) -> anyhow::Result<i32> {
        let payload = self.payload();
        if self.json {
            println!("{}", serde_json::to_string_pretty(&payload)?);
        } else {
            println!("=== system ===\n{}", payload.system_instruction);
            println!("=== user ===\n{}\n[image]", payload.user_text());
        }
        Ok(0)
    }
}
