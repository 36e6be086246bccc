//! Subcommands of the `alttext` binary.

pub mod check_cmd;
pub mod generate_cmd;
pub mod prompt_cmd;

use clap::Parser;
use clap::Subcommand;

/// Alt-text rule checker and generator
#[derive(Debug, Parser)]
#[command(name = "alttext", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate existing alt text and print a JSON report
    Check(check_cmd::CheckArgs),

    /// Print the prompt that would be sent to the model
    Prompt(prompt_cmd::PromptArgs),

    /// Describe an image file with the configured model
    Generate(generate_cmd::GenerateArgs),
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<i32> {
        match self.command {
            Command::Check(args) => args.run(),
            Command::Prompt(args) => args.run(),
            Command::Generate(args) => args.run().await,
        }
    }
}
