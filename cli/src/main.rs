use alttext_cli::Cli;
use clap::Parser;

fn init_tracing() {
    // stdout carries the JSON output; logs go to stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let code = Cli::parse().run().await?;
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
