mod cli;
mod commands;
mod error;

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use trucktok_core::AppConfig;

use crate::cli::Cli;
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    // stdout carries JSON only; logs go to stderr and stay quiet by default.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run().await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    let result = commands::run(&cli, config).await?;
    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&result.data)?
    } else {
        serde_json::to_string(&result.data)?
    };

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{rendered}")?;

    for failure in &result.errors {
        match &failure.details {
            Some(details) => eprintln!("warning: {failure}: {details}"),
            None => eprintln!("warning: {failure}"),
        }
    }

    Ok(ExitCode::SUCCESS)
}
