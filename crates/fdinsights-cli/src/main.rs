//! FD Insights CLI - Fixed deposit calculator with AI insights
//!
//! Usage:
//!   fdinsights calc -p 50000 -r 6.5 -y 5     Calculate maturity amount
//!   fdinsights insights -p 50000 -r 6.5 -y 5 Generate AI insights
//!   fdinsights serve --port 3000             Start web server

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Calc { params, json } => commands::cmd_calc(&params, json),
        Commands::Insights {
            params,
            no_reveal,
            speed_ms,
        } => commands::cmd_insights(&params, no_reveal, speed_ms).await,
        Commands::Serve {
            port,
            host,
            no_auth,
            static_dir,
        } => commands::cmd_serve(&host, port, no_auth, static_dir.as_deref()).await,
        Commands::Prompts { action } => match action {
            None | Some(PromptsAction::List) => commands::cmd_prompts_list(),
            Some(PromptsAction::Show { prompt_id }) => commands::cmd_prompts_show(&prompt_id),
            Some(PromptsAction::Path) => commands::cmd_prompts_path(),
        },
        Commands::Ai { action } => match action {
            AiAction::Status => commands::cmd_ai_status().await,
        },
    }
}
