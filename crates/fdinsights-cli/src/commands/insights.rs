//! Insight command implementation

use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use fdinsights_core::{AIClient, InsightBackend, InsightGateway, Settings};
use tracing::debug;

use super::print_validation_errors;
use crate::cli::FdArgs;

/// Generate insights and print them
pub async fn cmd_insights(args: &FdArgs, no_reveal: bool, speed_ms: u64) -> Result<()> {
    let settings = Settings::load().context("Failed to load settings")?;
    debug!(?settings, "Loaded generation settings");
    let gateway = InsightGateway::with_backend(AIClient::from_env_with_settings(&settings));

    match gateway.backend() {
        Some(client) => println!("🤖 Generating insights with {} ({})...\n", client.model(), client.host()),
        None => println!("ℹ️  AI backend not configured (set OLLAMA_HOST or AI_BACKEND)\n"),
    }

    match gateway.generate(&args.to_input()).await {
        Ok(insight) => {
            let mut stdout = std::io::stdout();
            if no_reveal {
                writeln!(stdout, "{}", insight.text)?;
            } else {
                reveal(&mut stdout, &insight.text, Duration::from_millis(speed_ms)).await?;
            }
            println!();
            println!(
                "   Model: {} · {}",
                insight.model,
                insight
                    .generated_at
                    .with_timezone(&chrono::Local)
                    .format("%Y-%m-%d %H:%M:%S")
            );
            Ok(())
        }
        Err(failure) => {
            if let Some(errors) = failure.validation_errors() {
                print_validation_errors(errors);
            }
            Err(failure.into())
        }
    }
}

/// Write `text` one character per tick (typewriter effect)
///
/// A zero tick writes the whole text at once.
pub async fn reveal<W: Write>(out: &mut W, text: &str, tick: Duration) -> std::io::Result<()> {
    if tick.is_zero() {
        writeln!(out, "{}", text)?;
        return out.flush();
    }

    let mut interval = tokio::time::interval(tick);
    for ch in text.chars() {
        interval.tick().await;
        write!(out, "{}", ch)?;
        out.flush()?;
    }
    writeln!(out)?;
    out.flush()
}
