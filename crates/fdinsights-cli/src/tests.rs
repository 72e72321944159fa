//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::time::Duration;

use clap::Parser;
use fdinsights_core::{calculate, InvestmentParameters};

use crate::cli::{AiAction, Cli, Commands, FdArgs, PromptsAction};
use crate::commands::{self, calc::render_summary};

fn fd_args(principal: f64, rate: f64, years: f64, frequency: &str) -> FdArgs {
    FdArgs {
        principal,
        rate,
        years,
        frequency: frequency.to_string(),
    }
}

// ========== Argument Parsing ==========

#[test]
fn test_calc_defaults_match_form_defaults() {
    let cli = Cli::try_parse_from(["fdinsights", "calc"]).unwrap();
    let Commands::Calc { params, json } = cli.command else {
        panic!("expected calc");
    };
    assert!(!json);

    let input = params.to_input();
    let expected = InvestmentParameters::default();
    assert_eq!(input.principal, Some(expected.principal));
    assert_eq!(input.annual_rate, Some(expected.annual_rate));
    assert_eq!(input.term_years, Some(expected.term_years));
    assert_eq!(input.compounding_frequency.as_deref(), Some("quarterly"));
}

#[test]
fn test_insights_args() {
    let cli = Cli::try_parse_from([
        "fdinsights",
        "insights",
        "--principal",
        "200000",
        "--rate",
        "7.1",
        "--years",
        "3",
        "--frequency",
        "Monthly",
        "--no-reveal",
        "--speed-ms",
        "5",
    ])
    .unwrap();

    let Commands::Insights {
        params,
        no_reveal,
        speed_ms,
    } = cli.command
    else {
        panic!("expected insights");
    };
    assert!(no_reveal);
    assert_eq!(speed_ms, 5);
    assert_eq!(params.to_input().compounding_frequency.as_deref(), Some("monthly"));
}

#[test]
fn test_negative_principal_reaches_validation() {
    let cli = Cli::try_parse_from(["fdinsights", "calc", "--principal", "-5"]).unwrap();
    let Commands::Calc { params, .. } = cli.command else {
        panic!("expected calc");
    };
    let errors = params.to_input().validate().unwrap_err();
    assert!(errors.contains("principal"));
}

#[test]
fn test_serve_and_subcommands_parse() {
    let cli = Cli::try_parse_from(["fdinsights", "serve", "--port", "8080", "--no-auth"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Serve {
            port: 8080,
            no_auth: true,
            ..
        }
    ));

    let cli = Cli::try_parse_from(["fdinsights", "prompts", "show", "fd_insights"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Prompts {
            action: Some(PromptsAction::Show { .. })
        }
    ));

    let cli = Cli::try_parse_from(["fdinsights", "-v", "ai", "status"]).unwrap();
    assert!(cli.verbose);
    assert!(matches!(
        cli.command,
        Commands::Ai {
            action: AiAction::Status
        }
    ));
}

// ========== Calc Command ==========

#[test]
fn test_cmd_calc_valid_and_invalid() {
    assert!(commands::cmd_calc(&fd_args(50000.0, 6.5, 5.0, "quarterly"), true).is_ok());

    let err = commands::cmd_calc(&fd_args(999.0, 6.5, 5.0, "quarterly"), false).unwrap_err();
    assert_eq!(err.to_string(), "Invalid input.");
}

#[test]
fn test_render_summary_uses_inr_format() {
    let params = fd_args(50000.0, 6.5, 5.0, "quarterly")
        .to_input()
        .validate()
        .unwrap();
    let summary = render_summary(&params, &calculate(&params));

    assert!(summary.contains("₹50,000.00"));
    assert!(summary.contains("₹69,020.99"));
    assert!(summary.contains("₹19,020.99"));
    assert!(summary.contains("Quarterly (4x per year)"));
}

// ========== Insights Reveal ==========

#[tokio::test]
async fn test_reveal_writes_full_text() {
    let mut out = Vec::new();
    commands::reveal(&mut out, "Ladder FDs.", Duration::from_millis(1))
        .await
        .unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "Ladder FDs.\n");
}

#[tokio::test]
async fn test_reveal_zero_tick_and_multibyte() {
    let mut out = Vec::new();
    commands::reveal(&mut out, "₹ tip", Duration::ZERO).await.unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "₹ tip\n");

    let mut out = Vec::new();
    commands::reveal(&mut out, "₹₹", Duration::from_millis(1))
        .await
        .unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "₹₹\n");
}

// ========== Prompts ==========

#[test]
fn test_prompt_preview_uses_form_defaults() {
    let mut library = fdinsights_core::PromptLibrary::embedded_only();
    let prompt = library.get(fdinsights_core::PromptId::FdInsights).unwrap();

    assert_eq!(commands::prompts::source_label(prompt), "built-in");

    let preview = commands::prompts::render_preview(prompt).unwrap();
    assert!(preview.starts_with("── Sample: ₹50,000.00 at 6.5% for 5 years, quarterly ──"));
    assert!(preview.contains("[system]\nYou are a financial advisor"));
    assert!(preview.contains("FD Amount: 50000 INR"));
    assert!(preview.contains("Compounding Frequency: quarterly"));
    assert!(!preview.contains("{{"));
    assert!(preview.ends_with(r#"Expected reply: {"insights": "..."}"#));
}

#[test]
fn test_prompts_show_unknown_id_fails() {
    let err = commands::cmd_prompts_show("merchant_rules").unwrap_err();
    let message = err.to_string();
    assert!(message.contains("merchant_rules"));
    assert!(message.contains("fd_insights"));
}
