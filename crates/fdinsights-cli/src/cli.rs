//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use fdinsights_core::ParameterInput;

/// FD Insights - Fixed deposit calculator with AI insights
#[derive(Parser)]
#[command(name = "fdinsights")]
#[command(about = "Fixed deposit maturity calculator with AI-generated insights", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Investment parameters shared by `calc` and `insights`
///
/// Values are range-checked by the core library, not by clap, so every
/// invalid field is reported at once.
#[derive(Args, Debug, Clone)]
pub struct FdArgs {
    /// FD amount in INR (minimum 1000)
    #[arg(short, long, default_value = "50000", allow_negative_numbers = true)]
    pub principal: f64,

    /// Annual interest rate in percent (above 0.1, at most 25)
    #[arg(short, long, default_value = "6.5", allow_negative_numbers = true)]
    pub rate: f64,

    /// Term in years (1 to 50)
    #[arg(short, long, default_value = "5", allow_negative_numbers = true)]
    pub years: f64,

    /// Compounding frequency: monthly, quarterly, annually
    #[arg(short, long, default_value = "quarterly")]
    pub frequency: String,
}

impl FdArgs {
    pub fn to_input(&self) -> ParameterInput {
        ParameterInput {
            principal: Some(self.principal),
            annual_rate: Some(self.rate),
            term_years: Some(self.years),
            compounding_frequency: Some(self.frequency.to_lowercase()),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Calculate maturity amount and total interest
    Calc {
        #[command(flatten)]
        params: FdArgs,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate AI insights for an FD
    Insights {
        #[command(flatten)]
        params: FdArgs,

        /// Print the text at once instead of revealing it character by character
        #[arg(long)]
        no_reveal: bool,

        /// Milliseconds per revealed character
        #[arg(long, default_value = "20")]
        speed_ms: u64,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Disable authentication (for local development only)
        ///
        /// WARNING: Do not use this flag when exposing the server to a network.
        /// By default, requests need an API key (FDINSIGHTS_API_KEYS) or must
        /// come from a trusted network (FDINSIGHTS_TRUSTED_NETWORKS).
        #[arg(long)]
        no_auth: bool,

        /// Directory containing static files to serve (e.g., ui/dist)
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Manage AI prompts (list, show, path)
    Prompts {
        #[command(subcommand)]
        action: Option<PromptsAction>,
    },

    /// Inspect the AI backend
    Ai {
        #[command(subcommand)]
        action: AiAction,
    },
}

#[derive(Subcommand)]
pub enum PromptsAction {
    /// List all available prompts and their override status
    List,

    /// Show the content of a specific prompt
    Show {
        /// Prompt ID (e.g., fd_insights)
        prompt_id: String,
    },

    /// Show the path where prompt overrides should be placed
    Path,
}

#[derive(Subcommand)]
pub enum AiAction {
    /// Show backend configuration, settings and reachability
    Status,
}
