//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `ai` - AI backend status
//! - `calc` - Maturity calculation
//! - `insights` - AI insight generation with typewriter reveal
//! - `prompts` - Prompt library management commands
//! - `serve` - Web server command

pub mod ai;
pub mod calc;
pub mod insights;
pub mod prompts;
pub mod serve;

// Re-export command functions for main.rs
pub use ai::*;
pub use calc::*;
pub use insights::*;
pub use prompts::*;
pub use serve::*;

use fdinsights_core::ValidationErrors;

/// Print one line per rejected field
pub(crate) fn print_validation_errors(errors: &ValidationErrors) {
    eprintln!("❌ Invalid input:");
    for field in errors.fields() {
        eprintln!("   {:<22} {}", field.field, field.message);
    }
}
