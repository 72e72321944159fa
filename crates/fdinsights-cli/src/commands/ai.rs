//! AI backend command implementations

use anyhow::{Context, Result};
use fdinsights_core::settings::default_settings_path;
use fdinsights_core::{AIClient, InsightBackend, Settings};

/// Show backend configuration, generation settings and reachability
pub async fn cmd_ai_status() -> Result<()> {
    let settings = Settings::load().context("Failed to load settings")?;

    println!("🤖 AI Backend\n");
    println!(
        "  AI_BACKEND: {}",
        std::env::var("AI_BACKEND").unwrap_or_else(|_| "ollama (default)".to_string())
    );

    let Some(client) = AIClient::from_env_with_settings(&settings) else {
        println!("  ⚠️  Not configured");
        println!();
        println!("To enable insights:");
        println!("  export OLLAMA_HOST=http://localhost:11434");
        println!("  export OLLAMA_MODEL=llama3.2");
        println!("or, for an OpenAI-compatible server:");
        println!("  export AI_BACKEND=openai_compatible");
        println!("  export OPENAI_COMPATIBLE_HOST=http://localhost:8000");
        return Ok(());
    };

    let info = client.info();
    println!("  Kind:  {}", info.kind);
    println!("  Host:  {}", info.host);
    println!("  Model: {}", info.model);

    println!("\n⚙️  Settings\n");
    println!("  Temperature: {}", settings.temperature);
    println!(
        "  Timeout:     {}",
        settings
            .timeout
            .map(|t| format!("{}s", t.as_secs()))
            .unwrap_or_else(|| "none".to_string())
    );
    println!("  Calc delay:  {}ms", settings.calculation_delay.as_millis());
    println!(
        "  File:        {}",
        default_settings_path()
            .filter(|p| p.exists())
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(embedded defaults)".to_string())
    );

    print!("\nChecking availability... ");
    if client.health_check().await {
        println!("✅ Connected");
    } else {
        println!("❌ Not responding");
        println!("\n⚠️  Could not reach {}", info.host);
    }

    Ok(())
}
