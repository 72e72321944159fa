//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};
use fdinsights_server::ServerConfig;

pub async fn cmd_serve(host: &str, port: u16, no_auth: bool, static_dir: Option<&Path>) -> Result<()> {
    println!("🚀 Starting FD Insights web server...");
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }

    let config = ServerConfig::from_env(!no_auth);

    if no_auth {
        println!();
        println!("   ⚠️  Authentication DISABLED - do not expose to network!");
    } else {
        if config.api_keys.is_empty() && config.trusted_networks.is_empty() {
            println!("   🔒 Authentication required, but no API keys or trusted networks are configured");
            println!("      Set FDINSIGHTS_API_KEYS or FDINSIGHTS_TRUSTED_NETWORKS, or use --no-auth locally");
        }
        if !config.api_keys.is_empty() {
            println!(
                "   🔑 API keys: {} configured (FDINSIGHTS_API_KEYS)",
                config.api_keys.len()
            );
        }
        if !config.trusted_networks.is_empty() {
            println!(
                "   🏠 Trusted networks: {} (FDINSIGHTS_TRUSTED_NETWORKS)",
                config
                    .trusted_networks
                    .iter()
                    .map(|n| n.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
    }
    if !config.allowed_origins.is_empty() {
        println!("   🌐 CORS origins: {}", config.allowed_origins.join(", "));
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let static_dir_str = static_dir
        .map(|p| p.to_str().context("static_dir path must be valid UTF-8"))
        .transpose()?;
    fdinsights_server::serve_with_config(host, port, static_dir_str, config).await?;

    Ok(())
}
