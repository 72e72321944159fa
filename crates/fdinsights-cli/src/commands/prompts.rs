//! Prompt inspection commands

use std::fmt::Write as _;

use anyhow::{anyhow, Result};
use fdinsights_core::prompts::{default_prompts_dir, Prompt, PromptId, PromptLibrary};
use fdinsights_core::{format_inr, InvestmentParameters};

/// Where a prompt was loaded from
pub(crate) fn source_label(prompt: &Prompt) -> String {
    match &prompt.override_path {
        Some(path) if prompt.is_override => format!("override at {}", path.display()),
        _ => "built-in".to_string(),
    }
}

/// The prompt as the model would see it for the calculator's default form
pub(crate) fn render_preview(prompt: &Prompt) -> Result<String> {
    let params = InvestmentParameters::default().validate()?;
    let rendered = prompt.render_for(&params);

    let mut out = String::new();
    writeln!(
        out,
        "── Sample: {} at {}% for {} years, {} ──",
        format_inr(params.principal()),
        params.annual_rate(),
        params.term_years(),
        params.compounding_frequency().label().to_lowercase()
    )?;
    if let Some(system) = rendered.system {
        writeln!(out, "[system]\n{}\n", system.trim())?;
    }
    writeln!(out, "[user]\n{}", rendered.user.trim())?;
    write!(out, "\nExpected reply: {{\"{}\": \"...\"}}", rendered.output_field)?;
    Ok(out)
}

/// List known prompts, marking those replaced by an override file
pub fn cmd_prompts_list() -> Result<()> {
    let mut library = PromptLibrary::new();

    println!("📝 Prompts\n");
    for info in library.list() {
        let marker = if info.has_override { "✏️ " } else { "  " };
        println!(
            "{} {} (v{}) → `{}`",
            marker, info.id, info.version, info.output_field
        );
    }

    match default_prompts_dir() {
        Some(dir) => println!("\nOverrides are read from {}", dir.display()),
        None => println!("\nNo data directory on this system; built-in prompts only"),
    }
    println!("`fdinsights prompts show <id>` prints the text and a sample rendering.");

    Ok(())
}

/// Print a prompt's metadata, raw text and a rendering for the default form
pub fn cmd_prompts_show(prompt_id: &str) -> Result<()> {
    let id: PromptId = prompt_id.parse().map_err(|e: String| {
        let known: Vec<&str> = PromptId::all().iter().map(|id| id.as_str()).collect();
        anyhow!("{} (known prompts: {})", e, known.join(", "))
    })?;

    let mut library = PromptLibrary::new();
    let prompt = library.get(id)?;

    println!(
        "{} v{} · field `{}` · {}\n",
        prompt.metadata.id,
        prompt.metadata.version,
        prompt.metadata.output_field,
        source_label(prompt)
    );
    println!("{}\n", prompt.content.trim_end());
    println!("{}", render_preview(prompt)?);

    Ok(())
}

/// Print the override directory (stdout) and each prompt's override file state (stderr)
pub fn cmd_prompts_path() -> Result<()> {
    let dir = default_prompts_dir()
        .ok_or_else(|| anyhow!("No data directory available; prompt overrides are disabled"))?;

    println!("{}", dir.display());
    for id in PromptId::all() {
        let file = dir.join(format!("{}.md", id.as_str()));
        let state = if file.exists() {
            "override present"
        } else {
            "built-in in use"
        };
        eprintln!("  {} ({})", file.display(), state);
    }

    Ok(())
}
