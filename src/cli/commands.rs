//! CLI command implementations

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::cli::args::ConfigCommand;
use crate::config::{Settings, LLM_API_KEY_ENV, SEARCH_API_KEY_ENV};
use crate::deck::{self, deck_filename, Outline};
use crate::pipeline::Pipeline;
use crate::{llm, search};

/// Run the full topic-to-deck pipeline.
pub async fn generate_deck(
    settings: &Settings,
    topic: Option<String>,
    output: Option<PathBuf>,
    slides: Option<usize>,
) -> Result<()> {
    // Providers are built before prompting so missing keys fail fast.
    let search_provider = search::build_provider(settings)?;
    let llm_provider = llm::build_provider(settings)?;

    let topic = match topic {
        Some(topic) => topic,
        None => prompt_topic(&mut io::stdin().lock(), &mut io::stdout())?,
    };
    let topic = normalize_topic(&topic)?;

    let slide_count = slides.unwrap_or(settings.deck.slide_count);
    if slide_count == 0 {
        anyhow::bail!("Slide count must be at least 1");
    }

    let output = output.unwrap_or_else(|| settings.output_path(&deck_filename(&topic)));
    let pipeline = Pipeline::new(search_provider, llm_provider, slide_count);

    println!("Searching the web...");
    let context = pipeline
        .gather_context(&topic)
        .await
        .context("Web search failed")?;
    if context.snippet_count == 0 {
        println!("No search snippets found; continuing without web context");
    }

    println!("Generating slides with LLM...");
    let completion = pipeline.generate(&topic, &context).await?;
    println!("LLM response:");
    println!("{}", completion);
    println!();

    println!("Creating presentation...");
    let outline = pipeline
        .assemble(&topic, &completion, &output)
        .with_context(|| format!("Failed to write presentation: {}", output.display()))?;

    report_outline(&outline, &output);
    Ok(())
}

/// Strip surrounding whitespace; inner spaces are kept for the file name.
fn normalize_topic(raw: &str) -> Result<String> {
    let topic = raw.trim();
    if topic.is_empty() {
        anyhow::bail!("Topic must not be empty");
    }
    Ok(topic.to_string())
}

/// Build a deck from a saved completion text file.
pub fn build_deck(
    settings: &Settings,
    input: &Path,
    output: Option<PathBuf>,
    title: Option<String>,
) -> Result<()> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read input file: {}", input.display()))?;

    let title = match title {
        Some(title) => title,
        None => input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .context("Input path has no file name")?,
    };

    let output = output.unwrap_or_else(|| settings.output_path(&deck_filename(&title)));
    let outline = deck::write_deck(&text, &title, &output)
        .with_context(|| format!("Failed to write presentation: {}", output.display()))?;

    report_outline(&outline, &output);
    Ok(())
}

/// Handle config subcommands
pub fn config_command(settings: &Settings, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            let toml = toml::to_string_pretty(&redacted(settings))?;
            println!("{}", toml);
        }
        ConfigCommand::Path => {
            let path = Settings::config_path()?;
            println!("{}", path.display());
        }
        ConfigCommand::Init { force } => {
            let path = Settings::config_path()?;
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }
            Settings::write_default(&path)?;
            println!("Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: &'static str,
    detail: String,
}

#[derive(Serialize)]
struct DoctorReport {
    config_path: String,
    config_found: bool,
    search_provider: String,
    llm_provider: String,
    llm_model: String,
    checks: Vec<DoctorCheck>,
    notes: Vec<String>,
}

/// Report whether the pipeline has what it needs to run.
pub fn run_doctor(settings: &Settings, json: bool) -> Result<()> {
    let report = collect_doctor_report(settings)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("slidecraft doctor");
    println!(
        "config: {} ({})",
        report.config_path,
        if report.config_found { "found" } else { "not found, using defaults" }
    );
    println!("search: {}", report.search_provider);
    println!("llm: {} ({})", report.llm_provider, report.llm_model);
    println!();

    for check in &report.checks {
        println!("{:<12} {:<8} {}", check.name, check.status, check.detail);
    }

    if !report.notes.is_empty() {
        println!();
        for note in &report.notes {
            println!("{}", note);
        }
    }

    Ok(())
}

fn collect_doctor_report(settings: &Settings) -> Result<DoctorReport> {
    let config_path = Settings::config_path()?;
    let mut notes = Vec::new();

    let search_key = key_check(
        "search key",
        &settings.search.api_key,
        "search.api_key",
        SEARCH_API_KEY_ENV,
    );
    let llm_key = key_check(
        "llm key",
        &settings.llm.api_key,
        "llm.api_key",
        LLM_API_KEY_ENV,
    );

    if let Err(e) = search::build_provider(settings) {
        notes.push(format!("error: {}", e));
    }
    if let Err(e) = llm::build_provider(settings) {
        notes.push(format!("error: {}", e));
    }

    let output_dir = &settings.deck.output_dir;
    let output_check = DoctorCheck {
        name: "output dir",
        status: if output_dir.is_dir() { "ok" } else { "missing" },
        detail: output_dir.display().to_string(),
    };

    Ok(DoctorReport {
        config_found: config_path.exists(),
        config_path: config_path.display().to_string(),
        search_provider: settings.search.provider.clone(),
        llm_provider: settings.llm.provider.clone(),
        llm_model: settings.llm.model.clone(),
        checks: vec![search_key, llm_key, output_check],
        notes,
    })
}

fn key_check(name: &'static str, key: &str, config_key: &str, env_var: &str) -> DoctorCheck {
    if key.trim().is_empty() {
        DoctorCheck {
            name,
            status: "missing",
            detail: format!("set {} in config or {}", config_key, env_var),
        }
    } else {
        DoctorCheck {
            name,
            status: "ok",
            detail: "configured".to_string(),
        }
    }
}

// Helper functions

fn prompt_topic(input: &mut dyn BufRead, out: &mut dyn Write) -> Result<String> {
    write!(out, "Enter a topic: ")?;
    out.flush()?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("Failed to read topic from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn report_outline(outline: &Outline, output: &Path) {
    for skipped in &outline.skipped {
        println!(
            "warning: skipped group {} (no body lines): {}",
            skipped.index + 1,
            truncate(&skipped.text, 60)
        );
    }
    println!(
        "Presentation saved to {} ({} slides)",
        output.display(),
        outline.slides.len()
    );
}

/// Settings with API keys masked, for display.
fn redacted(settings: &Settings) -> Settings {
    let mut shown = settings.clone();
    for key in [&mut shown.search.api_key, &mut shown.llm.api_key] {
        if !key.trim().is_empty() {
            *key = "********".to_string();
        }
    }
    shown
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
