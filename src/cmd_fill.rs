//! Fill, inspect and replay subcommand handlers.

use std::path::Path;

use anyhow::Context;
use tracing::info;

use personafill_browser_cdp::CdpFormPage;
use personafill_config::Config;
use personafill_core::{FillEngine, Inspection, MemoryPage};
use personafill_protocols::{PageSnapshot, Profile};

use crate::cli::{BrowserArgs, OutputFormat};

/// Read a profile record from a JSON file.
pub(crate) fn load_profile(path: &Path) -> anyhow::Result<Profile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read profile {}", path.display()))?;
    let profile = Profile::from_json(&content)
        .with_context(|| format!("Invalid profile {}", path.display()))?;
    Ok(profile)
}

/// Fill the attached browser page.
pub(crate) async fn fill(
    config: &Config,
    engine: &FillEngine,
    profile_path: &Path,
    browser: &BrowserArgs,
) -> anyhow::Result<()> {
    let profile = load_profile(profile_path)?;
    let page = CdpFormPage::connect(&browser.apply(&config.browser))
        .await
        .context("Failed to attach to the browser page")?;

    info!("Filling {} with profile '{}'", page.url(), profile.name);
    let report = engine.fill(&page, &profile).await;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Print the fields detected on the attached page.
pub(crate) async fn inspect(
    config: &Config,
    engine: &FillEngine,
    profile_path: Option<&Path>,
    format: OutputFormat,
    browser: &BrowserArgs,
) -> anyhow::Result<()> {
    let profile = profile_path.map(load_profile).transpose()?;
    let page = CdpFormPage::connect(&browser.apply(&config.browser))
        .await
        .context("Failed to attach to the browser page")?;

    let inspection = engine.inspect(&page, profile.as_ref()).await?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&inspection)?),
        OutputFormat::Table => print_table(&inspection),
    }
    Ok(())
}

fn print_table(inspection: &Inspection) {
    println!("{} ({})", inspection.url, inspection.strategy);
    if inspection.fields.is_empty() {
        println!("No form fields found.");
        return;
    }
    println!(
        "{:<28} {:<32} {:<12} {:<6} {}",
        "FIELD", "LABEL", "KIND", "EMPTY", "MATCH"
    );
    println!("{}", "-".repeat(96));
    for field in &inspection.fields {
        let matched = match (&field.attribute, &field.tier) {
            (Some(attribute), Some(tier)) => format!("{} ({})", attribute, tier),
            _ => "-".to_string(),
        };
        println!(
            "{:<28} {:<32} {:<12} {:<6} {}",
            truncate(&field.identifier, 28),
            truncate(&field.label, 32),
            field.kind,
            if field.is_empty { "yes" } else { "no" },
            matched
        );
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Fill a saved snapshot and print the report.
pub(crate) async fn replay(
    engine: &FillEngine,
    snapshot_path: &Path,
    profile_path: &Path,
) -> anyhow::Result<()> {
    let profile = load_profile(profile_path)?;
    let content = std::fs::read_to_string(snapshot_path)
        .with_context(|| format!("Failed to read snapshot {}", snapshot_path.display()))?;
    let snapshot: PageSnapshot = serde_json::from_str(&content)
        .with_context(|| format!("Invalid snapshot {}", snapshot_path.display()))?;

    let page = MemoryPage::new(snapshot);
    let report = engine.fill(&page, &profile).await;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
