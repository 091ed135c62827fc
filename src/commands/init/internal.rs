//! Internal implementation for the scaffold command

use anyhow::{Context, Result};
use colored::*;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

use wpstack::preflight::{self, PreflightReport};
use wpstack::project::{self, ScaffoldConfig};
use wpstack::scaffold::{Scaffold, ScaffoldReport};
use wpstack::secrets::{self, CredentialPair};

use super::InitOptions;

pub fn execute_init(options: &InitOptions) -> Result<()> {
    let config = project::load_or_default(options.config.as_deref()).with_context(|| {
        match &options.config {
            Some(path) => format!("Failed to load config from {}", path.display()),
            None => "Invalid built-in configuration".to_string(),
        }
    })?;
    info!(project = %config.project.name, "configuration loaded");

    let text = !options.json;
    if text {
        println!(
            "{}",
            format!("🚀 Scaffolding WordPress stack '{}'", config.project.name)
                .bold()
                .blue()
        );
        if options.dry_run {
            println!("{}", "DRY RUN - No files will be written".yellow().bold());
        }
        println!("\n🔍 Checking required tools...");
    }

    // Nothing may touch the filesystem before this passes
    let tools = preflight::check(&config.preflight.tools);
    if text {
        print_preflight(&tools);
    }
    tools.ensure()?;

    let pair = secrets::generate_pair(&config.credentials)
        .context("Failed to generate database credentials")?;
    info!("credentials generated");

    let scaffold = Scaffold::new(&options.output, &config).dry_run(options.dry_run);
    let report = scaffold
        .create_project(&pair)
        .with_context(|| format!("Failed to create project in {}", scaffold.root().display()))?;

    if text {
        print_summary(&config, &report, &pair);
    } else {
        print_json(&tools, &report, &pair)?;
    }

    Ok(())
}

// =============================================================================
// Output
// =============================================================================

fn print_preflight(report: &PreflightReport) {
    for tool in &report.tools {
        match &tool.path {
            Some(path) => println!(
                "  ✓ {} {}",
                tool.name,
                format!("({})", path.display()).dimmed()
            ),
            None => println!("  {} {} not found", "✗".red(), tool.name),
        }
    }
}

fn print_summary(config: &ScaffoldConfig, report: &ScaffoldReport, pair: &CredentialPair) {
    let verb = if report.dry_run { "Would create" } else { "Created" };

    println!("\n📦 {}", report.project_root.display());
    for artifact in &report.artifacts {
        println!(
            "  ✓ {verb} {} {}",
            artifact.path.display(),
            format!("({})", artifact.kind.description()).dimmed()
        );
    }

    println!("\n{}", "🔑 Database credentials".bold());
    println!("  {}={}", report.root_env, pair.root.expose().green());
    println!("  {}={}", report.app_env, pair.app.expose().green());
    let env_file = config.artifacts.env.display();
    if report.dry_run {
        println!(
            "  {}",
            "Dry run: these values were not saved anywhere.".yellow()
        );
    } else {
        println!(
            "  {}",
            format!("Stored in {env_file}; keep it out of version control.").dimmed()
        );
    }

    println!("\n{}", "Next steps:".bold());
    println!("  cd {}", report.project_root.display());
    println!("  docker-compose up -d");
    println!("  open http://localhost:{}/", config.proxy.http_port);

    if report.dry_run {
        println!("\n{}", "✨ Dry run complete".green().bold());
    } else {
        println!(
            "\n{}",
            format!("✨ WordPress stack '{}' ready!", config.project.name)
                .green()
                .bold()
        );
    }
}

#[derive(Serialize)]
struct JsonSummary<'a> {
    preflight: &'a PreflightReport,
    #[serde(flatten)]
    project: &'a ScaffoldReport,
    credentials: BTreeMap<&'a str, &'a str>,
}

fn print_json(
    preflight: &PreflightReport,
    report: &ScaffoldReport,
    pair: &CredentialPair,
) -> Result<()> {
    let summary = JsonSummary {
        preflight,
        project: report,
        credentials: BTreeMap::from([
            (report.root_env.as_str(), pair.root.expose()),
            (report.app_env.as_str(), pair.app.expose()),
        ]),
    };
    let json = serde_json::to_string_pretty(&summary).context("Failed to encode summary")?;
    println!("{json}");
    Ok(())
}
