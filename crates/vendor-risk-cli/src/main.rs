use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Deserialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use vendor_risk_core::{
    build_oracle, render_profile, OracleClient, OracleSettings, OutputFormat, RiskPipeline,
    VendorRiskProfile, Verdict, CHECKLIST,
};

const HEALTH_PROMPT: &str = "Reply with the single word OK.";

#[derive(Parser, Debug)]
#[command(
    name = "vendor-risk",
    author,
    version,
    about = "Third-party digital risk analyzer"
)]
struct Cli {
    /// Optional config file (TOML, YAML or JSON) with an `oracle` table
    #[arg(long = "config", value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score a vendor by its internet domain
    Analyze {
        /// Vendor domain, e.g. example.com
        domain: String,
        /// Emit the profile as JSON instead of human-readable text
        #[arg(long)]
        json: bool,
    },
    /// List the checklist questions
    Checklist {
        /// Emit the checklist as JSON instead of human-readable text
        #[arg(long)]
        json: bool,
    },
    /// Send a probe prompt through the configured provider
    Health,
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    oracle: Option<OracleSettings>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze { ref domain, json } => {
            analyze(cli.config.as_deref(), domain, json).await?
        }
        Commands::Checklist { json } => list_checklist(json)?,
        Commands::Health => health(cli.config.as_deref()).await?,
    }
    Ok(())
}

fn load_settings(config_path: Option<&Path>) -> Result<OracleSettings> {
    let base = match config_path {
        Some(path) => {
            debug!(path = %path.display(), "loading config file");
            let file: FileConfig = config::Config::builder()
                .add_source(config::File::from(path))
                .build()
                .and_then(|cfg| cfg.try_deserialize())
                .with_context(|| format!("failed to load config from {}", path.display()))?;
            file.oracle.unwrap_or_default()
        }
        None => OracleSettings::default(),
    };
    base.overlay_env()
        .context("invalid oracle settings in environment")
}

async fn analyze(config_path: Option<&Path>, domain: &str, json: bool) -> Result<()> {
    let settings = load_settings(config_path)?;
    let oracle = build_oracle(&settings).context("analysis is disabled")?;
    let pipeline = RiskPipeline::new(oracle);
    let profile = pipeline
        .analyze(domain)
        .await
        .context("analysis could not start")?;

    if json {
        println!("{}", render_profile(&profile, OutputFormat::Json)?);
        return Ok(());
    }
    println!("{}", verdict_banner(&profile));
    print!("{}", render_profile(&profile, OutputFormat::Human)?);
    Ok(())
}

fn verdict_banner(profile: &VendorRiskProfile) -> String {
    let label = profile.verdict.label();
    match profile.verdict {
        Verdict::Pass => label.green().bold().to_string(),
        Verdict::Fail | Verdict::Disqualified => label.red().bold().to_string(),
        Verdict::Incomplete => label.yellow().bold().to_string(),
    }
}

fn list_checklist(json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&CHECKLIST[..])?);
        return Ok(());
    }

    println!("{} checklist item(s)", CHECKLIST.len());
    for (idx, item) in CHECKLIST.iter().enumerate() {
        println!(
            "{pos}. {id:<18} {question}",
            pos = idx + 1,
            id = item.id.as_str(),
            question = item.question
        );
        if let Some(description) = item.description {
            println!("   {description}");
        }
    }
    Ok(())
}

async fn health(config_path: Option<&Path>) -> Result<()> {
    let settings = load_settings(config_path)?;
    println!("Checking provider {} ...", settings.provider);
    let oracle = build_oracle(&settings).context("provider is not usable")?;
    let reply = oracle
        .generate(HEALTH_PROMPT)
        .await
        .with_context(|| format!("provider {} did not answer", settings.provider))?;
    println!("ok ({} chars)", reply.trim().chars().count());
    Ok(())
}

fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tokio=warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}
