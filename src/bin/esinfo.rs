//! esinfo command line
//!
//! Lists the index and data stream families of a cluster and writes them to
//! `indices.{csv,json,yaml}`.
//!
//! # Usage
//!
//! ```bash
//! # Check that the cluster is reachable
//! esinfo test -e https://localhost:9200 -u elastic -p changeme --cacert ca.pem
//!
//! # Write indices.yaml in the current directory
//! esinfo run -e https://localhost:9200 -U -f yaml
//!
//! # Settings can also come from esinfo.yaml (./ or $HOME) or ESINFO_* variables
//! esinfo run --config prod.yaml
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use esinfo::{connect_cluster, run_with, FileConfig, Overrides, Settings};

/// Exit status for a report written with an empty column.
const EXIT_DEGRADED: u8 = 2;

#[derive(Parser)]
#[command(name = "esinfo")]
#[command(version)]
#[command(about = "Grabs the types of indices and data streams in a cluster")]
#[command(
    long_about = "When running large Elasticsearch clusters it can be difficult to know what \
indices you have without searching through index management or scrolling in dev tools. \
esinfo queries the cluster for all indices and data streams and writes their families \
to a csv, json or yaml file."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: esinfo.yaml in ./ or $HOME)
    #[arg(long, global = true, env = "ESINFO_CONFIG")]
    config: Option<PathBuf>,

    /// Address of the cluster [default: localhost:9200]
    #[arg(short, long, global = true, env = "ESINFO_ENDPOINT")]
    endpoint: Option<String>,

    /// Username for the cluster [default: elastic]
    #[arg(short, long, global = true, env = "ESINFO_USERNAME")]
    username: Option<String>,

    /// Password for the cluster [default: changeme]
    #[arg(
        short,
        long,
        global = true,
        env = "ESINFO_PASSWORD",
        hide_env_values = true
    )]
    password: Option<String>,

    /// Certificate authority for the cluster (PEM)
    #[arg(long, global = true, env = "ESINFO_CACERT")]
    cacert: Option<PathBuf>,

    /// Ignore certificate errors
    #[arg(short = 'U', long = "unsafe", global = true)]
    trust_all: bool,

    /// Output type: csv, json, yml or yaml [default: csv]
    #[arg(short, long, global = true, env = "ESINFO_FORMAT")]
    format: Option<String>,

    /// Directory the report is written to [default: .]
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Fail instead of writing a report when a catalog cannot be fetched
    #[arg(long, global = true)]
    strict: bool,

    /// Retries for transient cluster errors
    #[arg(long, global = true)]
    max_retries: Option<u32>,

    /// Debug log output (default: info). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Query the cluster for all indices and data streams and write the report
    Run,

    /// Check the connection by fetching the cluster info
    Test,
}

// =============================================================================
// MAIN
// =============================================================================

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match load_inputs(&cli) {
        Ok((overrides, file)) => match cli.command {
            Commands::Run => cmd_run(overrides, file).await,
            Commands::Test => cmd_test(overrides, file).await,
        },
        Err(e) => Err(e),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

/// Filter used when RUST_LOG is unset.
fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "esinfo=info",
        _ => "esinfo=debug",
    }
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Flags and environment, plus the discovered config file. Resolution
/// happens in the command so settings are validated in one place.
fn load_inputs(cli: &Cli) -> Result<(Overrides, Option<FileConfig>)> {
    let file = FileConfig::discover(cli.config.as_deref(), &FileConfig::default_search_dirs())
        .context("Loading config file")?;

    let overrides = Overrides {
        endpoint: cli.endpoint.clone(),
        username: cli.username.clone(),
        password: cli.password.clone(),
        cacert: cli.cacert.clone(),
        trust_all: cli.trust_all,
        format: cli.format.clone(),
        output_dir: cli.output_dir.clone(),
        strict: cli.strict,
        max_retries: cli.max_retries,
    };

    Ok((overrides, file))
}

// =============================================================================
// COMMANDS
// =============================================================================

async fn cmd_run(overrides: Overrides, file: Option<FileConfig>) -> Result<ExitCode> {
    let summary = run_with(overrides, file, connect_cluster)
        .await
        .context("Generating report")?;

    println!(
        "{} file located at {}",
        summary.format.label(),
        summary.output.display()
    );

    if summary.is_degraded() {
        let failed: Vec<&str> = summary.failed.iter().map(|k| k.as_str()).collect();
        eprintln!(
            "{} could not fetch {}; the report is incomplete",
            "warning:".yellow().bold(),
            failed.join(" and ")
        );
        return Ok(ExitCode::from(EXIT_DEGRADED));
    }

    Ok(ExitCode::SUCCESS)
}

async fn cmd_test(overrides: Overrides, file: Option<FileConfig>) -> Result<ExitCode> {
    let settings = Settings::resolve(overrides, file).context("Resolving settings")?;
    let client = connect_cluster(&settings).context("Creating cluster client")?;

    let info = client
        .info()
        .await
        .with_context(|| format!("Error executing the request against {}", client.endpoint()))?;

    println!("{}", serde_json::to_string_pretty(&info)?);
    println!("{}", "Connection successful!".green());

    Ok(ExitCode::SUCCESS)
}
