//! The report run: fetch → build family sets → align → emit.
//!
//! Every stage takes its inputs as arguments and returns its outputs, so a
//! run can be repeated against any [`CatalogSource`] without reset logic.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::catalog::{
    fetch_data_stream_families, fetch_index_families, CatalogKind, CatalogOutcome, CatalogSource,
};
use crate::config::{FileConfig, OutputFormat, Overrides, Settings};
use crate::connector::ClusterClient;
use crate::error::{EsinfoError, Result};
use crate::report::{align, emit};

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub output: PathBuf,
    pub format: OutputFormat,
    pub index_families: usize,
    pub data_stream_families: usize,
    pub rows: usize,
    /// Catalogs whose fetch failed; their column is empty in the report.
    pub failed: Vec<CatalogKind>,
}

impl RunSummary {
    /// The report was written but at least one column is missing.
    pub fn is_degraded(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Run the report against an already-connected source.
///
/// Fetch failures leave their column empty and are recorded in the
/// summary; with `settings.strict` they abort the run before anything is
/// written.
pub async fn run<S>(source: &S, settings: &Settings) -> Result<RunSummary>
where
    S: CatalogSource + ?Sized,
{
    let indices = fetch_index_families(source, &settings.convention).await;
    let data_streams = fetch_data_stream_families(source, &settings.convention).await;

    let mut failed = Vec::new();
    for (kind, outcome) in [
        (CatalogKind::Indices, &indices),
        (CatalogKind::DataStreams, &data_streams),
    ] {
        if let CatalogOutcome::Failed { reason } = outcome {
            if settings.strict {
                return Err(EsinfoError::CatalogUnavailable {
                    catalog: kind.as_str(),
                    reason: reason.clone(),
                });
            }
            warn!(catalog = %kind, "Reporting an empty column for a failed catalog");
            failed.push(kind);
        }
    }

    let table = align(indices.families(), data_streams.families());
    let output = emit(&table, settings.format, &settings.output_dir)?;

    Ok(RunSummary {
        output,
        format: settings.format,
        index_families: indices.families().len(),
        data_stream_families: data_streams.families().len(),
        rows: table.len(),
        failed,
    })
}

/// Resolve settings, open a source with them and run the report.
///
/// `connect` is only called once the settings are valid, so an unsupported
/// format or a bad retry policy never reaches the cluster.
pub async fn run_with<S, F>(
    overrides: Overrides,
    file: Option<FileConfig>,
    connect: F,
) -> Result<RunSummary>
where
    S: CatalogSource,
    F: FnOnce(&Settings) -> Result<S>,
{
    let settings = Settings::resolve(overrides, file)?;
    let source = connect(&settings)?;
    run(&source, &settings).await
}

/// Client for `settings.profile` with the configured retry policy.
pub fn connect_cluster(settings: &Settings) -> Result<ClusterClient> {
    let client = ClusterClient::connect(&settings.profile, settings.retry.clone())?;
    info!(endpoint = client.endpoint(), "Querying cluster");
    Ok(client)
}

/// Connect with `settings.profile` and run the report.
pub async fn run_against_cluster(settings: &Settings) -> Result<RunSummary> {
    let client = connect_cluster(settings)?;
    run(&client, settings).await
}
