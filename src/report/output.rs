//! Report encodings and the file writer.
//!
//! - csv: header plus rows, one record per line
//! - json: rows as `{"index", "datastream"}` objects, 2-space indented
//! - yaml: the json document re-encoded as block YAML

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use super::ReportTable;
use crate::config::OutputFormat;
use crate::error::{EsinfoError, Result};

/// One report row in object form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRecord {
    pub index: String,
    pub datastream: String,
}

fn records(table: &ReportTable) -> Vec<ReportRecord> {
    table
        .rows()
        .iter()
        .map(|row| ReportRecord {
            index: row.index.clone(),
            datastream: row.data_stream.clone(),
        })
        .collect()
}

fn render_csv(table: &ReportTable) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let csv_err = |e: csv::Error| EsinfoError::Serialization(e.to_string());
    writer.write_record(table.header()).map_err(csv_err)?;
    for row in table.rows() {
        writer.write_record(row.cells()).map_err(csv_err)?;
    }

    writer
        .into_inner()
        .map_err(|e| EsinfoError::Serialization(e.to_string()))
}

fn render_json(table: &ReportTable) -> Result<String> {
    Ok(serde_json::to_string_pretty(&records(table))?)
}

/// YAML is produced from the JSON text, so both formats describe the same
/// document. Object keys come out sorted.
fn render_yaml(table: &ReportTable) -> Result<String> {
    let json = render_json(table)?;
    let document: serde_json::Value = serde_json::from_str(&json)?;
    Ok(serde_yaml::to_string(&document)?)
}

/// Encode `table` in `format`.
pub fn render(table: &ReportTable, format: OutputFormat) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Csv => render_csv(table),
        OutputFormat::Json => render_json(table).map(String::into_bytes),
        OutputFormat::Yaml => render_yaml(table).map(String::into_bytes),
    }
}

/// Write the report into `dir`, replacing any previous one.
///
/// Returns the absolute path of the written file.
pub fn emit(table: &ReportTable, format: OutputFormat, dir: &Path) -> Result<PathBuf> {
    let bytes = render(table, format)?;
    let path = dir.join(format.file_name());

    std::fs::write(&path, &bytes).map_err(|source| EsinfoError::Write {
        path: path.clone(),
        source,
    })?;

    let path = std::fs::canonicalize(&path).map_err(|source| EsinfoError::Write {
        path: path.clone(),
        source,
    })?;

    info!(path = %path.display(), format = %format, rows = table.len(), "Report written");
    Ok(path)
}
