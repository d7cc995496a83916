//! esinfo: index and data stream family report for Elasticsearch clusters
//!
//! When running large clusters it is hard to see which kinds of indices
//! exist without scrolling through index management. esinfo lists every
//! index and data stream, reduces them to their families (`app` for
//! `app-2024.01.01`, `nginx` for `logs-nginx-default`) and writes the two
//! lists side by side as CSV, JSON or YAML.
//!
//! The run is a straight pipeline:
//!
//! ```text
//! ClusterClient → fetch_*_families → align → emit
//! ```

pub mod catalog;
pub mod config;
pub mod connector;
pub mod error;
pub mod pipeline;
pub mod report;

pub use catalog::{CatalogKind, CatalogOutcome, CatalogSource, FamilyConvention, FamilySet};
pub use config::{ConnectionProfile, FileConfig, OutputFormat, Overrides, Settings};
pub use connector::{ClusterClient, RetryConfig};
pub use error::{EsinfoError, Result};
pub use pipeline::{connect_cluster, run, run_against_cluster, run_with, RunSummary};
pub use report::{align, emit, ReportRow, ReportTable};
