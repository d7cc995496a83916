//! Catalog fetching: index and data stream listings reduced to family sets.
//!
//! [`CatalogSource`] is the only boundary to the cluster. `ClusterClient`
//! implements it over HTTP; [`StaticCatalog`] serves fixed listings.

mod family;
mod http;
mod memory;

pub use family::{derive_family, FamilyConvention, FamilySet, Skip, RESERVED_PREFIX};
pub use http::{
    DataStreamEntry, DataStreamListing, IndexEntry, CAT_INDICES_PATH, DATA_STREAMS_PATH,
};
pub use memory::StaticCatalog;

use std::fmt;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::error::Result;

/// Read-only access to the cluster catalogs.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Names of every index, including system indices.
    async fn index_names(&self) -> Result<Vec<String>>;

    /// Names of every data stream.
    async fn data_stream_names(&self) -> Result<Vec<String>>;
}

#[async_trait]
impl<'a, T> CatalogSource for &'a T
where
    T: CatalogSource + ?Sized,
{
    async fn index_names(&self) -> Result<Vec<String>> {
        (**self).index_names().await
    }

    async fn data_stream_names(&self) -> Result<Vec<String>> {
        (**self).data_stream_names().await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    Indices,
    DataStreams,
}

impl CatalogKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CatalogKind::Indices => "indices",
            CatalogKind::DataStreams => "data streams",
        }
    }

    fn segment(self, convention: &FamilyConvention) -> usize {
        match self {
            CatalogKind::Indices => convention.index_segment,
            CatalogKind::DataStreams => convention.data_stream_segment,
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of fetching one catalog.
///
/// `Fetched` with an empty set means the cluster has none; `Failed` means
/// the listing could not be obtained and the column is empty for that reason.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogOutcome {
    Fetched(FamilySet),
    Failed { reason: String },
}

impl CatalogOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, CatalogOutcome::Failed { .. })
    }

    /// Families to report; empty for a failed fetch.
    pub fn families(&self) -> &[String] {
        match self {
            CatalogOutcome::Fetched(set) => set.as_slice(),
            CatalogOutcome::Failed { .. } => &[],
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            CatalogOutcome::Fetched(_) => None,
            CatalogOutcome::Failed { reason } => Some(reason),
        }
    }
}

/// Reduce raw catalog names to their family set.
///
/// Reserved names are dropped silently; names without the required segment
/// are dropped with a warning.
pub fn collect_families<I, S>(
    names: I,
    kind: CatalogKind,
    convention: &FamilyConvention,
) -> FamilySet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let segment = kind.segment(convention);
    let mut families = FamilySet::new();

    for name in names {
        let name = name.as_ref();
        match derive_family(name, convention.delimiter, segment) {
            Ok(family) => {
                families.insert(family);
            }
            Err(Skip::Reserved) => debug!(catalog = %kind, name, "Skipping system entry"),
            Err(Skip::NoSegment) => warn!(
                catalog = %kind,
                name,
                segment,
                "Name does not follow the naming convention, skipping"
            ),
        }
    }

    families
}

/// Fetch the index listing and derive its families.
pub async fn fetch_index_families<S>(source: &S, convention: &FamilyConvention) -> CatalogOutcome
where
    S: CatalogSource + ?Sized,
{
    fetch_families(CatalogKind::Indices, source.index_names().await, convention)
}

/// Fetch the data stream listing and derive its families.
pub async fn fetch_data_stream_families<S>(
    source: &S,
    convention: &FamilyConvention,
) -> CatalogOutcome
where
    S: CatalogSource + ?Sized,
{
    fetch_families(
        CatalogKind::DataStreams,
        source.data_stream_names().await,
        convention,
    )
}

fn fetch_families(
    kind: CatalogKind,
    listing: Result<Vec<String>>,
    convention: &FamilyConvention,
) -> CatalogOutcome {
    match listing {
        Ok(names) => {
            let total = names.len();
            let families = collect_families(names, kind, convention);
            info!(
                catalog = %kind,
                entries = total,
                families = families.len(),
                "Catalog fetched"
            );
            CatalogOutcome::Fetched(families)
        }
        Err(e) => {
            error!(catalog = %kind, error = %e, "Error executing the request");
            CatalogOutcome::Failed {
                reason: e.to_string(),
            }
        }
    }
}
