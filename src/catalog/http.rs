//! `CatalogSource` over the cluster REST API.

use async_trait::async_trait;
use serde::Deserialize;

use super::CatalogSource;
use crate::connector::ClusterClient;
use crate::error::Result;

/// All indices, primaries only, as JSON.
pub const CAT_INDICES_PATH: &str = "/_cat/indices/_all?format=json&pri=true";

/// Every data stream.
pub const DATA_STREAMS_PATH: &str = "/_data_stream/*";

/// One row of the `_cat/indices` listing. Only the name is used.
#[derive(Debug, Clone, Deserialize)]
pub struct IndexEntry {
    pub index: String,
}

/// Body of `GET /_data_stream/<pattern>`.
#[derive(Debug, Clone, Deserialize)]
pub struct DataStreamListing {
    #[serde(default)]
    pub data_streams: Vec<DataStreamEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataStreamEntry {
    pub name: String,
}

#[async_trait]
impl CatalogSource for ClusterClient {
    async fn index_names(&self) -> Result<Vec<String>> {
        let entries: Vec<IndexEntry> = self.get_json(CAT_INDICES_PATH).await?;
        Ok(entries.into_iter().map(|e| e.index).collect())
    }

    async fn data_stream_names(&self) -> Result<Vec<String>> {
        let listing: DataStreamListing = self.get_json(DATA_STREAMS_PATH).await?;
        Ok(listing.data_streams.into_iter().map(|d| d.name).collect())
    }
}
