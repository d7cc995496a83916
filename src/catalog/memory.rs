//! In-memory `CatalogSource` with fixed listings.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{CatalogSource, CAT_INDICES_PATH, DATA_STREAMS_PATH};
use crate::error::{EsinfoError, Result};

/// Serves fixed index and data stream names, optionally failing either
/// listing with an HTTP status. Counts calls so callers can assert that
/// nothing was fetched.
#[derive(Debug, Default)]
pub struct StaticCatalog {
    indices: Vec<String>,
    data_streams: Vec<String>,
    index_failure: Option<(u16, String)>,
    data_stream_failure: Option<(u16, String)>,
    calls: AtomicUsize,
}

impl StaticCatalog {
    pub fn new<I, D>(indices: I, data_streams: D) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        D: IntoIterator,
        D::Item: Into<String>,
    {
        Self {
            indices: indices.into_iter().map(Into::into).collect(),
            data_streams: data_streams.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Make the index listing answer with `status`.
    pub fn failing_indices(mut self, status: u16, body: &str) -> Self {
        self.index_failure = Some((status, body.to_string()));
        self
    }

    /// Make the data stream listing answer with `status`.
    pub fn failing_data_streams(mut self, status: u16, body: &str) -> Self {
        self.data_stream_failure = Some((status, body.to_string()));
        self
    }

    /// Number of listing requests served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn serve(
        &self,
        path: &str,
        names: &[String],
        failure: &Option<(u16, String)>,
    ) -> Result<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match failure {
            Some((status, body)) => Err(EsinfoError::Status {
                path: path.to_string(),
                status: *status,
                body: body.clone(),
            }),
            None => Ok(names.to_vec()),
        }
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn index_names(&self) -> Result<Vec<String>> {
        self.serve(CAT_INDICES_PATH, &self.indices, &self.index_failure)
    }

    async fn data_stream_names(&self) -> Result<Vec<String>> {
        self.serve(DATA_STREAMS_PATH, &self.data_streams, &self.data_stream_failure)
    }
}
