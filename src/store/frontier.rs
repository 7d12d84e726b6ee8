//! Frontier (queue) client
//!
//! The frontier lives in the queue table: one row per pending URL, keyed by
//! an opaque unique id, with the raw URL in the `link:url` cell. Popping is
//! a prefix scan; completing an attempt deletes the row.

use crate::store::client::{StoreClient, StoreResult};
use crate::store::{LINK_FAMILY, URL_QUALIFIER};

/// One pending crawl entry as popped from the queue table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    /// Opaque unique row key; no meaning beyond uniqueness
    pub id: String,

    /// Raw absolute URL to crawl
    pub url: String,
}

/// Thin adapter over the store for frontier operations.
#[derive(Clone)]
pub struct FrontierClient {
    store: StoreClient,
    table: String,
}

impl FrontierClient {
    pub fn new(store: StoreClient, table: String) -> Self {
        Self { store, table }
    }

    /// Pops up to `n` pending entries.
    ///
    /// The scan imposes no ordering beyond whatever the store returns over
    /// its key space, so crawl order is roughly arrival order at best. Rows
    /// without a readable URL cell are skipped.
    pub async fn pop_batch(&self, n: usize) -> StoreResult<Vec<QueueEntry>> {
        let rows = self
            .store
            .scan(&self.table, "", LINK_FAMILY, URL_QUALIFIER, n)
            .await?;

        let entries = rows
            .into_iter()
            .filter_map(|row| {
                let url = row
                    .latest(LINK_FAMILY, URL_QUALIFIER)
                    .and_then(|value| value.as_str());
                match url {
                    Some(url) => Some(QueueEntry {
                        id: row.key.clone(),
                        url: url.to_string(),
                    }),
                    None => {
                        tracing::warn!("Queue row {} has no url cell, skipping", row.key);
                        None
                    }
                }
            })
            .collect();

        Ok(entries)
    }

    /// Removes a completed entry. Idempotent: removing an already-removed
    /// entry is not an error the caller needs to detect.
    pub async fn remove_entry(&self, id: &str) -> StoreResult<()> {
        self.store.delete_row(&self.table, id).await
    }
}
