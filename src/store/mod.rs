//! Clients for the external wide-column store
//!
//! The store is reached over a small HTTP API: table/column-family
//! provisioning, point lookups, prefix scans, row deletes, and batched cell
//! writes. This module holds:
//! - the typed wire format for every endpoint
//! - a low-level HTTP adapter with request chunking
//! - the frontier (queue) client and the page store client built on it

mod client;
mod frontier;
mod pages;
mod wire;

pub use client::{StoreClient, StoreError, StoreResult, MAX_CELLS_PER_WRITE};
pub use frontier::{FrontierClient, QueueEntry};
pub use pages::{PageStoreClient, PageWrite};
pub use wire::{CellValue, CellWrite, VersionedCell, WireColumn, WireRow};

use crate::config::StoreConfig;

/// Column family holding page metadata (language, title).
pub const INFO_FAMILY: &str = "info";

/// Column family holding backlink cells, one per source page.
pub const BACKLINKS_FAMILY: &str = "backlinks";

/// Column family holding the raw document when full-document storage is on.
pub const CONTENT_FAMILY: &str = "content";

/// Column family holding queue entries in the queue table.
pub const LINK_FAMILY: &str = "link";

/// Qualifier of the URL cell on a queue row.
pub const URL_QUALIFIER: &str = "url";

/// Qualifier of the title cell, also used as the existence probe column.
pub const TITLE_QUALIFIER: &str = "title";

/// Qualifier of the language cell.
pub const LANGUAGE_QUALIFIER: &str = "language";

/// Qualifier of the raw document cell.
pub const DOCUMENT_QUALIFIER: &str = "html";

/// Provisions the storage schema: both tables and their column families.
///
/// Idempotent: "already exists" responses count as success. Any other
/// failure is returned to the caller and is fatal at startup.
pub async fn provision(store: &StoreClient, config: &StoreConfig) -> StoreResult<()> {
    store.create_table(&config.main_table).await?;
    store.create_table(&config.queue_table).await?;

    // Metadata and the backlink graph share a locality group; raw documents
    // are large and sit in their own.
    store
        .create_column_family(&config.main_table, INFO_FAMILY, "page")
        .await?;
    store
        .create_column_family(&config.main_table, BACKLINKS_FAMILY, "page")
        .await?;
    store
        .create_column_family(&config.main_table, CONTENT_FAMILY, "raw")
        .await?;
    store
        .create_column_family(&config.queue_table, LINK_FAMILY, "queue")
        .await?;

    tracing::info!(
        "Provisioned tables '{}' and '{}'",
        config.main_table,
        config.queue_table
    );

    Ok(())
}
