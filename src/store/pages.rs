//! Page store client
//!
//! Writes page metadata and the backlink graph into the main table and
//! enqueues newly discovered URLs into the queue table. All writes flow
//! through the chunked low-level write path.

use crate::store::client::{StoreClient, StoreResult};
use crate::store::wire::{CellValue, CellWrite};
use crate::store::{
    BACKLINKS_FAMILY, CONTENT_FAMILY, DOCUMENT_QUALIFIER, INFO_FAMILY, LANGUAGE_QUALIFIER,
    LINK_FAMILY, TITLE_QUALIFIER, URL_QUALIFIER,
};
use crate::url::OutboundLink;
use uuid::Uuid;

/// Logical timestamp marking a cell authoritative: later natural-time writes
/// to other columns on the same row do not shadow it.
const AUTHORITATIVE: i64 = 0;

/// Everything written for one successfully crawled page.
#[derive(Debug, Clone)]
pub struct PageWrite {
    /// Canonical key of the crawled page (the backlink source)
    pub key: String,

    /// Document language from the markup, possibly empty
    pub language: String,

    /// Document title, possibly empty
    pub title: String,

    /// Raw HTML body, kept only when full-document storage is enabled
    pub document: Option<String>,

    /// Outbound links that survived the filter pipeline
    pub links: Vec<OutboundLink>,
}

/// Thin adapter over the store for page reads and writes.
#[derive(Clone)]
pub struct PageStoreClient {
    store: StoreClient,
    main_table: String,
    queue_table: String,
}

impl PageStoreClient {
    pub fn new(store: StoreClient, main_table: String, queue_table: String) -> Self {
        Self {
            store,
            main_table,
            queue_table,
        }
    }

    /// Existence probe used for crawl dedup.
    ///
    /// Checks for the presence of the title cell specifically, not the full
    /// record: a page that only has backlink cells (written by pages linking
    /// to it) does not count as crawled.
    pub async fn page_exists(&self, key: &str) -> StoreResult<bool> {
        let rows = self
            .store
            .read_row(&self.main_table, key, INFO_FAMILY, TITLE_QUALIFIER)
            .await?;
        Ok(!rows.is_empty())
    }

    /// Upserts a page's metadata and its backlink contributions.
    ///
    /// Language and title (and the raw document, when kept) go on the page's
    /// own row at the authoritative timestamp. Each outbound link adds one
    /// cell on the *target* page's row, qualified by this page's key, so
    /// concurrent writers touching the same target never collide on a
    /// column. Returns the number of cells written.
    pub async fn write_page(&self, page: &PageWrite) -> StoreResult<usize> {
        let mut cells = Vec::with_capacity(2 + page.links.len());

        cells.push(CellWrite {
            row_key: page.key.clone(),
            family: INFO_FAMILY.to_string(),
            qualifier: LANGUAGE_QUALIFIER.to_string(),
            value: CellValue::String(page.language.clone()),
            timestamp: Some(AUTHORITATIVE),
        });
        cells.push(CellWrite {
            row_key: page.key.clone(),
            family: INFO_FAMILY.to_string(),
            qualifier: TITLE_QUALIFIER.to_string(),
            value: CellValue::String(page.title.clone()),
            timestamp: Some(AUTHORITATIVE),
        });

        if let Some(document) = &page.document {
            cells.push(CellWrite {
                row_key: page.key.clone(),
                family: CONTENT_FAMILY.to_string(),
                qualifier: DOCUMENT_QUALIFIER.to_string(),
                value: CellValue::String(document.clone()),
                timestamp: Some(AUTHORITATIVE),
            });
        }

        for link in &page.links {
            cells.push(CellWrite {
                row_key: link.target_key.clone(),
                family: BACKLINKS_FAMILY.to_string(),
                qualifier: page.key.clone(),
                value: CellValue::String(link.text.clone()),
                timestamp: None,
            });
        }

        let count = cells.len();
        self.store.write(&self.main_table, &cells).await?;
        Ok(count)
    }

    /// Enqueues newly discovered URLs, one queue row per URL.
    ///
    /// Row keys are freshly generated uuids; uniqueness without a counter
    /// keeps concurrent writers contention-free. Returns the number of
    /// entries enqueued.
    pub async fn enqueue(&self, urls: &[String]) -> StoreResult<usize> {
        let cells: Vec<CellWrite> = urls
            .iter()
            .map(|url| CellWrite {
                row_key: Uuid::new_v4().to_string(),
                family: LINK_FAMILY.to_string(),
                qualifier: URL_QUALIFIER.to_string(),
                value: CellValue::String(url.clone()),
                timestamp: None,
            })
            .collect();

        self.store.write(&self.queue_table, &cells).await?;
        Ok(cells.len())
    }
}
