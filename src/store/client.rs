//! Low-level HTTP adapter for the wide-column store
//!
//! One `StoreClient` serves all tables. Write requests are chunked so no
//! single request exceeds the store's assumed request-size ceiling.

use crate::store::wire::{
    CellWrite, CreateColumnFamilyRequest, DeleteRowRequest, ReadRowsRequest, RowWrite,
    RowsResponse, ScanRequest, WireCell, WireRow, WriteRequest,
};
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// Ceiling on cells per write request.
pub const MAX_CELLS_PER_WRITE: usize = 5000;

/// Errors from store HTTP calls.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Store returned {status} for {operation}: {body}")]
    Unexpected {
        status: u16,
        operation: String,
        body: String,
    },
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// HTTP client for the store API.
#[derive(Clone)]
pub struct StoreClient {
    http: Client,
    endpoint: String,
}

impl StoreClient {
    /// Creates a client for the given store endpoint.
    pub fn new(endpoint: &str) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    fn table_url(&self, table: &str, suffix: &str) -> String {
        if suffix.is_empty() {
            format!("{}/v1/table/{}", self.endpoint, table)
        } else {
            format!("{}/v1/table/{}/{}", self.endpoint, table, suffix)
        }
    }

    /// Creates a table. A conflict response means the table already exists
    /// and counts as success.
    pub async fn create_table(&self, table: &str) -> StoreResult<()> {
        let response = self.http.put(self.table_url(table, "")).send().await?;
        self.expect_success_or_conflict(response, "create_table").await
    }

    /// Creates a column family in its locality group. HTTP 409 means it is
    /// already provisioned and counts as success.
    pub async fn create_column_family(
        &self,
        table: &str,
        family: &str,
        locality_group: &str,
    ) -> StoreResult<()> {
        let body = CreateColumnFamilyRequest {
            name: family,
            locality_group,
        };
        let response = self
            .http
            .post(self.table_url(table, "column-family"))
            .json(&body)
            .send()
            .await?;
        self.expect_success_or_conflict(response, "create_column_family")
            .await
    }

    /// Point lookup: the rows holding the given column for the given key.
    pub async fn read_row(
        &self,
        table: &str,
        key: &str,
        family: &str,
        qualifier: &str,
    ) -> StoreResult<Vec<WireRow>> {
        let body = ReadRowsRequest {
            row_key: key,
            family,
            qualifier,
        };
        let response = self
            .http
            .post(self.table_url(table, "rows"))
            .json(&body)
            .send()
            .await?;
        let response = self.expect_success(response, "read_row").await?;
        let parsed: RowsResponse = response.json().await?;
        Ok(parsed.result.rows)
    }

    /// Prefix scan returning up to `limit` rows. Row order is whatever the
    /// store returns; callers must not assume FIFO.
    pub async fn scan(
        &self,
        table: &str,
        prefix: &str,
        family: &str,
        qualifier: &str,
        limit: usize,
    ) -> StoreResult<Vec<WireRow>> {
        let body = ScanRequest {
            prefix,
            family,
            qualifier,
            limit,
        };
        let response = self
            .http
            .post(self.table_url(table, "scan"))
            .json(&body)
            .send()
            .await?;
        let response = self.expect_success(response, "scan").await?;
        let parsed: RowsResponse = response.json().await?;
        Ok(parsed.result.rows)
    }

    /// Deletes a full row. Deleting an absent row is not an error.
    pub async fn delete_row(&self, table: &str, key: &str) -> StoreResult<()> {
        let body = DeleteRowRequest { row_key: key };
        let response = self
            .http
            .delete(self.table_url(table, "row"))
            .json(&body)
            .send()
            .await?;
        self.expect_success(response, "delete_row").await?;
        Ok(())
    }

    /// Upserts cells, splitting them into requests of at most
    /// [`MAX_CELLS_PER_WRITE`] cells each. Returns the number of requests
    /// issued.
    pub async fn write(&self, table: &str, cells: &[CellWrite]) -> StoreResult<usize> {
        if cells.is_empty() {
            return Ok(0);
        }

        let mut requests = 0;
        for chunk in cells.chunks(MAX_CELLS_PER_WRITE) {
            let body = WriteRequest {
                rows: group_rows(chunk),
            };
            let response = self
                .http
                .post(self.table_url(table, "write"))
                .json(&body)
                .send()
                .await?;
            self.expect_success(response, "write").await?;
            requests += 1;
        }

        Ok(requests)
    }

    async fn expect_success(&self, response: Response, operation: &str) -> StoreResult<Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(self.unexpected(response, operation).await)
        }
    }

    async fn expect_success_or_conflict(
        &self,
        response: Response,
        operation: &str,
    ) -> StoreResult<()> {
        let status = response.status();
        if status.is_success() || status == StatusCode::CONFLICT {
            Ok(())
        } else {
            Err(self.unexpected(response, operation).await)
        }
    }

    async fn unexpected(&self, response: Response, operation: &str) -> StoreError {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<body unavailable>".to_string());
        StoreError::Unexpected {
            status,
            operation: operation.to_string(),
            body,
        }
    }
}

/// Groups a chunk of flat cells into per-row writes, preserving arrival
/// order. Cells for the same row arrive adjacent from the page-store layer,
/// so adjacency grouping is enough.
fn group_rows(cells: &[CellWrite]) -> Vec<RowWrite> {
    let mut rows: Vec<RowWrite> = Vec::new();

    for cell in cells {
        let wire = WireCell {
            family: cell.family.clone(),
            qualifier: cell.qualifier.clone(),
            value: cell.value.clone(),
            timestamp: cell.timestamp,
        };

        match rows.last_mut() {
            Some(row) if row.key == cell.row_key => row.cells.push(wire),
            _ => rows.push(RowWrite {
                key: cell.row_key.clone(),
                cells: vec![wire],
            }),
        }
    }

    rows
}
