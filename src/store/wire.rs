//! Typed wire format for the store HTTP API
//!
//! Every endpoint gets explicit request/response types with exhaustive
//! variant handling; nothing is read through loose JSON casts. Response
//! shapes tolerate missing lists via `#[serde(default)]`.

use serde::{Deserialize, Serialize};

/// A typed cell value as carried on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bytes(Vec<u8>),
    Boolean(bool),
}

impl CellValue {
    /// Borrows the string payload, if this is a string cell.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }
}

/// One cell to upsert: flat form used by callers of the write path.
///
/// `timestamp` is a logical timestamp; 0 marks the value authoritative so
/// later natural-time writes to other columns on the same row do not shadow
/// it. `None` lets the store assign arrival time.
#[derive(Debug, Clone, PartialEq)]
pub struct CellWrite {
    pub row_key: String,
    pub family: String,
    pub qualifier: String,
    pub value: CellValue,
    pub timestamp: Option<i64>,
}

/// Body of `POST /v1/table/{name}/column-family`.
#[derive(Debug, Serialize)]
pub struct CreateColumnFamilyRequest<'a> {
    pub name: &'a str,
    #[serde(rename = "locality-group")]
    pub locality_group: &'a str,
}

/// Body of `POST /v1/table/{name}/rows`: point lookup by row and column.
#[derive(Debug, Serialize)]
pub struct ReadRowsRequest<'a> {
    #[serde(rename = "row-key")]
    pub row_key: &'a str,
    pub family: &'a str,
    pub qualifier: &'a str,
}

/// Body of `POST /v1/table/{name}/scan`: prefix scan with a result limit.
#[derive(Debug, Serialize)]
pub struct ScanRequest<'a> {
    pub prefix: &'a str,
    pub family: &'a str,
    pub qualifier: &'a str,
    pub limit: usize,
}

/// Body of `DELETE /v1/table/{name}/row`.
#[derive(Debug, Serialize)]
pub struct DeleteRowRequest<'a> {
    #[serde(rename = "row-key")]
    pub row_key: &'a str,
}

/// Body of `POST /v1/table/{name}/write`.
#[derive(Debug, Serialize)]
pub struct WriteRequest {
    pub rows: Vec<RowWrite>,
}

/// Cells grouped under one row key inside a write request.
#[derive(Debug, Serialize)]
pub struct RowWrite {
    pub key: String,
    pub cells: Vec<WireCell>,
}

/// One cell inside a write request row.
#[derive(Debug, Serialize)]
pub struct WireCell {
    pub family: String,
    pub qualifier: String,
    pub value: CellValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

/// Envelope shared by the rows and scan responses.
#[derive(Debug, Deserialize)]
pub struct RowsResponse {
    pub result: RowsResult,
}

#[derive(Debug, Deserialize)]
pub struct RowsResult {
    #[serde(default)]
    pub rows: Vec<WireRow>,
}

/// One row in a rows/scan response.
#[derive(Debug, Deserialize)]
pub struct WireRow {
    pub key: String,
    #[serde(default)]
    pub columns: Vec<WireColumn>,
}

/// One column of a response row, with its versioned values newest first.
#[derive(Debug, Deserialize)]
pub struct WireColumn {
    pub family: String,
    pub qualifier: String,
    #[serde(default)]
    pub cells: Vec<VersionedCell>,
}

/// A single versioned value of a response column.
#[derive(Debug, Deserialize)]
pub struct VersionedCell {
    pub value: CellValue,
    #[serde(default)]
    pub timestamp: i64,
}

impl WireRow {
    /// Returns the most recent value of the given column, if present.
    pub fn latest(&self, family: &str, qualifier: &str) -> Option<&CellValue> {
        self.columns
            .iter()
            .find(|c| c.family == family && c.qualifier == qualifier)
            .and_then(|c| c.cells.first())
            .map(|cell| &cell.value)
    }
}
