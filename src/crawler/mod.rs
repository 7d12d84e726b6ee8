//! Crawler module: fetching, document extraction, and crawl orchestration
//!
//! This module contains the crawl control loop and its collaborators:
//! - bounded-time HTTP fetching with outcome classification
//! - HTML document extraction (language, title, anchors)
//! - the round-based orchestrator enforcing the at-most-once attempt
//!   contract for queue entries

mod fetcher;
mod orchestrator;
mod parser;

pub use fetcher::{build_http_client, fetch_page, FetchOutcome, DEFAULT_FETCH_TIMEOUT};
pub use orchestrator::{AttemptOutcome, Orchestrator};
pub use parser::{extract_document, Anchor, ExtractedDocument};
