//! Crawl orchestrator - main crawl loop and per-attempt state machine
//!
//! The orchestrator drains the frontier in bounded-size batches, fans out
//! concurrent per-URL crawl attempts, and reseeds from the entry point when
//! the frontier runs dry. Its core contract: a queue entry's lifecycle ends
//! after exactly one attempt, regardless of outcome. There is no automatic
//! retry; permanent failures go to the blacklist instead.

use crate::blacklist::Blacklist;
use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, fetch_page, FetchOutcome};
use crate::crawler::parser::extract_document;
use crate::store::{FrontierClient, PageStoreClient, PageWrite, QueueEntry, StoreClient};
use crate::url::{canonicalize_url, LinkFilter};
use crate::BackmapError;
use futures::future::join_all;
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Terminal state of one crawl attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// URL is on the blacklist; nothing was fetched
    Blacklisted,

    /// URL could not be parsed or keyed; skipped
    Malformed,

    /// Page record already exists and the attempt was not forced
    AlreadyKnown,

    /// Fetch exceeded its time budget; URL was blacklisted
    TimedOut,

    /// Connection-level failure; URL was blacklisted
    TransportFailed,

    /// Non-2xx response; URL blacklisted unless the status was 404
    HttpFailure(u16),

    /// 2xx response that was not HTML; skipped, not blacklisted
    NonHtml,

    /// A store call failed mid-attempt; logged, attempt abandoned
    StoreFailed,

    /// Page fetched, written, and its links enqueued
    Crawled {
        /// Outbound links that survived the filter
        links: usize,
    },
}

/// Drives the whole crawl: rounds, fan-out, and attempt policy.
pub struct Orchestrator {
    config: Arc<Config>,
    client: Client,
    frontier: FrontierClient,
    pages: PageStoreClient,
    blacklist: Arc<Blacklist>,
    filter: LinkFilter,
    timeout: Duration,
}

impl Orchestrator {
    /// Creates an orchestrator from validated configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `blacklist` - The loaded process-wide blacklist
    /// * `store` - Store client, already provisioned by the caller
    pub fn new(
        config: Config,
        blacklist: Arc<Blacklist>,
        store: StoreClient,
    ) -> Result<Self, BackmapError> {
        let client = build_http_client(&config.user_agent)?;

        let scope_root = config
            .crawler
            .scope_root
            .as_deref()
            .map(Url::parse)
            .transpose()?;
        let filter = LinkFilter::new(scope_root.as_ref(), config.crawler.store_sub_pages);

        let frontier = FrontierClient::new(store.clone(), config.store.queue_table.clone());
        let pages = PageStoreClient::new(
            store,
            config.store.main_table.clone(),
            config.store.queue_table.clone(),
        );

        let timeout = Duration::from_millis(config.crawler.fetch_timeout_ms);

        Ok(Self {
            config: Arc::new(config),
            client,
            frontier,
            pages,
            blacklist,
            filter,
            timeout,
        })
    }

    /// Runs the bounded outer loop.
    ///
    /// Each round pops a batch of `parallelism` entries and crawls them
    /// concurrently behind a join barrier; an empty batch triggers one
    /// forced crawl of the entry point to reseed the frontier. Round
    /// failures are logged and the loop proceeds; exhausting `max-rounds`
    /// is the normal termination, not an error.
    pub async fn run(&self) -> Result<(), BackmapError> {
        let max_rounds = self.config.crawler.max_rounds;
        tracing::info!(
            "Starting crawl: seed {}, parallelism {}, {} rounds",
            self.config.crawler.seed_url,
            self.config.crawler.parallelism,
            max_rounds
        );

        let start = Instant::now();
        let mut crawled = 0usize;

        for round in 1..=max_rounds {
            match self.run_round(round).await {
                Ok(count) => crawled += count,
                Err(e) => tracing::error!("Round {} failed: {}", round, e),
            }
        }

        tracing::info!(
            "Crawl finished: {} pages crawled over {} rounds in {:?}",
            crawled,
            max_rounds,
            start.elapsed()
        );

        Ok(())
    }

    /// Runs one round. Returns the number of pages crawled in it.
    async fn run_round(&self, round: u32) -> Result<usize, BackmapError> {
        let batch = self
            .frontier
            .pop_batch(self.config.crawler.parallelism)
            .await?;

        if batch.is_empty() {
            tracing::info!("Round {}: frontier empty, force-crawling entry point", round);
            let outcome = self
                .crawl_url(&self.config.crawler.seed_url, true)
                .await;
            return Ok(matches!(outcome, AttemptOutcome::Crawled { .. }) as usize);
        }

        tracing::info!("Round {}: crawling {} entries", round, batch.len());

        // Batch barrier: the next round starts only after every attempt in
        // this one has finished.
        let outcomes = join_all(batch.iter().map(|entry| self.process_entry(entry))).await;

        Ok(outcomes
            .iter()
            .filter(|o| matches!(o, AttemptOutcome::Crawled { .. }))
            .count())
    }

    /// Crawls one popped entry and then removes it from the frontier.
    ///
    /// The removal happens exactly once per entry, after the attempt has
    /// reached a terminal state, success and every failure mode alike.
    async fn process_entry(&self, entry: &QueueEntry) -> AttemptOutcome {
        let outcome = self.crawl_url(&entry.url, false).await;

        if let Err(e) = self.frontier.remove_entry(&entry.id).await {
            tracing::error!("Failed to remove queue entry {}: {}", entry.id, e);
        }

        outcome
    }

    /// Runs the per-attempt state machine for one URL.
    ///
    /// A forced attempt (the entry-point reseed) bypasses the already-known
    /// probe; everything else is identical. Failures never escape: each maps
    /// to a terminal outcome and, where policy says so, a blacklist entry.
    pub async fn crawl_url(&self, url: &str, forced: bool) -> AttemptOutcome {
        if self.blacklist.contains(url) {
            tracing::debug!("Skipping blacklisted {}", url);
            return AttemptOutcome::Blacklisted;
        }

        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Malformed URL {}: {}", url, e);
                return AttemptOutcome::Malformed;
            }
        };

        let key = match canonicalize_url(&parsed, self.config.crawler.store_sub_pages) {
            Ok(key) => key,
            Err(e) => {
                tracing::warn!("Cannot key URL {}: {}", url, e);
                return AttemptOutcome::Malformed;
            }
        };

        if !forced {
            match self.pages.page_exists(&key).await {
                Ok(true) => {
                    tracing::debug!("Already crawled {}, skipping", url);
                    return AttemptOutcome::AlreadyKnown;
                }
                Ok(false) => {}
                Err(e) => {
                    tracing::error!("Existence probe failed for {}: {}", url, e);
                    return AttemptOutcome::StoreFailed;
                }
            }
        }

        tracing::info!("Fetching {}", url);

        match fetch_page(&self.client, url, self.timeout).await {
            FetchOutcome::Timeout => {
                tracing::warn!("Fetch timed out for {}", url);
                self.blacklist_url(url);
                AttemptOutcome::TimedOut
            }

            FetchOutcome::Transport { error } => {
                tracing::warn!("Transport failure for {}: {}", url, error);
                self.blacklist_url(url);
                AttemptOutcome::TransportFailed
            }

            FetchOutcome::HttpError { status_code } => {
                tracing::warn!("HTTP {} for {}", status_code, url);
                // A 404 is a dead link on the page that referenced it; any
                // other non-2xx retires the URL permanently.
                if status_code != 404 {
                    self.blacklist_url(url);
                }
                AttemptOutcome::HttpFailure(status_code)
            }

            FetchOutcome::NonHtml { content_type } => {
                tracing::info!("Skipping non-HTML {} ({})", url, content_type);
                AttemptOutcome::NonHtml
            }

            FetchOutcome::Success { body, .. } => self.store_page(&parsed, &key, body).await,
        }
    }

    /// Extracts, filters, writes, and enqueues for a fetched page.
    async fn store_page(&self, base: &Url, key: &str, body: String) -> AttemptOutcome {
        let document = extract_document(&body);
        let links = self.filter.filter(base, &document.anchors);

        let page = PageWrite {
            key: key.to_string(),
            language: document.language,
            title: document.title,
            document: self.config.crawler.store_full_document.then_some(body),
            links,
        };

        let cells = match self.pages.write_page(&page).await {
            Ok(cells) => cells,
            Err(e) => {
                tracing::error!("Page write failed for {}: {}", key, e);
                return AttemptOutcome::StoreFailed;
            }
        };

        // Blacklisted URLs are excluded from re-enqueue consideration; their
        // backlink cells are still recorded above.
        let discovered: Vec<String> = page
            .links
            .iter()
            .filter(|link| !self.blacklist.contains(link.url.as_str()))
            .map(|link| link.url.to_string())
            .collect();

        match self.pages.enqueue(&discovered).await {
            Ok(enqueued) => {
                tracing::info!(
                    "Stored {} ({} cells written), enqueued {} links",
                    key,
                    cells,
                    enqueued
                );
                AttemptOutcome::Crawled {
                    links: page.links.len(),
                }
            }
            Err(e) => {
                tracing::error!("Enqueue failed for {}: {}", key, e);
                AttemptOutcome::StoreFailed
            }
        }
    }

    fn blacklist_url(&self, url: &str) {
        if let Err(e) = self.blacklist.insert(url) {
            tracing::error!("Failed to persist blacklist entry {}: {}", url, e);
        }
    }
}
