//! Concurrent aggregator for detail-page fetches
//!
//! Drives the fetch+extract pair over a bounded pool of in-flight
//! requests and collects only the successful extractions. Failed tasks
//! are logged and dropped; one task's failure never affects its
//! siblings.

use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tracing::warn;

use crate::parser::{parse_movie_detail, MovieRecord};
use crate::scraper::{Fetcher, ScraperError};

/// Maximum detail fetches in flight at once
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Per-task timeout for one detail page fetch
pub const DETAIL_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Map a deduplicated link set to movie records, best effort
///
/// Dispatches one fetch+extract task per link with at most `concurrency`
/// fetches in flight. A failed fetch drops that link's record; the
/// output carries no ordering guarantee and is returned only after all
/// tasks have completed.
///
/// Generic over the fetch function so tests can substitute an
/// instrumented stub for the real HTTP client.
pub async fn aggregate<F, Fut>(
    links: HashSet<String>,
    concurrency: usize,
    base_url: &str,
    fetch: F,
) -> Vec<MovieRecord>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<String, ScraperError>>,
{
    let fetch = &fetch;

    stream::iter(links)
        .map(|link| async move {
            match fetch(link.clone()).await {
                Ok(html) => Some(parse_movie_detail(&html, base_url)),
                Err(e) => {
                    warn!("Dropping detail page {}: {}", link, e);
                    None
                }
            }
        })
        .buffer_unordered(concurrency.max(1))
        .filter_map(|record| async { record })
        .collect()
        .await
}

/// Aggregate detail pages through the real fetcher with default bounds
pub async fn collect_movie_records(
    fetcher: &Fetcher,
    links: HashSet<String>,
    base_url: &str,
) -> Vec<MovieRecord> {
    aggregate(links, DEFAULT_CONCURRENCY, base_url, |url| async move {
        fetcher.fetch_page_timeout(&url, DETAIL_FETCH_TIMEOUT).await
    })
    .await
}
