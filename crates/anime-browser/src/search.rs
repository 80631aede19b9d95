//! Anime search box: one-shot lookups and a debounced interactive session.

use crate::render::Dropdown;
use anime_fetch::{AnimeListResponse, Debouncer, Endpoints, RetryPolicy, RetryingClient};
use anyhow::{Context, Result};
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Shown in the dropdown whenever a search request fails
pub const SEARCH_FAILED: &str = "Failed to fetch anime data";

/// Runs title searches against `/anime?q=..`
#[derive(Clone)]
pub struct SearchService {
    client: RetryingClient,
    endpoints: Endpoints,
    limit: u32,
}

impl SearchService {
    pub fn new(client: RetryingClient, endpoints: Endpoints, limit: u32) -> Self {
        Self {
            client,
            endpoints,
            limit,
        }
    }

    /// Search for `query` and return the dropdown to show.
    ///
    /// A blank query closes the dropdown without a request. Searches are
    /// attempted once and never cached.
    pub async fn search(&self, query: &str) -> Dropdown {
        let query = query.trim();
        if query.is_empty() {
            return Dropdown::Closed;
        }

        let url = self.endpoints.search(query, self.limit);
        debug!(query = query, url = %url, "Searching");

        let response = match self.client.fetch_with_policy(&url, RetryPolicy::single()).await {
            Ok(response) => response,
            Err(e) => {
                warn!(query = query, error = %e, "Search request failed");
                return Dropdown::Error(SEARCH_FAILED.to_string());
            }
        };

        match response.json::<AnimeListResponse>() {
            Ok(mut results) => {
                results.data.truncate(self.limit as usize);
                info!(query = query, results = results.data.len(), "Search complete");
                Dropdown::Results(results.data)
            }
            Err(e) => {
                warn!(query = query, error = %e, "Search response was not understood");
                Dropdown::Error(SEARCH_FAILED.to_string())
            }
        }
    }
}

/// Drive the search box from an input stream, one line per input event.
///
/// Inputs are coalesced by a [`Debouncer`]: only the latest input after a
/// quiet period triggers a search. Each dropdown is written to `out` as it
/// changes. Returns the number of searches that ran.
pub async fn run_interactive<R, W>(
    service: &SearchService,
    quiet: Duration,
    title_max_chars: usize,
    input: R,
    out: &mut W,
) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let (query_tx, mut query_rx) = mpsc::unbounded_channel::<String>();
    let debouncer = Debouncer::new(quiet, move |query: String| {
        let _ = query_tx.send(query);
    });

    let mut lines = input.lines();
    let mut input_open = true;
    let mut searches = 0;

    while input_open {
        tokio::select! {
            line = lines.next_line() => {
                match line.context("Failed to read search input")? {
                    Some(line) => debouncer.trigger(line),
                    None => input_open = false,
                }
            }
            Some(query) = query_rx.recv() => {
                searches += show_search(service, &query, title_max_chars, out).await?;
            }
        }
    }

    // Let the last pending input fire before shutting the channel
    while debouncer.is_pending() {
        sleep(quiet).await;
    }
    drop(debouncer);

    while let Some(query) = query_rx.recv().await {
        searches += show_search(service, &query, title_max_chars, out).await?;
    }

    Ok(searches)
}

async fn show_search<W: Write>(
    service: &SearchService,
    query: &str,
    title_max_chars: usize,
    out: &mut W,
) -> Result<usize> {
    if query.trim().is_empty() {
        return Ok(0);
    }

    writeln!(out, "> {}", query.trim())?;
    write!(out, "{}", Dropdown::Loading.render(title_max_chars))?;
    let dropdown = service.search(query).await;
    write!(out, "{}", dropdown.render(title_max_chars))?;
    out.flush()?;

    Ok(1)
}
