//! The four home page datasets and their independent startup loads.

use anime_fetch::{AnimeListResponse, AnimeRecord, CachedFetcher, Endpoints};
use shared::config::PageConfig;
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// A region of the home page backed by one cached dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Carousel,
    Trending,
    Recent,
    Upcoming,
}

impl Section {
    /// Page order
    pub const ALL: [Section; 4] = [
        Section::Carousel,
        Section::Trending,
        Section::Recent,
        Section::Upcoming,
    ];

    /// Logical dataset key in the persistent store
    pub fn cache_key(&self) -> &'static str {
        match self {
            Section::Carousel => "carousel",
            Section::Trending => "trending",
            Section::Recent => "recent",
            Section::Upcoming => "upcoming",
        }
    }

    pub fn heading(&self) -> &'static str {
        match self {
            Section::Carousel => "Top Anime",
            Section::Trending => "Trending",
            Section::Recent => "Recently Aired",
            Section::Upcoming => "Upcoming",
        }
    }

    pub fn url(&self, endpoints: &Endpoints, page: &PageConfig) -> String {
        match self {
            Section::Carousel => endpoints.top_anime(page.carousel_limit),
            Section::Trending => endpoints.top_anime(page.section_limit),
            Section::Recent => endpoints.season_now(page.section_limit),
            Section::Upcoming => endpoints.season_upcoming(page.section_limit),
        }
    }
}

/// What a section load produced
#[derive(Debug, Clone)]
pub enum SectionOutcome {
    Loaded(Vec<AnimeRecord>),
    /// No data; the region is skipped
    Unavailable,
}

/// Load one section through the cache
pub async fn load_section(
    fetcher: &CachedFetcher,
    endpoints: &Endpoints,
    page: &PageConfig,
    section: Section,
) -> SectionOutcome {
    let url = section.url(endpoints, page);

    let Some(value) = fetcher.get(&url, section.cache_key()).await else {
        warn!(section = section.cache_key(), "No data available, skipping section");
        return SectionOutcome::Unavailable;
    };

    match serde_json::from_value::<AnimeListResponse>(value) {
        Ok(response) => {
            debug!(
                section = section.cache_key(),
                items = response.data.len(),
                "Section loaded"
            );
            SectionOutcome::Loaded(response.data)
        }
        Err(e) => {
            warn!(
                section = section.cache_key(),
                error = %e,
                "Cached payload is not an anime list, skipping section"
            );
            SectionOutcome::Unavailable
        }
    }
}

/// A section load running in the background
pub struct PendingSection {
    pub section: Section,
    receiver: oneshot::Receiver<SectionOutcome>,
}

impl PendingSection {
    /// Wait for the load to report; a load that died reports nothing
    pub async fn outcome(self) -> SectionOutcome {
        let section = self.section;
        self.receiver.await.unwrap_or_else(|_| {
            warn!(section = section.cache_key(), "Section load ended without reporting");
            SectionOutcome::Unavailable
        })
    }
}

/// Start every section load as its own task.
///
/// Loads are independent and unordered; each reports on its own channel.
pub fn dispatch_all(
    fetcher: &CachedFetcher,
    endpoints: &Endpoints,
    page: &PageConfig,
) -> Vec<PendingSection> {
    Section::ALL
        .iter()
        .map(|&section| {
            let (tx, receiver) = oneshot::channel();
            let fetcher = fetcher.clone();
            let endpoints = endpoints.clone();
            let page = page.clone();

            tokio::spawn(async move {
                let outcome = load_section(&fetcher, &endpoints, &page, section).await;
                let _ = tx.send(outcome);
            });

            PendingSection { section, receiver }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{list_body, RoutedTransport};
    use anime_fetch::{KeyValueStore, MemoryStore, RetryPolicy, RetryingClient, JIKAN_BASE_URL};
    use std::sync::Arc;
    use std::time::Duration;

    fn fetcher(transport: &Arc<RoutedTransport>, store: &Arc<MemoryStore>) -> CachedFetcher {
        let client = RetryingClient::new(
            transport.clone(),
            RetryPolicy::new(3, Duration::from_millis(1000)),
        );
        CachedFetcher::new(store.clone(), client)
    }

    fn endpoints() -> Endpoints {
        Endpoints::new(JIKAN_BASE_URL).unwrap()
    }

    #[test]
    fn test_section_keys_and_urls() {
        let page = PageConfig::default();
        let endpoints = endpoints();

        let keys: Vec<&str> = Section::ALL.iter().map(|s| s.cache_key()).collect();
        assert_eq!(keys, vec!["carousel", "trending", "recent", "upcoming"]);

        assert_eq!(
            Section::Carousel.url(&endpoints, &page),
            "https://api.jikan.moe/v4/top/anime?limit=10"
        );
        assert_eq!(
            Section::Trending.url(&endpoints, &page),
            "https://api.jikan.moe/v4/top/anime?limit=6"
        );
        assert_eq!(
            Section::Recent.url(&endpoints, &page),
            "https://api.jikan.moe/v4/seasons/now?limit=6"
        );
        assert_eq!(
            Section::Upcoming.url(&endpoints, &page),
            "https://api.jikan.moe/v4/seasons/upcoming?limit=6"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_section_decodes_and_caches() {
        let transport = Arc::new(
            RoutedTransport::new().route("seasons/now", 200, &list_body(&["Frieren", "Dandadan"])),
        );
        let store = Arc::new(MemoryStore::new());
        let fetcher = fetcher(&transport, &store);

        let outcome = load_section(&fetcher, &endpoints(), &PageConfig::default(), Section::Recent).await;

        match outcome {
            SectionOutcome::Loaded(records) => {
                assert_eq!(records.len(), 2);
                assert_eq!(records[1].title, "Dandadan");
            }
            SectionOutcome::Unavailable => panic!("expected data"),
        }
        assert!(store.read("recent").unwrap().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unexpected_payload_is_unavailable() {
        let transport = Arc::new(RoutedTransport::new());
        let store = Arc::new(MemoryStore::new());
        store.write("upcoming", r#"{"data":"maintenance"}"#).unwrap();
        let fetcher = fetcher(&transport, &store);

        let outcome =
            load_section(&fetcher, &endpoints(), &PageConfig::default(), Section::Upcoming).await;

        assert!(matches!(outcome, SectionOutcome::Unavailable));
        assert!(transport.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispatch_reports_each_section_independently() {
        let transport = Arc::new(
            RoutedTransport::new()
                .route("top/anime?limit=10", 200, &list_body(&["A", "B", "C"]))
                .route("top/anime?limit=6", 200, &list_body(&["T"]))
                .route("seasons/now", 500, "")
                .route("seasons/upcoming", 200, &list_body(&["U1", "U2"])),
        );
        let store = Arc::new(MemoryStore::new());
        let fetcher = fetcher(&transport, &store);

        let pending = dispatch_all(&fetcher, &endpoints(), &PageConfig::default());
        let mut loaded = Vec::new();
        for p in pending {
            let section = p.section;
            if let SectionOutcome::Loaded(records) = p.outcome().await {
                loaded.push((section, records.len()));
            }
        }

        assert_eq!(
            loaded,
            vec![
                (Section::Carousel, 3),
                (Section::Trending, 1),
                (Section::Upcoming, 2)
            ]
        );
        // The failing section used its whole retry budget and cached nothing
        let recent_calls = transport
            .calls()
            .iter()
            .filter(|url| url.contains("seasons/now"))
            .count();
        assert_eq!(recent_calls, 3);
        assert!(store.read("recent").unwrap().is_none());
        assert_eq!(store.entries().unwrap().len(), 3);
    }
}
