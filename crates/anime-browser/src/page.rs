//! Home page assembly.

use crate::context::AppContext;
use crate::render::{render_cards, Carousel};
use crate::sections::{dispatch_all, Section, SectionOutcome};
use anyhow::Result;
use std::io::Write;
use tracing::info;

/// What the home page ended up showing
#[derive(Debug, Default)]
pub struct HomeReport {
    /// Hero carousel, when its dataset loaded
    pub carousel: Option<Carousel>,
    /// Regions skipped for lack of data
    pub unavailable: Vec<Section>,
}

/// Load every section and write the page to `out` in page order
pub async fn render_home<W: Write>(ctx: &AppContext, out: &mut W) -> Result<HomeReport> {
    let page = &ctx.config.page;
    let pending = dispatch_all(&ctx.fetcher, &ctx.endpoints, page);

    let mut report = HomeReport::default();
    for load in pending {
        let section = load.section;
        match load.outcome().await {
            SectionOutcome::Loaded(records) if section == Section::Carousel => {
                let carousel = Carousel::new(records, page.carousel_limit as usize);
                writeln!(out, "{}", carousel.render())?;
                report.carousel = Some(carousel);
            }
            SectionOutcome::Loaded(records) => {
                writeln!(out, "{}", render_cards(section.heading(), &records))?;
            }
            SectionOutcome::Unavailable => report.unavailable.push(section),
        }
    }
    out.flush()?;

    info!(
        unavailable = report.unavailable.len(),
        "Home page rendered"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{list_body, RoutedTransport};
    use anime_fetch::{KeyValueStore, MemoryStore};
    use shared::Config;
    use std::sync::Arc;

    fn context(transport: &Arc<RoutedTransport>, store: &Arc<MemoryStore>) -> AppContext {
        let mut config = Config::default();
        config.api.retry_delay_ms = 10;
        AppContext::with_parts(config, store.clone(), transport.clone()).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_home_renders_regions_in_page_order() {
        let transport = Arc::new(
            RoutedTransport::new()
                .route("top/anime?limit=10", 200, &list_body(&["Hero One", "Hero Two"]))
                .route("top/anime?limit=6", 200, &list_body(&["Trend"]))
                .route("seasons/now", 200, &list_body(&["Now"]))
                .route("seasons/upcoming", 200, &list_body(&["Soon"])),
        );
        let store = Arc::new(MemoryStore::new());
        let ctx = context(&transport, &store);
        let mut out = Vec::new();

        let report = render_home(&ctx, &mut out).await.unwrap();
        let text = String::from_utf8(out).unwrap();

        let order: Vec<usize> = ["== Top Anime ==", "== Trending ==", "== Recently Aired ==", "== Upcoming =="]
            .iter()
            .map(|heading| text.find(heading).unwrap())
            .collect();
        assert!(order.windows(2).all(|w| w[0] < w[1]));
        assert!(text.contains(">  1. Hero One"));
        assert!(report.unavailable.is_empty());
        assert_eq!(report.carousel.unwrap().len(), 2);
        assert_eq!(store.entries().unwrap().len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_load_is_served_from_cache() {
        let transport = Arc::new(
            RoutedTransport::new()
                .route("top/anime", 200, &list_body(&["Cached"]))
                .route("seasons", 200, &list_body(&["Cached"])),
        );
        let store = Arc::new(MemoryStore::new());
        let ctx = context(&transport, &store);

        render_home(&ctx, &mut Vec::new()).await.unwrap();
        assert_eq!(transport.calls().len(), 4);

        render_home(&ctx, &mut Vec::new()).await.unwrap();
        assert_eq!(transport.calls().len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unavailable_sections_are_skipped() {
        let transport = Arc::new(
            RoutedTransport::new().route("seasons/upcoming", 200, &list_body(&["Soon"])),
        );
        let store = Arc::new(MemoryStore::new());
        let ctx = context(&transport, &store);
        let mut out = Vec::new();

        let report = render_home(&ctx, &mut out).await.unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(
            report.unavailable,
            vec![Section::Carousel, Section::Trending, Section::Recent]
        );
        assert!(report.carousel.is_none());
        assert!(!text.contains("Top Anime"));
        assert!(text.contains("== Upcoming =="));
    }
}
