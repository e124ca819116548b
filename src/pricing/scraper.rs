use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::PriceAdapter;
use super::error::{PriceSourceError, Result};
use super::links;
use super::mock::{PriceGenerator, simulated_result};
use crate::config::ScrapingConfig;
use crate::models::{Destination, PriceLookup, PriceQuote, QuoteSource, RouteQuery, SearchResult};

/// Airline label on live quotes, the results page mixes carriers
pub const VARIOUS_AIRLINES: &str = "Various airlines";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

// "€85", "€ 85", "85 €", "85€", "1.234 €", "€1,234"
static PRICE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"€\s?(\d{1,3}(?:[.,]\d{3})+|\d{1,5})\b|\b(\d{1,3}(?:[.,]\d{3})+|\d{1,5})\s?€")
        .unwrap()
});

/// Cheapest euro amount on a page, ignoring zero amounts
#[must_use]
pub fn extract_cheapest_price(html: &str) -> Option<u32> {
    PRICE_PATTERN
        .captures_iter(html)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .filter_map(|m| m.as_str().replace(['.', ','], "").parse::<u32>().ok())
        .filter(|amount| *amount > 0)
        .min()
}

enum Variant {
    /// Estimated prices after an artificial delay
    Simulated {
        generator: PriceGenerator,
        delay: Duration,
    },
    /// Real page fetches with a fixed-delay retry loop
    Live {
        client: Client,
        retries: u32,
        retry_delay: Duration,
    },
}

/// Price source backed by the Skyscanner results page
pub struct ScraperAdapter {
    base_url: String,
    variant: Variant,
}

impl ScraperAdapter {
    /// Build the variant selected by `scraping.live`
    pub fn from_config(config: &ScrapingConfig, seed: Option<u64>) -> anyhow::Result<Self> {
        if config.live {
            let client = Client::builder()
                .timeout(config.timeout())
                .user_agent(BROWSER_USER_AGENT)
                .build()?;
            Ok(Self::live(
                client,
                &config.base_url,
                config.retries,
                config.retry_delay(),
            ))
        } else {
            Ok(Self::simulated(
                PriceGenerator::from_seed(seed),
                &config.base_url,
                Duration::from_millis(config.simulated_delay_ms),
            ))
        }
    }

    #[must_use]
    pub fn simulated(generator: PriceGenerator, base_url: &str, delay: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            variant: Variant::Simulated { generator, delay },
        }
    }

    #[must_use]
    pub fn live(client: Client, base_url: &str, retries: u32, retry_delay: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            variant: Variant::Live {
                client,
                retries: retries.max(1),
                retry_delay,
            },
        }
    }

    #[must_use]
    pub fn is_live(&self) -> bool {
        matches!(self.variant, Variant::Live { .. })
    }

    async fn fetch_page(client: &Client, url: &str) -> Result<Option<u32>> {
        let response = client
            .get(url)
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header("Accept-Language", "es-ES,es;q=0.9,en;q=0.8")
            .header("Cache-Control", "no-cache")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PriceSourceError::from_status("Skyscanner", status, &body));
        }

        let html = response.text().await?;
        Ok(extract_cheapest_price(&html))
    }

    #[instrument(skip(self, client, retry_delay))]
    async fn scrape_cheapest(
        &self,
        client: &Client,
        retries: u32,
        retry_delay: Duration,
        url: &str,
    ) -> PriceLookup {
        for attempt in 1..=retries {
            match Self::fetch_page(client, url).await {
                Ok(Some(amount)) => {
                    debug!("Found €{} on attempt {}", amount, attempt);
                    return PriceLookup::Quote(PriceQuote::priced(
                        amount,
                        VARIOUS_AIRLINES,
                        url,
                        QuoteSource::Skyscanner,
                    ));
                }
                Ok(None) => debug!("No prices on page (attempt {}/{})", attempt, retries),
                Err(e) => warn!("Scrape attempt {}/{} failed: {}", attempt, retries, e),
            }

            if attempt < retries {
                tokio::time::sleep(retry_delay).await;
            }
        }

        info!("Giving up on {} after {} attempts", url, retries);
        PriceLookup::NoData
    }
}

#[async_trait]
impl PriceAdapter for ScraperAdapter {
    fn name(&self) -> &'static str {
        "scraper"
    }

    async fn search(
        &self,
        route: &RouteQuery,
        destination: &Destination,
    ) -> anyhow::Result<SearchResult> {
        match &self.variant {
            Variant::Simulated { generator, delay } => {
                if !delay.is_zero() {
                    tokio::time::sleep(*delay).await;
                }
                Ok(simulated_result(generator, &self.base_url, route, destination))
            }
            Variant::Live {
                client,
                retries,
                retry_delay,
            } => {
                let code = destination.code.as_str();
                let url = links::skyscanner_url(&self.base_url, route, code);
                let skyscanner = self
                    .scrape_cheapest(client, *retries, *retry_delay, &url)
                    .await
                    .into_quote();

                Ok(SearchResult {
                    destination: destination.clone(),
                    skyscanner,
                    google_flights: Some(links::google_flights_link(route, code)),
                    kayak: Some(links::kayak_link(route, code)),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::test_support::{route, serve};
    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::get;
    use rstest::rstest;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[rstest]
    #[case("<span>€120</span><span>€ 85</span>", Some(85))]
    #[case("<b>desde 64 €</b> o <b>99€</b>", Some(64))]
    #[case("<p>€0 fees</p><p>€230</p>", Some(230))]
    #[case("<p>1.234 €</p><p>€1,450</p>", Some(1234))]
    #[case("<p>€1.234</p><p>980 €</p>", Some(980))]
    #[case("<p>€ 2.105,50</p>", Some(2105))]
    #[case("<p>Sin resultados</p>", None)]
    fn test_extract_cheapest_price(#[case] html: &str, #[case] expected: Option<u32>) {
        assert_eq!(extract_cheapest_price(html), expected);
    }

    fn client() -> Client {
        Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap()
    }

    fn bcn() -> Destination {
        Destination::new("BCN", "Barcelona El Prat", "Spain")
    }

    #[tokio::test]
    async fn test_simulated_variant_uses_configured_base() {
        let adapter =
            ScraperAdapter::simulated(PriceGenerator::seeded(1), "https://sky.test/", Duration::ZERO);
        let result = adapter.search(&route(), &bcn()).await.unwrap();
        let quote = result.skyscanner.unwrap();
        assert!(quote.url.starts_with("https://sky.test/transport/flights/MAD/BCN/"));
        assert!(!quote.is_placeholder());
        assert!(!adapter.is_live());
    }

    #[tokio::test]
    async fn test_live_variant_extracts_cheapest() {
        let app = Router::new().route(
            "/transport/flights/{origin}/{dest}/{start}/{end}/",
            get(|| async { "<div>€310</div><div>€ 142</div><div>€199</div>" }),
        );
        let base = serve(app).await;

        let adapter = ScraperAdapter::live(client(), &base, 1, Duration::ZERO);
        let result = adapter.search(&route(), &bcn()).await.unwrap();

        let quote = result.skyscanner.unwrap();
        assert_eq!(quote.price, "€142");
        assert_eq!(quote.airline.as_deref(), Some(VARIOUS_AIRLINES));
        assert_eq!(quote.source, QuoteSource::Skyscanner);
        assert!(quote.url.starts_with(&base));
        assert!(result.google_flights.is_some());
        assert!(result.kayak.is_some());
    }

    #[tokio::test]
    async fn test_live_variant_retries_then_succeeds() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let app = Router::new().fallback(move || {
            let counter = Arc::clone(&counter);
            async move {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    (StatusCode::SERVICE_UNAVAILABLE, String::new())
                } else {
                    (StatusCode::OK, "<i>€77</i>".to_string())
                }
            }
        });
        let base = serve(app).await;

        let adapter = ScraperAdapter::live(client(), &base, 3, Duration::from_millis(10));
        let result = adapter.search(&route(), &bcn()).await.unwrap();

        assert_eq!(result.skyscanner.unwrap().price, "€77");
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_live_variant_gives_up_after_retries() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let app = Router::new().fallback(move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                "<p>No flights</p>"
            }
        });
        let base = serve(app).await;

        let adapter = ScraperAdapter::live(client(), &base, 2, Duration::ZERO);
        let result = adapter.search(&route(), &bcn()).await.unwrap();

        assert!(result.skyscanner.is_none());
        assert!(!result.has_real_price());
        assert!(result.google_flights.is_some());
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }
}
