use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

use super::PriceAdapter;
use super::aggregator::ApiAggregator;
use super::mock::{MockPriceAdapter, PriceGenerator};
use super::scraper::ScraperAdapter;
use crate::config::FlightIdeasConfig;
use crate::formatter::{ModeInfo, PriceSummary};
use crate::models::{Destination, Mode, RouteQuery, SearchRequest, SearchResponse, SearchResult};

/// Routes a search to the price adapters selected by the configured mode
pub struct ModeResolver {
    config: FlightIdeasConfig,
    mock: Arc<dyn PriceAdapter>,
    scraper: Arc<dyn PriceAdapter>,
    apis: Arc<dyn PriceAdapter>,
}

impl ModeResolver {
    /// Build every adapter from configuration
    pub fn new(config: FlightIdeasConfig) -> anyhow::Result<Self> {
        let seed = config.mock.seed;
        let mock = MockPriceAdapter::new(
            PriceGenerator::from_seed(seed),
            Duration::from_millis(config.mock.delay_ms),
        );
        let scraper = ScraperAdapter::from_config(&config.scraping, seed)?;
        let apis = ApiAggregator::from_config(&config.apis, seed)?;

        info!(
            "Price resolver ready (mode: {}, live scraper: {}, fare APIs: {:?})",
            config.mode(),
            scraper.is_live(),
            apis.provider_names()
        );

        Ok(Self::with_adapters(
            config,
            Arc::new(mock),
            Arc::new(scraper),
            Arc::new(apis),
        ))
    }

    /// Resolver over caller-supplied adapters
    #[must_use]
    pub fn with_adapters(
        config: FlightIdeasConfig,
        mock: Arc<dyn PriceAdapter>,
        scraper: Arc<dyn PriceAdapter>,
        apis: Arc<dyn PriceAdapter>,
    ) -> Self {
        Self {
            config,
            mock,
            scraper,
            apis,
        }
    }

    #[must_use]
    pub fn config(&self) -> &FlightIdeasConfig {
        &self.config
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.config.mode()
    }

    #[must_use]
    pub fn mode_info(&self) -> ModeInfo {
        ModeInfo::new(self.mode(), &self.config.logging)
    }

    /// Price every destination with the configured mode
    pub async fn get_flight_prices(&self, request: &SearchRequest) -> SearchResponse {
        self.get_flight_prices_with_mode(request, self.mode()).await
    }

    /// Price every destination with an explicit mode.
    ///
    /// Never fails: an error escaping the selected path re-runs the whole
    /// request against the mock adapter.
    #[instrument(skip(self, request), fields(origin = %request.origin, destinations = request.destinations.len()))]
    pub async fn get_flight_prices_with_mode(
        &self,
        request: &SearchRequest,
        mode: Mode,
    ) -> SearchResponse {
        info!("Searching flights from {} in {} mode", request.origin, mode);
        let route = request.route();

        let results = match self.run_mode(mode, &route, &request.destinations).await {
            Ok(results) => results,
            Err(e) => {
                warn!("{} mode failed, falling back to mock prices: {:#}", mode, e);
                self.mock_fallback(&route, &request.destinations).await
            }
        };

        PriceSummary::from_results(&results).log(&self.config.logging, &results);
        SearchResponse::new(results, mode)
    }

    async fn run_mode(
        &self,
        mode: Mode,
        route: &RouteQuery,
        destinations: &[Destination],
    ) -> anyhow::Result<Vec<SearchResult>> {
        match mode {
            Mode::Mock => self.mock.search_all(route, destinations).await,
            Mode::Scraper => self.scraper.search_all(route, destinations).await,
            Mode::Apis => self.apis.search_all(route, destinations).await,
            Mode::Hybrid => self.hybrid(route, destinations).await,
        }
    }

    async fn hybrid(
        &self,
        route: &RouteQuery,
        destinations: &[Destination],
    ) -> anyhow::Result<Vec<SearchResult>> {
        for stage in [&self.apis, &self.scraper] {
            let results = stage.search_all(route, destinations).await?;
            let priced = results.iter().filter(|r| r.has_real_price()).count();
            if priced > 0 {
                info!("Hybrid: {} produced {} real prices", stage.name(), priced);
                return Ok(results);
            }
            info!("Hybrid: {} produced no real prices, trying next source", stage.name());
        }

        self.mock.search_all(route, destinations).await
    }

    async fn mock_fallback(&self, route: &RouteQuery, destinations: &[Destination]) -> Vec<SearchResult> {
        match self.mock.search_all(route, destinations).await {
            Ok(results) => results,
            Err(e) => {
                error!("Mock fallback failed, returning empty results: {:#}", e);
                destinations.iter().cloned().map(SearchResult::empty).collect()
            }
        }
    }
}
