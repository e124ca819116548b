use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Client;
use std::sync::Arc;
use tracing::{debug, info};

use super::PriceAdapter;
use super::fare_apis::{AmadeusApi, AviationStackApi, FareApi, KiwiApi};
use super::links;
use super::mock::PriceGenerator;
use crate::config::ApisConfig;
use crate::models::{Destination, PriceLookup, PriceQuote, QuoteSource, RouteQuery, SearchResult};

/// Fare range for the simulated fallback quote
pub const FALLBACK_FARE_RANGE: std::ops::Range<u32> = 100..300;

/// Airlines for the simulated fallback quote
pub const FALLBACK_AIRLINES: [&str; 5] =
    ["Iberia", "Ryanair", "Vueling", "Air Europa", "British Airways"];

/// Queries every configured fare API concurrently and keeps the first
/// quote in provider priority order
pub struct ApiAggregator {
    providers: Vec<Arc<dyn FareApi>>,
    generator: Arc<PriceGenerator>,
}

impl ApiAggregator {
    #[must_use]
    pub fn new(providers: Vec<Arc<dyn FareApi>>, generator: Arc<PriceGenerator>) -> Self {
        Self {
            providers,
            generator,
        }
    }

    /// Providers that are enabled and have credentials, in priority order
    pub fn from_config(config: &ApisConfig, seed: Option<u64>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(format!("FlightIdeas/{}", crate::VERSION))
            .build()?;
        let generator = Arc::new(PriceGenerator::from_seed(seed));
        let mut providers: Vec<Arc<dyn FareApi>> = Vec::new();

        let aviation = &config.aviation_stack;
        match (aviation.enabled, aviation.api_key.as_deref()) {
            (true, Some(key)) => providers.push(Arc::new(AviationStackApi::new(
                client.clone(),
                key,
                &aviation.base_url,
                Arc::clone(&generator),
            ))),
            (true, None) => info!("Aviation Stack enabled but no API key configured, skipping"),
            _ => {}
        }

        let amadeus = &config.amadeus;
        match (
            amadeus.enabled,
            amadeus.client_id.as_deref(),
            amadeus.client_secret.as_deref(),
        ) {
            (true, Some(id), Some(secret)) => providers.push(Arc::new(AmadeusApi::new(
                client.clone(),
                id,
                secret,
                &amadeus.base_url,
            ))),
            (true, _, _) => info!("Amadeus enabled but credentials are incomplete, skipping"),
            _ => {}
        }

        let kiwi = &config.kiwi;
        match (kiwi.enabled, kiwi.api_key.as_deref()) {
            (true, Some(key)) => {
                providers.push(Arc::new(KiwiApi::new(client, key, &kiwi.base_url)));
            }
            (true, None) => info!("Kiwi enabled but no API key configured, skipping"),
            _ => {}
        }

        debug!(
            "Fare APIs active: {:?}",
            providers.iter().map(|p| p.name()).collect::<Vec<_>>()
        );

        Ok(Self::new(providers, generator))
    }

    #[must_use]
    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    fn fallback_quote(&self, route: &RouteQuery, destination: &str) -> PriceQuote {
        PriceQuote::priced(
            self.generator.fare_in(FALLBACK_FARE_RANGE),
            self.generator.pick(&FALLBACK_AIRLINES),
            links::google_flights_url(route, destination),
            QuoteSource::Simulated,
        )
    }

    /// Best quote for one destination, simulated when no provider answers
    pub async fn best_quote(&self, route: &RouteQuery, destination: &str) -> PriceQuote {
        let lookups = join_all(
            self.providers
                .iter()
                .map(|provider| provider.lookup(route, destination)),
        )
        .await;

        lookups
            .into_iter()
            .find_map(PriceLookup::into_quote)
            .unwrap_or_else(|| {
                debug!("No fare API answered for {}, simulating", destination);
                self.fallback_quote(route, destination)
            })
    }
}

#[async_trait]
impl PriceAdapter for ApiAggregator {
    fn name(&self) -> &'static str {
        "apis"
    }

    async fn search(
        &self,
        route: &RouteQuery,
        destination: &Destination,
    ) -> anyhow::Result<SearchResult> {
        let code = destination.code.as_str();
        let quote = self.best_quote(route, code).await;

        Ok(SearchResult {
            destination: destination.clone(),
            skyscanner: Some(quote),
            google_flights: Some(links::google_flights_link(route, code)),
            kayak: Some(links::kayak_link(route, code)),
        })
    }
}
