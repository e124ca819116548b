//! Price sources and the resolver that chooses between them
//!
//! Every source implements [`PriceAdapter`] and answers with one
//! [`SearchResult`] per destination. Missing data shows up as empty or
//! placeholder quotes, never as an error; the adapter `Result` is kept for
//! infrastructure failures, which [`ModeResolver`] answers by falling back to
//! [`MockPriceAdapter`].

pub mod aggregator;
pub mod error;
pub mod fare_apis;
pub mod links;
pub mod mock;
pub mod resolver;
pub mod scraper;

use async_trait::async_trait;
use tracing::debug;

use crate::models::{Destination, RouteQuery, SearchResult};

pub use aggregator::ApiAggregator;
pub use error::PriceSourceError;
pub use fare_apis::{AmadeusApi, AviationStackApi, FareApi, KiwiApi};
pub use mock::{MockPriceAdapter, PriceGenerator};
pub use resolver::ModeResolver;
pub use scraper::ScraperAdapter;

/// A backend that prices a route to one destination
#[async_trait]
pub trait PriceAdapter: Send + Sync {
    /// Short tag used in logs
    fn name(&self) -> &'static str;

    async fn search(
        &self,
        route: &RouteQuery,
        destination: &Destination,
    ) -> anyhow::Result<SearchResult>;

    /// Price each destination in turn, keeping input order
    async fn search_all(
        &self,
        route: &RouteQuery,
        destinations: &[Destination],
    ) -> anyhow::Result<Vec<SearchResult>> {
        let mut results = Vec::with_capacity(destinations.len());
        for (index, destination) in destinations.iter().enumerate() {
            debug!(
                "[{}] {}/{}: {} → {}",
                self.name(),
                index + 1,
                destinations.len(),
                route.origin,
                destination.code
            );
            results.push(self.search(route, destination).await?);
        }
        Ok(results)
    }
}
