//! `FlightIdeas` - Random travel ideas with indicative flight prices
//!
//! This library picks destinations from a climate-tagged catalog and prices
//! them through interchangeable sources (mock generator, scraper, flight APIs)
//! chosen by a configurable mode.

pub mod api;
pub mod config;
pub mod destinations;
pub mod error;
pub mod formatter;
pub mod models;
pub mod planner;
pub mod pricing;
pub mod web;

// Re-export core types for public API
pub use config::FlightIdeasConfig;
pub use destinations::DestinationPicker;
pub use error::FlightIdeasError;
pub use formatter::{ModeInfo, PriceSummary};
pub use models::{
    Climate, Destination, Mode, PriceLookup, PriceQuote, QuoteSource, SearchPayload,
    SearchRequest, SearchResponse, SearchResult,
};
pub use planner::{TravelPreferences, TripDuration, TripPlanner};
pub use pricing::{ModeResolver, PriceAdapter};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, FlightIdeasError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
