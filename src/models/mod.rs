//! Data models for the FlightIdeas application
//!
//! This module contains the core domain models organized by concern:
//! - Destination: Catalog entries and climate tags
//! - Quote: Price quotes and the typed outcome of a price probe
//! - Mode: Which price source serves a request
//! - Search: Request/response shapes at the search boundary

pub mod destination;
pub mod mode;
pub mod quote;
pub mod search;

// Re-export all public types for convenient access
pub use destination::{Climate, Destination};
pub use mode::Mode;
pub use quote::{CURRENCY_SYMBOL, PriceLookup, PriceQuote, QuoteSource, SEE_PRICES};
pub use search::{RouteQuery, SearchPayload, SearchRequest, SearchResponse, SearchResult};
