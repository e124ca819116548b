//! Request and response shapes at the search boundary

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Destination, Mode, PriceQuote};
use crate::Result;
use crate::error::FlightIdeasError;

/// A validated price search for a set of destinations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// Origin IATA code
    pub origin: String,
    pub destinations: Vec<Destination>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl SearchRequest {
    #[must_use]
    pub fn route(&self) -> RouteQuery {
        RouteQuery {
            origin: self.origin.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

/// Origin and travel dates shared by every destination of a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteQuery {
    pub origin: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl RouteQuery {
    #[must_use]
    pub fn start(&self) -> String {
        self.start_date.format("%Y-%m-%d").to_string()
    }

    #[must_use]
    pub fn end(&self) -> String {
        self.end_date.format("%Y-%m-%d").to_string()
    }
}

/// Unvalidated request body as received over HTTP
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPayload {
    pub origin: Option<String>,
    pub destinations: Option<Vec<Destination>>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl SearchPayload {
    /// Check required fields and parse the ISO dates
    pub fn validate(self) -> Result<SearchRequest> {
        let origin = self.origin.filter(|o| !o.trim().is_empty());
        let start = self.start_date.filter(|d| !d.trim().is_empty());
        let end = self.end_date.filter(|d| !d.trim().is_empty());

        let mut missing = Vec::new();
        if origin.is_none() {
            missing.push("origin");
        }
        if self.destinations.is_none() {
            missing.push("destinations");
        }
        if start.is_none() {
            missing.push("startDate");
        }
        if end.is_none() {
            missing.push("endDate");
        }

        match (origin, self.destinations, start, end) {
            (Some(origin), Some(destinations), Some(start), Some(end)) => Ok(SearchRequest {
                origin: origin.trim().to_uppercase(),
                destinations,
                start_date: parse_date("startDate", &start)?,
                end_date: parse_date("endDate", &end)?,
            }),
            _ => Err(FlightIdeasError::missing_parameters(missing)),
        }
    }
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        FlightIdeasError::validation(format!("{field} must be an ISO date (YYYY-MM-DD), got '{value}'"))
    })
}

/// Up to three quotes for one destination; `None` means that source produced nothing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub destination: Destination,
    pub skyscanner: Option<PriceQuote>,
    pub google_flights: Option<PriceQuote>,
    pub kayak: Option<PriceQuote>,
}

impl SearchResult {
    /// Result with no quotes at all
    #[must_use]
    pub fn empty(destination: Destination) -> Self {
        Self {
            destination,
            skyscanner: None,
            google_flights: None,
            kayak: None,
        }
    }

    /// Whether the headline quote carries a real price
    #[must_use]
    pub fn has_real_price(&self) -> bool {
        self.skyscanner
            .as_ref()
            .is_some_and(|quote| !quote.is_placeholder())
    }
}

/// Results plus the mode that produced them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    pub mode: Mode,
    pub description: String,
}

impl SearchResponse {
    #[must_use]
    pub fn new(results: Vec<SearchResult>, mode: Mode) -> Self {
        Self {
            results,
            mode,
            description: mode.description().to_string(),
        }
    }
}
