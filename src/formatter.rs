//! Summaries and terminal rendering of search responses

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::info;

use crate::config::LoggingConfig;
use crate::models::{Mode, PriceQuote, SearchResponse, SearchResult};

/// Active mode plus the logging switches that affect price detail
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeInfo {
    pub mode: Mode,
    pub description: String,
    pub log_level: String,
    pub show_urls: bool,
    pub show_prices: bool,
}

impl ModeInfo {
    #[must_use]
    pub fn new(mode: Mode, logging: &LoggingConfig) -> Self {
        Self {
            mode,
            description: mode.description().to_string(),
            log_level: logging.level.clone(),
            show_urls: logging.show_urls,
            show_prices: logging.show_prices,
        }
    }
}

impl fmt::Display for ModeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Mode: {}", self.mode)?;
        writeln!(f, "  {}", self.description)?;
        write!(
            f,
            "Logging: {} (urls: {}, prices: {})",
            self.log_level,
            if self.show_urls { "on" } else { "off" },
            if self.show_prices { "on" } else { "off" }
        )
    }
}

/// Aggregate view of the headline quotes in a result set
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSummary {
    pub total: usize,
    /// Results whose headline quote carries an amount, simulated or not
    pub priced: usize,
    pub average_price: Option<u32>,
    pub airlines: BTreeMap<String, usize>,
    pub sources: BTreeMap<String, usize>,
}

impl PriceSummary {
    #[must_use]
    pub fn from_results(results: &[SearchResult]) -> Self {
        let mut summary = Self {
            total: results.len(),
            ..Self::default()
        };
        let mut sum: u64 = 0;

        for quote in results.iter().filter_map(|r| r.skyscanner.as_ref()) {
            if let Some(amount) = quote.amount() {
                summary.priced += 1;
                sum += u64::from(amount);
            }
            if let Some(airline) = &quote.airline {
                *summary.airlines.entry(airline.clone()).or_default() += 1;
            }
            *summary.sources.entry(quote.source.to_string()).or_default() += 1;
        }

        if summary.priced > 0 {
            summary.average_price = u32::try_from(sum / summary.priced as u64).ok();
        }
        summary
    }

    /// Log the summary, with per-destination prices and links when enabled
    pub fn log(&self, logging: &LoggingConfig, results: &[SearchResult]) {
        info!(
            "Priced {}/{} destinations, average {}, airlines {:?}, sources {:?}",
            self.priced,
            self.total,
            self.average_price
                .map_or_else(|| "n/a".to_string(), |p| format!("€{p}")),
            self.airlines,
            self.sources
        );

        if !(logging.show_prices || logging.show_urls) {
            return;
        }
        for result in results {
            let Some(quote) = &result.skyscanner else {
                info!("  {}: no price", result.destination.code);
                continue;
            };
            match (logging.show_prices, logging.show_urls) {
                (true, true) => info!(
                    "  {}: {} ({}) {}",
                    result.destination.code, quote.price, quote.source, quote.url
                ),
                (true, false) => info!(
                    "  {}: {} ({})",
                    result.destination.code, quote.price, quote.source
                ),
                _ => info!("  {}: {}", result.destination.code, quote.url),
            }
        }
    }
}

fn quote_line(f: &mut fmt::Formatter<'_>, label: &str, quote: Option<&PriceQuote>) -> fmt::Result {
    match quote {
        Some(q) => {
            let airline = q.airline.as_deref().unwrap_or("-");
            let marker = if q.is_placeholder() && q.amount().is_some() {
                " (estimate)"
            } else {
                ""
            };
            writeln!(f, "    {label:<15} {:<12} {airline}{marker}", q.price)?;
            writeln!(f, "    {:<15} {}", "", q.url)
        }
        None => writeln!(f, "    {label:<15} unavailable"),
    }
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  ✈ {}", self.destination)?;
        quote_line(f, "Skyscanner", self.skyscanner.as_ref())?;
        quote_line(f, "Google Flights", self.google_flights.as_ref())?;
        quote_line(f, "Kayak", self.kayak.as_ref())
    }
}

impl fmt::Display for SearchResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Mode: {} ({})", self.mode, self.description)?;
        if self.results.is_empty() {
            return writeln!(f, "No destinations to price.");
        }
        for result in &self.results {
            writeln!(f)?;
            write!(f, "{result}")?;
        }

        let summary = PriceSummary::from_results(&self.results);
        if let Some(average) = summary.average_price {
            writeln!(f)?;
            writeln!(
                f,
                "{} of {} destinations priced, average €{}",
                summary.priced, summary.total, average
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Destination, QuoteSource};

    fn result(code: &str, quote: Option<PriceQuote>) -> SearchResult {
        let mut result = SearchResult::empty(Destination::new(code, "Somewhere", "Nowhere"));
        result.skyscanner = quote;
        result
    }

    fn results() -> Vec<SearchResult> {
        vec![
            result("BCN", Some(PriceQuote::priced(80, "Vueling", "https://a", QuoteSource::Skyscanner))),
            result("CDG", Some(PriceQuote::priced(121, "Iberia", "https://b", QuoteSource::Simulated))),
            result("LHR", Some(PriceQuote::priced(100, "Vueling", "https://c", QuoteSource::Kiwi))),
            result("JFK", None),
        ]
    }

    #[test]
    fn test_summary_counts_and_average() {
        let summary = PriceSummary::from_results(&results());
        assert_eq!(summary.total, 4);
        assert_eq!(summary.priced, 3);
        assert_eq!(summary.average_price, Some(100));
        assert_eq!(summary.airlines.get("Vueling"), Some(&2));
        assert_eq!(summary.sources.get("simulated"), Some(&1));
        assert_eq!(summary.sources.get("kiwi"), Some(&1));
    }

    #[test]
    fn test_summary_of_nothing() {
        let summary = PriceSummary::from_results(&[]);
        assert_eq!(summary.priced, 0);
        assert_eq!(summary.average_price, None);
    }

    #[test]
    fn test_response_rendering() {
        let response = SearchResponse::new(results(), Mode::Apis);
        let text = response.to_string();
        assert!(text.starts_with("Mode: apis"));
        assert!(text.contains("BCN (Somewhere, Nowhere)"));
        assert!(text.contains("€121"));
        assert!(text.contains("(estimate)"));
        assert!(text.contains("unavailable"));
        assert!(text.contains("3 of 4 destinations priced, average €100"));
    }

    #[test]
    fn test_mode_info_serializes_camel_case() {
        let logging = LoggingConfig {
            show_urls: true,
            ..LoggingConfig::default()
        };
        let info = ModeInfo::new(Mode::Hybrid, &logging);
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["mode"], "hybrid");
        assert_eq!(json["showUrls"], true);
        assert_eq!(json["showPrices"], false);
        assert_eq!(json["logLevel"], "info");
        assert!(info.to_string().contains("urls: on"));
    }
}
