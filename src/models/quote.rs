//! Price quote model shared by every price source

use serde::{Deserialize, Serialize};
use std::fmt;

/// Currency symbol every priced quote starts with
pub const CURRENCY_SYMBOL: char = '€';

/// Text shown on link-only quotes that carry no price
pub const SEE_PRICES: &str = "Ver precios";

/// Identity of the system that produced a quote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteSource {
    Skyscanner,
    Google,
    Kayak,
    AviationStack,
    Amadeus,
    Kiwi,
    /// Price invented locally because no upstream answered
    Simulated,
}

impl QuoteSource {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteSource::Skyscanner => "skyscanner",
            QuoteSource::Google => "google",
            QuoteSource::Kayak => "kayak",
            QuoteSource::AviationStack => "aviationstack",
            QuoteSource::Amadeus => "amadeus",
            QuoteSource::Kiwi => "kiwi",
            QuoteSource::Simulated => "simulated",
        }
    }
}

impl fmt::Display for QuoteSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single price/airline/link record from one source for one destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    /// Display price (`€123`) or placeholder text
    pub price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub airline: Option<String>,
    /// Deep link to a booking site
    pub url: String,
    pub source: QuoteSource,
}

impl PriceQuote {
    /// Quote carrying a whole-euro amount
    #[must_use]
    pub fn priced(
        amount: u32,
        airline: impl Into<String>,
        url: impl Into<String>,
        source: QuoteSource,
    ) -> Self {
        Self {
            price: format!("{CURRENCY_SYMBOL}{amount}"),
            airline: Some(airline.into()),
            url: url.into(),
            source,
        }
    }

    /// Link-only quote that sends the user to the booking site for prices
    #[must_use]
    pub fn link(provider: impl Into<String>, url: impl Into<String>, source: QuoteSource) -> Self {
        Self {
            price: SEE_PRICES.to_string(),
            airline: Some(provider.into()),
            url: url.into(),
            source,
        }
    }

    /// Parsed amount in whole euros, `None` for placeholder text
    #[must_use]
    pub fn amount(&self) -> Option<u32> {
        self.price
            .trim()
            .strip_prefix(CURRENCY_SYMBOL)
            .and_then(|digits| digits.trim().parse().ok())
    }

    /// True when this quote carries no real price: either it was simulated
    /// locally or its price is not a currency amount ("Ver precios", "N/A", ...).
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.source == QuoteSource::Simulated || self.amount().is_none()
    }
}

/// Outcome of a single price probe against one upstream
#[derive(Debug, Clone, PartialEq)]
pub enum PriceLookup {
    Quote(PriceQuote),
    NoData,
}

impl PriceLookup {
    #[must_use]
    pub fn into_quote(self) -> Option<PriceQuote> {
        match self {
            PriceLookup::Quote(quote) => Some(quote),
            PriceLookup::NoData => None,
        }
    }

    #[must_use]
    pub fn is_quote(&self) -> bool {
        matches!(self, PriceLookup::Quote(_))
    }
}

impl From<Option<PriceQuote>> for PriceLookup {
    fn from(value: Option<PriceQuote>) -> Self {
        value.map_or(PriceLookup::NoData, PriceLookup::Quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_priced_quote_format() {
        let quote = PriceQuote::priced(85, "Vueling", "https://example.com", QuoteSource::Skyscanner);
        assert_eq!(quote.price, "€85");
        assert_eq!(quote.amount(), Some(85));
        assert!(!quote.is_placeholder());
    }

    #[rstest]
    #[case("Ver precios")]
    #[case("N/A")]
    #[case("Consultar")]
    #[case("Precio no disponible")]
    #[case("€")]
    #[case("€12a")]
    fn test_sentinel_prices_are_placeholders(#[case] price: &str) {
        let quote = PriceQuote {
            price: price.to_string(),
            airline: None,
            url: String::new(),
            source: QuoteSource::Skyscanner,
        };
        assert!(quote.is_placeholder());
    }

    #[test]
    fn test_simulated_source_is_placeholder_even_with_amount() {
        let quote = PriceQuote::priced(150, "Iberia", "https://example.com", QuoteSource::Simulated);
        assert_eq!(quote.amount(), Some(150));
        assert!(quote.is_placeholder());
    }

    #[test]
    fn test_source_serializes_lowercase() {
        let quote = PriceQuote::link("Kayak", "https://www.kayak.es", QuoteSource::AviationStack);
        let json = serde_json::to_value(&quote).unwrap();
        assert_eq!(json["source"], "aviationstack");
        assert_eq!(json["price"], SEE_PRICES);
    }

    #[test]
    fn test_lookup_from_option() {
        assert_eq!(PriceLookup::from(None), PriceLookup::NoData);
        let quote = PriceQuote::priced(1, "x", "y", QuoteSource::Kiwi);
        let lookup = PriceLookup::from(Some(quote.clone()));
        assert!(lookup.is_quote());
        assert_eq!(lookup.into_quote(), Some(quote));
    }
}
