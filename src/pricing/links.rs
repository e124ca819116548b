//! Deep links to booking sites and the link-only quotes built from them

use crate::models::{PriceQuote, QuoteSource, RouteQuery};

pub const SKYSCANNER_URL: &str = "https://www.skyscanner.es";
const GOOGLE_FLIGHTS_URL: &str = "https://www.google.com/travel/flights";
const KAYAK_URL: &str = "https://www.kayak.es";
const KIWI_URL: &str = "https://www.kiwi.com";

/// Skyscanner results page rooted at `base_url`
#[must_use]
pub fn skyscanner_url(base_url: &str, route: &RouteQuery, destination: &str) -> String {
    format!(
        "{}/transport/flights/{}/{}/{}/{}/",
        base_url.trim_end_matches('/'),
        route.origin,
        destination,
        route.start(),
        route.end()
    )
}

#[must_use]
pub fn google_flights_url(route: &RouteQuery, destination: &str) -> String {
    let query = format!("Flights from {} to {}", route.origin, destination);
    format!(
        "{GOOGLE_FLIGHTS_URL}?hl=es&f=0&t=0&q={}",
        urlencoding::encode(&query)
    )
}

#[must_use]
pub fn kayak_url(route: &RouteQuery, destination: &str) -> String {
    format!(
        "{KAYAK_URL}/flights/{}-{}/{}/{}",
        route.origin,
        destination,
        route.start(),
        route.end()
    )
}

#[must_use]
pub fn kiwi_url(route: &RouteQuery, destination: &str) -> String {
    format!(
        "{KIWI_URL}/es/search?flights={}-{}/{}/{}",
        route.origin,
        destination,
        route.start(),
        route.end()
    )
}

#[must_use]
pub fn google_flights_link(route: &RouteQuery, destination: &str) -> PriceQuote {
    PriceQuote::link(
        "Google Flights",
        google_flights_url(route, destination),
        QuoteSource::Google,
    )
}

#[must_use]
pub fn kayak_link(route: &RouteQuery, destination: &str) -> PriceQuote {
    PriceQuote::link("Kayak", kayak_url(route, destination), QuoteSource::Kayak)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::test_support::route;

    #[test]
    fn test_skyscanner_url() {
        assert_eq!(
            skyscanner_url("https://www.skyscanner.es/", &route(), "BCN"),
            "https://www.skyscanner.es/transport/flights/MAD/BCN/2025-07-01/2025-07-08/"
        );
    }

    #[test]
    fn test_google_flights_url_is_encoded() {
        assert_eq!(
            google_flights_url(&route(), "BCN"),
            "https://www.google.com/travel/flights?hl=es&f=0&t=0&q=Flights%20from%20MAD%20to%20BCN"
        );
    }

    #[test]
    fn test_link_quotes_are_placeholders() {
        let kayak = kayak_link(&route(), "BCN");
        assert_eq!(kayak.url, "https://www.kayak.es/flights/MAD-BCN/2025-07-01/2025-07-08");
        assert_eq!(kayak.source, QuoteSource::Kayak);
        assert!(kayak.is_placeholder());
        assert!(google_flights_link(&route(), "BCN").is_placeholder());
    }

    #[test]
    fn test_kiwi_url() {
        assert_eq!(
            kiwi_url(&route(), "BCN"),
            "https://www.kiwi.com/es/search?flights=MAD-BCN/2025-07-01/2025-07-08"
        );
    }
}
