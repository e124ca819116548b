//! Clients for the third-party flight APIs
//!
//! Each client answers with a [`PriceLookup`]; transport, status and decoding
//! failures are logged and reported as [`PriceLookup::NoData`].

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use super::error::{PriceSourceError, Result};
use super::links;
use super::mock::PriceGenerator;
use crate::models::{PriceLookup, PriceQuote, QuoteSource, RouteQuery};

/// Airline label when an API omits the carrier
pub const UNKNOWN_AIRLINE: &str = "Unknown";

/// One upstream fare provider
#[async_trait]
pub trait FareApi: Send + Sync {
    fn name(&self) -> &'static str;

    /// Query the upstream for the cheapest fare to `destination`
    async fn fetch(&self, route: &RouteQuery, destination: &str) -> Result<Option<PriceQuote>>;

    /// Like [`FareApi::fetch`] with failures folded into `NoData`
    async fn lookup(&self, route: &RouteQuery, destination: &str) -> PriceLookup {
        match self.fetch(route, destination).await {
            Ok(quote) => {
                debug!(
                    "{} {} → {}: {}",
                    self.name(),
                    route.origin,
                    destination,
                    quote.as_ref().map_or("no data", |q| q.price.as_str())
                );
                PriceLookup::from(quote)
            }
            Err(e) => {
                warn!("{} lookup {} → {} failed: {}", self.name(), route.origin, destination, e);
                PriceLookup::NoData
            }
        }
    }
}

async fn check_status(source: &str, response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(PriceSourceError::from_status(source, status, &body))
    }
}

// Aviation Stack ------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct AviationStackResponse {
    #[serde(default)]
    data: Vec<AviationStackFlight>,
}

#[derive(Debug, Deserialize)]
struct AviationStackFlight {
    airline: Option<AviationStackAirline>,
}

#[derive(Debug, Deserialize)]
struct AviationStackAirline {
    name: Option<String>,
}

/// Schedule lookup; the API carries no fares, so a hit is priced from the
/// base fare table
pub struct AviationStackApi {
    client: Client,
    api_key: String,
    base_url: String,
    generator: Arc<PriceGenerator>,
}

impl AviationStackApi {
    #[must_use]
    pub fn new(client: Client, api_key: &str, base_url: &str, generator: Arc<PriceGenerator>) -> Self {
        Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            generator,
        }
    }
}

#[async_trait]
impl FareApi for AviationStackApi {
    fn name(&self) -> &'static str {
        "Aviation Stack"
    }

    #[instrument(skip(self, route), fields(origin = %route.origin))]
    async fn fetch(&self, route: &RouteQuery, destination: &str) -> Result<Option<PriceQuote>> {
        let url = format!(
            "{}/flights?access_key={}&dep_iata={}&arr_iata={}",
            self.base_url,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(&route.origin),
            urlencoding::encode(destination)
        );

        let response = check_status(self.name(), self.client.get(&url).send().await?).await?;
        let body: AviationStackResponse = response.json().await?;

        let Some(flight) = body.data.into_iter().next() else {
            return Ok(None);
        };
        let airline = flight
            .airline
            .and_then(|a| a.name)
            .unwrap_or_else(|| UNKNOWN_AIRLINE.to_string());

        Ok(Some(PriceQuote::priced(
            self.generator.estimate(destination),
            airline,
            links::google_flights_url(route, destination),
            QuoteSource::AviationStack,
        )))
    }
}

// Amadeus -------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct AmadeusToken {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct AmadeusOffers {
    #[serde(default)]
    data: Vec<AmadeusOffer>,
}

#[derive(Debug, Deserialize)]
struct AmadeusOffer {
    price: AmadeusPrice,
    #[serde(default)]
    itineraries: Vec<AmadeusItinerary>,
}

#[derive(Debug, Deserialize)]
struct AmadeusPrice {
    total: String,
}

#[derive(Debug, Deserialize)]
struct AmadeusItinerary {
    #[serde(default)]
    segments: Vec<AmadeusSegment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AmadeusSegment {
    carrier_code: Option<String>,
}

/// Flight offers search with a client-credentials token per lookup
pub struct AmadeusApi {
    client: Client,
    client_id: String,
    client_secret: String,
    base_url: String,
}

impl AmadeusApi {
    #[must_use]
    pub fn new(client: Client, client_id: &str, client_secret: &str, base_url: &str) -> Self {
        Self {
            client,
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn access_token(&self) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/v1/security/oauth2/token", self.base_url))
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await?;

        let token: AmadeusToken = check_status("Amadeus auth", response).await?.json().await?;
        Ok(token.access_token)
    }
}

#[async_trait]
impl FareApi for AmadeusApi {
    fn name(&self) -> &'static str {
        "Amadeus"
    }

    #[instrument(skip(self, route), fields(origin = %route.origin))]
    async fn fetch(&self, route: &RouteQuery, destination: &str) -> Result<Option<PriceQuote>> {
        let token = self.access_token().await?;

        let url = format!(
            "{}/v2/shopping/flight-offers?originLocationCode={}&destinationLocationCode={}&departureDate={}&adults=1&max=1",
            self.base_url,
            urlencoding::encode(&route.origin),
            urlencoding::encode(destination),
            route.start()
        );
        let response = self.client.get(&url).bearer_auth(&token).send().await?;
        let offers: AmadeusOffers = check_status(self.name(), response).await?.json().await?;

        let Some(offer) = offers.data.into_iter().next() else {
            return Ok(None);
        };
        let total: f64 = offer.price.total.trim().parse().map_err(|_| {
            PriceSourceError::Parse(format!("Amadeus price total '{}'", offer.price.total))
        })?;
        let carrier = offer
            .itineraries
            .into_iter()
            .next()
            .and_then(|it| it.segments.into_iter().next())
            .and_then(|seg| seg.carrier_code)
            .unwrap_or_else(|| UNKNOWN_AIRLINE.to_string());

        Ok(Some(PriceQuote::priced(
            total.round() as u32,
            carrier,
            links::google_flights_url(route, destination),
            QuoteSource::Amadeus,
        )))
    }
}

// Kiwi ----------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct KiwiResponse {
    #[serde(default)]
    data: Vec<KiwiItinerary>,
}

#[derive(Debug, Deserialize)]
struct KiwiItinerary {
    price: f64,
    #[serde(default)]
    airlines: Vec<String>,
}

/// Tequila search API
pub struct KiwiApi {
    client: Client,
    api_key: String,
    base_url: String,
}

impl KiwiApi {
    #[must_use]
    pub fn new(client: Client, api_key: &str, base_url: &str) -> Self {
        Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl FareApi for KiwiApi {
    fn name(&self) -> &'static str {
        "Kiwi"
    }

    #[instrument(skip(self, route), fields(origin = %route.origin))]
    async fn fetch(&self, route: &RouteQuery, destination: &str) -> Result<Option<PriceQuote>> {
        // Tequila wants dd/mm/yyyy
        let date_from = route.start_date.format("%d/%m/%Y").to_string();
        let date_to = route.end_date.format("%d/%m/%Y").to_string();
        let url = format!(
            "{}/v2/search?fly_from={}&fly_to={}&date_from={}&date_to={}&adults=1&curr=EUR&max_stopovers=2&limit=1",
            self.base_url,
            urlencoding::encode(&route.origin),
            urlencoding::encode(destination),
            urlencoding::encode(&date_from),
            urlencoding::encode(&date_to)
        );

        let response = self
            .client
            .get(&url)
            .header("apikey", &self.api_key)
            .send()
            .await?;
        let body: KiwiResponse = check_status(self.name(), response).await?.json().await?;

        Ok(body.data.into_iter().next().map(|itinerary| {
            PriceQuote::priced(
                itinerary.price.round() as u32,
                itinerary
                    .airlines
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| UNKNOWN_AIRLINE.to_string()),
                links::kiwi_url(route, destination),
                QuoteSource::Kiwi,
            )
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::test_support::{route, serve};
    use axum::extract::{Form, Query};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use std::time::Duration;

    fn client() -> Client {
        Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_aviation_stack_hit_is_estimated() {
        let app = Router::new().route(
            "/v1/flights",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                assert_eq!(params.get("access_key").map(String::as_str), Some("av-key"));
                assert_eq!(params.get("dep_iata").map(String::as_str), Some("MAD"));
                assert_eq!(params.get("arr_iata").map(String::as_str), Some("BCN"));
                Json(json!({"data": [{"airline": {"name": "Vueling"}}]}))
            }),
        );
        let base = serve(app).await;

        let api = AviationStackApi::new(
            client(),
            "av-key",
            &format!("{base}/v1"),
            Arc::new(PriceGenerator::seeded(8)),
        );
        let quote = api.fetch(&route(), "BCN").await.unwrap().unwrap();

        assert_eq!(quote.source, QuoteSource::AviationStack);
        assert_eq!(quote.airline.as_deref(), Some("Vueling"));
        let amount = quote.amount().unwrap();
        assert!((68..=102).contains(&amount), "{amount}");
    }

    #[tokio::test]
    async fn test_aviation_stack_empty_schedule_is_no_data() {
        let app = Router::new().route("/flights", get(|| async { Json(json!({"data": []})) }));
        let base = serve(app).await;

        let api = AviationStackApi::new(client(), "k", &base, Arc::new(PriceGenerator::seeded(1)));
        assert_eq!(api.lookup(&route(), "BCN").await, PriceLookup::NoData);
    }

    #[tokio::test]
    async fn test_amadeus_token_then_offers() {
        let app = Router::new()
            .route(
                "/v1/security/oauth2/token",
                post(|Form(form): Form<HashMap<String, String>>| async move {
                    assert_eq!(form.get("grant_type").map(String::as_str), Some("client_credentials"));
                    assert_eq!(form.get("client_id").map(String::as_str), Some("id"));
                    Json(json!({"access_token": "tok-123", "expires_in": 1799}))
                }),
            )
            .route(
                "/v2/shopping/flight-offers",
                get(|headers: HeaderMap, Query(params): Query<HashMap<String, String>>| async move {
                    assert_eq!(
                        headers.get("authorization").and_then(|v| v.to_str().ok()),
                        Some("Bearer tok-123")
                    );
                    assert_eq!(params.get("departureDate").map(String::as_str), Some("2025-07-01"));
                    Json(json!({
                        "data": [{
                            "price": {"total": "123.60", "currency": "EUR"},
                            "itineraries": [{"segments": [{"carrierCode": "IB"}]}]
                        }]
                    }))
                }),
            );
        let base = serve(app).await;

        let api = AmadeusApi::new(client(), "id", "secret", &base);
        let quote = api.fetch(&route(), "CDG").await.unwrap().unwrap();

        assert_eq!(quote.price, "€124");
        assert_eq!(quote.airline.as_deref(), Some("IB"));
        assert_eq!(quote.source, QuoteSource::Amadeus);
    }

    #[tokio::test]
    async fn test_amadeus_rejected_credentials() {
        let app = Router::new().route(
            "/v1/security/oauth2/token",
            post(|| async { (StatusCode::UNAUTHORIZED, Json(json!({"error": "invalid_client"}))) }),
        );
        let base = serve(app).await;

        let api = AmadeusApi::new(client(), "id", "wrong", &base);
        let err = api.fetch(&route(), "CDG").await.unwrap_err();
        assert!(matches!(err, PriceSourceError::Authentication(_)));
        assert_eq!(api.lookup(&route(), "CDG").await, PriceLookup::NoData);
    }

    #[tokio::test]
    async fn test_kiwi_search() {
        let app = Router::new().route(
            "/v2/search",
            get(|headers: HeaderMap, Query(params): Query<HashMap<String, String>>| async move {
                assert_eq!(headers.get("apikey").and_then(|v| v.to_str().ok()), Some("kiwi-key"));
                assert_eq!(params.get("date_from").map(String::as_str), Some("01/07/2025"));
                assert_eq!(params.get("curr").map(String::as_str), Some("EUR"));
                Json(json!({"data": [{"price": 88.4, "airlines": ["FR", "VY"]}]}))
            }),
        );
        let base = serve(app).await;

        let api = KiwiApi::new(client(), "kiwi-key", &base);
        let quote = api.fetch(&route(), "LHR").await.unwrap().unwrap();

        assert_eq!(quote.price, "€88");
        assert_eq!(quote.airline.as_deref(), Some("FR"));
        assert_eq!(quote.source, QuoteSource::Kiwi);
        assert!(quote.url.starts_with("https://www.kiwi.com/"));
    }

    #[tokio::test]
    async fn test_rate_limit_and_bad_json() {
        let app = Router::new()
            .route("/limited/v2/search", get(|| async { StatusCode::TOO_MANY_REQUESTS }))
            .route("/garbled/v2/search", get(|| async { Json(Value::String("oops".into())) }));
        let base = serve(app).await;

        let limited = KiwiApi::new(client(), "k", &format!("{base}/limited"));
        assert!(matches!(
            limited.fetch(&route(), "LHR").await.unwrap_err(),
            PriceSourceError::RateLimit(_)
        ));

        let garbled = KiwiApi::new(client(), "k", &format!("{base}/garbled"));
        assert!(matches!(
            garbled.fetch(&route(), "LHR").await.unwrap_err(),
            PriceSourceError::Parse(_)
        ));
    }
}
