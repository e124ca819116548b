use async_trait::async_trait;
use rand::RngExt;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::ops::Range;
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

use super::PriceAdapter;
use super::links::{self, SKYSCANNER_URL};
use crate::models::{Destination, PriceQuote, QuoteSource, RouteQuery, SearchResult};

/// Base price used for codes missing from [`BASE_PRICES`]
pub const DEFAULT_BASE_PRICE: u32 = 200;

/// Maximum relative deviation applied to a base price
pub const PRICE_VARIATION: f64 = 0.2;

/// Airlines quoted by the mock generator
pub const AIRLINES: [&str; 7] = [
    "Iberia",
    "Ryanair",
    "Vueling",
    "Air Europa",
    "British Airways",
    "Lufthansa",
    "Air France",
];

/// Typical return fare in euros per destination code
#[rustfmt::skip]
static BASE_PRICES: &[(&str, u32)] = &[
    // Europe
    ("LHR", 120), ("CDG", 95), ("FCO", 110), ("AMS", 105), ("BER", 115),
    ("VIE", 130), ("PRG", 125), ("BUD", 140), ("CPH", 135), ("ARN", 145),
    ("ZRH", 150), ("BCN", 85), ("IST", 160), ("DUB", 125), ("GVA", 155),
    ("SVO", 180), ("RIX", 165), ("EDI", 130),
    // Middle East, Asia, Africa
    ("DXB", 350), ("BKK", 450), ("SIN", 480), ("KUL", 420), ("HKT", 470),
    ("MLE", 520), ("CMB", 380), ("DOH", 360), ("MCT", 340), ("CAI", 280),
    ("AUH", 370), ("JED", 320), ("CMN", 180),
    // Americas and islands
    ("MIA", 280), ("CUN", 220), ("PUJ", 240), ("HAV", 260), ("GCM", 290),
    ("NAS", 310), ("BGI", 330), ("SJU", 270), ("PTY", 320), ("MRU", 580),
    ("SEZ", 620), ("HNL", 380),
    // China
    ("PEK", 420), ("PKX", 420), ("PVG", 440), ("SHA", 440), ("CAN", 400),
    ("SZX", 410), ("CTU", 430), ("CKG", 450), ("XIY", 460), ("HGH", 420),
    ("KMG", 470), ("HAK", 480), ("CSX", 450), ("DLC", 460), ("TSN", 430),
    // Long haul
    ("JFK", 320), ("LAX", 380), ("ORD", 340), ("NRT", 520), ("HND", 520),
    ("ICN", 480), ("SYD", 580), ("MEL", 590), ("AKL", 620), ("CPT", 420),
    ("GRU", 440), ("EZE", 460), ("JNB", 380), ("DEL", 360), ("MEX", 240),
    ("SFO", 400), ("YYZ", 350),
];

/// Tabulated base price for a destination code
#[must_use]
pub fn base_price(code: &str) -> u32 {
    BASE_PRICES
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
        .map_or(DEFAULT_BASE_PRICE, |(_, price)| *price)
}

/// Perturb `base` by up to ±[`PRICE_VARIATION`] and round to whole euros
pub fn vary_price<R: RngExt>(rng: &mut R, base: u32) -> u32 {
    let variation: f64 = rng.random_range(-PRICE_VARIATION..PRICE_VARIATION);
    (f64::from(base) * (1.0 + variation)).round() as u32
}

/// Shared random source for simulated fares
pub struct PriceGenerator {
    rng: Mutex<StdRng>,
}

impl PriceGenerator {
    /// Generator seeded from the thread RNG
    #[must_use]
    pub fn new() -> Self {
        Self::seeded(rand::rng().random_range(0..u64::MAX))
    }

    /// Reproducible generator
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    #[must_use]
    pub fn from_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::new, Self::seeded)
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&mut rng)
    }

    /// Base price for `code` with random variation applied
    #[must_use]
    pub fn estimate(&self, code: &str) -> u32 {
        let base = base_price(code);
        let price = self.with_rng(|rng| vary_price(rng, base));
        debug!("Estimated {} from base €{} → €{}", code, base, price);
        price
    }

    /// Uniform fare within `range`
    #[must_use]
    pub fn fare_in(&self, range: Range<u32>) -> u32 {
        self.with_rng(|rng| rng.random_range(range))
    }

    /// Random pick from a non-empty list
    #[must_use]
    pub fn pick<'a>(&self, choices: &[&'a str]) -> &'a str {
        if choices.is_empty() {
            return "";
        }
        self.with_rng(|rng| choices[rng.random_range(0..choices.len())])
    }
}

impl Default for PriceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Simulated result: estimated headline fare plus link-only quotes.
///
/// The headline quote is attributed to Skyscanner and links to its results
/// page under `skyscanner_base`.
#[must_use]
pub fn simulated_result(
    generator: &PriceGenerator,
    skyscanner_base: &str,
    route: &RouteQuery,
    destination: &Destination,
) -> SearchResult {
    let code = destination.code.as_str();
    let price = generator.estimate(code);
    let airline = generator.pick(&AIRLINES);

    SearchResult {
        destination: destination.clone(),
        skyscanner: Some(PriceQuote::priced(
            price,
            airline,
            links::skyscanner_url(skyscanner_base, route, code),
            QuoteSource::Skyscanner,
        )),
        google_flights: Some(links::google_flights_link(route, code)),
        kayak: Some(links::kayak_link(route, code)),
    }
}

/// Price source that always answers with simulated fares
pub struct MockPriceAdapter {
    generator: PriceGenerator,
    delay: Duration,
}

impl MockPriceAdapter {
    #[must_use]
    pub fn new(generator: PriceGenerator, delay: Duration) -> Self {
        Self { generator, delay }
    }

    /// Instant, reproducible adapter
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(PriceGenerator::seeded(seed), Duration::ZERO)
    }
}

impl Default for MockPriceAdapter {
    fn default() -> Self {
        Self::new(PriceGenerator::new(), Duration::ZERO)
    }
}

#[async_trait]
impl PriceAdapter for MockPriceAdapter {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn search(
        &self,
        route: &RouteQuery,
        destination: &Destination,
    ) -> anyhow::Result<SearchResult> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(simulated_result(&self.generator, SKYSCANNER_URL, route, destination))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::test_support::route;

    #[test]
    fn test_base_price_lookup() {
        assert_eq!(base_price("BCN"), 85);
        assert_eq!(base_price("bcn"), 85);
        assert_eq!(base_price("ZZZ"), DEFAULT_BASE_PRICE);
    }

    #[test]
    fn test_variation_stays_within_twenty_percent() {
        let mut rng = StdRng::seed_from_u64(1234);
        for code in ["BCN", "LHR", "SEZ", "ZZZ"] {
            let base = f64::from(base_price(code));
            for _ in 0..500 {
                let price = f64::from(vary_price(&mut rng, base_price(code)));
                assert!(price >= (base * 0.8).floor(), "{code}: {price}");
                assert!(price <= (base * 1.2).ceil(), "{code}: {price}");
            }
        }
    }

    #[test]
    fn test_seeded_generator_is_reproducible() {
        let a = PriceGenerator::seeded(99);
        let b = PriceGenerator::seeded(99);
        let first: Vec<u32> = (0..5).map(|_| a.estimate("CDG")).collect();
        let second: Vec<u32> = (0..5).map(|_| b.estimate("CDG")).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_fare_in_range() {
        let generator = PriceGenerator::seeded(5);
        for _ in 0..200 {
            let fare = generator.fare_in(100..300);
            assert!((100..300).contains(&fare));
        }
        assert!(AIRLINES.contains(&generator.pick(&AIRLINES)));
    }

    #[tokio::test]
    async fn test_mock_adapter_result_shape() {
        let adapter = MockPriceAdapter::seeded(3);
        let destination = Destination::new("BCN", "Barcelona El Prat", "Spain");
        let result = adapter.search(&route(), &destination).await.unwrap();

        assert_eq!(result.destination, destination);
        let headline = result.skyscanner.unwrap();
        assert_eq!(headline.source, QuoteSource::Skyscanner);
        assert!(headline.price.starts_with('€'));
        assert!(!headline.is_placeholder());
        assert!(AIRLINES.contains(&headline.airline.as_deref().unwrap()));
        assert_eq!(
            headline.url,
            "https://www.skyscanner.es/transport/flights/MAD/BCN/2025-07-01/2025-07-08/"
        );

        let google = result.google_flights.unwrap();
        let kayak = result.kayak.unwrap();
        assert_eq!(google.price, "Ver precios");
        assert_eq!(kayak.price, "Ver precios");
        assert_eq!(google.source, QuoteSource::Google);
        assert_eq!(kayak.source, QuoteSource::Kayak);
    }
}
