//! Destination catalog and random destination picker
//!
//! The catalog is a static table partitioned by climate tag. Airports may
//! appear in more than one partition.

use rand::RngExt;
use std::collections::HashSet;
use tracing::debug;

use crate::models::{Climate, Destination};

/// Draws allowed per slot before giving up on finding an unused destination
pub const MAX_DRAWS_PER_SLOT: usize = 20;

/// Static catalog row
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub code: &'static str,
    pub name: &'static str,
    pub country: &'static str,
}

impl CatalogEntry {
    #[must_use]
    pub fn to_destination(&self) -> Destination {
        Destination::new(self.code, self.name, self.country)
    }
}

const fn entry(code: &'static str, name: &'static str, country: &'static str) -> CatalogEntry {
    CatalogEntry {
        code,
        name,
        country,
    }
}

static EUROPE: &[CatalogEntry] = &[
    entry("LHR", "London Heathrow", "United Kingdom"),
    entry("CDG", "Paris Charles de Gaulle", "France"),
    entry("FCO", "Rome Fiumicino", "Italy"),
    entry("AMS", "Amsterdam Schiphol", "Netherlands"),
    entry("BER", "Berlin Brandenburg", "Germany"),
    entry("VIE", "Vienna Schwechat", "Austria"),
    entry("PRG", "Prague Václav Havel", "Czech Republic"),
    entry("BUD", "Budapest Ferenc Liszt", "Hungary"),
    entry("CPH", "Copenhagen Kastrup", "Denmark"),
    entry("ARN", "Stockholm Arlanda", "Sweden"),
    entry("FRA", "Frankfurt", "Germany"),
    entry("ZRH", "Zurich", "Switzerland"),
    entry("BCN", "Barcelona El Prat", "Spain"),
    entry("IST", "Istanbul", "Turkey"),
    entry("DUB", "Dublin", "Ireland"),
    entry("GVA", "Geneva", "Switzerland"),
    entry("SVO", "Moscow Sheremetyevo", "Russia"),
    entry("RIX", "Riga", "Latvia"),
    entry("EDI", "Edinburgh", "United Kingdom"),
];

static WARM: &[CatalogEntry] = &[
    entry("DXB", "Dubai International", "United Arab Emirates"),
    entry("BKK", "Bangkok Suvarnabhumi", "Thailand"),
    entry("SIN", "Singapore Changi", "Singapore"),
    entry("KUL", "Kuala Lumpur International", "Malaysia"),
    entry("HKT", "Phuket International", "Thailand"),
    entry("MLE", "Malé Velana", "Maldives"),
    entry("CMB", "Colombo Bandaranaike", "Sri Lanka"),
    entry("DOH", "Doha Hamad", "Qatar"),
    entry("MCT", "Muscat", "Oman"),
    entry("CAI", "Cairo", "Egypt"),
    entry("AUH", "Abu Dhabi", "United Arab Emirates"),
    entry("JED", "Jeddah", "Saudi Arabia"),
    entry("CMN", "Casablanca", "Morocco"),
    entry("CAN", "Guangzhou Baiyun", "China"),
    entry("SZX", "Shenzhen Bao'an", "China"),
    entry("KMG", "Kunming Changshui", "China"),
    entry("HAK", "Haikou Meilan", "China"),
];

static TROPICAL: &[CatalogEntry] = &[
    entry("MIA", "Miami International", "United States"),
    entry("CUN", "Cancún International", "Mexico"),
    entry("PUJ", "Punta Cana International", "Dominican Republic"),
    entry("HAV", "Havana José Martí", "Cuba"),
    entry("GCM", "Grand Cayman Owen Roberts", "Cayman Islands"),
    entry("NAS", "Nassau Lynden Pindling", "Bahamas"),
    entry("BGI", "Bridgetown Grantley Adams", "Barbados"),
    entry("SJU", "San Juan Luis Muñoz Marín", "Puerto Rico"),
    entry("PTY", "Panama Tocumen", "Panama"),
    entry("MRU", "Mauritius Sir Seewoosagur Ramgoolam", "Mauritius"),
    entry("SEZ", "Seychelles", "Seychelles"),
    entry("BKK", "Bangkok Suvarnabhumi", "Thailand"),
    entry("HNL", "Honolulu", "United States"),
];

static COLD: &[CatalogEntry] = &[
    entry("YOW", "Ottawa Macdonald-Cartier", "Canada"),
    entry("YVR", "Vancouver International", "Canada"),
    entry("YYZ", "Toronto Pearson", "Canada"),
    entry("HEL", "Helsinki Vantaa", "Finland"),
    entry("OSL", "Oslo Gardermoen", "Norway"),
    entry("KEF", "Reykjavik Keflavík", "Iceland"),
    entry("TLL", "Tallinn Lennart Meri", "Estonia"),
    entry("SVO", "Moscow Sheremetyevo", "Russia"),
    entry("RIX", "Riga", "Latvia"),
    entry("EDI", "Edinburgh", "United Kingdom"),
    entry("GVA", "Geneva", "Switzerland"),
    entry("MUC", "Munich", "Germany"),
    entry("LED", "Saint Petersburg Pulkovo", "Russia"),
    entry("PEK", "Beijing Capital", "China"),
    entry("PKX", "Beijing Daxing", "China"),
    entry("TSN", "Tianjin Binhai", "China"),
    entry("DLC", "Dalian Zhoushuizi", "China"),
];

static ANY: &[CatalogEntry] = &[
    entry("JFK", "New York JFK", "United States"),
    entry("LAX", "Los Angeles International", "United States"),
    entry("ORD", "Chicago O'Hare", "United States"),
    entry("NRT", "Tokyo Narita", "Japan"),
    entry("HND", "Tokyo Haneda", "Japan"),
    entry("ICN", "Seoul Incheon", "South Korea"),
    entry("SYD", "Sydney Kingsford Smith", "Australia"),
    entry("MEL", "Melbourne Tullamarine", "Australia"),
    entry("AKL", "Auckland International", "New Zealand"),
    entry("CPT", "Cape Town International", "South Africa"),
    entry("GRU", "São Paulo Guarulhos", "Brazil"),
    entry("EZE", "Buenos Aires Ezeiza", "Argentina"),
    entry("JNB", "Johannesburg OR Tambo", "South Africa"),
    entry("DEL", "Delhi Indira Gandhi", "India"),
    entry("BKK", "Bangkok Suvarnabhumi", "Thailand"),
    entry("DXB", "Dubai International", "United Arab Emirates"),
    entry("MEX", "Mexico City", "Mexico"),
    entry("SFO", "San Francisco", "United States"),
    entry("YYZ", "Toronto Pearson", "Canada"),
    entry("PVG", "Shanghai Pudong", "China"),
    entry("SHA", "Shanghai Hongqiao", "China"),
    entry("CAN", "Guangzhou Baiyun", "China"),
    entry("SZX", "Shenzhen Bao'an", "China"),
    entry("CTU", "Chengdu Shuangliu", "China"),
    entry("CKG", "Chongqing Jiangbei", "China"),
    entry("XIY", "Xi'an Xianyang", "China"),
    entry("HGH", "Hangzhou Xiaoshan", "China"),
    entry("KMG", "Kunming Changshui", "China"),
    entry("HAK", "Haikou Meilan", "China"),
    entry("CSX", "Changsha Huanghua", "China"),
    entry("DLC", "Dalian Zhoushuizi", "China"),
    entry("TSN", "Tianjin Binhai", "China"),
];

/// Catalog partition for a climate tag
#[must_use]
pub fn catalog(climate: Climate) -> &'static [CatalogEntry] {
    match climate {
        Climate::Europe => EUROPE,
        Climate::Warm => WARM,
        Climate::Tropical => TROPICAL,
        Climate::Cold => COLD,
        Climate::Any => ANY,
    }
}

/// Look up a destination by IATA code across every partition
#[must_use]
pub fn find(code: &str) -> Option<Destination> {
    Climate::ALL
        .iter()
        .flat_map(|climate| catalog(*climate).iter())
        .find(|entry| entry.code.eq_ignore_ascii_case(code))
        .map(CatalogEntry::to_destination)
}

/// Random destination picker over the static catalog
pub struct DestinationPicker;

impl DestinationPicker {
    /// Pick up to `count` distinct destinations for a climate
    #[must_use]
    pub fn pick(climate: Climate, count: usize) -> Vec<Destination> {
        Self::pick_with_rng(&mut rand::rng(), climate, count)
    }

    /// Pick with a caller-supplied random source.
    ///
    /// Each slot gets at most [`MAX_DRAWS_PER_SLOT`] draws to find a code not
    /// already picked; a slot that runs out of draws is skipped, so the result
    /// may be shorter than `count`. Picking stops once the partition is used up.
    pub fn pick_with_rng<R: RngExt>(
        rng: &mut R,
        climate: Climate,
        count: usize,
    ) -> Vec<Destination> {
        let pool = catalog(climate);
        let mut used: HashSet<&'static str> = HashSet::new();
        let mut picked = Vec::with_capacity(count.min(pool.len()));

        for slot in 0..count {
            if used.len() == pool.len() {
                break;
            }
            let drawn = (0..MAX_DRAWS_PER_SLOT)
                .map(|_| &pool[rng.random_range(0..pool.len())])
                .find(|entry| !used.contains(entry.code));

            match drawn {
                Some(entry) => {
                    used.insert(entry.code);
                    picked.push(entry.to_destination());
                }
                None => debug!(
                    "No unused {} destination after {} draws for slot {}",
                    climate, MAX_DRAWS_PER_SLOT, slot
                ),
            }
        }

        debug!(
            "Picked {}/{} {} destinations: {:?}",
            picked.len(),
            count,
            climate,
            picked.iter().map(|d| d.code.as_str()).collect::<Vec<_>>()
        );

        picked
    }
}
