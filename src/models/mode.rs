//! Price source mode selection

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which price source(s) a request is served from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Simulated prices only
    #[default]
    Mock,
    /// Scraper-style source only
    Scraper,
    /// Third-party flight APIs only
    Apis,
    /// APIs, then scraper, then mock
    Hybrid,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Mock, Mode::Scraper, Mode::Apis, Mode::Hybrid];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Mock => "mock",
            Mode::Scraper => "scraper",
            Mode::Apis => "apis",
            Mode::Hybrid => "hybrid",
        }
    }

    /// Human readable explanation returned alongside results
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Mode::Mock => "Generates realistic simulated prices",
            Mode::Scraper => "Uses the Skyscanner scraper",
            Mode::Apis => "Uses free flight APIs (Aviation Stack, Amadeus, Kiwi)",
            Mode::Hybrid => "Tries the APIs first, then the scraper, finally mock prices",
        }
    }

    /// Parse a configured mode, coercing anything unrecognised to [`Mode::Mock`]
    #[must_use]
    pub fn from_config(value: &str) -> Self {
        match value.parse() {
            Ok(mode) => mode,
            Err(_) => {
                tracing::warn!("Mode '{}' not recognised, using 'mock'", value);
                Mode::Mock
            }
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mock" => Ok(Mode::Mock),
            "scraper" => Ok(Mode::Scraper),
            "apis" => Ok(Mode::Apis),
            "hybrid" => Ok(Mode::Hybrid),
            other => Err(format!("unknown mode '{other}'")),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("mock", Mode::Mock)]
    #[case("SCRAPER", Mode::Scraper)]
    #[case(" apis ", Mode::Apis)]
    #[case("Hybrid", Mode::Hybrid)]
    #[case("puppeteer", Mode::Mock)]
    #[case("", Mode::Mock)]
    fn test_mode_from_config(#[case] input: &str, #[case] expected: Mode) {
        assert_eq!(Mode::from_config(input), expected);
    }

    #[test]
    fn test_every_mode_has_description() {
        for mode in Mode::ALL {
            assert!(!mode.description().is_empty());
            assert_eq!(mode.as_str().parse::<Mode>().unwrap(), mode);
        }
    }
}
