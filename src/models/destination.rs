//! Destination and climate preference models

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Candidate destination airport
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
pub struct Destination {
    /// IATA airport code
    pub code: String,
    /// Airport or city name
    pub name: String,
    pub country: String,
}

impl Destination {
    #[must_use]
    pub fn new(code: impl Into<String>, name: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            country: country.into(),
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.code, self.name, self.country)
    }
}

/// Climate tag partitioning the destination catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Climate {
    Europe,
    Warm,
    Tropical,
    Cold,
    #[default]
    Any,
}

impl Climate {
    pub const ALL: [Climate; 5] = [
        Climate::Europe,
        Climate::Warm,
        Climate::Tropical,
        Climate::Cold,
        Climate::Any,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Climate::Europe => "europe",
            Climate::Warm => "warm",
            Climate::Tropical => "tropical",
            Climate::Cold => "cold",
            Climate::Any => "any",
        }
    }

    /// Lenient parse: unknown tags fall back to [`Climate::Any`]
    #[must_use]
    pub fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl FromStr for Climate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "europe" => Ok(Climate::Europe),
            "warm" => Ok(Climate::Warm),
            "tropical" => Ok(Climate::Tropical),
            "cold" => Ok(Climate::Cold),
            "any" | "" => Ok(Climate::Any),
            other => Err(format!("unknown climate '{other}'")),
        }
    }
}

impl fmt::Display for Climate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_climate_parse() {
        assert_eq!("Warm".parse::<Climate>().unwrap(), Climate::Warm);
        assert_eq!(" europe ".parse::<Climate>().unwrap(), Climate::Europe);
        assert!("arctic".parse::<Climate>().is_err());
        assert_eq!(Climate::parse_lenient("arctic"), Climate::Any);
    }

    #[test]
    fn test_destination_display() {
        let dest = Destination::new("BCN", "Barcelona El Prat", "España");
        assert_eq!(dest.to_string(), "BCN (Barcelona El Prat, España)");
    }
}
