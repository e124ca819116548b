//! Turns travel preferences into a priced search request

use chrono::{Days, NaiveDate, Utc};
use rand::RngExt;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::destinations::DestinationPicker;
use crate::models::{Climate, SearchRequest};

/// Length of the trip; `Any` plans a one-week return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TripDuration {
    #[default]
    #[serde(rename = "any")]
    Any,
    #[serde(rename = "7")]
    OneWeek,
    #[serde(rename = "14")]
    TwoWeeks,
    #[serde(rename = "21")]
    ThreeWeeks,
}

impl TripDuration {
    #[must_use]
    pub fn days(&self) -> u64 {
        match self {
            TripDuration::Any | TripDuration::OneWeek => 7,
            TripDuration::TwoWeeks => 14,
            TripDuration::ThreeWeeks => 21,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            TripDuration::Any => "any",
            TripDuration::OneWeek => "7",
            TripDuration::TwoWeeks => "14",
            TripDuration::ThreeWeeks => "21",
        }
    }
}

impl FromStr for TripDuration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "any" => Ok(TripDuration::Any),
            "7" => Ok(TripDuration::OneWeek),
            "14" => Ok(TripDuration::TwoWeeks),
            "21" => Ok(TripDuration::ThreeWeeks),
            other => Err(format!("Unknown trip duration '{other}' (expected any, 7, 14 or 21)")),
        }
    }
}

impl fmt::Display for TripDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TravelPreferences {
    pub climate: Climate,
    pub duration: TripDuration,
}

/// Days ahead of today used when no departure date is given
pub const DEFAULT_LEAD_DAYS: u64 = 30;

#[must_use]
pub fn default_departure() -> NaiveDate {
    let today = Utc::now().date_naive();
    today
        .checked_add_days(Days::new(DEFAULT_LEAD_DAYS))
        .unwrap_or(today)
}

/// Return date for a trip leaving on `departure`
#[must_use]
pub fn return_date(departure: NaiveDate, duration: TripDuration) -> NaiveDate {
    departure
        .checked_add_days(Days::new(duration.days()))
        .unwrap_or(departure)
}

pub struct TripPlanner;

impl TripPlanner {
    /// Pick destinations for the preferences and build the search request
    #[must_use]
    pub fn plan(
        origin: &str,
        preferences: TravelPreferences,
        departure: NaiveDate,
        count: usize,
    ) -> SearchRequest {
        Self::plan_with_rng(&mut rand::rng(), origin, preferences, departure, count)
    }

    pub fn plan_with_rng<R: RngExt>(
        rng: &mut R,
        origin: &str,
        preferences: TravelPreferences,
        departure: NaiveDate,
        count: usize,
    ) -> SearchRequest {
        let origin = origin.trim().to_uppercase();
        let destinations = DestinationPicker::pick_with_rng(rng, preferences.climate, count)
            .into_iter()
            .filter(|d| d.code != origin)
            .collect();

        SearchRequest {
            origin,
            destinations,
            start_date: departure,
            end_date: return_date(departure, preferences.duration),
        }
    }
}
