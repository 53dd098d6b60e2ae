//! Core data models for City Forecast
//!
//! This module contains the query, location and forecast types shared by the
//! resolver, the one-shot report and the terminal UI.

pub mod fetcher;
pub mod forecast;
pub mod geocoding;

pub use fetcher::{FetchError, HttpJsonFetcher, ReqwestFetcher};
pub use forecast::ForecastRequest;
pub use geocoding::GeocodingRequest;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::resolver::ResolveError;

/// A user-supplied city name after whitespace normalization
///
/// `display` keeps the user's casing (it is what the geocoder sees), `key`
/// is the lower-cased form used for cache and in-flight identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityQuery {
    display: String,
    key: String,
}

impl CityQuery {
    /// Trims the input and collapses internal whitespace runs to one space.
    ///
    /// Returns `ResolveError::Validation` when nothing is left.
    pub fn parse(raw: &str) -> Result<Self, ResolveError> {
        let display = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        if display.is_empty() {
            return Err(ResolveError::Validation);
        }
        let key = display.to_lowercase();
        Ok(Self { display, key })
    }

    /// Normalized text with the original casing
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Lower-cased normalized text
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// First match returned by the geocoding service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    /// Latitude coordinate
    pub latitude: f64,
    /// Longitude coordinate
    pub longitude: f64,
    /// Canonical place name as spelled by the geocoder
    pub name: String,
    /// Country name, when the geocoder provides one
    pub country: Option<String>,
    /// IANA timezone of the place, when the geocoder provides one
    pub timezone: Option<String>,
}

/// Forecast values for a single day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    /// Local date as returned by the API (e.g. "2024-07-15")
    pub date: String,
    /// Daily maximum temperature in Celsius
    pub max_temperature_c: f64,
    /// Daily minimum temperature in Celsius
    pub min_temperature_c: Option<f64>,
}

impl DailyForecast {
    /// Short chart label such as "Mon, Jul 15"
    ///
    /// Falls back to the raw date when it is not an ISO date.
    pub fn label(&self) -> String {
        match NaiveDate::parse_from_str(&self.date, "%Y-%m-%d") {
            Ok(date) => date.format("%a, %b %-d").to_string(),
            Err(_) => self.date.clone(),
        }
    }
}

/// A resolved multi-day forecast for one city
///
/// Produced once per successful resolution and shared (behind an `Arc`) by
/// every caller that asked for the same city. Never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    /// Canonical city name from the geocoder
    pub city_name: String,
    /// Country of the resolved city
    pub country: Option<String>,
    /// Latitude the forecast was requested for
    pub latitude: f64,
    /// Longitude the forecast was requested for
    pub longitude: f64,
    /// Timezone the daily series is expressed in
    pub timezone: Option<String>,
    /// Daily values in chronological order
    pub days: Vec<DailyForecast>,
}

impl ForecastResult {
    /// The first day of the series
    pub fn today(&self) -> Option<&DailyForecast> {
        self.days.first()
    }

    /// Maximum temperatures in day order
    pub fn max_series(&self) -> Vec<f64> {
        self.days.iter().map(|d| d.max_temperature_c).collect()
    }

    /// Lowest and highest daily maximum, or `None` for an empty series
    pub fn temperature_range(&self) -> Option<(f64, f64)> {
        self.days.iter().map(|d| d.max_temperature_c).fold(None, |acc, t| match acc {
            None => Some((t, t)),
            Some((lo, hi)) => Some((lo.min(t), hi.max(t))),
        })
    }

    /// "City, Country" when the country is known
    pub fn display_name(&self) -> String {
        match &self.country {
            Some(country) => format!("{}, {}", self.city_name, country),
            None => self.city_name.clone(),
        }
    }
}
