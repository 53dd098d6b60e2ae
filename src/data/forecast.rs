//! Open-Meteo forecast API client
//!
//! This module builds the daily-forecast request for a set of coordinates and
//! parses the response into our `ForecastResult` structure.

use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;

use super::{DailyForecast, FetchError, ForecastResult, GeoLocation};

/// Base URL for the Open-Meteo forecast API
pub const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Number of days requested by default
pub const DEFAULT_FORECAST_DAYS: u8 = 7;

/// Parameters for a daily temperature forecast
#[derive(Debug, Clone)]
pub struct ForecastRequest {
    base_url: String,
    days: u8,
}

impl Default for ForecastRequest {
    fn default() -> Self {
        Self::new(FORECAST_URL)
    }
}

impl ForecastRequest {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            days: DEFAULT_FORECAST_DAYS,
        }
    }

    /// Overrides the number of forecast days
    pub fn with_days(mut self, days: u8) -> Self {
        self.days = days;
        self
    }

    /// Builds the forecast URL for the given coordinates
    ///
    /// Requests daily max/min temperature in the location's own timezone.
    pub fn url(&self, lat: f64, lon: f64) -> Result<Url, FetchError> {
        let days = self.days.to_string();
        Url::parse_with_params(
            &self.base_url,
            &[
                ("latitude", lat.to_string().as_str()),
                ("longitude", lon.to_string().as_str()),
                ("daily", "temperature_2m_max,temperature_2m_min"),
                ("timezone", "auto"),
                ("forecast_days", days.as_str()),
            ],
        )
        .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", self.base_url, e)))
    }
}

/// Parses a forecast response and attaches the geocoded place to it
///
/// Fails with `FetchError::InvalidData` when the daily max series is missing,
/// misaligned with the dates, or null on every day. Days with a null max are
/// left out.
pub fn parse_forecast(body: Value, place: &GeoLocation) -> Result<ForecastResult, FetchError> {
    let response: OpenMeteoResponse = serde_json::from_value(body)
        .map_err(|e| FetchError::InvalidData(format!("forecast response: {}", e)))?;

    let daily = response
        .daily
        .ok_or_else(|| FetchError::InvalidData("missing daily series".to_string()))?;
    let max = daily
        .temperature_2m_max
        .ok_or_else(|| FetchError::InvalidData("missing temperature_2m_max".to_string()))?;

    if max.len() != daily.time.len() {
        return Err(FetchError::InvalidData(
            "daily arrays have inconsistent lengths".to_string(),
        ));
    }

    let min = match daily.temperature_2m_min {
        Some(min) if min.len() == daily.time.len() => min,
        Some(min) => {
            tracing::warn!(
                expected = daily.time.len(),
                got = min.len(),
                "ignoring misaligned temperature_2m_min series"
            );
            vec![None; daily.time.len()]
        }
        None => vec![None; daily.time.len()],
    };

    let total = daily.time.len();
    let days: Vec<DailyForecast> = daily
        .time
        .into_iter()
        .zip(max)
        .zip(min)
        .filter_map(|((date, max_temperature_c), min_temperature_c)| {
            Some(DailyForecast {
                date,
                max_temperature_c: max_temperature_c?,
                min_temperature_c,
            })
        })
        .collect();

    if days.is_empty() && total > 0 {
        return Err(FetchError::InvalidData(
            "temperature_2m_max has no values".to_string(),
        ));
    }
    if days.len() < total {
        tracing::warn!(
            dropped = total - days.len(),
            "skipping days without a temperature_2m_max value"
        );
    }

    Ok(ForecastResult {
        city_name: place.name.clone(),
        country: place.country.clone(),
        latitude: place.latitude,
        longitude: place.longitude,
        timezone: response.timezone.or_else(|| place.timezone.clone()),
        days,
    })
}

/// Open-Meteo forecast response structure
#[derive(Debug, Deserialize)]
struct OpenMeteoResponse {
    timezone: Option<String>,
    daily: Option<DailyWeather>,
}

/// Daily weather data from Open-Meteo
#[derive(Debug, Deserialize)]
struct DailyWeather {
    time: Vec<String>,
    temperature_2m_max: Option<Vec<Option<f64>>>,
    temperature_2m_min: Option<Vec<Option<f64>>>,
}
