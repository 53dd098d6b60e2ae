//! Daily activity suggestions derived from the forecast.
//!
//! Each day's maximum temperature falls into one of four bands, and each band
//! maps to a fixed suggestion. Pure and stateless.

use serde::Serialize;

use crate::data::ForecastResult;

/// Suggested activity for a day, chosen by temperature band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    /// Below 10°C
    CozyIndoors,
    /// 10°C up to (not including) 20°C
    Jog,
    /// 20°C up to (not including) 30°C
    OutdoorActivities,
    /// 30°C and above
    CarryWater,
}

impl Mood {
    /// Picks the band for a maximum temperature in Celsius.
    pub fn for_temperature(max_temperature_c: f64) -> Mood {
        if max_temperature_c < 10.0 {
            Mood::CozyIndoors
        } else if max_temperature_c < 20.0 {
            Mood::Jog
        } else if max_temperature_c < 30.0 {
            Mood::OutdoorActivities
        } else {
            Mood::CarryWater
        }
    }

    /// Full recommendation sentence.
    pub fn message(&self) -> &'static str {
        match self {
            Mood::CozyIndoors => "Stay cozy indoors.",
            Mood::Jog => "Perfect for a jog.",
            Mood::OutdoorActivities => "Great for outdoor activities.",
            Mood::CarryWater => "Carry water - you'll need it!",
        }
    }
}

/// The suggestion for one forecast day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayRecommendation {
    pub date: String,
    pub max_temperature_c: f64,
    pub mood: Mood,
}

impl DayRecommendation {
    pub fn message(&self) -> &'static str {
        self.mood.message()
    }
}

/// One recommendation per forecast day, in day order.
pub fn recommend(forecast: &ForecastResult) -> Vec<DayRecommendation> {
    forecast
        .days
        .iter()
        .map(|day| DayRecommendation {
            date: day.date.clone(),
            max_temperature_c: day.max_temperature_c,
            mood: Mood::for_temperature(day.max_temperature_c),
        })
        .collect()
}
