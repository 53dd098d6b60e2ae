//! Plain-text and JSON output for one-shot lookups

use std::fmt::Write;

use serde::Serialize;

use crate::data::ForecastResult;
use crate::mood::{recommend, DayRecommendation};
use crate::ui::widgets::temperature_chart::sparkline_text;

/// JSON document printed by `--json`
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub forecast: &'a ForecastResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<DayRecommendation>>,
}

impl<'a> JsonReport<'a> {
    pub fn new(forecast: &'a ForecastResult, show_mood: bool) -> Self {
        Self {
            forecast,
            recommendations: show_mood.then(|| recommend(forecast)),
        }
    }
}

/// Formats a forecast as a human-readable block of text
pub fn format_forecast(forecast: &ForecastResult, show_mood: bool) -> String {
    let mut output = String::new();

    writeln!(output, "{}", forecast.display_name()).ok();
    if let Some(today) = forecast.today() {
        match &forecast.timezone {
            Some(tz) => writeln!(output, "Today: {:.1}°C ({})", today.max_temperature_c, tz).ok(),
            None => writeln!(output, "Today: {:.1}°C", today.max_temperature_c).ok(),
        };
    }

    if let Some((low, high)) = forecast.temperature_range() {
        writeln!(output, "Daily highs: {:.1}°C to {:.1}°C", low, high).ok();
    }

    if forecast.days.is_empty() {
        writeln!(output, "No forecast days available.").ok();
        return output;
    }

    writeln!(output).ok();
    writeln!(output, "  {}", sparkline_text(&forecast.max_series())).ok();
    writeln!(output).ok();

    let recommendations = recommend(forecast);
    for (day, rec) in forecast.days.iter().zip(&recommendations) {
        let min = day
            .min_temperature_c
            .map(|t| format!("{:>5.1}°C", t))
            .unwrap_or_else(|| "    --".to_string());
        let mut line = format!(
            "  {:<12} {:>5.1}°C / {}",
            day.label(),
            day.max_temperature_c,
            min
        );
        if show_mood {
            line.push_str("   ");
            line.push_str(rec.message());
        }
        writeln!(output, "{}", line.trim_end()).ok();
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DailyForecast;

    fn forecast() -> ForecastResult {
        ForecastResult {
            city_name: "London".to_string(),
            country: Some("United Kingdom".to_string()),
            latitude: 51.5,
            longitude: -0.12,
            timezone: Some("Europe/London".to_string()),
            days: vec![
                DailyForecast {
                    date: "2024-07-15".to_string(),
                    max_temperature_c: 21.4,
                    min_temperature_c: Some(12.1),
                },
                DailyForecast {
                    date: "2024-07-16".to_string(),
                    max_temperature_c: 8.0,
                    min_temperature_c: None,
                },
            ],
        }
    }

    #[test]
    fn test_format_includes_header_and_days() {
        let text = format_forecast(&forecast(), true);
        assert!(text.starts_with("London, United Kingdom\n"));
        assert!(text.contains("Today: 21.4°C (Europe/London)"));
        assert!(text.contains("Daily highs: 8.0°C to 21.4°C"));
        assert!(text.contains("Mon, Jul 15"));
        assert!(text.contains("12.1°C"));
        assert!(text.contains("Great for outdoor activities."));
        assert!(text.contains("Stay cozy indoors."));
    }

    #[test]
    fn test_format_without_mood() {
        let text = format_forecast(&forecast(), false);
        assert!(!text.contains("Stay cozy indoors."));
        assert!(text.contains("Tue, Jul 16"));
    }

    #[test]
    fn test_format_empty_forecast() {
        let mut f = forecast();
        f.days.clear();
        let text = format_forecast(&f, true);
        assert!(text.contains("No forecast days available."));
        assert!(!text.contains("Daily highs"));
    }

    #[test]
    fn test_json_report_shape() {
        let f = forecast();
        let value = serde_json::to_value(JsonReport::new(&f, true)).unwrap();
        assert_eq!(value["forecast"]["city_name"], "London");
        assert_eq!(value["forecast"]["days"].as_array().unwrap().len(), 2);
        assert_eq!(value["recommendations"][1]["mood"], "cozy_indoors");

        let value = serde_json::to_value(JsonReport::new(&f, false)).unwrap();
        assert!(value.get("recommendations").is_none());
    }
}
