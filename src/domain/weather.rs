use serde::{Deserialize, Serialize};

use super::Coordinates;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailySeries {
    #[serde(rename = "temperature_2m_mean", default)]
    pub temperature: Vec<Option<f64>>,
    #[serde(rename = "precipitation_probability_mean", default)]
    pub precipitation: Vec<Option<f64>>,
}

/// Daily forecast series for one location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherSeries {
    #[serde(default)]
    pub daily: DailySeries,
}

impl WeatherSeries {
    /// `None` when the provider sent no temperature readings.
    pub fn mean_temperature(&self) -> Option<f64> {
        mean(&self.daily.temperature)
    }

    /// `None` when the provider sent no precipitation readings.
    pub fn mean_precipitation(&self) -> Option<f64> {
        mean(&self.daily.precipitation)
    }

    /// Whether at least one day carries a reading in either series.
    pub fn has_readings(&self) -> bool {
        self.daily
            .temperature
            .iter()
            .chain(&self.daily.precipitation)
            .flatten()
            .next()
            .is_some()
    }
}

pub fn weather_cache_key(coordinates: Coordinates) -> String {
    format!(
        "weather:{:.6}:{:.6}",
        coordinates.latitude, coordinates.longitude
    )
}

/// Arithmetic mean over the values present, rounded to two decimals.
/// `None` when no value is present.
pub fn mean(values: &[Option<f64>]) -> Option<f64> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    if present.is_empty() {
        return None;
    }
    let mean = present.iter().sum::<f64>() / present.len() as f64;
    Some((mean * 100.0).round() / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_skips_missing_days() {
        assert_eq!(mean(&[Some(2.0), None, Some(4.0)]), Some(3.0));
        assert_eq!(mean(&[Some(1.0), Some(2.0), Some(2.0)]), Some(1.67));
    }

    #[test]
    fn no_readings_means_no_mean() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[None, None]), None);
    }

    #[test]
    fn all_null_forecast_has_no_readings() {
        let empty: WeatherSeries = serde_json::from_str(
            r#"{"daily":{"temperature_2m_mean":[null,null],"precipitation_probability_mean":[null,null]}}"#,
        )
        .unwrap();
        assert!(!empty.has_readings());
        assert_eq!(empty.mean_temperature(), None);

        let partial: WeatherSeries =
            serde_json::from_str(r#"{"daily":{"temperature_2m_mean":[null,4.5]}}"#).unwrap();
        assert!(partial.has_readings());
        assert_eq!(partial.mean_temperature(), Some(4.5));
        assert_eq!(partial.mean_precipitation(), None);
    }

    #[test]
    fn key_includes_both_coordinates() {
        let a = weather_cache_key(Coordinates { latitude: 62.0, longitude: 10.0 });
        let b = weather_cache_key(Coordinates { latitude: 10.0, longitude: 62.0 });
        assert_eq!(a, "weather:62.000000:10.000000");
        assert_ne!(a, b);
    }
}
