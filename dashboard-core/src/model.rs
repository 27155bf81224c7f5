use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentWeather {
    pub city: String,
    /// Degrees Celsius, rounded to one decimal.
    pub temperature: f64,
    pub condition: String,
    pub description: String,
    pub icon_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyForecast {
    pub date: DateTime<Utc>,
    pub temperature: f64,
    pub condition: String,
    pub description: String,
    pub icon_url: String,
}

/// At most five daily samples, one per 24h of the provider's 3-hour series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub city: String,
    pub forecasts: Vec<DailyForecast>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub lat: f64,
    pub lon: f64,
}

/// Provider air quality index, 1 (best) to 5 (worst).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AqiLevel {
    Good,
    Fair,
    Moderate,
    Poor,
    VeryPoor,
    Unknown,
}

impl AqiLevel {
    pub fn from_index(aqi: i32) -> Self {
        match aqi {
            1 => Self::Good,
            2 => Self::Fair,
            3 => Self::Moderate,
            4 => Self::Poor,
            5 => Self::VeryPoor,
            _ => Self::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Moderate => "Moderate",
            Self::Poor => "Poor",
            Self::VeryPoor => "Very Poor",
            Self::Unknown => "Unknown",
        }
    }
}

/// Pollutant concentrations in μg/m³.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AirComponents {
    pub co: f64,
    pub no2: f64,
    pub o3: f64,
    pub pm2_5: f64,
    pub pm10: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirQualityReading {
    /// The name the caller asked for; the provider doesn't echo one back.
    pub city: String,
    pub aqi: i32,
    pub description: String,
    pub components: AirComponents,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalDay {
    pub date: DateTime<Utc>,
    pub temperature: f64,
    pub humidity: u8,
    pub pressure: u16,
}

/// Synthetic history; there is no upstream source behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalWeather {
    pub city: String,
    pub historical_data: Vec<HistoricalDay>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aqi_known_indices() {
        let labels: Vec<_> = (1..=5).map(|i| AqiLevel::from_index(i).label()).collect();
        assert_eq!(labels, ["Good", "Fair", "Moderate", "Poor", "Very Poor"]);
    }

    #[test]
    fn aqi_out_of_range_is_unknown() {
        for aqi in [0, 6, -1, i32::MIN, i32::MAX] {
            assert_eq!(AqiLevel::from_index(aqi), AqiLevel::Unknown, "aqi {aqi}");
            assert_eq!(AqiLevel::from_index(aqi).label(), "Unknown");
        }
    }

    #[test]
    fn current_weather_serializes_camel_case() {
        let cw = CurrentWeather {
            city: "Paris".into(),
            temperature: 15.3,
            condition: "Clouds".into(),
            description: "overcast clouds".into(),
            icon_url: "https://openweathermap.org/img/wn/04d@2x.png".into(),
        };

        let json = serde_json::to_value(&cw).unwrap();
        assert_eq!(json["iconUrl"], "https://openweathermap.org/img/wn/04d@2x.png");
        assert!(json.get("icon_url").is_none());
    }

    #[test]
    fn historical_serializes_historical_data_key() {
        let h = HistoricalWeather { city: "Lima".into(), historical_data: vec![] };
        let json = serde_json::to_value(&h).unwrap();

        assert!(json["historicalData"].is_array());
    }
}
