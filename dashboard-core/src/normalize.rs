//! Maps decoded provider payloads into the domain model.

use chrono::DateTime;

use crate::{
    decode::{AirPollutionPayload, Condition, CurrentWeatherPayload, ForecastPayload, GeocodePayload},
    error::DecodeError,
    model::{
        AirComponents, AirQualityReading, AqiLevel, CurrentWeather, DailyForecast, Forecast,
        GeoCoordinate,
    },
};

/// The forecast endpoint reports every 3 hours: 8 samples per day.
pub const SAMPLES_PER_DAY: usize = 8;
pub const MAX_FORECAST_DAYS: usize = 5;

/// Builds `{base}/{code}@2x.png` icon URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconBase(String);

impl IconBase {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self(base.trim_end_matches('/').to_string())
    }

    pub fn url(&self, code: &str) -> String {
        format!("{}/{}@2x.png", self.0, code)
    }
}

/// Round half away from zero to one decimal place.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn first_condition(weather: &[Condition]) -> Result<&Condition, DecodeError> {
    weather.first().ok_or(DecodeError::Invalid("weather array is empty"))
}

pub fn to_current_weather(
    payload: &CurrentWeatherPayload,
    icons: &IconBase,
) -> Result<CurrentWeather, DecodeError> {
    let condition = first_condition(&payload.weather)?;

    Ok(CurrentWeather {
        city: payload.name.clone(),
        temperature: round_one_decimal(payload.main.temp),
        condition: condition.main.clone(),
        description: condition.description.clone(),
        icon_url: icons.url(&condition.icon),
    })
}

/// Takes every 8th sample starting at index 0, at most five. Short lists
/// yield fewer entries; nothing is padded.
pub fn to_daily_forecasts(
    payload: &ForecastPayload,
    icons: &IconBase,
) -> Result<Vec<DailyForecast>, DecodeError> {
    payload
        .list
        .iter()
        .step_by(SAMPLES_PER_DAY)
        .take(MAX_FORECAST_DAYS)
        .map(|entry| {
            let condition = first_condition(&entry.weather)?;
            let date = DateTime::from_timestamp(entry.dt, 0)
                .ok_or(DecodeError::Invalid("forecast timestamp out of range"))?;

            Ok(DailyForecast {
                date,
                temperature: round_one_decimal(entry.main.temp),
                condition: condition.main.clone(),
                description: condition.description.clone(),
                icon_url: icons.url(&condition.icon),
            })
        })
        .collect()
}

pub fn to_forecast(payload: &ForecastPayload, icons: &IconBase) -> Result<Forecast, DecodeError> {
    Ok(Forecast {
        city: payload.city.name.clone(),
        forecasts: to_daily_forecasts(payload, icons)?,
    })
}

/// First geocoding match, or `None` when the lookup found nothing.
pub fn resolve_coordinates(payload: &GeocodePayload) -> Option<GeoCoordinate> {
    payload.0.first().map(|m| GeoCoordinate { lat: m.lat, lon: m.lon })
}

pub fn to_air_quality(
    city: &str,
    payload: &AirPollutionPayload,
) -> Result<AirQualityReading, DecodeError> {
    let sample = payload
        .list
        .first()
        .ok_or(DecodeError::Invalid("air pollution list is empty"))?;
    let c = &sample.components;

    Ok(AirQualityReading {
        city: city.to_string(),
        aqi: sample.main.aqi,
        description: AqiLevel::from_index(sample.main.aqi).label().to_string(),
        components: AirComponents {
            co: c.co,
            no2: c.no2,
            o3: c.o3,
            pm2_5: c.pm2_5,
            pm10: c.pm10,
        },
    })
}
