//! Text and JSON rendering of the normalized entities.

use std::fmt::Write as _;

use dashboard_core::{AirQualityReading, CurrentWeather, Forecast, HistoricalWeather};
use serde::Serialize;

pub trait Render: Serialize {
    fn human(&self) -> String;
}

pub fn render<T: Render>(value: &T, json: bool) -> anyhow::Result<String> {
    if json {
        Ok(serde_json::to_string_pretty(value)?)
    } else {
        Ok(value.human())
    }
}

impl Render for CurrentWeather {
    fn human(&self) -> String {
        format!(
            "{}: {:.1}°C, {} ({})\nicon: {}",
            self.city, self.temperature, self.condition, self.description, self.icon_url
        )
    }
}

impl Render for Forecast {
    fn human(&self) -> String {
        let mut out = format!("Forecast for {}", self.city);
        for day in &self.forecasts {
            let _ = write!(
                out,
                "\n  {}  {:>5.1}°C  {} ({})",
                day.date.format("%a %Y-%m-%d"),
                day.temperature,
                day.condition,
                day.description
            );
        }
        out
    }
}

impl Render for AirQualityReading {
    fn human(&self) -> String {
        let c = &self.components;
        format!(
            "Air quality in {}: {} (AQI {})\n  CO {:.2}  NO2 {:.2}  O3 {:.2}  PM2.5 {:.2}  PM10 {:.2} μg/m³",
            self.city, self.description, self.aqi, c.co, c.no2, c.o3, c.pm2_5, c.pm10
        )
    }
}

impl Render for HistoricalWeather {
    fn human(&self) -> String {
        let mut out = format!("History for {} (simulated)", self.city);
        for day in &self.historical_data {
            let _ = write!(
                out,
                "\n  {}  {:>5.1}°C  {:>3}%  {:>4} hPa",
                day.date.format("%Y-%m-%d"),
                day.temperature,
                day.humidity,
                day.pressure
            );
        }
        out
    }
}
