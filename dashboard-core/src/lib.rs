//! Core library for the weather dashboard.
//!
//! This crate defines:
//! - The provider client (outbound HTTP to OpenWeatherMap)
//! - Typed decoding of provider responses
//! - Normalization into the dashboard's domain model
//! - The aggregation facade and its error taxonomy
//!
//! It is used by `dashboard-cli`, but can also sit behind an HTTP controller.

pub mod client;
pub mod config;
pub mod decode;
pub mod error;
pub mod history;
pub mod model;
pub mod normalize;
pub mod service;

pub use client::{Endpoint, HttpProviderClient, ProviderClient, RawResponse, RetryPolicy};
pub use config::Config;
pub use error::{DecodeError, ErrorCategory, ServiceError, TransportError};
pub use history::{RandomSource, ThreadRandom};
pub use model::{
    AirComponents, AirQualityReading, AqiLevel, CurrentWeather, DailyForecast, Forecast,
    GeoCoordinate, HistoricalDay, HistoricalWeather,
};
pub use service::WeatherService;
