//! The aggregation facade: one linear pipeline per operation
//! (client → decoder → normalizer) and the only place provider failures are
//! translated into [`ServiceError`].

use std::sync::Arc;

use chrono::Utc;

use crate::{
    client::{Endpoint, HttpProviderClient, ProviderClient, RawResponse},
    config::Config,
    decode::{self, AirPollutionPayload, CurrentWeatherPayload, ForecastPayload, GeocodePayload, Payload},
    error::{DecodeError, ServiceError},
    history::{self, RandomSource, ThreadRandom},
    model::{AirQualityReading, CurrentWeather, Forecast, GeoCoordinate, HistoricalWeather},
    normalize::{self, IconBase},
};

pub struct WeatherService<C> {
    client: C,
    icons: IconBase,
    random: Arc<dyn RandomSource>,
}

impl<C: std::fmt::Debug> std::fmt::Debug for WeatherService<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherService")
            .field("client", &self.client)
            .field("icons", &self.icons)
            .finish_non_exhaustive()
    }
}

impl WeatherService<HttpProviderClient> {
    /// Build a service talking to the configured provider over HTTP.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = HttpProviderClient::new(config)?;
        Ok(Self::new(client, IconBase::new(config.provider.icon_base_url.as_str())))
    }
}

impl<C: ProviderClient> WeatherService<C> {
    pub fn new(client: C, icons: IconBase) -> Self {
        Self { client, icons, random: Arc::new(ThreadRandom) }
    }

    pub fn with_random_source(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = random;
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub async fn current_weather(&self, city: &str) -> Result<CurrentWeather, ServiceError> {
        let city = require_city(city)?;
        let endpoint = Endpoint::CurrentWeather;

        let res = self.fetch(endpoint, &[("q", city.to_string())]).await?;
        let body = success_body(endpoint, city, res)?;
        let payload: CurrentWeatherPayload = decode_as(endpoint, &body)?;

        normalize::to_current_weather(&payload, &self.icons).map_err(|e| decode_failure(endpoint, e))
    }

    pub async fn forecast(&self, city: &str) -> Result<Forecast, ServiceError> {
        let city = require_city(city)?;
        let endpoint = Endpoint::Forecast;

        let res = self.fetch(endpoint, &[("q", city.to_string())]).await?;
        let body = success_body(endpoint, city, res)?;
        let payload: ForecastPayload = decode_as(endpoint, &body)?;

        normalize::to_forecast(&payload, &self.icons).map_err(|e| decode_failure(endpoint, e))
    }

    /// Geocode the city, then look up pollution at the first match.
    pub async fn air_quality(&self, city: &str) -> Result<AirQualityReading, ServiceError> {
        let city = require_city(city)?;

        let coord = self.geocode(city).await?;

        let endpoint = Endpoint::AirPollution;
        let query = [("lat", coord.lat.to_string()), ("lon", coord.lon.to_string())];
        let res = self.fetch(endpoint, &query).await?;
        if !res.is_success() {
            return Err(upstream_failure(endpoint, res.status));
        }
        let payload: AirPollutionPayload = decode_as(endpoint, &res.body)?;

        normalize::to_air_quality(city, &payload).map_err(|e| decode_failure(endpoint, e))
    }

    /// Synthetic history for the last `days` days (default 5, at most 30).
    /// Makes no upstream call.
    pub fn historical(
        &self,
        city: &str,
        days: Option<u32>,
    ) -> Result<HistoricalWeather, ServiceError> {
        let city = require_city(city)?;
        let days = history::clamp_days(days);

        Ok(history::generate(city, days, Utc::now(), self.random.as_ref()))
    }

    async fn geocode(&self, city: &str) -> Result<GeoCoordinate, ServiceError> {
        let endpoint = Endpoint::Geocode;
        let query = [("q", city.to_string()), ("limit", "1".to_string())];

        let res = self.fetch(endpoint, &query).await?;
        if !res.is_success() {
            tracing::debug!(%endpoint, status = res.status, city, "geocoding failed");
            return Err(ServiceError::NotFound { city: city.to_string() });
        }
        let payload: GeocodePayload = decode_as(endpoint, &res.body)?;

        normalize::resolve_coordinates(&payload)
            .ok_or_else(|| ServiceError::NotFound { city: city.to_string() })
    }

    async fn fetch(
        &self,
        endpoint: Endpoint,
        query: &[(&'static str, String)],
    ) -> Result<RawResponse, ServiceError> {
        self.client.fetch(endpoint, query).await.map_err(|e| {
            tracing::warn!(%endpoint, error = ?e, "provider unreachable");
            ServiceError::Transport(e)
        })
    }
}

fn require_city(city: &str) -> Result<&str, ServiceError> {
    let city = city.trim();
    if city.is_empty() {
        return Err(ServiceError::InvalidArgument);
    }
    Ok(city)
}

fn success_body(endpoint: Endpoint, city: &str, res: RawResponse) -> Result<String, ServiceError> {
    match res.status {
        404 => Err(ServiceError::NotFound { city: city.to_string() }),
        _ if res.is_success() => Ok(res.body),
        status => Err(upstream_failure(endpoint, status)),
    }
}

fn decode_as<T: Payload>(endpoint: Endpoint, body: &str) -> Result<T, ServiceError> {
    decode::decode(body).map_err(|e| decode_failure(endpoint, e))
}

fn decode_failure(endpoint: Endpoint, source: DecodeError) -> ServiceError {
    tracing::warn!(%endpoint, error = %source, "provider payload rejected");
    ServiceError::Decode { endpoint, source }
}

fn upstream_failure(endpoint: Endpoint, status: u16) -> ServiceError {
    tracing::warn!(%endpoint, status, "provider returned an error status");
    ServiceError::Upstream { endpoint, status }
}
