//! Outbound HTTP to the weather provider.
//!
//! A non-2xx status is not an error here: it comes back as a [`RawResponse`]
//! so the facade can tell a 404 from other provider failures.

use std::{fmt, time::Duration};

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;

use crate::{
    config::{Config, HttpConfig},
    error::TransportError,
};

/// Upstream endpoints the aggregation layer talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    CurrentWeather,
    Forecast,
    Geocode,
    AirPollution,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::CurrentWeather => "weather",
            Endpoint::Forecast => "forecast",
            Endpoint::Geocode => "geocode",
            Endpoint::AirPollution => "air_pollution",
        }
    }

    fn path(&self) -> &'static str {
        match self {
            Endpoint::CurrentWeather => "/weather",
            Endpoint::Forecast => "/forecast",
            Endpoint::Geocode => "/geo/1.0/direct",
            Endpoint::AirPollution => "/air_pollution",
        }
    }

    /// Fixed query parameters sent with every request to this endpoint.
    fn fixed_params(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Endpoint::CurrentWeather | Endpoint::Forecast => &[("units", "metric")],
            Endpoint::Geocode | Endpoint::AirPollution => &[],
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status and body exactly as the provider sent them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait ProviderClient: Send + Sync + fmt::Debug {
    /// Issue one logical request. `query` holds caller-specific parameters;
    /// the credential and endpoint-fixed parameters are added by the client.
    async fn fetch(
        &self,
        endpoint: Endpoint,
        query: &[(&'static str, String)],
    ) -> Result<RawResponse, TransportError>;
}

/// Exponential backoff for transport failures only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// initial_delay * 2^attempt, capped at max_delay.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.initial_delay.saturating_mul(factor).min(self.max_delay)
    }
}

impl From<&HttpConfig> for RetryPolicy {
    fn from(http: &HttpConfig) -> Self {
        Self {
            max_retries: http.max_retries,
            initial_delay: Duration::from_millis(http.retry_initial_delay_ms),
            max_delay: Duration::from_millis(http.retry_max_delay_ms),
        }
    }
}

#[derive(Clone)]
pub struct HttpProviderClient {
    api_key: String,
    base_url: String,
    geo_base_url: String,
    retry: RetryPolicy,
    http: Client,
}

impl fmt::Debug for HttpProviderClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpProviderClient")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("geo_base_url", &self.geo_base_url)
            .field("retry", &self.retry)
            .finish()
    }
}

impl HttpProviderClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.http.timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            api_key: config.api_key()?.to_owned(),
            base_url: config.provider.base_url.trim_end_matches('/').to_owned(),
            geo_base_url: config.provider.geo_base_url.trim_end_matches('/').to_owned(),
            retry: RetryPolicy::from(&config.http),
            http,
        })
    }

    fn url(&self, endpoint: Endpoint) -> String {
        let base = match endpoint {
            Endpoint::Geocode => &self.geo_base_url,
            _ => &self.base_url,
        };
        format!("{}{}", base, endpoint.path())
    }

    /// Errors have the URL stripped since it carries the API key.
    async fn send_once(
        &self,
        endpoint: Endpoint,
        query: &[(&'static str, String)],
    ) -> Result<RawResponse, reqwest::Error> {
        let res = self
            .http
            .get(self.url(endpoint))
            .query(query)
            .query(endpoint.fixed_params())
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = res.status().as_u16();
        let body = res.text().await.map_err(reqwest::Error::without_url)?;

        Ok(RawResponse { status, body })
    }
}

#[async_trait]
impl ProviderClient for HttpProviderClient {
    async fn fetch(
        &self,
        endpoint: Endpoint,
        query: &[(&'static str, String)],
    ) -> Result<RawResponse, TransportError> {
        let mut attempt = 0;

        loop {
            match self.send_once(endpoint, query).await {
                Ok(res) => {
                    tracing::debug!(%endpoint, status = res.status, attempt, "provider responded");
                    return Ok(res);
                }
                Err(source) if attempt < self.retry.max_retries => {
                    let delay = self.retry.delay_for_attempt(attempt);
                    tracing::warn!(
                        %endpoint,
                        attempt,
                        ?delay,
                        error = %source,
                        "provider request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(source) => return Err(TransportError { endpoint, source }),
            }
        }
    }
}
