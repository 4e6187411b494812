use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Number;
use std::time::Duration;

use crate::error::ClientError;

use super::WeatherApiClient;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";

/// OpenWeatherMap "current weather" client, metric units.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String, base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn current_weather_url(&self) -> String {
        format!("{}{}", self.base_url, CURRENT_WEATHER_PATH)
    }
}

#[async_trait]
impl WeatherApiClient for OpenWeatherClient {
    #[tracing::instrument(level = "debug", skip(self))]
    async fn current_weather(&self, city: &str) -> Result<serde_json::Value, ClientError> {
        let res = self
            .http
            .get(self.current_weather_url())
            .query(&[
                ("appid", self.api_key.as_str()),
                ("q", city),
                ("units", "metric"),
            ])
            .send()
            .await?;

        let status = res.status();
        let res = res.error_for_status()?;
        let body = res.text().await?;
        tracing::debug!(%status, body = %truncate_body(&body), "OpenWeather current response");

        serde_json::from_str(&body).map_err(|err| ClientError::Decode(err.to_string()))
    }
}

/// Subset of the current-weather payload the lookup needs.
#[derive(Debug, Deserialize)]
pub struct OwCurrentResponse {
    pub name: String,
    pub sys: OwSys,
    pub main: OwMain,
    pub weather: Vec<OwWeather>,
    #[serde(default)]
    pub wind: OwWind,
    /// Shift from UTC in seconds.
    pub timezone: i64,
}

#[derive(Debug, Deserialize)]
pub struct OwSys {
    pub country: String,
    pub sunrise: i64,
    pub sunset: i64,
}

#[derive(Debug, Deserialize)]
pub struct OwMain {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: Number,
}

#[derive(Debug, Deserialize)]
pub struct OwWeather {
    pub description: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct OwWind {
    pub speed: Option<Number>,
    pub deg: Option<Number>,
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
