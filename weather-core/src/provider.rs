use crate::{Config, error::ClientError, provider::openweather::OpenWeatherClient};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc, time::Duration};

pub mod openweather;

/// Outbound capability used by the lookup pipeline: one GET for the current
/// weather of a city, answered with the parsed JSON body.
#[async_trait]
pub trait WeatherApiClient: Send + Sync + Debug {
    async fn current_weather(&self, city: &str) -> Result<serde_json::Value, ClientError>;
}

/// Construct the provider client from config.
pub fn client_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherApiClient>> {
    let api_key = config.api_key()?;

    let client = OpenWeatherClient::new(
        api_key.to_owned(),
        &config.base_url,
        Duration::from_secs(config.timeout_secs),
    )?;

    Ok(Arc::new(client))
}
