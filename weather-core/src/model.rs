use serde::{Deserialize, Serialize};

use crate::error::LookupError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub city: String,
}

/// Display-ready weather for one city. Every field is already formatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherReport {
    /// `"<name>, <country>"`.
    pub city: String,
    pub country: String,
    pub day: String,
    pub date: String,
    pub temperature: String,
    pub feels_like: String,
    pub humidity: String,
    pub description: String,
    pub wind_speed: String,
    pub wind_deg: String,
    pub sunrise: String,
    pub sunset: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WeatherResult {
    Success(WeatherReport),
    Failure { message: String },
}

impl WeatherResult {
    pub fn failure(message: impl Into<String>) -> Self {
        WeatherResult::Failure { message: message.into() }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, WeatherResult::Success(_))
    }
}

impl From<Result<WeatherReport, LookupError>> for WeatherResult {
    fn from(result: Result<WeatherReport, LookupError>) -> Self {
        match result {
            Ok(report) => WeatherResult::Success(report),
            Err(err) => WeatherResult::failure(err.to_string()),
        }
    }
}
