use std::error::Error as _;
use thiserror::Error;

/// Failures of a single city lookup.
///
/// The display text of every variant is the exact message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("Please enter a valid city name.")]
    EmptyInput,

    #[error("City name is too long. Please enter a valid city name.")]
    InputTooLong,

    #[error("An error occurred while fetching weather data: {0}")]
    Transport(String),

    #[error("City not found. Please check the city name.")]
    CityNotFound,

    /// The provider answered with a body the pipeline could not use.
    #[error("An error occurred while fetching weather data: {0}")]
    Malformed(String),
}

impl LookupError {
    /// Short machine-readable label, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            LookupError::EmptyInput => "empty_input",
            LookupError::InputTooLong => "input_too_long",
            LookupError::Transport(_) => "transport",
            LookupError::CityNotFound => "city_not_found",
            LookupError::Malformed(_) => "malformed",
        }
    }
}

/// Errors raised by a [`WeatherApiClient`](crate::provider::WeatherApiClient).
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection failure, timeout or a non-2xx HTTP status.
    #[error("{0}")]
    Transport(String),

    /// The response body was not valid JSON.
    #[error("invalid JSON in provider response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL carries the API key.
        let err = err.without_url();

        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }

        ClientError::Transport(message)
    }
}

impl From<ClientError> for LookupError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Transport(msg) => LookupError::Transport(msg),
            ClientError::Decode(msg) => LookupError::Malformed(msg),
        }
    }
}
