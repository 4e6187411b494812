//! Core library for the city weather form.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The provider client abstraction and its OpenWeatherMap implementation
//! - The lookup pipeline turning a raw city name into display-ready fields
//!
//! It is used by `weather-web`, but can also be reused by other binaries or services.

pub mod clock;
pub mod config;
pub mod error;
pub mod lookup;
pub mod model;
pub mod provider;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use error::{ClientError, LookupError};
pub use lookup::WeatherLookup;
pub use model::{Query, WeatherReport, WeatherResult};
pub use provider::{WeatherApiClient, client_from_config};
