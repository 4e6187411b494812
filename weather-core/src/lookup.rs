//! Validation and normalization pipeline for a single city query.
//!
//! `raw city -> validate -> provider call -> status check -> decode -> format`.
//! The first failing step decides the outcome.

use chrono::{DateTime, FixedOffset, Utc};
use serde_json::{Number, Value};
use std::sync::Arc;

use crate::{
    clock::Clock,
    error::LookupError,
    model::{WeatherReport, WeatherResult},
    provider::{WeatherApiClient, openweather::OwCurrentResponse},
};

/// Longest accepted city name, in characters, after trimming.
pub const MAX_CITY_CHARS: usize = 100;

const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone)]
pub struct WeatherLookup {
    client: Arc<dyn WeatherApiClient>,
    clock: Arc<dyn Clock>,
}

impl WeatherLookup {
    pub fn new(client: Arc<dyn WeatherApiClient>, clock: Arc<dyn Clock>) -> Self {
        Self { client, clock }
    }

    /// Run the lookup and fold any failure into a displayable result.
    pub async fn resolve(&self, raw_city: &str) -> WeatherResult {
        self.lookup(raw_city).await.into()
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn lookup(&self, raw_city: &str) -> Result<WeatherReport, LookupError> {
        let city = validate_city(raw_city)?;

        let outcome = match self.client.current_weather(city).await {
            Ok(body) => normalize(body, self.clock.now()),
            Err(err) => Err(err.into()),
        };

        match &outcome {
            Ok(report) => tracing::debug!(city = %report.city, "weather lookup succeeded"),
            Err(err) => tracing::warn!(kind = err.kind(), error = %err, %city, "weather lookup failed"),
        }

        outcome
    }
}

/// Trim and bound-check the submitted city name.
pub fn validate_city(raw: &str) -> Result<&str, LookupError> {
    let city = raw.trim();

    if city.is_empty() {
        return Err(LookupError::EmptyInput);
    }
    if city.chars().count() > MAX_CITY_CHARS {
        return Err(LookupError::InputTooLong);
    }

    Ok(city)
}

/// Turn a parsed provider body into display strings.
///
/// Any `cod` other than the number 200 means the city was not found,
/// whatever else the body contains.
pub fn normalize(body: Value, now: DateTime<Utc>) -> Result<WeatherReport, LookupError> {
    if body.get("cod").and_then(Value::as_f64) != Some(200.0) {
        return Err(LookupError::CityNotFound);
    }

    let parsed: OwCurrentResponse =
        serde_json::from_value(body).map_err(|err| LookupError::Malformed(err.to_string()))?;

    let description = parsed
        .weather
        .first()
        .map(|w| capitalize(&w.description))
        .ok_or_else(|| LookupError::Malformed("response contained no weather conditions".into()))?;

    let zone = local_zone(parsed.timezone)?;
    let local_now = now.with_timezone(&zone);

    Ok(WeatherReport {
        city: format!("{}, {}", parsed.name, parsed.sys.country),
        country: parsed.sys.country,
        day: local_now.format("%A").to_string(),
        date: local_now.format("%d %B %Y").to_string(),
        temperature: format_celsius(parsed.main.temp),
        feels_like: format_celsius(parsed.main.feels_like),
        humidity: format!("{}%", parsed.main.humidity),
        description,
        wind_speed: format!("{} m/s", or_not_available(parsed.wind.speed.as_ref())),
        wind_deg: format!("{}°", or_not_available(parsed.wind.deg.as_ref())),
        sunrise: local_clock_time(parsed.sys.sunrise, &zone)?,
        sunset: local_clock_time(parsed.sys.sunset, &zone)?,
    })
}

/// Fixed-offset zone from the provider's shift in seconds, kept to the second.
fn local_zone(offset_secs: i64) -> Result<FixedOffset, LookupError> {
    i32::try_from(offset_secs)
        .ok()
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| LookupError::Malformed(format!("timezone offset out of range: {offset_secs}")))
}

fn local_clock_time(timestamp: i64, zone: &FixedOffset) -> Result<String, LookupError> {
    DateTime::from_timestamp(timestamp, 0)
        .map(|utc| utc.with_timezone(zone).format("%H:%M:%S").to_string())
        .ok_or_else(|| LookupError::Malformed(format!("timestamp out of range: {timestamp}")))
}

fn format_celsius(value: f64) -> String {
    format!("{value:.2}°C")
}

fn or_not_available(value: Option<&Number>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), Number::to_string)
}

/// Uppercase the first character, leave the rest untouched.
fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{clock::FixedClock, error::ClientError};
    use async_trait::async_trait;
    use chrono::TimeZone;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    enum Reply {
        Body(Value),
        Transport(&'static str),
    }

    #[derive(Debug)]
    struct StubClient {
        reply: Reply,
        calls: AtomicUsize,
    }

    impl StubClient {
        fn new(reply: Reply) -> Arc<Self> {
            Arc::new(Self { reply, calls: AtomicUsize::new(0) })
        }
    }

    #[async_trait]
    impl WeatherApiClient for StubClient {
        async fn current_weather(&self, _city: &str) -> Result<Value, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Reply::Body(body) => Ok(body.clone()),
                Reply::Transport(msg) => Err(ClientError::Transport(msg.to_string())),
            }
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        // Sunday 29 December 2024, 12:00 UTC.
        Utc.with_ymd_and_hms(2024, 12, 29, 12, 0, 0).unwrap()
    }

    fn lookup_with(client: Arc<StubClient>) -> WeatherLookup {
        WeatherLookup::new(client, Arc::new(FixedClock(fixed_now())))
    }

    fn london_body() -> Value {
        json!({
            "cod": 200,
            "name": "London",
            "timezone": 0,
            "sys": {"country": "GB", "sunrise": 1735459200, "sunset": 1735488000},
            "main": {"temp": 21.456, "feels_like": 20.0, "humidity": 81},
            "weather": [{"description": "clear sky"}],
            "wind": {"speed": 3.6, "deg": 250}
        })
    }

    #[tokio::test]
    async fn whitespace_only_input_is_empty() {
        let client = StubClient::new(Reply::Body(london_body()));
        let lookup = lookup_with(client.clone());

        for raw in ["", "   ", "\t\n", "\u{2003}"] {
            assert_eq!(lookup.lookup(raw).await, Err(LookupError::EmptyInput));
        }
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn overlong_input_is_rejected_without_network_call() {
        let client = StubClient::new(Reply::Body(london_body()));
        let lookup = lookup_with(client.clone());

        let raw = format!("  {}  ", "a".repeat(101));
        assert_eq!(lookup.lookup(&raw).await, Err(LookupError::InputTooLong));
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn length_limit_counts_characters_after_trimming() {
        let exactly = "ü".repeat(MAX_CITY_CHARS);
        assert_eq!(validate_city(&format!("   {exactly}   ")), Ok(exactly.as_str()));
        assert_eq!(validate_city(&"ü".repeat(MAX_CITY_CHARS + 1)), Err(LookupError::InputTooLong));
    }

    #[tokio::test]
    async fn success_fields_are_formatted() {
        let client = StubClient::new(Reply::Body(london_body()));
        let report = lookup_with(client.clone()).lookup("  London ").await.unwrap();

        assert_eq!(
            report,
            WeatherReport {
                city: "London, GB".into(),
                country: "GB".into(),
                day: "Sunday".into(),
                date: "29 December 2024".into(),
                temperature: "21.46°C".into(),
                feels_like: "20.00°C".into(),
                humidity: "81%".into(),
                description: "Clear sky".into(),
                wind_speed: "3.6 m/s".into(),
                wind_deg: "250°".into(),
                sunrise: "08:00:00".into(),
                sunset: "16:00:00".into(),
            }
        );
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn not_found_status_wins_over_other_fields() {
        let mut body = london_body();
        body["cod"] = json!(404);
        let lookup = lookup_with(StubClient::new(Reply::Body(body)));

        assert_eq!(lookup.lookup("London").await, Err(LookupError::CityNotFound));
    }

    #[test]
    fn string_or_missing_status_is_not_found() {
        let now = fixed_now();
        assert_eq!(
            normalize(json!({"cod": "404", "message": "city not found"}), now),
            Err(LookupError::CityNotFound)
        );
        assert_eq!(normalize(json!({"cod": "200"}), now), Err(LookupError::CityNotFound));
        assert_eq!(normalize(json!({}), now), Err(LookupError::CityNotFound));
    }

    #[test]
    fn float_status_200_is_found() {
        let mut body = london_body();
        body["cod"] = json!(200.0);

        assert_eq!(normalize(body, fixed_now()).unwrap().city, "London, GB");
    }

    #[tokio::test]
    async fn transport_failure_carries_cause() {
        let lookup = lookup_with(StubClient::new(Reply::Transport("connection refused")));

        let result = lookup.resolve("London").await;
        assert_eq!(
            result,
            WeatherResult::failure(
                "An error occurred while fetching weather data: connection refused"
            )
        );
    }

    #[test]
    fn negative_offset_converts_sunrise() {
        let mut body = london_body();
        body["timezone"] = json!(-18000);
        body["sys"]["sunrise"] = json!(1_700_000_000);

        let report = normalize(body, fixed_now()).unwrap();

        let utc_minus_5 = FixedOffset::west_opt(5 * 3600).unwrap();
        let expected = DateTime::from_timestamp(1_700_000_000, 0)
            .unwrap()
            .with_timezone(&utc_minus_5)
            .format("%H:%M:%S")
            .to_string();
        assert_eq!(report.sunrise, expected);
        assert_eq!(report.sunrise, "17:13:20");
    }

    #[test]
    fn half_hour_offset_is_not_truncated() {
        let mut body = london_body();
        body["timezone"] = json!(19800); // UTC+5:30
        body["sys"]["sunrise"] = json!(1_700_000_000);

        let report = normalize(body, fixed_now()).unwrap();
        assert_eq!(report.sunrise, "03:43:20");
    }

    #[test]
    fn date_follows_local_zone() {
        let mut body = london_body();
        body["timezone"] = json!(14 * 3600);
        let late = Utc.with_ymd_and_hms(2024, 12, 29, 23, 0, 0).unwrap();

        let report = normalize(body, late).unwrap();
        assert_eq!(report.day, "Monday");
        assert_eq!(report.date, "30 December 2024");
    }

    #[test]
    fn missing_wind_defaults_to_not_available() {
        let mut body = london_body();
        body["wind"] = json!({});

        let report = normalize(body.clone(), fixed_now()).unwrap();
        assert_eq!(report.wind_speed, "N/A m/s");
        assert_eq!(report.wind_deg, "N/A°");

        body.as_object_mut().unwrap().remove("wind");
        let report = normalize(body, fixed_now()).unwrap();
        assert_eq!(report.wind_speed, "N/A m/s");
    }

    #[test]
    fn humidity_is_rendered_as_given() {
        let mut body = london_body();
        body["main"]["humidity"] = json!(55.5);

        assert_eq!(normalize(body, fixed_now()).unwrap().humidity, "55.5%");
    }

    #[test]
    fn description_keeps_rest_of_text() {
        assert_eq!(capitalize("clear sky"), "Clear sky");
        assert_eq!(capitalize("light RAIN"), "Light RAIN");
        assert_eq!(capitalize("ßnow"), "SSnow");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn malformed_success_bodies_become_failures() {
        let now = fixed_now();

        let mut no_main = london_body();
        no_main.as_object_mut().unwrap().remove("main");
        assert!(matches!(normalize(no_main, now), Err(LookupError::Malformed(_))));

        let mut no_conditions = london_body();
        no_conditions["weather"] = json!([]);
        assert!(matches!(normalize(no_conditions, now), Err(LookupError::Malformed(_))));

        let mut bad_zone = london_body();
        bad_zone["timezone"] = json!(200_000);
        assert!(matches!(normalize(bad_zone, now), Err(LookupError::Malformed(_))));
    }
}
