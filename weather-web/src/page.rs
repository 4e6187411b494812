//! HTML rendering for the single form page.

use askama::Template;
use weather_core::{WeatherReport, WeatherResult};

/// The form page; what it shows below the form depends on the fields.
#[derive(Debug, Default, Template)]
#[template(path = "weather.html")]
pub struct PageContext<'a> {
    /// Value to prefill the city input with.
    pub city: Option<&'a str>,
    pub result: Option<&'a WeatherResult>,
    /// Request-level problem that is not a lookup outcome.
    pub notice: Option<&'a str>,
}

impl PageContext<'_> {
    fn city_value(&self) -> &str {
        self.city.unwrap_or_default()
    }

    fn report(&self) -> Option<&WeatherReport> {
        match self.result {
            Some(WeatherResult::Success(report)) => Some(report),
            _ => None,
        }
    }

    fn failure(&self) -> Option<&str> {
        match self.result {
            Some(WeatherResult::Failure { message }) => Some(message),
            _ => None,
        }
    }
}

pub fn render(ctx: &PageContext<'_>) -> String {
    ctx.render().unwrap_or_else(|err| {
        tracing::error!(error = %err, "weather page rendering failed");
        format!("Template error: {err}")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> WeatherReport {
        WeatherReport {
            city: "London, GB".into(),
            country: "GB".into(),
            day: "Sunday".into(),
            date: "29 December 2024".into(),
            temperature: "21.46°C".into(),
            feels_like: "20.00°C".into(),
            humidity: "81%".into(),
            description: "Clear sky".into(),
            wind_speed: "N/A m/s".into(),
            wind_deg: "250°".into(),
            sunrise: "08:00:00".into(),
            sunset: "16:00:00".into(),
        }
    }

    #[test]
    fn bare_form_has_no_result_section() {
        let html = render(&PageContext::default());

        assert!(html.contains("<form method=\"post\""));
        assert!(html.contains("value=\"\""));
        assert!(!html.contains("class=\"weather\""));
        assert!(!html.contains("class=\"error\""));
    }

    #[test]
    fn success_shows_every_field() {
        let result = WeatherResult::Success(report());
        let html = render(&PageContext { city: Some("London"), result: Some(&result), notice: None });

        for needle in [
            "London, GB",
            "Sunday, 29 December 2024",
            "21.46°C",
            "20.00°C",
            "81%",
            "Clear sky",
            "N/A m/s",
            "250°",
            "08:00:00",
            "16:00:00",
        ] {
            assert!(html.contains(needle), "missing {needle}");
        }
        assert!(html.contains("value=\"London\""));
    }

    #[test]
    fn failure_message_is_shown() {
        let result = WeatherResult::failure("City not found. Please check the city name.");
        let html = render(&PageContext { city: Some("Atlantis"), result: Some(&result), notice: None });

        assert!(html.contains("<p class=\"error\">City not found. Please check the city name.</p>"));
    }

    #[test]
    fn user_input_is_escaped() {
        let html = render(&PageContext {
            city: Some("\"><script>alert(1)</script>"),
            result: None,
            notice: None,
        });

        assert!(!html.contains("<script>"));
        assert!(html.contains("&quot;&gt;&lt;script&gt;"));
    }
}
