use anyhow::Context;
use axum::{
    Form, Router,
    extract::{State, rejection::FormRejection},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use std::{sync::Arc, time::Duration};
use tokio::signal;
use tower_http::{
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use weather_core::{Config, Query, SystemClock, WeatherLookup, client_from_config};

use crate::page::{self, PageContext};

/// Inbound request budget; covers the provider call plus rendering.
const REQUEST_TIMEOUT_SLACK: Duration = Duration::from_secs(5);

pub fn router(lookup: WeatherLookup, request_timeout: Duration) -> Router {
    Router::new()
        .route("/", get(show_form).post(submit_form))
        .fallback(fallback)
        .with_state(lookup)
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, request_timeout))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new())
                .on_response(DefaultOnResponse::new()),
        )
}

/// Bind the configured address and serve until Ctrl+C or SIGTERM.
pub async fn serve(config: &Config) -> anyhow::Result<()> {
    let client = client_from_config(config)?;
    let lookup = WeatherLookup::new(client, Arc::new(SystemClock));
    let app = router(lookup, Duration::from_secs(config.timeout_secs) + REQUEST_TIMEOUT_SLACK);

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    tracing::info!(address = %listener.local_addr()?, debug = config.debug, "weather form listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("weather form shut down");
    Ok(())
}

async fn show_form() -> Html<String> {
    Html(page::render(&PageContext::default()))
}

#[tracing::instrument(level = "debug", skip_all)]
async fn submit_form(
    State(lookup): State<WeatherLookup>,
    form: Result<Form<Query>, FormRejection>,
) -> Response {
    let Form(query) = match form {
        Ok(form) => form,
        Err(rejection) => {
            tracing::debug!(%rejection, "rejected weather form submission");
            let html = page::render(&PageContext {
                notice: Some("Missing city field."),
                ..PageContext::default()
            });
            return (StatusCode::BAD_REQUEST, Html(html)).into_response();
        }
    };

    let result = lookup.resolve(&query.city).await;
    let html = page::render(&PageContext {
        city: Some(query.city.trim()),
        result: Some(&result),
        notice: None,
    });
    Html(html).into_response()
}

async fn fallback(uri: Uri) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, format!("No route found for {uri}"))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("signal received, starting graceful shutdown");
}
