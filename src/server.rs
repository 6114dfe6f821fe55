//! HTTP surface: JSON summary, HTML view, latest rate, health.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use calculator::{Breakdown, SummaryReport};
use chrono::{SecondsFormat, Utc};
use common::{parse_date, Error, LatestRate};
use fx_client::RateClient;
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::view;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub client: RateClient,
}

/// Query parameters for `/summary` and `/summary/view`.
#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    /// Start date (YYYY-MM-DD).
    pub start: String,
    /// End date (YYYY-MM-DD).
    pub end: String,
    /// `day` (default) or `none`.
    #[serde(default)]
    pub breakdown: Option<String>,
}

/// Maps domain errors onto status codes with a JSON body.
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else if self.0.is_no_data() {
            StatusCode::NOT_FOUND
        } else {
            error!("Error processing request: {}", self.0);
            StatusCode::INTERNAL_SERVER_ERROR
        };

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/summary", get(summary_handler))
        .route("/summary/view", get(summary_view_handler))
        .route("/latest", get(latest_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until the process exits.
pub async fn serve(client: RateClient, bind_addr: &str) -> Result<(), Error> {
    info!("Registering routes:");
    info!("  GET /health");
    info!("  GET /summary?start=2025-01-01&end=2025-01-31&breakdown=day");
    info!("  GET /summary/view?start=2025-01-01&end=2025-01-31");
    info!("  GET /latest");

    let listener = TcpListener::bind(bind_addr).await?;
    info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, router(AppState { client })).await?;
    Ok(())
}

async fn build_report(
    state: &AppState,
    query: Result<Query<SummaryQuery>, QueryRejection>,
) -> Result<SummaryReport, Error> {
    let Query(query) = query.map_err(|e| Error::InvalidQuery(e.body_text()))?;
    let start = parse_date(&query.start)?;
    let end = parse_date(&query.end)?;
    if start > end {
        return Err(Error::InvalidRange { start, end });
    }
    let breakdown: Breakdown = query.breakdown.as_deref().unwrap_or("day").parse()?;

    let series = state.client.get_rates(start, end).await?;
    SummaryReport::build(&series, breakdown, start, end)
}

/// GET /health
async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        "service": "fx-summary",
    }))
}

/// GET /summary — rates, daily changes, and totals as JSON.
async fn summary_handler(
    State(state): State<AppState>,
    query: Result<Query<SummaryQuery>, QueryRejection>,
) -> Result<Json<SummaryReport>, ApiError> {
    Ok(Json(build_report(&state, query).await?))
}

/// GET /summary/view — the same report as an HTML page with a chart.
async fn summary_view_handler(
    State(state): State<AppState>,
    query: Result<Query<SummaryQuery>, QueryRejection>,
) -> Result<Html<String>, ApiError> {
    let report = build_report(&state, query).await?;
    Ok(Html(view::render_summary(&report)))
}

/// GET /latest
async fn latest_handler(State(state): State<AppState>) -> Result<Json<LatestRate>, ApiError> {
    Ok(Json(state.client.get_latest().await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use chrono::NaiveDate;
    use fx_client::{FallbackStore, FetchFailure, RatesPayload, RateSource, SystemClock, TtlCache};
    use std::sync::Arc;
    use tower::ServiceExt;

    /// Upstream that is always down, so every answer comes from the bundled data.
    struct OfflineSource;

    #[async_trait]
    impl RateSource for OfflineSource {
        async fn fetch_range(
            &self,
            _start: NaiveDate,
            _end: NaiveDate,
        ) -> Result<RatesPayload, FetchFailure> {
            Err(FetchFailure::Network("offline".into()))
        }

        async fn fetch_latest(&self) -> Result<RatesPayload, FetchFailure> {
            Err(FetchFailure::Network("offline".into()))
        }
    }

    fn app() -> Router {
        let client = RateClient::new(
            Arc::new(OfflineSource),
            Arc::new(TtlCache::with_ttl_secs(300)),
            Arc::new(SystemClock),
            FallbackStore::bundled().expect("bundled data"),
        );
        router(AppState { client })
    }

    async fn get_response(uri: &str) -> (StatusCode, String) {
        let resp = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
        let (status, body) = get_response(uri).await;
        (status, serde_json::from_str(&body).expect("json body"))
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "fx-summary");
    }

    #[tokio::test]
    async fn test_summary_with_daily_breakdown() {
        let (status, body) = get_json("/summary?start=2025-01-02&end=2025-01-10").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["breakdown"], "day");
        assert_eq!(body["daily"].as_array().unwrap().len(), 7);
        assert!(body["daily"][0]["pct_change"].is_null());
        assert_eq!(body["totals"]["start_rate"], 1.0321);
        assert_eq!(body["totals"]["end_rate"], 1.0304);
    }

    #[tokio::test]
    async fn test_summary_totals_only() {
        let (status, body) =
            get_json("/summary?start=2025-01-02&end=2025-01-10&breakdown=none").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.get("daily").is_none());
        assert!(body["totals"]["mean_rate"].is_number());
    }

    #[tokio::test]
    async fn test_bad_input_is_400() {
        for uri in [
            "/summary?start=2025-01-32&end=2025-02-01",
            "/summary?start=2025-01-10&end=2025-01-02",
            "/summary?start=2025-01-02&end=2025-01-10&breakdown=week",
        ] {
            let (status, body) = get_json(uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert!(body["error"].is_string());
        }
    }

    #[tokio::test]
    async fn test_missing_query_param_is_json_400() {
        for uri in ["/summary?end=2025-01-10", "/summary/view?start=2025-01-02"] {
            let (status, body) = get_json(uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert!(
                body["error"].as_str().unwrap().starts_with("Invalid query"),
                "{uri}: {body}"
            );
        }
    }

    #[tokio::test]
    async fn test_range_without_data_is_404() {
        let (status, body) = get_json("/summary?start=2023-06-01&end=2023-06-30").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("No rate data"));
    }

    #[tokio::test]
    async fn test_view_renders_html() {
        let (status, body) = get_response("/summary/view?start=2025-01-02&end=2025-01-10").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<svg"));
        assert!(body.contains("2025-01-06"));
        assert!(body.contains("EUR"));
    }

    #[tokio::test]
    async fn test_latest_from_fallback() {
        let (status, body) = get_json("/latest").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["date"], "2025-01-31");
        assert_eq!(body["rate"], 1.0393);
    }
}
