//! Live rate retrieval from the Frankfurter API.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use common::{BASE_CURRENCY, SYMBOL_CURRENCY};
use thiserror::Error;
use tracing::debug;

use crate::payload::RatesPayload;

/// Why a live fetch produced no usable data. Never surfaced past `RateClient`.
#[derive(Debug, Error)]
pub enum FetchFailure {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed payload: {0}")]
    Malformed(String),

    #[error("no rates returned for {0}")]
    Empty(String),
}

impl From<reqwest::Error> for FetchFailure {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchFailure::Timeout(e.to_string())
        } else if e.is_decode() {
            FetchFailure::Malformed(e.to_string())
        } else {
            FetchFailure::Network(e.to_string())
        }
    }
}

/// Upstream provider of EUR→USD rates.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Rates for every published day in `[start, end]`.
    async fn fetch_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RatesPayload, FetchFailure>;

    /// The most recently published rate.
    async fn fetch_latest(&self) -> Result<RatesPayload, FetchFailure>;
}

/// Frankfurter API client with connection pooling and a hard request timeout.
#[derive(Debug, Clone)]
pub struct FrankfurterSource {
    client: reqwest::Client,
    base_url: String,
}

impl FrankfurterSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("fx-summary/0.1")
            .pool_max_idle_per_host(4)
            .timeout(timeout)
            .build()
            .expect("failed to build Frankfurter HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_payload(&self, url: &str) -> Result<RatesPayload, FetchFailure> {
        debug!(
            "Fetching FX rates: {} base={} symbols={}",
            url, BASE_CURRENCY, SYMBOL_CURRENCY
        );

        let resp = self
            .client
            .get(url)
            .query(&[("base", BASE_CURRENCY), ("symbols", SYMBOL_CURRENCY)])
            .send()
            .await?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchFailure::Status {
                status,
                body: body.chars().take(500).collect(),
            });
        }

        // Decode errors surface as `FetchFailure::Malformed`.
        Ok(resp.json::<RatesPayload>().await?)
    }
}

#[async_trait]
impl RateSource for FrankfurterSource {
    async fn fetch_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RatesPayload, FetchFailure> {
        let url = format!("{}/{}..{}", self.base_url, start, end);
        self.get_payload(&url).await
    }

    async fn fetch_latest(&self) -> Result<RatesPayload, FetchFailure> {
        let url = format!("{}/latest", self.base_url);
        self.get_payload(&url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Path, Query};
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;
    use std::collections::HashMap;

    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/v1")
    }

    fn d(raw: &str) -> NaiveDate {
        raw.parse().unwrap()
    }

    #[tokio::test]
    async fn test_fetch_range_sends_path_and_query() {
        let app = Router::new().route(
            "/v1/:range",
            get(
                |Path(range): Path<String>, Query(q): Query<HashMap<String, String>>| async move {
                    assert_eq!(range, "2025-01-02..2025-01-03");
                    assert_eq!(q.get("base").map(String::as_str), Some("EUR"));
                    assert_eq!(q.get("symbols").map(String::as_str), Some("USD"));
                    r#"{"base":"EUR","rates":{"2025-01-02":{"USD":1.0321},"2025-01-03":{"USD":1.0299}}}"#
                },
            ),
        );
        let source = FrankfurterSource::new(spawn(app).await, Duration::from_secs(5));

        let payload = source
            .fetch_range(d("2025-01-02"), d("2025-01-03"))
            .await
            .expect("fetch succeeds");
        assert_eq!(payload.to_series("USD").len(), 2);
    }

    #[tokio::test]
    async fn test_non_success_status_is_failure() {
        let app = Router::new().route(
            "/v1/:range",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream down") }),
        );
        let source = FrankfurterSource::new(spawn(app).await, Duration::from_secs(5));

        let err = source
            .fetch_range(d("2025-01-02"), d("2025-01-03"))
            .await
            .unwrap_err();
        match err {
            FetchFailure::Status { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "upstream down");
            }
            other => panic!("expected status failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_failure() {
        let app = Router::new().route("/v1/:range", get(|| async { "<html>oops</html>" }));
        let source = FrankfurterSource::new(spawn(app).await, Duration::from_secs(5));

        let err = source.fetch_latest().await.unwrap_err();
        assert!(matches!(err, FetchFailure::Malformed(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_slow_upstream_times_out() {
        let app = Router::new().route(
            "/v1/:range",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                "{}"
            }),
        );
        let source = FrankfurterSource::new(spawn(app).await, Duration::from_millis(200));

        let err = source.fetch_latest().await.unwrap_err();
        assert!(matches!(err, FetchFailure::Timeout(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_failure() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let source = FrankfurterSource::new(format!("http://{addr}/v1/"), Duration::from_secs(2));
        assert_eq!(source.base_url(), format!("http://{addr}/v1"));

        let err = source.fetch_latest().await.unwrap_err();
        assert!(matches!(err, FetchFailure::Network(_)), "got {err:?}");
    }
}
