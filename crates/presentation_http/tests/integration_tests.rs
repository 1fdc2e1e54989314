//! Integration tests for HTTP handlers
#![allow(clippy::expect_used)]

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use application::{
    WeatherService, WeatherServiceConfig, error::ApplicationError, ports::WeatherFeedPort,
};
use async_trait::async_trait;
use axum::{body::Body, http::Request, http::StatusCode};
use axum_test::TestServer;
use chrono::Utc;
use domain::{Measurements, Reading, Timezone, WindDirection};
use infrastructure::{
    FreshnessConfig,
    persistence::{AsyncDatabase, SqliteReadingStore},
};
use presentation_http::{
    error::ErrorResponse,
    handlers::{
        health::{HealthResponse, ReadinessResponse},
        weather::{ApiReading, PageResponse},
    },
    routes::create_router,
    state::AppState,
};
use tower::ServiceExt;

const PROVIDER: &str = "Rooftop Station";

/// What the fake feed answers with
#[derive(Clone, Copy)]
enum FeedMode {
    Observe(f64),
    Garbled,
    Down,
}

/// Feed that observes "now" on every fetch and counts calls
struct FakeFeed {
    mode: FeedMode,
    calls: AtomicUsize,
}

impl FakeFeed {
    fn new(mode: FeedMode) -> Self {
        Self {
            mode,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl WeatherFeedPort for FakeFeed {
    async fn fetch(&self) -> Result<Reading, ApplicationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.mode {
            FeedMode::Observe(temperature) => {
                let measurements = Measurements {
                    temperature,
                    pressure: 1013.2,
                    humidity: 58.0,
                    wind_speed: 3.4,
                    wind_direction: WindDirection::new(200),
                    rain_per_hour: 0.0,
                    rain_per_minute: 0.0,
                    ground_temperature: temperature + 2.0,
                };
                Ok(Reading::new(Utc::now().fixed_offset(), measurements)?.with_provider(PROVIDER))
            },
            FeedMode::Garbled => Err(ApplicationError::parse(
                "missing observation time",
                "<html>maintenance</html>",
            )),
            FeedMode::Down => Err(ApplicationError::UpstreamUnavailable(
                "connection refused".to_string(),
            )),
        }
    }

    fn provider_name(&self) -> String {
        PROVIDER.to_string()
    }
}

async fn create_state(feed: Arc<FakeFeed>) -> AppState {
    let db = AsyncDatabase::in_memory()
        .await
        .expect("Failed to create in-memory database");
    db.migrate().await.expect("Failed to run migrations");
    let store = Arc::new(SqliteReadingStore::new(db.pool().clone()));

    let config = WeatherServiceConfig {
        timezone: Timezone::taipei(),
        coalesce_fetches: true,
        ..Default::default()
    };
    let service = WeatherService::new(store, feed, config);
    AppState::new(Arc::new(service), FreshnessConfig::default())
}

async fn create_test_server(feed: Arc<FakeFeed>) -> TestServer {
    let app = create_router(create_state(feed).await);
    TestServer::new(app).expect("Failed to create test server")
}

// ============================================================================
// Health endpoints
// ============================================================================

#[tokio::test]
async fn health_check_returns_ok() {
    let server = create_test_server(Arc::new(FakeFeed::new(FeedMode::Down))).await;

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: HealthResponse = response.json();
    assert_eq!(body.status, "ok");
}

#[tokio::test]
async fn health_check_via_oneshot() {
    let app = create_router(create_state(Arc::new(FakeFeed::new(FeedMode::Down))).await);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .expect("Failed to build request"),
        )
        .await
        .expect("Router is infallible");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn readiness_reports_store_count() {
    let server = create_test_server(Arc::new(FakeFeed::new(FeedMode::Down))).await;

    let response = server.get("/ready").await;

    response.assert_status_ok();
    let body: ReadinessResponse = response.json();
    assert!(body.ready);
    assert_eq!(body.stored_readings, Some(0));
    assert_eq!(body.timezone, "Asia/Taipei");
}

// ============================================================================
// API endpoint
// ============================================================================

#[tokio::test]
async fn api_fetches_on_empty_store() {
    let feed = Arc::new(FakeFeed::new(FeedMode::Observe(26.5)));
    let server = create_test_server(Arc::clone(&feed)).await;

    let response = server.get("/api").await;

    response.assert_status_ok();
    let body: ApiReading = response.json();
    assert!((body.temperature - 26.5).abs() < f64::EPSILON);
    assert!((body.temp_ground - 28.5).abs() < f64::EPSILON);
    assert_eq!(body.wind_direction, 200);
    assert_eq!(body.provider, PROVIDER);
    assert!(body.date.ends_with("+08:00"), "{}", body.date);
    assert_eq!(feed.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn api_serves_fresh_reading_from_store() {
    let feed = Arc::new(FakeFeed::new(FeedMode::Observe(21.0)));
    let server = create_test_server(Arc::clone(&feed)).await;

    let first: ApiReading = server.get("/api").await.json();
    let second: ApiReading = server.get("/api").await.json();

    assert_eq!(first.date, second.date);
    assert_eq!(second.provider, PROVIDER);
    assert_eq!(feed.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn api_parse_failure_is_data_unavailable() {
    let server = create_test_server(Arc::new(FakeFeed::new(FeedMode::Garbled))).await;

    let response = server.get("/api").await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: ErrorResponse = response.json();
    assert_eq!(body.error, "data_unavailable");
}

#[tokio::test]
async fn api_upstream_failure_is_server_unavailable() {
    let server = create_test_server(Arc::new(FakeFeed::new(FeedMode::Down))).await;

    let response = server.get("/api").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    response.assert_json(&serde_json::json!({ "error": "server_unavailable" }));
}

// ============================================================================
// Site page data
// ============================================================================

#[tokio::test]
async fn index_returns_current_report_and_extremes() {
    let feed = Arc::new(FakeFeed::new(FeedMode::Observe(19.5)));
    let server = create_test_server(Arc::clone(&feed)).await;

    let response = server.get("/").await;

    response.assert_status_ok();
    let body: PageResponse = response.json();
    assert!((body.weather.temperature - 19.5).abs() < f64::EPSILON);
    assert_eq!(body.daily.len(), 8);
    assert!(body.daily[7].valid);
    assert!(body.daily[..7].iter().all(|entry| !entry.valid));
    assert_eq!(body.temp_max, Some(19.5));
    assert_eq!(body.temp_min, Some(19.5));
    assert_eq!(feed.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn index_failure_uses_error_body() {
    let server = create_test_server(Arc::new(FakeFeed::new(FeedMode::Garbled))).await;

    let response = server.get("/").await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    response.assert_json(&serde_json::json!({ "error": "data_unavailable" }));
}
