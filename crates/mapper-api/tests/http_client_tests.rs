//! Tests for the reqwest client against an in-process axum stub of the API.

use std::collections::HashMap;

use axum::{
    extract::Query,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use mapper_api::{ApiError, ClientConfig, HeatmapQuery, HttpMapperApi, MapperApi, PredictionRequest};
use methane_common::Threshold;
use serde_json::{json, Value};
use test_utils::fixtures;
use tokio_test::{assert_err, assert_ok};

// ============================================================================
// Stub server
// ============================================================================

async fn spawn_stub(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client(base_url: &str) -> HttpMapperApi {
    HttpMapperApi::new(&ClientConfig {
        base_url: base_url.to_string(),
        ..ClientConfig::default()
    })
    .unwrap()
}

fn json_body(status: StatusCode, body: &'static str) -> impl IntoResponse {
    (status, [(header::CONTENT_TYPE, "application/json")], body)
}

/// Echoes the received query parameters back inside the tile template.
async fn echo_map(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let threshold = params.get("threshold").cloned().unwrap_or_default();
    let date = params.get("date").cloned().unwrap_or_else(|| "latest".to_string());
    Json(json!({ "tileUrl": format!("https://tiles/{}/{}/{{z}}/{{x}}/{{y}}", threshold, date) }))
}

/// Echoes the received body back as the image URL.
async fn echo_predict(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({
        "heatmap_image": format!("echo:{}:{}:{}", body["date"].as_str().unwrap_or(""), body["lat"], body["lon"]),
        "bounds": [[-10.0, -10.0], [10.0, 10.0]]
    }))
}

// ============================================================================
// Heatmap
// ============================================================================

#[tokio::test]
async fn test_heatmap_omits_date_when_latest() {
    let base = spawn_stub(Router::new().route("/api/map", get(echo_map))).await;
    let api = client(&base);

    let query = HeatmapQuery::new(Threshold::default(), None);
    let resp = assert_ok!(api.heatmap_tiles(&query).await);
    assert_eq!(resp.tile_url(), Some("https://tiles/1920/latest/{z}/{x}/{y}"));
}

#[tokio::test]
async fn test_heatmap_sends_threshold_and_date() {
    let base = spawn_stub(Router::new().route("/api/map", get(echo_map))).await;
    let api = client(&base);

    let query = HeatmapQuery::new(
        Threshold::new(1985).unwrap(),
        NaiveDate::from_ymd_opt(2024, 2, 29),
    );
    let resp = assert_ok!(api.heatmap_tiles(&query).await);
    assert_eq!(resp.tile_url(), Some("https://tiles/1985/2024-02-29/{z}/{x}/{y}"));
}

#[tokio::test]
async fn test_heatmap_no_data_decodes() {
    let app = Router::new().route(
        "/api/map",
        get(|| async { json_body(StatusCode::OK, fixtures::heatmap::NO_DATA) }),
    );
    let api = client(&spawn_stub(app).await);

    let resp = assert_ok!(api.heatmap_tiles(&HeatmapQuery::new(Threshold::default(), None)).await);
    assert_eq!(resp.tile_url(), None);
    assert_eq!(
        resp.message.as_deref(),
        Some("No data available for the selected date.")
    );
}

// ============================================================================
// Plumes
// ============================================================================

#[tokio::test]
async fn test_plumes_decode_features() {
    let app = Router::new().route(
        "/api/carbonmapper",
        get(|| async { json_body(StatusCode::OK, fixtures::plumes::OK) }),
    );
    let api = client(&spawn_stub(app).await);

    let resp = assert_ok!(api.high_res_plumes().await);
    let plumes = resp.into_plumes();
    assert_eq!(plumes.len(), 2);
    assert_eq!(plumes[0].id, "emi20230815t170413p01");
    assert_eq!(plumes[0].emission_rate_kg_per_hr, Some(1250.5));
    assert_eq!(plumes[1].emission_rate_kg_per_hr, None);
}

#[tokio::test]
async fn test_html_error_page_is_invalid_body() {
    let app = Router::new().route(
        "/api/carbonmapper",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "<html>Internal Server Error</html>") }),
    );
    let api = client(&spawn_stub(app).await);

    let err = assert_err!(api.high_res_plumes().await);
    assert!(matches!(err, ApiError::InvalidBody { status: 500, .. }));
}

#[tokio::test]
async fn test_global_prediction_flags() {
    let app = Router::new().route(
        "/api/global-prediction",
        get(|| async { json_body(StatusCode::OK, fixtures::plumes::GLOBAL_PREDICTION) }),
    );
    let api = client(&spawn_stub(app).await);

    let plumes = assert_ok!(api.global_prediction().await).into_plumes();
    assert_eq!(plumes.len(), 2);
    assert!(plumes[0].is_predicted);
    assert_eq!(plumes[0].marker_color(), "blue");
    assert!(!plumes[1].is_predicted);
    assert_eq!(plumes[1].marker_color(), "red");
}

// ============================================================================
// Prediction
// ============================================================================

#[tokio::test]
async fn test_predict_posts_json_body() {
    let base = spawn_stub(Router::new().route("/api/predict", post(echo_predict))).await;
    let api = client(&base);

    let request = PredictionRequest {
        date: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
        lat: 36.5,
        lon: -119.5,
    };
    let resp = assert_ok!(api.predict(&request).await);
    let (image, bounds) = resp.overlay().unwrap();
    assert_eq!(image, "echo:2023-06-01:36.5:-119.5");
    assert_eq!(bounds.corners(), [[-10.0, -10.0], [10.0, 10.0]]);
}

#[tokio::test]
async fn test_predict_error_status_still_decodes() {
    let app = Router::new().route(
        "/api/predict",
        post(|| async { json_body(StatusCode::INTERNAL_SERVER_ERROR, fixtures::prediction::ERROR) }),
    );
    let api = client(&spawn_stub(app).await);

    let request = PredictionRequest {
        date: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
        lat: 20.0,
        lon: 0.0,
    };
    let resp = assert_ok!(api.predict(&request).await);
    assert!(resp.is_error());
    assert_eq!(resp.message.as_deref(), Some("Model not loaded"));
}

// ============================================================================
// Transport
// ============================================================================

#[tokio::test]
async fn test_connection_refused_is_request_error() {
    // Bind then drop to get a port with nothing listening.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = client(&format!("http://{}", addr));
    let err = assert_err!(api.high_res_plumes().await);
    assert!(matches!(err, ApiError::Request(_)));
}
