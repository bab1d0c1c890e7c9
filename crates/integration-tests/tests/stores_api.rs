//! Nearby-store API and middleware headers.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use lapak_core::geo::StoreLocation;
use lapak_integration_tests::{TestApp, body_text};
use serde_json::Value;

fn directory() -> Vec<StoreLocation> {
    serde_json::from_str(
        r#"[
            {"id": 1, "name": "Toko Bandung", "latitude": -6.9175, "longitude": 107.6191},
            {"id": 2, "name": "Toko Menteng", "latitude": -6.1950, "longitude": 106.8400},
            {"id": 3, "name": "Toko Depok", "latitude": -6.4025, "longitude": 106.7942}
        ]"#,
    )
    .unwrap()
}

async fn nearby(app: &TestApp, query: &str) -> (StatusCode, String) {
    let response = app.get(&format!("/api/stores/nearby?{query}"), None).await;
    let status = response.status();
    (status, body_text(response).await)
}

#[tokio::test]
async fn test_nearby_sorted_closest_first() {
    let app = TestApp::with_env(&[], directory());

    let (status, body) = nearby(&app, "lat=-6.2088&lng=106.8456").await;
    assert_eq!(status, StatusCode::OK);

    let stores: Vec<Value> = serde_json::from_str(&body).unwrap();
    let ids: Vec<i64> = stores.iter().map(|s| s["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, [2, 3, 1]);

    let distances: Vec<f64> = stores
        .iter()
        .map(|s| s["distance_km"].as_f64().unwrap())
        .collect();
    assert!(distances.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test]
async fn test_nearby_radius() {
    let app = TestApp::with_env(&[], directory());

    let (status, body) = nearby(&app, "lat=-6.2088&lng=106.8456&radius_km=50").await;
    assert_eq!(status, StatusCode::OK);
    let stores: Vec<Value> = serde_json::from_str(&body).unwrap();
    assert_eq!(stores.len(), 2);
}

#[tokio::test]
async fn test_nearby_rejects_bad_input() {
    let app = TestApp::with_env(&[], directory());

    let (status, _) = nearby(&app, "lat=120&lng=106.8").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    for radius in ["-3", "inf"] {
        let (status, _) = nearby(&app, &format!("lat=-6.2&lng=106.8&radius_km={radius}")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{radius}");
    }

    let (status, _) = nearby(&app, "lng=106.8").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_empty_directory() {
    let app = TestApp::new();
    let (status, body) = nearby(&app, "lat=0&lng=0").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[]");
}

#[tokio::test]
async fn test_security_and_request_id_headers() {
    let app = TestApp::new();
    let response = app.get("/health", None).await;
    let headers = response.headers();

    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert!(headers.contains_key("content-security-policy"));
    assert!(!headers["x-request-id"].is_empty());
}

#[tokio::test]
async fn test_upstream_request_id_is_kept() {
    let app = TestApp::new();
    let response = app
        .send(
            axum::http::Request::get("/health")
                .header("x-request-id", "edge-1234")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.headers()["x-request-id"], "edge-1234");
}
