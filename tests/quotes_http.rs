use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use charter_quote::engine::Engine;
use charter_quote::pricing::calculate_quote_at;
use charter_quote::server::router;
use charter_quote::store::{MemoryQuoteStore, QuoteStore};

fn days_from_today(days: i64) -> String {
    (Utc::now().date_naive() + Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}

fn quote_request() -> Value {
    json!({
        "tripType": "oneWay",
        "numPassengers": 40,
        "departureDate": days_from_today(14),
        "departureTime": "09:00",
        "pickupLocation": {
            "placeId": "ChIJ-pickup",
            "formattedAddress": "Union Station, Chicago, IL, USA",
            "addressInput": "union station"
        },
        "dropoffLocation": {
            "placeId": "ChIJ-dropoff",
            "formattedAddress": "Navy Pier, Chicago, IL, USA",
            "addressInput": "navy pier"
        },
        "busType": "standard",
        "amenities": []
    })
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();

    (status, serde_json::from_slice(&bytes).unwrap())
}

fn post_quote(body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/quotes")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

fn get(uri: String) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn create_then_fetch_quote() {
    let store = Arc::new(MemoryQuoteStore::new());
    let app = router(Engine::new(store.clone()));

    let (status, quote) = send(app.clone(), post_quote(quote_request().to_string())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(quote["subtotal"], json!(655.0));
    assert_eq!(quote["serviceFee"], json!(32.75));
    assert_eq!(quote["total"], json!(687.75));
    assert_eq!(quote["tripDetails"]["numPassengers"], json!(40));
    assert_eq!(quote["breakdown"].as_array().unwrap().len(), 4);

    let quote_id = quote["quoteId"].as_str().unwrap().to_string();
    assert!(store.get_quote(&quote_id).is_some());

    let (status, found) = send(app, get(format!("/api/quotes/{}", quote_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found, quote);
}

#[tokio::test]
async fn invalid_request_lists_every_field() {
    let app = router(Engine::new(Arc::new(MemoryQuoteStore::new())));

    let mut request = quote_request();
    request["numPassengers"] = json!(150);
    request["departureDate"] = json!(days_from_today(-3));
    request["dropoffLocation"]["placeId"] = json!("ChIJ-pickup");

    let (status, body) = send(app, post_quote(request.to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));

    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|error| error["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["departureDate", "numPassengers", "dropoffLocation"]);
}

#[tokio::test]
async fn malformed_body_is_a_client_error() {
    let app = router(Engine::new(Arc::new(MemoryQuoteStore::new())));

    let mut request = quote_request();
    request["busType"] = json!("double-decker");

    let (status, body) = send(app, post_quote(request.to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], json!("body"));
}

#[tokio::test]
async fn unknown_quote_is_not_found() {
    let app = router(Engine::new(Arc::new(MemoryQuoteStore::new())));

    let (status, body) = send(app, get("/api/quotes/does-not-exist".into())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("quote not found"));
}

#[tokio::test]
async fn expired_quote_is_gone() {
    let store = Arc::new(MemoryQuoteStore::new());
    let request = serde_json::from_value(quote_request()).unwrap();
    let stale = store.save_quote(calculate_quote_at(request, Utc::now() - Duration::hours(30)));

    let app = router(Engine::new(store));

    let (status, body) = send(app, get(format!("/api/quotes/{}", stale.quote_id))).await;
    assert_eq!(status, StatusCode::GONE);
    assert_eq!(body["error"], json!("quote has expired"));
}

#[tokio::test]
async fn health_check() {
    let app = router(Engine::new(Arc::new(MemoryQuoteStore::new())));

    let (status, body) = send(app, get("/api/health".into())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok", "message": "API is running" }));
}
