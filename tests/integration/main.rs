//! Integration tests for the travel tour API.
//!
//! The in-memory tests run everywhere. The MongoDB tests need a reachable
//! server in MONGO_URI.
//! Run with: cargo test --test integration -- --ignored

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use futures::future::join_all;
use serde_json::{json, Value};
use tower::ServiceExt;

use travel_tour_api::api::{create_router, with_frontend, AppState};
use travel_tour_api::clock::ManualClock;
use travel_tour_api::tour::{MemoryTourStore, MongoTourStore, TourService, TourStore};

fn memory_app() -> Router {
    app_over(Arc::new(MemoryTourStore::new()))
}

fn app_over(store: Arc<dyn TourStore>) -> Router {
    let service = TourService::with_clock(store, Arc::new(ManualClock::default()));
    create_router(AppState::new(service))
}

fn tour_body(tour_id: i64, title: &str) -> Value {
    json!({
        "tour_id": tour_id,
        "title": title,
        "description": "Lakeside trail with a picnic stop",
        "pick_up": "Central station",
        "meeting_point": "North gate",
        "drop_off": "Central station",
        "duration": 6,
        "duration_unit": "hours"
    })
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

/// Create, read, update, list and delete one tour through the router.
async fn exercise_lifecycle(app: &Router) {
    let (status, created) = call(app, Method::POST, "/tour", Some(tour_body(42, "Lake Loop"))).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["data"]["_id"].as_str().unwrap().to_string();
    let uri = format!("/tour/{id}");

    let (status, fetched) = call(app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"]["tour_options"][0], created["data"]);

    let (status, updated) = call(
        app,
        Method::PUT,
        &uri,
        Some(json!({ "title": "Lake Loop Deluxe", "duration": 1, "duration_unit": "days" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["title"], "Lake Loop Deluxe");
    assert_eq!(updated["data"]["duration"], 1);
    assert_eq!(updated["data"]["duration_unit"], "days");
    assert_eq!(updated["data"]["pick_up"], "Central station");

    let (status, listed) = call(app, Method::GET, "/tour", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["data"]["tour_options"], json!([updated["data"].clone()]));

    let (status, deleted) = call(app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        deleted["message"],
        "Lake Loop Deluxe deleted successfully. Tour cannot be found anymore."
    );

    let (status, _) = call(app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, listed) = call(app, Method::GET, "/tour", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["data"]["tour_options"], json!([]));
}

#[tokio::test]
async fn test_lifecycle_in_memory() {
    exercise_lifecycle(&memory_app()).await;
}

#[tokio::test]
async fn test_concurrent_duplicate_creates_admit_one() {
    let store = MemoryTourStore::new();
    let app = app_over(Arc::new(store.clone()));

    let attempts = (0..16).map(|i| {
        let app = app.clone();
        async move {
            call(&app, Method::POST, "/tour", Some(tour_body(7, &format!("Racer {i}")))).await
        }
    });
    let results = join_all(attempts).await;

    let created = results
        .iter()
        .filter(|(status, _)| *status == StatusCode::CREATED)
        .count();
    let rejected = results
        .iter()
        .filter(|(status, body)| {
            *status == StatusCode::BAD_REQUEST
                && body["message"] == "Tour with tour_id 7 already exists"
        })
        .count();

    assert_eq!(created, 1);
    assert_eq!(rejected, 15);
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_numeric_strings_are_accepted() {
    let app = memory_app();
    let mut body = tour_body(0, "Form Tour");
    body["tour_id"] = json!("13");
    body["duration"] = json!("4");

    let (status, created) = call(&app, Method::POST, "/tour", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["tour_id"], 13);
    assert_eq!(created["data"]["duration"], 4);
}

#[tokio::test]
async fn test_empty_values_do_not_overwrite() {
    let app = memory_app();
    let (_, created) = call(&app, Method::POST, "/tour", Some(tour_body(3, "Old Port"))).await;
    let id = created["data"]["_id"].as_str().unwrap().to_string();

    let (status, updated) = call(
        &app,
        Method::PUT,
        &format!("/tour/{id}"),
        Some(json!({ "title": "", "description": "", "duration": 0 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["title"], "Old Port");
    assert_eq!(updated["data"]["duration"], 6);
}

#[tokio::test]
async fn test_unknown_and_malformed_ids() {
    let app = memory_app();
    for uri in ["/tour/665f1c2e9b1d8c0a12345678", "/tour/not-an-id"] {
        let (status, body) = call(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);

        let (status, _) = call(&app, Method::DELETE, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn test_frontend_fallback_serves_static_files() {
    let dir = std::env::temp_dir().join(format!("travel-tour-frontend-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("index.html"), "<h1>Travel Tours</h1>").unwrap();

    let app = with_frontend(memory_app(), &dir);
    let response = app
        .clone()
        .oneshot(Request::get("/index.html").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"<h1>Travel Tours</h1>");

    // API routes still win over the fallback
    let (status, _) = call(&app, Method::GET, "/tour", None).await;
    assert_eq!(status, StatusCode::OK);

    std::fs::remove_dir_all(&dir).ok();
}

/// Connect to a fresh collection on the server in MONGO_URI.
async fn mongo_store() -> Option<MongoTourStore> {
    dotenvy::dotenv().ok();
    let uri = std::env::var("MONGO_URI").ok()?;
    let collection = format!("tours_test_{}", std::process::id());
    let store = MongoTourStore::connect(&uri, "travel_tour_test", &collection)
        .await
        .expect("MongoDB connection failed");
    store.clear().await.expect("clear failed");
    Some(store)
}

#[tokio::test]
#[ignore = "requires MONGO_URI"]
async fn test_lifecycle_in_mongo() {
    let Some(store) = mongo_store().await else {
        println!("Skipping: MONGO_URI not set");
        return;
    };

    exercise_lifecycle(&app_over(Arc::new(store.clone()))).await;
    store.clear().await.unwrap();
}

#[tokio::test]
#[ignore = "requires MONGO_URI"]
async fn test_mongo_rejects_duplicate_tour_id() {
    let Some(store) = mongo_store().await else {
        println!("Skipping: MONGO_URI not set");
        return;
    };
    let app = app_over(Arc::new(store.clone()));

    let (status, _) = call(&app, Method::POST, "/tour", Some(tour_body(99, "First"))).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = call(&app, Method::POST, "/tour", Some(tour_body(99, "Second"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Tour with tour_id 99 already exists");

    store.clear().await.unwrap();
}
