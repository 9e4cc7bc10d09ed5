//! In-process mock of the generation backend for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use shortgen_client::poller::PollConfig;

pub const VIDEO_BYTES: &[u8] = b"\x00\x00\x00\x18ftypmp42 fake video";

/// Canned responses plus a record of what the client sent.
#[derive(Default)]
pub struct MockBackend {
    /// Status bodies handed out in order; the last one repeats.
    statuses: Mutex<VecDeque<Value>>,
    pub fail_generate: AtomicBool,
    pub status_calls: AtomicUsize,
    pub generate_bodies: Mutex<Vec<Value>>,
    pub preview_bodies: Mutex<Vec<Value>>,
}

impl MockBackend {
    pub fn with_statuses(statuses: Vec<Value>) -> Arc<Self> {
        Arc::new(Self {
            statuses: Mutex::new(statuses.into()),
            ..Default::default()
        })
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }
}

pub fn status_body(status: &str, progress: u8) -> Value {
    json!({
        "generation_id": "gen-1",
        "status": status,
        "progress": progress,
        "current_step": format!("step at {progress}%"),
    })
}

/// Bind the mock on an ephemeral port and return its base URL.
pub async fn spawn(backend: Arc<MockBackend>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(backend)).await.unwrap();
    });
    format!("http://{addr}")
}

pub fn fast_polling() -> PollConfig {
    PollConfig {
        interval: Duration::from_millis(10),
        max_backoff: Duration::from_millis(40),
        ..Default::default()
    }
}

fn router(backend: Arc<MockBackend>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/styles", get(styles))
        .route("/api/topics/suggest", post(suggest))
        .route("/api/script/preview", post(preview))
        .route("/api/video/generate", post(generate))
        .route("/api/video/status/{id}", get(status))
        .route("/api/video/download/{id}", get(download))
        .route("/api/user/{user_id}/history", get(history))
        .with_state(backend)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "voicevox": "connected", "redis": "connected" }))
}

async fn styles() -> Json<Value> {
    Json(json!({
        "styles": [
            {
                "id": "anime",
                "name": "Anime",
                "description": "Vivid cel shading",
                "consistency_keywords": ["anime style", "cel shading"]
            },
            { "id": "realistic", "name": "Realistic", "description": "Photographic" }
        ]
    }))
}

async fn suggest(Json(body): Json<Value>) -> Json<Value> {
    let theme = body["theme"].as_str().unwrap_or_default();
    Json(json!([
        { "title": "3 Morning Habits", "description": format!("{theme} basics"), "estimated_views": "120K" },
        { "title": "What I Eat in a Day", "description": format!("{theme} routine"), "estimated_views": "80K" }
    ]))
}

async fn preview(State(backend): State<Arc<MockBackend>>, Json(body): Json<Value>) -> Json<Value> {
    let topic = body["topic"].as_str().unwrap_or_default().to_string();
    backend.preview_bodies.lock().unwrap().push(body);
    Json(json!({
        "title": format!("{topic}: Explained"),
        "style": "anime",
        "scenes": [
            { "text": "Wake up early", "visual_concept": "sunrise", "duration": "4.5" },
            { "text": "Drink water", "visual_concept": "glass", "duration": 5 },
            { "text": "Stretch", "visual_concept": "yoga mat", "duration": 6.0 }
        ]
    }))
}

async fn generate(State(backend): State<Arc<MockBackend>>, Json(body): Json<Value>) -> Response {
    backend.generate_bodies.lock().unwrap().push(body);
    if backend.fail_generate.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "detail": "Queue unavailable" })),
        )
            .into_response();
    }
    Json(json!({ "generation_id": "gen-1", "status": "pending", "estimated_time": 120 }))
        .into_response()
}

async fn status(State(backend): State<Arc<MockBackend>>, Path(id): Path<String>) -> Response {
    backend.status_calls.fetch_add(1, Ordering::SeqCst);
    if id != "gen-1" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": "Generation not found" })),
        )
            .into_response();
    }
    let mut statuses = backend.statuses.lock().unwrap();
    let body = if statuses.len() > 1 {
        statuses.pop_front()
    } else {
        statuses.front().cloned()
    };
    match body {
        Some(body) => Json(body).into_response(),
        None => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}

async fn download(Path(id): Path<String>) -> Response {
    if id != "gen-1" {
        return StatusCode::NOT_FOUND.into_response();
    }
    ([(header::CONTENT_TYPE, "video/mp4")], VIDEO_BYTES.to_vec()).into_response()
}

async fn history(Path(user_id): Path<String>) -> Json<Value> {
    Json(json!({
        "generations": [
            {
                "id": "gen-0",
                "topic": "Budget meal prep",
                "style": "anime",
                "status": "completed",
                "created_at": "2024-05-01T09:30:00.123456",
                "video_url": "/api/video/download/gen-0",
                "user": user_id
            }
        ]
    }))
}
