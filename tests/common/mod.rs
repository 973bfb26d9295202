//! In-process mock of the bounty board API.
//!
//! Binds to a random port on a dedicated thread with its own runtime, so the
//! same server works for both the blocking and the async client tests.
//! Special bounty ids trigger error responses.

#![allow(dead_code)]

use std::time::Duration;

use axum::{
    extract::Path,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use owockibot::ClientConfig;
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

pub const WALLET: &str = "0xa85bf3202d9716f2dd263ed3de090d350f0822e4";

pub fn open_bounty() -> Value {
    serde_json::from_str(include_str!("../fixtures/bounty_open.json")).unwrap()
}

pub fn completed_bounty() -> Value {
    serde_json::from_str(include_str!("../fixtures/bounty_completed.json")).unwrap()
}

pub fn stats() -> Value {
    serde_json::from_str(include_str!("../fixtures/stats.json")).unwrap()
}

pub fn x402_config() -> Value {
    serde_json::from_str(include_str!("../fixtures/x402.json")).unwrap()
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

fn app() -> Router {
    Router::new()
        .route("/bounties", get(list_bounties))
        .route("/bounties/:id", get(get_bounty))
        .route("/bounties/:id/claim", post(claim_bounty))
        .route("/bounties/:id/submit", post(submit_work))
        .route("/stats", get(|| async { Json(stats()) }))
        .route("/.well-known/x402", get(|| async { Json(x402_config()) }))
}

async fn list_bounties() -> Json<Value> {
    Json(json!([open_bounty(), completed_bounty()]))
}

async fn get_bounty(Path(id): Path<String>, headers: HeaderMap) -> Response {
    match id.as_str() {
        "143" => Json(open_bounty()).into_response(),
        "108" => Json(completed_bounty()).into_response(),
        "a b" => {
            let mut bounty = open_bounty();
            bounty["id"] = json!("a b");
            Json(bounty).into_response()
        }
        "echo-headers" => {
            let header_str = |name: &str| {
                headers
                    .get(name)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string()
            };
            let mut bounty = open_bounty();
            bounty["title"] = json!(header_str("x-agent"));
            bounty["description"] = json!(header_str("accept"));
            Json(bounty).into_response()
        }
        "partial" => {
            let mut bounty = open_bounty();
            bounty.as_object_mut().unwrap().remove("title");
            Json(bounty).into_response()
        }
        "400" => (StatusCode::BAD_REQUEST, Json(json!({"error": "invalid id"}))).into_response(),
        "401" => StatusCode::UNAUTHORIZED.into_response(),
        "418" => (StatusCode::IM_A_TEAPOT, Json(json!({"error": "teapot"}))).into_response(),
        "429" => (
            StatusCode::TOO_MANY_REQUESTS,
            [(header::RETRY_AFTER, "5")],
            "slow down",
        )
            .into_response(),
        "500" => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        "garbage" => (StatusCode::OK, "not json").into_response(),
        "empty" => StatusCode::NO_CONTENT.into_response(),
        "slow" => {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Json(open_bounty()).into_response()
        }
        _ => (StatusCode::NOT_FOUND, Json(json!({"error": "Bounty not found"}))).into_response(),
    }
}

async fn claim_bounty(Path(id): Path<String>, Json(body): Json<Value>) -> Response {
    let Some(wallet) = body.get("walletAddress").and_then(Value::as_str) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "walletAddress required"})),
        )
            .into_response();
    };
    if id != "143" {
        return StatusCode::NOT_FOUND.into_response();
    }

    let mut bounty = open_bounty();
    bounty["status"] = json!("claimed");
    bounty["claimedBy"] = json!(wallet);
    bounty["claimedAt"] = json!(1770449300000_u64);
    Json(bounty).into_response()
}

async fn submit_work(Path(id): Path<String>, Json(body): Json<Value>) -> Response {
    let (Some(wallet), Some(content)) = (
        body.get("walletAddress").and_then(Value::as_str),
        body.get("content").and_then(Value::as_str),
    ) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "walletAddress and content required"})),
        )
            .into_response();
    };
    if id != "143" {
        return StatusCode::NOT_FOUND.into_response();
    }

    let mut bounty = open_bounty();
    bounty["status"] = json!("submitted");
    bounty["claimedBy"] = json!(wallet);
    bounty["submissions"] = json!([{
        "id": "sub-1",
        "content": content,
        "proof": body.get("proof").cloned().unwrap_or(Value::Null),
        "submittedAt": "2026-02-08T10:00:00Z"
    }]);
    Json(bounty).into_response()
}

/// Start the mock board and return its base URL
pub fn spawn_board() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            axum::serve(listener, app()).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

/// Config pointing at a fresh mock board
pub fn board_config() -> ClientConfig {
    init_tracing();
    ClientConfig::default()
        .with_base_url(spawn_board())
        .with_timeout(Duration::from_millis(500))
}

/// Config pointing at a port nothing listens on
pub fn dead_config() -> ClientConfig {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    ClientConfig::default()
        .with_base_url(format!("http://{addr}"))
        .with_timeout(Duration::from_millis(500))
}
