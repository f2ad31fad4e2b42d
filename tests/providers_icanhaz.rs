// tests/providers_icanhaz.rs
//
// IcanhazSource against a local stand-in for the joke API (127.0.0.1, random port).

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;

use joke_board::jokes::providers::IcanhazSource;
use joke_board::{collect, CollectError, CollectOptions, JokeSource};

#[derive(Clone)]
struct FakeApi {
    calls: Arc<AtomicUsize>,
    ids: Arc<Vec<&'static str>>,
    fail_at: Option<usize>,
}

async fn random_joke(State(api): State<FakeApi>, headers: HeaderMap) -> impl IntoResponse {
    let n = api.calls.fetch_add(1, Ordering::SeqCst);

    let wants_json = headers
        .get("accept")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"));
    let has_agent = headers.contains_key("user-agent");
    if !wants_json || !has_agent {
        return (StatusCode::NOT_ACCEPTABLE, "text/html only").into_response();
    }

    if api.fail_at == Some(n) {
        return (StatusCode::SERVICE_UNAVAILABLE, "try later").into_response();
    }

    let id = api.ids[n % api.ids.len()];
    Json(json!({ "id": id, "joke": format!("joke {id}\r\nwith a punchline"), "status": 200 }))
        .into_response()
}

async fn spawn_fake(ids: Vec<&'static str>, fail_at: Option<usize>) -> (String, FakeApi) {
    let api = FakeApi {
        calls: Arc::new(AtomicUsize::new(0)),
        ids: Arc::new(ids),
        fail_at,
    };
    let app = Router::new()
        .route("/", get(random_joke))
        .with_state(api.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake api");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve fake api");
    });

    (format!("http://{addr}/"), api)
}

fn source(url: &str) -> IcanhazSource {
    IcanhazSource::new(url, Duration::from_secs(5), "joke-board-tests").expect("client")
}

#[tokio::test]
async fn fetch_one_sends_json_accept_and_parses_body() {
    let (url, _api) = spawn_fake(vec!["abc123"], None).await;
    let joke = source(&url).fetch_one().await.expect("fetch");
    assert_eq!(joke.id, "abc123");
    assert_eq!(joke.text, "joke abc123 with a punchline");
    assert_eq!(joke.votes, 0);
}

#[tokio::test]
async fn collect_over_http_drops_repeats() {
    let (url, api) = spawn_fake(vec!["A", "B", "A", "C", "D", "E"], None).await;
    let src = source(&url);

    let batch = collect(&src, CollectOptions::new(5, 4)).await.expect("collect");
    let ids: Vec<_> = batch.iter().map(|j| j.id.as_str()).collect();
    assert_eq!(ids, vec!["A", "B", "C", "D", "E"]);
    assert_eq!(api.calls.load(Ordering::SeqCst), 6);
}

#[tokio::test]
async fn server_error_aborts_batch() {
    let (url, api) = spawn_fake(vec!["A", "B", "C", "D"], Some(2)).await;
    let src = source(&url);

    let err = collect(&src, CollectOptions::new(4, 4)).await.unwrap_err();
    assert!(matches!(err, CollectError::Source(_)));
    assert!(err.to_string().contains("503"), "got: {err}");
    assert_eq!(api.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn unreachable_host_is_a_source_error() {
    // Bind then drop to get a port with nothing listening.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let src = IcanhazSource::new(
        format!("http://{addr}/"),
        Duration::from_millis(500),
        "joke-board-tests",
    )
    .unwrap();
    assert!(src.fetch_one().await.is_err());
}
