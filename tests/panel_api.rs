use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use tracknix::api::{panel_router, PanelState};
use tracknix::engine::FilterState;
use tracknix::stats::StatsCollector;
use tracknix::store::{ListStore, StoreDb};
use tracknix::sync::ListSync;

/// Boots the full panel stack (store, sync, router) on an ephemeral port.
async fn start_panel(dir: &tempfile::TempDir) -> (SocketAddr, Arc<FilterState>) {
    let db_path = dir.path().join("store.db");
    let db = Arc::new(StoreDb::open(db_path.to_str().unwrap()).expect("open store"));
    db.initialize().expect("init store");
    let store = ListStore::spawn(db);

    let filter = Arc::new(FilterState::new());
    let sync = ListSync::new(filter.clone(), store.clone());
    sync.hydrate();
    tokio::spawn(sync.run());

    let stats = StatsCollector::new(0);
    let state = Arc::new(PanelState::new(stats, store));
    let app = panel_router(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, filter)
}

#[tokio::test]
async fn add_domain_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let (addr, filter) = start_panel(&dir).await;
    let client = reqwest::Client::new();
    let base = format!("http://{addr}");

    // Fresh store: both lists empty, counter zero.
    let state: serde_json::Value = client
        .get(format!("{base}/api/state"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(state["whitelist"], serde_json::json!([]));
    assert_eq!(state["blacklist"], serde_json::json!([]));
    assert_eq!(state["blocked_count"], 0);

    // Add with surrounding whitespace: trimmed and accepted.
    let resp: serde_json::Value = client
        .post(format!("{base}/api/lists/whitelist"))
        .json(&serde_json::json!({ "domain": "  shop.example.com " }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(resp["added"], true);

    // Duplicate is a no-op, not an error.
    let resp: serde_json::Value = client
        .post(format!("{base}/api/lists/whitelist"))
        .json(&serde_json::json!({ "domain": "shop.example.com" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(resp["added"], false);
    assert_eq!(resp["reason"], "duplicate");

    // Empty input is a no-op, no list mutation.
    let resp: serde_json::Value = client
        .post(format!("{base}/api/lists/blacklist"))
        .json(&serde_json::json!({ "domain": "   " }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(resp["added"], false);
    assert_eq!(resp["reason"], "empty");

    let state: serde_json::Value = client
        .get(format!("{base}/api/state"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(state["whitelist"], serde_json::json!(["shop.example.com"]));
    assert_eq!(state["blacklist"], serde_json::json!([]));

    // The background write also reaches the classifier's in-memory copy.
    let mut synced = false;
    for _ in 0..50 {
        if filter.whitelist_contains("shop.example.com") {
            synced = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(synced, "panel write never synced to the in-memory whitelist");
}

#[tokio::test]
async fn unknown_list_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let (addr, _filter) = start_panel(&dir).await;

    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/api/lists/greylist"))
        .json(&serde_json::json!({ "domain": "x.example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn stats_endpoint_reports_counts() {
    let dir = tempfile::tempdir().unwrap();
    let (addr, _filter) = start_panel(&dir).await;

    let stats: serde_json::Value = reqwest::get(format!("http://{addr}/api/stats"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats["total_requests"], 0);
    assert_eq!(stats["blocked_requests"], 0);
}

#[tokio::test]
async fn popup_page_is_served() {
    let dir = tempfile::tempdir().unwrap();
    let (addr, _filter) = start_panel(&dir).await;

    let resp = reqwest::get(format!("http://{addr}/")).await.unwrap();
    assert_eq!(resp.status(), 200);
    let content_type = resp
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/html"));
    assert!(resp.text().await.unwrap().contains("tracknix"));
}
