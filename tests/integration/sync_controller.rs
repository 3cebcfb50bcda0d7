//! Integration tests for the client sync controller.
//!
//! Commands issued by the controller run on the real net task. Validates the
//! reconciliation rules against two backends:
//! - an in-memory `ItemsApi` that records every call
//! - `HttpItemsApi` against wiremock, for envelope decoding and failures

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use notiondeck::api::{ApiClientError, Health, HttpItemsApi, ItemListing, ItemsApi};
use notiondeck::net::{self, NetCommand, NetConfig, NetEvent};
use notiondeck::sync::{NoticeKind, SyncController};
use notiondeck_proto::item::{CreateItemRequest, Item, ItemStatus};
use parking_lot::Mutex;
use serde_json::json;
use tokio::sync::mpsc;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TTL: Duration = Duration::from_secs(3);

// =============================================================================
// In-memory backend
// =============================================================================

#[derive(Default)]
struct MemoryInner {
    items: Vec<Item>,
    calls: Vec<String>,
    next_id: u32,
    fail_with: Option<String>,
}

/// Keeps items in a vector and logs every call by name.
#[derive(Clone, Default)]
struct MemoryApi {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryApi {
    fn with_titles(titles: &[&str]) -> Self {
        let api = Self::default();
        for title in titles {
            let item = api.make(title, "", ItemStatus::NotStarted);
            api.inner.lock().items.push(item);
        }
        api
    }

    fn make(&self, title: &str, description: &str, status: ItemStatus) -> Item {
        let mut inner = self.inner.lock();
        inner.next_id += 1;
        let id = format!("mem-{}", inner.next_id);
        Item {
            url: Url::parse(&format!("https://www.notion.so/{id}")).unwrap(),
            id,
            title: title.to_string(),
            description: description.to_string(),
            status,
            created: Utc::now(),
        }
    }

    fn fail(&self, message: &str) {
        self.inner.lock().fail_with = Some(message.to_string());
    }

    fn calls(&self) -> Vec<String> {
        self.inner.lock().calls.clone()
    }

    fn record(&self, call: &str) -> Result<(), ApiClientError> {
        let mut inner = self.inner.lock();
        inner.calls.push(call.to_string());
        match &inner.fail_with {
            Some(message) => Err(ApiClientError::Server(message.clone())),
            None => Ok(()),
        }
    }
}

impl ItemsApi for MemoryApi {
    async fn list(&self) -> Result<ItemListing, ApiClientError> {
        self.record("list")?;
        let items = self.inner.lock().items.clone();
        Ok(ItemListing {
            count: items.len(),
            items,
        })
    }

    async fn create(&self, request: &CreateItemRequest) -> Result<Item, ApiClientError> {
        self.record("create")?;
        let new = request.validate()?;
        let item = self.make(&new.title, &new.description, new.status);
        self.inner.lock().items.insert(0, item.clone());
        Ok(item)
    }

    async fn archive(&self, id: &str) -> Result<String, ApiClientError> {
        self.record("archive")?;
        let mut inner = self.inner.lock();
        let before = inner.items.len();
        inner.items.retain(|i| i.id != id);
        if inner.items.len() == before {
            return Err(ApiClientError::Server(
                "Notion API error: 404 Not Found".to_string(),
            ));
        }
        Ok("Item archived successfully".to_string())
    }

    async fn health(&self) -> Result<Health, ApiClientError> {
        self.record("health")?;
        Ok(Health {
            message: "Notion Backend Proxy is running!".to_string(),
            timestamp: Some(Utc::now()),
        })
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

/// A controller wired to a net task, the way the terminal app drives it.
struct Harness {
    ctl: SyncController,
    tx: mpsc::Sender<NetCommand>,
    rx: mpsc::Receiver<NetEvent>,
}

impl Harness {
    fn spawn<A: ItemsApi + 'static>(api: A, ttl: Duration) -> Self {
        let (tx, rx) = net::spawn_net(api, &NetConfig::default());
        Self {
            ctl: SyncController::new(ttl),
            tx,
            rx,
        }
    }

    async fn run(&mut self, cmd: Option<NetCommand>) {
        let Some(cmd) = cmd else {
            return;
        };
        self.tx.send(cmd).await.unwrap();
        let event = self.rx.recv().await.unwrap();
        self.ctl.apply(event, Instant::now());
    }

    async fn load(&mut self) {
        let cmd = self.ctl.load();
        self.run(cmd).await;
    }

    async fn create(&mut self) {
        let cmd = self.ctl.create(Instant::now());
        self.run(cmd).await;
    }

    async fn archive(&mut self, id: &str) {
        let cmd = self.ctl.archive(id);
        self.run(cmd).await;
    }

    async fn probe(&mut self) {
        self.run(Some(NetCommand::Probe)).await;
    }

    fn titles(&self) -> Vec<String> {
        self.ctl.state().items().iter().map(|i| i.title.clone()).collect()
    }

    fn notice(&self, kind: NoticeKind) -> Option<&str> {
        self.ctl.notice(kind, Instant::now())
    }
}

#[tokio::test]
async fn load_replaces_cache_with_server_list() {
    let api = MemoryApi::with_titles(&["One", "Two", "Three"]);
    let mut h = Harness::spawn(api, TTL);

    h.load().await;

    assert_eq!(h.titles(), ["One", "Two", "Three"]);
    assert!(!h.ctl.state().is_busy());
    assert_eq!(
        h.notice(NoticeKind::Success),
        Some("Loaded 3 items from Notion")
    );
}

#[tokio::test]
async fn create_prepends_and_clears_draft() {
    let api = MemoryApi::with_titles(&["Old"]);
    let mut h = Harness::spawn(api, TTL);
    h.load().await;

    let draft = h.ctl.draft_mut();
    draft.title = "  Buy milk  ".to_string();
    draft.status = ItemStatus::InProgress;
    h.create().await;

    assert_eq!(h.titles(), ["Buy milk", "Old"]);
    let first = &h.ctl.state().items()[0];
    assert_eq!(first.status, ItemStatus::InProgress);
    assert!(h.ctl.state().draft.title.is_empty());
    assert_eq!(
        h.notice(NoticeKind::Success),
        Some("Item added to Notion successfully!")
    );
}

#[tokio::test]
async fn blank_title_never_calls_the_api() {
    let api = MemoryApi::default();
    let mut h = Harness::spawn(api.clone(), TTL);

    for title in ["", "   "] {
        h.ctl.draft_mut().title = title.to_string();
        h.create().await;
        assert_eq!(h.notice(NoticeKind::Error), Some("Title is required"));
    }

    assert!(api.calls().is_empty());
    assert!(!h.ctl.state().is_busy());
}

#[tokio::test]
async fn archive_removes_only_that_item() {
    let api = MemoryApi::with_titles(&["A", "B", "C"]);
    let mut h = Harness::spawn(api, TTL);
    h.load().await;
    let id = h.ctl.state().items()[1].id.clone();

    h.archive(&id).await;

    assert_eq!(h.titles(), ["A", "C"]);
    assert_eq!(h.notice(NoticeKind::Success), Some("Item archived in Notion"));
}

#[tokio::test]
async fn archive_unknown_id_keeps_cache() {
    let api = MemoryApi::with_titles(&["A", "B"]);
    let mut h = Harness::spawn(api, TTL);
    h.load().await;

    h.archive("nope").await;

    assert_eq!(h.titles(), ["A", "B"]);
    assert_eq!(
        h.notice(NoticeKind::Error),
        Some("Failed to archive item: Notion API error: 404 Not Found")
    );
}

#[tokio::test]
async fn failures_are_not_retried_and_keep_cache() {
    let api = MemoryApi::with_titles(&["Keep"]);
    let mut h = Harness::spawn(api.clone(), TTL);
    h.load().await;

    api.fail("Notion API error: 401 Unauthorized");
    h.load().await;
    h.ctl.draft_mut().title = "New".to_string();
    h.create().await;

    assert_eq!(h.titles(), ["Keep"]);
    assert_eq!(h.ctl.state().draft.title, "New");
    assert_eq!(api.calls(), ["list", "list", "create"]);
    assert_eq!(
        h.notice(NoticeKind::Error),
        Some("Failed to add item: Notion API error: 401 Unauthorized")
    );
}

#[tokio::test]
async fn probe_reports_location_on_failure() {
    let api = MemoryApi::default();
    let mut h = Harness::spawn(api.clone(), TTL);

    h.probe().await;
    assert_eq!(
        h.notice(NoticeKind::Success),
        Some("Backend connection successful!")
    );

    api.fail("down");
    h.probe().await;
    assert_eq!(
        h.notice(NoticeKind::Error),
        Some("Backend not responding. Make sure it's running at memory")
    );
}

#[tokio::test]
async fn notices_expire_after_their_window() {
    let mut h = Harness::spawn(MemoryApi::default(), Duration::from_millis(50));
    h.load().await;
    assert!(h.notice(NoticeKind::Success).is_some());

    tokio::time::sleep(Duration::from_millis(80)).await;
    assert!(h.notice(NoticeKind::Success).is_none());
    assert!(h.ctl.expire(Instant::now()));
}

// =============================================================================
// HTTP backend (wiremock)
// =============================================================================

fn item_json(id: &str, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "description": "No description",
        "status": "Not Started",
        "created": "2024-05-01T08:30:00.000Z",
        "url": format!("https://www.notion.so/{id}")
    })
}

#[tokio::test]
async fn http_list_decodes_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [item_json("b", "Second"), item_json("a", "First")],
            "count": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpItemsApi::new(&format!("{}/api", server.uri())).unwrap();
    let listing = api.list().await.unwrap();

    assert_eq!(listing.count, 2);
    assert_eq!(listing.items[0].id, "b");
    assert_eq!(listing.items[1].status, ItemStatus::NotStarted);
}

#[tokio::test]
async fn http_create_posts_trimmed_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/items"))
        .and(body_json(json!({
            "title": "Task A",
            "description": "desc",
            "status": "Completed"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": item_json("new-1", "Task A")
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpItemsApi::new(&format!("{}/api", server.uri())).unwrap();
    let mut h = Harness::spawn(api, TTL);
    let draft = h.ctl.draft_mut();
    draft.title = " Task A ".to_string();
    draft.description = "desc".to_string();
    draft.status = ItemStatus::Completed;

    h.create().await;

    assert_eq!(h.ctl.state().items()[0].id, "new-1");
}

#[tokio::test]
async fn http_server_error_text_reaches_notice() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/items/page-1"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "success": false,
            "error": "Notion API error: 404 Not Found"
        })))
        .mount(&server)
        .await;

    let api = HttpItemsApi::new(&format!("{}/api", server.uri())).unwrap();
    let err = api.archive("page-1").await.unwrap_err();
    assert!(matches!(err, ApiClientError::Server(ref m) if m == "Notion API error: 404 Not Found"));
}

#[tokio::test]
async fn http_non_envelope_body_is_a_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/items"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let api = HttpItemsApi::new(&format!("{}/api", server.uri())).unwrap();
    assert!(matches!(api.list().await, Err(ApiClientError::Transport(_))));
}

#[tokio::test]
async fn http_health_probe() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Notion Backend Proxy is running!",
            "timestamp": "2024-05-01T08:30:00Z"
        })))
        .mount(&server)
        .await;

    let api = HttpItemsApi::new(&format!("{}/api", server.uri())).unwrap();
    let health = api.health().await.unwrap();
    assert_eq!(health.message, "Notion Backend Proxy is running!");
    assert!(health.timestamp.is_some());
}

#[tokio::test]
async fn unreachable_proxy_fails_probe_with_location() {
    // Nothing listens on port 9.
    let api = HttpItemsApi::new("http://127.0.0.1:9/api").unwrap();
    let mut h = Harness::spawn(api, TTL);

    h.probe().await;

    assert_eq!(
        h.notice(NoticeKind::Error),
        Some("Backend not responding. Make sure it's running at http://127.0.0.1:9/api")
    );
}
