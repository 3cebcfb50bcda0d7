//! Integration tests for the proxy's REST surface.
//!
//! Validates request/response shaping and error normalization:
//! - Notion calls carry the bearer token, version header and exact bodies
//! - List maps every record, newest first, with read-side fallbacks
//! - Create trims, validates before any upstream call, echoes the status
//! - Archive soft-deletes and unknown ids surface as 500
//! - Every upstream failure becomes `{success:false,error}` with status 500

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod fake_notion;

use std::sync::Arc;

use notiondeck_proto::envelope::{Ack, ApiResponse};
use notiondeck_proto::item::{Item, ItemStatus};
use notiondeck_proxy::adapter::ItemAdapter;
use notiondeck_proxy::server::{self, ProxyState};
use notiondeck_proxy::upstream::NotionClient;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Start the proxy in-process against `notion_url` and return its `/api` URL.
async fn start_proxy(notion_url: &str, token: &str, database_id: &str) -> String {
    let client = NotionClient::with_base_url(notion_url, token, database_id).unwrap();
    let state = Arc::new(ProxyState::new(ItemAdapter::new(client)));
    let (addr, _handle) = server::start_server("127.0.0.1:0", state)
        .await
        .expect("failed to start proxy server");
    format!("http://{addr}/api")
}

async fn start_proxy_with_fake() -> (fake_notion::FakeNotion, String) {
    let (fake, url, _handle) = fake_notion::start().await;
    let api = start_proxy(&url, fake_notion::TOKEN, fake_notion::DATABASE_ID).await;
    (fake, api)
}

fn page_json(id: &str, title: &str) -> serde_json::Value {
    json!({
        "object": "page",
        "id": id,
        "created_time": "2024-05-01T08:30:00.000Z",
        "url": format!("https://www.notion.so/{id}"),
        "properties": {
            "Name": {"title": [{"plain_text": title}]},
            "Description": {"rich_text": []},
            "Status": {"select": null}
        }
    })
}

// =============================================================================
// Upstream request shape (wiremock)
// =============================================================================

#[tokio::test]
async fn list_queries_newest_first_with_auth_headers() {
    let notion = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/databases/db-1/query"))
        .and(header("authorization", "Bearer token-1"))
        .and(header("notion-version", "2022-06-28"))
        .and(body_json(json!({
            "sorts": [{"timestamp": "created_time", "direction": "descending"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "results": [page_json("b", "Second"), page_json("a", "First")]
        })))
        .expect(1)
        .mount(&notion)
        .await;

    let api = start_proxy(&notion.uri(), "token-1", "db-1").await;
    let resp: ApiResponse<Vec<Item>> = reqwest::get(format!("{api}/items"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(resp.success);
    assert_eq!(resp.count, Some(2));
    let items = resp.data.unwrap();
    assert_eq!(items[0].id, "b");
    assert_eq!(items[1].id, "a");
    assert!(items.iter().all(|i| i.status == ItemStatus::NotStarted));
    assert!(items.iter().all(|i| i.description == "No description"));
}

#[tokio::test]
async fn create_sends_title_and_description_only() {
    let notion = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/pages"))
        .and(body_json(json!({
            "parent": {"database_id": "db-1"},
            "properties": {
                "Name": {"title": [{"text": {"content": "Buy milk"}}]},
                "Description": {"rich_text": [{"text": {"content": ""}}]}
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json("new-1", "Buy milk")))
        .expect(1)
        .mount(&notion)
        .await;

    let api = start_proxy(&notion.uri(), "token-1", "db-1").await;
    let resp: ApiResponse<Item> = reqwest::Client::new()
        .post(format!("{api}/items"))
        .json(&json!({"title": "  Buy milk  ", "status": "In Progress"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(resp.success);
    let item = resp.data.unwrap();
    assert_eq!(item.id, "new-1");
    assert_eq!(item.title, "Buy milk");
    assert_eq!(item.description, "");
    assert_eq!(item.status, ItemStatus::InProgress);
    assert_eq!(item.url.as_str(), "https://www.notion.so/new-1");
}

#[tokio::test]
async fn archive_patches_archived_flag() {
    let notion = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/v1/pages/page-9"))
        .and(body_json(json!({"archived": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json("page-9", "x")))
        .expect(1)
        .mount(&notion)
        .await;

    let api = start_proxy(&notion.uri(), "token-1", "db-1").await;
    let resp = reqwest::Client::new()
        .delete(format!("{api}/items/page-9"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Ack = resp.json().await.unwrap();
    assert!(body.success);
    assert_eq!(body.message.as_deref(), Some("Item archived successfully"));
}

// =============================================================================
// Error normalization
// =============================================================================

#[tokio::test]
async fn upstream_status_surfaces_as_500_with_status_line() {
    let notion = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/databases/db-1/query"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({"code": "rate_limited"})))
        .mount(&notion)
        .await;

    let api = start_proxy(&notion.uri(), "token-1", "db-1").await;
    let resp = reqwest::get(format!("{api}/items")).await.unwrap();

    assert_eq!(resp.status(), 500);
    let body: Ack = resp.json().await.unwrap();
    assert!(!body.success);
    assert_eq!(
        body.error.as_deref(),
        Some("Notion API error: 429 Too Many Requests")
    );
}

#[tokio::test]
async fn unreachable_upstream_surfaces_as_500() {
    // Nothing listens on port 9.
    let api = start_proxy("http://127.0.0.1:9", "token-1", "db-1").await;
    let resp = reqwest::get(format!("{api}/items")).await.unwrap();

    assert_eq!(resp.status(), 500);
    let body: Ack = resp.json().await.unwrap();
    assert!(!body.success);
    assert!(!body.error.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn wrong_token_fails_every_call_identically() {
    let (fake, url, _handle) = fake_notion::start().await;
    fake.seed("Existing", "", None);
    let api = start_proxy(&url, "your-notion-token-here", fake_notion::DATABASE_ID).await;

    let list = reqwest::get(format!("{api}/items")).await.unwrap();
    assert_eq!(list.status(), 500);
    let body: Ack = list.json().await.unwrap();
    assert_eq!(body.error.as_deref(), Some("Notion API error: 401 Unauthorized"));

    let create = reqwest::Client::new()
        .post(format!("{api}/items"))
        .json(&json!({"title": "New"}))
        .send()
        .await
        .unwrap();
    assert_eq!(create.status(), 500);
}

#[tokio::test]
async fn blank_title_is_rejected_before_upstream() {
    let (fake, api) = start_proxy_with_fake().await;
    let client = reqwest::Client::new();

    for body in [json!({"title": ""}), json!({"title": "   "}), json!({"description": "x"})] {
        let resp = client
            .post(format!("{api}/items"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);
        let ack: Ack = resp.json().await.unwrap();
        assert!(!ack.success);
        assert_eq!(ack.error.as_deref(), Some("Title is required"));
    }

    assert_eq!(fake.request_count(), 0);
}

#[tokio::test]
async fn malformed_body_is_a_bad_request() {
    let (fake, api) = start_proxy_with_fake().await;
    let resp = reqwest::Client::new()
        .post(format!("{api}/items"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let ack: Ack = resp.json().await.unwrap();
    assert!(!ack.success);
    assert_eq!(fake.request_count(), 0);
}

// =============================================================================
// Stateful behaviour (fake Notion)
// =============================================================================

#[tokio::test]
async fn list_returns_every_record_newest_first() {
    let (fake, api) = start_proxy_with_fake().await;
    fake.seed("Oldest", "first", Some("Completed"));
    fake.seed("Middle", "", None);
    fake.seed("Newest", "third", Some("Blocked"));

    let resp: ApiResponse<Vec<Item>> = reqwest::get(format!("{api}/items"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(resp.count, Some(3));
    let items = resp.data.unwrap();
    let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, ["Newest", "Middle", "Oldest"]);
    assert_eq!(items[0].status, ItemStatus::Other("Blocked".into()));
    assert_eq!(items[1].status, ItemStatus::NotStarted);
    assert_eq!(items[1].description, "No description");
    assert_eq!(items[2].status, ItemStatus::Completed);
    assert!(items.iter().all(|i| !i.id.is_empty()));
}

#[tokio::test]
async fn created_status_is_echoed_but_not_stored() {
    let (fake, api) = start_proxy_with_fake().await;
    let resp: ApiResponse<Item> = reqwest::Client::new()
        .post(format!("{api}/items"))
        .json(&json!({"title": "Task A", "description": " desc ", "status": "Completed"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let item = resp.data.unwrap();
    assert_eq!(item.status, ItemStatus::Completed);
    assert_eq!(item.description, "desc");
    assert_eq!(fake.stored_status(&item.id), None);

    // Reading it back shows the upstream truth.
    let list: ApiResponse<Vec<Item>> = reqwest::get(format!("{api}/items"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list.data.unwrap()[0].status, ItemStatus::NotStarted);
}

#[tokio::test]
async fn archive_removes_only_that_item_from_next_list() {
    let (fake, api) = start_proxy_with_fake().await;
    let keep = fake.seed("Keep", "", None);
    let gone = fake.seed("Drop", "", None);

    let resp = reqwest::Client::new()
        .delete(format!("{api}/items/{gone}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert!(fake.is_archived(&gone));

    let list: ApiResponse<Vec<Item>> = reqwest::get(format!("{api}/items"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let ids: Vec<String> = list.data.unwrap().into_iter().map(|i| i.id).collect();
    assert_eq!(ids, [keep]);
}

#[tokio::test]
async fn archive_unknown_id_fails_with_500() {
    let (_fake, api) = start_proxy_with_fake().await;
    let resp = reqwest::Client::new()
        .delete(format!("{api}/items/does-not-exist"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 500);
    let ack: Ack = resp.json().await.unwrap();
    assert_eq!(ack.error.as_deref(), Some("Notion API error: 404 Not Found"));
}
