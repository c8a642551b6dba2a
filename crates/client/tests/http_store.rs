use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{json, Value};

use invtrack_client::{EditState, HttpRemoteStore, InventoryStore, RemoteError, RemoteStore};
use invtrack_core::ItemId;
use invtrack_inventory::{InventoryItem, ItemFields, ItemPatch, ItemState, ItemType};

/// Stub of the inventory REST backend. Like the real one, it assigns its own
/// id and timestamps on create and stamps `last_updated_at` on update. Its
/// clock starts at 2024-01-01T00:00:00Z and advances one second per write.
#[derive(Default)]
struct Backend {
    items: Mutex<Vec<InventoryItem>>,
    writes: Mutex<i64>,
    next_id: Mutex<Option<String>>,
    failing: AtomicBool,
    garbage: AtomicBool,
    naive_timestamps: AtomicBool,
    last_body: Mutex<Option<Value>>,
    last_auth: Mutex<Option<String>>,
}

impl Backend {
    fn tick(&self) -> DateTime<Utc> {
        let mut writes = self.writes.lock().unwrap();
        let now = epoch() + Duration::seconds(*writes);
        *writes += 1;
        now
    }

    fn render(&self, item: &InventoryItem) -> Value {
        if !self.naive_timestamps.load(Ordering::SeqCst) {
            return serde_json::to_value(item).unwrap();
        }
        // The Python backend emits `datetime.utcnow().isoformat()`: no offset.
        let naive = |t: &DateTime<Utc>| t.naive_utc().format("%Y-%m-%dT%H:%M:%S%.6f").to_string();
        json!({
            "id": item.id,
            "type": item.item_type,
            "description": item.description,
            "state": item.state,
            "added_at": naive(&item.added_at),
            "last_updated_at": naive(&item.last_updated_at),
        })
    }

    fn refuse(&self) -> Option<Response> {
        if self.failing.load(Ordering::SeqCst) {
            return Some((StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response());
        }
        if self.garbage.load(Ordering::SeqCst) {
            return Some((StatusCode::OK, "<html>not json</html>").into_response());
        }
        None
    }
}

fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

async fn list_items(State(b): State<Arc<Backend>>, headers: HeaderMap) -> Response {
    *b.last_auth.lock().unwrap() = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    if let Some(resp) = b.refuse() {
        return resp;
    }
    let items = b.items.lock().unwrap().clone();
    let body: Vec<Value> = items.iter().map(|i| b.render(i)).collect();
    Json(body).into_response()
}

async fn create_item(State(b): State<Arc<Backend>>, Json(body): Json<Value>) -> Response {
    *b.last_body.lock().unwrap() = Some(body.clone());
    if let Some(resp) = b.refuse() {
        return resp;
    }
    let mut item: InventoryItem = match serde_json::from_value(body) {
        Ok(item) => item,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };
    let now = b.tick();
    item.id = b
        .next_id
        .lock()
        .unwrap()
        .take()
        .map(ItemId::from)
        .unwrap_or_else(ItemId::new);
    item.added_at = now;
    item.last_updated_at = now;
    b.items.lock().unwrap().push(item.clone());
    (StatusCode::CREATED, Json(b.render(&item))).into_response()
}

async fn update_item(
    State(b): State<Arc<Backend>>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    *b.last_body.lock().unwrap() = Some(body.clone());
    if let Some(resp) = b.refuse() {
        return resp;
    }
    let patch: ItemPatch = match serde_json::from_value(body) {
        Ok(p) => p,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };
    let now = b.tick();
    let mut items = b.items.lock().unwrap();
    match items.iter_mut().find(|i| i.id.as_str() == id) {
        Some(item) => {
            item.item_type = patch.item_type;
            item.description = patch.description;
            item.state = patch.state;
            item.last_updated_at = now;
            Json(b.render(item)).into_response()
        }
        None => (StatusCode::NOT_FOUND, Json(json!({ "error": "Item not found" }))).into_response(),
    }
}

async fn delete_item(State(b): State<Arc<Backend>>, Path(id): Path<String>) -> Response {
    if let Some(resp) = b.refuse() {
        return resp;
    }
    b.items.lock().unwrap().retain(|i| i.id.as_str() != id);
    StatusCode::NO_CONTENT.into_response()
}

struct TestServer {
    base_url: String,
    backend: Arc<Backend>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        let backend = Arc::new(Backend::default());
        let app = Router::new()
            .route("/inventory", get(list_items).post(create_item))
            .route("/inventory/:id", put(update_item).delete(delete_item))
            .with_state(backend.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            backend,
            handle,
        }
    }

    fn remote(&self) -> HttpRemoteStore {
        HttpRemoteStore::new(self.base_url.clone())
    }

    fn store(&self) -> InventoryStore<HttpRemoteStore> {
        InventoryStore::new(self.remote())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn create_appends_the_server_record() {
    let srv = TestServer::spawn().await;
    *srv.backend.next_id.lock().unwrap() = Some("abc".to_string());

    let mut store = srv.store();
    assert!(store.load().await);
    *store.draft_mut() = ItemFields::new(ItemType::Furniture, "Desk", ItemState::InUse);
    assert!(store.create().await);

    assert_eq!(store.items().len(), 1);
    let item = &store.items()[0];
    assert_eq!(item.id.as_str(), "abc");
    assert_eq!(item.item_type, ItemType::Furniture);
    assert_eq!(item.description, "Desk");
    assert_eq!(item.state, ItemState::InUse);
    assert_eq!(item.added_at, epoch());
    assert_eq!(item.last_updated_at, epoch());
    assert_eq!(store.draft(), &ItemFields::default());

    // The client pre-fills id and two identical timestamps.
    let sent = srv.backend.last_body.lock().unwrap().clone().unwrap();
    assert_eq!(sent["type"], "furniture");
    assert_eq!(sent["state"], "in use");
    assert_eq!(sent["description"], "Desk");
    assert!(sent["id"].as_str().is_some_and(|id| !id.is_empty() && id != "abc"));
    assert_eq!(sent["added_at"], sent["last_updated_at"]);
}

#[tokio::test]
async fn create_then_load_round_trips() {
    let srv = TestServer::spawn().await;
    let mut store = srv.store();
    *store.draft_mut() = ItemFields::new(ItemType::Machinery, "Forklift", ItemState::Deprecated);
    assert!(store.create().await);

    let mut fresh = srv.store();
    assert!(fresh.load().await);
    assert_eq!(fresh.items().len(), 1);
    let item = &fresh.items()[0];
    assert_eq!(item.fields(), ItemFields::new(ItemType::Machinery, "Forklift", ItemState::Deprecated));
    assert_eq!(item.added_at, item.last_updated_at);
    assert_eq!(fresh.items(), store.items());
}

#[tokio::test]
async fn repeated_load_is_identical() {
    let srv = TestServer::spawn().await;
    let mut store = srv.store();
    for desc in ["Monitor", "Keyboard"] {
        *store.draft_mut() = ItemFields::new(ItemType::ComputerEquipment, desc, ItemState::InUse);
        assert!(store.create().await);
    }

    assert!(store.load().await);
    let first = store.items().to_vec();
    assert!(store.load().await);
    assert_eq!(store.items(), first.as_slice());
}

#[tokio::test]
async fn edit_and_save_round_trips_through_the_server() {
    let srv = TestServer::spawn().await;
    let mut store = srv.store();
    *store.draft_mut() = ItemFields::new(ItemType::CommunicationEquipment, "Desk phone", ItemState::InUse);
    assert!(store.create().await);
    let before = store.items()[0].clone();

    assert!(store.begin_edit(&before.id));
    store.edit_buffer_mut().unwrap().state = ItemState::Broken;
    assert_eq!(store.get(&before.id), Some(&before));

    assert!(store.save_edit().await);
    let after = store.get(&before.id).unwrap();
    assert_eq!(after.state, ItemState::Broken);
    assert_eq!(after.added_at, before.added_at);
    assert!(after.last_updated_at > before.last_updated_at);
    assert_eq!(store.edit_state(), &EditState::Idle);

    let sent = srv.backend.last_body.lock().unwrap().clone().unwrap();
    let keys: Vec<&str> = sent.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys.len(), 4);
    for key in ["type", "description", "state", "last_updated_at"] {
        assert!(keys.contains(&key), "missing {key}");
    }
}

#[tokio::test]
async fn failed_update_keeps_edit_mode() {
    let srv = TestServer::spawn().await;
    let mut store = srv.store();
    *store.draft_mut() = ItemFields::new(ItemType::Furniture, "Shelf", ItemState::InUse);
    assert!(store.create().await);
    let id = store.items()[0].id.clone();

    store.begin_edit(&id);
    store.edit_buffer_mut().unwrap().description = "Bookshelf".to_string();
    srv.backend.failing.store(true, Ordering::SeqCst);

    assert!(!store.save_edit().await);
    assert_eq!(store.get(&id).unwrap().description, "Shelf");
    assert!(store.edit_state().is_editing(&id));
}

#[tokio::test]
async fn delete_removes_item_on_success_only() {
    let srv = TestServer::spawn().await;
    *srv.backend.next_id.lock().unwrap() = Some("abc".to_string());
    let mut store = srv.store();
    *store.draft_mut() = ItemFields::new(ItemType::Furniture, "Desk", ItemState::InUse);
    assert!(store.create().await);
    let id = ItemId::from("abc");

    srv.backend.failing.store(true, Ordering::SeqCst);
    assert!(!store.delete(&id).await);
    assert!(store.get(&id).is_some());

    srv.backend.failing.store(false, Ordering::SeqCst);
    assert!(store.delete(&id).await);
    assert!(store.items().is_empty());
}

#[tokio::test]
async fn reserved_characters_in_ids_address_one_item() {
    let srv = TestServer::spawn().await;
    let seeded = |id: &str| InventoryItem {
        id: ItemId::from(id),
        item_type: ItemType::Furniture,
        description: format!("Desk {id}"),
        state: ItemState::InUse,
        added_at: epoch(),
        last_updated_at: epoch(),
    };
    *srv.backend.items.lock().unwrap() = vec![seeded("a"), seeded("a#b")];
    let mut store = srv.store();
    assert!(store.load().await);

    let tricky = ItemId::from("a#b");
    let fields = ItemFields::new(ItemType::Machinery, "Lathe", ItemState::Broken);
    assert!(store.update(&tricky, fields).await);
    assert_eq!(store.get(&tricky).unwrap().description, "Lathe");
    assert_eq!(store.get(&ItemId::from("a")).unwrap().description, "Desk a");

    assert!(store.delete(&tricky).await);
    let cached: Vec<&str> = store.items().iter().map(|i| i.id.as_str()).collect();
    assert_eq!(cached, ["a"]);
    let on_server: Vec<String> = srv
        .backend
        .items
        .lock()
        .unwrap()
        .iter()
        .map(|i| i.id.as_str().to_string())
        .collect();
    assert_eq!(on_server, ["a"]);
}

#[tokio::test]
async fn failed_load_empties_the_cache() {
    let srv = TestServer::spawn().await;
    let mut store = srv.store();
    *store.draft_mut() = ItemFields::new(ItemType::Furniture, "Desk", ItemState::InUse);
    assert!(store.create().await);

    srv.backend.failing.store(true, Ordering::SeqCst);
    assert!(!store.load().await);
    assert!(store.items().is_empty());
}

#[tokio::test]
async fn failed_create_keeps_the_draft() {
    let srv = TestServer::spawn().await;
    srv.backend.failing.store(true, Ordering::SeqCst);

    let mut store = srv.store();
    let draft = ItemFields::new(ItemType::Furniture, "Desk", ItemState::InUse);
    *store.draft_mut() = draft.clone();
    assert!(!store.create().await);
    assert!(store.items().is_empty());
    assert_eq!(store.draft(), &draft);
}

#[tokio::test]
async fn naive_server_timestamps_are_utc() {
    let srv = TestServer::spawn().await;
    srv.backend.naive_timestamps.store(true, Ordering::SeqCst);

    let mut store = srv.store();
    *store.draft_mut() = ItemFields::new(ItemType::Furniture, "Desk", ItemState::InUse);
    assert!(store.create().await);
    assert!(store.load().await);
    assert_eq!(store.items()[0].added_at, epoch());
}

#[tokio::test]
async fn status_and_body_failures_are_classified() {
    let srv = TestServer::spawn().await;
    let remote = srv.remote();

    let patch = ItemPatch::from_fields(&ItemFields::new(ItemType::Furniture, "Desk", ItemState::Lost), Utc::now());
    match remote.update(&ItemId::from("missing"), &patch).await {
        Err(RemoteError::Api(404, body)) => assert!(body.contains("Item not found")),
        other => panic!("Expected Api(404), got {other:?}"),
    }

    srv.backend.garbage.store(true, Ordering::SeqCst);
    match remote.list().await {
        Err(RemoteError::Parse(_)) => {}
        other => panic!("Expected Parse error, got {other:?}"),
    }
}

#[tokio::test]
async fn bearer_token_is_sent_when_configured() {
    let srv = TestServer::spawn().await;
    let remote = HttpRemoteStore::with_token(srv.base_url.clone(), "secret".to_string());
    remote.list().await.unwrap();
    assert_eq!(srv.backend.last_auth.lock().unwrap().as_deref(), Some("Bearer secret"));

    srv.remote().list().await.unwrap();
    assert!(srv.backend.last_auth.lock().unwrap().is_none());
}
