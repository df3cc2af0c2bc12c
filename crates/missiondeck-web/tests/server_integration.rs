//! Integration tests for the missiondeck-web server.
//!
//! These tests start a real axum server on a random port backed by the
//! sample missions and a temporary storage file, then exercise the REST
//! endpoints.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use missiondeck::favorites::{FAVORITES_KEY, Favorites};
use missiondeck::loader::sample_missions;
use missiondeck::state::CatalogState;
use missiondeck::storage::{JsonFileStore, KeyValueStore};
use missiondeck_web::{SharedCatalog, WebConfig, spawn_web};
use serde_json::{Value, json};

struct TestServer {
    catalog: SharedCatalog,
    base: String,
    dir: tempfile::TempDir,
}

impl TestServer {
    fn stored_favorites(&self) -> Option<String> {
        JsonFileStore::new(self.dir.path().join("storage.json"))
            .get(FAVORITES_KEY)
            .unwrap()
    }
}

/// Helper: spawn a test server on port 0 (random available port).
async fn spawn_test_server() -> TestServer {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("storage.json"));
    let favorites = Favorites::load(Box::new(store), FAVORITES_KEY);
    let catalog = Arc::new(Mutex::new(CatalogState::new(sample_missions(), favorites)));

    let config = WebConfig {
        bind_addr: ([127, 0, 0, 1], 0).into(),
        submit_delay: Duration::from_millis(10),
        ..Default::default()
    };

    let addr = spawn_web(catalog.clone(), config).await.unwrap();
    TestServer {
        catalog,
        base: format!("http://{addr}"),
        dir,
    }
}

fn draft(name: &str, agency: &str, date: &str) -> Value {
    json!({
        "name": name,
        "agency": agency,
        "objective": "Cartographier la surface",
        "launchDate": date,
        "type": "Orbiteur",
        "image": ""
    })
}

// ── View and filters ─────────────────────────────────────────────────

#[tokio::test]
async fn get_view_lists_every_mission() {
    let server = spawn_test_server().await;

    let resp = reqwest::get(format!("{}/api/view", server.base)).await.unwrap();
    assert_eq!(resp.status(), 200);

    let view: Value = resp.json().await.unwrap();
    assert_eq!(view["cards"].as_array().unwrap().len(), 5);
    assert_eq!(view["total"], 5);
    assert_eq!(view["cards"][0]["name"], "Apollo 11");
    assert_eq!(view["cards"][0]["launchLabel"], "16 juillet 1969");
    assert!(view["empty"].is_null());
}

#[tokio::test]
async fn put_filter_narrows_and_reset_restores() {
    let server = spawn_test_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .put(format!("{}/api/filter", server.base))
        .json(&json!({"search": "", "agency": "", "year": "", "type": "Alunissage"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let view: Value = resp.json().await.unwrap();
    let names: Vec<&str> = view["cards"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Apollo 11", "Chang'e 4", "Chandrayaan-3"]);

    let resp = client
        .put(format!("{}/api/filter", server.base))
        .json(&json!({"search": "", "agency": "ESA", "year": "1969", "type": ""}))
        .send()
        .await
        .unwrap();
    let view: Value = resp.json().await.unwrap();
    assert!(view["cards"].as_array().unwrap().is_empty());
    assert_eq!(view["empty"]["kind"], "no_results");
    assert_eq!(view["empty"]["title"], "Aucune mission trouvée");

    let resp = client
        .post(format!("{}/api/filter/reset", server.base))
        .send()
        .await
        .unwrap();
    let view: Value = resp.json().await.unwrap();
    assert_eq!(view["cards"].as_array().unwrap().len(), 5);
    assert_eq!(view["filter"]["agency"], "");
}

// ── Favorites ────────────────────────────────────────────────────────

#[tokio::test]
async fn toggle_favorite_persists_to_storage() {
    let server = spawn_test_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/api/favorites/3/toggle", server.base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["favorite"], true);
    assert_eq!(body["count"], 1);
    assert_eq!(server.stored_favorites().as_deref(), Some("[3]"));

    let panel: Value = reqwest::get(format!("{}/api/favorites", server.base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(panel["count"], 1);
    assert_eq!(panel["items"][0]["name"], "Chang'e 4");

    let body: Value = client
        .post(format!("{}/api/favorites/3/toggle", server.base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["favorite"], false);
    assert_eq!(server.stored_favorites().as_deref(), Some("[]"));
}

#[tokio::test]
async fn delete_favorite_returns_404_when_absent() {
    let server = spawn_test_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .delete(format!("{}/api/favorites/2", server.base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    client
        .post(format!("{}/api/favorites/2/toggle", server.base))
        .send()
        .await
        .unwrap();
    let resp = client
        .delete(format!("{}/api/favorites/2", server.base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 204);
    assert!(server.catalog.lock().unwrap().favorites().is_empty());
}

// ── Missions ─────────────────────────────────────────────────────────

#[tokio::test]
async fn create_update_delete_mission() {
    let server = spawn_test_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/api/missions", server.base))
        .json(&draft("Mars Express", "ESA", "2003-06-02"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let created: Value = resp.json().await.unwrap();
    assert_eq!(created["id"], 6);
    assert!(created["image"].is_null());

    let resp = client
        .put(format!("{}/api/missions/6", server.base))
        .json(&draft("Mars Express", "ESA", "2003-06-03"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let fetched: Value = reqwest::get(format!("{}/api/missions/6", server.base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["launchDate"], "2003-06-03");

    let resp = client
        .delete(format!("{}/api/missions/6", server.base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 204);

    let resp = reqwest::get(format!("{}/api/missions/6", server.base))
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn unknown_mission_is_404() {
    let server = spawn_test_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .put(format!("{}/api/missions/99", server.base))
        .json(&draft("Ghost", "NASA", "2000-01-01"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let resp = client
        .delete(format!("{}/api/missions/99", server.base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    assert_eq!(server.catalog.lock().unwrap().missions().len(), 5);
}

#[tokio::test]
async fn deleting_a_favorite_mission_drops_it_from_storage() {
    let server = spawn_test_server().await;
    let client = reqwest::Client::new();

    for id in [1, 4] {
        client
            .post(format!("{}/api/favorites/{id}/toggle", server.base))
            .send()
            .await
            .unwrap();
    }
    client
        .delete(format!("{}/api/missions/1", server.base))
        .send()
        .await
        .unwrap();

    assert_eq!(server.stored_favorites().as_deref(), Some("[4]"));
    let view: Value = reqwest::get(format!("{}/api/view", server.base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(view["total"], 4);
    assert_eq!(view["favoriteCount"], 1);
}

#[tokio::test]
async fn editor_opens_prefilled_and_submits() {
    let server = spawn_test_server().await;
    let client = reqwest::Client::new();

    let view: Value = client
        .post(format!("{}/api/editor", server.base))
        .json(&json!({"id": 4}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(view["editor"]["title"], "Modifier la Mission");
    assert_eq!(view["editor"]["draft"]["name"], "Hope");

    let resp = client
        .post(format!("{}/api/editor/submit", server.base))
        .json(&draft("Hope Probe", "MBRSC", "2020-07-19"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let saved: Value = resp.json().await.unwrap();
    assert_eq!(saved["id"], 4);
    assert_eq!(saved["name"], "Hope Probe");

    // Closed after submit.
    let resp = client
        .post(format!("{}/api/editor/submit", server.base))
        .json(&draft("Again", "MBRSC", "2020-07-19"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
}

#[tokio::test]
async fn open_card_returns_notification_text() {
    let server = spawn_test_server().await;
    let client = reqwest::Client::new();

    let body: Value = client
        .post(format!("{}/api/missions/2/open", server.base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["message"], "Ouverture des détails: Rosetta");
}

#[tokio::test]
async fn schema_describes_missions() {
    let server = spawn_test_server().await;

    let schema: Value = reqwest::get(format!("{}/api/schema", server.base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(schema.to_string().contains("launchDate"));
}

// ── Contact ──────────────────────────────────────────────────────────

#[tokio::test]
async fn contact_rejects_invalid_form_with_422() {
    let server = spawn_test_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/api/contact", server.base))
        .json(&json!({"firstName": "A", "email": "nope"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 422);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "rejected");
    assert_eq!(body["validation"]["errors"][0]["field"], "firstName");
}

#[tokio::test]
async fn contact_redirects_valid_form() {
    let server = spawn_test_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/api/contact", server.base))
        .json(&json!({
            "firstName": "Ada",
            "lastName": "Byron",
            "email": "ada@example.org",
            "phone": "",
            "message": "Bonjour, une question sur Rosetta."
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "redirect");
    assert_eq!(body["location"], "contact-success.html");
}

#[tokio::test]
async fn contact_validate_reports_errors_without_sending() {
    let server = spawn_test_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/api/contact/validate", server.base))
        .json(&json!({
            "firstName": "Ada",
            "lastName": "B",
            "email": "ada@example.org",
            "phone": "12",
            "message": "court"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["lastName", "phone", "message"]);

    let resp = client
        .post(format!("{}/api/contact/validate", server.base))
        .json(&json!({
            "firstName": "Ada",
            "lastName": "Byron",
            "email": "ada@example.org",
            "message": "Bonjour, une question sur Rosetta."
        }))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert!(body["errors"].as_array().unwrap().is_empty());
}
