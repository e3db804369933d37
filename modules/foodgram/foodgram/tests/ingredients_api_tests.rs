#![allow(clippy::unwrap_used, clippy::expect_used)]
#![allow(clippy::non_ascii_literal)]

//! Ingredient catalog reads and the bulk loader.

mod support;

use std::io::Write;

use axum::http::StatusCode;
use foodgram::ImportReport;
use serde_json::Value;
use support::TestApp;

fn names(body: &Value) -> Vec<String> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap().to_owned())
        .collect()
}

#[tokio::test]
async fn list_is_unpaginated_and_sorted_by_name() {
    let app = TestApp::new().await;
    app.seed_ingredient("sugar", "g").await;
    app.seed_ingredient("apple", "pcs").await;
    app.seed_ingredient("milk", "ml").await;

    let reply = app.get("/api/ingredients/", None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(names(&reply.json()), ["apple", "milk", "sugar"]);
}

#[tokio::test]
async fn search_matches_name_prefix_case_insensitively() {
    let app = TestApp::new().await;
    app.seed_ingredient("Миндаль", "г").await;
    app.seed_ingredient("мидии", "г").await;
    app.seed_ingredient("Молоко", "мл").await;
    app.seed_ingredient("Кумин", "г").await;

    let body = app
        .get("/api/ingredients/?name=%D0%9C%D0%B8", None)
        .await
        .json();
    assert_eq!(names(&body), ["Миндаль", "мидии"]);

    let body = app.get("/api/ingredients/?name=zzz", None).await.json();
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn search_treats_wildcards_literally() {
    let app = TestApp::new().await;
    app.seed_ingredient("100% juice", "ml").await;
    app.seed_ingredient("1000 island", "ml").await;

    let body = app.get("/api/ingredients/?name=100%25", None).await.json();
    assert_eq!(names(&body), ["100% juice"]);

    let body = app.get("/api/ingredients/?name=_", None).await.json();
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn retrieve_by_id() {
    let app = TestApp::new().await;
    let id = app.seed_ingredient("salt", "g").await;

    let reply = app.get(&format!("/api/ingredients/{id}/"), None).await;
    assert_eq!(reply.status, StatusCode::OK);
    let body = reply.json();
    assert_eq!(body["id"], id);
    assert_eq!(body["measurement_unit"], "g");

    let missing = app.get("/api/ingredients/999/", None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let malformed = app.get("/api/ingredients/abc/", None).await;
    assert_eq!(malformed.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn catalog_is_read_only() {
    let app = TestApp::new().await;
    let (_, token) = app.register("chef").await;

    let reply = app
        .post(
            "/api/ingredients/",
            Some(&token),
            serde_json::json!({ "name": "salt", "measurement_unit": "g" }),
        )
        .await;
    assert_eq!(reply.status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn load_ingredients_is_idempotent() {
    let app = TestApp::new().await;
    app.seed_ingredient("salt", "g").await;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[
            {{"name": "salt", "measurement_unit": "g"}},
            {{"name": "salt", "measurement_unit": "kg"}},
            {{"name": " pepper ", "measurement_unit": "g"}},
            {{"name": "", "measurement_unit": "g"}}
        ]"#
    )
    .unwrap();

    let first = app.module.load_ingredients(file.path()).await.unwrap();
    assert_eq!(
        first,
        ImportReport {
            created: 2,
            skipped: 2
        }
    );

    let second = app.module.load_ingredients(file.path()).await.unwrap();
    assert_eq!(
        second,
        ImportReport {
            created: 0,
            skipped: 4
        }
    );

    let body = app.get("/api/ingredients/?name=pe", None).await.json();
    assert_eq!(names(&body), ["pepper"]);
    let all = app.get("/api/ingredients/", None).await.json();
    assert_eq!(all.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn load_ingredients_reports_bad_files() {
    let app = TestApp::new().await;

    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.json");
    let err = app.module.load_ingredients(&missing).await.unwrap_err();
    assert!(format!("{err:#}").contains("missing.json"));

    let malformed = dir.path().join("bad.json");
    std::fs::write(&malformed, "{ not json").unwrap();
    assert!(app.module.load_ingredients(&malformed).await.is_err());

    let all = app.get("/api/ingredients/", None).await.json();
    assert!(all.as_array().unwrap().is_empty());
}
