#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Recipe ledger over HTTP: create, read, update, delete, access ordering
//! and pagination.

mod support;

use axum::http::StatusCode;
use serde_json::{Value, json};
use sea_orm::ConnectionTrait;
use support::{PNG, TestApp, recipe_body};

fn ingredient_ids(recipe: &Value) -> Vec<i64> {
    recipe["ingredients"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn create_returns_full_recipe_with_author() {
    let app = TestApp::new().await;
    let (uid, token) = app.register("chef").await;
    let flour = app.seed_ingredient("flour", "g").await;
    let milk = app.seed_ingredient("milk", "ml").await;

    let reply = app
        .post(
            "/api/recipes/",
            Some(&token),
            recipe_body("Pancakes", &[(flour, 200), (milk, 300)]),
        )
        .await;
    assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.text());

    let body = reply.json();
    assert_eq!(body["name"], "Pancakes");
    assert_eq!(body["cooking_time"], 15);
    assert_eq!(body["author"]["id"], uid);
    assert_eq!(body["author"]["is_subscribed"], false);
    assert_eq!(body["is_favorited"], false);
    assert_eq!(body["is_in_shopping_cart"], false);
    assert_eq!(ingredient_ids(&body), vec![flour, milk]);
    assert_eq!(body["ingredients"][0]["measurement_unit"], "g");
    assert_eq!(body["ingredients"][1]["amount"], 300);
}

#[tokio::test]
async fn anonymous_create_is_unauthorized() {
    let app = TestApp::new().await;
    let flour = app.seed_ingredient("flour", "g").await;

    let reply = app
        .post("/api/recipes/", None, recipe_body("Bread", &[(flour, 1)]))
        .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);

    // Missing fields do not leak validation details to anonymous callers
    let reply = app.post("/api/recipes/", None, json!({})).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_rejects_bad_ingredient_sets() {
    let app = TestApp::new().await;
    let (_, token) = app.register("chef").await;
    let flour = app.seed_ingredient("flour", "g").await;

    let cases = [
        (recipe_body("Empty", &[]), "ingredients"),
        (recipe_body("Twice", &[(flour, 1), (flour, 2)]), "ingredients"),
        (recipe_body("Zero", &[(flour, 0)]), "ingredients"),
        (recipe_body("Ghost", &[(flour + 100, 1)]), "ingredients"),
    ];
    for (body, field) in cases {
        let reply = app.post("/api/recipes/", Some(&token), body).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST, "{}", reply.text());
        assert!(reply.json()["errors"][field].is_array(), "{}", reply.text());
    }

    let reply = app.get("/api/recipes/", None).await;
    assert_eq!(reply.json()["count"], 0);
}

#[tokio::test]
async fn create_reports_missing_fields() {
    let app = TestApp::new().await;
    let (_, token) = app.register("chef").await;

    let reply = app
        .post("/api/recipes/", Some(&token), json!({ "name": "Soup" }))
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    let errors = &reply.json()["errors"];
    for field in ["ingredients", "image", "text", "cooking_time"] {
        assert!(errors[field].is_array(), "missing error for {field}");
    }
    assert!(errors["name"].is_null());
}

#[tokio::test]
async fn create_rejects_out_of_range_values() {
    let app = TestApp::new().await;
    let (_, token) = app.register("chef").await;
    let flour = app.seed_ingredient("flour", "g").await;

    let mut body = recipe_body("Slow", &[(flour, 1)]);
    body["cooking_time"] = json!(0);
    body["image"] = json!("not an image");
    let reply = app.post("/api/recipes/", Some(&token), body).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    let errors = &reply.json()["errors"];
    assert!(errors["cooking_time"].is_array());
    assert!(errors["image"].is_array());
}

#[tokio::test]
async fn patch_replaces_ingredient_set_atomically() {
    let app = TestApp::new().await;
    let (_, token) = app.register("chef").await;
    let flour = app.seed_ingredient("flour", "g").await;
    let milk = app.seed_ingredient("milk", "ml").await;
    let eggs = app.seed_ingredient("eggs", "pcs").await;
    let id = app
        .create_recipe(&token, "Pancakes", &[(flour, 200), (milk, 300)])
        .await;
    let uri = format!("/api/recipes/{id}/");

    // Unknown ingredient: nothing changes, including other fields
    let reply = app
        .patch(
            &uri,
            Some(&token),
            json!({
                "name": "Renamed",
                "ingredients": [{ "id": eggs, "amount": 2 }, { "id": eggs + 100, "amount": 1 }],
            }),
        )
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST, "{}", reply.text());
    let current = app.get(&uri, None).await.json();
    assert_eq!(current["name"], "Pancakes");
    assert_eq!(ingredient_ids(&current), vec![flour, milk]);

    // Valid replacement swaps the whole set
    let reply = app
        .patch(
            &uri,
            Some(&token),
            json!({ "ingredients": [{ "id": eggs, "amount": 3 }] }),
        )
        .await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.text());
    let body = reply.json();
    assert_eq!(ingredient_ids(&body), vec![eggs]);
    assert_eq!(body["name"], "Pancakes");
}

#[tokio::test]
async fn failed_ingredient_write_rolls_back_whole_update() {
    let app = TestApp::new().await;
    let (_, token) = app.register("chef").await;
    let flour = app.seed_ingredient("flour", "g").await;
    let milk = app.seed_ingredient("milk", "ml").await;
    let id = app
        .create_recipe(&token, "Pancakes", &[(flour, 200), (milk, 300)])
        .await;
    let uri = format!("/api/recipes/{id}/");

    // Passes validation, then fails inside the transaction after the old
    // rows have already been deleted.
    app.db
        .execute_unprepared(
            "CREATE TRIGGER reject_amount BEFORE INSERT ON recipe_ingredients \
             WHEN NEW.amount = 7 BEGIN SELECT RAISE(ABORT, 'rejected amount'); END;",
        )
        .await
        .unwrap();

    let reply = app
        .patch(
            &uri,
            Some(&token),
            json!({ "name": "Renamed", "ingredients": [{ "id": milk, "amount": 7 }] }),
        )
        .await;
    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(reply.json()["code"], "INTERNAL");

    let current = app.get(&uri, None).await.json();
    assert_eq!(current["name"], "Pancakes");
    assert_eq!(ingredient_ids(&current), vec![flour, milk]);
    assert_eq!(current["ingredients"][1]["amount"], 300);
}

#[tokio::test]
async fn patch_without_ingredients_keeps_set() {
    let app = TestApp::new().await;
    let (_, token) = app.register("chef").await;
    let flour = app.seed_ingredient("flour", "g").await;
    let id = app.create_recipe(&token, "Bread", &[(flour, 500)]).await;

    let reply = app
        .patch(
            &format!("/api/recipes/{id}/"),
            Some(&token),
            json!({ "name": "Rye bread", "cooking_time": 90 }),
        )
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    let body = reply.json();
    assert_eq!(body["name"], "Rye bread");
    assert_eq!(body["cooking_time"], 90);
    assert_eq!(ingredient_ids(&body), vec![flour]);
}

#[tokio::test]
async fn put_requires_every_field() {
    let app = TestApp::new().await;
    let (_, token) = app.register("chef").await;
    let flour = app.seed_ingredient("flour", "g").await;
    let id = app.create_recipe(&token, "Bread", &[(flour, 500)]).await;
    let uri = format!("/api/recipes/{id}/");

    let reply = app.put(&uri, Some(&token), json!({ "name": "Only name" })).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert!(reply.json()["errors"]["ingredients"].is_array());

    let reply = app
        .put(&uri, Some(&token), recipe_body("Focaccia", &[(flour, 400)]))
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json()["name"], "Focaccia");
    assert_eq!(reply.json()["ingredients"][0]["amount"], 400);
}

#[tokio::test]
async fn mutation_errors_follow_auth_then_existence_then_ownership() {
    let app = TestApp::new().await;
    let (_, owner) = app.register("owner").await;
    let (_, other) = app.register("other").await;
    let flour = app.seed_ingredient("flour", "g").await;
    let id = app.create_recipe(&owner, "Bread", &[(flour, 500)]).await;
    let uri = format!("/api/recipes/{id}/");
    let missing = format!("/api/recipes/{}/", id + 100);
    let patch = json!({ "name": "Stolen" });

    assert_eq!(
        app.patch(&missing, None, patch.clone()).await.status,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        app.patch(&missing, Some(&other), patch.clone()).await.status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        app.patch(&uri, Some(&other), patch).await.status,
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        app.put(&uri, Some(&other), json!({})).await.status,
        StatusCode::FORBIDDEN
    );
    assert_eq!(app.delete(&uri, None).await.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        app.delete(&missing, Some(&other)).await.status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        app.delete(&uri, Some(&other)).await.status,
        StatusCode::FORBIDDEN
    );

    assert_eq!(app.get(&uri, None).await.json()["name"], "Bread");
}

#[tokio::test]
async fn delete_removes_recipe_and_its_relations() {
    let app = TestApp::new().await;
    let (_, token) = app.register("chef").await;
    let (_, fan) = app.register("fan").await;
    let flour = app.seed_ingredient("flour", "g").await;
    let id = app.create_recipe(&token, "Bread", &[(flour, 500)]).await;

    let fav = format!("/api/recipes/{id}/favorite/");
    assert_eq!(app.post_empty(&fav, Some(&fan)).await.status, StatusCode::CREATED);

    let reply = app.delete(&format!("/api/recipes/{id}/"), Some(&token)).await;
    assert_eq!(reply.status, StatusCode::NO_CONTENT);
    assert!(reply.bytes.is_empty());

    assert_eq!(
        app.get(&format!("/api/recipes/{id}/"), None).await.status,
        StatusCode::NOT_FOUND
    );
    let favorites = app
        .get("/api/recipes/?is_favorited=1", Some(&fan))
        .await
        .json();
    assert_eq!(favorites["count"], 0);
}

#[tokio::test]
async fn not_found_is_a_problem_document() {
    let app = TestApp::new().await;

    let reply = app.get("/api/recipes/999/", None).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(
        reply.headers.get("content-type").unwrap(),
        "application/problem+json"
    );
    let body = reply.json();
    assert_eq!(body["status"], 404);
    assert_eq!(body["detail"], "Not found.");
    assert_eq!(body["instance"], "/api/recipes/999/");

    let (_, token) = app.register("chef").await;
    let reply = app.post("/api/recipes/", Some(&token), json!({})).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.json()["instance"], "/api/recipes/");
}

#[tokio::test]
async fn list_is_newest_first_and_paginated() {
    let app = TestApp::new().await;
    let (_, token) = app.register("chef").await;
    let flour = app.seed_ingredient("flour", "g").await;
    let mut ids = Vec::new();
    for n in 0..3 {
        ids.push(
            app.create_recipe(&token, &format!("Recipe {n}"), &[(flour, 10)])
                .await,
        );
    }

    let first = app.get("/api/recipes/?limit=2", None).await.json();
    assert_eq!(first["count"], 3);
    assert_eq!(first["previous"], Value::Null);
    assert_eq!(
        first["next"],
        "http://testserver/api/recipes/?limit=2&page=2"
    );
    let listed: Vec<i64> = first["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_i64().unwrap())
        .collect();
    assert_eq!(listed, vec![ids[2], ids[1]]);

    let second = app.get("/api/recipes/?limit=2&page=2", None).await.json();
    assert_eq!(second["results"].as_array().unwrap().len(), 1);
    assert_eq!(second["next"], Value::Null);
    assert_eq!(second["previous"], "http://testserver/api/recipes/?limit=2");

    let past = app.get("/api/recipes/?limit=2&page=3", None).await;
    assert_eq!(past.status, StatusCode::NOT_FOUND);

    let bogus = app.get("/api/recipes/?page=abc", None).await;
    assert_eq!(bogus.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_filters_by_author() {
    let app = TestApp::new().await;
    let (alice, alice_token) = app.register("alice").await;
    let (_, bob_token) = app.register("bob").await;
    let flour = app.seed_ingredient("flour", "g").await;
    app.create_recipe(&alice_token, "Alice bread", &[(flour, 1)]).await;
    app.create_recipe(&bob_token, "Bob bread", &[(flour, 1)]).await;

    let body = app
        .get(&format!("/api/recipes/?author={alice}"), None)
        .await
        .json();
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["name"], "Alice bread");

    let reply = app.get("/api/recipes/?author=abc", None).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert!(reply.json()["errors"]["author"].is_array());
}

#[tokio::test]
async fn huge_page_numbers_are_not_found() {
    let app = TestApp::new().await;
    let (_, token) = app.register("chef").await;
    let flour = app.seed_ingredient("flour", "g").await;
    app.create_recipe(&token, "Bread", &[(flour, 1)]).await;

    for uri in [
        "/api/recipes/?page=1000000000000000000&limit=100",
        "/api/users/?page=1000000000000000000&limit=100",
        "/api/users/subscriptions/?page=1000000000000000000&limit=100",
        "/api/recipes/?page=18446744073709551615",
    ] {
        let reply = app.get(uri, Some(&token)).await;
        assert_eq!(reply.status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(reply.json()["code"], "INVALID_PAGE", "{uri}");
    }
}

#[tokio::test]
async fn relation_filters_are_ignored_for_anonymous_callers() {
    let app = TestApp::new().await;
    let (_, token) = app.register("chef").await;
    let flour = app.seed_ingredient("flour", "g").await;
    app.create_recipe(&token, "Bread", &[(flour, 1)]).await;

    let body = app
        .get("/api/recipes/?is_favorited=1&is_in_shopping_cart=true", None)
        .await
        .json();
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["is_favorited"], false);
    assert_eq!(body["results"][0]["is_in_shopping_cart"], false);
}

#[tokio::test]
async fn get_link_points_at_recipe() {
    let app = TestApp::new().await;
    let (_, token) = app.register("chef").await;
    let flour = app.seed_ingredient("flour", "g").await;
    let id = app.create_recipe(&token, "Bread", &[(flour, 1)]).await;

    let reply = app.get(&format!("/api/recipes/{id}/get-link/"), None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(
        reply.json()["short-link"],
        format!("http://testserver/api/recipes/{id}/")
    );

    let missing = app.get("/api/recipes/999/get-link/", None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn image_is_returned_as_stored() {
    let app = TestApp::new().await;
    let (_, token) = app.register("chef").await;
    let flour = app.seed_ingredient("flour", "g").await;
    let id = app.create_recipe(&token, "Bread", &[(flour, 1)]).await;

    let body = app.get(&format!("/api/recipes/{id}/"), None).await.json();
    assert_eq!(body["image"], PNG);
}
