#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Test support for `foodgram` integration tests.
//!
//! Builds the real router over a fresh in-memory database with migrations
//! applied, and drives it through `tower::ServiceExt::oneshot`.

#![allow(dead_code)] // Not every suite uses every helper

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::middleware::from_fn_with_state;
use foodgram::{Foodgram, FoodgramConfig};
use foodgram_auth::{AuthConfig, AuthState, JwtValidator, auth_optional, testing};
use foodgram_db::DbConfig;
use http_body_util::BodyExt;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;
use url::Url;

pub const SECRET: &str = "foodgram-test-secret";
pub const BASE: &str = "http://testserver/";

/// 1x1 transparent PNG.
pub const PNG: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

/// Fresh in-memory database with migrations applied.
pub async fn inmem_db() -> DatabaseConnection {
    let db = foodgram_db::connect(&DbConfig::in_memory())
        .await
        .expect("Failed to connect to in-memory database");
    Foodgram::migrate(&db).await.expect("Failed to run migrations");
    db
}

pub struct TestApp {
    pub db: DatabaseConnection,
    pub module: Foodgram,
    pub router: Router,
}

/// Response captured for assertions.
pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub bytes: Vec<u8>,
}

impl Reply {
    pub fn json(&self) -> Value {
        if self.bytes.is_empty() {
            return Value::Null;
        }
        serde_json::from_slice(&self.bytes).expect("response body is not JSON")
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.bytes.clone()).expect("response body is not UTF-8")
    }
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(FoodgramConfig::default()).await
    }

    pub async fn with_config(cfg: FoodgramConfig) -> Self {
        let db = inmem_db().await;
        let module = Foodgram::new(db.clone(), &cfg, Url::parse(BASE).unwrap());

        let auth_cfg = AuthConfig {
            jwt_secret: SecretString::from(SECRET),
            issuer: None,
            leeway_seconds: 0,
        };
        let state = AuthState::new(Arc::new(JwtValidator::new(&auth_cfg)));
        let router = module
            .router()
            .layer(from_fn_with_state(state, auth_optional));

        Self { db, module, router }
    }

    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Reply {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(t) = token {
            req = req.header("authorization", format!("Bearer {t}"));
        }
        let req = match body {
            Some(v) => req
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&v).unwrap()))
                .unwrap(),
            None => req.body(Body::empty()).unwrap(),
        };

        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes().to_vec();
        Reply {
            status,
            headers,
            bytes,
        }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Reply {
        self.call(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> Reply {
        self.call(Method::POST, uri, token, Some(body)).await
    }

    pub async fn post_empty(&self, uri: &str, token: Option<&str>) -> Reply {
        self.call(Method::POST, uri, token, None).await
    }

    pub async fn patch(&self, uri: &str, token: Option<&str>, body: Value) -> Reply {
        self.call(Method::PATCH, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> Reply {
        self.call(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> Reply {
        self.call(Method::DELETE, uri, token, None).await
    }

    /// Register through the API and return `(user_id, bearer token)`.
    pub async fn register(&self, username: &str) -> (i64, String) {
        let reply = self
            .post(
                "/api/users/",
                None,
                json!({
                    "email": format!("{username}@example.com"),
                    "username": username,
                    "first_name": "Test",
                    "last_name": "User",
                    "password": "s3cret-pass",
                }),
            )
            .await;
        assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.text());
        let id = reply.json()["id"].as_i64().unwrap();
        (id, testing::mint_token(SECRET, id))
    }

    /// Insert a catalog entry directly and return its id.
    pub async fn seed_ingredient(&self, name: &str, unit: &str) -> i64 {
        use foodgram::infra::storage::entity::ingredient::ActiveModel;

        let am = ActiveModel {
            name: Set(name.to_owned()),
            measurement_unit: Set(unit.to_owned()),
            search_name: Set(name.to_lowercase()),
            ..Default::default()
        };
        am.insert(&self.db).await.expect("Failed to seed ingredient").id
    }

    /// Create a recipe through the API and return its id.
    pub async fn create_recipe(&self, token: &str, name: &str, items: &[(i64, i64)]) -> i64 {
        let reply = self
            .post("/api/recipes/", Some(token), recipe_body(name, items))
            .await;
        assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.text());
        reply.json()["id"].as_i64().unwrap()
    }
}

pub fn recipe_body(name: &str, items: &[(i64, i64)]) -> Value {
    let ingredients: Vec<Value> = items
        .iter()
        .map(|(id, amount)| json!({ "id": id, "amount": amount }))
        .collect();
    json!({
        "ingredients": ingredients,
        "image": PNG,
        "name": name,
        "text": "Mix and cook.",
        "cooking_time": 15,
    })
}
