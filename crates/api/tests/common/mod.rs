//! Shared harness for the HTTP integration tests.
//!
//! Every test gets a fresh router, built with the same middleware stack
//! production uses, over either an in-memory store or a per-test PostgreSQL
//! database handed out by `sqlx::test`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use devcamper_api::auth::jwt::JwtConfig;
use devcamper_api::auth::password::hash_password;
use devcamper_api::config::ServerConfig;
use devcamper_api::router::build_app_router;
use devcamper_api::state::AppState;
use devcamper_core::query::DefaultOrder;
use devcamper_db::models::user::CreateUser;
use devcamper_db::store::{MemoryStore, PgStore, Store, UserStore};
use sqlx::PgPool;

pub const PASSWORD: &str = "123456";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        default_order: DefaultOrder::OldestFirst,
        cookie_secure: false,
        reset_token_expiry_mins: 10,
        public_url: "http://localhost:5000".to_string(),
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            expiry_mins: 60,
        },
    }
}

/// A router plus a handle on the store behind it, for seeding and
/// inspection.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<dyn Store>,
}

pub fn build_test_app() -> TestApp {
    app_over(Arc::new(MemoryStore::new()))
}

pub fn build_pg_app(pool: PgPool) -> TestApp {
    app_over(Arc::new(PgStore::new(pool)))
}

fn app_over(store: Arc<dyn Store>) -> TestApp {
    let config = test_config();
    let state = AppState {
        store: store.clone(),
        config: Arc::new(config.clone()),
        mailer: None,
    };
    TestApp {
        router: build_app_router(state, &config),
        store,
    }
}

impl TestApp {
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Method::GET, uri, None, None).await
    }

    pub async fn get_auth(&self, uri: &str, token: &str) -> Response<Body> {
        self.send(Method::GET, uri, Some(token), None).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> Response<Body> {
        self.send(Method::POST, uri, None, Some(body)).await
    }

    pub async fn post_json_auth(&self, uri: &str, token: &str, body: Value) -> Response<Body> {
        self.send(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put_json_auth(&self, uri: &str, token: &str, body: Value) -> Response<Body> {
        self.send(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete_auth(&self, uri: &str, token: &str) -> Response<Body> {
        self.send(Method::DELETE, uri, Some(token), None).await
    }

    /// Register through the API (`user` or `publisher`) and return the token.
    pub async fn register(&self, email: &str, role: &str) -> String {
        let body = json!({
            "name": email.split('@').next().unwrap(),
            "email": email,
            "password": PASSWORD,
            "role": role,
        });
        let response = self.post_json("/api/v1/auth/register", body).await;
        assert_eq!(response.status(), StatusCode::CREATED, "register {email}");
        body_json(response).await["token"].as_str().unwrap().to_string()
    }

    pub async fn login(&self, email: &str, password: &str) -> Response<Body> {
        self.post_json(
            "/api/v1/auth/login",
            json!({ "email": email, "password": password }),
        )
        .await
    }

    /// Seed an admin directly in the store (admins cannot self-register)
    /// and log in.
    pub async fn admin_token(&self, email: &str) -> String {
        self.store
            .create_user(&CreateUser {
                name: "Admin".to_string(),
                email: email.to_string(),
                role: "admin".to_string(),
                password_hash: hash_password(PASSWORD).unwrap(),
            })
            .await
            .unwrap();
        let response = self.login(email, PASSWORD).await;
        assert_eq!(response.status(), StatusCode::OK);
        body_json(response).await["token"].as_str().unwrap().to_string()
    }

    /// Create a bootcamp through the API and return its id.
    pub async fn create_bootcamp(&self, token: &str, name: &str) -> i64 {
        let response = self
            .post_json_auth("/api/v1/bootcamps", token, bootcamp_body(name))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED, "create bootcamp {name}");
        body_json(response).await["data"]["id"].as_i64().unwrap()
    }

    pub async fn create_course(&self, token: &str, bootcamp_id: i64, tuition: f64) -> i64 {
        let response = self
            .post_json_auth(
                &format!("/api/v1/bootcamps/{bootcamp_id}/courses"),
                token,
                course_body(&format!("Course {tuition}"), tuition),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await["data"]["id"].as_i64().unwrap()
    }

    pub async fn create_review(&self, token: &str, bootcamp_id: i64, rating: i32) -> i64 {
        let response = self
            .post_json_auth(
                &format!("/api/v1/bootcamps/{bootcamp_id}/reviews"),
                token,
                json!({ "title": "Review", "text": "Some text", "rating": rating }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await["data"]["id"].as_i64().unwrap()
    }

    pub async fn bootcamp(&self, id: i64) -> Value {
        let response = self.get(&format!("/api/v1/bootcamps/{id}")).await;
        assert_eq!(response.status(), StatusCode::OK);
        body_json(response).await["data"].clone()
    }
}

pub fn bootcamp_body(name: &str) -> Value {
    json!({
        "name": name,
        "description": format!("{name} teaches full stack development"),
        "website": "https://example.com",
        "phone": "(111) 111-1111",
        "email": "enroll@example.com",
        "address": "233 Bay State Rd Boston MA 02215",
        "careers": ["Web Development", "UI/UX"],
        "housing": true,
    })
}

pub fn course_body(title: &str, tuition: f64) -> Value {
    json!({
        "title": title,
        "description": "Learn things",
        "weeks": "8",
        "tuition": tuition,
        "minimumSkill": "beginner",
    })
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
