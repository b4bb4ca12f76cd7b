//! End-to-end scenarios against a live Postgres. Set `DATABASE_URL` and run
//! with `cargo test -- --ignored`; the default suite skips these so it stays
//! hermetic. The relay is always mocked, nothing leaves the process.

use std::sync::{Arc, Mutex};

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{header, StatusCode};
use actix_web::{test, App, Error};
use async_trait::async_trait;
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use chatech::auth::JwtKeys;
use chatech::configure_api;
use chatech::prompts::{PromptCatalog, Prompts};
use chatech::relay::{Relay, RelayError};
use chatech::AppState;

struct CannedRelay(&'static str);

#[async_trait]
impl Relay for CannedRelay {
    async fn complete(&self, _instruction: &str, _message: &str) -> Result<String, RelayError> {
        Ok(self.0.to_string())
    }
}

#[derive(Default)]
struct RecordingRelay {
    instructions: Mutex<Vec<String>>,
}

#[async_trait]
impl Relay for RecordingRelay {
    async fn complete(&self, instruction: &str, _message: &str) -> Result<String, RelayError> {
        self.instructions
            .lock()
            .unwrap()
            .push(instruction.to_string());
        Ok("ack".to_string())
    }
}

struct FailingRelay;

#[async_trait]
impl Relay for FailingRelay {
    async fn complete(&self, _instruction: &str, _message: &str) -> Result<String, RelayError> {
        Err(RelayError::Transport("connection refused".to_string()))
    }
}

async fn test_pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for API tests");
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("failed to connect to Postgres");
    sqlx::migrate!().run(&pool).await.expect("migrations failed");
    pool
}

fn test_state(pool: PgPool, relay: Arc<dyn Relay>) -> Arc<AppState> {
    Arc::new(AppState {
        pool,
        jwt_keys: JwtKeys::new(b"api-test-secret"),
        prompts: PromptCatalog::new(),
        relay,
    })
}

macro_rules! test_app {
    ($relay:expr) => {{
        let state = test_state(test_pool().await, $relay);
        test::init_service(App::new().configure(|cfg| configure_api(cfg, state.clone()))).await
    }};
}

fn unique_email() -> String {
    format!("{}@x.com", Uuid::new_v4().simple())
}

async fn post_json<S, B>(
    app: &S,
    uri: &str,
    token: Option<&str>,
    body: Value,
) -> ServiceResponse<B>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let mut req = test::TestRequest::post().uri(uri).set_json(&body);
    if let Some(token) = token {
        req = req.insert_header((header::AUTHORIZATION, format!("Bearer {token}")));
    }
    test::call_service(app, req.to_request()).await
}

async fn get_with_token<S, B>(app: &S, uri: &str, token: &str) -> ServiceResponse<B>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let req = test::TestRequest::get()
        .uri(uri)
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .to_request();
    test::call_service(app, req).await
}

/// Signs up a fresh account and returns its bearer token.
async fn signup<S, B>(app: &S, email: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let resp = post_json(
        app,
        "/api/auth/signup",
        None,
        json!({ "email": email, "password": "p", "companyName": "Acme" }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    body["token"].as_str().expect("signup token").to_string()
}

async fn create_chat<S, B>(app: &S, token: &str, title: &str, region: &str) -> Uuid
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let resp = post_json(
        app,
        "/api/chats",
        Some(token),
        json!({ "title": title, "region": region }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    body["id"]
        .as_str()
        .and_then(|id| Uuid::parse_str(id).ok())
        .expect("chat id")
}

#[actix_web::test]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn signup_rejects_duplicate_email() {
    let app = test_app!(Arc::new(CannedRelay("ok")));
    let email = unique_email();

    let resp = post_json(
        &app,
        "/api/auth/signup",
        None,
        json!({ "email": email, "password": "p", "companyName": "Acme" }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["token"].is_string());
    assert_eq!(body["user"]["email"], json!(email));
    assert!(body["user"]["id"].is_string());

    let resp = post_json(
        &app,
        "/api/auth/signup",
        None,
        json!({ "email": email, "password": "p", "companyName": "Acme" }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "error": "Email already exists" }));
}

#[actix_web::test]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn login_with_wrong_password_is_unauthorized() {
    let app = test_app!(Arc::new(CannedRelay("ok")));
    let email = unique_email();
    signup(&app, &email).await;

    let resp = post_json(
        &app,
        "/api/auth/login",
        None,
        json!({ "email": email, "password": "wrong" }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "error": "Invalid credentials" }));
}

#[actix_web::test]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn repeated_login_keeps_working() {
    let app = test_app!(Arc::new(CannedRelay("ok")));
    let email = unique_email();
    signup(&app, &email).await;

    for _ in 0..2 {
        let resp = post_json(
            &app,
            "/api/auth/login",
            None,
            json!({ "email": email, "password": "p" }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["token"].is_string());
    }
}

#[actix_web::test]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn message_roundtrip_persists_both_turns_in_order() {
    let app = test_app!(Arc::new(CannedRelay("Hola de vuelta")));
    let token = signup(&app, &unique_email()).await;
    let chat_id = create_chat(&app, &token, "T", "mexico").await;

    let resp = post_json(
        &app,
        "/api/chat/message",
        Some(&token),
        json!({ "chatId": chat_id, "message": "Hola", "region": "mexico" }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["assistantMessage"]["content"], json!("Hola de vuelta"));
    assert_eq!(body["assistantMessage"]["role"], json!("assistant"));

    let resp = get_with_token(&app, &format!("/api/chats/{chat_id}/messages"), &token).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let messages: Value = test::read_body_json(resp).await;
    let messages = messages.as_array().expect("message list");

    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], json!("user"));
    assert_eq!(messages[0]["content"], json!("Hola"));
    assert_eq!(messages[1]["role"], json!("assistant"));
    assert_eq!(messages[1]["content"], json!("Hola de vuelta"));
}

#[actix_web::test]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn unsupported_region_uses_the_default_instruction() {
    let recorder = Arc::new(RecordingRelay::default());
    let app = test_app!(recorder.clone());
    let token = signup(&app, &unique_email()).await;
    let chat_id = create_chat(&app, &token, "T", "brasil").await;

    let resp = post_json(
        &app,
        "/api/chat/message",
        Some(&token),
        json!({ "chatId": chat_id, "message": "Oi", "region": "brasil" }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let instructions = recorder.instructions.lock().unwrap();
    assert_eq!(instructions.as_slice(), [Prompts::ARGENTINA]);
}

#[actix_web::test]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn failed_relay_returns_500_and_persists_no_assistant_reply() {
    let app = test_app!(Arc::new(FailingRelay));
    let token = signup(&app, &unique_email()).await;
    let chat_id = create_chat(&app, &token, "T", "mexico").await;

    let resp = post_json(
        &app,
        "/api/chat/message",
        Some(&token),
        json!({ "chatId": chat_id, "message": "Hola" }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["error"],
        json!("completion request failed: connection refused")
    );

    let resp = get_with_token(&app, &format!("/api/chats/{chat_id}/messages"), &token).await;
    let messages: Value = test::read_body_json(resp).await;
    let messages = messages.as_array().expect("message list");

    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["role"], json!("user"));
}

#[actix_web::test]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn cross_tenant_access_is_forbidden() {
    let app = test_app!(Arc::new(CannedRelay("ok")));
    let owner_token = signup(&app, &unique_email()).await;
    let other_token = signup(&app, &unique_email()).await;
    let chat_id = create_chat(&app, &owner_token, "Private", "usa").await;

    let resp = get_with_token(&app, &format!("/api/chats/{chat_id}/messages"), &other_token).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "error": "Access denied" }));

    let resp = post_json(
        &app,
        "/api/chat/message",
        Some(&other_token),
        json!({ "chatId": chat_id, "message": "mine now" }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn chats_list_newest_first() {
    let app = test_app!(Arc::new(CannedRelay("ok")));
    let token = signup(&app, &unique_email()).await;
    let first = create_chat(&app, &token, "First", "usa").await;
    let second = create_chat(&app, &token, "Second", "usa").await;

    let resp = get_with_token(&app, "/api/chats", &token).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let chats: Value = test::read_body_json(resp).await;
    let chats = chats.as_array().expect("chat list");

    assert_eq!(chats.len(), 2);
    assert_eq!(chats[0]["id"], json!(second));
    assert_eq!(chats[1]["id"], json!(first));
}

#[actix_web::test]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn profile_returns_user_and_company() {
    let app = test_app!(Arc::new(CannedRelay("ok")));
    let email = unique_email();
    let token = signup(&app, &email).await;

    let resp = get_with_token(&app, "/api/profile", &token).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;

    assert_eq!(body["user"]["email"], json!(email));
    assert_eq!(body["company"]["name"], json!("Acme"));
    assert_eq!(body["company"]["plan"], json!("free"));
}
