//! ChatEch backend: multi-tenant chat proxy in front of an OpenAI-compatible
//! completion API. Conversation history is persisted per user in Postgres and
//! every inbound message is relayed with a region-specific system instruction.

pub mod auth;
pub mod config;
pub mod errors;
pub mod middleware;
pub mod models;
pub mod prompts;
pub mod relay;
pub mod routes;
pub mod types;

use std::sync::Arc;

use actix_web::web;
use sqlx::PgPool;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::auth::JwtKeys;
use crate::middleware::auth::Authentication;
use crate::prompts::PromptCatalog;
use crate::relay::Relay;

/// Shared per-process state, constructed once in `main` (or a test harness)
/// and injected into every handler. The relay sits behind a trait object so
/// tests can swap in a canned implementation.
pub struct AppState {
    pub pool: PgPool,
    pub jwt_keys: JwtKeys,
    pub prompts: PromptCatalog,
    pub relay: Arc<dyn Relay>,
}

/// Registers the full API surface on a service config. Shared between `main`
/// and the test harness so both run the exact same routing table.
pub fn configure_api(cfg: &mut web::ServiceConfig, state: Arc<AppState>) {
    let authentication = Authentication {
        jwt_keys: state.jwt_keys.clone(),
    };

    cfg.app_data(web::Data::new(state))
        .service(
            web::scope("/api/auth")
                .service(routes::auth::signup)
                .service(routes::auth::login),
        )
        .service(routes::health::health)
        .service(
            web::scope("/api")
                .wrap(authentication)
                .service(
                    web::scope("/chats")
                        .service(routes::chat::create_chat)
                        .service(routes::chat::list_chats)
                        .service(routes::chat::list_chat_messages),
                )
                .service(web::scope("/chat").service(routes::message::send_message))
                .service(routes::profile::get_profile),
        );
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_token",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::auth::signup,
        routes::auth::login,
        routes::chat::create_chat,
        routes::chat::list_chats,
        routes::chat::list_chat_messages,
        routes::message::send_message,
        routes::profile::get_profile,
        routes::health::health,
    ),
    components(schemas(
        types::SignupRequest,
        types::LoginRequest,
        types::AuthResponse,
        types::UserInfo,
        types::CreateChatRequest,
        types::SendMessageRequest,
        types::SendMessageResponse,
        types::ProfileResponse,
        types::HealthResponse,
        models::Chat,
        models::Company,
        models::Message,
        models::message::Role,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Signup and login"),
        (name = "chats", description = "Chat threads and their messages"),
        (name = "relay", description = "Message relay to the completion API"),
        (name = "account", description = "Profile and liveness"),
    )
)]
pub struct ApiDoc;
