use std::sync::Arc;

use actix_web::{post, web};
use tracing::debug;

use crate::errors::ApiError;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::message::Role;
use crate::models::{Chat, Message};
use crate::types::{SendMessageRequest, SendMessageResponse};
use crate::AppState;

/// Relays one user message through the completion API and persists both sides
/// of the exchange. The user turn is stored before the relay call, so a relay
/// failure leaves it in place with no assistant reply.
#[utoipa::path(
    post,
    context_path = "/api/chat",
    request_body = SendMessageRequest,
    responses(
        (status = 200, description = "Assistant reply persisted", body = SendMessageResponse),
        (status = 403, description = "Chat belongs to another user"),
        (status = 404, description = "Chat not found"),
        (status = 500, description = "Relay failure"),
    ),
    security(("bearer_token" = [])),
    tag = "relay"
)]
#[post("/message")]
pub async fn send_message(
    app_state: web::Data<Arc<AppState>>,
    authenticated_user: AuthenticatedUser,
    web::Json(request): web::Json<SendMessageRequest>,
) -> Result<web::Json<SendMessageResponse>, ApiError> {
    let chat = Chat::get_by_id(&app_state.pool, request.chat_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Chat not found".to_string()))?;

    if !chat.is_owned_by(authenticated_user.user_id) {
        return Err(ApiError::Forbidden("Access denied".to_string()));
    }

    Message::append(&app_state.pool, chat.id, Role::User, &request.message).await?;

    let region = request.region.as_deref().unwrap_or(&chat.region);
    let instruction = app_state.prompts.instruction_for(region);
    debug!("relaying message for chat {} (region {})", chat.id, region);

    let reply = app_state.relay.complete(instruction, &request.message).await?;

    let assistant_message =
        Message::append(&app_state.pool, chat.id, Role::Assistant, &reply).await?;

    Ok(web::Json(SendMessageResponse { assistant_message }))
}
