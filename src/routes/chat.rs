use std::sync::Arc;

use actix_web::{get, post, web};
use uuid::Uuid;

use crate::errors::ApiError;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{Chat, Message};
use crate::types::CreateChatRequest;
use crate::AppState;

#[utoipa::path(
    post,
    context_path = "/api/chats",
    request_body = CreateChatRequest,
    responses((status = 200, description = "Chat created", body = Chat)),
    security(("bearer_token" = [])),
    tag = "chats"
)]
#[post("")]
pub async fn create_chat(
    app_state: web::Data<Arc<AppState>>,
    authenticated_user: AuthenticatedUser,
    web::Json(request): web::Json<CreateChatRequest>,
) -> Result<web::Json<Chat>, ApiError> {
    let chat = Chat::create(
        &app_state.pool,
        authenticated_user.user_id,
        &request.title,
        &request.region,
    )
    .await?;

    Ok(web::Json(chat))
}

#[utoipa::path(
    get,
    context_path = "/api/chats",
    responses((status = 200, description = "The caller's chats, newest first", body = [Chat])),
    security(("bearer_token" = [])),
    tag = "chats"
)]
#[get("")]
pub async fn list_chats(
    app_state: web::Data<Arc<AppState>>,
    authenticated_user: AuthenticatedUser,
) -> Result<web::Json<Vec<Chat>>, ApiError> {
    let chats = Chat::list_for_user(&app_state.pool, authenticated_user.user_id).await?;
    Ok(web::Json(chats))
}

#[utoipa::path(
    get,
    context_path = "/api/chats",
    params(("chat_id" = Uuid, Path, description = "Chat to read")),
    responses(
        (status = 200, description = "Messages in the chat, oldest first", body = [Message]),
        (status = 403, description = "Chat belongs to another user"),
        (status = 404, description = "Chat not found"),
    ),
    security(("bearer_token" = [])),
    tag = "chats"
)]
#[get("/{chat_id}/messages")]
pub async fn list_chat_messages(
    app_state: web::Data<Arc<AppState>>,
    authenticated_user: AuthenticatedUser,
    chat_id: web::Path<Uuid>,
) -> Result<web::Json<Vec<Message>>, ApiError> {
    let chat = Chat::get_by_id(&app_state.pool, chat_id.into_inner())
        .await?
        .ok_or_else(|| ApiError::NotFound("Chat not found".to_string()))?;

    if !chat.is_owned_by(authenticated_user.user_id) {
        return Err(ApiError::Forbidden("Access denied".to_string()));
    }

    let messages = Message::list_for_chat(&app_state.pool, chat.id).await?;
    Ok(web::Json(messages))
}
