use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct CreateChatRequest {
    pub title: String,
    pub region: String,
}
