use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Type};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "message_role", rename_all = "lowercase")] // SQL value name
#[serde(rename_all = "lowercase")] // JSON value name
pub enum Role {
    User,
    Assistant,
}

/// Append-only conversation record. Retrieval orders by `created_at`, so a
/// chat always reads back in the order its messages were appended.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Message {
    pub id: Uuid,
    pub chat_id: Uuid,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub async fn append(
        pool: &PgPool,
        chat_id: Uuid,
        role: Role,
        content: &str,
    ) -> Result<Self, sqlx::Error> {
        let message = Message {
            chat_id,
            role,
            content: content.to_string(),
            ..Default::default()
        };

        sqlx::query(
            r#"
            INSERT INTO messages (id, chat_id, role, content, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(message.id)
        .bind(message.chat_id)
        .bind(message.role.clone())
        .bind(&message.content)
        .bind(message.created_at)
        .execute(pool)
        .await?;

        Ok(message)
    }

    /// All messages in the chat, oldest first.
    pub async fn list_for_chat(pool: &PgPool, chat_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Message>(
            r#"
            SELECT * FROM messages
            WHERE chat_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(chat_id)
        .fetch_all(pool)
        .await
    }
}

impl Default for Message {
    fn default() -> Self {
        Message {
            id: Uuid::new_v4(),
            chat_id: Uuid::nil(),
            role: Role::User,
            content: String::new(),
            created_at: Utc::now(),
        }
    }
}
