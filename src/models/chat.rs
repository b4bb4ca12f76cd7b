use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use tracing::debug;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Chat {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub region: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Chat {
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        title: &str,
        region: &str,
    ) -> Result<Self, sqlx::Error> {
        let chat = Chat {
            user_id,
            title: title.to_string(),
            region: region.to_string(),
            ..Default::default()
        };

        sqlx::query(
            r#"
            INSERT INTO chats (id, user_id, title, region, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(chat.id)
        .bind(chat.user_id)
        .bind(&chat.title)
        .bind(&chat.region)
        .bind(chat.created_at)
        .bind(chat.updated_at)
        .execute(pool)
        .await?;

        debug!("chat created: {}", chat.id);
        Ok(chat)
    }

    pub async fn get_by_id(pool: &PgPool, chat_id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Chat>(
            r#"
            SELECT * FROM chats
            WHERE id = $1
            "#,
        )
        .bind(chat_id)
        .fetch_optional(pool)
        .await
    }

    /// All chats owned by the user, newest first.
    pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Chat>(
            r#"
            SELECT * FROM chats
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

impl Default for Chat {
    fn default() -> Self {
        Chat {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            title: String::new(),
            region: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}
