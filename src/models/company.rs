use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor, PgPool};
use utoipa::ToSchema;
use uuid::Uuid;

/// Free-tier bounds from the published plan table. Enforcement happens
/// elsewhere; the row only records them.
const FREE_USER_LIMIT: i32 = 10;
const FREE_MESSAGE_LIMIT: i32 = 1000;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Company {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub plan: String,
    pub user_limit: i32,
    pub message_limit: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Company {
    pub fn new(user_id: Uuid, name: &str) -> Self {
        Company {
            user_id,
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub async fn create<'e, E: PgExecutor<'e>>(
        executor: E,
        user_id: Uuid,
        name: &str,
    ) -> Result<Self, sqlx::Error> {
        let company = Company::new(user_id, name);

        sqlx::query(
            r#"
            INSERT INTO companies (id, user_id, name, plan, user_limit, message_limit, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(company.id)
        .bind(company.user_id)
        .bind(&company.name)
        .bind(&company.plan)
        .bind(company.user_limit)
        .bind(company.message_limit)
        .bind(company.created_at)
        .bind(company.updated_at)
        .execute(executor)
        .await?;

        Ok(company)
    }

    pub async fn get_by_user_id(pool: &PgPool, user_id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Company>(
            r#"
            SELECT * FROM companies
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }
}

impl Default for Company {
    fn default() -> Self {
        Company {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            name: String::new(),
            plan: "free".to_string(),
            user_limit: FREE_USER_LIMIT,
            message_limit: FREE_MESSAGE_LIMIT,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}
