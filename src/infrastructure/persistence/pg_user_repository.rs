//! PostgreSQL implementation of the user repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{NewUser, User};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;

#[derive(FromRow)]
struct UserRow {
    id: i64,
    user_name: String,
    store_code: String,
    store_retailer: bool,
    superadmin: bool,
    active: bool,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        User {
            id: r.id,
            user_name: r.user_name,
            store_code: r.store_code,
            store_retailer: r.store_retailer,
            superadmin: r.superadmin,
            active: r.active,
            created_at: r.created_at,
        }
    }
}

const USER_SELECT: &str = r#"
    SELECT u.id, u.user_name, s.code AS store_code, s.retailer AS store_retailer,
           u.superadmin, u.active, u.created_at
    FROM users u
    JOIN merchant_stores s ON s.id = u.store_id
"#;

/// PostgreSQL repository for administrative users.
pub struct PgUserRepository {
    pool: Arc<PgPool>,
}

impl PgUserRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_name(&self, user_name: &str) -> Result<Option<User>, AppError> {
        let sql = format!("{USER_SELECT} WHERE u.user_name = $1");

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(user_name)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(User::from))
    }

    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let id: Option<i64> = sqlx::query_scalar(
            r#"
            INSERT INTO users (user_name, store_id, superadmin)
            SELECT $1, s.id, $3 FROM merchant_stores s WHERE s.code = $2
            RETURNING id
            "#,
        )
        .bind(&new_user.user_name)
        .bind(&new_user.store_code)
        .bind(new_user.superadmin)
        .fetch_optional(self.pool.as_ref())
        .await?;

        if id.is_none() {
            return Err(AppError::not_found(
                "Store not found",
                json!({ "code": new_user.store_code }),
            ));
        }

        self.find_by_name(&new_user.user_name).await?.ok_or_else(|| {
            AppError::internal(
                "User vanished after insert",
                json!({ "user_name": new_user.user_name }),
            )
        })
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        let sql = format!("{USER_SELECT} ORDER BY u.user_name");

        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }
}
