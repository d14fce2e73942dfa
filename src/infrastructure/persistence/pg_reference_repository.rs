//! PostgreSQL implementation of the reference data repository.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::Language;
use crate::domain::repositories::ReferenceRepository;
use crate::error::AppError;

#[derive(FromRow)]
struct LanguageRow {
    id: i32,
    code: String,
}

impl From<LanguageRow> for Language {
    fn from(r: LanguageRow) -> Self {
        Language::new(r.id, r.code)
    }
}

/// PostgreSQL repository for languages and countries.
pub struct PgReferenceRepository {
    pool: Arc<PgPool>,
}

impl PgReferenceRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReferenceRepository for PgReferenceRepository {
    async fn languages(&self) -> Result<Vec<Language>, AppError> {
        let rows = sqlx::query_as::<_, LanguageRow>(
            "SELECT id, code FROM languages ORDER BY sort_order, code",
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Language::from).collect())
    }

    async fn find_language(&self, code: &str) -> Result<Option<Language>, AppError> {
        let row = sqlx::query_as::<_, LanguageRow>("SELECT id, code FROM languages WHERE code = $1")
            .bind(code)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Language::from))
    }

    async fn country_exists(&self, iso_code: &str) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM countries WHERE iso_code = $1)")
                .bind(iso_code)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(exists)
    }
}
