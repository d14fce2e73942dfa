//! PostgreSQL implementation of the store repository.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use std::sync::Arc;

use crate::domain::entities::{
    Address, MerchantStore, NewMerchantStore, StoreConfiguration, StoreDetails, StoreUpdate,
};
use crate::domain::repositories::{StoreCriteria, StorePage, StoreRepository};
use crate::error::AppError;

/// Configuration type of social network entries in `store_configurations`.
const SOCIAL_CONFIG_TYPE: &str = "SOCIAL";

/// Columns of a store read. The localized country name is joined on the
/// language bound as `$1`.
const STORE_SELECT: &str = r#"
    SELECT
        s.id, s.code, s.name, s.phone, s.email,
        s.address_line, s.city, s.postal_code, s.state_province, s.country_iso,
        cd.name AS country_name,
        dl.code AS default_language,
        ARRAY(
            SELECT l.code
            FROM store_languages sl
            JOIN languages l ON l.id = sl.language_id
            WHERE sl.store_id = s.id
            ORDER BY l.sort_order, l.code
        ) AS supported_languages,
        s.currency, s.currency_format_national, s.in_business_since,
        s.dimension, s.weight, s.retailer,
        p.code AS parent_code,
        s.use_cache, s.template, s.logo,
        s.created_at, s.updated_at, s.modified_by
    FROM merchant_stores s
    JOIN languages dl ON dl.id = s.default_language_id
    LEFT JOIN merchant_stores p ON p.id = s.parent_id
    LEFT JOIN country_descriptions cd
        ON cd.country_iso = s.country_iso AND cd.language_id = $1
"#;

#[derive(FromRow)]
struct StoreRow {
    id: i64,
    code: String,
    name: String,
    phone: Option<String>,
    email: String,
    address_line: Option<String>,
    city: Option<String>,
    postal_code: Option<String>,
    state_province: Option<String>,
    country_iso: String,
    country_name: Option<String>,
    default_language: String,
    supported_languages: Vec<String>,
    currency: String,
    currency_format_national: bool,
    in_business_since: Option<NaiveDate>,
    dimension: String,
    weight: String,
    retailer: bool,
    parent_code: Option<String>,
    use_cache: bool,
    template: Option<String>,
    logo: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    modified_by: Option<String>,
}

impl TryFrom<StoreRow> for MerchantStore {
    type Error = AppError;

    fn try_from(r: StoreRow) -> Result<Self, Self::Error> {
        let corrupt = |e: crate::domain::entities::store::UnknownUnit| {
            AppError::internal(
                "Corrupt store record",
                json!({ "code": r.code, "reason": e.to_string() }),
            )
        };
        let dimension = r.dimension.parse().map_err(corrupt)?;
        let weight = r.weight.parse().map_err(corrupt)?;

        Ok(MerchantStore {
            id: r.id,
            code: r.code,
            name: r.name,
            phone: r.phone,
            email: r.email,
            address: Address {
                line: r.address_line,
                city: r.city,
                postal_code: r.postal_code,
                state_province: r.state_province,
                country: r.country_iso,
                country_name: r.country_name,
            },
            default_language: r.default_language,
            supported_languages: r.supported_languages,
            currency: r.currency,
            currency_format_national: r.currency_format_national,
            in_business_since: r.in_business_since,
            dimension,
            weight,
            retailer: r.retailer,
            parent_code: r.parent_code,
            use_cache: r.use_cache,
            template: r.template,
            logo: r.logo,
            created_at: r.created_at,
            updated_at: r.updated_at,
            modified_by: r.modified_by,
        })
    }
}

#[derive(FromRow)]
struct ConfigurationRow {
    config_key: String,
    config_value: String,
    active: bool,
}

/// Escapes LIKE wildcards and wraps the value for a substring match.
fn contains_pattern(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Appends the WHERE clause for `criteria` to a query.
fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, criteria: &StoreCriteria) {
    let code = criteria.code.as_deref().map(contains_pattern);
    let name = criteria.name.as_deref().map(contains_pattern);

    match (code, name) {
        (Some(code), Some(name)) => {
            let joiner = if criteria.match_any { " OR " } else { " AND " };
            qb.push(" WHERE (s.code ILIKE ")
                .push_bind(code)
                .push(joiner)
                .push("s.name ILIKE ")
                .push_bind(name)
                .push(")");
        }
        (Some(code), None) => {
            qb.push(" WHERE s.code ILIKE ").push_bind(code);
        }
        (None, Some(name)) => {
            qb.push(" WHERE s.name ILIKE ").push_bind(name);
        }
        (None, None) => {}
    }
}

/// PostgreSQL repository for merchant stores.
///
/// Supported languages are kept in `store_languages` and rewritten in the
/// same transaction as the store row.
pub struct PgStoreRepository {
    pool: Arc<PgPool>,
}

impl PgStoreRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn insert_languages(
        tx: &mut sqlx::Transaction<'_, Postgres>,
        store_id: i64,
        details: &StoreDetails,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO store_languages (store_id, language_id)
            SELECT $1, id FROM languages WHERE code = ANY($2)
            "#,
        )
        .bind(store_id)
        .bind(details.supported_languages.as_slice())
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl StoreRepository for PgStoreRepository {
    async fn find_by_code(
        &self,
        code: &str,
        language_id: i32,
    ) -> Result<Option<MerchantStore>, AppError> {
        let sql = format!("{STORE_SELECT} WHERE s.code = $2");

        let row = sqlx::query_as::<_, StoreRow>(&sql)
            .bind(language_id)
            .bind(code)
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.map(MerchantStore::try_from).transpose()
    }

    async fn exists(&self, code: &str) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM merchant_stores WHERE code = $1)")
                .bind(code)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(exists)
    }

    async fn parent_code(&self, code: &str) -> Result<Option<String>, AppError> {
        let parent: Option<Option<String>> = sqlx::query_scalar(
            r#"
            SELECT p.code
            FROM merchant_stores s
            LEFT JOIN merchant_stores p ON p.id = s.parent_id
            WHERE s.code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(parent.flatten())
    }

    async fn create(&self, new_store: NewMerchantStore) -> Result<i64, AppError> {
        let d = &new_store.details;
        let mut tx = self.pool.begin().await?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO merchant_stores (
                code, name, phone, email,
                address_line, city, postal_code, state_province, country_iso,
                default_language_id, currency, currency_format_national, in_business_since,
                dimension, weight, retailer, parent_id, use_cache, template, logo
            )
            VALUES (
                $1, $2, $3, $4,
                $5, $6, $7, $8, $9,
                (SELECT id FROM languages WHERE code = $10), $11, $12, $13,
                $14, $15, $16, (SELECT id FROM merchant_stores WHERE code = $17), $18, $19, $20
            )
            RETURNING id
            "#,
        )
        .bind(&new_store.code)
        .bind(&d.name)
        .bind(&d.phone)
        .bind(&d.email)
        .bind(&d.address.line)
        .bind(&d.address.city)
        .bind(&d.address.postal_code)
        .bind(&d.address.state_province)
        .bind(&d.address.country)
        .bind(&d.default_language)
        .bind(&d.currency)
        .bind(d.currency_format_national)
        .bind(d.in_business_since)
        .bind(d.dimension.as_str())
        .bind(d.weight.as_str())
        .bind(d.retailer)
        .bind(&d.parent_code)
        .bind(d.use_cache)
        .bind(&d.template)
        .bind(&d.logo)
        .fetch_one(&mut *tx)
        .await?;

        Self::insert_languages(&mut tx, id, d).await?;

        tx.commit().await?;
        Ok(id)
    }

    async fn update(&self, code: &str, update: StoreUpdate) -> Result<bool, AppError> {
        let d = &update.details;
        let mut tx = self.pool.begin().await?;

        let id: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE merchant_stores SET
                name                     = $2,
                phone                    = $3,
                email                    = $4,
                address_line             = $5,
                city                     = $6,
                postal_code              = $7,
                state_province           = $8,
                country_iso              = $9,
                default_language_id      = (SELECT id FROM languages WHERE code = $10),
                currency                 = $11,
                currency_format_national = $12,
                in_business_since        = $13,
                dimension                = $14,
                weight                   = $15,
                retailer                 = $16,
                parent_id                = (SELECT id FROM merchant_stores WHERE code = $17),
                use_cache                = $18,
                template                 = $19,
                logo                     = $20,
                modified_by              = $21,
                updated_at               = NOW()
            WHERE code = $1
            RETURNING id
            "#,
        )
        .bind(code)
        .bind(&d.name)
        .bind(&d.phone)
        .bind(&d.email)
        .bind(&d.address.line)
        .bind(&d.address.city)
        .bind(&d.address.postal_code)
        .bind(&d.address.state_province)
        .bind(&d.address.country)
        .bind(&d.default_language)
        .bind(&d.currency)
        .bind(d.currency_format_national)
        .bind(d.in_business_since)
        .bind(d.dimension.as_str())
        .bind(d.weight.as_str())
        .bind(d.retailer)
        .bind(&d.parent_code)
        .bind(d.use_cache)
        .bind(&d.template)
        .bind(&d.logo)
        .bind(&update.modified_by)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(id) = id else {
            tx.rollback().await?;
            return Ok(false);
        };

        sqlx::query("DELETE FROM store_languages WHERE store_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        Self::insert_languages(&mut tx, id, d).await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn delete(&self, code: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM merchant_stores WHERE code = $1")
            .bind(code)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_children(&self, code: &str) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM merchant_stores s
            JOIN merchant_stores p ON p.id = s.parent_id
            WHERE p.code = $1
            "#,
        )
        .bind(code)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    async fn find_by_criteria(
        &self,
        criteria: StoreCriteria,
        language_id: i32,
    ) -> Result<StorePage, AppError> {
        let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM merchant_stores s");
        push_filters(&mut count_qb, &criteria);

        let total_count: i64 = count_qb
            .build_query_scalar()
            .fetch_one(self.pool.as_ref())
            .await?;

        // STORE_SELECT references $1, so the language must be the first bind.
        let mut qb = QueryBuilder::<Postgres>::new("WITH lang AS (SELECT ");
        qb.push_bind(language_id);
        qb.push("::INTEGER AS id) ");
        qb.push(STORE_SELECT.replace("$1", "(SELECT id FROM lang)"));
        push_filters(&mut qb, &criteria);
        qb.push(" ORDER BY ")
            .push(criteria.order_by.column())
            .push(" ")
            .push(criteria.direction.as_sql())
            .push(", s.id ASC");
        qb.push(" LIMIT ")
            .push_bind(criteria.max_count)
            .push(" OFFSET ")
            .push_bind(criteria.start);

        let rows = qb
            .build_query_as::<StoreRow>()
            .fetch_all(self.pool.as_ref())
            .await?;

        let items = rows
            .into_iter()
            .map(MerchantStore::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(StorePage { items, total_count })
    }

    async fn social_networks(&self, code: &str) -> Result<Vec<StoreConfiguration>, AppError> {
        let rows = sqlx::query_as::<_, ConfigurationRow>(
            r#"
            SELECT c.config_key, c.config_value, c.active
            FROM store_configurations c
            JOIN merchant_stores s ON s.id = c.store_id
            WHERE s.code = $1 AND c.config_type = $2
            ORDER BY c.config_key
            "#,
        )
        .bind(code)
        .bind(SOCIAL_CONFIG_TYPE)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| StoreConfiguration {
                key: r.config_key,
                value: r.config_value,
                active: r.active,
            })
            .collect())
    }

    async fn replace_social_networks(
        &self,
        code: &str,
        entries: Vec<StoreConfiguration>,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let store_id: Option<i64> =
            sqlx::query_scalar("SELECT id FROM merchant_stores WHERE code = $1 FOR UPDATE")
                .bind(code)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(store_id) = store_id else {
            tx.rollback().await?;
            return Err(AppError::not_found(
                "Store not found",
                json!({ "code": code }),
            ));
        };

        sqlx::query("DELETE FROM store_configurations WHERE store_id = $1 AND config_type = $2")
            .bind(store_id)
            .bind(SOCIAL_CONFIG_TYPE)
            .execute(&mut *tx)
            .await?;

        for entry in &entries {
            sqlx::query(
                r#"
                INSERT INTO store_configurations (store_id, config_type, config_key, config_value, active)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(store_id)
            .bind(SOCIAL_CONFIG_TYPE)
            .bind(&entry.key)
            .bind(&entry.value)
            .bind(entry.active)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
