#![allow(dead_code)]

use async_trait::async_trait;
use axum::{Router, middleware};
use axum_test::TestServer;
use chrono::{NaiveDate, Utc};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use merchant_store_api::api;
use merchant_store_api::api::middleware::auth;
use merchant_store_api::application::services::auth_service::hash_token_with_secret;
use merchant_store_api::domain::entities::{
    Address, MeasureUnit, NewUser, StoreConfiguration, StoreUpdate, User, WeightUnit,
};
use merchant_store_api::domain::repositories::{
    ApiToken, ReferenceRepository, StoreCriteria, StorePage, StoreRepository, StoreSortField,
    SortDirection, TokenRepository, UserRepository,
};
use merchant_store_api::infrastructure::cache::{CacheError, CacheResult, CacheService};
use merchant_store_api::prelude::*;

pub const SIGNING_SECRET: &str = "test-signing-secret";

/// Superadmin attached to the DEFAULT store.
pub const ADMIN_TOKEN: &str = "admin-token";
/// User of the `acme` store.
pub const OWNER_TOKEN: &str = "owner-token";
/// User of the `mall` retailer store, parent of `shop`.
pub const MALL_TOKEN: &str = "mall-token";
/// Superadmin whose account is disabled.
pub const INACTIVE_TOKEN: &str = "inactive-token";

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

// ─── Reference data ──────────────────────────────────────────────────────────

pub struct InMemoryReferences {
    languages: Vec<Language>,
    countries: Vec<&'static str>,
}

impl Default for InMemoryReferences {
    fn default() -> Self {
        Self {
            languages: vec![
                Language::new(1, "en"),
                Language::new(2, "fr"),
                Language::new(3, "es"),
            ],
            countries: vec!["CA", "US", "FR"],
        }
    }
}

#[async_trait]
impl ReferenceRepository for InMemoryReferences {
    async fn languages(&self) -> Result<Vec<Language>, AppError> {
        Ok(self.languages.clone())
    }

    async fn find_language(&self, code: &str) -> Result<Option<Language>, AppError> {
        Ok(self.languages.iter().find(|l| l.code == code).cloned())
    }

    async fn country_exists(&self, iso_code: &str) -> Result<bool, AppError> {
        Ok(self.countries.contains(&iso_code))
    }
}

fn country_name(iso: &str, language_id: i32) -> Option<String> {
    let name = match (iso, language_id) {
        ("CA", _) => "Canada",
        ("US", 2) => "États-Unis",
        ("US", 3) => "Estados Unidos",
        ("US", _) => "United States",
        ("FR", _) => "France",
        _ => return None,
    };
    Some(name.to_string())
}

// ─── Stores ──────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryStores {
    stores: Mutex<Vec<MerchantStore>>,
    social: Mutex<HashMap<String, Vec<StoreConfiguration>>>,
    next_id: AtomicI64,
}

impl InMemoryStores {
    pub fn insert(&self, store: MerchantStore) {
        self.next_id.fetch_max(store.id, Ordering::SeqCst);
        self.stores.lock().unwrap().push(store);
    }

    pub fn get(&self, code: &str) -> Option<MerchantStore> {
        self.stores
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.code == code)
            .cloned()
    }

    pub fn set_social(&self, code: &str, entries: Vec<StoreConfiguration>) {
        self.social.lock().unwrap().insert(code.to_string(), entries);
    }

    fn localized(mut store: MerchantStore, language_id: i32) -> MerchantStore {
        store.address.country_name = country_name(&store.address.country, language_id);
        store
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait]
impl StoreRepository for InMemoryStores {
    async fn find_by_code(
        &self,
        code: &str,
        language_id: i32,
    ) -> Result<Option<MerchantStore>, AppError> {
        Ok(self.get(code).map(|s| Self::localized(s, language_id)))
    }

    async fn exists(&self, code: &str) -> Result<bool, AppError> {
        Ok(self.get(code).is_some())
    }

    async fn parent_code(&self, code: &str) -> Result<Option<String>, AppError> {
        Ok(self.get(code).and_then(|s| s.parent_code))
    }

    async fn create(&self, new_store: NewMerchantStore) -> Result<i64, AppError> {
        if self.get(&new_store.code).is_some() {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "merchant_stores_code_key" }),
            ));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let d = new_store.details;
        let now = Utc::now();

        self.stores.lock().unwrap().push(MerchantStore {
            id,
            code: new_store.code,
            name: d.name,
            phone: d.phone,
            email: d.email,
            address: d.address,
            default_language: d.default_language,
            supported_languages: d.supported_languages,
            currency: d.currency,
            currency_format_national: d.currency_format_national,
            in_business_since: d.in_business_since,
            dimension: d.dimension,
            weight: d.weight,
            retailer: d.retailer,
            parent_code: d.parent_code,
            use_cache: d.use_cache,
            template: d.template,
            logo: d.logo,
            created_at: now,
            updated_at: now,
            modified_by: None,
        });

        Ok(id)
    }

    async fn update(&self, code: &str, update: StoreUpdate) -> Result<bool, AppError> {
        let mut stores = self.stores.lock().unwrap();
        let Some(store) = stores.iter_mut().find(|s| s.code == code) else {
            return Ok(false);
        };

        let d = update.details;
        store.name = d.name;
        store.phone = d.phone;
        store.email = d.email;
        store.address = d.address;
        store.default_language = d.default_language;
        store.supported_languages = d.supported_languages;
        store.currency = d.currency;
        store.currency_format_national = d.currency_format_national;
        store.in_business_since = d.in_business_since;
        store.dimension = d.dimension;
        store.weight = d.weight;
        store.retailer = d.retailer;
        store.parent_code = d.parent_code;
        store.use_cache = d.use_cache;
        store.template = d.template;
        store.logo = d.logo;
        store.modified_by = Some(update.modified_by);
        store.updated_at = Utc::now();

        Ok(true)
    }

    async fn delete(&self, code: &str) -> Result<bool, AppError> {
        let mut stores = self.stores.lock().unwrap();
        let before = stores.len();
        stores.retain(|s| s.code != code);
        self.social.lock().unwrap().remove(code);
        Ok(stores.len() < before)
    }

    async fn count_children(&self, code: &str) -> Result<i64, AppError> {
        Ok(self
            .stores
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.parent_code.as_deref() == Some(code))
            .count() as i64)
    }

    async fn find_by_criteria(
        &self,
        criteria: StoreCriteria,
        language_id: i32,
    ) -> Result<StorePage, AppError> {
        let mut matching: Vec<MerchantStore> = self
            .stores
            .lock()
            .unwrap()
            .iter()
            .filter(|s| {
                let code = criteria
                    .code
                    .as_deref()
                    .map(|c| contains_ignore_case(&s.code, c));
                let name = criteria
                    .name
                    .as_deref()
                    .map(|n| contains_ignore_case(&s.name, n));
                match (code, name) {
                    (None, None) => true,
                    (Some(c), None) => c,
                    (None, Some(n)) => n,
                    (Some(c), Some(n)) if criteria.match_any => c || n,
                    (Some(c), Some(n)) => c && n,
                }
            })
            .cloned()
            .collect();

        matching.sort_by(|a, b| {
            let ordering = match criteria.order_by {
                StoreSortField::Id => a.id.cmp(&b.id),
                StoreSortField::Code => a.code.cmp(&b.code),
                StoreSortField::Name => a.name.cmp(&b.name),
                StoreSortField::AuditUser => a.modified_by.cmp(&b.modified_by),
                StoreSortField::InBusinessSince => a.in_business_since.cmp(&b.in_business_since),
            };
            let ordering = match criteria.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            };
            ordering.then(a.id.cmp(&b.id))
        });

        let total_count = matching.len() as i64;
        let items = matching
            .into_iter()
            .skip(criteria.start as usize)
            .take(criteria.max_count as usize)
            .map(|s| Self::localized(s, language_id))
            .collect();

        Ok(StorePage { items, total_count })
    }

    async fn social_networks(&self, code: &str) -> Result<Vec<StoreConfiguration>, AppError> {
        let mut entries = self
            .social
            .lock()
            .unwrap()
            .get(code)
            .cloned()
            .unwrap_or_default();
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(entries)
    }

    async fn replace_social_networks(
        &self,
        code: &str,
        entries: Vec<StoreConfiguration>,
    ) -> Result<(), AppError> {
        if self.get(code).is_none() {
            return Err(AppError::not_found("Store not found", json!({ "code": code })));
        }
        self.set_social(code, entries);
        Ok(())
    }
}

// ─── Users and tokens ────────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryUsers {
    users: Mutex<Vec<User>>,
}

impl InMemoryUsers {
    pub fn insert(&self, user: User) {
        self.users.lock().unwrap().push(user);
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn find_by_name(&self, user_name: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.user_name == user_name)
            .cloned())
    }

    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut users = self.users.lock().unwrap();
        let user = User {
            id: users.len() as i64 + 1,
            user_name: new_user.user_name,
            store_code: new_user.store_code,
            store_retailer: false,
            superadmin: new_user.superadmin,
            active: true,
            created_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        Ok(self.users.lock().unwrap().clone())
    }
}

/// Tokens keyed by hash; resolution honours the owner's `active` flag.
pub struct InMemoryTokens {
    tokens: Mutex<HashMap<String, ApiToken>>,
    users: Arc<InMemoryUsers>,
}

impl InMemoryTokens {
    pub fn new(users: Arc<InMemoryUsers>) -> Self {
        Self {
            tokens: Mutex::new(HashMap::new()),
            users,
        }
    }

    pub fn issue(&self, raw_token: &str, user_name: &str) {
        let hash = hash_token_with_secret(SIGNING_SECRET, raw_token);
        let mut tokens = self.tokens.lock().unwrap();
        let id = tokens.len() as i64 + 1;
        tokens.insert(
            hash.clone(),
            ApiToken {
                id,
                name: format!("{user_name} token"),
                user_name: user_name.to_string(),
                token_hash: hash,
                created_at: Utc::now(),
                last_used_at: None,
                revoked_at: None,
            },
        );
    }

    pub fn revoke(&self, raw_token: &str) {
        let hash = hash_token_with_secret(SIGNING_SECRET, raw_token);
        if let Some(token) = self.tokens.lock().unwrap().get_mut(&hash) {
            token.revoked_at = Some(Utc::now());
        }
    }

    pub fn last_used(&self, raw_token: &str) -> Option<chrono::DateTime<Utc>> {
        let hash = hash_token_with_secret(SIGNING_SECRET, raw_token);
        self.tokens
            .lock()
            .unwrap()
            .get(&hash)
            .and_then(|t| t.last_used_at)
    }
}

#[async_trait]
impl TokenRepository for InMemoryTokens {
    async fn find_principal(&self, token_hash: &str) -> Result<Option<Principal>, AppError> {
        let user_name = {
            let tokens = self.tokens.lock().unwrap();
            match tokens.get(token_hash) {
                Some(t) if t.revoked_at.is_none() => t.user_name.clone(),
                _ => return Ok(None),
            }
        };

        Ok(self
            .users
            .find_by_name(&user_name)
            .await?
            .filter(|u| u.active)
            .map(|u| Principal {
                user_id: u.id,
                user_name: u.user_name,
            }))
    }

    async fn update_last_used(&self, token_hash: &str) -> Result<(), AppError> {
        if let Some(token) = self.tokens.lock().unwrap().get_mut(token_hash) {
            token.last_used_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn create_token(
        &self,
        name: &str,
        token_hash: &str,
        _user_id: i64,
    ) -> Result<ApiToken, AppError> {
        Err(AppError::internal(
            "not supported in tests",
            json!({ "name": name, "hash": token_hash }),
        ))
    }

    async fn list_tokens(&self) -> Result<Vec<ApiToken>, AppError> {
        Ok(self.tokens.lock().unwrap().values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ApiToken>, AppError> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .values()
            .find(|t| t.id == id)
            .cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<ApiToken>, AppError> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .values()
            .find(|t| t.name == name)
            .cloned())
    }

    async fn revoke_token(&self, id: i64) -> Result<(), AppError> {
        if let Some(token) = self
            .tokens
            .lock()
            .unwrap()
            .values_mut()
            .find(|t| t.id == id)
        {
            token.revoked_at = Some(Utc::now());
        }
        Ok(())
    }
}

// ─── Cache ───────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
    generations: Mutex<HashMap<String, u64>>,
}

impl MemoryCache {
    pub fn put(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().unwrap().contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }

    /// Yields until the fire-and-forget write of `key` has landed.
    pub async fn wait_for(&self, key: &str) -> bool {
        for _ in 0..100 {
            if self.contains(key) {
                return true;
            }
            tokio::task::yield_now().await;
        }
        false
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str, _ttl_seconds: Option<u64>) -> CacheResult<()> {
        self.put(key, value);
        Ok(())
    }

    async fn invalidate(&self, keys: &[String]) -> CacheResult<()> {
        let mut entries = self.entries.lock().unwrap();
        for key in keys {
            entries.remove(key);
        }
        Ok(())
    }

    async fn generation(&self, key: &str) -> CacheResult<u64> {
        Ok(self
            .generations
            .lock()
            .unwrap()
            .get(key)
            .copied()
            .unwrap_or_default())
    }

    async fn bump_generation(&self, key: &str) -> CacheResult<u64> {
        let mut generations = self.generations.lock().unwrap();
        let generation = generations.entry(key.to_string()).or_default();
        *generation += 1;
        Ok(*generation)
    }

    async fn health_check(&self) -> bool {
        true
    }
}

/// Cache whose backend is always down.
pub struct FailingCache;

#[async_trait]
impl CacheService for FailingCache {
    async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
        Err(CacheError::ConnectionError("connection refused".to_string()))
    }

    async fn set(&self, _key: &str, _value: &str, _ttl_seconds: Option<u64>) -> CacheResult<()> {
        Err(CacheError::ConnectionError("connection refused".to_string()))
    }

    async fn invalidate(&self, _keys: &[String]) -> CacheResult<()> {
        Err(CacheError::ConnectionError("connection refused".to_string()))
    }

    async fn generation(&self, _key: &str) -> CacheResult<u64> {
        Err(CacheError::ConnectionError("connection refused".to_string()))
    }

    async fn bump_generation(&self, _key: &str) -> CacheResult<u64> {
        Err(CacheError::ConnectionError("connection refused".to_string()))
    }

    async fn health_check(&self) -> bool {
        false
    }
}

// ─── Fixtures ────────────────────────────────────────────────────────────────

pub fn store(id: i64, code: &str, name: &str) -> MerchantStore {
    let now = Utc::now();
    MerchantStore {
        id,
        code: code.to_string(),
        name: name.to_string(),
        phone: None,
        email: format!("contact@{}.test", code.to_lowercase()),
        address: Address {
            city: Some("Montreal".to_string()),
            country: "CA".to_string(),
            ..Default::default()
        },
        default_language: "en".to_string(),
        supported_languages: vec!["en".to_string()],
        currency: "CAD".to_string(),
        currency_format_national: false,
        in_business_since: None,
        dimension: MeasureUnit::Centimeter,
        weight: WeightUnit::Kilogram,
        retailer: false,
        parent_code: None,
        use_cache: false,
        template: None,
        logo: None,
        created_at: now,
        updated_at: now,
        modified_by: None,
    }
}

fn user(id: i64, name: &str, store_code: &str, retailer: bool, superadmin: bool) -> User {
    User {
        id,
        user_name: name.to_string(),
        store_code: store_code.to_string(),
        store_retailer: retailer,
        superadmin,
        active: true,
        created_at: Utc::now(),
    }
}

/// In-memory backing stores of a test application.
pub struct TestContext {
    pub state: AppState,
    pub stores: Arc<InMemoryStores>,
    pub tokens: Arc<InMemoryTokens>,
    pub cache: Arc<MemoryCache>,
}

/// Seeds:
///
/// - `DEFAULT` retailer store
/// - `mall` retailer store (US) with child `shop`
/// - `acme` store supporting en and fr, cached, with a logo and one social network
/// - users `admin` (superadmin), `owner` (acme), `mall_admin` (mall), `ghost` (inactive)
pub fn create_test_context() -> TestContext {
    let cache = Arc::new(MemoryCache::default());
    let (state, stores, tokens) = build_state("en", cache.clone());

    TestContext {
        state,
        stores,
        tokens,
        cache,
    }
}

/// Seeded state with a custom default language and cache.
pub fn create_test_state_with(default_language: &str, cache: Arc<dyn CacheService>) -> AppState {
    build_state(default_language, cache).0
}

fn build_state(
    default_language: &str,
    cache: Arc<dyn CacheService>,
) -> (AppState, Arc<InMemoryStores>, Arc<InMemoryTokens>) {
    let stores = Arc::new(InMemoryStores::default());

    let mut default_store = store(1, "DEFAULT", "Default store");
    default_store.retailer = true;
    default_store.supported_languages = vec!["en".into(), "fr".into(), "es".into()];
    stores.insert(default_store);

    let mut mall = store(2, "mall", "Grand Mall");
    mall.retailer = true;
    mall.address.country = "US".to_string();
    mall.in_business_since = NaiveDate::from_ymd_opt(2001, 5, 20);
    stores.insert(mall);

    let mut shop = store(3, "shop", "Corner Shop");
    shop.parent_code = Some("mall".to_string());
    shop.in_business_since = NaiveDate::from_ymd_opt(2015, 1, 1);
    stores.insert(shop);

    let mut acme = store(4, "acme", "Acme Supplies");
    acme.supported_languages = vec!["en".into(), "fr".into()];
    acme.use_cache = true;
    acme.logo = Some("https://cdn.acme.test/logo.png".to_string());
    acme.modified_by = Some("owner".to_string());
    stores.insert(acme);

    stores.set_social(
        "acme",
        vec![StoreConfiguration {
            key: "facebook".to_string(),
            value: "https://facebook.com/acme".to_string(),
            active: true,
        }],
    );

    let users = Arc::new(InMemoryUsers::default());
    users.insert(user(1, "admin", "DEFAULT", true, true));
    users.insert(user(2, "owner", "acme", false, false));
    users.insert(user(3, "mall_admin", "mall", true, false));
    let mut ghost = user(4, "ghost", "DEFAULT", true, true);
    ghost.active = false;
    users.insert(ghost);

    let tokens = Arc::new(InMemoryTokens::new(users.clone()));
    tokens.issue(ADMIN_TOKEN, "admin");
    tokens.issue(OWNER_TOKEN, "owner");
    tokens.issue(MALL_TOKEN, "mall_admin");
    tokens.issue(INACTIVE_TOKEN, "ghost");

    let state = AppState::new(
        Repositories {
            stores: stores.clone(),
            references: Arc::new(InMemoryReferences::default()),
            users,
            tokens: tokens.clone(),
        },
        cache,
        SIGNING_SECRET.to_string(),
        default_language.to_string(),
    );

    (state, stores, tokens)
}

/// Builds the API router without rate limiting (no peer address in tests).
pub fn test_router(state: AppState) -> Router {
    let private = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    Router::new()
        .nest(
            "/api/v1",
            Router::new().merge(private).merge(api::routes::public_routes()),
        )
        .with_state(state)
}

pub fn make_server(ctx: &TestContext) -> TestServer {
    TestServer::new(test_router(ctx.state.clone())).unwrap()
}

/// A valid creation payload for store `code`.
pub fn store_payload(code: &str) -> serde_json::Value {
    json!({
        "code": code,
        "name": "New Store",
        "email": "hello@newstore.test",
        "address": {
            "address": "1 Main St",
            "city": "Quebec",
            "postalCode": "G1A 0A1",
            "stateProvince": "QC",
            "country": "CA"
        },
        "defaultLanguage": "en",
        "supportedLanguages": ["fr"],
        "currency": "CAD",
        "inBusinessSince": "2020-02-29",
        "dimension": "IN",
        "weight": "LB"
    })
}
