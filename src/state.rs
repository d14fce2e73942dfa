//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{AuthService, LanguageService, StoreService, UserService};
use crate::domain::repositories::{
    ReferenceRepository, StoreRepository, TokenRepository, UserRepository,
};
use crate::infrastructure::cache::CacheService;

pub type AppStoreService = StoreService<dyn StoreRepository, dyn ReferenceRepository>;
pub type AppUserService = UserService<dyn UserRepository, dyn StoreRepository>;
pub type AppLanguageService = LanguageService<dyn ReferenceRepository>;
pub type AppAuthService = AuthService<dyn TokenRepository>;

/// Services and the cache, behind `Arc` so the state is cheap to clone.
///
/// Services are built over trait objects, so tests can swap the PostgreSQL
/// repositories for in-memory ones.
#[derive(Clone)]
pub struct AppState {
    pub store_service: Arc<AppStoreService>,
    pub user_service: Arc<AppUserService>,
    pub language_service: Arc<AppLanguageService>,
    pub auth_service: Arc<AppAuthService>,
    pub cache: Arc<dyn CacheService>,
}

/// Repositories the application state is assembled from.
pub struct Repositories {
    pub stores: Arc<dyn StoreRepository>,
    pub references: Arc<dyn ReferenceRepository>,
    pub users: Arc<dyn UserRepository>,
    pub tokens: Arc<dyn TokenRepository>,
}

impl AppState {
    /// Wires the services over `repositories`.
    ///
    /// # Arguments
    ///
    /// - `token_signing_secret` - HMAC key for API tokens
    /// - `default_language` - language code used when a request names none
    pub fn new(
        repositories: Repositories,
        cache: Arc<dyn CacheService>,
        token_signing_secret: String,
        default_language: String,
    ) -> Self {
        let Repositories {
            stores,
            references,
            users,
            tokens,
        } = repositories;

        Self {
            store_service: Arc::new(StoreService::new(stores.clone(), references.clone())),
            user_service: Arc::new(UserService::new(users, stores)),
            language_service: Arc::new(LanguageService::new(references, default_language)),
            auth_service: Arc::new(AuthService::new(tokens, token_signing_secret)),
            cache,
        }
    }
}
