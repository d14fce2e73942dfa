//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! validation, and business rules. Services consume repository traits and provide
//! a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::store_service::StoreService`] - Store reads, writes and listings
//! - [`services::user_service::UserService`] - Store-level authorization of users
//! - [`services::language_service::LanguageService`] - Language resolution
//! - [`services::auth_service::AuthService`] - API token authentication

pub mod services;
