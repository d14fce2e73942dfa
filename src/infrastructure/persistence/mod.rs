//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx.
//!
//! # Repositories
//!
//! - [`PgStoreRepository`] - Merchant stores, listings and store configuration
//! - [`PgReferenceRepository`] - Languages and countries
//! - [`PgUserRepository`] - Administrative users
//! - [`PgTokenRepository`] - API token storage and validation

pub mod pg_reference_repository;
pub mod pg_store_repository;
pub mod pg_token_repository;
pub mod pg_user_repository;

pub use pg_reference_repository::PgReferenceRepository;
pub use pg_store_repository::PgStoreRepository;
pub use pg_token_repository::PgTokenRepository;
pub use pg_user_repository::PgUserRepository;
