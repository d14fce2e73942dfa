//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract for data operations; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated
//! via `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`StoreRepository`] - Merchant store CRUD, listing and configuration
//! - [`ReferenceRepository`] - Languages and countries
//! - [`UserRepository`] - Administrative users
//! - [`TokenRepository`] - API token authentication

pub mod reference_repository;
pub mod store_repository;
pub mod token_repository;
pub mod user_repository;

pub use reference_repository::ReferenceRepository;
pub use store_repository::{
    SortDirection, StoreCriteria, StorePage, StoreRepository, StoreSortField,
};
pub use token_repository::{ApiToken, TokenRepository};
pub use user_repository::UserRepository;

#[cfg(test)]
pub use reference_repository::MockReferenceRepository;
#[cfg(test)]
pub use store_repository::MockStoreRepository;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
