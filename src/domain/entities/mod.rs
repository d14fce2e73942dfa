//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures; business rules live in
//! [`crate::application::services`].
//!
//! # Entity Types
//!
//! - [`MerchantStore`] - A storefront of the platform
//! - [`Language`] - A language content can be rendered in
//! - [`User`] - An administrative user bound to a store
//! - [`StoreConfiguration`] - Key/value settings such as social network links
//!
//! Creation and update inputs have their own types (`NewMerchantStore`,
//! `StoreUpdate`, `NewUser`).

pub mod configuration;
pub mod language;
pub mod store;
pub mod user;

pub use configuration::{StoreBrand, StoreConfiguration};
pub use language::Language;
pub use store::{
    Address, DEFAULT_STORE_CODE, MeasureUnit, MerchantStore, NewMerchantStore, StoreDetails,
    StoreUpdate, WeightUnit,
};
pub use user::{NewUser, Principal, User};
