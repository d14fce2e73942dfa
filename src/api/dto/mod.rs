//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation. Wire names are camelCase.

pub mod health;
pub mod marketing;
pub mod store;
pub mod store_list;
