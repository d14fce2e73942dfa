//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
pub mod marketing;
pub mod store;
pub mod store_list;

pub use health::health_handler;
pub use marketing::{store_marketing_handler, update_store_marketing_handler};
pub use store::{
    create_store_handler, delete_store_handler, get_store_handler, store_exists_handler,
    update_store_handler,
};
pub use store_list::store_list_handler;
