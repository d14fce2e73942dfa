//! Business logic services for the application layer.

pub mod auth_service;
pub mod language_service;
pub mod store_service;
pub mod user_service;

pub use auth_service::AuthService;
pub use language_service::LanguageService;
pub use store_service::StoreService;
pub use user_service::UserService;
