//! Repository trait for platform users.

use crate::domain::entities::{NewUser, User};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for administrative users.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUserRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by name, including the code of the user's store.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_name(&self, user_name: &str) -> Result<Option<User>, AppError>;

    /// Creates a user attached to an existing store.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the user name is taken.
    /// Returns [`AppError::NotFound`] if the store does not exist.
    async fn create(&self, new_user: NewUser) -> Result<User, AppError>;

    /// Lists all users ordered by name.
    async fn list(&self) -> Result<Vec<User>, AppError>;
}
