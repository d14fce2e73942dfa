//! Repository trait for reference data (languages and countries).

use crate::domain::entities::Language;
use crate::error::AppError;
use async_trait::async_trait;

/// Read-only access to platform reference data.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReferenceRepository: Send + Sync {
    /// Lists all languages in display order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn languages(&self) -> Result<Vec<Language>, AppError>;

    /// Finds a language by its code (e.g. `"en"`).
    async fn find_language(&self, code: &str) -> Result<Option<Language>, AppError>;

    /// Returns true if `iso_code` is a known country.
    async fn country_exists(&self, iso_code: &str) -> Result<bool, AppError>;
}
