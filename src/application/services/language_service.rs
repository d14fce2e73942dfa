//! Language resolution service.

use crate::domain::entities::Language;
use crate::domain::repositories::ReferenceRepository;
use crate::error::AppError;
use serde_json::json;
use std::sync::Arc;

/// Resolves the language a response is rendered in.
pub struct LanguageService<R: ReferenceRepository + ?Sized> {
    repository: Arc<R>,
    default_code: String,
}

impl<R: ReferenceRepository + ?Sized> LanguageService<R> {
    /// Creates a new language service.
    ///
    /// `default_code` is the platform default language (`DEFAULT_LANGUAGE`).
    pub fn new(repository: Arc<R>, default_code: String) -> Self {
        Self {
            repository,
            default_code,
        }
    }

    /// Returns the platform default language.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the configured default language is
    /// not present in the reference data.
    pub async fn default_language(&self) -> Result<Language, AppError> {
        self.repository
            .find_language(&self.default_code)
            .await?
            .ok_or_else(|| {
                AppError::internal(
                    "Default language is not configured",
                    json!({ "language": self.default_code }),
                )
            })
    }

    /// Returns the language named by `lang`, or the default language when
    /// `lang` is absent, blank, or unknown.
    pub async fn service_language(&self, lang: Option<&str>) -> Result<Language, AppError> {
        if let Some(code) = lang.map(str::trim).filter(|c| !c.is_empty())
            && let Some(language) = self.repository.find_language(code).await?
        {
            return Ok(language);
        }

        self.default_language().await
    }

    /// Lists all known languages.
    pub async fn languages(&self) -> Result<Vec<Language>, AppError> {
        self.repository.languages().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockReferenceRepository;

    fn service(mock: MockReferenceRepository) -> LanguageService<MockReferenceRepository> {
        LanguageService::new(Arc::new(mock), "en".to_string())
    }

    #[tokio::test]
    async fn test_service_language_known_code() {
        let mut mock = MockReferenceRepository::new();
        mock.expect_find_language()
            .withf(|code| code == "fr")
            .times(1)
            .returning(|_| Ok(Some(Language::new(2, "fr"))));

        let language = service(mock).service_language(Some("fr")).await.unwrap();

        assert_eq!(language.code, "fr");
    }

    #[tokio::test]
    async fn test_service_language_unknown_falls_back() {
        let mut mock = MockReferenceRepository::new();
        mock.expect_find_language()
            .withf(|code| code == "xx")
            .times(1)
            .returning(|_| Ok(None));
        mock.expect_find_language()
            .withf(|code| code == "en")
            .times(1)
            .returning(|_| Ok(Some(Language::new(1, "en"))));

        let language = service(mock).service_language(Some("xx")).await.unwrap();

        assert_eq!(language.code, "en");
    }

    #[tokio::test]
    async fn test_service_language_blank_uses_default() {
        let mut mock = MockReferenceRepository::new();
        mock.expect_find_language()
            .withf(|code| code == "en")
            .times(1)
            .returning(|_| Ok(Some(Language::new(1, "en"))));

        let language = service(mock).service_language(Some("  ")).await.unwrap();

        assert_eq!(language.id, 1);
    }

    #[tokio::test]
    async fn test_missing_default_language_is_internal() {
        let mut mock = MockReferenceRepository::new();
        mock.expect_find_language().returning(|_| Ok(None));

        let result = service(mock).default_language().await;

        assert!(matches!(result.unwrap_err(), AppError::Internal { .. }));
    }
}
