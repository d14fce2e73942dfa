//! Merchant store business logic.

use crate::domain::entities::{
    Language, MerchantStore, NewMerchantStore, StoreBrand, StoreConfiguration, StoreDetails,
    StoreUpdate,
};
use crate::domain::repositories::{ReferenceRepository, StoreCriteria, StorePage, StoreRepository};
use crate::error::AppError;
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;

/// Service for reading and maintaining merchant stores.
///
/// Enforces the rules that span more than one row: referenced languages,
/// country and parent store must exist, a store cannot be its own ancestor,
/// the `DEFAULT` store and stores that own children cannot be deleted.
pub struct StoreService<S: StoreRepository + ?Sized, R: ReferenceRepository + ?Sized> {
    stores: Arc<S>,
    references: Arc<R>,
}

impl<S: StoreRepository + ?Sized, R: ReferenceRepository + ?Sized> StoreService<S, R> {
    pub fn new(stores: Arc<S>, references: Arc<R>) -> Self {
        Self { stores, references }
    }

    /// Returns the store identified by `code`, localized for `language`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no store has this code.
    pub async fn get_by_code(
        &self,
        code: &str,
        language: &Language,
    ) -> Result<MerchantStore, AppError> {
        self.stores
            .find_by_code(code, language.id)
            .await?
            .ok_or_else(|| store_not_found(code))
    }

    /// Returns true if a store with this code exists.
    pub async fn exists(&self, code: &str) -> Result<bool, AppError> {
        self.stores.exists(code).await
    }

    /// Creates a store and returns it rendered in `language`.
    ///
    /// # Errors
    ///
    /// - [`AppError::Conflict`] if the code is already taken
    /// - [`AppError::Validation`] if a referenced language, country or parent
    ///   store is unknown
    pub async fn create(
        &self,
        mut new_store: NewMerchantStore,
        language: &Language,
    ) -> Result<MerchantStore, AppError> {
        if self.stores.exists(&new_store.code).await? {
            return Err(AppError::conflict(
                "Store code already exists",
                json!({ "code": new_store.code }),
            ));
        }

        new_store.details.normalize_languages();
        self.validate_references(&new_store.code, &new_store.details, language)
            .await?;

        let code = new_store.code.clone();
        let id = self.stores.create(new_store).await?;

        tracing::info!(store = %code, id, "Store created");
        metrics::counter!("merchant_stores_created_total").increment(1);

        self.get_by_code(&code, language).await
    }

    /// Replaces the writable attributes of a store and returns it rendered
    /// in `language`.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the store does not exist
    /// - [`AppError::Validation`] if the store would become its own parent,
    ///   a reference is unknown, or a store with children stops being a
    ///   retailer
    pub async fn update(
        &self,
        code: &str,
        mut update: StoreUpdate,
        language: &Language,
    ) -> Result<MerchantStore, AppError> {
        let current = self.get_by_code(code, language).await?;

        update.details.normalize_languages();
        self.validate_references(code, &update.details, language)
            .await?;

        if current.retailer
            && !update.details.retailer
            && self.stores.count_children(code).await? > 0
        {
            return Err(AppError::bad_request(
                "Store has child stores and must remain a retailer",
                json!({ "code": code }),
            ));
        }

        if !self.stores.update(code, update).await? {
            return Err(store_not_found(code));
        }

        tracing::info!(store = %code, "Store updated");
        metrics::counter!("merchant_stores_updated_total").increment(1);

        self.get_by_code(code, language).await
    }

    /// Deletes a store.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the store does not exist
    /// - [`AppError::Validation`] for the `DEFAULT` store or a store that is
    ///   the parent of other stores
    pub async fn delete(&self, code: &str) -> Result<(), AppError> {
        if !self.stores.exists(code).await? {
            return Err(store_not_found(code));
        }

        if code == crate::domain::entities::DEFAULT_STORE_CODE {
            return Err(AppError::bad_request(
                "The default store cannot be deleted",
                json!({ "code": code }),
            ));
        }

        let children = self.stores.count_children(code).await?;
        if children > 0 {
            return Err(AppError::bad_request(
                "Store is the parent of other stores",
                json!({ "code": code, "children": children }),
            ));
        }

        if !self.stores.delete(code).await? {
            return Err(store_not_found(code));
        }

        tracing::info!(store = %code, "Store deleted");
        metrics::counter!("merchant_stores_deleted_total").increment(1);

        Ok(())
    }

    /// Lists stores matching `criteria`, localized for `language`.
    pub async fn get_by_criteria(
        &self,
        criteria: StoreCriteria,
        language: &Language,
    ) -> Result<StorePage, AppError> {
        self.stores.find_by_criteria(criteria, language.id).await
    }

    /// Returns the store logo and social network entries.
    pub async fn brand(&self, code: &str, language: &Language) -> Result<StoreBrand, AppError> {
        let store = self.get_by_code(code, language).await?;
        let social_networks = self.stores.social_networks(code).await?;

        Ok(StoreBrand {
            store_code: store.code,
            logo: store.logo,
            social_networks,
        })
    }

    /// Replaces the social network entries of a store and returns the new
    /// brand.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if a key appears twice and
    /// [`AppError::NotFound`] if the store does not exist.
    pub async fn replace_social_networks(
        &self,
        code: &str,
        entries: Vec<StoreConfiguration>,
        language: &Language,
    ) -> Result<StoreBrand, AppError> {
        let mut seen = std::collections::HashSet::new();
        if let Some(duplicate) = entries.iter().find(|e| !seen.insert(e.key.as_str())) {
            return Err(AppError::bad_request(
                "Duplicate social network key",
                json!({ "key": duplicate.key }),
            ));
        }

        if !self.stores.exists(code).await? {
            return Err(store_not_found(code));
        }

        self.stores.replace_social_networks(code, entries).await?;

        tracing::debug!(store = %code, "Social networks replaced");

        self.brand(code, language).await
    }

    async fn validate_references(
        &self,
        code: &str,
        details: &StoreDetails,
        language: &Language,
    ) -> Result<(), AppError> {
        for lang in &details.supported_languages {
            if self.references.find_language(lang).await?.is_none() {
                return Err(AppError::bad_request(
                    "Unknown language",
                    json!({ "language": lang }),
                ));
            }
        }

        if !self
            .references
            .country_exists(&details.address.country)
            .await?
        {
            return Err(AppError::bad_request(
                "Unknown country",
                json!({ "country": details.address.country }),
            ));
        }

        if let Some(parent) = details.parent_code.as_deref() {
            if parent == code {
                return Err(AppError::bad_request(
                    "A store cannot be its own parent",
                    json!({ "code": code }),
                ));
            }

            let parent_store = self
                .stores
                .find_by_code(parent, language.id)
                .await?
                .ok_or_else(|| {
                    AppError::bad_request("Parent store not found", json!({ "parent": parent }))
                })?;

            if !parent_store.retailer {
                return Err(AppError::bad_request(
                    "Parent store is not a retailer",
                    json!({ "parent": parent }),
                ));
            }

            self.reject_parent_cycle(code, parent_store.parent_code).await?;
        }

        Ok(())
    }

    /// Fails when `code` is an ancestor of its proposed parent.
    async fn reject_parent_cycle(
        &self,
        code: &str,
        mut ancestor: Option<String>,
    ) -> Result<(), AppError> {
        let mut visited = HashSet::new();

        while let Some(current) = ancestor {
            if current == code {
                return Err(AppError::bad_request(
                    "Parent hierarchy would form a cycle",
                    json!({ "code": code }),
                ));
            }
            if !visited.insert(current.clone()) {
                break;
            }
            ancestor = self.stores.parent_code(&current).await?;
        }

        Ok(())
    }
}

fn store_not_found(code: &str) -> AppError {
    AppError::not_found("Store not found", json!({ "code": code }))
}
