//! Repository trait for merchant stores and the criteria used to list them.

use crate::domain::entities::{MerchantStore, NewMerchantStore, StoreConfiguration, StoreUpdate};
use crate::error::AppError;
use async_trait::async_trait;

/// Sortable store attributes, addressed by their API field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreSortField {
    #[default]
    Id,
    Code,
    Name,
    AuditUser,
    InBusinessSince,
}

impl StoreSortField {
    /// Maps an API field name (as it appears in `ReadableMerchantStore`)
    /// to a sort field. Returns `None` for fields that cannot be sorted on.
    pub fn from_api_field(field: &str) -> Option<Self> {
        match field {
            "id" => Some(Self::Id),
            "code" => Some(Self::Code),
            "name" => Some(Self::Name),
            "readableAudit.user" => Some(Self::AuditUser),
            "inBusinessSince" => Some(Self::InBusinessSince),
            _ => None,
        }
    }

    /// Storage column backing this field.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Id => "s.id",
            Self::Code => "s.code",
            Self::Name => "s.name",
            Self::AuditUser => "s.modified_by",
            Self::InBusinessSince => "s.in_business_since",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("asc") {
            Some(Self::Asc)
        } else if value.eq_ignore_ascii_case("desc") {
            Some(Self::Desc)
        } else {
            None
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Filter, paging and ordering for store listings.
///
/// `code` and `name` are case-insensitive substring filters. They are
/// combined with AND unless `match_any` is set, in which case a store
/// matching either filter is returned.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreCriteria {
    pub start: i64,
    pub max_count: i64,
    pub code: Option<String>,
    pub name: Option<String>,
    pub match_any: bool,
    pub order_by: StoreSortField,
    pub direction: SortDirection,
}

impl StoreCriteria {
    /// Creates criteria with paging only.
    pub fn new(start: i64, max_count: i64) -> Self {
        Self {
            start,
            max_count,
            code: None,
            name: None,
            match_any: false,
            order_by: StoreSortField::default(),
            direction: SortDirection::default(),
        }
    }

    pub fn with_code(mut self, code: Option<String>) -> Self {
        self.code = code;
        self
    }

    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    /// Searches both code and name for `search`.
    pub fn with_search(mut self, search: String) -> Self {
        self.code = Some(search.clone());
        self.name = Some(search);
        self.match_any = true;
        self
    }

    pub fn ordered_by(mut self, field: StoreSortField, direction: SortDirection) -> Self {
        self.order_by = field;
        self.direction = direction;
        self
    }
}

/// One page of a store listing.
#[derive(Debug, Clone)]
pub struct StorePage {
    pub items: Vec<MerchantStore>,
    /// Number of stores matching the criteria across all pages.
    pub total_count: i64,
}

/// Repository interface for merchant stores.
///
/// Reads take a `language_id` so that localized attributes (the address
/// country name) come back in the requested language.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgStoreRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoreRepository: Send + Sync {
    /// Finds a store by its code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_code(
        &self,
        code: &str,
        language_id: i32,
    ) -> Result<Option<MerchantStore>, AppError>;

    /// Returns true if a store with this code exists.
    async fn exists(&self, code: &str) -> Result<bool, AppError>;

    /// Returns the parent code of a store.
    ///
    /// `Ok(None)` when the store does not exist or has no parent.
    async fn parent_code(&self, code: &str) -> Result<Option<String>, AppError>;

    /// Creates a store with its supported languages and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the code is already taken.
    /// Returns [`AppError::Validation`] if a referenced language, country or
    /// parent store does not exist.
    async fn create(&self, new_store: NewMerchantStore) -> Result<i64, AppError>;

    /// Replaces the writable attributes of a store.
    ///
    /// Returns `Ok(false)` if no store has this code.
    async fn update(&self, code: &str, update: StoreUpdate) -> Result<bool, AppError>;

    /// Deletes a store and its dependent rows.
    ///
    /// Returns `Ok(false)` if no store has this code.
    async fn delete(&self, code: &str) -> Result<bool, AppError>;

    /// Counts stores whose parent is `code`.
    async fn count_children(&self, code: &str) -> Result<i64, AppError>;

    /// Lists stores matching `criteria`.
    async fn find_by_criteria(
        &self,
        criteria: StoreCriteria,
        language_id: i32,
    ) -> Result<StorePage, AppError>;

    /// Social network configuration entries of a store, ordered by key.
    async fn social_networks(&self, code: &str) -> Result<Vec<StoreConfiguration>, AppError>;

    /// Replaces all social network entries of a store.
    async fn replace_social_networks(
        &self,
        code: &str,
        entries: Vec<StoreConfiguration>,
    ) -> Result<(), AppError>;
}
