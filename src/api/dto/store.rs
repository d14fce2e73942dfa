//! DTOs for merchant store endpoints.

use crate::domain::entities::{
    Address, Language, MeasureUnit, MerchantStore, NewMerchantStore, StoreDetails, StoreUpdate,
    WeightUnit,
};
use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::{Validate, ValidationError};

static STORE_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

static COUNTRY_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z]{2}$").unwrap());

static CURRENCY_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z]{3}$").unwrap());

/// Store codes that collide with fixed routes under `/private/store`.
pub const RESERVED_STORE_CODES: &[&str] = &["unique"];

fn validate_not_reserved(code: &str) -> Result<(), ValidationError> {
    if RESERVED_STORE_CODES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(code))
    {
        return Err(ValidationError::new("reserved_code"));
    }
    Ok(())
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Store creation and full update payload.
///
/// On update the path code is authoritative; a body `code` that differs from
/// it is rejected by the handler.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PersistableMerchantStore {
    #[validate(
        length(min = 2, max = 100),
        regex(path = "*STORE_CODE_REGEX"),
        custom(function = "validate_not_reserved")
    )]
    pub code: String,

    #[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
    pub name: String,

    #[validate(length(max = 50))]
    pub phone: Option<String>,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(nested)]
    pub address: PersistableAddress,

    #[validate(length(min = 2, max = 5))]
    pub default_language: String,

    #[serde(default)]
    pub supported_languages: Vec<String>,

    #[validate(regex(path = "*CURRENCY_REGEX", message = "Currency must be an ISO 4217 code"))]
    pub currency: String,

    #[serde(default)]
    pub currency_format_national: bool,

    /// `YYYY-MM-DD`.
    pub in_business_since: Option<NaiveDate>,

    #[serde(default)]
    pub dimension: MeasureUnit,

    #[serde(default)]
    pub weight: WeightUnit,

    #[serde(default)]
    pub retailer: bool,

    /// Code of the parent (retailer) store.
    pub parent: Option<String>,

    #[serde(default)]
    pub use_cache: bool,

    #[validate(length(max = 100))]
    pub template: Option<String>,

    #[validate(url(message = "Invalid logo URL"))]
    pub logo: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PersistableAddress {
    #[validate(length(max = 255))]
    pub address: Option<String>,

    #[validate(length(max = 100))]
    pub city: Option<String>,

    #[validate(length(max = 20))]
    pub postal_code: Option<String>,

    #[validate(length(max = 100))]
    pub state_province: Option<String>,

    #[validate(regex(
        path = "*COUNTRY_REGEX",
        message = "Country must be an ISO 3166 alpha-2 code"
    ))]
    pub country: String,
}

impl PersistableMerchantStore {
    fn into_details(self) -> StoreDetails {
        StoreDetails {
            name: self.name.trim().to_string(),
            phone: non_blank(self.phone),
            email: self.email,
            address: Address {
                line: non_blank(self.address.address),
                city: non_blank(self.address.city),
                postal_code: non_blank(self.address.postal_code),
                state_province: non_blank(self.address.state_province),
                country: self.address.country.to_ascii_uppercase(),
                country_name: None,
            },
            default_language: self.default_language,
            supported_languages: self.supported_languages,
            currency: self.currency,
            currency_format_national: self.currency_format_national,
            in_business_since: self.in_business_since,
            dimension: self.dimension,
            weight: self.weight,
            retailer: self.retailer,
            parent_code: non_blank(self.parent),
            use_cache: self.use_cache,
            template: non_blank(self.template),
            logo: non_blank(self.logo),
        }
    }

    pub fn into_new_store(self) -> NewMerchantStore {
        let code = self.code.clone();
        NewMerchantStore {
            code,
            details: self.into_details(),
        }
    }

    pub fn into_update(self, modified_by: &str) -> StoreUpdate {
        StoreUpdate {
            details: self.into_details(),
            modified_by: modified_by.to_string(),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadableAddress {
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub state_province: Option<String>,
    pub country: String,
    /// Country name in the language the store was rendered in.
    pub country_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadableLanguage {
    pub id: i32,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadableAudit {
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    pub user: Option<String>,
}

/// Store representation returned by every store endpoint.
///
/// Also the cached form: the cache holds this structure serialized as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadableMerchantStore {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub phone: Option<String>,
    pub email: String,
    pub address: ReadableAddress,
    pub default_language: String,
    pub supported_languages: Vec<ReadableLanguage>,
    pub currency: String,
    pub currency_format_national: bool,
    pub in_business_since: Option<NaiveDate>,
    pub dimension: MeasureUnit,
    pub weight: WeightUnit,
    pub retailer: bool,
    pub parent: Option<String>,
    pub use_cache: bool,
    pub template: Option<String>,
    pub logo: Option<String>,
    pub readable_audit: ReadableAudit,
}

impl ReadableMerchantStore {
    /// Builds the readable form of `store`.
    ///
    /// `languages` is the platform language list, used to attach ids to the
    /// store's supported language codes. Codes missing from it are skipped.
    pub fn from_store(store: MerchantStore, languages: &[Language]) -> Self {
        let supported_languages = store
            .supported_languages
            .iter()
            .filter_map(|code| languages.iter().find(|l| &l.code == code))
            .map(|l| ReadableLanguage {
                id: l.id,
                code: l.code.clone(),
            })
            .collect();

        Self {
            id: store.id,
            code: store.code,
            name: store.name,
            phone: store.phone,
            email: store.email,
            address: ReadableAddress {
                address: store.address.line,
                city: store.address.city,
                postal_code: store.address.postal_code,
                state_province: store.address.state_province,
                country: store.address.country,
                country_name: store.address.country_name,
            },
            default_language: store.default_language,
            supported_languages,
            currency: store.currency,
            currency_format_national: store.currency_format_national,
            in_business_since: store.in_business_since,
            dimension: store.dimension,
            weight: store.weight,
            retailer: store.retailer,
            parent: store.parent_code,
            use_cache: store.use_cache,
            template: store.template,
            logo: store.logo,
            readable_audit: ReadableAudit {
                created: store.created_at,
                modified: store.updated_at,
                user: store.modified_by,
            },
        }
    }
}

/// Response of the store code availability check.
#[derive(Debug, Serialize, Deserialize)]
pub struct EntityExists {
    pub exists: bool,
}

/// Query of the store code availability check.
#[derive(Debug, Deserialize)]
pub struct StoreCodeQuery {
    pub code: Option<String>,
}

/// Query of the public store read.
#[derive(Debug, Deserialize)]
pub struct LanguageQuery {
    pub lang: Option<String>,
}
