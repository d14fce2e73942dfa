//! Merchant store entity and its value types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Code of the platform store that always exists and cannot be deleted.
pub const DEFAULT_STORE_CODE: &str = "DEFAULT";

/// Unit used for product dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MeasureUnit {
    #[default]
    #[serde(rename = "CM")]
    Centimeter,
    #[serde(rename = "IN")]
    Inch,
}

impl MeasureUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeasureUnit::Centimeter => "CM",
            MeasureUnit::Inch => "IN",
        }
    }
}

impl FromStr for MeasureUnit {
    type Err = UnknownUnit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CM" => Ok(MeasureUnit::Centimeter),
            "IN" => Ok(MeasureUnit::Inch),
            other => Err(UnknownUnit(other.to_string())),
        }
    }
}

/// Unit used for product weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WeightUnit {
    #[default]
    #[serde(rename = "KG")]
    Kilogram,
    #[serde(rename = "LB")]
    Pound,
}

impl WeightUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightUnit::Kilogram => "KG",
            WeightUnit::Pound => "LB",
        }
    }
}

impl FromStr for WeightUnit {
    type Err = UnknownUnit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "KG" => Ok(WeightUnit::Kilogram),
            "LB" => Ok(WeightUnit::Pound),
            other => Err(UnknownUnit(other.to_string())),
        }
    }
}

/// A stored unit value that is neither a known measure nor weight unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownUnit(pub String);

impl fmt::Display for UnknownUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown unit '{}'", self.0)
    }
}

impl std::error::Error for UnknownUnit {}

/// Postal address of a store.
///
/// `country_name` is filled in by reads and is localized to the language
/// the store was requested in. It is `None` when no translation exists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Address {
    pub line: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub state_province: Option<String>,
    pub country: String,
    pub country_name: Option<String>,
}

/// A storefront of the platform.
///
/// Stores may form a two-level hierarchy: a `retailer` store can be the
/// `parent_code` of other stores, and users of the retailer may manage them.
#[derive(Debug, Clone)]
pub struct MerchantStore {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub phone: Option<String>,
    pub email: String,
    pub address: Address,
    pub default_language: String,
    pub supported_languages: Vec<String>,
    pub currency: String,
    pub currency_format_national: bool,
    pub in_business_since: Option<NaiveDate>,
    pub dimension: MeasureUnit,
    pub weight: WeightUnit,
    pub retailer: bool,
    pub parent_code: Option<String>,
    pub use_cache: bool,
    pub template: Option<String>,
    pub logo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub modified_by: Option<String>,
}

impl MerchantStore {
    /// Returns true for the platform store that must never be removed.
    pub fn is_default_store(&self) -> bool {
        self.code == DEFAULT_STORE_CODE
    }

    /// Returns true if `language` is one of the store's supported languages.
    pub fn supports_language(&self, language: &str) -> bool {
        self.supported_languages.iter().any(|l| l == language)
    }
}

/// Writable attributes of a store, shared by creation and full update.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreDetails {
    pub name: String,
    pub phone: Option<String>,
    pub email: String,
    pub address: Address,
    pub default_language: String,
    pub supported_languages: Vec<String>,
    pub currency: String,
    pub currency_format_national: bool,
    pub in_business_since: Option<NaiveDate>,
    pub dimension: MeasureUnit,
    pub weight: WeightUnit,
    pub retailer: bool,
    pub parent_code: Option<String>,
    pub use_cache: bool,
    pub template: Option<String>,
    pub logo: Option<String>,
}

impl StoreDetails {
    /// Makes sure the default language is part of the supported languages
    /// and that no language is listed twice.
    pub fn normalize_languages(&mut self) {
        let mut languages: Vec<String> = Vec::with_capacity(self.supported_languages.len() + 1);
        for language in self.supported_languages.drain(..) {
            if !languages.contains(&language) {
                languages.push(language);
            }
        }
        if !languages.contains(&self.default_language) {
            languages.insert(0, self.default_language.clone());
        }
        self.supported_languages = languages;
    }
}

/// Input data for creating a new store.
#[derive(Debug, Clone)]
pub struct NewMerchantStore {
    pub code: String,
    pub details: StoreDetails,
}

/// Full replacement of a store's writable attributes (PUT semantics).
#[derive(Debug, Clone)]
pub struct StoreUpdate {
    pub details: StoreDetails,
    pub modified_by: String,
}
