//! DTOs for store branding and marketing endpoints.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::Validate;

use crate::domain::entities::{StoreBrand, StoreConfiguration};

static SOCIAL_KEY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9_-]{1,50}$").unwrap());

/// A social network link of a store.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SocialNetworkEntry {
    #[validate(regex(path = "*SOCIAL_KEY_REGEX", message = "Invalid social network key"))]
    pub key: String,

    #[validate(length(max = 255))]
    pub value: String,

    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl From<StoreConfiguration> for SocialNetworkEntry {
    fn from(c: StoreConfiguration) -> Self {
        Self {
            key: c.key,
            value: c.value,
            active: c.active,
        }
    }
}

impl From<SocialNetworkEntry> for StoreConfiguration {
    fn from(e: SocialNetworkEntry) -> Self {
        Self {
            key: e.key,
            value: e.value,
            active: e.active,
        }
    }
}

/// Store logo and social networks.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadableBrand {
    pub logo: Option<String>,
    pub social_networks: Vec<SocialNetworkEntry>,
}

impl From<StoreBrand> for ReadableBrand {
    fn from(brand: StoreBrand) -> Self {
        Self {
            logo: brand.logo,
            social_networks: brand
                .social_networks
                .into_iter()
                .map(SocialNetworkEntry::from)
                .collect(),
        }
    }
}

/// Replacement list of social networks, at most 50 entries.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBrandRequest {
    #[validate(length(max = 50), nested)]
    pub social_networks: Vec<SocialNetworkEntry>,
}
