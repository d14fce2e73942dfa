//! Key/value configuration attached to a store.

/// One configuration entry, e.g. a social network link
/// (`key = "facebook"`, `value = "https://facebook.com/acme"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfiguration {
    pub key: String,
    pub value: String,
    pub active: bool,
}

/// Branding and marketing details of a store.
#[derive(Debug, Clone)]
pub struct StoreBrand {
    pub store_code: String,
    pub logo: Option<String>,
    pub social_networks: Vec<StoreConfiguration>,
}
