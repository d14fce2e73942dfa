//! Platform users and the authenticated principal.

use chrono::{DateTime, Utc};

/// An administrative user attached to a single merchant store.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub user_name: String,
    pub store_code: String,
    /// Whether the user's store is a retailer (may own child stores).
    pub store_retailer: bool,
    pub superadmin: bool,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Input data for creating a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_name: String,
    pub store_code: String,
    pub superadmin: bool,
}

/// The user behind an authenticated request.
///
/// Inserted into request extensions by the bearer authentication middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i64,
    pub user_name: String,
}
