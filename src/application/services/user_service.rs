//! Store-level authorization of platform users.

use crate::domain::repositories::{StoreRepository, UserRepository};
use crate::error::AppError;
use std::sync::Arc;

/// Decides which stores a user may administer.
pub struct UserService<U: UserRepository + ?Sized, S: StoreRepository + ?Sized> {
    users: Arc<U>,
    stores: Arc<S>,
}

impl<U: UserRepository + ?Sized, S: StoreRepository + ?Sized> UserService<U, S> {
    pub fn new(users: Arc<U>, stores: Arc<S>) -> Self {
        Self { users, stores }
    }

    /// Returns true if `user_name` may administer the store `store_code`.
    ///
    /// A user is authorized when they are a superadmin, when they belong to
    /// the store itself, or when their store is a retailer that is the
    /// parent of the target store. Unknown and inactive users are never
    /// authorized.
    pub async fn authorized_store(
        &self,
        user_name: &str,
        store_code: &str,
    ) -> Result<bool, AppError> {
        let Some(user) = self.users.find_by_name(user_name).await? else {
            tracing::debug!(user = %user_name, "Unknown user");
            return Ok(false);
        };

        if !user.active {
            return Ok(false);
        }

        if user.superadmin || user.store_code == store_code {
            return Ok(true);
        }

        if !user.store_retailer {
            return Ok(false);
        }

        let parent = self.stores.parent_code(store_code).await?;
        Ok(parent.as_deref() == Some(user.store_code.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::User;
    use crate::domain::repositories::{MockStoreRepository, MockUserRepository};
    use chrono::Utc;

    fn user(store_code: &str, retailer: bool) -> User {
        User {
            id: 1,
            user_name: "alice".to_string(),
            store_code: store_code.to_string(),
            store_retailer: retailer,
            superadmin: false,
            active: true,
            created_at: Utc::now(),
        }
    }

    fn service(
        users: MockUserRepository,
        stores: MockStoreRepository,
    ) -> UserService<MockUserRepository, MockStoreRepository> {
        UserService::new(Arc::new(users), Arc::new(stores))
    }

    #[tokio::test]
    async fn test_unknown_user_not_authorized() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_name().returning(|_| Ok(None));

        let allowed = service(users, MockStoreRepository::new())
            .authorized_store("ghost", "acme")
            .await
            .unwrap();

        assert!(!allowed);
    }

    #[tokio::test]
    async fn test_inactive_user_not_authorized() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_name().returning(|_| {
            let mut u = user("acme", false);
            u.active = false;
            Ok(Some(u))
        });

        let allowed = service(users, MockStoreRepository::new())
            .authorized_store("alice", "acme")
            .await
            .unwrap();

        assert!(!allowed);
    }

    #[tokio::test]
    async fn test_superadmin_authorized_everywhere() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_name().returning(|_| {
            let mut u = user("DEFAULT", false);
            u.superadmin = true;
            Ok(Some(u))
        });

        let allowed = service(users, MockStoreRepository::new())
            .authorized_store("alice", "acme")
            .await
            .unwrap();

        assert!(allowed);
    }

    #[tokio::test]
    async fn test_own_store_authorized() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_name()
            .returning(|_| Ok(Some(user("acme", false))));

        let allowed = service(users, MockStoreRepository::new())
            .authorized_store("alice", "acme")
            .await
            .unwrap();

        assert!(allowed);
    }

    #[tokio::test]
    async fn test_retailer_authorized_for_child_store() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_name()
            .returning(|_| Ok(Some(user("mall", true))));
        let mut stores = MockStoreRepository::new();
        stores
            .expect_parent_code()
            .withf(|code| code == "shop")
            .times(1)
            .returning(|_| Ok(Some("mall".to_string())));

        let allowed = service(users, stores)
            .authorized_store("alice", "shop")
            .await
            .unwrap();

        assert!(allowed);
    }

    #[tokio::test]
    async fn test_retailer_not_authorized_for_unrelated_store() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_name()
            .returning(|_| Ok(Some(user("mall", true))));
        let mut stores = MockStoreRepository::new();
        stores.expect_parent_code().returning(|_| Ok(None));

        let allowed = service(users, stores)
            .authorized_store("alice", "other")
            .await
            .unwrap();

        assert!(!allowed);
    }

    #[tokio::test]
    async fn test_non_retailer_never_checks_parent() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_name()
            .returning(|_| Ok(Some(user("acme", false))));
        let mut stores = MockStoreRepository::new();
        stores.expect_parent_code().times(0);

        let allowed = service(users, stores)
            .authorized_store("alice", "shop")
            .await
            .unwrap();

        assert!(!allowed);
    }
}
