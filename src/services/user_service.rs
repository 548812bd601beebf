//! User service for business logic operations.
//!
//! Provides a higher-level API for user lookups on top of the
//! repository layer.

use std::sync::Arc;

use crate::error::AppResult;
use crate::models::User;
use crate::repositories::UserRepository;

/// User service for handling user-related lookups.
///
/// The repository is held behind `Arc`, so cloning is cheap.
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    /// Creates a new UserService with the given repository.
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    /// Gets the first user.
    pub fn get_user(&self) -> AppResult<User> {
        self.repo.first()
    }

    /// Lists all users in insertion order.
    pub fn list_users(&self) -> Vec<User> {
        self.repo.list_all()
    }

    /// Gets a user by their position in the list.
    ///
    /// # Arguments
    /// * `index` - Zero-based position, may be negative when parsed from a request
    ///
    /// # Returns
    /// The user at `index`, or `IndexOutOfRange`
    pub fn get_user_by_index(&self, index: i64) -> AppResult<User> {
        self.repo.find_by_index(index)
    }

    /// Number of users available.
    pub fn count(&self) -> usize {
        self.repo.count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::repositories::{FixedUserRepository, MockUserRepository};
    use mockall::predicate::eq;

    fn fixture_service() -> UserService {
        UserService::new(Arc::new(FixedUserRepository::fixture()))
    }

    #[test]
    fn test_list_users_not_empty() {
        let service = fixture_service();
        assert!(!service.list_users().is_empty(), "用户列表为空");
    }

    #[test]
    fn test_get_user_by_index_agrees_with_list() {
        let service = fixture_service();
        let users = service.list_users();

        for (i, user) in users.iter().enumerate() {
            let index = i64::try_from(i).unwrap();
            assert_eq!(&service.get_user_by_index(index).unwrap(), user);
        }
        assert!(service.get_user_by_index(users.len() as i64).is_err());
    }

    #[test]
    fn test_get_user_delegates_to_repository() {
        let mut repo = MockUserRepository::new();
        repo.expect_first()
            .times(1)
            .returning(|| Ok(User::new(3, "模拟Service的返回数据")));

        let service = UserService::new(Arc::new(repo));
        let user = service.get_user().unwrap();

        assert_eq!(user, User::new(3, "模拟Service的返回数据"));
    }

    #[test]
    fn test_get_user_by_index_forwards_index() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_index()
            .with(eq(11))
            .times(1)
            .returning(|_| Ok(User::new(3, "模拟返回值-3")));

        let service = UserService::new(Arc::new(repo));

        assert_eq!(
            service.get_user_by_index(11).unwrap(),
            User::new(3, "模拟返回值-3")
        );
    }

    #[test]
    fn test_get_user_by_index_propagates_error() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_index()
            .returning(|index| Err(AppError::IndexOutOfRange { index, len: 0 }));

        let service = UserService::new(Arc::new(repo));
        let err = service.get_user_by_index(0).unwrap_err();

        assert!(matches!(err, AppError::IndexOutOfRange { index: 0, len: 0 }));
    }
}
