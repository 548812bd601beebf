//! User repository over a fixed, in-memory record set.
//!
//! The data is built once at startup and never mutated, so every
//! accessor takes `&self` and the repository can be shared freely.

use crate::error::{AppError, AppResult};
use crate::models::User;

/// Read-only access to user records.
#[cfg_attr(test, mockall::automock)]
pub trait UserRepository: Send + Sync {
    /// Returns the designated first user.
    fn first(&self) -> AppResult<User>;

    /// Returns every user in insertion order.
    fn list_all(&self) -> Vec<User>;

    /// Returns the user at `index` in the list.
    ///
    /// # Errors
    /// `IndexOutOfRange` when `index` is negative or not below the list length.
    fn find_by_index(&self, index: i64) -> AppResult<User>;

    /// Number of users in the list.
    fn count(&self) -> usize;
}

/// Repository backed by literal fixture data.
#[derive(Debug, Clone)]
pub struct FixedUserRepository {
    default_user: Option<User>,
    users: Vec<User>,
}

impl FixedUserRepository {
    /// Creates a repository from an optional default user and a list.
    ///
    /// When `default_user` is `None`, `first` falls back to the head of `users`.
    pub fn new(default_user: Option<User>, users: Vec<User>) -> Self {
        Self {
            default_user,
            users,
        }
    }

    /// The demo data set served by the application.
    pub fn fixture() -> Self {
        Self::new(
            Some(User::new(1, "用户名")),
            vec![User::new(1, "用户名1"), User::new(2, "用户名2")],
        )
    }
}

impl Default for FixedUserRepository {
    fn default() -> Self {
        Self::fixture()
    }
}

impl UserRepository for FixedUserRepository {
    fn first(&self) -> AppResult<User> {
        self.default_user
            .as_ref()
            .or_else(|| self.users.first())
            .cloned()
            .ok_or(AppError::IndexOutOfRange { index: 0, len: 0 })
    }

    fn list_all(&self) -> Vec<User> {
        self.users.clone()
    }

    fn find_by_index(&self, index: i64) -> AppResult<User> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.users.get(i))
            .cloned()
            .ok_or(AppError::IndexOutOfRange {
                index,
                len: self.users.len(),
            })
    }

    fn count(&self) -> usize {
        self.users.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_fixture_list_order() {
        let repo = FixedUserRepository::fixture();
        let users = repo.list_all();

        assert_eq!(
            users,
            vec![User::new(1, "用户名1"), User::new(2, "用户名2")]
        );
        assert_eq!(repo.count(), 2);
    }

    #[test]
    fn test_fixture_first_is_default_user() {
        let repo = FixedUserRepository::fixture();
        assert_eq!(repo.first().unwrap(), User::new(1, "用户名"));
    }

    #[test]
    fn test_first_falls_back_to_list_head() {
        let repo = FixedUserRepository::new(None, vec![User::new(7, "seven")]);
        assert_eq!(repo.first().unwrap(), User::new(7, "seven"));
    }

    #[test]
    fn test_first_on_empty_store() {
        let repo = FixedUserRepository::new(None, Vec::new());
        let err = repo.first().unwrap_err();
        assert!(matches!(err, AppError::IndexOutOfRange { index: 0, len: 0 }));
    }

    #[test]
    fn test_find_by_index_matches_list() {
        let repo = FixedUserRepository::fixture();
        let users = repo.list_all();

        assert_eq!(repo.find_by_index(0).unwrap(), users[0]);
        assert_eq!(repo.find_by_index(1).unwrap(), users[1]);
    }

    #[test]
    fn test_find_by_index_out_of_range() {
        let repo = FixedUserRepository::fixture();

        match repo.find_by_index(5) {
            Err(AppError::IndexOutOfRange { index, len }) => {
                assert_eq!(index, 5);
                assert_eq!(len, 2);
            }
            other => panic!("Expected IndexOutOfRange, got {:?}", other),
        }
        assert!(repo.find_by_index(2).is_err());
        assert!(repo.find_by_index(-1).is_err());
    }

    proptest! {
        #[test]
        fn prop_find_by_index_bounds(index in any::<i64>()) {
            let repo = FixedUserRepository::fixture();
            let result = repo.find_by_index(index);
            if (0..2).contains(&index) {
                prop_assert!(result.is_ok());
            } else {
                let is_out_of_range = matches!(result, Err(AppError::IndexOutOfRange { .. }));
                prop_assert!(is_out_of_range);
            }
        }
    }
}
