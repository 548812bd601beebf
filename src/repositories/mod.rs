//! Repository layer for data access operations.

mod user_repo;

pub use user_repo::{FixedUserRepository, UserRepository};

#[cfg(test)]
pub use user_repo::MockUserRepository;

use std::sync::Arc;

/// Aggregates all repositories for convenient access.
///
/// Repositories are shared behind `Arc`, so cloning is cheap.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
}

impl Repositories {
    /// Creates a new Repositories instance from the given user repository.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Repositories serving the built-in demo data.
    pub fn fixture() -> Self {
        Self::new(Arc::new(FixedUserRepository::fixture()))
    }
}
