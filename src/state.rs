//! Application state for Axum web framework.
//!
//! Contains shared services that are accessible across all request handlers.

use crate::repositories::Repositories;
use crate::services::Services;

/// Application state containing all shared services.
///
/// This struct is designed to be used with Axum's State extractor.
/// Cloning is cheap since the underlying repositories live behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// All business logic services
    pub services: Services,
}

impl AppState {
    /// Creates a new AppState from a set of repositories.
    ///
    /// # Example
    /// ```ignore
    /// let state = AppState::new(Repositories::fixture());
    /// ```
    pub fn new(repos: Repositories) -> Self {
        Self {
            services: Services::new(repos),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Repositories::fixture())
    }
}
