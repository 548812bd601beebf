//! User-related DTOs for API requests and responses.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::User;

/// Query parameters selecting a user by list position.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IndexQuery {
    /// 列表下标
    #[param(example = 1)]
    pub index: i64,
}

/// Response body for a single user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({"id": 1, "name": "张三"}))]
pub struct UserResponse {
    /// 用户ID
    #[schema(example = 1)]
    pub id: i32,
    /// 用户名称
    #[schema(example = "张三")]
    pub name: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
        }
    }
}
