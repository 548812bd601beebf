//! User lookup request handlers.
//!
//! All routes are read-only views over the fixed user list.

use axum::{Json, extract::State};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::USER_TAG;
use crate::api::dto::{ErrorResponse, IndexQuery, UserResponse};
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::extract::{AppPath, AppQuery};

/// Creates user-related routes.
///
/// Routes:
/// - GET /user          - First user
/// - GET /one           - First user (alias)
/// - GET /list          - All users
/// - GET /user/{index}  - User at list position
/// - GET /user/info     - User at list position given as `?index=`
pub fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(get_user))
        .routes(routes!(get_one))
        .routes(routes!(list_users))
        .routes(routes!(get_user_info))
        .routes(routes!(get_user_by_index))
}

/// GET /user - Get the first user
#[utoipa::path(
    get,
    path = "/user",
    tag = USER_TAG,
    summary = "查询用户信息",
    description = "这里固定获取第一个用户，无需参数",
    responses(
        (status = 200, description = "成功", body = UserResponse)
    )
)]
async fn get_user(State(state): State<AppState>) -> AppResult<Json<UserResponse>> {
    let user = state.services.users.get_user()?;
    Ok(Json(UserResponse::from(user)))
}

/// GET /one - Same as GET /user
#[utoipa::path(
    get,
    path = "/one",
    tag = USER_TAG,
    summary = "查询用户信息",
    description = "这里固定获取第一个用户，无需参数",
    responses(
        (status = 200, description = "成功", body = UserResponse)
    )
)]
async fn get_one(State(state): State<AppState>) -> AppResult<Json<UserResponse>> {
    let user = state.services.users.get_user()?;
    Ok(Json(UserResponse::from(user)))
}

/// GET /list - List all users in insertion order
#[utoipa::path(
    get,
    path = "/list",
    tag = USER_TAG,
    summary = "查询用户列表",
    description = "返回所有用户信息，无需参数",
    responses(
        (status = 200, description = "成功", body = Vec<UserResponse>)
    )
)]
async fn list_users(State(state): State<AppState>) -> Json<Vec<UserResponse>> {
    let users = state.services.users.list_users();
    Json(users.into_iter().map(UserResponse::from).collect())
}

/// GET /user/{index} - Get user by list index
#[utoipa::path(
    get,
    path = "/user/{index}",
    tag = USER_TAG,
    summary = "查询用户信息",
    description = "需提供用户列表的INDEX",
    params(
        ("index" = i64, Path, description = "列表下标", example = 1)
    ),
    responses(
        (status = 200, description = "成功", body = UserResponse),
        (status = 400, description = "Index is not an integer", body = ErrorResponse),
        (status = 500, description = "Index out of range", body = ErrorResponse)
    )
)]
async fn get_user_by_index(
    State(state): State<AppState>,
    AppPath(index): AppPath<i64>,
) -> AppResult<Json<UserResponse>> {
    let user = state.services.users.get_user_by_index(index)?;
    Ok(Json(UserResponse::from(user)))
}

/// GET /user/info?index= - Get user by list index from the query string
#[utoipa::path(
    get,
    path = "/user/info",
    tag = USER_TAG,
    summary = "查询用户信息",
    description = "需提供用户列表的INDEX",
    params(IndexQuery),
    responses(
        (status = 200, description = "成功", body = UserResponse),
        (status = 400, description = "Missing or invalid index", body = ErrorResponse),
        (status = 500, description = "Index out of range", body = ErrorResponse)
    )
)]
async fn get_user_info(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<IndexQuery>,
) -> AppResult<Json<UserResponse>> {
    let user = state.services.users.get_user_by_index(query.index)?;
    Ok(Json(UserResponse::from(user)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        response::Response,
    };
    use http_body_util::BodyExt;
    use mockall::predicate::eq;
    use tower::ServiceExt;

    use crate::error::AppError;
    use crate::models::User;
    use crate::repositories::{MockUserRepository, Repositories};

    fn app_with(repo: MockUserRepository) -> Router {
        let state = AppState::new(Repositories::new(Arc::new(repo)));
        let (router, _api) = user_routes().split_for_parts();
        router.with_state(state)
    }

    async fn get(app: Router, uri: &str) -> Response {
        let request = Request::builder()
            .uri(uri)
            .header("accept", "application/json")
            .body(Body::empty())
            .unwrap();
        app.oneshot(request).await.unwrap()
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_get_user_returns_service_value() {
        let mut repo = MockUserRepository::new();
        repo.expect_first()
            .times(1)
            .returning(|| Ok(User::new(3, "模拟Service的返回数据")));

        let response = get(app_with(repo), "/user").await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["id"], 3);
        assert_eq!(json["name"], "模拟Service的返回数据");
    }

    #[tokio::test]
    async fn test_get_one_uses_same_lookup() {
        let mut repo = MockUserRepository::new();
        repo.expect_first()
            .times(1)
            .returning(|| Ok(User::new(1, "用户名")));

        let response = get(app_with(repo), "/one").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({"id": 1, "name": "用户名"})
        );
    }

    #[tokio::test]
    async fn test_list_users_returns_mocked_list() {
        let mut repo = MockUserRepository::new();
        repo.expect_list_all()
            .times(1)
            .returning(|| vec![User::new(3, "模拟列表-3")]);

        let response = get(app_with(repo), "/list").await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json.as_array().unwrap().len(), 1);
        assert_eq!(json[0]["id"], 3);
    }

    #[tokio::test]
    async fn test_get_user_by_index_forwards_path_value() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_index()
            .with(eq(0))
            .times(1)
            .returning(|_| Ok(User::new(3, "模拟返回值-3")));

        let response = get(app_with(repo), "/user/0").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["name"], "模拟返回值-3");
    }

    #[tokio::test]
    async fn test_get_user_info_forwards_query_value() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_index()
            .with(eq(11))
            .times(1)
            .returning(|_| Ok(User::new(3, "模拟返回值-3")));

        let response = get(app_with(repo), "/user/info?index=11").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["id"], 3);
    }

    #[tokio::test]
    async fn test_info_route_not_captured_by_index_route() {
        // No expectations: reaching the repository would panic the mock
        let repo = MockUserRepository::new();

        let response = get(app_with(repo), "/user/info").await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["code"], "INVALID_QUERY_PARAMS");
    }

    #[tokio::test]
    async fn test_out_of_range_is_server_error() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_index()
            .returning(|index| Err(AppError::IndexOutOfRange { index, len: 2 }));

        let response = get(app_with(repo), "/user/5").await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = json_body(response).await;
        assert_eq!(json["code"], "INDEX_OUT_OF_RANGE");
        assert_eq!(json["details"]["index"], 5);
    }

    #[tokio::test]
    async fn test_non_integer_index_is_bad_request() {
        let repo = MockUserRepository::new();

        let response = get(app_with(repo), "/user/first").await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["code"], "INVALID_PATH_PARAMS");
    }
}
