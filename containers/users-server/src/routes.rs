use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use users_shared::{users, AppState};

use crate::error::ApiError;
use crate::timing;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/users", get(get_users).post(create_user))
        .route("/users/:id", put(update_user).delete(delete_user))
        .layer(middleware::from_fn(timing::request_timing))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe
async fn health_check() -> StatusCode {
    StatusCode::OK
}

async fn get_users(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let users = users::list_users(state.store.as_ref()).await?;
    let body = users::encode(&users)?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

async fn create_user(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    users::create_user(state.store.as_ref(), &body).await?;
    Ok(StatusCode::CREATED)
}

async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    users::update_user(state.store.as_ref(), Some(id.as_str()), &body).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    users::delete_user(state.store.as_ref(), Some(id.as_str())).await?;
    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;
    use users_shared::{store::MemoryUserStore, StoreError, User, UserStore};

    /// Store that fails every call, standing in for an unreachable table.
    struct BrokenStore;

    fn offline() -> StoreError {
        StoreError::request(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "offline",
        ))
    }

    #[async_trait]
    impl UserStore for BrokenStore {
        async fn scan_all(&self) -> Result<Vec<User>, StoreError> {
            Err(offline())
        }
        async fn put(&self, _user: &User) -> Result<(), StoreError> {
            Err(offline())
        }
        async fn delete(&self, _id: &str) -> Result<(), StoreError> {
            Err(offline())
        }
    }

    fn app() -> (Arc<MemoryUserStore>, Router) {
        let store = Arc::new(MemoryUserStore::new());
        (store.clone(), router(AppState::new(store)))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: &str) -> (StatusCode, String) {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::from(body.to_string()))
            .unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn health_check_is_ok_and_empty() {
        let (_store, app) = app();
        let (status, body) = send(&app, "GET", "/", "").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn create_then_list() {
        let (_store, app) = app();

        let (status, body) = send(&app, "POST", "/users", r#"{"name":"Ann"}"#).await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(body.is_empty());

        let (status, body) = send(&app, "GET", "/users", "").await;
        assert_eq!(status, StatusCode::OK);
        let users: Vec<User> = serde_json::from_str(&body).unwrap();
        let anns: Vec<&User> = users.iter().filter(|u| u.name == "Ann").collect();
        assert_eq!(anns.len(), 1);
        assert!(anns[0].id.chars().all(|c| c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn list_of_empty_collection_is_empty_array() {
        let (_store, app) = app();
        let (status, body) = send(&app, "GET", "/users", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "[]");
    }

    #[tokio::test]
    async fn update_stores_under_path_id() {
        let (store, app) = app();
        let (status, body) = send(&app, "PUT", "/users/42", r#"{"name":"Bob","id":"999"}"#).await;

        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_empty());
        assert_eq!(store.get("42").await.unwrap().name, "Bob");
        assert!(store.get("999").await.is_none());
    }

    #[tokio::test]
    async fn delete_twice_succeeds() {
        let (store, app) = app();
        send(&app, "PUT", "/users/42", r#"{"name":"Bob"}"#).await;

        let (status, _) = send(&app, "DELETE", "/users/42", "").await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, "DELETE", "/users/42", "").await;
        assert_eq!(status, StatusCode::OK);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn malformed_body_leaves_collection_unchanged() {
        let (store, app) = app();
        let (status, body) = send(&app, "POST", "/users", "{\"name\":").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "failed to decode request body");
        assert!(store.is_empty().await);

        let (status, _) = send(&app, "PUT", "/users/1", "not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn store_failures_are_internal_errors() {
        let app = router(AppState::new(Arc::new(BrokenStore)));

        let (status, body) = send(&app, "GET", "/users", "").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "failed to get users");

        let (status, body) = send(&app, "POST", "/users", "{}").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "failed to create user");

        let (status, body) = send(&app, "PUT", "/users/1", "{}").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "failed to update user");

        let (status, body) = send(&app, "DELETE", "/users/1", "").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "failed to delete user");
    }
}
