use lambda_http::{
    http::{Method, StatusCode},
    Body, Error, Request, RequestExt, Response,
};
use std::sync::Arc;
use users_shared::{users, AppState, UserError, UserStore};

/// Main Lambda handler - dispatches on the HTTP method of the proxy event
pub(crate) async fn function_handler(
    event: Request,
    state: Arc<AppState>,
) -> Result<Response<Body>, Error> {
    let method = event.method();
    let id = event
        .path_parameters_ref()
        .and_then(|params| params.first("id"));
    let body: &[u8] = event.body().as_ref();
    tracing::info!(
        "Users Lambda invoked - Method: {} Path: {}",
        method,
        event.uri().path()
    );

    let store = state.store.as_ref();
    match method {
        &Method::GET => get_users(store).await,
        &Method::POST => create_user(store, body).await,
        &Method::PUT => update_user(store, id, body).await,
        &Method::DELETE => delete_user(store, id).await,
        _ => text_response(StatusCode::BAD_REQUEST, "method not allowed"),
    }
}

async fn get_users(store: &dyn UserStore) -> Result<Response<Body>, Error> {
    let result = users::list_users(store)
        .await
        .and_then(|list| users::encode(&list));

    match result {
        Ok(body) => json_response(StatusCode::OK, body),
        Err(err) => error_response(err),
    }
}

async fn create_user(store: &dyn UserStore, body: &[u8]) -> Result<Response<Body>, Error> {
    let result = users::create_user(store, body)
        .await
        .and_then(|user| users::encode(&user));

    match result {
        Ok(body) => json_response(StatusCode::CREATED, body),
        Err(err) => error_response(err),
    }
}

async fn update_user(
    store: &dyn UserStore,
    id: Option<&str>,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let result = users::update_user(store, id, body)
        .await
        .and_then(|user| users::encode(&user));

    match result {
        Ok(body) => json_response(StatusCode::OK, body),
        Err(err) => error_response(err),
    }
}

async fn delete_user(store: &dyn UserStore, id: Option<&str>) -> Result<Response<Body>, Error> {
    match users::delete_user(store, id).await {
        Ok(()) => text_response(StatusCode::OK, "User deleted successfully"),
        Err(err) => error_response(err),
    }
}

fn json_response(status: StatusCode, body: String) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(body.into())
        .map_err(Box::new)?)
}

fn text_response(status: StatusCode, message: &str) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "text/plain")
        .header("Access-Control-Allow-Origin", "*")
        .body(Body::Text(message.to_string()))
        .map_err(Box::new)?)
}

fn error_response(err: UserError) -> Result<Response<Body>, Error> {
    tracing::error!("{}", err.detail());
    let status = StatusCode::from_u16(err.status_code())?;
    text_response(status, &err.to_string())
}
