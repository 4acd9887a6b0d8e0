use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use users_shared::UserError;

/// Handler error, rendered as a status code plus the fixed plain-text message.
#[derive(Debug)]
pub struct ApiError(pub UserError);

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!("{}", self.0.detail());
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, self.0.to_string()).into_response()
    }
}
