pub mod events;
pub mod recurrence;
pub mod stats;
pub mod users;

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use datebook_core::{DatebookError, Session};
use serde::Serialize;

/// Header carrying the acting user's id.
pub const USER_HEADER: &str = "x-user-id";

/// Uniform response body: `{success, message, data}` or `{success, message, errors}`.
#[derive(Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

pub type ApiResult<T> = Result<(StatusCode, Json<Envelope<T>>), AppError>;

pub fn ok<T>(message: impl Into<String>, data: T) -> ApiResult<T> {
    respond(StatusCode::OK, message, data)
}

pub fn created<T>(message: impl Into<String>, data: T) -> ApiResult<T> {
    respond(StatusCode::CREATED, message, data)
}

fn respond<T>(status: StatusCode, message: impl Into<String>, data: T) -> ApiResult<T> {
    Ok((
        status,
        Json(Envelope {
            success: true,
            message: message.into(),
            data: Some(data),
            errors: None,
        }),
    ))
}

/// Errors converted to enveloped HTTP responses.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    errors: Vec<String>,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        let message = message.into();
        AppError {
            status: StatusCode::BAD_REQUEST,
            errors: vec![message.clone()],
            message,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AppError {
            status: StatusCode::NOT_FOUND,
            ..AppError::bad_request(message)
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, error = %self.message, "Request failed");
        }

        let body = Json(Envelope::<()> {
            success: false,
            message: self.message,
            data: None,
            errors: Some(self.errors),
        });
        (self.status, body).into_response()
    }
}

/// Domain errors map onto status codes; anything else is a 500.
impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err: anyhow::Error = err.into();

        let Some(domain) = err.downcast_ref::<DatebookError>() else {
            return AppError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "Internal server error".to_string(),
                errors: vec![err.to_string()],
            };
        };

        let status = match domain {
            DatebookError::NotFound { .. } => StatusCode::NOT_FOUND,
            e if e.is_client_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let errors = match domain {
            DatebookError::Validation(errors) => errors.clone(),
            other => vec![other.to_string()],
        };

        AppError {
            status,
            message: domain.to_string(),
            errors,
        }
    }
}

/// The session named by the `X-User-Id` header, if any.
pub struct MaybeSession(pub Option<Session>);

/// Like [`MaybeSession`] but rejects requests without the header.
pub struct RequireSession(pub Session);

impl<S> FromRequestParts<S> for MaybeSession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(USER_HEADER) else {
            return Ok(MaybeSession(None));
        };
        let raw = value
            .to_str()
            .map_err(|_| AppError::bad_request("X-User-Id header is not valid text"))?;
        Ok(MaybeSession(Some(Session::parse(raw)?)))
    }
}

impl<S> FromRequestParts<S> for RequireSession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match MaybeSession::from_request_parts(parts, state).await? {
            MaybeSession(Some(session)) => Ok(RequireSession(session)),
            MaybeSession(None) => Err(AppError::bad_request("X-User-Id header is required")),
        }
    }
}
