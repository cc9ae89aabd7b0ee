use crate::api::v1::handler::ApiResponse;
use crate::application_port::*;
use std::convert::Infallible;
use tracing::warn;
use warp::http::StatusCode;
use warp::{Rejection, reject};

pub const MSG_FAILED: &str = "Operation failed.";
pub const MSG_NO_CREDENTIALS: &str = "Authentication credentials were not provided.";
pub const ERR_UNEXPECTED: &str = "An unexpected error occurred.";

pub async fn recover_error(err: Rejection) -> Result<impl warp::Reply, Infallible> {
    let failure = if let Some(failure) = err.find::<ApiFailure>() {
        failure.clone()
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        ApiFailure::bad_request(e.to_string())
    } else if err.is_not_found() {
        ApiFailure::new(StatusCode::NOT_FOUND, MSG_FAILED, "Not found.")
    } else if err.find::<reject::MethodNotAllowed>().is_some() {
        ApiFailure::new(StatusCode::METHOD_NOT_ALLOWED, MSG_FAILED, "Method not allowed.")
    } else {
        warn!("Unhandled rejection: {:?}", err);
        ApiFailure::new(StatusCode::INTERNAL_SERVER_ERROR, MSG_FAILED, ERR_UNEXPECTED)
    };

    let json = warp::reply::json(&ApiResponse::<()>::failure(&failure));
    Ok(warp::reply::with_status(json, failure.status))
}

/// A rejected request, already shaped for the response envelope.
#[derive(Debug, Clone)]
pub struct ApiFailure {
    pub status: StatusCode,
    pub message: String,
    pub error: String,
}

impl ApiFailure {
    pub fn new(
        status: StatusCode,
        message: impl Into<String>,
        error: impl Into<String>,
    ) -> ApiFailure {
        ApiFailure {
            status,
            message: message.into(),
            error: error.into(),
        }
    }

    pub fn bad_request(error: impl Into<String>) -> ApiFailure {
        ApiFailure::new(StatusCode::BAD_REQUEST, MSG_FAILED, error)
    }

    pub fn unauthorized(error: impl Into<String>) -> ApiFailure {
        ApiFailure::new(StatusCode::UNAUTHORIZED, MSG_FAILED, error)
    }

    pub fn internal<E: std::fmt::Display>(error: E) -> ApiFailure {
        warn!("Internal error: {}", error);
        ApiFailure::new(StatusCode::INTERNAL_SERVER_ERROR, MSG_FAILED, ERR_UNEXPECTED)
    }
}

impl reject::Reject for ApiFailure {}

pub fn signup_failure(error: AuthError) -> ApiFailure {
    match error {
        AuthError::DuplicateUsername => ApiFailure::bad_request(error.to_string()),
        other => ApiFailure::internal(other),
    }
}

pub fn login_failure(error: AuthError) -> ApiFailure {
    match error {
        AuthError::InvalidCredentials => ApiFailure::unauthorized(error.to_string()),
        other => ApiFailure::internal(other),
    }
}

pub fn refresh_failure(error: AuthError) -> ApiFailure {
    match error {
        AuthError::RefreshTokenExpired
        | AuthError::RefreshTokenInvalid
        | AuthError::SessionRevoked
        | AuthError::SessionNotFound => ApiFailure::unauthorized(error.to_string()),
        other => ApiFailure::internal(other),
    }
}

pub fn logout_failure(error: AuthError) -> ApiFailure {
    match error {
        // Unreachable in practice: the route gate answers first when the
        // header is absent. Kept so the handler is safe on its own.
        AuthError::MissingAuthHeader => {
            ApiFailure::new(StatusCode::UNAUTHORIZED, MSG_NO_CREDENTIALS, error.to_string())
        }
        AuthError::NoTokenProvided
        | AuthError::InvalidToken
        | AuthError::SessionIdMissing
        | AuthError::SessionNotFound => ApiFailure::bad_request(error.to_string()),
        other => ApiFailure::internal(other),
    }
}
