use super::error::*;
use crate::application_port::*;
use crate::domain_port::IdentityProvider;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::http::StatusCode;
use warp::{Rejection, Reply, reject};

pub const MSG_SUCCEEDED: &str = "Operation succeeded.";
pub const MSG_LOGGED_OUT: &str = "Logout successful.";

/// Response envelope shared by every endpoint. The HTTP status is repeated
/// in the body so clients never have to look at the transport layer.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub message: String,
    pub error: Option<String>,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> ApiResponse<T> {
        ApiResponse {
            status_code: StatusCode::OK.as_u16(),
            message: MSG_SUCCEEDED.to_string(),
            error: None,
            data: Some(data),
        }
    }

    pub fn created(data: T) -> ApiResponse<T> {
        ApiResponse {
            status_code: StatusCode::CREATED.as_u16(),
            message: MSG_SUCCEEDED.to_string(),
            error: None,
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message_only(message: &str) -> ApiResponse<()> {
        ApiResponse {
            status_code: StatusCode::OK.as_u16(),
            message: message.to_string(),
            error: None,
            data: None,
        }
    }

    pub fn failure(failure: &ApiFailure) -> ApiResponse<()> {
        ApiResponse {
            status_code: failure.status.as_u16(),
            message: failure.message.clone(),
            error: Some(failure.error.clone()),
            data: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub token: String,
}

fn require_filled(field: &str, value: &str) -> Result<(), Rejection> {
    if value.trim().is_empty() {
        let error = format!("{field}: This field may not be blank.");
        return Err(reject::custom(ApiFailure::bad_request(error)));
    }
    Ok(())
}

pub async fn signup(
    request: SignupRequest,
    identity_provider: Arc<dyn IdentityProvider>,
) -> Result<impl Reply, Rejection> {
    require_filled("username", &request.username)?;
    require_filled("password", &request.password)?;

    let identity = identity_provider
        .create_account(&request.username, &request.password)
        .await
        .map_err(signup_failure)
        .map_err(reject::custom)?;

    let response = ApiResponse::created(SignupResponse {
        username: identity.username,
    });
    Ok(warp::reply::with_status(
        warp::reply::json(&response),
        StatusCode::CREATED,
    ))
}

pub async fn login(
    request: LoginRequest,
    auth_service: Arc<dyn AuthService>,
) -> Result<impl Reply, Rejection> {
    require_filled("username", &request.username)?;
    require_filled("password", &request.password)?;

    let pair = auth_service
        .login(LoginInput {
            username: request.username,
            password: request.password,
        })
        .await
        .map_err(login_failure)
        .map_err(reject::custom)?;

    Ok(warp::reply::with_status(
        warp::reply::json(&ApiResponse::ok(pair)),
        StatusCode::OK,
    ))
}

pub async fn refresh_token(
    request: RefreshRequest,
    auth_service: Arc<dyn AuthService>,
) -> Result<impl Reply, Rejection> {
    let pair = auth_service
        .refresh_token(&request.refresh)
        .await
        .map_err(refresh_failure)
        .map_err(reject::custom)?;

    Ok(warp::reply::with_status(
        warp::reply::json(&ApiResponse::ok(pair)),
        StatusCode::OK,
    ))
}

/// Always answers 200; the outcome lives in the `is_valid` flag.
pub async fn validate_token(
    request: ValidateRequest,
    auth_service: Arc<dyn AuthService>,
) -> Result<impl Reply, Rejection> {
    let validation = auth_service.validate_token(&request.token).await;

    Ok(warp::reply::with_status(
        warp::reply::json(&ApiResponse::ok(validation)),
        StatusCode::OK,
    ))
}

pub async fn logout(
    authorization: Option<String>,
    auth_service: Arc<dyn AuthService>,
) -> Result<impl Reply, Rejection> {
    auth_service
        .logout(authorization.as_deref())
        .await
        .map_err(logout_failure)
        .map_err(reject::custom)?;

    Ok(warp::reply::with_status(
        warp::reply::json(&ApiResponse::message_only(MSG_LOGGED_OUT)),
        StatusCode::OK,
    ))
}
