use super::error::*;
use super::handler;
use crate::application_port::*;
use crate::domain_port::AccessTokenCache;
use crate::server::Server;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::warn;
use warp::{Filter, http, reject};

const GATE_TOKEN_NOT_LIVE: &str = "Invalid or expired token.";
const GATE_CACHE_FAILURE: &str = "Invalid authentication token.";

pub fn routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let signup = warp::post()
        .and(warp::path("auth"))
        .and(warp::path("signup"))
        .and(warp::path::end())
        .and(warp::body::json())
        .and(with(server.identity_provider.clone()))
        .and_then(handler::signup);

    let login = warp::post()
        .and(warp::path("auth"))
        .and(warp::path("login"))
        .and(warp::path::end())
        .and(warp::body::json())
        .and(with(server.auth_service.clone()))
        .and_then(handler::login);

    let refresh_token = warp::post()
        .and(warp::path("auth"))
        .and(warp::path("refresh-token"))
        .and(warp::path::end())
        .and(warp::body::json())
        .and(with(server.auth_service.clone()))
        .and_then(handler::refresh_token);

    let validate_token = warp::post()
        .and(warp::path("auth"))
        .and(warp::path("validate-token"))
        .and(warp::path::end())
        .and(warp::body::json())
        .and(with(server.auth_service.clone()))
        .and_then(handler::validate_token);

    let logout = warp::post()
        .and(warp::path("auth"))
        .and(warp::path("logout"))
        .and(warp::path::end())
        .and(with_gate(server.token_cache.clone()))
        .and(warp::header::optional::<String>(
            http::header::AUTHORIZATION.as_ref(),
        ))
        .and(with(server.auth_service.clone()))
        .and_then(handler::logout);

    signup
        .or(login)
        .or(refresh_token)
        .or(validate_token)
        .or(logout)
}

fn with<ServiceType>(
    service: Arc<ServiceType>,
) -> impl Filter<Extract = (Arc<ServiceType>,), Error = Infallible> + Clone
where
    ServiceType: Send + Sync + ?Sized,
{
    warp::any().map(move || service.clone())
}

/// Admits a request only when its bearer token is live in the cache.
/// Everything else is turned away before the handler runs.
fn with_gate(
    token_cache: Arc<dyn AccessTokenCache>,
) -> impl Filter<Extract = (), Error = warp::Rejection> + Clone {
    warp::header::optional::<String>(http::header::AUTHORIZATION.as_ref())
        .and_then(move |header: Option<String>| {
            let token_cache = token_cache.clone();
            async move {
                let token = match bearer_token(header.as_deref()) {
                    Ok(token) => token,
                    Err(AuthError::MissingAuthHeader) => {
                        return Err(reject::custom(ApiFailure::unauthorized(
                            AuthError::MissingAuthHeader.to_string(),
                        )));
                    }
                    Err(_) => {
                        return Err(reject::custom(ApiFailure::unauthorized(
                            AuthError::InvalidToken.to_string(),
                        )));
                    }
                };

                match token_cache.is_valid(token).await {
                    Ok(true) => Ok(()),
                    Ok(false) => Err(reject::custom(ApiFailure::unauthorized(
                        GATE_TOKEN_NOT_LIVE,
                    ))),
                    Err(error) => {
                        warn!("Token cache unreachable at the gate: {}", error);
                        Err(reject::custom(ApiFailure::unauthorized(GATE_CACHE_FAILURE)))
                    }
                }
            }
        })
        .untuple_one()
}
