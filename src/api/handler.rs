use super::error::*;
use crate::application_port::*;
use crate::domain_model::{AuthenticatedIdentity, TeamId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::http::StatusCode;
use warp::reject;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub team: Option<TeamId>,
}

pub async fn register(
    body: RegisterRequest,
    account_service: Arc<dyn AccountService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let profile = account_service
        .register(RegisterInput {
            username: body.username,
            email: body.email,
            password: body.password,
            team: body.team,
        })
        .await
        .map_err(auth_rejection)?;

    Ok(warp::reply::with_status(
        warp::reply::json(&profile),
        StatusCode::CREATED,
    ))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
    pub user: AuthenticatedIdentity,
}

pub async fn login(
    body: LoginRequest,
    session_issuer: Arc<dyn SessionIssuer>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let login_result = session_issuer
        .login(LoginInput {
            username: body.username,
            password: body.password,
        })
        .await
        .map_err(auth_rejection)?;

    Ok(warp::reply::json(&LoginResponse {
        access: login_result.access.token,
        refresh: login_result.refresh.token,
        user: login_result.identity,
    }))
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh: Option<String>,
}

pub async fn refresh(
    body: RefreshRequest,
    session_issuer: Arc<dyn SessionIssuer>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let refreshed = session_issuer
        .refresh(&body.refresh)
        .await
        .map_err(auth_rejection)?;

    Ok(warp::reply::json(&RefreshResponse {
        access: refreshed.access.token,
        refresh: refreshed.refresh.map(|r| r.token),
    }))
}

#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    pub refresh: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub detail: &'static str,
}

pub async fn logout(
    body: LogoutRequest,
    logout_coordinator: Arc<dyn LogoutCoordinator>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let token = body
        .refresh
        .ok_or_else(|| reject::custom(ApiErrorCode::InvalidRefreshToken))?;

    logout_coordinator
        .logout(&token)
        .await
        .map_err(|e| match e {
            AuthError::InvalidToken(_) => reject::custom(ApiErrorCode::InvalidRefreshToken),
            other => auth_rejection(other),
        })?;

    Ok(warp::reply::json(&LogoutResponse {
        detail: "Successfully logged out.",
    }))
}

pub async fn me(
    identity: AuthenticatedIdentity,
    account_service: Arc<dyn AccountService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let profile = account_service
        .profile(identity.id)
        .await
        .map_err(auth_rejection)?;
    Ok(warp::reply::json(&profile))
}
