use crate::api::cookies::{CookiePolicy, redirect_to_login};
use crate::application_port::*;
use serde::Serialize;
use std::convert::Infallible;
use thiserror::Error;
use tracing::{debug, warn};
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Rejection, Reply, reject};

pub async fn recover_error(err: Rejection) -> Result<Response, Infallible> {
    if let Some(redirect) = err.find::<PageRedirect>() {
        return Ok(redirect_to_login(redirect.clear.as_ref()));
    }

    let (code, fields) = if let Some(code) = err.find::<ApiErrorCode>() {
        (code.clone(), None)
    } else if let Some(ValidationRejection(fields)) = err.find::<ValidationRejection>() {
        (ApiErrorCode::Validation, Some(fields.clone()))
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        debug!("bad request body: {}", e);
        (ApiErrorCode::BadRequest, None)
    } else if err.find::<reject::PayloadTooLarge>().is_some()
        || err.find::<reject::LengthRequired>().is_some()
    {
        (ApiErrorCode::BadRequest, None)
    } else if err.is_not_found() {
        (ApiErrorCode::NotFound, None)
    } else if err.find::<reject::MethodNotAllowed>().is_some() {
        (ApiErrorCode::MethodNotAllowed, None)
    } else {
        warn!("unhandled rejection: {:?}", err);
        (ApiErrorCode::InternalError, None)
    };

    let body = ApiError {
        error: code.to_string(),
        code: code.clone(),
        fields,
    };
    Ok(warp::reply::with_status(warp::reply::json(&body), code.status()).into_response())
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum ApiErrorCode {
    #[error("No active account found with the given credentials")]
    InvalidCredentials,
    #[error("Authentication credentials were not provided")]
    MissingToken,
    #[error("Token is invalid or expired")]
    InvalidToken,
    #[error("Token has been revoked")]
    Revoked,
    #[error("User not found")]
    SubjectNotFound,
    #[error("Invalid refresh token")]
    InvalidRefreshToken,
    #[error("Invalid input")]
    Validation,
    #[error("Malformed request")]
    BadRequest,
    #[error("Not found")]
    NotFound,
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Internal error")]
    InternalError,
}

impl ApiErrorCode {
    pub fn internal<E: std::fmt::Display>(error: E) -> ApiErrorCode {
        warn!("Internal error: {}", error);
        ApiErrorCode::InternalError
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiErrorCode::InvalidCredentials
            | ApiErrorCode::MissingToken
            | ApiErrorCode::InvalidToken
            | ApiErrorCode::Revoked
            | ApiErrorCode::SubjectNotFound => StatusCode::UNAUTHORIZED,
            // Logout reports an unusable token as 404.
            ApiErrorCode::InvalidRefreshToken | ApiErrorCode::NotFound => StatusCode::NOT_FOUND,
            ApiErrorCode::Validation | ApiErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ApiErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl reject::Reject for ApiErrorCode {}

impl From<AuthError> for ApiErrorCode {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::InvalidCredentials => ApiErrorCode::InvalidCredentials,
            AuthError::InvalidToken(_) => ApiErrorCode::InvalidToken,
            AuthError::Revoked => ApiErrorCode::Revoked,
            AuthError::SubjectNotFound => ApiErrorCode::SubjectNotFound,
            AuthError::Validation(_) => ApiErrorCode::Validation,
            AuthError::Store(e) => ApiErrorCode::internal(e),
            AuthError::InternalError(e) => ApiErrorCode::internal(e),
        }
    }
}

#[derive(Debug)]
pub struct ValidationRejection(pub FieldErrors);

impl reject::Reject for ValidationRejection {}

/// Page-guard failure: send the browser to the login page, dropping stored
/// credentials when `clear` is set.
#[derive(Debug)]
pub struct PageRedirect {
    pub clear: Option<CookiePolicy>,
}

impl reject::Reject for PageRedirect {}

/// Field errors keep their detail; everything else collapses to a code.
pub fn auth_rejection(error: AuthError) -> Rejection {
    match error {
        AuthError::Validation(fields) => reject::custom(ValidationRejection(fields)),
        other => reject::custom(ApiErrorCode::from(other)),
    }
}
