use crate::api::cookies::{ACCESS_COOKIE, CookiePolicy};
use crate::api::error::{ApiErrorCode, PageRedirect};
use crate::application_port::{AuthError, SessionGuard};
use crate::domain_model::AuthenticatedIdentity;
use crate::logger::*;
use std::convert::Infallible;
use std::sync::Arc;
use warp::filters::BoxedFilter;
use warp::http::header::AUTHORIZATION;
use warp::http::{HeaderMap, HeaderValue};
use warp::{Filter, Rejection, reject};

/// How a guarded route presents a failed credential check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardMode {
    /// Bearer header in, structured 401 out.
    Api,
    /// `access_token` cookie in, redirect to the login page out.
    Page,
}

pub fn with<ServiceType>(
    service: Arc<ServiceType>,
) -> impl Filter<Extract = (Arc<ServiceType>,), Error = Infallible> + Clone
where
    ServiceType: Send + Sync + ?Sized,
{
    warp::any().map(move || service.clone())
}

pub fn with_cookie_policy(
    policy: CookiePolicy,
) -> impl Filter<Extract = (CookiePolicy,), Error = Infallible> + Clone {
    warp::any().map(move || policy.clone())
}

pub fn optional_cookie(name: &'static str) -> BoxedFilter<(Option<String>,)> {
    warp::cookie::optional(name)
        .map(|value: Option<String>| value)
        .boxed()
}

/// Session guard as a filter. Each protected route declares it, and the
/// handler receives the resolved identity as an argument. API routes only
/// read the `Authorization` header and pages only read the access cookie.
pub fn with_identity(
    guard: Arc<dyn SessionGuard>,
    mode: GuardMode,
    cookies: CookiePolicy,
) -> BoxedFilter<(AuthenticatedIdentity,)> {
    match mode {
        GuardMode::Api => warp::header::headers_cloned()
            .and_then(move |headers: HeaderMap| {
                let guard = guard.clone();
                let header = headers.get(AUTHORIZATION).cloned();
                async move { api_identity(guard.as_ref(), header).await }
            })
            .boxed(),
        // An unreadable cookie header counts as no cookie.
        GuardMode::Page => optional_cookie(ACCESS_COOKIE)
            .or(warp::any().map(|| None::<String>))
            .unify()
            .and_then(move |cookie: Option<String>| {
                let guard = guard.clone();
                let cookies = cookies.clone();
                async move { page_identity(guard.as_ref(), cookie, cookies).await }
            })
            .boxed(),
    }
}

async fn api_identity(
    guard: &dyn SessionGuard,
    header: Option<HeaderValue>,
) -> Result<AuthenticatedIdentity, Rejection> {
    let Some(header) = header else {
        return Err(reject::custom(ApiErrorCode::MissingToken));
    };
    let Some(token) = header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
    else {
        return Err(reject::custom(ApiErrorCode::InvalidToken));
    };

    guard.authenticate(token.trim()).await.map_err(|e| {
        debug!(error = %e, "api request rejected");
        reject::custom(ApiErrorCode::from(e))
    })
}

async fn page_identity(
    guard: &dyn SessionGuard,
    cookie: Option<String>,
    cookies: CookiePolicy,
) -> Result<AuthenticatedIdentity, Rejection> {
    let Some(token) = cookie else {
        return Err(reject::custom(PageRedirect { clear: None }));
    };

    match guard.authenticate(&token).await {
        Ok(identity) => Ok(identity),
        Err(e @ (AuthError::InvalidToken(_) | AuthError::SubjectNotFound)) => {
            debug!(error = %e, "page request rejected, clearing credentials");
            Err(reject::custom(PageRedirect {
                clear: Some(cookies),
            }))
        }
        Err(e) => Err(reject::custom(ApiErrorCode::from(e))),
    }
}
