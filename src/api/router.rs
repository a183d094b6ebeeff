use super::cookies::REFRESH_COOKIE;
use super::filters::*;
use super::handler;
use super::pages;
use crate::server::*;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use warp::Filter;

const JSON_BODY_LIMIT: u64 = 16 * 1024;

pub fn routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    // region api

    let register = warp::path!("api" / "auth" / "register")
        .and(warp::post())
        .and(json_body())
        .and(with(server.account_service.clone()))
        .and_then(handler::register);

    let login = warp::path!("api" / "auth" / "login")
        .and(warp::post())
        .and(json_body())
        .and(with(server.session_issuer.clone()))
        .and_then(handler::login);

    let refresh = warp::path!("api" / "auth" / "refresh")
        .and(warp::post())
        .and(json_body())
        .and(with(server.session_issuer.clone()))
        .and_then(handler::refresh);

    let logout = warp::path!("api" / "auth" / "logout")
        .and(warp::post())
        .and(json_body())
        .and(with(server.logout_coordinator.clone()))
        .and_then(handler::logout);

    let me = warp::path!("api" / "users" / "me")
        .and(warp::get())
        .and(with_identity(
            server.session_guard.clone(),
            GuardMode::Api,
            server.cookie_policy.clone(),
        ))
        .and(with(server.account_service.clone()))
        .and_then(handler::me);

    // endregion

    // region pages

    let root = warp::path::end()
        .and(warp::get())
        .and_then(pages::root);

    let login_page = warp::path!("login")
        .and(warp::get())
        .and_then(pages::login_page);

    let browser_logout = warp::path!("logout")
        .and(warp::get())
        .and(optional_cookie(REFRESH_COOKIE))
        .and(with(server.logout_coordinator.clone()))
        .and(with_cookie_policy(server.cookie_policy.clone()))
        .and_then(pages::browser_logout);

    let tasks = warp::path!("tasks")
        .and(warp::get())
        .and(with_identity(
            server.session_guard.clone(),
            GuardMode::Page,
            server.cookie_policy.clone(),
        ))
        .and_then(pages::tasks_page);

    // endregion

    register
        .or(login)
        .or(refresh)
        .or(logout)
        .or(me)
        .or(root)
        .or(login_page)
        .or(browser_logout)
        .or(tasks)
}

fn json_body<T>() -> impl Filter<Extract = (T,), Error = warp::Rejection> + Clone
where
    T: DeserializeOwned + Send,
{
    warp::body::content_length_limit(JSON_BODY_LIMIT).and(warp::body::json())
}
