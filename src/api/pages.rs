use crate::api::cookies::{CookiePolicy, redirect_to_login};
use crate::application_port::LogoutCoordinator;
use crate::domain_model::AuthenticatedIdentity;
use crate::logger::*;
use std::sync::Arc;
use warp::http::Uri;
use warp::reply::Response;

const LOGIN_HTML: &str = include_str!("../../static/login.html");

pub async fn login_page() -> Result<impl warp::Reply, warp::Rejection> {
    Ok(warp::reply::html(LOGIN_HTML))
}

pub async fn root() -> Result<impl warp::Reply, warp::Rejection> {
    Ok(warp::redirect::found(Uri::from_static("/tasks/")))
}

pub async fn tasks_page(
    identity: AuthenticatedIdentity,
) -> Result<impl warp::Reply, warp::Rejection> {
    let body = format!(
        "<!doctype html>\n<html><head><title>Tasks</title></head><body>\
         <p>Signed in as <strong>{}</strong>.</p>\
         <p><a href=\"/logout/\">Log out</a></p></body></html>\n",
        escape_html(&identity.username)
    );
    Ok(warp::reply::html(body))
}

/// Best-effort revocation, then unconditional cookie clearing.
pub async fn browser_logout(
    refresh_cookie: Option<String>,
    logout_coordinator: Arc<dyn LogoutCoordinator>,
    cookies: CookiePolicy,
) -> Result<Response, warp::Rejection> {
    if let Some(token) = refresh_cookie {
        if let Err(e) = logout_coordinator.logout(&token).await {
            warn!(error = %e, "browser logout: revocation failed");
        }
    }
    Ok(redirect_to_login(Some(&cookies)))
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}
