use warp::Reply;
use warp::http::header::SET_COOKIE;
use warp::http::{HeaderValue, Uri};
use warp::reply::Response;

/// Cookie names shared between the page guard and the browser.
pub const ACCESS_COOKIE: &str = "access_token";
pub const REFRESH_COOKIE: &str = "refresh_token";

pub const LOGIN_PATH: &str = "/login/";

#[derive(Debug, Clone, Default)]
pub struct CookiePolicy {
    pub secure: bool,
}

impl CookiePolicy {
    /// `Set-Cookie` value that makes the browser drop `name`.
    pub fn clear(&self, name: &str) -> String {
        let secure = if self.secure { "; Secure" } else { "" };
        format!("{name}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax{secure}")
    }
}

/// 302 to the login page, optionally dropping both credential cookies.
pub fn redirect_to_login(clear: Option<&CookiePolicy>) -> Response {
    let mut response = warp::redirect::found(Uri::from_static(LOGIN_PATH)).into_response();
    if let Some(policy) = clear {
        for name in [ACCESS_COOKIE, REFRESH_COOKIE] {
            if let Ok(value) = HeaderValue::from_str(&policy.clear(name)) {
                response.headers_mut().append(SET_COOKIE, value);
            }
        }
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use warp::http::StatusCode;
    use warp::http::header::LOCATION;

    #[test]
    fn plain_redirect_sets_no_cookies() {
        let response = redirect_to_login(None);
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[LOCATION], LOGIN_PATH);
        assert!(response.headers().get(SET_COOKIE).is_none());
    }

    #[test]
    fn clearing_redirect_expires_both_cookies() {
        let response = redirect_to_login(Some(&CookiePolicy { secure: true }));
        let cleared: Vec<_> = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        assert_eq!(
            cleared,
            vec![
                "access_token=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax; Secure",
                "refresh_token=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax; Secure",
            ]
        );
    }
}
