mod common;

use common::*;
use taskgate::application_port::*;
use warp::http::{HeaderValue, StatusCode};

fn assert_redirects_to_login(res: &warp::http::Response<warp::hyper::body::Bytes>) {
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(res.headers()["location"], "/login/");
}

fn assert_clears_both_cookies(cookies: &[String]) {
    assert_eq!(cookies.len(), 2);
    assert!(cookies[0].starts_with("access_token=;"));
    assert!(cookies[1].starts_with("refresh_token=;"));
    assert!(cookies.iter().all(|c| c.contains("Max-Age=0")));
}

#[tokio::test]
async fn no_cookie_redirects_without_touching_cookies() {
    let app = TestApp::new();
    let filter = app_filter(app.server.clone());

    let res = warp::test::request().path("/tasks/").reply(&filter).await;

    assert_redirects_to_login(&res);
    assert!(set_cookies(&res).is_empty());
}

#[tokio::test]
async fn garbage_cookie_redirects_and_clears_both() {
    let app = TestApp::new();
    let filter = app_filter(app.server.clone());

    let res = warp::test::request()
        .path("/tasks/")
        .header("cookie", "access_token=garbage; refresh_token=also-garbage")
        .reply(&filter)
        .await;

    assert_redirects_to_login(&res);
    assert_clears_both_cookies(&set_cookies(&res));
}

#[tokio::test]
async fn expired_or_wrong_kind_cookie_redirects_and_clears_both() {
    let app = TestApp::new();
    app.add_user("alice", "correct-pw").await;
    let session = app.login("alice", "correct-pw").await;
    let filter = app_filter(app.server.clone());

    let wrong_kind = warp::test::request()
        .path("/tasks/")
        .header("cookie", format!("access_token={}", session.refresh.token))
        .reply(&filter)
        .await;
    assert_redirects_to_login(&wrong_kind);
    assert_clears_both_cookies(&set_cookies(&wrong_kind));

    app.clock.advance(ACCESS_TTL);
    let expired = warp::test::request()
        .path("/tasks/")
        .header("cookie", format!("access_token={}", session.access.token))
        .reply(&filter)
        .await;
    assert_redirects_to_login(&expired);
    assert_clears_both_cookies(&set_cookies(&expired));
}

#[tokio::test]
async fn deleted_subject_redirects_and_clears_both() {
    let app = TestApp::new();
    let alice = app.add_user("alice", "correct-pw").await;
    let session = app.login("alice", "correct-pw").await;
    app.users.remove(alice);
    let filter = app_filter(app.server.clone());

    let res = warp::test::request()
        .path("/tasks/")
        .header("cookie", format!("access_token={}", session.access.token))
        .reply(&filter)
        .await;

    assert_redirects_to_login(&res);
    assert_clears_both_cookies(&set_cookies(&res));
}

#[tokio::test]
async fn valid_cookie_reaches_the_page() {
    let app = TestApp::new();
    app.add_user("alice", "correct-pw").await;
    let session = app.login("alice", "correct-pw").await;
    let filter = app_filter(app.server.clone());

    let res = warp::test::request()
        .path("/tasks/")
        .header("cookie", format!("access_token={}", session.access.token))
        .reply(&filter)
        .await;

    assert_eq!(res.status(), StatusCode::OK);
    assert!(set_cookies(&res).is_empty());
    let html = String::from_utf8(res.body().to_vec()).unwrap();
    assert!(html.contains("Signed in as <strong>alice</strong>"));
}

#[tokio::test]
async fn bearer_header_does_not_satisfy_the_page_guard() {
    let app = TestApp::new();
    app.add_user("alice", "correct-pw").await;
    let session = app.login("alice", "correct-pw").await;
    let filter = app_filter(app.server.clone());

    let res = warp::test::request()
        .path("/tasks/")
        .header("authorization", format!("Bearer {}", session.access.token))
        .reply(&filter)
        .await;

    assert_redirects_to_login(&res);
    assert!(set_cookies(&res).is_empty());
}

#[tokio::test]
async fn unreadable_headers_still_redirect() {
    let app = TestApp::new();
    let filter = app_filter(app.server.clone());

    let res = warp::test::request()
        .path("/tasks/")
        .header("authorization", HeaderValue::from_bytes(b"\xff").unwrap())
        .reply(&filter)
        .await;
    assert_redirects_to_login(&res);
    assert!(set_cookies(&res).is_empty());

    let res = warp::test::request()
        .path("/tasks/")
        .header("cookie", HeaderValue::from_bytes(b"access_token=\xff\xfe").unwrap())
        .reply(&filter)
        .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(res.headers()["location"], "/login/");
}

#[tokio::test]
async fn browser_logout_revokes_and_clears() {
    let app = TestApp::new();
    app.add_user("alice", "correct-pw").await;
    let session = app.login("alice", "correct-pw").await;
    let filter = app_filter(app.server.clone());

    let res = warp::test::request()
        .path("/logout/")
        .header(
            "cookie",
            format!(
                "access_token={}; refresh_token={}",
                session.access.token, session.refresh.token
            ),
        )
        .reply(&filter)
        .await;

    assert_redirects_to_login(&res);
    assert_clears_both_cookies(&set_cookies(&res));

    let err = app
        .server
        .session_issuer
        .refresh(&session.refresh.token)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Revoked));
}

#[tokio::test]
async fn browser_logout_clears_even_when_revocation_fails() {
    let app = TestApp::new();
    let filter = app_filter(app.server.clone());

    let without_cookie = warp::test::request().path("/logout/").reply(&filter).await;
    assert_redirects_to_login(&without_cookie);
    assert_clears_both_cookies(&set_cookies(&without_cookie));

    let bad_cookie = warp::test::request()
        .path("/logout/")
        .header("cookie", "refresh_token=garbage")
        .reply(&filter)
        .await;
    assert_redirects_to_login(&bad_cookie);
    assert_clears_both_cookies(&set_cookies(&bad_cookie));
    assert!(app.revocations.is_empty());
}

#[tokio::test]
async fn public_pages() {
    let app = TestApp::new();
    let filter = app_filter(app.server.clone());

    let root = warp::test::request().path("/").reply(&filter).await;
    assert_eq!(root.status(), StatusCode::FOUND);
    assert_eq!(root.headers()["location"], "/tasks/");

    let login = warp::test::request().path("/login/").reply(&filter).await;
    assert_eq!(login.status(), StatusCode::OK);
    let html = String::from_utf8(login.body().to_vec()).unwrap();
    assert!(html.contains("/api/auth/login/"));

    let unknown = warp::test::request().path("/nowhere/").reply(&filter).await;
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
}
