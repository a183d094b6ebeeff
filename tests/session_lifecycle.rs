mod common;

use common::*;
use std::time::Duration;
use taskgate::application_port::*;

fn credentials(username: &str, password: &str) -> LoginInput {
    LoginInput {
        username: username.to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn login_issues_a_pair_for_the_user() {
    let app = TestApp::new();
    let alice = app.add_user("alice", "correct-pw").await;

    let result = app.login("alice", "correct-pw").await;

    assert_eq!(result.identity.id, alice);
    assert_eq!(result.identity.username, "alice");
    assert_eq!(result.identity.email, "alice@example.com");
    assert_ne!(result.access.jti, result.refresh.jti);
    assert_eq!(result.access.expires_at, start_time() + chrono::Duration::seconds(300));
    assert_eq!(result.refresh.expires_at, start_time() + chrono::Duration::days(1));
}

#[tokio::test]
async fn wrong_password_and_unknown_user_look_the_same() {
    let app = TestApp::new();
    app.add_user("alice", "correct-pw").await;
    let issuer = &app.server.session_issuer;

    let wrong = issuer.login(credentials("alice", "wrong-pw")).await.unwrap_err();
    let ghost = issuer.login(credentials("ghost", "anything")).await.unwrap_err();

    assert!(matches!(wrong, AuthError::InvalidCredentials));
    assert!(matches!(ghost, AuthError::InvalidCredentials));
    assert_eq!(wrong.to_string(), ghost.to_string());
}

#[tokio::test]
async fn refresh_mints_a_new_access_credential() {
    let app = TestApp::new();
    let alice = app.add_user("alice", "correct-pw").await;
    let session = app.login("alice", "correct-pw").await;

    app.clock.advance(Duration::from_secs(600));
    let refreshed = app
        .server
        .session_issuer
        .refresh(&session.refresh.token)
        .await
        .unwrap();

    assert!(refreshed.refresh.is_none());
    let identity = app
        .server
        .session_guard
        .authenticate(&refreshed.access.token)
        .await
        .unwrap();
    assert_eq!(identity.id, alice);

    // Without rotation the same refresh credential keeps working.
    app.server
        .session_issuer
        .refresh(&session.refresh.token)
        .await
        .unwrap();
}

#[tokio::test]
async fn refresh_rejects_access_credentials_and_garbage() {
    let app = TestApp::new();
    app.add_user("alice", "correct-pw").await;
    let session = app.login("alice", "correct-pw").await;
    let issuer = &app.server.session_issuer;

    let err = issuer.refresh(&session.access.token).await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidToken(TokenError::WrongKind)));

    let err = issuer.refresh("garbage").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidToken(TokenError::Malformed)));
}

#[tokio::test]
async fn refresh_fails_once_the_refresh_credential_expires() {
    let app = TestApp::new();
    app.add_user("alice", "correct-pw").await;
    let session = app.login("alice", "correct-pw").await;

    app.clock.set(session.refresh.expires_at);
    let err = app
        .server
        .session_issuer
        .refresh(&session.refresh.token)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidToken(TokenError::Expired)));
}

#[tokio::test]
async fn logout_then_refresh_is_revoked() {
    let app = TestApp::new();
    app.add_user("alice", "correct-pw").await;
    let session = app.login("alice", "correct-pw").await;

    app.server
        .logout_coordinator
        .logout(&session.refresh.token)
        .await
        .unwrap();

    let err = app
        .server
        .session_issuer
        .refresh(&session.refresh.token)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Revoked));
}

#[tokio::test]
async fn logout_twice_succeeds_both_times() {
    let app = TestApp::new();
    app.add_user("alice", "correct-pw").await;
    let session = app.login("alice", "correct-pw").await;
    let coordinator = &app.server.logout_coordinator;

    coordinator.logout(&session.refresh.token).await.unwrap();
    coordinator.logout(&session.refresh.token).await.unwrap();
    assert_eq!(app.revocations.len(), 1);
}

#[tokio::test]
async fn logout_with_an_unparseable_token_is_invalid() {
    let app = TestApp::new();
    let err = app
        .server
        .logout_coordinator
        .logout("definitely.not.ajwt")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidToken(_)));
    assert!(app.revocations.is_empty());
}

#[tokio::test]
async fn guard_rejects_deleted_subjects() {
    let app = TestApp::new();
    let alice = app.add_user("alice", "correct-pw").await;
    let session = app.login("alice", "correct-pw").await;

    assert!(app.users.remove(alice));

    let err = app
        .server
        .session_guard
        .authenticate(&session.access.token)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::SubjectNotFound));

    let err = app
        .server
        .session_issuer
        .refresh(&session.refresh.token)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::SubjectNotFound));
}

#[tokio::test]
async fn guard_rejects_expired_access_credentials() {
    let app = TestApp::new();
    app.add_user("alice", "correct-pw").await;
    let session = app.login("alice", "correct-pw").await;

    app.clock.advance(ACCESS_TTL);
    let err = app
        .server
        .session_guard
        .authenticate(&session.access.token)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidToken(TokenError::Expired)));
}

#[tokio::test]
async fn rotation_makes_refresh_credentials_single_use() {
    let app = TestApp::with_rotation(true);
    app.add_user("alice", "correct-pw").await;
    let session = app.login("alice", "correct-pw").await;
    let issuer = &app.server.session_issuer;

    let first = issuer.refresh(&session.refresh.token).await.unwrap();
    let rotated = first.refresh.expect("rotation hands out a new refresh credential");
    assert_ne!(rotated.jti, session.refresh.jti);

    let err = issuer.refresh(&session.refresh.token).await.unwrap_err();
    assert!(matches!(err, AuthError::Revoked));

    issuer.refresh(&rotated.token).await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_rotating_refreshes_have_one_winner() {
    let app = TestApp::with_rotation(true);
    app.add_user("alice", "correct-pw").await;
    let session = app.login("alice", "correct-pw").await;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let issuer = app.server.session_issuer.clone();
            let token = session.refresh.token.clone();
            tokio::spawn(async move { issuer.refresh(&token).await })
        })
        .collect();

    let mut wins = 0;
    let mut revoked = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => wins += 1,
            Err(AuthError::Revoked) => revoked += 1,
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }
    assert_eq!(wins, 1);
    assert_eq!(revoked, 7);
}

#[tokio::test]
async fn refresh_rejects_deactivated_subjects() {
    for rotate in [false, true] {
        let app = TestApp::with_rotation(rotate);
        let alice = app.add_user("alice", "correct-pw").await;
        let session = app.login("alice", "correct-pw").await;

        assert!(app.users.set_active(alice, false));

        let err = app
            .server
            .session_issuer
            .refresh(&session.refresh.token)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::SubjectNotFound));
        assert!(app.revocations.is_empty());
    }
}

#[tokio::test]
async fn logout_then_rotating_refresh_is_revoked() {
    let app = TestApp::with_rotation(true);
    app.add_user("alice", "correct-pw").await;
    let session = app.login("alice", "correct-pw").await;

    app.server
        .logout_coordinator
        .logout(&session.refresh.token)
        .await
        .unwrap();

    let err = app
        .server
        .session_issuer
        .refresh(&session.refresh.token)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Revoked));
    assert_eq!(app.revocations.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn logout_racing_a_rotating_refresh_leaves_the_credential_dead() {
    let app = TestApp::with_rotation(true);
    app.add_user("alice", "correct-pw").await;

    for _ in 0..16 {
        let session = app.login("alice", "correct-pw").await;
        let token = session.refresh.token.clone();

        let issuer = app.server.session_issuer.clone();
        let refresh_token = token.clone();
        let refreshing = tokio::spawn(async move { issuer.refresh(&refresh_token).await });

        let coordinator = app.server.logout_coordinator.clone();
        let logout_token = token.clone();
        let logging_out = tokio::spawn(async move { coordinator.logout(&logout_token).await });

        logging_out.await.unwrap().unwrap();
        match refreshing.await.unwrap() {
            Ok(refreshed) => assert!(refreshed.refresh.is_some()),
            Err(AuthError::Revoked) => {}
            Err(other) => panic!("unexpected error: {other:?}"),
        }

        let err = app.server.session_issuer.refresh(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::Revoked));
    }
    assert_eq!(app.revocations.len(), 16);
}
