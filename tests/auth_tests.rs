mod common;

use assetdesk::db::hash_password;
use assetdesk::models::user::Role;
use axum::http::StatusCode;
use common::{TestApp, body_bytes, encode, json, location};

#[tokio::test]
async fn test_anonymous_requests_redirect_to_login() {
    let mut app = TestApp::spawn().await;

    for uri in ["/", "/dashboard", "/assets/hard-disk", "/assets/servers", "/admin/users"] {
        let response = app.get(uri).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(location(&response), "/login", "{uri}");
    }

    let response = app.get("/login").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_failed_logins_are_indistinguishable() {
    let mut app = TestApp::spawn().await;
    app.seed_user("bob", "Passw0rd!", Role::Viewer, false).await;
    let carol = app.seed_user("carol", "Passw0rd!", Role::Viewer, false).await;
    app.state
        .store()
        .update_user(
            carol.id,
            assetdesk::models::user::UserUpdate {
                username: "carol".to_string(),
                full_name: None,
                role: Role::Viewer,
                is_active: false,
            },
        )
        .await
        .unwrap();

    let unknown = app.login("nobody", "Passw0rd!").await;
    let wrong_password = app.login("bob", "Wrong0rd!").await;
    let inactive = app.login("carol", "Passw0rd!").await;

    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(inactive.status(), StatusCode::UNAUTHORIZED);

    let unknown = body_bytes(unknown).await;
    assert_eq!(unknown, body_bytes(wrong_password).await);
    assert_eq!(unknown, body_bytes(inactive).await);
}

#[tokio::test]
async fn test_forced_reset_flow() {
    let mut admin = TestApp::spawn().await;
    admin
        .seed_user("admin", "Adm1n#Pass", Role::Admin, false)
        .await;
    admin.login_ok("admin", "Adm1n#Pass").await;

    let response = admin
        .post_form(
            "/admin/users/create",
            &format!("username=alice&password={}", encode("Passw0rd!")),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/users");
    assert_eq!(
        admin.notices().await,
        vec![(
            "success".to_string(),
            "User created successfully. User must change password at first login.".to_string()
        )]
    );

    let alice = admin.user("alice").await.unwrap();
    assert!(alice.must_change_password);
    assert_eq!(alice.role, Role::Viewer);

    let mut client = admin.new_client();
    let response = client.login("alice", "Passw0rd!").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/change-password");

    // every other page bounces back to change-password
    let response = client.get("/dashboard").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/change-password");

    let response = client.get("/change-password").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json(response).await["data"]["must_change_password"], true);

    let response = client
        .post_form(
            "/change-password",
            &format!(
                "password={}&confirm_password={}",
                encode("NewPassw0rd!"),
                encode("Different1!")
            ),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/change-password");
    assert_eq!(
        client.notices().await,
        vec![("danger".to_string(), "Passwords do not match".to_string())]
    );
    assert!(admin.user("alice").await.unwrap().must_change_password);

    let response = client
        .post_form("/change-password", "password=weak&confirm_password=weak")
        .await;
    assert_eq!(location(&response), "/change-password");
    assert_eq!(
        client.notices().await[0].1,
        "Password must be at least 8 characters long"
    );
    assert!(admin.user("alice").await.unwrap().must_change_password);

    let new_password = encode("NewPassw0rd!");
    let response = client
        .post_form(
            "/change-password",
            &format!("password={new_password}&confirm_password={new_password}"),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard");
    assert_eq!(
        client.notices().await[0].1,
        "Password updated successfully"
    );
    assert!(!admin.user("alice").await.unwrap().must_change_password);

    let response = client.get("/dashboard").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json(response).await;
    assert_eq!(body["data"]["user"]["username"], "alice");

    let mut fresh = admin.new_client();
    assert_eq!(
        fresh.login("alice", "Passw0rd!").await.status(),
        StatusCode::UNAUTHORIZED
    );
    fresh.login_ok("alice", "NewPassw0rd!").await;
}

#[tokio::test]
async fn test_logout_destroys_session() {
    let mut app = TestApp::spawn().await;
    app.seed_user("dave", "Passw0rd!", Role::Operator, false)
        .await;
    app.login_ok("dave", "Passw0rd!").await;

    assert_eq!(app.get("/dashboard").await.status(), StatusCode::OK);

    let response = app.post_form("/logout", "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");

    let response = app.get("/dashboard").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");

    // logging out without a session is harmless
    let response = app.post_form("/logout", "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_logout_rejects_get() {
    let mut app = TestApp::spawn().await;
    app.seed_user("dave", "Passw0rd!", Role::Operator, false)
        .await;
    app.login_ok("dave", "Passw0rd!").await;

    // a cross-site link or image cannot end the session
    let response = app.get("/logout").await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(app.get("/dashboard").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_deactivated_user_loses_session() {
    let mut admin = TestApp::spawn().await;
    admin
        .seed_user("admin", "Adm1n#Pass", Role::Admin, false)
        .await;
    let erin = admin
        .seed_user("erin", "Passw0rd!", Role::Viewer, false)
        .await;
    admin.login_ok("admin", "Adm1n#Pass").await;

    let mut client = admin.new_client();
    client.login_ok("erin", "Passw0rd!").await;
    assert_eq!(client.get("/dashboard").await.status(), StatusCode::OK);

    // no `active=1`, so the account is switched off
    let response = admin
        .post_form(&format!("/admin/users/{}/edit", erin.id), "role=viewer")
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(!admin.user("erin").await.unwrap().is_active);

    let response = client.get("/dashboard").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_notices_are_readable_without_login() {
    let mut app = TestApp::spawn().await;
    assert!(app.notices().await.is_empty());
}

#[tokio::test]
async fn test_unknown_and_inactive_users_still_verify_a_hash() {
    let app = TestApp::spawn().await;
    let store = app.state.store();
    let decoy = hash_password("Decoy#Pass1", &app.state.config().security).unwrap();

    let carol = app.seed_user("carol", "Passw0rd!", Role::Viewer, false).await;
    store
        .update_user(
            carol.id,
            assetdesk::models::user::UserUpdate {
                username: "carol".to_string(),
                full_name: None,
                role: Role::Viewer,
                is_active: false,
            },
        )
        .await
        .unwrap();

    // a decoy that cannot be parsed shows the miss paths run a verify
    assert!(store.authenticate_user("nobody", "Passw0rd!", "garbage").await.is_err());
    assert!(store.authenticate_user("carol", "Passw0rd!", "garbage").await.is_err());

    assert!(store.authenticate_user("nobody", "Decoy#Pass1", &decoy).await.unwrap().is_none());
    assert!(store.authenticate_user("carol", "Passw0rd!", &decoy).await.unwrap().is_none());
    assert!(store.authenticate_user("carol", "Decoy#Pass1", &decoy).await.unwrap().is_none());

    app.seed_user("dave", "Passw0rd!", Role::Viewer, false).await;
    let dave = store.authenticate_user("dave", "Passw0rd!", &decoy).await.unwrap();
    assert_eq!(dave.unwrap().username, "dave");
    assert!(store.authenticate_user("dave", "Decoy#Pass1", &decoy).await.unwrap().is_none());
}
