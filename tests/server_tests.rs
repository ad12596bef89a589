mod common;

use assetdesk::models::user::Role;
use axum::http::StatusCode;
use common::{TestApp, json, location};

async fn operator_app() -> TestApp {
    let mut app = TestApp::spawn().await;
    app.seed_user("ops", "Passw0rd!", Role::Operator, false)
        .await;
    app.login_ok("ops", "Passw0rd!").await;
    app
}

async fn create(app: &mut TestApp, body: &str) {
    let response = app.post_form("/assets/servers/create", body).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/assets/servers");
    assert_eq!(
        app.notices().await,
        vec![(
            "success".to_string(),
            "Server registered successfully".to_string()
        )]
    );
}

#[tokio::test]
async fn test_segment_totals() {
    let mut app = operator_app().await;
    create(
        &mut app,
        "hostname=db-02&ip_address=10.0.0.2&environment=Production&segment=DB&cpu=16+vCPU&ram=64+GB&storage=2+TB",
    )
    .await;
    create(
        &mut app,
        "hostname=db-01&ip_address=10.0.0.1&environment=Production&segment=db&cpu=8&ram=32GB&storage=500+GB",
    )
    .await;
    create(
        &mut app,
        "hostname=db-dr&ip_address=10.1.0.1&environment=dr&segment=DB&cpu=4+cores",
    )
    .await;
    create(
        &mut app,
        "hostname=web-01&ip_address=10.2.0.1&environment=Production&segment=WEB&cpu=2",
    )
    .await;

    let response = app.get("/assets/servers").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json(response).await;
    let data = &body["data"];

    assert_eq!(data["counters"]["total"], 4);
    assert_eq!(data["counters"]["production"], 3);
    assert_eq!(data["counters"]["disaster_recovery"], 1);
    assert_eq!(data["counters"]["by_segment"]["DB"], 3);

    let groups = data["groups"].as_array().unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0]["segment"], "DB");
    assert_eq!(groups[0]["totals"]["server_count"], 3);
    assert_eq!(groups[0]["totals"]["cpu_cores"], 28);
    assert_eq!(groups[0]["servers"][0]["hostname"], "db-01");
    assert_eq!(groups[0]["servers"][0]["created_by"], "ops");
    assert_eq!(groups[1]["segment"], "WEB");

    let body = json(app.get("/assets/servers?env=dr").await).await;
    assert_eq!(body["data"]["counters"]["total"], 1);
    assert_eq!(body["data"]["groups"][0]["servers"][0]["hostname"], "db-dr");

    let body = json(app.get("/assets/servers?segment=web").await).await;
    assert_eq!(body["data"]["counters"]["total"], 1);

    let response = app.get("/assets/servers?env=staging").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json(app.get("/dashboard").await).await;
    assert_eq!(body["data"]["servers"]["total"], 4);
    assert_eq!(body["data"]["hard_disk_records"], 0);
}

#[tokio::test]
async fn test_invalid_server_is_rejected() {
    let mut app = operator_app().await;

    let response = app
        .post_form(
            "/assets/servers/create",
            "hostname=db-01&ip_address=10.0.0&environment=Production&segment=DB",
        )
        .await;
    assert_eq!(location(&response), "/assets/servers");
    assert_eq!(
        app.notices().await,
        vec![(
            "danger".to_string(),
            "Invalid IP address: '10.0.0'".to_string()
        )]
    );

    let response = app
        .post_form(
            "/assets/servers/create",
            "ip_address=10.0.0.1&environment=Production&segment=DB",
        )
        .await;
    assert_eq!(location(&response), "/assets/servers");
    assert_eq!(app.notices().await[0].1, "Hostname is required");

    let body = json(app.get("/assets/servers").await).await;
    assert_eq!(body["data"]["counters"]["total"], 0);
}

#[tokio::test]
async fn test_viewer_is_read_only() {
    let mut app = operator_app().await;
    create(
        &mut app,
        "hostname=app-01&ip_address=10.0.0.9&environment=Production&segment=APP",
    )
    .await;

    app.seed_user("viewer", "Passw0rd!", Role::Viewer, false)
        .await;
    let mut viewer = app.new_client();
    viewer.login_ok("viewer", "Passw0rd!").await;

    let body = json(viewer.get("/assets/servers").await).await;
    let id = body["data"]["groups"][0]["servers"][0]["id"].as_i64().unwrap();

    let response = viewer.get(&format!("/assets/servers/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = viewer
        .post_form(
            "/assets/servers/create",
            "hostname=x&ip_address=10.0.0.1&environment=Production&segment=APP",
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = viewer
        .post_form(&format!("/assets/servers/{id}/delete"), "")
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        app.get(&format!("/assets/servers/{id}")).await.status(),
        StatusCode::OK
    );
}

#[tokio::test]
async fn test_edit_and_delete() {
    let mut app = operator_app().await;
    create(
        &mut app,
        "hostname=app-01&ip_address=10.0.0.9&environment=Production&segment=APP",
    )
    .await;
    let body = json(app.get("/assets/servers").await).await;
    let id = body["data"]["groups"][0]["servers"][0]["id"].as_i64().unwrap();

    let response = app
        .post_form(
            &format!("/assets/servers/{id}/edit"),
            "hostname=app-01&ip_address=10.0.0.10&environment=dr&segment=app&owner=Ops",
        )
        .await;
    assert_eq!(location(&response), "/assets/servers");
    assert_eq!(
        app.notices().await,
        vec![("success".to_string(), "Server updated successfully".to_string())]
    );

    let body = json(app.get(&format!("/assets/servers/{id}")).await).await;
    assert_eq!(body["data"]["ip_address"], "10.0.0.10");
    assert_eq!(body["data"]["environment"], "Disaster Recovery");
    assert_eq!(body["data"]["owner"], "Ops");

    app.post_form(&format!("/assets/servers/{id}/delete"), "")
        .await;
    assert_eq!(
        app.notices().await,
        vec![("warning".to_string(), "Server deleted successfully".to_string())]
    );
    assert_eq!(
        app.get(&format!("/assets/servers/{id}")).await.status(),
        StatusCode::NOT_FOUND
    );

    app.post_form("/assets/servers/9999/delete", "").await;
    assert_eq!(
        app.notices().await,
        vec![("danger".to_string(), "Server 9999 not found".to_string())]
    );
}
