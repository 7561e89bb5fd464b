use serde_json::json;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn default_team_size_is_four_at_version_zero() {
    let app = TestApp::spawn().await;
    let admin = app.create_admin("admin").await;

    let res = app.get_with_token(routes::TEAM_SIZE, &admin).await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["teamSize"], 4);
    assert_eq!(res.body["version"], 0);
}

#[tokio::test]
async fn every_write_bumps_the_version() {
    let app = TestApp::spawn().await;
    let admin = app.create_admin("admin").await;

    let first = app
        .post_with_token(routes::TEAM_SIZE, &json!({"teamSize": 3}), &admin)
        .await;
    assert_eq!(first.status, 200, "{}", first.text);
    assert_eq!(first.body["teamSize"], 3);
    assert_eq!(first.body["version"], 1);

    let second = app
        .post_with_token(routes::TEAM_SIZE, &json!({"teamSize": 5}), &admin)
        .await;
    assert_eq!(second.body["version"], 2);

    let res = app.get_with_token(routes::TEAM_SIZE, &admin).await;
    assert_eq!(res.body["teamSize"], 5);
    assert_eq!(res.body["version"], 2);
}

#[tokio::test]
async fn out_of_range_sizes_are_rejected() {
    let app = TestApp::spawn().await;
    let admin = app.create_admin("admin").await;

    for size in [0, 21] {
        let res = app
            .post_with_token(routes::TEAM_SIZE, &json!({"teamSize": size}), &admin)
            .await;
        assert_eq!(res.status, 400, "size {size}: {}", res.text);
    }
}

#[tokio::test]
async fn students_cannot_change_settings() {
    let app = TestApp::spawn().await;
    let student = app.create_student("asha").await;

    let res = app
        .post_with_token(routes::TEAM_SIZE, &json!({"teamSize": 2}), &student)
        .await;

    assert_eq!(res.status, 403);
}
