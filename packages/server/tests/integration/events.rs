use serde_json::json;

use crate::common::{TestApp, days_from_now, routes};

mod create {
    use super::*;

    #[tokio::test]
    async fn admin_creates_event_with_derived_status() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin").await;

        let res = app
            .post_with_token(
                routes::ADMIN_EVENTS,
                &json!({
                    "name": "Hack2025",
                    "startDate": days_from_now(10),
                    "endDate": days_from_now(11),
                    "venue": "Main Auditorium",
                }),
                &admin,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["event"]["name"], "Hack2025");
        assert_eq!(res.body["event"]["status"], "upcoming");
        assert_eq!(res.body["event"]["venue"], "Main Auditorium");
    }

    #[tokio::test]
    async fn missing_name_is_reported_as_missing_fields() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin").await;

        let res = app
            .post_with_token(
                routes::ADMIN_EVENTS,
                &json!({"name": "  ", "startDate": days_from_now(1), "endDate": days_from_now(2)}),
                &admin,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["message"], "missing required fields");
    }

    #[tokio::test]
    async fn missing_end_date_is_reported_as_missing_fields() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin").await;

        let res = app
            .post_with_token(
                routes::ADMIN_EVENTS,
                &json!({"name": "Hack2025", "startDate": days_from_now(1)}),
                &admin,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["message"], "missing required fields");
    }

    #[tokio::test]
    async fn equal_start_and_end_is_an_invalid_range() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin").await;
        let t = days_from_now(3);

        let res = app
            .post_with_token(
                routes::ADMIN_EVENTS,
                &json!({"name": "Hack2025", "startDate": t, "endDate": t}),
                &admin,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["message"], "invalid time range");
    }

    #[tokio::test]
    async fn student_cannot_create_events() {
        let app = TestApp::spawn().await;
        let student = app.create_student("asha").await;

        let res = app
            .post_with_token(
                routes::ADMIN_EVENTS,
                &json!({"name": "Hack2025", "startDate": days_from_now(1), "endDate": days_from_now(2)}),
                &student,
            )
            .await;

        assert_eq!(res.status, 403);
    }
}

mod problem_statements {
    use super::*;

    #[tokio::test]
    async fn end_to_end_event_with_one_statement() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin").await;

        let event_id = app.create_event(&admin, "Hack2025", 5, 6).await;
        let res = app
            .post_with_token(
                routes::PROBLEM_STATEMENTS,
                &json!({
                    "title": "API Design",
                    "description": "Build a REST API",
                    "eventId": event_id,
                    "maxTeams": 3,
                }),
                &admin,
            )
            .await;
        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["maxTeams"], 3);
        assert_eq!(res.body["eventId"], event_id);

        let list = app.get_with_token(routes::ADMIN_EVENTS, &admin).await;
        assert_eq!(list.status, 200);
        let events = list.body.as_array().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0]["name"], "Hack2025");
        assert_eq!(events[0]["problemStatementCount"], 1);
        assert_eq!(events[0]["teamCount"], 0);

        let detail = app.get_with_token(&routes::admin_event(event_id), &admin).await;
        assert_eq!(detail.status, 200);
        let statements = detail.body["problemStatements"].as_array().unwrap();
        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0]["title"], "API Design");
        assert_eq!(statements[0]["maxTeams"], 3);
        assert_eq!(statements[0]["teamCount"], 0);
    }

    #[tokio::test]
    async fn max_teams_below_one_is_coerced() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin").await;
        let event_id = app.create_event(&admin, "Hack2025", 5, 6).await;

        let res = app
            .post_with_token(
                routes::PROBLEM_STATEMENTS,
                &json!({"title": "T", "description": "D", "eventId": event_id, "maxTeams": -4}),
                &admin,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["maxTeams"], 1);
    }

    #[tokio::test]
    async fn unknown_event_is_not_found() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin").await;

        let res = app
            .post_with_token(
                routes::PROBLEM_STATEMENTS,
                &json!({"title": "T", "description": "D", "eventId": 9999, "maxTeams": 1}),
                &admin,
            )
            .await;

        assert_eq!(res.status, 404);
    }
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn status_filter_uses_the_time_window() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin").await;
        app.create_event(&admin, "Past", -5, -4).await;
        app.create_event(&admin, "Ongoing", -1, 1).await;
        app.create_event(&admin, "Upcoming", 4, 5).await;

        for (status, name) in [("past", "Past"), ("ongoing", "Ongoing"), ("upcoming", "Upcoming")] {
            let res = app
                .get_with_token(&format!("{}?status={status}", routes::ADMIN_EVENTS), &admin)
                .await;
            assert_eq!(res.status, 200, "{}", res.text);
            let events = res.body.as_array().unwrap();
            assert_eq!(events.len(), 1, "status={status}: {}", res.text);
            assert_eq!(events[0]["name"], name);
            assert_eq!(events[0]["status"], status);
        }
    }

    #[tokio::test]
    async fn search_matches_name_case_insensitively() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin").await;
        app.create_event(&admin, "Hack2025", 4, 5).await;
        app.create_event(&admin, "Code Sprint", 4, 5).await;

        let res = app
            .get_with_token(&format!("{}?search=hack", routes::ADMIN_EVENTS), &admin)
            .await;

        let events = res.body.as_array().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0]["name"], "Hack2025");
    }
}

mod update_and_delete {
    use super::*;

    #[tokio::test]
    async fn patch_rejects_a_window_that_would_invert() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin").await;
        let id = app.create_event(&admin, "Hack2025", 4, 5).await;

        let res = app
            .patch_with_token(
                &routes::admin_event(id),
                &json!({"endDate": days_from_now(3)}),
                &admin,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["message"], "invalid time range");
    }

    #[tokio::test]
    async fn patch_updates_and_clears_fields() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin").await;
        let id = app
            .create_event_with(
                &admin,
                json!({
                    "name": "Hack2025",
                    "startDate": days_from_now(4),
                    "endDate": days_from_now(5),
                    "venue": "Lab 1",
                }),
            )
            .await;

        let res = app
            .patch_with_token(
                &routes::admin_event(id),
                &json!({"name": "Hack2026", "venue": null, "maxTeamSize": 3}),
                &admin,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["name"], "Hack2026");
        assert!(res.body["venue"].is_null());
        assert_eq!(res.body["maxTeamSize"], 3);
    }

    #[tokio::test]
    async fn delete_cascades_to_teams_and_statements() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin").await;
        let student = app.create_student("asha").await;
        let id = app.create_event(&admin, "Hack2025", 4, 5).await;
        app.create_problem_statement(&admin, id, "API Design", 2).await;
        app.create_team(&student, id, "Null Pointers").await;

        let res = app.delete_with_token(&routes::admin_event(id), &admin).await;
        assert_eq!(res.status, 204, "{}", res.text);

        let res = app.get_with_token(&routes::admin_event(id), &admin).await;
        assert_eq!(res.status, 404);

        let profile = app.get_with_token(routes::PROFILE, &student).await;
        assert_eq!(profile.body["teams"].as_array().unwrap().len(), 0);
    }
}

mod student_browser {
    use super::*;

    #[tokio::test]
    async fn past_events_are_hidden_from_students() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin").await;
        let student = app.create_student("asha").await;
        app.create_event(&admin, "Past", -5, -4).await;
        app.create_event(&admin, "Upcoming", 4, 5).await;

        let res = app.get_with_token(routes::STUDENT_EVENTS, &student).await;

        assert_eq!(res.status, 200, "{}", res.text);
        let events = res.body.as_array().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0]["name"], "Upcoming");
        assert_eq!(events[0]["isRegistered"], false);
        assert_eq!(events[0]["pendingInvitations"], 0);
    }

    #[tokio::test]
    async fn event_detail_shows_statements_and_my_team() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin").await;
        let student = app.create_student("asha").await;
        let id = app.create_event(&admin, "Hack2025", 4, 5).await;
        app.create_problem_statement(&admin, id, "API Design", 1).await;

        let before = app.get_with_token(&routes::student_event(id), &student).await;
        assert_eq!(before.status, 200, "{}", before.text);
        assert_eq!(before.body["isRegistered"], false);
        assert!(before.body["myTeam"].is_null());

        app.create_team(&student, id, "Null Pointers").await;

        let after = app.get_with_token(&routes::student_event(id), &student).await;
        assert_eq!(after.body["isRegistered"], true);
        assert_eq!(after.body["myTeam"]["name"], "Null Pointers");
        assert_eq!(after.body["problemStatements"][0]["isFull"], false);
    }
}
