use sea_orm::EntityTrait;
use serde_json::json;
use server::entity::team_invitation::{self, InvitationStatus};

use crate::common::{TestApp, routes};

mod creation {
    use super::*;

    #[tokio::test]
    async fn creator_becomes_leader_with_global_limit() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin").await;
        let student = app.create_student("asha").await;
        let event_id = app.create_event(&admin, "Hack2025", 3, 4).await;
        app.post_with_token(routes::TEAM_SIZE, &json!({"teamSize": 3}), &admin)
            .await;

        let res = app
            .post_with_token(
                &routes::event_teams(event_id),
                &json!({"name": "Null Pointers"}),
                &student,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["maxSize"], 3);
        assert_eq!(res.body["configVersion"], 1);
        let members = res.body["members"].as_array().unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0]["username"], "asha");
        assert_eq!(members[0]["isLeader"], true);
    }

    #[tokio::test]
    async fn event_override_beats_global_setting() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin").await;
        let student = app.create_student("asha").await;
        let event_id = app
            .create_event_with(
                &admin,
                json!({
                    "name": "Duo Hack",
                    "startDate": crate::common::days_from_now(3),
                    "endDate": crate::common::days_from_now(4),
                    "maxTeamSize": 2,
                }),
            )
            .await;

        let res = app
            .post_with_token(&routes::event_teams(event_id), &json!({"name": "Pair"}), &student)
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["maxSize"], 2);
        assert!(res.body["configVersion"].is_null());
    }

    #[tokio::test]
    async fn existing_teams_keep_their_limit_after_a_settings_change() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin").await;
        let student = app.create_student("asha").await;
        let event_id = app.create_event(&admin, "Hack2025", 3, 4).await;
        let team_id = app.create_team(&student, event_id, "Null Pointers").await;

        app.post_with_token(routes::TEAM_SIZE, &json!({"teamSize": 2}), &admin)
            .await;

        let detail = app.get_with_token(&routes::admin_event(event_id), &admin).await;
        let team = &detail.body["teams"][0];
        assert_eq!(team["id"], team_id);
        assert_eq!(team["maxSize"], 4);
        assert_eq!(team["configVersion"], 0);
    }

    #[tokio::test]
    async fn one_team_per_student_per_event() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin").await;
        let student = app.create_student("asha").await;
        let event_id = app.create_event(&admin, "Hack2025", 3, 4).await;
        app.create_team(&student, event_id, "First").await;

        let res = app
            .post_with_token(&routes::event_teams(event_id), &json!({"name": "Second"}), &student)
            .await;

        assert_eq!(res.status, 409);
    }

    #[tokio::test]
    async fn team_names_are_unique_within_an_event() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin").await;
        let asha = app.create_student("asha").await;
        let ravi = app.create_student("ravi").await;
        let event_id = app.create_event(&admin, "Hack2025", 3, 4).await;
        app.create_team(&asha, event_id, "Null Pointers").await;

        let res = app
            .post_with_token(
                &routes::event_teams(event_id),
                &json!({"name": "Null Pointers"}),
                &ravi,
            )
            .await;

        assert_eq!(res.status, 409);
    }

    #[tokio::test]
    async fn cannot_register_for_a_past_event() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin").await;
        let student = app.create_student("asha").await;
        let event_id = app.create_event(&admin, "Old", -3, -2).await;

        let res = app
            .post_with_token(&routes::event_teams(event_id), &json!({"name": "Late"}), &student)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["message"], "Event has ended");
    }
}

mod invitations {
    use super::*;

    #[tokio::test]
    async fn invitee_accepts_and_joins() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin").await;
        let asha = app.create_student("asha").await;
        let ravi = app.create_student("ravi").await;
        let event_id = app.create_event(&admin, "Hack2025", 3, 4).await;
        let team_id = app.create_team(&asha, event_id, "Null Pointers").await;

        let invitation_id = app.invite(&asha, team_id, "ravi").await;

        let pending = app.get_with_token(routes::INVITATIONS, &ravi).await;
        assert_eq!(pending.status, 200, "{}", pending.text);
        let list = pending.body.as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["teamName"], "Null Pointers");
        assert_eq!(list[0]["invitedBy"], "asha");

        let events = app.get_with_token(routes::STUDENT_EVENTS, &ravi).await;
        assert_eq!(events.body[0]["pendingInvitations"], 1);

        let res = app
            .post_with_token(&routes::accept_invitation(invitation_id), &json!({}), &ravi)
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        let members = res.body["members"].as_array().unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0]["username"], "asha");
        assert_eq!(members[1]["username"], "ravi");

        let again = app
            .post_with_token(&routes::accept_invitation(invitation_id), &json!({}), &ravi)
            .await;
        assert_eq!(again.status, 409);
    }

    #[tokio::test]
    async fn accepting_one_invitation_declines_the_others_for_the_event() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin").await;
        let asha = app.create_student("asha").await;
        let meena = app.create_student("meena").await;
        let ravi = app.create_student("ravi").await;
        let event_id = app.create_event(&admin, "Hack2025", 3, 4).await;
        let first_team = app.create_team(&asha, event_id, "Null Pointers").await;
        let second_team = app.create_team(&meena, event_id, "Segfaults").await;
        let chosen = app.invite(&asha, first_team, "ravi").await;
        let other = app.invite(&meena, second_team, "ravi").await;

        let res = app
            .post_with_token(&routes::accept_invitation(chosen), &json!({}), &ravi)
            .await;
        assert_eq!(res.status, 200, "{}", res.text);

        let pending = app.get_with_token(routes::INVITATIONS, &ravi).await;
        assert!(pending.body.as_array().unwrap().is_empty());

        let stored = team_invitation::Entity::find_by_id(other)
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, InvitationStatus::Declined);
        assert!(stored.responded_at.is_some());

        let late = app
            .post_with_token(&routes::accept_invitation(other), &json!({}), &ravi)
            .await;
        assert_eq!(late.status, 409);
    }

    #[tokio::test]
    async fn only_the_leader_can_invite() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin").await;
        let asha = app.create_student("asha").await;
        let ravi = app.create_student("ravi").await;
        app.create_student("meena").await;
        let event_id = app.create_event(&admin, "Hack2025", 3, 4).await;
        let team_id = app.create_team(&asha, event_id, "Null Pointers").await;

        let res = app
            .post_with_token(
                &routes::team_invitations(team_id),
                &json!({"username": "meena"}),
                &ravi,
            )
            .await;

        assert_eq!(res.status, 403);
    }

    #[tokio::test]
    async fn full_team_cannot_accept_more_members() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin").await;
        let asha = app.create_student("asha").await;
        let ravi = app.create_student("ravi").await;
        let meena = app.create_student("meena").await;
        let event_id = app
            .create_event_with(
                &admin,
                json!({
                    "name": "Duo Hack",
                    "startDate": crate::common::days_from_now(3),
                    "endDate": crate::common::days_from_now(4),
                    "maxTeamSize": 2,
                }),
            )
            .await;
        let team_id = app.create_team(&asha, event_id, "Pair").await;
        let to_ravi = app.invite(&asha, team_id, "ravi").await;
        let to_meena = app.invite(&asha, team_id, "meena").await;

        let res = app
            .post_with_token(&routes::accept_invitation(to_ravi), &json!({}), &ravi)
            .await;
        assert_eq!(res.status, 200, "{}", res.text);

        let res = app
            .post_with_token(&routes::accept_invitation(to_meena), &json!({}), &meena)
            .await;
        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn declined_invitation_leaves_team_unchanged() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin").await;
        let asha = app.create_student("asha").await;
        let ravi = app.create_student("ravi").await;
        let event_id = app.create_event(&admin, "Hack2025", 3, 4).await;
        let team_id = app.create_team(&asha, event_id, "Null Pointers").await;
        let invitation_id = app.invite(&asha, team_id, "ravi").await;

        let res = app
            .post_with_token(&routes::decline_invitation(invitation_id), &json!({}), &ravi)
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["status"], "declined");
        let pending = app.get_with_token(routes::INVITATIONS, &ravi).await;
        assert!(pending.body.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn cannot_invite_someone_already_in_a_team() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin").await;
        let asha = app.create_student("asha").await;
        let ravi = app.create_student("ravi").await;
        let event_id = app.create_event(&admin, "Hack2025", 3, 4).await;
        let team_id = app.create_team(&asha, event_id, "Null Pointers").await;
        app.create_team(&ravi, event_id, "Segfaults").await;

        let res = app
            .post_with_token(
                &routes::team_invitations(team_id),
                &json!({"username": "ravi"}),
                &asha,
            )
            .await;

        assert_eq!(res.status, 409);
    }
}

mod problem_statement_choice {
    use super::*;

    #[tokio::test]
    async fn statement_capacity_is_enforced() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin").await;
        let asha = app.create_student("asha").await;
        let ravi = app.create_student("ravi").await;
        let event_id = app.create_event(&admin, "Hack2025", 3, 4).await;
        let ps_id = app
            .create_problem_statement(&admin, event_id, "API Design", 1)
            .await;
        let first = app.create_team(&asha, event_id, "Null Pointers").await;
        let second = app.create_team(&ravi, event_id, "Segfaults").await;

        let res = app
            .put_with_token(
                &routes::team_problem_statement(first),
                &json!({"problemStatementId": ps_id}),
                &asha,
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["problemStatementId"], ps_id);

        let res = app
            .put_with_token(
                &routes::team_problem_statement(second),
                &json!({"problemStatementId": ps_id}),
                &ravi,
            )
            .await;
        assert_eq!(res.status, 409);

        let detail = app.get_with_token(&routes::student_event(event_id), &ravi).await;
        assert_eq!(detail.body["problemStatements"][0]["teamCount"], 1);
        assert_eq!(detail.body["problemStatements"][0]["isFull"], true);
    }

    #[tokio::test]
    async fn statement_must_belong_to_the_teams_event() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin").await;
        let asha = app.create_student("asha").await;
        let event_id = app.create_event(&admin, "Hack2025", 3, 4).await;
        let other_event = app.create_event(&admin, "Other", 3, 4).await;
        let foreign_ps = app
            .create_problem_statement(&admin, other_event, "Elsewhere", 5)
            .await;
        let team_id = app.create_team(&asha, event_id, "Null Pointers").await;

        let res = app
            .put_with_token(
                &routes::team_problem_statement(team_id),
                &json!({"problemStatementId": foreign_ps}),
                &asha,
            )
            .await;

        assert_eq!(res.status, 400);
    }
}

mod profile {
    use super::*;

    #[tokio::test]
    async fn profile_lists_teams_and_open_feedback() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin").await;
        let asha = app.create_student("asha").await;
        let event_id = app.create_event(&admin, "Hack2025", 3, 4).await;
        app.create_team(&asha, event_id, "Null Pointers").await;
        app.create_feedback_task(&admin, "Acme Corp").await;

        let res = app.get_with_token(routes::PROFILE, &asha).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["username"], "asha");
        assert_eq!(res.body["email"], "asha@college.edu");
        assert_eq!(res.body["teams"][0]["eventName"], "Hack2025");
        assert_eq!(res.body["teams"][0]["isLeader"], true);
        assert_eq!(res.body["openFeedbackTasks"], 1);
    }
}
