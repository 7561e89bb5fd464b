use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub(super) fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::register))
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::me))
}

pub(super) fn admin_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::event::list_events,
            handlers::event::create_event
        ))
        .routes(routes!(
            handlers::event::get_event,
            handlers::event::update_event,
            handlers::event::delete_event
        ))
        .routes(routes!(
            handlers::problem_statement::create_problem_statement
        ))
        .routes(routes!(handlers::hackathon::create_hackathon))
        .routes(routes!(
            handlers::settings::get_team_size,
            handlers::settings::set_team_size
        ))
        .routes(routes!(
            handlers::feedback_task::list_feedback_tasks,
            handlers::feedback_task::create_feedback_task
        ))
        .routes(routes!(
            handlers::feedback_task::list_feedback_responses
        ))
}

pub(super) fn student_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::student::list_open_events))
        .routes(routes!(handlers::student::get_open_event))
        .routes(routes!(handlers::student::get_profile))
        .routes(routes!(handlers::team::create_team))
        .routes(routes!(handlers::team::invite_member))
        .routes(routes!(handlers::team::select_problem_statement))
        .routes(routes!(handlers::invitation::list_invitations))
        .routes(routes!(handlers::invitation::accept_invitation))
        .routes(routes!(handlers::invitation::decline_invitation))
        .routes(routes!(handlers::feedback::list_my_feedback_tasks))
        .routes(routes!(
            handlers::feedback::get_my_feedback,
            handlers::feedback::save_my_feedback
        ))
}
