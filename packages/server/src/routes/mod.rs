mod v1;

use utoipa_axum::router::OpenApiRouter;

use crate::state::AppState;

/// Everything served under `/api`.
///
/// Routes are grouped by audience: `/auth` is public, `/admin` handlers check
/// management permissions, `/student` handlers check participation permissions.
pub fn api_routes() -> OpenApiRouter<AppState> {
    let v1 = OpenApiRouter::new()
        .nest("/auth", v1::auth_routes())
        .nest("/admin", v1::admin_routes())
        .nest("/student", v1::student_routes());

    OpenApiRouter::new().nest("/v1", v1)
}
