use sea_orm::*;
use sea_orm::sea_query::{Index, PostgresQueryBuilder};
use tracing::info;

use crate::config::BootstrapAdmin;
use crate::entity::{role, role_permission, team, team_invitation, user};
use crate::utils::hash;

/// Default roles seeded on startup.
const DEFAULT_ROLES: &[&str] = &[role::ADMIN_ROLE, role::DEFAULT_ROLE];

/// Default role-permission mappings seeded on startup.
const DEFAULT_MAPPINGS: &[(&str, &str)] = &[
    // Admin: portal management
    ("admin", "event:manage"),
    ("admin", "problem_statement:manage"),
    ("admin", "settings:manage"),
    ("admin", "feedback:manage"),
    ("admin", "user:view"),
    // Student
    ("student", "event:participate"),
    ("student", "feedback:respond"),
];

/// Seed the `role` and `role_permission` tables with defaults.
pub async fn seed_role_permissions(db: &DatabaseConnection) -> Result<(), DbErr> {
    let mut roles_inserted = 0u32;
    for &name in DEFAULT_ROLES {
        let model = role::ActiveModel {
            name: Set(name.to_string()),
        };

        let result = role::Entity::insert(model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(role::Column::Name)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await;

        match result {
            Ok(n) if n > 0 => roles_inserted += 1,
            Ok(_) | Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }
    }

    if roles_inserted > 0 {
        info!("Seeded {} new roles", roles_inserted);
    }

    let mut perms_inserted = 0u32;
    for &(role, permission) in DEFAULT_MAPPINGS {
        let model = role_permission::ActiveModel {
            role: Set(role.to_string()),
            permission: Set(permission.to_string()),
        };

        let result = role_permission::Entity::insert(model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::columns([
                    role_permission::Column::Role,
                    role_permission::Column::Permission,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(db)
            .await;

        match result {
            Ok(n) if n > 0 => perms_inserted += 1,
            Ok(_) | Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }
    }

    if perms_inserted > 0 {
        info!("Seeded {} new role-permission mappings", perms_inserted);
    }

    Ok(())
}

/// Create the configured admin account if its username is not taken yet.
pub async fn seed_bootstrap_admin(
    db: &DatabaseConnection,
    admin: &BootstrapAdmin,
) -> Result<(), DbErr> {
    let exists = user::Entity::find()
        .filter(user::Column::Username.eq(&admin.username))
        .one(db)
        .await?
        .is_some();
    if exists {
        return Ok(());
    }

    let password = admin.password.clone();
    let hash = tokio::task::spawn_blocking(move || hash::hash_password(&password))
        .await
        .map_err(|e| DbErr::Custom(format!("Password hashing task failed: {e}")))?
        .map_err(|e| DbErr::Custom(format!("Password hash error: {e}")))?;

    user::ActiveModel {
        username: Set(admin.username.clone()),
        email: Set(admin.email.clone()),
        full_name: Set("Administrator".to_string()),
        password: Set(hash),
        role: Set(role::ADMIN_ROLE.to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(username = %admin.username, "Created bootstrap admin account");
    Ok(())
}

/// Ensure required database indexes exist.
///
/// SeaORM's schema-sync doesn't support composite indexes,
/// so we create them manually on startup.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Team names are unique within an event.
    let stmt = Index::create()
        .if_not_exists()
        .unique()
        .name("idx_team_event_name")
        .table(team::Entity)
        .col(team::Column::EventId)
        .col(team::Column::Name)
        .to_string(PostgresQueryBuilder);

    match db.execute_unprepared(&stmt).await {
        Ok(_) => info!("Ensured index idx_team_event_name exists"),
        Err(e) => tracing::warn!("Failed to create index idx_team_event_name: {}", e),
    }

    // Pending invitations for a student:
    // SELECT ... FROM team_invitation WHERE invitee_id = ? AND status = 'pending'
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_invitation_invitee_status")
        .table(team_invitation::Entity)
        .col(team_invitation::Column::InviteeId)
        .col(team_invitation::Column::Status)
        .to_string(PostgresQueryBuilder);

    match db.execute_unprepared(&stmt).await {
        Ok(_) => info!("Ensured index idx_invitation_invitee_status exists"),
        Err(e) => tracing::warn!("Failed to create index idx_invitation_invitee_status: {}", e),
    }

    Ok(())
}
