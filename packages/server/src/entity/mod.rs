pub mod app_config;
pub mod event;
pub mod feedback;
pub mod feedback_task;
pub mod problem_statement;
pub mod role;
pub mod role_permission;
pub mod team;
pub mod team_invitation;
pub mod team_member;
pub mod user;
