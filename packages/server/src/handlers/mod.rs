pub mod auth;
pub mod event;
pub mod feedback;
pub mod feedback_task;
pub mod hackathon;
pub mod invitation;
pub mod problem_statement;
pub mod settings;
pub mod student;
pub mod team;
