pub mod auth;
pub mod event;
pub mod feedback;
pub mod hackathon;
pub mod problem_statement;
pub mod settings;
pub mod shared;
pub mod student;
pub mod team;
